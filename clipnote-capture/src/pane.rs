//! The external pane: queries, captures and paste delivery.

use crate::error::CaptureError;
use crate::window::CaptureRange;
use std::process::{Command, Output};

/// Operations the annotation engine needs from the observed pane.
///
/// Implementations may block on an external process; callers run them off
/// the event loop.
pub trait PaneCollaborator: Send + Sync {
    /// Read a pane format variable such as `scroll_position`.
    fn display_var(&self, pane: &str, name: &str) -> Result<String, CaptureError>;

    /// Capture the given range of the pane as plain text.
    fn capture_pane(&self, pane: &str, range: &CaptureRange) -> Result<String, CaptureError>;

    /// Load `text` into the paste buffer.
    fn set_buffer(&self, text: &str) -> Result<(), CaptureError>;

    /// Paste the paste buffer into the pane.
    fn paste_buffer(&self, pane: &str) -> Result<(), CaptureError>;
}

/// [`PaneCollaborator`] backed by the tmux command line.
#[derive(Debug, Clone)]
pub struct TmuxPane {
    program: String,
}

impl TmuxPane {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run tmux and return stdout, or the trimmed error output on failure.
    fn run<I, S>(&self, args: I) -> Result<String, CaptureError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| CaptureError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(CaptureError::CommandFailed(failure_text(&output)))
        }
    }
}

impl Default for TmuxPane {
    fn default() -> Self {
        Self::new("tmux")
    }
}

impl PaneCollaborator for TmuxPane {
    fn display_var(&self, pane: &str, name: &str) -> Result<String, CaptureError> {
        let format = format!("#{{{name}}}");
        self.run(["display-message", "-t", pane, "-p", &format])
            .map(|out| out.trim().to_string())
    }

    fn capture_pane(&self, pane: &str, range: &CaptureRange) -> Result<String, CaptureError> {
        let mut args = vec![
            "capture-pane".to_string(),
            "-p".to_string(),
            "-t".to_string(),
            pane.to_string(),
        ];
        args.extend(range.to_args());
        log::debug!("{} {}", self.program, args.join(" "));
        self.run(&args)
    }

    fn set_buffer(&self, text: &str) -> Result<(), CaptureError> {
        // `--` keeps marks that start with '-' from being read as flags.
        self.run(["set-buffer", "--", text]).map(|_| ())
    }

    fn paste_buffer(&self, pane: &str) -> Result<(), CaptureError> {
        self.run(["paste-buffer", "-t", pane]).map(|_| ())
    }
}

/// Prefer what tmux printed; fall back to the exit status.
fn failure_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = stdout.trim();
    if !stdout.is_empty() {
        return stdout.to_string();
    }
    output.status.to_string()
}
