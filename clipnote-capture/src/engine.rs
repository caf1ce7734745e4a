//! Capture execution.

use crate::error::CaptureError;
use crate::pane::PaneCollaborator;
use crate::window::{CaptureIntent, PaneMetrics};
use std::sync::Arc;

/// Result of one capture, delivered back to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Captured text with trailing newlines removed.
    Captured(String),
    /// Human-readable reason the capture failed.
    Failed(String),
}

impl CaptureOutcome {
    pub fn failed(err: &CaptureError) -> Self {
        CaptureOutcome::Failed(err.to_string())
    }
}

/// Status text for a failed capture.
pub fn failure_message(message: &str) -> String {
    format!("Capture failed:\n{message}")
}

/// Captures text from one pane through a [`PaneCollaborator`].
///
/// Cheap to clone so each worker can own a copy.
#[derive(Clone)]
pub struct CaptureEngine {
    collaborator: Arc<dyn PaneCollaborator>,
    pane: String,
}

impl CaptureEngine {
    pub fn new(collaborator: Arc<dyn PaneCollaborator>, pane: impl Into<String>) -> Self {
        Self {
            collaborator,
            pane: pane.into(),
        }
    }

    /// Run one capture to completion. Blocks on the collaborator.
    pub fn capture(&self, intent: CaptureIntent) -> CaptureOutcome {
        let range = match intent {
            CaptureIntent::FullScrollback => PaneMetrics::default().resolve(intent),
            _ => PaneMetrics::query(self.collaborator.as_ref(), &self.pane).resolve(intent),
        };
        log::debug!("capturing pane {} ({intent:?} -> {range:?})", self.pane);

        match self.collaborator.capture_pane(&self.pane, &range) {
            Ok(text) => CaptureOutcome::Captured(text.trim_end_matches('\n').to_string()),
            Err(e) => {
                log::warn!("capture of pane {} failed: {e}", self.pane);
                CaptureOutcome::failed(&e)
            }
        }
    }
}

impl std::fmt::Debug for CaptureEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureEngine")
            .field("pane", &self.pane)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::CaptureRange;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted pane answering from fixed variables and recording ranges.
    #[derive(Default)]
    struct ScriptedPane {
        vars: HashMap<&'static str, String>,
        output: Option<String>,
        ranges: Mutex<Vec<CaptureRange>>,
    }

    impl PaneCollaborator for ScriptedPane {
        fn display_var(&self, _pane: &str, name: &str) -> Result<String, CaptureError> {
            self.vars
                .get(name)
                .cloned()
                .ok_or_else(|| CaptureError::CommandFailed(format!("no {name}")))
        }

        fn capture_pane(&self, _pane: &str, range: &CaptureRange) -> Result<String, CaptureError> {
            self.ranges.lock().unwrap().push(*range);
            self.output
                .clone()
                .ok_or_else(|| CaptureError::CommandFailed("can't find pane: %9".to_string()))
        }

        fn set_buffer(&self, _text: &str) -> Result<(), CaptureError> {
            Ok(())
        }

        fn paste_buffer(&self, _pane: &str) -> Result<(), CaptureError> {
            Ok(())
        }
    }

    fn engine(pane: ScriptedPane) -> (CaptureEngine, Arc<ScriptedPane>) {
        let pane = Arc::new(pane);
        (CaptureEngine::new(pane.clone(), "%1"), pane)
    }

    #[test]
    fn test_scrolled_pane_requests_visible_window() {
        let (engine, pane) = engine(ScriptedPane {
            vars: HashMap::from([
                ("scroll_position", "5".to_string()),
                ("pane_height", "20\n".to_string()),
            ]),
            output: Some("a\nb\n\n".to_string()),
            ..Default::default()
        });

        let outcome = engine.capture(CaptureIntent::Visible);
        assert_eq!(outcome, CaptureOutcome::Captured("a\nb".to_string()));
        assert_eq!(*pane.ranges.lock().unwrap(), [CaptureRange::Between(-5, 14)]);
    }

    #[test]
    fn test_non_numeric_scroll_position_falls_back() {
        let (engine, pane) = engine(ScriptedPane {
            vars: HashMap::from([("scroll_position", "".to_string())]),
            output: Some("x".to_string()),
            ..Default::default()
        });

        engine.capture(CaptureIntent::Recent(10));
        assert_eq!(*pane.ranges.lock().unwrap(), [CaptureRange::From(-10)]);
    }

    #[test]
    fn test_query_failure_falls_back() {
        let (engine, pane) = engine(ScriptedPane {
            output: Some("x".to_string()),
            ..Default::default()
        });

        engine.capture(CaptureIntent::Visible);
        assert_eq!(*pane.ranges.lock().unwrap(), [CaptureRange::Screen]);
    }

    #[test]
    fn test_empty_capture_is_one_empty_line() {
        let (engine, _) = engine(ScriptedPane {
            output: Some("\n\n".to_string()),
            ..Default::default()
        });
        assert_eq!(
            engine.capture(CaptureIntent::FullScrollback),
            CaptureOutcome::Captured(String::new())
        );
    }

    #[test]
    fn test_failure_is_reported_not_raised() {
        let (engine, _) = engine(ScriptedPane::default());
        let outcome = engine.capture(CaptureIntent::Visible);
        assert_eq!(outcome, CaptureOutcome::Failed("can't find pane: %9".to_string()));
        if let CaptureOutcome::Failed(message) = &outcome {
            assert_eq!(failure_message(message), "Capture failed:\ncan't find pane: %9");
        }
    }

    #[test]
    fn test_timeout_message() {
        let outcome = CaptureOutcome::failed(&CaptureError::TimedOut(30));
        assert_eq!(outcome, CaptureOutcome::Failed("timed out after 30s".to_string()));
    }
}
