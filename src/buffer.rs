//! Line buffer holding captured pane text.

/// Lines appended by one capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appended {
    /// Index of the first captured line (after any separator).
    pub first_line: usize,
    /// Number of captured lines, excluding the separator.
    pub lines_captured: usize,
}

/// Append-only sequence of lines; indices stay valid until [`clear`](Self::clear).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
    capture_count: u32,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one capture's text.
    ///
    /// Every capture bumps the counter. A non-empty buffer first gets a
    /// `─── Capture #N ───` separator line.
    pub fn append_capture(&mut self, text: &str) -> Appended {
        self.capture_count += 1;
        if !self.lines.is_empty() {
            self.lines.push(separator(self.capture_count));
        }

        let first_line = self.lines.len();
        let text = text.trim_end_matches('\n');
        self.lines.extend(text.split('\n').map(str::to_string));
        Appended {
            first_line,
            lines_captured: self.lines.len() - first_line,
        }
    }

    /// Drop every line and reset the capture counter.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.capture_count = 0;
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capture_count(&self) -> u32 {
        self.capture_count
    }
}

fn separator(capture: u32) -> String {
    format!("─── Capture #{capture} ───")
}
