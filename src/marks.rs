//! Mark store: user annotations attached to buffer lines.
//!
//! Marks are kept in creation order and looked up by linear scan. At most
//! one mark exists per line index.

/// Prefix written before a note in exported text.
pub const NOTE_EXPORT_PREFIX: &str = "[Q] ";

/// One marked line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mark {
    /// Index into the line buffer.
    pub line: usize,
    /// The line as it read when marked, truncated to the snapshot width.
    pub text: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkStore {
    marks: Vec<Mark>,
    snapshot_width: usize,
}

impl MarkStore {
    pub fn new(snapshot_width: usize) -> Self {
        Self {
            marks: Vec::new(),
            snapshot_width,
        }
    }

    /// Mark `line` if unmarked, otherwise unmark it. Returns whether the
    /// line is marked afterwards.
    pub fn toggle(&mut self, line: usize, line_text: &str) -> bool {
        if self.remove(line) {
            return false;
        }
        self.marks.push(Mark {
            line,
            text: truncate(line_text, self.snapshot_width),
            note: None,
        });
        true
    }

    /// Attach a note, creating the mark first if needed.
    pub fn set_note(&mut self, line: usize, line_text: &str, note: String) {
        if let Some(mark) = self.marks.iter_mut().find(|m| m.line == line) {
            mark.note = Some(note);
            return;
        }
        self.marks.push(Mark {
            line,
            text: truncate(line_text, self.snapshot_width),
            note: Some(note),
        });
    }

    /// Remove the mark on `line`, returning whether one existed.
    pub fn remove(&mut self, line: usize) -> bool {
        match self.marks.iter().position(|m| m.line == line) {
            Some(index) => {
                self.marks.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn has(&self, line: usize) -> bool {
        self.marks.iter().any(|m| m.line == line)
    }

    pub fn get(&self, line: usize) -> Option<&Mark> {
        self.marks.iter().find(|m| m.line == line)
    }

    /// The note on `line`, if the line is marked and has one.
    pub fn note(&self, line: usize) -> Option<&str> {
        self.get(line).and_then(|m| m.note.as_deref())
    }

    /// Marks in creation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Mark> {
        self.marks.iter()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    /// Render marks for the clipboard or a paste.
    ///
    /// Each snapshot goes on its own line, followed by `> [Q] <note>` when
    /// the mark has a note. No marks export to the empty string.
    pub fn export_text(&self) -> String {
        let mut out = String::new();
        for mark in &self.marks {
            out.push_str(&mark.text);
            out.push('\n');
            if let Some(note) = mark.note.as_deref().filter(|n| !n.is_empty()) {
                out.push_str("> ");
                out.push_str(NOTE_EXPORT_PREFIX);
                out.push_str(note);
                out.push('\n');
            }
        }
        out.trim().to_string()
    }
}

impl<'a> IntoIterator for &'a MarkStore {
    type Item = &'a Mark;
    type IntoIter = std::slice::Iter<'a, Mark>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Keep the first `max_chars` code points, appending `...` when cut.
pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_toggle_restores_store() {
        let mut store = MarkStore::new(60);
        store.toggle(1, "first");
        let before = store.clone();

        assert!(store.toggle(4, "second"));
        assert!(!store.toggle(4, "second"));
        assert_eq!(store, before);
    }

    #[test]
    fn test_truncate_is_char_based() {
        let line: String = "é".repeat(61);
        let snap = truncate(&line, 60);
        assert_eq!(snap.chars().count(), 63);
        assert!(snap.ends_with("..."));
        assert_eq!(snap.trim_end_matches("...").chars().count(), 60);

        let exact: String = "漢".repeat(60);
        assert_eq!(truncate(&exact, 60), exact);
        assert_eq!(truncate("", 60), "");
    }

    #[test]
    fn test_snapshot_is_not_refreshed() {
        let mut store = MarkStore::new(60);
        store.toggle(0, "original");
        store.set_note(0, "replaced", "n".to_string());
        assert_eq!(store.get(0).unwrap().text, "original");
        assert_eq!(store.note(0), Some("n"));
    }

    #[test]
    fn test_export_format() {
        let mut store = MarkStore::new(60);
        store.toggle(3, "foo");
        store.set_note(1, "bar", "why".to_string());
        assert_eq!(store.export_text(), "foo\nbar\n> [Q] why");
    }

    #[test]
    fn test_export_follows_creation_order() {
        let mut store = MarkStore::new(60);
        store.toggle(9, "late line");
        store.toggle(2, "early line");
        assert_eq!(store.export_text(), "late line\nearly line");
        assert_eq!(
            store.iter().map(|m| m.line).collect::<Vec<_>>(),
            vec![9, 2]
        );
    }

    #[test]
    fn test_empty_export() {
        assert_eq!(MarkStore::new(60).export_text(), "");
    }

    #[test]
    fn test_note_updates_in_place() {
        let mut store = MarkStore::new(60);
        store.toggle(0, "a");
        store.toggle(1, "b");
        store.set_note(0, "a", "first".to_string());
        store.set_note(0, "a", "second".to_string());
        assert_eq!(store.len(), 2);
        assert_eq!(store.iter().next().unwrap().note.as_deref(), Some("second"));
    }

    #[test]
    fn test_remove_keeps_order_of_rest() {
        let mut store = MarkStore::new(60);
        for line in [5, 1, 3] {
            store.toggle(line, "x");
        }
        assert!(store.remove(1));
        assert!(!store.remove(1));
        assert_eq!(store.iter().map(|m| m.line).collect::<Vec<_>>(), vec![5, 3]);
    }
}
