//! Cursor and scroll offset over the line buffer.

/// Rows taken by the header and status line.
pub const CHROME_ROWS: u16 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    cursor: usize,
    offset: usize,
    /// Content rows; zero until the terminal size is known.
    visible_height: usize,
}

impl Viewport {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn visible_height(&self) -> usize {
        self.visible_height
    }

    /// Record the terminal height and keep the cursor on screen.
    pub fn set_terminal_height(&mut self, rows: u16) {
        self.visible_height = usize::from(rows.saturating_sub(CHROME_ROWS));
        self.sync();
    }

    pub fn move_to(&mut self, line: usize) {
        self.cursor = line;
        self.sync();
    }

    /// Cursor and offset back to the top.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.offset = 0;
    }

    /// Keep the cursor within `[offset, offset + visible_height)`.
    fn sync(&mut self) {
        if self.visible_height == 0 {
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        }
        if self.cursor >= self.offset + self.visible_height {
            self.offset = self.cursor + 1 - self.visible_height;
        }
    }
}
