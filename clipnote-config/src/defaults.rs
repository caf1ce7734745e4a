//! Default value functions for configuration.
//!
//! Used as `#[serde(default = "crate::defaults::...")]` attributes on
//! [`Config`](crate::Config) fields so that a partial YAML file still
//! produces a complete configuration.

pub fn tmux_path() -> String {
    "tmux".to_string()
}

/// Left content panel width as a percentage of the terminal width.
pub fn split_ratio() -> u16 {
    70
}

pub fn split_ratio_min() -> u16 {
    30
}

pub fn split_ratio_max() -> u16 {
    90
}

pub fn split_ratio_step() -> u16 {
    5
}

/// Maximum characters accepted in the note editor.
pub fn note_char_limit() -> usize {
    500
}

/// Code points kept in a mark's text snapshot before the `...` suffix.
pub fn snapshot_width() -> usize {
    60
}

/// Seconds before a hung capture is reported as failed. 0 disables the timeout.
pub fn capture_timeout_secs() -> u64 {
    30
}

pub fn event_queue_capacity() -> usize {
    64
}
