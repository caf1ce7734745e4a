//! clipnote: annotate scrollback captured from a paired tmux pane.
//!
//! The panel captures text from another pane into a line buffer, lets the
//! user mark lines and attach notes, and exports the marks to the clipboard
//! or back into the pane. An external process can drive the same panel over
//! the command bridge socket.

pub mod annotate;
pub mod buffer;
pub mod cli;
pub mod debug;
pub mod delivery;
pub mod event_loop;
pub mod keys;
pub mod marks;
pub mod tui;
pub mod watch;
