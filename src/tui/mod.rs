//! Terminal front-end: raw mode, the keyboard reader thread and drawing.

mod view;

use std::io::{self, Stdout};
use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::annotate::Annotator;
use crate::event_loop::AppEvent;
use crate::keys::Key;

pub use view::render;

/// How often the reader thread wakes to notice the loop has gone away.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Owns the terminal while the panel runs; restores it on drop.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    pub fn init() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    pub fn rows(&self) -> io::Result<u16> {
        Ok(self.terminal.size()?.height)
    }

    pub fn draw(&mut self, annotator: &Annotator) -> io::Result<()> {
        self.terminal.draw(|frame| render(frame, annotator))?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(LeaveAlternateScreen);
    }
}

/// Read terminal events on a dedicated thread and queue them for the loop.
///
/// The thread exits once the loop's receiver is dropped.
pub fn spawn_input_thread(tx: mpsc::Sender<AppEvent>) -> io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("clipnote-input".to_string())
        .spawn(move || {
            loop {
                if tx.is_closed() {
                    break;
                }
                match event::poll(POLL_INTERVAL) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(e) => {
                        log::error!("terminal poll failed: {e}");
                        break;
                    }
                }
                let app_event = match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        AppEvent::Key(key_from_event(key))
                    }
                    Ok(Event::Resize(_, rows)) => AppEvent::Resize { rows },
                    Ok(_) => continue,
                    Err(e) => {
                        log::error!("terminal read failed: {e}");
                        break;
                    }
                };
                if tx.blocking_send(app_event).is_err() {
                    break;
                }
            }
            log::debug!("input thread exiting");
        })
}

/// Translate a crossterm key event into the panel's key model.
pub fn key_from_event(event: KeyEvent) -> Key {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    match event.code {
        KeyCode::Char(c) if ctrl => Key::Ctrl(c.to_ascii_lowercase()),
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Esc => Key::Esc,
        _ => Key::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_letters_are_normalized() {
        let event = KeyEvent::new(KeyCode::Char('R'), KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        assert_eq!(key_from_event(event), Key::Ctrl('r'));
    }

    #[test]
    fn shifted_letters_stay_chars() {
        let event = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(key_from_event(event), Key::Char('G'));
    }

    #[test]
    fn unhandled_codes_are_other() {
        let event = KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE);
        assert_eq!(key_from_event(event), Key::Other);
    }
}
