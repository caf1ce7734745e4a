//! File logging backend for the `log` facade.
//!
//! All output goes to /tmp/clipnote_debug.log on Unix (the temp directory
//! elsewhere) so log lines never land on the terminal the panel draws on.
//! Level precedence: `--log-level`, then `CLIPNOTE_LOG`, then the config
//! file. Off by default.

use clipnote_config::LogLevel;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Environment variable selecting the log level.
pub const LOG_ENV: &str = "CLIPNOTE_LOG";

struct FileLogger {
    file: Mutex<Option<File>>,
}

static LOGGER: OnceLock<FileLogger> = OnceLock::new();

pub fn log_path() -> PathBuf {
    #[cfg(unix)]
    {
        PathBuf::from("/tmp/clipnote_debug.log")
    }
    #[cfg(not(unix))]
    {
        std::env::temp_dir().join("clipnote_debug.log")
    }
}

/// Pick the effective level: CLI flag, then environment, then config.
pub fn resolve_level(cli: Option<&str>, config: LogLevel) -> LogLevel {
    let env = std::env::var(LOG_ENV).ok();
    cli.and_then(LogLevel::parse)
        .or_else(|| env.as_deref().and_then(LogLevel::parse))
        .unwrap_or(config)
}

/// Install the file logger. Safe to call more than once; only the first
/// call opens the file, later calls just adjust the level.
pub fn init(level: LogLevel) {
    let filter = level.to_level_filter();
    log::set_max_level(filter);
    if level == LogLevel::Off {
        return;
    }

    let logger = LOGGER.get_or_init(|| FileLogger {
        file: Mutex::new(open_log_file(level)),
    });
    // Fails only if a logger is already installed.
    let _ = log::set_logger(logger);
}

fn open_log_file(level: LogLevel) -> Option<File> {
    let path = log_path();
    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(&path)
        .ok()?;
    let rule = "=".repeat(80);
    let _ = write!(
        file,
        "\n{rule}\nclipnote debug session started at {} (level={level:?})\n{rule}\n",
        timestamp()
    );
    Some(file)
}

fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut guard = self.file.lock();
        if let Some(file) = guard.as_mut() {
            let _ = writeln!(
                file,
                "[{}] [{:<5}] [{}] {}",
                timestamp(),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}
