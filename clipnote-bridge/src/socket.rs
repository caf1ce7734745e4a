//! Socket path resolution.

use std::path::{Path, PathBuf};

/// Environment variable overriding the socket path.
pub const SOCKET_ENV: &str = "CLIPNOTE_SOCKET";

/// Socket used when nothing else is configured.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/clipnote.sock";

/// Determine the bridge socket path.
///
/// Priority:
/// 1. An explicit path (the `--socket` flag)
/// 2. `$CLIPNOTE_SOCKET`
/// 3. `socket_path` from the config file
/// 4. `/tmp/clipnote.sock`
pub fn socket_path(explicit: Option<&Path>, configured: Option<&Path>) -> PathBuf {
    let env = std::env::var_os(SOCKET_ENV).map(PathBuf::from);
    resolve_socket_path(explicit, env.as_deref(), configured)
}

/// Pure resolution, no environment access.
fn resolve_socket_path(
    explicit: Option<&Path>,
    env: Option<&Path>,
    configured: Option<&Path>,
) -> PathBuf {
    explicit
        .or(env.filter(|p| !p.as_os_str().is_empty()))
        .or(configured)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOCKET_PATH))
}
