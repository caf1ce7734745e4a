//! Unix domain socket listener.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UnixListener;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::command::BridgeCommand;
use crate::error::BridgeError;
use crate::handler::handle_client;
use crate::slot::EventSlot;

/// Maximum number of concurrent client connections.
const MAX_CONNECTIONS: usize = 64;

/// A client that sends nothing for this long is disconnected.
const CLIENT_IDLE_TIMEOUT: Duration = Duration::from_secs(300);

/// Bind the bridge socket and start accepting connections.
///
/// A stale socket from an earlier run is removed first and the new one is
/// restricted to the owner. Connections from other UIDs are dropped, as are
/// clients idle for longer than `CLIENT_IDLE_TIMEOUT`. Each
/// accepted connection gets its own task that forwards requests through
/// `slot`. Cancelling `cancel` stops the accept loop, and the socket file is
/// removed.
pub async fn start_server<E>(
    socket_path: PathBuf,
    slot: Arc<EventSlot<E>>,
    cancel: CancellationToken,
) -> Result<JoinHandle<()>, BridgeError>
where
    E: From<BridgeCommand> + Send + 'static,
{
    let _ = std::fs::remove_file(&socket_path);

    let listener = UnixListener::bind(&socket_path).map_err(|source| BridgeError::Bind {
        path: socket_path.clone(),
        source,
    })?;

    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&socket_path, std::fs::Permissions::from_mode(0o600))?;
    }

    log::info!("bridge listening on {}", socket_path.display());

    let semaphore = Arc::new(Semaphore::new(MAX_CONNECTIONS));

    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    log::info!("bridge shutting down");
                    let _ = std::fs::remove_file(&socket_path);
                    break;
                }
                result = listener.accept() => {
                    let stream = match result {
                        Ok((stream, _addr)) => stream,
                        Err(e) => {
                            log::error!("bridge accept error: {e}");
                            continue;
                        }
                    };

                    let my_uid = unsafe { libc::getuid() };
                    match stream.peer_cred() {
                        Ok(cred) if cred.uid() == my_uid => {
                            log::debug!("bridge client connected (UID {})", cred.uid());
                        }
                        Ok(cred) => {
                            log::warn!("rejected bridge connection from UID {}", cred.uid());
                            continue;
                        }
                        Err(e) => {
                            log::warn!("failed to get bridge peer credentials: {e}");
                            continue;
                        }
                    }

                    let permit = match semaphore.clone().try_acquire_owned() {
                        Ok(permit) => permit,
                        Err(_) => {
                            log::warn!("bridge connection limit reached, rejecting client");
                            continue;
                        }
                    };

                    let slot = slot.clone();
                    let cancel = cancel.clone();
                    tokio::spawn(async move {
                        tokio::select! {
                            _ = cancel.cancelled() => {}
                            result = handle_client(stream, slot.as_ref(), CLIENT_IDLE_TIMEOUT) => match result {
                                Ok(()) => log::debug!("bridge client disconnected"),
                                Err(e) => log::debug!("bridge client disconnected: {e}"),
                            },
                        }
                        drop(permit);
                    });
                }
            }
        }
    });

    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::BridgeClient;
    use crate::protocol::{MarkSummary, RawRequest};
    use tokio::sync::mpsc;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_socket_roundtrip_and_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.sock");
        std::fs::write(&path, b"stale").unwrap();

        let slot = Arc::new(EventSlot::<BridgeCommand>::new());
        let cancel = CancellationToken::new();
        let handle = start_server(path.clone(), slot.clone(), cancel.clone())
            .await
            .unwrap();

        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        let client_path = path.clone();
        let before_ready = tokio::task::spawn_blocking(move || {
            let mut client = BridgeClient::connect(&client_path).unwrap();
            client.send(&RawRequest::new("export")).unwrap()
        })
        .await
        .unwrap();
        assert_eq!(before_ready.message.as_deref(), Some("annotation loop not ready"));

        let (tx, mut rx) = mpsc::channel::<BridgeCommand>(4);
        slot.install(tx);
        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                command.respond(crate::BridgeResponse::result(&MarkSummary { marked: 1 }));
            }
        });

        let client_path = path.clone();
        let response = tokio::task::spawn_blocking(move || {
            let mut client = BridgeClient::connect(&client_path).unwrap();
            client
                .send(&RawRequest::new("mark").with_lines(vec![0]))
                .unwrap()
        })
        .await
        .unwrap();
        assert_eq!(response.data, Some(serde_json::json!({"marked": 1})));

        cancel.cancel();
        handle.await.unwrap();
        assert!(!path.exists());
    }
}
