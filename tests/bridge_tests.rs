//! End-to-end tests: a real bridge socket in front of a running event loop,
//! driven by the synchronous client the `ipc` subcommand uses.

mod common;

use clipnote::event_loop::{AppEvent, EventLoop};
use clipnote::keys::Key;
use clipnote_bridge::{
    BridgeClient, BridgeError, EventSlot, RawRequest, request_from_args, start_server,
};
use common::{RecordingDelivery, ScriptedPane};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Step the loop until the blocking client task finishes, then return its result.
async fn drive<T>(lp: &mut EventLoop, mut client: JoinHandle<T>) -> T {
    loop {
        tokio::select! {
            result = &mut client => return result.unwrap(),
            flow = lp.step() => assert!(flow.is_some_and(|f| f.is_continue())),
        }
    }
}

async fn serve(
    pane: Arc<ScriptedPane>,
) -> (EventLoop, PathBuf, CancellationToken, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clipnote.sock");
    let (lp, tx) = common::event_loop(pane, RecordingDelivery::default());

    let slot: Arc<EventSlot<AppEvent>> = Arc::new(EventSlot::new());
    slot.install(tx);
    let cancel = CancellationToken::new();
    start_server(path.clone(), slot, cancel.clone()).await.unwrap();
    (lp, path, cancel, dir)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_capture_mark_export_over_socket() {
    let pane = ScriptedPane::with_text(
        "cargo build\nerror[E0382]: borrow of moved value\nnote: move occurs here",
    );
    let (mut lp, path, cancel, _dir) = serve(pane).await;

    let client = tokio::task::spawn_blocking(move || {
        let mut client = BridgeClient::connect(&path)?;
        let captured = client.send_raw(&RawRequest::new("capture"))?;
        let args = ["1".to_string(), "x".to_string(), "99".to_string()];
        let marked = client.send_raw(&request_from_args("mark", &args))?;
        let marks = client.send_raw(&RawRequest::new("get-marks"))?;
        let exported = client.send(&RawRequest::new("export"))?;
        Ok::<_, BridgeError>((captured, marked, marks, exported))
    });
    let (captured, marked, marks, exported) = drive(&mut lp, client).await.unwrap();

    assert_eq!(
        captured,
        r#"{"type":"result","data":{"lines_captured":3,"total_lines":3}}"#
    );
    assert_eq!(marked, r#"{"type":"result","data":{"marked":1}}"#);
    assert_eq!(
        marks,
        r#"{"type":"result","data":[{"line":1,"text":"error[E0382]: borrow of moved value"}]}"#
    );
    assert_eq!(
        exported.data,
        Some(serde_json::json!({
            "exported": "error[E0382]: borrow of moved value",
            "status": "Copied 1 marks to clipboard"
        }))
    );
    assert!(lp.annotator().marks().has(1));
    cancel.cancel();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_bad_requests_get_error_lines() {
    let (mut lp, path, cancel, _dir) = serve(ScriptedPane::with_text("x")).await;

    let client = tokio::task::spawn_blocking(move || {
        let mut client = BridgeClient::connect(&path)?;
        let unknown = client.send_raw(&RawRequest::new("frobnicate"))?;
        let no_lines = client.send_raw(&RawRequest::new("mark"))?;
        Ok::<_, BridgeError>((unknown, no_lines))
    });
    let (unknown, no_lines) = drive(&mut lp, client).await.unwrap();

    assert_eq!(
        unknown,
        r#"{"type":"error","message":"unknown command: frobnicate"}"#
    );
    assert_eq!(no_lines, r#"{"type":"error","message":"no lines specified"}"#);
    cancel.cancel();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_socket_and_keyboard_share_one_state() {
    let (mut lp, path, cancel, _dir) = serve(ScriptedPane::with_text("a\nb\nc")).await;
    lp.handle_event(AppEvent::Key(Key::Char('r')));
    // Wait for the capture worker to report back.
    assert!(lp.step().await.is_some());
    lp.handle_event(AppEvent::Key(Key::Char('m')));

    let client = tokio::task::spawn_blocking(move || {
        let mut client = BridgeClient::connect(&path)?;
        client.send(&RawRequest::new("mark").with_lines(vec![0, 2]))
    });
    let response = drive(&mut lp, client).await.unwrap();

    assert_eq!(response.data, Some(serde_json::json!({"marked": 1})));
    let lines: Vec<usize> = lp.annotator().marks().iter().map(|m| m.line).collect();
    assert_eq!(lines, [0, 2]);
    cancel.cancel();
}

#[test]
fn test_connect_without_panel() {
    let dir = tempfile::tempdir().unwrap();
    let err = match BridgeClient::connect(&dir.path().join("missing.sock")) {
        Ok(_) => panic!("connected to a socket that does not exist"),
        Err(e) => e,
    };
    assert!(err.to_string().contains("is the annotation panel running?"));
}
