//! Synchronous client for a running annotation panel.

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::Duration;

use crate::error::BridgeError;
use crate::protocol::{BridgeResponse, MARK, RawRequest};

/// Longest wait for a reply; a bridge capture may sit behind a slow tmux.
const READ_TIMEOUT: Duration = Duration::from_secs(60);

/// One connection to the bridge socket. Requests are answered in order.
pub struct BridgeClient {
    reader: BufReader<UnixStream>,
    writer: UnixStream,
}

impl BridgeClient {
    pub fn connect(path: &Path) -> Result<Self, BridgeError> {
        let stream = UnixStream::connect(path).map_err(|source| BridgeError::Connect {
            path: path.to_path_buf(),
            source,
        })?;
        stream.set_read_timeout(Some(READ_TIMEOUT))?;
        let writer = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
        })
    }

    /// Send a request and return the response line as received.
    pub fn send_raw(&mut self, request: &RawRequest) -> Result<String, BridgeError> {
        let mut line = serde_json::to_string(request)?;
        line.push('\n');
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;

        let mut response = String::new();
        if self.reader.read_line(&mut response)? == 0 {
            return Err(BridgeError::Closed);
        }
        Ok(response.trim_end().to_string())
    }

    /// Send a request and decode the response.
    pub fn send(&mut self, request: &RawRequest) -> Result<BridgeResponse, BridgeError> {
        let line = self.send_raw(request)?;
        Ok(serde_json::from_str(&line)?)
    }
}

/// Build a request from command-line words.
///
/// For `mark`, every argument that parses as an integer becomes a line
/// index; anything else is skipped.
pub fn request_from_args(command: &str, args: &[String]) -> RawRequest {
    let request = RawRequest::new(command);
    if command != MARK || args.is_empty() {
        return request;
    }

    let lines = args
        .iter()
        .filter_map(|arg| match arg.trim().parse::<i64>() {
            Ok(n) => Some(n),
            Err(_) => {
                log::warn!("ignoring non-numeric line {arg:?}");
                None
            }
        })
        .collect();
    request.with_lines(lines)
}
