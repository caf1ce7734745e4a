//! Per-connection handler.
//!
//! Reads newline-delimited JSON requests, forwards each one to the
//! annotation loop through the [`EventSlot`], and writes back exactly one
//! response line per request line. Blank lines are ignored. Lines that are
//! not UTF-8 or exceed [`MAX_REQUEST_LINE`] are answered with
//! `invalid request` and the connection keeps going.

use std::io;
use std::time::Duration;

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};

use crate::command::BridgeCommand;
use crate::error::BridgeError;
use crate::protocol::{BridgeRequest, BridgeResponse, parse_request};
use crate::slot::EventSlot;

/// Longest request line accepted, newline excluded.
pub const MAX_REQUEST_LINE: usize = 1024 * 1024;

enum Frame {
    Line,
    Oversized,
    Eof,
}

/// Handle a single client connection until it disconnects.
///
/// Waiting longer than `idle_timeout` for the next request line ends the
/// connection with [`BridgeError::Idle`].
pub async fn handle_client<S, E>(
    stream: S,
    slot: &EventSlot<E>,
    idle_timeout: Duration,
) -> Result<(), BridgeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    E: From<BridgeCommand>,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    loop {
        line.clear();
        let frame = tokio::time::timeout(idle_timeout, read_frame(&mut reader, &mut line))
            .await
            .map_err(|_| BridgeError::Idle(idle_timeout))??;

        let response = match frame {
            Frame::Eof => break,
            Frame::Oversized => {
                log::warn!("bridge request over {MAX_REQUEST_LINE} bytes, discarded");
                BridgeResponse::error(BridgeError::InvalidRequest)
            }
            Frame::Line => match std::str::from_utf8(&line).map(str::trim) {
                Ok("") => continue,
                Ok(text) => match parse_request(text) {
                    Ok(request) => dispatch(slot, request).await,
                    Err(e) => BridgeResponse::error(e),
                },
                Err(e) => {
                    log::debug!("bridge request is not UTF-8: {e}");
                    BridgeResponse::error(BridgeError::InvalidRequest)
                }
            },
        };

        writer.write_all(response.to_line()?.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Read one line into `buf`. A line longer than [`MAX_REQUEST_LINE`] is
/// consumed up to its newline but not kept.
async fn read_frame<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Frame>
where
    R: AsyncBufRead + Unpin,
{
    // One extra byte leaves room for the newline.
    let limit = MAX_REQUEST_LINE as u64 + 1;
    if (&mut *reader).take(limit).read_until(b'\n', buf).await? == 0 {
        return Ok(Frame::Eof);
    }
    if buf.last() == Some(&b'\n') || buf.len() <= MAX_REQUEST_LINE {
        return Ok(Frame::Line);
    }

    buf.clear();
    skip_line(reader).await?;
    Ok(Frame::Oversized)
}

/// Discard input up to and including the next newline.
async fn skip_line<R>(reader: &mut R) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                reader.consume(pos + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}

/// Queue one request on the annotation loop and wait for its reply.
pub async fn dispatch<E>(slot: &EventSlot<E>, request: BridgeRequest) -> BridgeResponse
where
    E: From<BridgeCommand>,
{
    let Some(sender) = slot.sender() else {
        log::debug!("bridge request {request:?} before the loop is ready");
        return BridgeResponse::error(BridgeError::NotReady);
    };

    let (command, reply) = BridgeCommand::new(request);
    if sender.send(E::from(command)).await.is_err() {
        return BridgeResponse::error(BridgeError::LoopClosed);
    }

    match reply.await {
        Ok(response) => response,
        Err(_) => BridgeResponse::error(BridgeError::ReplyDropped),
    }
}
