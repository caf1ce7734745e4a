//! Command bridge for clipnote.
//!
//! An external process connects to a Unix domain socket and sends one JSON
//! request per line. Each request is wrapped in a [`BridgeCommand`] and
//! pushed onto the annotation loop's own event queue, so bridge requests and
//! keystrokes are applied by the same single consumer in one total order.
//! The listener never holds the loop itself, only an [`EventSlot`] that the
//! loop fills with its queue sender once it is running.

pub mod client;
pub mod command;
mod error;
pub mod handler;
pub mod protocol;
pub mod server;
mod slot;
pub mod socket;

pub use client::{BridgeClient, request_from_args};
pub use command::BridgeCommand;
pub use error::BridgeError;
pub use protocol::{
    BridgeRequest, BridgeResponse, CaptureSummary, ExportSummary, MarkEntry, MarkSummary,
    RawRequest, ResponseKind, parse_request,
};
pub use server::start_server;
pub use slot::EventSlot;
pub use socket::{DEFAULT_SOCKET_PATH, SOCKET_ENV, socket_path};
