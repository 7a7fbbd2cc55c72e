//! Protocol Events
//!
//! Formatted event lines emitted while serving clients and peers.
//!
//! The server never writes these anywhere itself. Callers inject an
//! [`EventSink`] and decide where the lines go.

use std::fmt;
use std::net::SocketAddr;

use parking_lot::Mutex;

/// An observable step in the life of a connection or datagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A client connected on the stream transport
    ConnectionEstablished { peer: String },

    /// A 3-byte command code was read
    CommandReceived { code: [u8; 3] },

    /// An argument frame was decoded
    ArgumentReceived { arg: Vec<u8> },

    /// A value reply was written
    ValueSent { value: Vec<u8> },

    /// A replication datagram was accepted for dispatch
    UpdateReceived { from: SocketAddr, payload: Vec<u8> },

    /// A replication datagram was dropped because we sent it
    SelfUpdateIgnored { from: SocketAddr },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::ConnectionEstablished { peer } => write!(f, "{}: client connected", peer),
            Event::CommandReceived { code } => {
                write!(f, "command received: {}", String::from_utf8_lossy(code))
            }
            Event::ArgumentReceived { arg } => {
                write!(f, "received arg {}", String::from_utf8_lossy(arg))
            }
            Event::ValueSent { value } => {
                write!(
                    f,
                    "sent to client: val{}{}{}",
                    crate::protocol::digit_count(value.len()),
                    value.len(),
                    String::from_utf8_lossy(value)
                )
            }
            Event::UpdateReceived { from, payload } => {
                write!(f, "{} server sent update {}", from, String::from_utf8_lossy(payload))
            }
            Event::SelfUpdateIgnored { from } => write!(f, "{} ignoring update from self", from),
        }
    }
}

/// Destination for formatted event lines
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

/// Forwards every event to `tracing` at INFO level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: Event) {
        tracing::info!(target: "lankv::events", "{}", event);
    }
}

/// Keeps formatted lines in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line emitted so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: Event) {
        self.lines.lock().push(event.to_string());
    }
}
