//! Replication Module
//!
//! Best-effort propagation of mutations between peers on one network segment.
//!
//! ## Architecture
//! - Every locally-originated `put`/`del` is re-encoded byte-for-byte and sent
//!   as one UDP datagram to a broadcast address
//! - Each peer runs a listener thread that feeds accepted datagrams through
//!   the same dispatch path as client connections, tagged `Replicated`
//! - Datagrams from our own addresses are dropped
//!
//! No acknowledgements, retries or ordering guarantees.

mod broadcaster;
mod listener;

pub use broadcaster::{discover_local_ip, Broadcaster, NoBroadcast, UdpBroadcaster};
pub use listener::{DatagramOutcome, ReplicationListener};
