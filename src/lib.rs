//! # LanKV
//!
//! An in-memory key-value store with:
//! - A small self-delimiting TCP protocol (`put`/`get`/`del`/`bye`)
//! - A single owning worker that serializes every store operation
//! - Best-effort replication by UDP broadcast to peers on the same segment
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (one thread per connection)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Origin::Local
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Dispatcher                               │◄── Origin::Replicated
//! │          (decode → store → reply, broadcast local)          │          │
//! └──────────┬──────────────────────────────┬───────────────────┘          │
//!            │                              │                              │
//!            ▼                              ▼                              │
//!   ┌─────────────────┐          ┌─────────────────────┐        ┌──────────┴──────────┐
//!   │  Store Worker   │          │  UDP Broadcaster    │ ─────► │ Replication Listener│
//!   │ (rendezvous ch) │          │  (put/del frames)   │  peers │  (self-filtered)    │
//!   └─────────────────┘          └─────────────────────┘        └─────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod events;

pub mod protocol;
pub mod store;
pub mod network;
pub mod replication;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LanKvError, Result};
pub use config::{Config, ReplicationConfig};
pub use store::Store;
pub use client::Client;
pub use network::{start_serving, start_serving_replicated, Server};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of LanKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
