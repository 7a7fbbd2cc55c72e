//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread
//! - One thread per connection, no limit
//! - Commands from clients and peers routed through one Dispatcher

mod dispatch;
mod server;
mod connection;

pub use dispatch::{Dispatcher, Origin};
pub use server::{start_serving, start_serving_replicated, Server};
pub use connection::Connection;
