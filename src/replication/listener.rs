//! Replication Listener
//!
//! Receives peers' broadcasts and applies them locally.

use std::collections::HashSet;
use std::io::{self, Cursor};
use std::net::{IpAddr, SocketAddr, UdpSocket};
use std::thread::{self, JoinHandle};

use crate::config::ReplicationConfig;
use crate::error::Result;
use crate::events::Event;
use crate::network::{Dispatcher, Origin};

/// What happened to one inbound datagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatagramOutcome {
    /// Sent by this process, dropped
    Ignored,

    /// Dispatched as a replicated command
    Dispatched,

    /// Dispatch hit an I/O error; dropped
    Failed,
}

/// Receives replication datagrams on a UDP socket
pub struct ReplicationListener {
    socket: UdpSocket,
    dispatcher: Dispatcher,
    local_addrs: HashSet<IpAddr>,
    max_datagram_size: usize,
}

impl ReplicationListener {
    /// Bind the receiving socket described by `config`
    pub fn bind(config: &ReplicationConfig, dispatcher: Dispatcher) -> Result<Self> {
        let socket = UdpSocket::bind(&config.listen_addr)?;

        Ok(Self {
            socket,
            dispatcher,
            local_addrs: config.local_addrs.iter().map(IpAddr::to_canonical).collect(),
            max_datagram_size: config.max_datagram_size,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Whether a datagram from `from` is one of our own broadcasts
    pub fn is_self(&self, from: &SocketAddr) -> bool {
        self.local_addrs.contains(&from.ip().to_canonical())
    }

    /// Filter and dispatch one datagram
    ///
    /// Replies produced by the dispatch path are discarded.
    pub fn handle_datagram(&self, payload: &[u8], from: SocketAddr) -> DatagramOutcome {
        let sink = self.dispatcher.sink();

        if self.is_self(&from) {
            sink.emit(Event::SelfUpdateIgnored { from });
            return DatagramOutcome::Ignored;
        }

        sink.emit(Event::UpdateReceived {
            from,
            payload: payload.to_vec(),
        });

        let mut reader = Cursor::new(payload);
        match self.dispatcher.serve(&mut reader, &mut io::sink(), Origin::Replicated) {
            Ok(()) => DatagramOutcome::Dispatched,
            Err(e) => {
                tracing::debug!("Dropped update from {}: {}", from, e);
                DatagramOutcome::Failed
            }
        }
    }

    /// Receive and apply datagrams forever
    pub fn run(self) {
        tracing::info!(
            "Listening for updates at {}",
            self.local_addr()
                .map(|a| a.to_string())
                .unwrap_or_else(|_| "unknown".to_string())
        );

        let mut buffer = vec![0u8; self.max_datagram_size];
        loop {
            match self.socket.recv_from(&mut buffer) {
                Ok((n, from)) => {
                    self.handle_datagram(&buffer[..n], from);
                }
                Err(e) => tracing::debug!("Replication receive failed: {}", e),
            }
        }
    }

    /// Run the listener on its own thread
    pub fn spawn(self) -> Result<JoinHandle<()>> {
        Ok(thread::Builder::new()
            .name("lankv-replication".to_string())
            .spawn(move || self.run())?)
    }
}
