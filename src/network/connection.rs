//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{BufReader, BufWriter, ErrorKind};
use std::net::TcpStream;

use crate::error::{LanKvError, Result};
use crate::events::Event;
use super::{Dispatcher, Origin};

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (flushed after every reply)
    writer: BufWriter<TcpStream>,

    /// Shared command router
    dispatcher: Dispatcher,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, dispatcher: Dispatcher) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            dispatcher,
            peer_addr,
        })
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Returns when the client sends `bye`, disconnects, or the transport fails.
    /// Reads have no deadline.
    pub fn handle(&mut self) -> Result<()> {
        self.dispatcher.sink().emit(Event::ConnectionEstablished {
            peer: self.peer_addr.clone(),
        });

        match self
            .dispatcher
            .serve(&mut self.reader, &mut self.writer, Origin::Local)
        {
            Ok(()) => {
                tracing::debug!("Client {} disconnected", self.peer_addr);
                Ok(())
            }
            Err(LanKvError::Io(ref e))
                if matches!(
                    e.kind(),
                    ErrorKind::ConnectionReset
                        | ErrorKind::ConnectionAborted
                        | ErrorKind::BrokenPipe
                ) =>
            {
                tracing::debug!("Connection to {} dropped: {}", self.peer_addr, e);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Error serving {}: {}", self.peer_addr, e);
                Err(e)
            }
        }
    }
}
