//! Command Dispatch
//!
//! The read-command / apply / reply loop shared by client connections and
//! replication datagrams.

use std::io::{ErrorKind, Read, Write};
use std::sync::Arc;

use crate::error::{LanKvError, Result};
use crate::events::{Event, EventSink};
use crate::protocol::{self, encode_command, read_header, write_reply, Command, CommandCode, Reply};
use crate::replication::Broadcaster;
use crate::store::Store;

/// Where a command came from
///
/// Only `Local` mutations are broadcast to peers. Replicated ones were
/// already broadcast by the peer that received them from a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Sent by a client over the stream transport
    Local,

    /// Received from a peer's broadcast
    Replicated,
}

/// Routes decoded commands to the store and encodes replies
#[derive(Clone)]
pub struct Dispatcher {
    store: Store,
    broadcaster: Arc<dyn Broadcaster>,
    sink: Arc<dyn EventSink>,
}

impl Dispatcher {
    pub fn new(store: Store, broadcaster: Arc<dyn Broadcaster>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            store,
            broadcaster,
            sink,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn sink(&self) -> &Arc<dyn EventSink> {
        &self.sink
    }

    /// Serve commands from `reader` until it is exhausted or a `bye` arrives
    ///
    /// Malformed arguments are answered with `err` and the loop continues.
    /// Returns `Ok` on EOF between commands; any other I/O failure is
    /// returned and no reply is attempted for the command in flight.
    pub fn serve<R: Read, W: Write>(
        &self,
        reader: &mut R,
        writer: &mut W,
        origin: Origin,
    ) -> Result<()> {
        loop {
            let code = match read_header(reader) {
                Ok(code) => code,
                Err(LanKvError::Io(ref e)) if e.kind() == ErrorKind::UnexpectedEof => {
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            self.sink.emit(Event::CommandReceived { code });

            match CommandCode::from_bytes(&code) {
                Some(CommandCode::Put) => self.handle_put(reader, writer, origin)?,
                Some(CommandCode::Get) => self.handle_get(reader, writer)?,
                Some(CommandCode::Delete) => self.handle_delete(reader, writer, origin)?,
                Some(CommandCode::Bye) => return Ok(()),
                None => {
                    tracing::trace!(
                        "Ignoring unknown command {:?}",
                        String::from_utf8_lossy(&code)
                    );
                }
            }
        }
    }

    // =========================================================================
    // Command Handlers
    // =========================================================================

    fn handle_put<R: Read, W: Write>(
        &self,
        reader: &mut R,
        writer: &mut W,
        origin: Origin,
    ) -> Result<()> {
        let key = match self.read_argument(reader)? {
            Some(key) => key,
            None => return write_reply(writer, &Reply::Err),
        };
        let value = match self.read_argument(reader)? {
            Some(value) => value,
            None => return write_reply(writer, &Reply::Err),
        };

        match self.store.put(key.clone(), value.clone()) {
            Ok(()) => {
                write_reply(writer, &Reply::Ack)?;
                if origin == Origin::Local {
                    self.replicate(&Command::Put { key, value });
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Put failed: {}", e);
                write_reply(writer, &Reply::Err)
            }
        }
    }

    fn handle_get<R: Read, W: Write>(&self, reader: &mut R, writer: &mut W) -> Result<()> {
        let key = match self.read_argument(reader)? {
            Some(key) => key,
            None => return write_reply(writer, &Reply::Err),
        };

        match self.store.get(&key) {
            Ok(value) => {
                write_reply(writer, &Reply::Value(value.clone()))?;
                self.sink.emit(Event::ValueSent { value });
                Ok(())
            }
            Err(LanKvError::KeyNotFound) => write_reply(writer, &Reply::Nil),
            Err(e) => {
                tracing::warn!("Get failed: {}", e);
                write_reply(writer, &Reply::Err)
            }
        }
    }

    fn handle_delete<R: Read, W: Write>(
        &self,
        reader: &mut R,
        writer: &mut W,
        origin: Origin,
    ) -> Result<()> {
        let key = match self.read_argument(reader)? {
            Some(key) => key,
            None => return write_reply(writer, &Reply::Err),
        };

        match self.store.delete(&key) {
            Ok(()) => {
                write_reply(writer, &Reply::Ack)?;
                if origin == Origin::Local {
                    self.replicate(&Command::Delete { key });
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Delete failed: {}", e);
                write_reply(writer, &Reply::Err)
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Decode one argument frame
    ///
    /// `Ok(None)` means the frame was malformed and the caller should reply
    /// `err`. Transport failures come back as `Err`.
    fn read_argument<R: Read>(&self, reader: &mut R) -> Result<Option<Vec<u8>>> {
        match protocol::read_argument(reader) {
            Ok(arg) => {
                self.sink.emit(Event::ArgumentReceived { arg: arg.clone() });
                Ok(Some(arg))
            }
            Err(e) if e.is_decode_error() => {
                tracing::debug!("Malformed argument: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Broadcast a mutation to peers, best effort
    fn replicate(&self, command: &Command) {
        let result = encode_command(command).and_then(|frame| self.broadcaster.broadcast(&frame));
        if let Err(e) = result {
            tracing::trace!("Dropped replication of {:?}: {}", command.code(), e);
        }
    }
}
