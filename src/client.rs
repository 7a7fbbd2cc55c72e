//! Blocking Client
//!
//! Speaks the wire protocol over one TCP connection.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::{LanKvError, Result};
use crate::protocol::{read_reply, write_command, Command, Reply};

/// A client connection to a LanKV server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Insert or overwrite a key
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let reply = self.call(&Command::Put {
            key: key.to_vec(),
            value: value.to_vec(),
        })?;
        expect_ack(reply)
    }

    /// Get a value; `None` if the key does not exist
    pub fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.call(&Command::Get { key: key.to_vec() })? {
            Reply::Value(value) => Ok(Some(value)),
            Reply::Nil => Ok(None),
            Reply::Err => Err(LanKvError::Rejected),
            Reply::Ack => Err(LanKvError::Protocol("unexpected ack for get".into())),
        }
    }

    /// Delete a key
    pub fn delete(&mut self, key: &[u8]) -> Result<()> {
        let reply = self.call(&Command::Delete { key: key.to_vec() })?;
        expect_ack(reply)
    }

    /// Ask the server to close the connection
    pub fn bye(mut self) -> Result<()> {
        write_command(&mut self.writer, &Command::Bye)
    }

    fn call(&mut self, command: &Command) -> Result<Reply> {
        write_command(&mut self.writer, command)?;
        read_reply(&mut self.reader)
    }
}

fn expect_ack(reply: Reply) -> Result<()> {
    match reply {
        Reply::Ack => Ok(()),
        Reply::Err => Err(LanKvError::Rejected),
        other => Err(LanKvError::Protocol(format!("expected ack, got {:?}", other))),
    }
}
