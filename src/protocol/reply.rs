//! Reply definitions
//!
//! Represents replies sent back to clients.

/// Token for a successful mutation
pub const ACK: &[u8; 3] = b"ack";

/// Token for a malformed command or failed store operation
pub const ERR: &[u8; 3] = b"err";

/// Token for a `get` on a missing key
pub const NIL: &[u8; 3] = b"nil";

/// Prefix of a value reply
pub const VAL: &[u8; 3] = b"val";

/// A reply to send to a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ack,
    Err,
    Nil,
    /// `val` followed by a length-prefixed payload
    Value(Vec<u8>),
}

impl Reply {
    /// The leading 3-byte token
    pub fn token(&self) -> &'static [u8; 3] {
        match self {
            Reply::Ack => ACK,
            Reply::Err => ERR,
            Reply::Nil => NIL,
            Reply::Value(_) => VAL,
        }
    }
}
