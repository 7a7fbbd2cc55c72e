//! Protocol Module
//!
//! Defines the wire protocol for client-server and peer-to-peer traffic.
//!
//! ## Request Format
//! ```text
//! ┌──────────┬──────────────────────────────────────────────┐
//! │ Cmd (3)  │ Argument Frames                              │
//! └──────────┴──────────────────────────────────────────────┘
//! ```
//!
//! ### Commands
//! - `put` - Args: key, value
//! - `get` - Args: key
//! - `del` - Args: key
//! - `bye` - no args, closes the connection
//!
//! Unknown codes are ignored.
//!
//! ### Replies
//! - `ack` - mutation applied
//! - `err` - malformed arguments or store failure
//! - `nil` - key not found
//! - `val` + Argument Frame - value for `get`
//!
//! Replication datagrams carry the exact bytes of a `put` or `del` command.

mod command;
mod reply;
mod codec;

pub use command::{Command, CommandCode, COMMAND_LENGTH};
pub use reply::{Reply, ACK, ERR, NIL, VAL};
pub use codec::{
    digit_count, encode_argument, encode_command, encode_reply, encode_value_reply,
    read_argument, read_header, read_reply, write_command, write_reply, MAX_ARGUMENT_LEN,
};
