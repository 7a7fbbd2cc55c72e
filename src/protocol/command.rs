//! Command definitions
//!
//! Represents commands from clients and replicating peers.

/// Width of every command code on the wire
pub const COMMAND_LENGTH: usize = 3;

/// Command codes understood by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandCode {
    Put,
    Get,
    Delete,
    Bye,
}

impl CommandCode {
    /// The 3 ASCII bytes sent on the wire
    pub fn as_bytes(&self) -> &'static [u8; COMMAND_LENGTH] {
        match self {
            CommandCode::Put => b"put",
            CommandCode::Get => b"get",
            CommandCode::Delete => b"del",
            CommandCode::Bye => b"bye",
        }
    }

    /// Recognize a command code; `None` for anything unknown
    pub fn from_bytes(code: &[u8; COMMAND_LENGTH]) -> Option<Self> {
        match code {
            b"put" => Some(CommandCode::Put),
            b"get" => Some(CommandCode::Get),
            b"del" => Some(CommandCode::Delete),
            b"bye" => Some(CommandCode::Bye),
            _ => None,
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert or overwrite a key
    Put { key: Vec<u8>, value: Vec<u8> },

    /// Get a value by key
    Get { key: Vec<u8> },

    /// Delete a key
    Delete { key: Vec<u8> },

    /// Close the connection
    Bye,
}

impl Command {
    /// Get the command code
    pub fn code(&self) -> CommandCode {
        match self {
            Command::Put { .. } => CommandCode::Put,
            Command::Get { .. } => CommandCode::Get,
            Command::Delete { .. } => CommandCode::Delete,
            Command::Bye => CommandCode::Bye,
        }
    }

    /// Whether the command changes the store (and so gets replicated)
    pub fn is_mutation(&self) -> bool {
        matches!(self, Command::Put { .. } | Command::Delete { .. })
    }
}
