//! Configuration for LanKV
//!
//! Centralized configuration with sensible defaults.

use std::net::IpAddr;

/// Main configuration for a LanKV instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address for client connections
    pub listen_addr: String,

    // -------------------------------------------------------------------------
    // Replication Configuration
    // -------------------------------------------------------------------------
    /// Broadcast replication settings; `None` runs a standalone instance
    pub replication: Option<ReplicationConfig>,
}

/// Settings for best-effort broadcast replication between peers
#[derive(Debug, Clone)]
pub struct ReplicationConfig {
    /// UDP address the replication listener binds to
    pub listen_addr: String,

    /// Destination every local mutation is broadcast to
    pub broadcast_addr: String,

    /// Local bind address of the sending socket
    pub source_addr: String,

    /// Addresses that identify this process.
    /// Datagrams arriving from any of them are dropped as self-originated.
    /// `Server::open` fills an empty set with the discovered route address.
    pub local_addrs: Vec<IpAddr>,

    /// Receive buffer size; longer datagrams are truncated by the OS
    pub max_datagram_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:27015".to_string(),
            replication: None,
        }
    }
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:2306".to_string(),
            broadcast_addr: "255.255.255.255:2306".to_string(),
            source_addr: "0.0.0.0:0".to_string(),
            local_addrs: Vec::new(),
            max_datagram_size: 65_507, // largest IPv4 UDP payload
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

impl ReplicationConfig {
    /// Create a new replication config builder
    pub fn builder() -> ReplicationConfigBuilder {
        ReplicationConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Enable broadcast replication
    pub fn replication(mut self, replication: ReplicationConfig) -> Self {
        self.config.replication = Some(replication);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

/// Builder for ReplicationConfig
#[derive(Default)]
pub struct ReplicationConfigBuilder {
    config: ReplicationConfig,
}

impl ReplicationConfigBuilder {
    /// Set the UDP address to receive updates on
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the broadcast destination (host:port)
    pub fn broadcast_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.broadcast_addr = addr.into();
        self
    }

    /// Set the local bind address of the sending socket
    pub fn source_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.source_addr = addr.into();
        self
    }

    /// Replace the whole self-address set
    pub fn local_addrs(mut self, addrs: Vec<IpAddr>) -> Self {
        self.config.local_addrs = addrs;
        self
    }

    /// Set the datagram receive buffer size (in bytes)
    pub fn max_datagram_size(mut self, size: usize) -> Self {
        self.config.max_datagram_size = size;
        self
    }

    pub fn build(self) -> ReplicationConfig {
        self.config
    }
}
