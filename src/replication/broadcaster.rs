//! Replication Broadcaster
//!
//! Sends mutation frames to peers.

use std::net::{IpAddr, SocketAddr, ToSocketAddrs, UdpSocket};

use crate::error::{LanKvError, Result};

/// Fan-out of locally-originated mutation frames
pub trait Broadcaster: Send + Sync {
    /// Send one already-encoded command frame
    fn broadcast(&self, frame: &[u8]) -> Result<()>;
}

/// Broadcaster for a standalone instance
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBroadcast;

impl Broadcaster for NoBroadcast {
    fn broadcast(&self, _frame: &[u8]) -> Result<()> {
        Ok(())
    }
}

/// Sends each frame as a single UDP datagram to a fixed target
#[derive(Debug)]
pub struct UdpBroadcaster {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpBroadcaster {
    /// Bind the sending socket on `source_addr` and resolve `target`
    pub fn bind(source_addr: &str, target: &str) -> Result<Self> {
        let target = resolve(target)?;
        let socket = UdpSocket::bind(source_addr)?;
        socket.set_broadcast(true)?;

        Ok(Self { socket, target })
    }

    /// Address the datagrams are sent from
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}

impl Broadcaster for UdpBroadcaster {
    fn broadcast(&self, frame: &[u8]) -> Result<()> {
        self.socket.send_to(frame, self.target)?;
        Ok(())
    }
}

/// Find the address this host uses to reach `target`
///
/// Connects an unbound UDP socket (no packet is sent) and reads back the
/// local address the OS picked for the route.
pub fn discover_local_ip(target: &str) -> Result<IpAddr> {
    let target = resolve(target)?;
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.set_broadcast(true)?;
    socket.connect(target)?;

    let ip = socket.local_addr()?.ip();
    if ip.is_unspecified() {
        return Err(LanKvError::Config(format!("No route to {}", target)));
    }

    Ok(ip)
}

fn resolve(addr: &str) -> Result<SocketAddr> {
    addr.to_socket_addrs()
        .map_err(|e| LanKvError::Config(format!("Invalid address {:?}: {}", addr, e)))?
        .next()
        .ok_or_else(|| LanKvError::Config(format!("Address {:?} resolved to nothing", addr)))
}
