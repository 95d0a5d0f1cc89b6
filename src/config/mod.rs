// Configuration module entry point
// Holds the immutable server configuration built once at startup

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Fixed listen port of the dev server.
pub const DEFAULT_PORT: u16 = 8000;

/// Immutable server configuration, set once at process start.
///
/// The binary takes no flags; `from_executable` produces the fixed defaults
/// (port 8000, root next to the binary). Tests and embedders construct one
/// directly with `new`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub root: PathBuf,
}

impl ServerConfig {
    pub const fn new(port: u16, root: PathBuf) -> Self {
        Self { port, root }
    }

    /// Build the default configuration: port 8000, serving the directory
    /// that contains the server executable.
    pub fn from_executable() -> io::Result<Self> {
        let exe = std::env::current_exe()?;
        let root = exe
            .parent()
            .map_or_else(|| PathBuf::from("."), std::path::Path::to_path_buf);
        Ok(Self::new(DEFAULT_PORT, root))
    }

    /// Listen address: all interfaces on the configured port.
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port)
    }
}
