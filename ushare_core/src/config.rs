use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default HTTP port for sharing
pub const DEFAULT_PORT: u16 = 9050;

/// Environment variable that overrides the port
pub const PORT_ENV: &str = "USHARE_PORT";

/// Listener settings, built once by the CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    /// Interface to listen on (all interfaces by default)
    pub bind_ip: IpAddr,
    pub port: u16,
    /// Enables per-request tracing
    pub debug: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            debug: false,
        }
    }
}

impl ServeConfig {
    pub fn new(port: u16, debug: bool) -> Self {
        Self {
            port,
            debug,
            ..Default::default()
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }
}
