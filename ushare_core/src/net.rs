//! LAN address discovery for the share link.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

/// Routable address used only to make the OS pick an outbound interface.
/// Nothing is ever sent to it.
pub const ROUTE_PROBE_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 255, 255, 255)), 1);

/// Resolve the IPv4 address other devices on the LAN can reach us at.
///
/// Tries the routing probe, then the interface list, then gives up and
/// returns loopback. Never fails.
pub fn resolve_lan_address() -> IpAddr {
    if let Some(ip) = probe_route(ROUTE_PROBE_ADDR) {
        return ip;
    }

    if let Some(ip) = preferred_interface_address() {
        tracing::debug!("Route probe failed, using interface address {}", ip);
        return ip;
    }

    tracing::warn!("No LAN address found, falling back to loopback");
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

/// "Connect" a UDP socket to `target` and read back the local address the
/// kernel chose for it.
fn probe_route(target: SocketAddr) -> Option<IpAddr> {
    let socket = UdpSocket::bind(SocketAddr::from(([0, 0, 0, 0], 0))).ok()?;

    if let Err(e) = socket.connect(target) {
        tracing::debug!("Route probe to {} failed: {}", target, e);
        return None;
    }

    let ip = socket.local_addr().ok()?.ip();
    if ip.is_unspecified() || ip.is_loopback() {
        return None;
    }
    Some(ip)
}

/// Pick the best non-loopback IPv4 interface address, prioritizing LAN
/// ranges (192.168.x.x, 10.x.x.x, 172.x.x.x)
fn preferred_interface_address() -> Option<IpAddr> {
    let interfaces = local_ip_address::list_afinet_netifas().ok()?;
    pick_lan_address(interfaces.into_iter().map(|(_name, ip)| ip))
}

fn pick_lan_address(candidates: impl IntoIterator<Item = IpAddr>) -> Option<IpAddr> {
    let mut best_ip = None;
    let mut best_rank = u8::MAX;

    for ip in candidates {
        let IpAddr::V4(v4) = ip else {
            continue;
        };
        if v4.is_loopback() || v4.is_unspecified() {
            continue;
        }

        let rank = match v4.octets() {
            [192, 168, ..] => 0,
            [10, ..] => 1,
            [172, ..] => 2,
            _ => 3,
        };
        if rank < best_rank {
            best_rank = rank;
            best_ip = Some(ip);
        }
    }

    best_ip
}
