//! Local network address discovery.

use get_if_addrs::get_if_addrs;
use std::net::{IpAddr, Ipv4Addr};

/// First non-loopback IPv4 address of this machine, if any.
///
/// Recomputed on every call so network changes (Wi-Fi roam, cable pull)
/// are picked up without restarting the server. `None` means no suitable
/// interface exists right now; callers surface that as an absent address,
/// not an error.
pub fn local_ipv4() -> Option<Ipv4Addr> {
    let interfaces = get_if_addrs().ok()?;
    interfaces.into_iter().find_map(|iface| {
        let ip = iface.ip();
        if ip.is_loopback() {
            return None;
        }
        match ip {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ipv4_never_returns_loopback() {
        if let Some(ip) = local_ipv4() {
            assert!(!ip.is_loopback());
        }
    }
}
