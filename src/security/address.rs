//! Private/reserved address classification.
//!
//! Blocked IPv4 ranges:
//! - 0.0.0.0/8 (this network)
//! - 10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16 (RFC 1918)
//! - 100.64.0.0/10 (carrier-grade NAT)
//! - 127.0.0.0/8 (loopback)
//! - 169.254.0.0/16 (link-local, cloud metadata endpoints)
//! - 224.0.0.0/4 (multicast), 240.0.0.0/4 (reserved, broadcast)
//!
//! Blocked IPv6 ranges: `::`, `::1`, fe80::/10, fc00::/7 (covers fd00::/8),
//! ff00::/8, and IPv4-mapped / IPv4-compatible addresses by their IPv4 rule.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Returns true if connecting to `ip` would reach a private or reserved network.
pub fn is_forbidden_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_forbidden_ipv4(v4),
        IpAddr::V6(v6) => is_forbidden_ipv6(v6),
    }
}

pub(crate) fn is_forbidden_ipv4(ip: Ipv4Addr) -> bool {
    let o = ip.octets();
    // This-network 0.0.0.0/8
    if o[0] == 0 {
        return true;
    }
    // Private 10.0.0.0/8
    if o[0] == 10 {
        return true;
    }
    // Carrier-grade NAT 100.64.0.0/10
    if o[0] == 100 && (o[1] & 0xc0) == 64 {
        return true;
    }
    // Loopback 127.0.0.0/8
    if o[0] == 127 {
        return true;
    }
    // Link-local 169.254.0.0/16
    if o[0] == 169 && o[1] == 254 {
        return true;
    }
    // Private 172.16.0.0/12
    if o[0] == 172 && (16..=31).contains(&o[1]) {
        return true;
    }
    // Private 192.168.0.0/16
    if o[0] == 192 && o[1] == 168 {
        return true;
    }
    // Multicast 224.0.0.0/4, reserved 240.0.0.0/4
    o[0] >= 224
}

pub(crate) fn is_forbidden_ipv6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = embedded_ipv4(ip) {
        return is_forbidden_ipv4(v4);
    }
    let s = ip.segments();
    // :: unspecified, ::1 loopback
    if s[..7] == [0; 7] && s[7] <= 1 {
        return true;
    }
    // fe80::/10 link-local
    if (s[0] & 0xffc0) == 0xfe80 {
        return true;
    }
    // fc00::/7 unique-local
    if (s[0] & 0xfe00) == 0xfc00 {
        return true;
    }
    // ff00::/8 multicast
    (s[0] & 0xff00) == 0xff00
}

/// IPv4 address carried by an IPv4-mapped (`::ffff:a.b.c.d`) or deprecated
/// IPv4-compatible (`::a.b.c.d`) IPv6 address.
fn embedded_ipv4(ip: Ipv6Addr) -> Option<Ipv4Addr> {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return Some(v4);
    }
    let s = ip.segments();
    // ::a.b.c.d, excluding :: and ::1 which keep their IPv6 meaning
    if s[..6] == [0; 6] && (s[6] != 0 || s[7] > 1) {
        let [a, b] = s[6].to_be_bytes();
        let [c, d] = s[7].to_be_bytes();
        return Some(Ipv4Addr::new(a, b, c, d));
    }
    None
}
