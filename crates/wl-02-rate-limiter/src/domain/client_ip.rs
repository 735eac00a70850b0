//! Client IP extraction for rate-limit identifiers.
//!
//! Order: first address of `x-forwarded-for`, then `x-real-ip`, then
//! [`UNKNOWN_CLIENT`]. Values that do not parse as an IP address are skipped.

use std::collections::HashMap;
use std::net::IpAddr;

/// Identifier used when no client address can be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Read access to request headers, case-insensitive on the name.
pub trait HeaderLookup {
    fn header(&self, name: &str) -> Option<&str>;
}

impl HeaderLookup for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl<'a> HeaderLookup for [(&'a str, &'a str)] {
    fn header(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }
}

/// Best-effort client address.
pub fn client_ip<H: HeaderLookup + ?Sized>(headers: &H) -> String {
    // Try X-Forwarded-For first (original client is the first hop)
    if let Some(forwarded) = headers.header("x-forwarded-for") {
        if let Some(ip) = forwarded.split(',').next().and_then(parse_ip) {
            return ip.to_string();
        }
    }

    if let Some(ip) = headers.header("x-real-ip").and_then(parse_ip) {
        return ip.to_string();
    }

    UNKNOWN_CLIENT.to_string()
}

fn parse_ip(raw: &str) -> Option<IpAddr> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_first_forwarded_for() {
        let headers = [
            ("X-Forwarded-For", "203.0.113.7, 10.0.0.1"),
            ("X-Real-IP", "198.51.100.2"),
        ];
        assert_eq!(client_ip(&headers[..]), "203.0.113.7");
    }

    #[test]
    fn test_falls_back_to_real_ip() {
        let mut headers = HashMap::new();
        headers.insert("x-real-ip".to_string(), " 2001:db8::1 ".to_string());
        assert_eq!(client_ip(&headers), "2001:db8::1");
    }

    #[test]
    fn test_garbage_forwarded_for_is_skipped() {
        let headers = [("x-forwarded-for", "not-an-ip"), ("x-real-ip", "198.51.100.2")];
        assert_eq!(client_ip(&headers[..]), "198.51.100.2");
    }

    #[test]
    fn test_unknown_when_absent() {
        let headers: [(&str, &str); 0] = [];
        assert_eq!(client_ip(&headers[..]), UNKNOWN_CLIENT);
    }
}
