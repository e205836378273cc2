//! Hostname verification
//!
//! Compares a requested hostname against the identities a certificate
//! claims. Subject Alternative Name entries win over the subject Common
//! Name: once a certificate carries any SAN DNS entry, its Common Name is
//! never consulted.
//!
//! Wildcards are only honoured as the complete left-most label of a DNS
//! pattern and cover exactly one label. IP literal hostnames are compared
//! against SAN IP-address entries only.

use std::net::IpAddr;

/// A single Subject Alternative Name entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectAltName {
    /// dNSName entry
    Dns(String),
    /// iPAddress entry
    Ip(IpAddr),
}

impl SubjectAltName {
    /// DNS name, if this is a dNSName entry
    pub fn dns_name(&self) -> Option<&str> {
        match self {
            SubjectAltName::Dns(name) => Some(name),
            SubjectAltName::Ip(_) => None,
        }
    }

    /// IP address, if this is an iPAddress entry
    pub fn ip_address(&self) -> Option<IpAddr> {
        match self {
            SubjectAltName::Dns(_) => None,
            SubjectAltName::Ip(addr) => Some(*addr),
        }
    }
}

/// Identities claimed by a peer certificate
pub trait PeerIdentity {
    /// Subject Alternative Name entries
    ///
    /// `None` when the certificate has no SAN extension or the extension
    /// cannot be parsed.
    fn subject_alt_names(&self) -> Option<Vec<SubjectAltName>>;

    /// All Common Name entries of the subject
    fn common_names(&self) -> Vec<String>;
}

/// Check whether `hostname` is one of the identities of `cert`
pub fn validate_hostname<C: PeerIdentity + ?Sized>(hostname: &str, cert: &C) -> bool {
    let sans = cert.subject_alt_names().unwrap_or_default();

    // The root dot goes first so "192.0.2.1." still takes the IP path
    let host = strip_root(hostname);
    if let Some(ip) = parse_ip_literal(host) {
        return sans.iter().any(|san| san.ip_address() == Some(ip));
    }

    if host.is_empty() || host.contains('*') {
        return false;
    }

    let dns_names: Vec<&str> = sans.iter().filter_map(SubjectAltName::dns_name).collect();
    if !dns_names.is_empty() {
        return dns_names.iter().any(|pattern| name_matches(pattern, host));
    }

    cert.common_names()
        .iter()
        .any(|cn| name_matches(cn, host))
}

/// Parse a v4 or v6 literal, accepting the bracketed URL form of v6
fn parse_ip_literal(hostname: &str) -> Option<IpAddr> {
    let literal = hostname
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(hostname);
    literal.parse().ok()
}

fn strip_root(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Match one certificate name pattern against a DNS hostname
fn name_matches(pattern: &str, host: &str) -> bool {
    let pattern = strip_root(pattern);
    if pattern.is_empty() {
        return false;
    }

    if !pattern.contains('*') {
        return pattern.eq_ignore_ascii_case(host);
    }

    // Only "*.<at least two labels>" is a valid wildcard
    let suffix = match pattern.strip_prefix("*.") {
        Some(suffix) => suffix,
        None => return false,
    };
    if suffix.contains('*') || !suffix.contains('.') {
        return false;
    }

    match host.split_once('.') {
        Some((label, rest)) => !label.is_empty() && rest.eq_ignore_ascii_case(suffix),
        None => false,
    }
}
