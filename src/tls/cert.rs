//! Certificate identity extraction
//!
//! This module reads the identities (Subject Alternative Names and subject
//! Common Names) out of X.509 certificates for hostname verification.

use super::hostname::{PeerIdentity, SubjectAltName};
use openssl::nid::Nid;
use openssl::x509::{X509, X509NameRef, X509Ref};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

impl PeerIdentity for X509Ref {
    fn subject_alt_names(&self) -> Option<Vec<SubjectAltName>> {
        let names = X509Ref::subject_alt_names(self)?;
        let entries = names
            .iter()
            .filter_map(|name| {
                if let Some(dns) = name.dnsname() {
                    Some(SubjectAltName::Dns(dns.to_string()))
                } else {
                    name.ipaddress().and_then(ip_from_octets).map(SubjectAltName::Ip)
                }
            })
            .collect();
        Some(entries)
    }

    fn common_names(&self) -> Vec<String> {
        get_cns(self.subject_name())
    }
}

impl PeerIdentity for X509 {
    fn subject_alt_names(&self) -> Option<Vec<SubjectAltName>> {
        PeerIdentity::subject_alt_names(&**self)
    }

    fn common_names(&self) -> Vec<String> {
        PeerIdentity::common_names(&**self)
    }
}

/// Owned snapshot of a certificate's identities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateNames {
    /// `None` if the certificate has no usable SAN extension
    pub subject_alt_names: Option<Vec<SubjectAltName>>,
    pub common_names: Vec<String>,
}

impl CertificateNames {
    /// Capture the identities of an X.509 certificate
    pub fn from_x509(cert: &X509Ref) -> Self {
        Self::from_identity(cert)
    }

    /// Capture the identities of any peer certificate
    pub fn from_identity<C: PeerIdentity + ?Sized>(cert: &C) -> Self {
        CertificateNames {
            subject_alt_names: cert.subject_alt_names(),
            common_names: cert.common_names(),
        }
    }
}

impl PeerIdentity for CertificateNames {
    fn subject_alt_names(&self) -> Option<Vec<SubjectAltName>> {
        self.subject_alt_names.clone()
    }

    fn common_names(&self) -> Vec<String> {
        self.common_names.clone()
    }
}

impl fmt::Display for CertificateNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CN=[{}]", self.common_names.join(", "))?;
        match &self.subject_alt_names {
            Some(sans) => {
                let names: Vec<String> = sans
                    .iter()
                    .map(|san| match san {
                        SubjectAltName::Dns(name) => format!("DNS:{}", name),
                        SubjectAltName::Ip(addr) => format!("IP:{}", addr),
                    })
                    .collect();
                write!(f, " SAN=[{}]", names.join(", "))
            }
            None => write!(f, " SAN=<undef>"),
        }
    }
}

/// Get every Common Name from an X509_NAME
///
/// The raw entry bytes are used so an embedded NUL cannot truncate a name.
/// Entries that are not valid UTF-8, or that contain NUL, are skipped.
fn get_cns(name: &X509NameRef) -> Vec<String> {
    name.entries_by_nid(Nid::COMMONNAME)
        .filter_map(|entry| std::str::from_utf8(entry.data().as_slice()).ok())
        .filter(|cn| !cn.contains('\0'))
        .map(str::to_string)
        .collect()
}

/// iPAddress entries are 4 (IPv4) or 16 (IPv6) raw octets
fn ip_from_octets(octets: &[u8]) -> Option<IpAddr> {
    if let Ok(v4) = <[u8; 4]>::try_from(octets) {
        Some(IpAddr::V4(Ipv4Addr::from(v4)))
    } else if let Ok(v6) = <[u8; 16]>::try_from(octets) {
        Some(IpAddr::V6(Ipv6Addr::from(v6)))
    } else {
        None
    }
}
