//! Shared fixtures for the integration tests
//!
//! Certificates are generated with the `openssl` crate at test time. Tests
//! that need a trusted chain call [`trust_test_ca`], which writes the test
//! CA to a temporary bundle and points `SSL_CERT_FILE` at it so the
//! library's default trust store picks it up.

#![allow(dead_code)]

use openssl::asn1::Asn1Time;
use openssl::bn::BigNum;
use openssl::ec::{EcGroup, EcKey};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::ssl::{Ssl, SslContextBuilder, SslMethod};
use openssl::x509::extension::{BasicConstraints, KeyUsage, SubjectAlternativeName};
use openssl::x509::{X509, X509Builder, X509NameBuilder, X509Ref};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

static SERIAL: AtomicU32 = AtomicU32::new(1);

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn new_key() -> PKey<Private> {
    let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
    PKey::from_ec_key(EcKey::generate(&group).unwrap()).unwrap()
}

fn base_builder(cn: &str, key: &PKey<Private>, issuer: Option<&X509Ref>) -> X509Builder {
    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_nid(Nid::COMMONNAME, cn).unwrap();
    let name = name.build();

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let mut builder = X509Builder::new().unwrap();
    builder.set_version(2).unwrap();
    let serial = BigNum::from_u32(SERIAL.fetch_add(1, Ordering::SeqCst))
        .unwrap()
        .to_asn1_integer()
        .unwrap();
    builder.set_serial_number(&serial).unwrap();
    builder.set_subject_name(&name).unwrap();
    match issuer {
        Some(ca) => builder.set_issuer_name(ca.subject_name()).unwrap(),
        None => builder.set_issuer_name(&name).unwrap(),
    }
    builder.set_pubkey(key).unwrap();
    builder
        .set_not_before(&Asn1Time::from_unix(now - 3600).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::days_from_now(30).unwrap())
        .unwrap();
    builder
}

/// A server certificate and its key
pub struct Identity {
    pub cert: X509,
    pub key: PKey<Private>,
}

/// Certificate authority for issuing test server certificates
pub struct TestCa {
    cert: X509,
    key: PKey<Private>,
}

impl TestCa {
    pub fn new(cn: &str) -> Self {
        let key = new_key();
        let mut builder = base_builder(cn, &key, None);
        builder
            .append_extension(BasicConstraints::new().critical().ca().build().unwrap())
            .unwrap();
        builder
            .append_extension(
                KeyUsage::new()
                    .critical()
                    .key_cert_sign()
                    .crl_sign()
                    .build()
                    .unwrap(),
            )
            .unwrap();
        builder.sign(&key, MessageDigest::sha256()).unwrap();

        TestCa {
            cert: builder.build(),
            key,
        }
    }

    pub fn cert(&self) -> &X509 {
        &self.cert
    }

    /// Issue a server certificate with the given DNS and IP SANs
    pub fn issue(&self, cn: &str, dns: &[&str], ips: &[&str]) -> Identity {
        let key = new_key();
        let mut builder = base_builder(cn, &key, Some(&*self.cert));
        builder
            .append_extension(BasicConstraints::new().build().unwrap())
            .unwrap();

        if !dns.is_empty() || !ips.is_empty() {
            let mut san = SubjectAlternativeName::new();
            for name in dns {
                san.dns(name);
            }
            for ip in ips {
                san.ip(ip);
            }
            let ext = san
                .build(&builder.x509v3_context(Some(&*self.cert), None))
                .unwrap();
            builder.append_extension(ext).unwrap();
        }

        builder.sign(&self.key, MessageDigest::sha256()).unwrap();
        Identity {
            cert: builder.build(),
            key,
        }
    }
}

/// Server certificate issued by a throwaway CA nobody trusts
pub fn untrusted(cn: &str, dns: &[&str]) -> Identity {
    TestCa::new(cn).issue(cn, dns, &[])
}

/// The CA every secure test trusts
///
/// Generated once per test binary; `SSL_CERT_FILE` is set before the first
/// caller gets it back.
pub fn trust_test_ca() -> &'static TestCa {
    static CA: OnceLock<TestCa> = OnceLock::new();

    CA.get_or_init(|| {
        let ca = TestCa::new("accel-tls test CA");

        let mut bundle = tempfile::Builder::new()
            .prefix("accel-tls-ca")
            .suffix(".pem")
            .tempfile()
            .unwrap();
        bundle.write_all(&ca.cert().to_pem().unwrap()).unwrap();
        let (_file, path) = bundle.keep().unwrap();

        std::env::set_var("SSL_CERT_FILE", &path);
        ca
    })
}

/// Accept one TLS connection and echo until the client closes
pub fn spawn_echo_server(identity: Identity) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let mut ctx = SslContextBuilder::new(SslMethod::tls_server()).unwrap();
        ctx.set_certificate(&identity.cert).unwrap();
        ctx.set_private_key(&identity.key).unwrap();
        let ctx = ctx.build();

        let (tcp_stream, _) = listener.accept().unwrap();
        if let Ok(mut stream) = Ssl::new(&ctx).unwrap().accept(tcp_stream) {
            let mut buf = [0u8; 256];
            while let Ok(n) = stream.read(&mut buf) {
                if n == 0 || stream.write_all(&buf[..n]).is_err() {
                    break;
                }
            }
            let _ = stream.shutdown();
        }
    });

    addr
}

/// Accept one TCP connection and close it without speaking TLS
pub fn spawn_reset_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let (tcp_stream, _) = listener.accept().unwrap();
        drop(tcp_stream);
    });

    addr
}

/// Accept one TCP connection and hold it open silently
pub fn spawn_silent_server(hold: std::time::Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let (tcp_stream, _) = listener.accept().unwrap();
        thread::sleep(hold);
        drop(tcp_stream);
    });

    addr
}
