//! TLS client support
//!
//! This module turns a connected transport into an encrypted, verified
//! session.
//!
//! # Architecture
//!
//! 1. [`TlsRuntime`] loads the library tables once per process
//! 2. [`VerificationPolicy`] selects strict or insecure verification from
//!    [`TlsClientConfig`]
//! 3. [`TlsConnector`] creates the context, runs the handshake through a
//!    [`TlsBackend`] and applies the policy's post-handshake checks
//! 4. [`validate_hostname`] matches the requested name against the peer
//!    certificate's SAN and Common Name entries
//!
//! # Examples
//!
//! ```no_run
//! use accel_tls::net;
//! use accel_tls::tls::{self, TlsClientConfig};
//! use std::io::Write;
//! use std::time::Duration;
//!
//! tls::initialize(TlsClientConfig::builder().build()).unwrap();
//!
//! let addr = "93.184.216.34:443".parse().unwrap();
//! let stream = net::connect_tcp(addr, Some(Duration::from_secs(10))).unwrap();
//! net::set_io_timeout(&stream, Some(Duration::from_secs(30))).unwrap();
//!
//! let mut session = tls::connect(stream, "example.com").unwrap();
//! session.write_all(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();
//! tls::disconnect(session);
//! ```

pub mod backend;
pub mod cert;
pub mod config;
pub mod connector;
pub mod hostname;
pub mod openssl_backend;
pub mod runtime;
pub mod session;
pub mod verify;

pub use backend::{ContextOptions, SecureChannel, TlsBackend, TlsLibrary, TrustAnchors, VerifyStatus};
pub use cert::CertificateNames;
pub use config::{ClientConfigBuilder, TlsClientConfig, TlsError};
pub use connector::TlsConnector;
pub use hostname::{validate_hostname, PeerIdentity, SubjectAltName};
pub use openssl_backend::OpenSslBackend;
pub use runtime::{RuntimeState, TlsRuntime};
pub use session::TlsSession;
pub use verify::VerificationPolicy;

use openssl::ssl::SslStream;
use std::io::{Read, Write};
use std::sync::OnceLock;

/// Result type for TLS operations
pub type Result<T> = std::result::Result<T, TlsError>;

static CONNECTOR: OnceLock<TlsConnector> = OnceLock::new();

/// Process-wide setup
///
/// Stores the configuration used by [`connect`]. Must be called once before
/// the first connection attempt.
pub fn initialize(config: TlsClientConfig) -> Result<()> {
    CONNECTOR
        .set(TlsConnector::new(config))
        .map_err(|_| TlsError::AlreadyInitialized)
}

/// Establish a TLS session using the process-wide configuration
///
/// See [`TlsConnector::connect`].
pub fn connect<S: Read + Write>(stream: S, hostname: &str) -> Result<TlsSession<SslStream<S>>> {
    match CONNECTOR.get() {
        Some(connector) => connector.connect(stream, hostname),
        None => {
            let err = TlsError::NotInitialized;
            connector::report(&err);
            Err(err)
        }
    }
}

/// Shut a session down and release it
pub fn disconnect<C: SecureChannel>(session: TlsSession<C>) {
    session.disconnect()
}
