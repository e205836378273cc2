//! TLS library abstraction
//!
//! The connect sequence in [`super::connector`] is written once against
//! these traits. [`super::openssl_backend::OpenSslBackend`] is the real
//! implementation; tests substitute instrumented fakes to observe bootstrap
//! and resource release.
//!
//! Every library object is an owned value. Dropping a context, channel or
//! certificate releases the library's reference to it.

use super::config::TlsError;
use super::hostname::PeerIdentity;
use std::io::{self, Read, Write};

/// Trust anchors loaded into a new context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustAnchors {
    /// No trust store
    None,
    /// The platform default locations
    SystemDefault,
}

/// How a session context is set up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextOptions {
    pub trust: TrustAnchors,
    /// Require a peer certificate with a valid chain during the handshake
    pub verify_peer: bool,
    /// Retry reads and writes transparently after renegotiation
    pub auto_retry: bool,
}

/// Chain verification result reported by the library after a handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyStatus {
    pub code: i32,
    pub reason: String,
}

impl VerifyStatus {
    pub const OK_CODE: i32 = 0;

    pub fn ok() -> Self {
        VerifyStatus {
            code: Self::OK_CODE,
            reason: "ok".to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == Self::OK_CODE
    }
}

/// Process-wide library setup
pub trait TlsLibrary {
    /// Load algorithm and error-string tables
    ///
    /// Called at most once per [`super::runtime::TlsRuntime`].
    fn bootstrap(&self);
}

/// An established encrypted channel
pub trait SecureChannel: Read + Write {
    type Certificate: PeerIdentity;

    /// The library's chain verification result for this session
    fn verify_status(&self) -> VerifyStatus;

    /// The peer's leaf certificate, if one was presented
    fn peer_certificate(&self) -> Option<Self::Certificate>;

    /// Send close-notify to the peer
    fn close_notify(&mut self) -> io::Result<()>;
}

/// Creates contexts and runs client handshakes over transports of type `S`
pub trait TlsBackend<S>: TlsLibrary {
    type Context;
    type Channel: SecureChannel;

    /// Create a client context negotiating the best mutual protocol version
    fn new_context(&self, options: &ContextOptions) -> Result<Self::Context, TlsError>;

    /// Bind a new session to `context` and `stream`, send SNI for
    /// `hostname` and run the handshake to completion
    ///
    /// On failure the session is dropped and the library's error state is
    /// returned as [`TlsError::Handshake`].
    fn handshake(
        &self,
        context: &Self::Context,
        stream: S,
        hostname: &str,
    ) -> Result<Self::Channel, TlsError>;
}
