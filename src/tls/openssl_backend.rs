//! OpenSSL implementation of the TLS backend
//!
//! Contexts are plain `SslContext`s built with the generic client method,
//! sessions are `SslStream`s over the caller's transport. Both are
//! reference counted by OpenSSL: a live `SslStream` keeps its own reference
//! to the context, so the connector may drop the context as soon as the
//! handshake has run.

use super::backend::{
    ContextOptions, SecureChannel, TlsBackend, TlsLibrary, TrustAnchors, VerifyStatus,
};
use super::config::TlsError;
use log::debug;
use openssl::error::ErrorStack;
use openssl::ssl::{
    HandshakeError, Ssl, SslContext, SslContextBuilder, SslMethod, SslMode, SslStream,
    SslVerifyMode,
};
use openssl::x509::X509;
use std::io::{self, Read, Write};

/// The system OpenSSL
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSslBackend;

impl TlsLibrary for OpenSslBackend {
    fn bootstrap(&self) {
        openssl::init();
        debug!("loaded {}", openssl::version::version());
    }
}

impl<S: Read + Write> TlsBackend<S> for OpenSslBackend {
    type Context = SslContext;
    type Channel = SslStream<S>;

    fn new_context(&self, options: &ContextOptions) -> Result<SslContext, TlsError> {
        let mut builder = SslContextBuilder::new(SslMethod::tls_client())?;

        if options.trust == TrustAnchors::SystemDefault {
            builder.set_default_verify_paths()?;
        }

        if options.verify_peer {
            builder.set_verify(SslVerifyMode::PEER);
        } else {
            builder.set_verify(SslVerifyMode::NONE);
        }

        if options.auto_retry {
            builder.set_mode(SslMode::AUTO_RETRY);
        }

        Ok(builder.build())
    }

    fn handshake(
        &self,
        context: &SslContext,
        stream: S,
        hostname: &str,
    ) -> Result<SslStream<S>, TlsError> {
        let mut ssl = Ssl::new(context)?;

        // SNI
        ssl.set_hostname(hostname)?;

        // Blocking handshake; the mid-handshake stream is freed on error
        ssl.connect(stream).map_err(handshake_error)
    }
}

impl<S: Read + Write> SecureChannel for SslStream<S> {
    type Certificate = X509;

    fn verify_status(&self) -> VerifyStatus {
        let result = self.ssl().verify_result();
        VerifyStatus {
            code: result.as_raw(),
            reason: result.error_string().to_string(),
        }
    }

    fn peer_certificate(&self) -> Option<X509> {
        self.ssl().peer_certificate()
    }

    fn close_notify(&mut self) -> io::Result<()> {
        self.shutdown()
            .map(|_| ())
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

/// Capture OpenSSL's error state for a failed handshake
///
/// errno is only reported when the failure came with an OS-level I/O error.
/// By the time the handshake result reaches us the error queue has already
/// been drained, so the thread's last OS error may be stale and is not used.
fn handshake_error<S>(err: HandshakeError<S>) -> TlsError {
    match err {
        HandshakeError::SetupFailure(stack) => TlsError::Handshake {
            reason: stack_reason(&stack).unwrap_or_else(|| stack.to_string()),
            code: 0,
            errno: 0,
        },
        HandshakeError::Failure(mid) | HandshakeError::WouldBlock(mid) => {
            let error = mid.error();
            let reason = error
                .ssl_error()
                .and_then(stack_reason)
                .unwrap_or_else(|| error.to_string());
            let errno = error
                .io_error()
                .and_then(|e| e.raw_os_error())
                .unwrap_or(0);

            TlsError::Handshake {
                reason,
                code: error.code().as_raw(),
                errno,
            }
        }
    }
}

fn stack_reason(stack: &ErrorStack) -> Option<String> {
    stack
        .errors()
        .first()
        .and_then(|e| e.reason())
        .map(|r| r.to_string())
}
