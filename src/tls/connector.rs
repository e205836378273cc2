//! Client session establishment
//!
//! [`TlsConnector::connect`] runs the whole client sequence: library
//! bootstrap, context creation, handshake and the post-handshake checks of
//! the configured [`VerificationPolicy`]. Every failure is reported as one
//! `SSL error:` line on stderr and returned as a [`TlsError`]; nothing is
//! retried here.

use super::backend::{TlsBackend, TlsLibrary};
use super::config::{TlsClientConfig, TlsError};
use super::openssl_backend::OpenSslBackend;
use super::runtime::TlsRuntime;
use super::session::TlsSession;
use super::verify::VerificationPolicy;
use log::{debug, warn};
use std::sync::Arc;

/// Establishes client TLS sessions
pub struct TlsConnector<B = OpenSslBackend> {
    config: Arc<TlsClientConfig>,
    backend: B,
    runtime: &'static TlsRuntime,
}

impl TlsConnector<OpenSslBackend> {
    /// Connector backed by the system OpenSSL and the process-wide runtime
    pub fn new(config: impl Into<Arc<TlsClientConfig>>) -> Self {
        Self::with_backend(config, OpenSslBackend, TlsRuntime::global())
    }
}

impl<B: TlsLibrary> TlsConnector<B> {
    pub fn with_backend(
        config: impl Into<Arc<TlsClientConfig>>,
        backend: B,
        runtime: &'static TlsRuntime,
    ) -> Self {
        TlsConnector {
            config: config.into(),
            backend,
            runtime,
        }
    }

    pub fn config(&self) -> &TlsClientConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Establish a TLS session over a connected, blocking transport
    ///
    /// `hostname` is sent as SNI and, unless the configuration is insecure,
    /// must match the peer certificate. The handshake blocks until it
    /// completes or the transport fails; set socket timeouts beforehand to
    /// bound it.
    pub fn connect<S>(&self, stream: S, hostname: &str) -> Result<TlsSession<B::Channel>, TlsError>
    where
        B: TlsBackend<S>,
    {
        self.establish(stream, hostname).map_err(|e| {
            report(&e);
            e
        })
    }

    fn establish<S>(&self, stream: S, hostname: &str) -> Result<TlsSession<B::Channel>, TlsError>
    where
        B: TlsBackend<S>,
    {
        if hostname.is_empty() || hostname.contains('\0') {
            return Err(TlsError::InvalidHostname(hostname.to_string()));
        }

        self.runtime.ensure_ready(|| self.backend.bootstrap());

        let policy = VerificationPolicy::from_config(&self.config);
        let options = policy.context_options();
        debug!("connecting to {} with {:?} {:?}", hostname, policy, options);

        let context = TlsBackend::<S>::new_context(&self.backend, &options)?;
        let channel = self.backend.handshake(&context, stream, hostname);
        // A live channel holds its own reference to the context
        drop(context);
        let channel = channel?;
        debug!("handshake with {} complete", hostname);

        policy.check_peer(&channel, hostname)?;

        if policy == VerificationPolicy::Insecure {
            warn!("TLS session to {} is not verified", hostname);
        }
        Ok(TlsSession::new(channel))
    }
}

/// Write the diagnostic line for a failed connect
pub(crate) fn report(err: &TlsError) {
    eprintln!("SSL error: {}", err);
}
