//! TLS client configuration and errors

/// TLS errors
///
/// Every failed connect attempt maps to exactly one of these. The `Display`
/// text is what ends up on the diagnostic line.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("OpenSSL error: {0}")]
    OpenSsl(#[from] openssl::error::ErrorStack),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The handshake itself failed
    #[error("{reason} {code} {errno}")]
    Handshake {
        /// Library reason string
        reason: String,
        /// `SSL_get_error` code for the failed handshake call
        ///
        /// This is the classified error (e.g. 1 for a protocol error, 5 for a
        /// transport failure), not the raw return value of `SSL_connect`,
        /// which is always -1 or 0 on failure. Setup failures before the
        /// handshake started report 0.
        code: i32,
        /// OS error number of the transport failure (0 if none)
        errno: i32,
    },

    /// Chain verification did not report success
    #[error("Certificate error")]
    Certificate { code: i32, reason: String },

    #[error("Certificate not found")]
    CertificateNotFound,

    #[error("Hostname verification failed")]
    HostnameMismatch,

    /// Hostname is empty or cannot be sent as SNI
    #[error("Invalid hostname: {0:?}")]
    InvalidHostname(String),

    #[error("TLS layer not initialized")]
    NotInitialized,

    #[error("TLS layer already initialized")]
    AlreadyInitialized,
}

/// TLS client configuration (immutable after building)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsClientConfig {
    pub(crate) insecure: bool,
}

impl TlsClientConfig {
    /// Create a new configuration builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Whether certificate and hostname validation is disabled
    pub fn insecure(&self) -> bool {
        self.insecure
    }
}

/// Client configuration builder
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    insecure: bool,
}

impl ClientConfigBuilder {
    fn new() -> Self {
        // Default: full chain and hostname verification
        ClientConfigBuilder { insecure: false }
    }

    /// Disable all certificate validation
    ///
    /// Sessions are then established with self-signed, expired or
    /// mismatched certificates. Only the handshake itself can fail.
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Build the configuration
    pub fn build(self) -> TlsClientConfig {
        TlsClientConfig {
            insecure: self.insecure,
        }
    }
}
