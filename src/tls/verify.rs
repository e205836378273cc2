//! Certificate verification policy
//!
//! The policy is chosen once per connect attempt from the configuration. It
//! decides how the context is set up and what is checked once the handshake
//! has completed. The insecure variant is a deliberate downgrade: it
//! configures nothing and checks nothing.

use super::backend::{ContextOptions, SecureChannel, TrustAnchors};
use super::config::{TlsClientConfig, TlsError};
use super::cert::CertificateNames;
use super::hostname::validate_hostname;
use log::debug;

/// Verification strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationPolicy {
    /// Chain verification against the default trust store plus hostname match
    Strict,
    /// No certificate validation at all
    Insecure,
}

impl VerificationPolicy {
    pub fn from_config(config: &TlsClientConfig) -> Self {
        if config.insecure() {
            VerificationPolicy::Insecure
        } else {
            VerificationPolicy::Strict
        }
    }

    /// Context setup for this policy
    pub fn context_options(&self) -> ContextOptions {
        match self {
            VerificationPolicy::Strict => ContextOptions {
                trust: TrustAnchors::SystemDefault,
                verify_peer: true,
                auto_retry: true,
            },
            VerificationPolicy::Insecure => ContextOptions {
                trust: TrustAnchors::None,
                verify_peer: false,
                auto_retry: true,
            },
        }
    }

    /// Post-handshake checks
    pub fn check_peer<C: SecureChannel>(&self, channel: &C, hostname: &str) -> Result<(), TlsError> {
        match self {
            VerificationPolicy::Strict => check_strict(channel, hostname),
            VerificationPolicy::Insecure => Ok(()),
        }
    }
}

fn check_strict<C: SecureChannel>(channel: &C, hostname: &str) -> Result<(), TlsError> {
    let status = channel.verify_status();
    if !status.is_ok() {
        debug!("chain verification failed: {} ({})", status.reason, status.code);
        return Err(TlsError::Certificate {
            code: status.code,
            reason: status.reason,
        });
    }

    // Dropped on return, whatever the outcome
    let cert = channel.peer_certificate().ok_or(TlsError::CertificateNotFound)?;

    if !validate_hostname(hostname, &cert) {
        debug!(
            "{} not among certificate identities {}",
            hostname,
            CertificateNames::from_identity(&cert)
        );
        return Err(TlsError::HostnameMismatch);
    }

    debug!("peer certificate verified for {}", hostname);
    Ok(())
}
