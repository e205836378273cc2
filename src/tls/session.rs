//! Established TLS sessions

use super::backend::SecureChannel;
use log::debug;
use std::fmt;
use std::io::{self, Read, Write};

/// A fully validated client TLS session
///
/// Only [`super::TlsConnector::connect`] creates these, and only after every
/// check the configured policy requires has passed. Reads and writes go
/// through the encrypted channel.
pub struct TlsSession<C: SecureChannel> {
    channel: C,
}

impl<C: SecureChannel> TlsSession<C> {
    pub(crate) fn new(channel: C) -> Self {
        TlsSession { channel }
    }

    /// Get a reference to the underlying channel
    pub fn get_ref(&self) -> &C {
        &self.channel
    }

    /// Get a mutable reference to the underlying channel
    pub fn get_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Close the session
    ///
    /// Sends close-notify on a best-effort basis, then releases the session
    /// and its transport.
    pub fn disconnect(mut self) {
        if let Err(e) = self.channel.close_notify() {
            debug!("close-notify failed: {}", e);
        }
    }
}

impl<C: SecureChannel + fmt::Debug> fmt::Debug for TlsSession<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsSession")
            .field("channel", &self.channel)
            .finish()
    }
}

impl<C: SecureChannel> Read for TlsSession<C> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.channel.read(buf)
    }
}

impl<C: SecureChannel> Write for TlsSession<C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.channel.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.channel.flush()
    }
}
