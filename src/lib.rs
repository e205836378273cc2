//! accel-tls - TLS client core for a download accelerator
//!
//! This crate establishes client TLS sessions over already-connected
//! transports, verifies the peer certificate chain and hostname, and
//! shuts sessions down cleanly. Socket helpers live in [`net`].

pub mod net;
pub mod tls;
