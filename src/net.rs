//! Blocking TCP helpers
//!
//! The TLS layer never creates sockets itself and never applies a handshake
//! timeout. Callers that need a bounded handshake set I/O timeouts on the
//! stream before handing it to [`crate::tls::connect`].

use socket2::{Domain, Protocol, SockRef, Socket, Type};
use std::io;
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

/// Open a blocking TCP connection to `addr`
///
/// `TCP_NODELAY` is enabled. With `timeout` set, the connect attempt fails
/// with `TimedOut` once it elapses.
pub fn connect_tcp(addr: SocketAddr, timeout: Option<Duration>) -> io::Result<TcpStream> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_nodelay(true)?;

    let sock_addr = addr.into();
    match timeout {
        Some(t) => socket.connect_timeout(&sock_addr, t)?,
        None => socket.connect(&sock_addr)?,
    }

    Ok(socket.into())
}

/// Set read and write timeouts on a connected stream
///
/// `None` restores fully blocking I/O.
pub fn set_io_timeout(stream: &TcpStream, timeout: Option<Duration>) -> io::Result<()> {
    let sock = SockRef::from(stream);
    sock.set_read_timeout(timeout)?;
    sock.set_write_timeout(timeout)
}
