//! Listener creation
//!
//! Builds the TCP listener through socket2 so SO_REUSEADDR can be set:
//! a freshly restarted server may rebind while the previous socket sits
//! in TIME_WAIT. A port held by a live process still fails the bind, and
//! that failure is fatal at startup.

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Create a non-blocking TCP listener bound to `addr`.
pub fn create_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_binds_requested_address() {
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(addr.port() != 0);
        assert!(addr.ip().is_loopback());
    }

    #[tokio::test]
    async fn test_port_in_use_fails() {
        let first = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let taken = first.local_addr().unwrap();
        // Second bind on the same port must fail; startup treats this as fatal.
        assert!(create_listener(taken).is_err());
    }
}
