//! Server bootstrap and accept loop
//!
//! Binds the listener, accepts connections until a shutdown signal, and
//! hands each connection to its own task. Concurrency is whatever tokio
//! and hyper provide per connection; the handlers are stateless.

mod connection;
mod listener;
mod signal;

pub use listener::create_listener;

use crate::config::AppState;
use crate::logger;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

/// Accept connections until SIGINT/SIGTERM.
pub async fn run(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let connections = Arc::new(AtomicUsize::new(0));
    let shutdown = signal::shutdown();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                logger::log_shutdown();
                break;
            }
        }
    }

    Ok(())
}

/// Count the connection against the limit, then spawn its task.
fn accept_connection(
    stream: TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // Increment first, then check, so concurrent accepts cannot slip past
    // the limit between a check and an increment.
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);
    if let Some(max_conn) = state.config.performance.max_connections {
        let max_conn = usize::try_from(max_conn).unwrap_or(usize::MAX);
        if prev_count >= max_conn {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached ({max_conn}); rejecting {peer_addr}"
            ));
            drop(stream);
            return;
        }
    }

    connection::spawn_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
    );
}
