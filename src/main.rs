//! isoserve: static file server with cross-origin isolation headers.
//!
//! Serves the current directory (or a configured root) and stamps
//! `Cross-Origin-Embedder-Policy: require-corp` and
//! `Cross-Origin-Opener-Policy: same-origin` on every response, so pages
//! under test can use SharedArrayBuffer and WASM shared-memory threads.
//!
//! Usage: `isoserve [port]` (default 8000).

use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let port = parse_port_arg(std::env::args().skip(1))?;
    let cfg = config::Config::load(port)?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let state = Arc::new(config::AppState::new(cfg)?);

    // Bind before anything else: a port already in use must fail startup,
    // not surface later as dropped requests.
    let listener = server::create_listener(addr)?;

    logger::log_server_start(&addr, &state.config);
    server::run(listener, state).await?;
    Ok(())
}

/// Parse the single optional positional argument: the listen port.
fn parse_port_arg(mut args: impl Iterator<Item = String>) -> Result<Option<u16>, String> {
    let Some(arg) = args.next() else {
        return Ok(None);
    };
    if args.next().is_some() {
        return Err("usage: isoserve [port]".to_string());
    }
    arg.parse::<u16>()
        .map(Some)
        .map_err(|_| format!("invalid port '{arg}' (expected an integer in 1-65535)"))
}
