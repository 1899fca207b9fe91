// Shared application state
// Built once at startup and handed to every connection as an Arc.

use std::io;
use std::path::{Path, PathBuf};

use super::Config;

/// Immutable state shared across all connections.
pub struct AppState {
    pub config: Config,
    /// Canonicalized serving root; the traversal guard compares against this
    pub root: PathBuf,
}

impl AppState {
    /// Resolve the serving root and build the shared state.
    ///
    /// Fails when the configured root does not exist, which is a startup
    /// error rather than something to discover one 404 at a time.
    pub fn new(config: Config) -> io::Result<Self> {
        let root = Path::new(&config.serving.root).canonicalize()?;
        Ok(Self { config, root })
    }
}
