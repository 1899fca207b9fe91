// Configuration module entry point
//
// Layered load: built-in defaults, then an optional `isoserve.toml`, then
// ISOSERVE_* environment variables, then the CLI port argument on top.

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig, ServingConfig};

/// Default config file name (without extension)
const CONFIG_FILE: &str = "isoserve";

impl Config {
    /// Load configuration, with an optional CLI port override on top.
    pub fn load(port_override: Option<u16>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            // ISOSERVE_SERVER__PORT=9000 maps onto server.port, and so on
            .add_source(
                config::Environment::with_prefix("ISOSERVE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            // Bind all interfaces so devices on the LAN can load test pages
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("serving.root", ".")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?;

        if let Some(port) = port_override {
            builder = builder.set_override("server.port", i64::from(port))?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid listen address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port_is_8000() {
        let cfg = Config::load(None).unwrap();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.serving.root, ".");
        assert_eq!(
            cfg.serving.index_files,
            vec!["index.html".to_string(), "index.htm".to_string()]
        );
    }

    #[test]
    fn test_cli_port_override_wins() {
        let cfg = Config::load(Some(9001)).unwrap();
        assert_eq!(cfg.server.port, 9001);
    }

    #[test]
    fn test_environment_overrides_defaults() {
        // A key no other test asserts on, so parallel tests stay unaffected
        std::env::set_var("ISOSERVE_LOGGING__ACCESS_LOG_FORMAT", "json");
        let cfg = Config::load(None).unwrap();
        std::env::remove_var("ISOSERVE_LOGGING__ACCESS_LOG_FORMAT");
        assert_eq!(cfg.logging.access_log_format, "json");
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load(Some(9001)).unwrap();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 9001);
    }
}
