// Configuration module entry point
// Manages application configuration and runtime state

mod state;
mod types;

use std::collections::HashSet;
use std::net::SocketAddr;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use hyper::header::HeaderValue;

// Re-export public types
pub use state::AppState;
pub use types::{Config, PerformanceConfig, RouteEntry, Shell, SiteConfig, UpstreamConfig};

/// Environment variable prefix, e.g. `BOOTIBLE_SERVER__PORT=9000`
const ENV_PREFIX: &str = "BOOTIBLE";

impl Config {
    /// Load configuration from specified file path (extension optional)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = with_defaults(config::Config::builder())?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Built-in defaults only, ignoring files and environment
    #[cfg(test)]
    pub fn defaults() -> Result<Self, ConfigError> {
        with_defaults(config::Config::builder())?
            .build()?
            .try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Reject route tables the router could never serve correctly
    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for route in &self.routes {
            if !route.path.starts_with('/') || route.path == "/" {
                return Err(ConfigError::Message(format!(
                    "route path '{}' must start with '/' and must not be the root",
                    route.path
                )));
            }
            if !route.script.starts_with('/') {
                return Err(ConfigError::Message(format!(
                    "route '{}' script '{}' must start with '/'",
                    route.path, route.script
                )));
            }
            if HeaderValue::from_str(&route.label).is_err() {
                return Err(ConfigError::Message(format!(
                    "route '{}' label is not a valid header value",
                    route.path
                )));
            }
            if !seen.insert(route.path.as_str()) {
                return Err(ConfigError::Message(format!(
                    "duplicate route path '{}'",
                    route.path
                )));
            }
        }
        if self.upstream.base_url.ends_with('/') {
            return Err(ConfigError::Message(
                "upstream.base_url must not end with '/'".to_string(),
            ));
        }
        Ok(())
    }
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("logging.show_headers", false)?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default("http.server_name", "bootible-router")?
        .set_default("http.enable_cors", false)?
        .set_default(
            "upstream.base_url",
            "https://raw.githubusercontent.com/gavinmcfall/bootible/main",
        )?
        .set_default("upstream.cache_ttl", 300)?
        .set_default("upstream.timeout", 10)?
        .set_default("upstream.user_agent", "bootible-router")?
        .set_default("site.name", "Bootible")?
        .set_default("site.tagline", "One-liner setup for gaming handhelds and desktops.")?
        .set_default("site.public_url", "https://bootible.dev")?
        .set_default("site.repo_url", "https://github.com/gavinmcfall/bootible")
}
