//! Server configuration.
//!
//! Every setting can be passed as a CLI flag or through the environment variable named
//! next to it; both are optional and fall back to the defaults below.
use std::time::Duration;

use clap::Parser;
use quote_common::deadline::parse_duration;
use quote_common::model::DEFAULT_PAIR;
use quote_common::net::DEFAULT_PORT;

/// Provider endpoint used when `API_BASE_URL` is not set.
pub const DEFAULT_API_URL: &str = "https://economia.awesomeapi.com.br/json/last/USD-BRL";

/// Parsed server configuration.
#[derive(Debug, Clone, Parser)]
#[command(version, about = "Relays the latest USD-BRL bid over HTTP", long_about = None)]
pub struct ServerConfig {
    /// TCP port to listen on.
    #[arg(long, env = "SERVER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Deadline for a whole `/quote` request.
    #[arg(long, env = "REQUEST_TIMEOUT", default_value = "250ms", value_parser = parse_duration)]
    pub request_timeout: Duration,

    /// Storage settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Upstream provider settings.
    #[command(flatten)]
    pub api: ApiConfig,
}

/// Storage settings.
#[derive(Debug, Clone, clap::Args)]
pub struct DatabaseConfig {
    /// SQLite database location (file path or `sqlite:` URL).
    #[arg(long = "db-dsn", env = "DB_DSN", default_value = ".quotes.db")]
    pub dsn: String,

    /// Upper bound of pooled connections.
    #[arg(long = "db-max-connections", env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,

    /// Budget of a single storage operation.
    #[arg(id = "db_timeout", long = "db-timeout", env = "DB_TIMEOUT", default_value = "10ms", value_parser = parse_duration)]
    pub timeout: Duration,
}

/// Upstream provider settings.
#[derive(Debug, Clone, clap::Args)]
pub struct ApiConfig {
    /// Provider endpoint returning the latest quote.
    #[arg(long = "api-base-url", env = "API_BASE_URL", default_value = DEFAULT_API_URL)]
    pub base_url: String,

    /// Budget of the upstream call.
    #[arg(id = "api_timeout", long = "api-timeout", env = "API_TIMEOUT", default_value = "200ms", value_parser = parse_duration)]
    pub timeout: Duration,

    /// Key of the pair inside the provider's body.
    #[arg(long = "api-pair", env = "API_PAIR", default_value = DEFAULT_PAIR)]
    pub pair: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let cfg = ServerConfig::try_parse_from(["quote_server"]).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.request_timeout, Duration::from_millis(250));
        assert_eq!(cfg.database.dsn, ".quotes.db");
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.database.timeout, Duration::from_millis(10));
        assert_eq!(cfg.api.base_url, DEFAULT_API_URL);
        assert_eq!(cfg.api.timeout, Duration::from_millis(200));
        assert_eq!(cfg.api.pair, "USDBRL");
    }

    #[test]
    fn flags_override_defaults() {
        let cfg = ServerConfig::try_parse_from([
            "quote_server",
            "--port",
            "9090",
            "--db-timeout",
            "1s",
            "--api-timeout",
            "50ms",
        ])
        .unwrap();
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.database.timeout, Duration::from_secs(1));
        assert_eq!(cfg.api.timeout, Duration::from_millis(50));
    }

    #[test]
    fn stage_timeouts_are_independent() {
        let cfg = ServerConfig::try_parse_from(["quote_server", "--api-timeout", "100ms"]).unwrap();
        assert_eq!(cfg.api.timeout, Duration::from_millis(100));
        assert_eq!(cfg.database.timeout, Duration::from_millis(10));

        let cfg = ServerConfig::try_parse_from(["quote_server", "--db-timeout", "40ms"]).unwrap();
        assert_eq!(cfg.database.timeout, Duration::from_millis(40));
        assert_eq!(cfg.api.timeout, Duration::from_millis(200));
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        ServerConfig::command().debug_assert();
    }

    #[test]
    fn rejects_malformed_durations() {
        assert!(ServerConfig::try_parse_from(["quote_server", "--api-timeout", "soon"]).is_err());
    }
}
