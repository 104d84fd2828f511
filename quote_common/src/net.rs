//! Shared networking constants and helpers used by client and server.

/// Default TCP port the quote server listens on.
pub const DEFAULT_PORT: u16 = 8080;
/// Route serving the latest bid.
pub const QUOTE_ROUTE: &str = "/quote";

/// Helper to format a host with a port like "host:port".
pub fn addr(host: &str, port: u16) -> String {
    format!("{}:{}", host, port)
}

/// Full URL of the quote route on `host:port`.
pub fn quote_url(host: &str, port: u16) -> String {
    format!("http://{}{}", addr(host, port), QUOTE_ROUTE)
}
