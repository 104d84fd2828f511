//! Command-line arguments for the Quote Client.
//!
//! Every flag can also come from the environment variable named next to it.
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use quote_common::deadline::parse_duration;
use quote_common::net::{DEFAULT_PORT, quote_url};

/// Artifact written when `OUTPUT_PATH` is not set.
pub const DEFAULT_OUTPUT: &str = "cotacao.txt";

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Full URL of the server's quote route.
    #[arg(long, env = "SERVER_URL", default_value_t = quote_url("localhost", DEFAULT_PORT))]
    pub server_url: String,

    /// Overall deadline for fetching the bid.
    #[arg(long, env = "CLIENT_TIMEOUT", default_value = "300ms", value_parser = parse_duration)]
    pub timeout: Duration,

    /// File the bid is written to; overwritten on every run.
    #[arg(long, env = "OUTPUT_PATH", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,
}
