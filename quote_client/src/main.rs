//! Quote Client — asks the quote server for the current bid under a fixed deadline and
//! writes it to a text file as `Dólar: <bid>`.
//!
//! Usage example (CLI):
//! ```bash
//! quote_client --server-url http://localhost:8080/quote --timeout 300ms --output cotacao.txt
//! ```
//!
//! Any failure ends the run with a non-zero exit code and leaves the file untouched.
#![warn(missing_docs)]
use clap::Parser;
use log::{error, info};
use quote_client::args::Args;
use quote_client::client::QuoteClient;
use quote_client::writer::persist_bid;
use quote_common::{Deadline, Result};

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    let client = QuoteClient::new(&args.server_url)?;
    let deadline = Deadline::after(args.timeout);

    info!("Requesting bid from {} (deadline {:?})", args.server_url, args.timeout);
    let bid = match client.get_bid(&deadline).await {
        Ok(bid) => bid,
        Err(e) => {
            error!("Failed to get bid: {}", e.detailed());
            return Err(e);
        }
    };

    if let Err(e) = persist_bid(&args.output, &bid).await {
        error!("Failed to write {}: {}", args.output.display(), e.detailed());
        return Err(e);
    }
    info!("Bid {} saved to {}", bid, args.output.display());
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
