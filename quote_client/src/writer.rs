//! Writes the relayed bid to the output artifact.
use std::path::Path;

use log::debug;
use quote_common::{AppError, Result};

/// Label preceding the bid in the artifact.
pub const LABEL: &str = "Dólar";

/// Replace the whole content of `path` with `Dólar: <bid>\n`.
pub async fn persist_bid(path: &Path, bid: &str) -> Result<()> {
    let content = format!("{}: {}\n", LABEL, bid);
    tokio::fs::write(path, content)
        .await
        .map_err(AppError::internal)?;
    debug!("Bid {} written to {}", bid, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_common::ErrorKind;
    use tempfile::TempDir;

    #[tokio::test]
    async fn writes_single_labelled_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cotacao.txt");
        persist_bid(&path, "5.43").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Dólar: 5.43\n");
    }

    #[tokio::test]
    async fn overwrites_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cotacao.txt");
        std::fs::write(&path, "Dólar: 5.9999999\nleftover line\n").unwrap();
        persist_bid(&path, "5.1").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Dólar: 5.1\n");
    }

    #[tokio::test]
    async fn unwritable_path_is_internal_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("cotacao.txt");
        let err = persist_bid(&path, "5.43").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
