//! Retrieval of raw occupancy logs from a URL or the local filesystem.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::debug;

/// Downloads `url` and returns the response body.
///
/// # Errors
///
/// Fails on an invalid URL, a transport error or a non-success status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Loads occupancy text from an `http(s)` URL or a local path.
///
/// Sources ending in `.gz` are decompressed.
#[tracing::instrument(skip(client))]
pub async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<String> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_bytes(client, source)
            .await
            .with_context(|| format!("failed to fetch {source}"))?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read {source}"))?
    };
    debug!(bytes = bytes.len(), "Source loaded");

    decode_text(source, bytes)
}

fn decode_text(source: &str, bytes: Vec<u8>) -> Result<String> {
    if source.ends_with(".gz") {
        let mut text = String::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_string(&mut text)
            .with_context(|| format!("failed to decompress {source}"))?;
        Ok(text)
    } else {
        String::from_utf8(bytes).with_context(|| format!("{source} is not valid UTF-8"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    const CSV: &str = "Date,Day,Time,Occupancy\n15.03.2024,Friday,14:30,25\n";

    #[test]
    fn test_decode_plain_text() {
        let text = decode_text("data.csv", CSV.as_bytes().to_vec()).unwrap();
        assert_eq!(text, CSV);
    }

    #[test]
    fn test_decode_gzip() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(CSV.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let text = decode_text("data.csv.gz", compressed).unwrap();
        assert_eq!(text, CSV);
    }

    #[test]
    fn test_decode_invalid_utf8() {
        assert!(decode_text("data.csv", vec![0xFF, 0xFE]).is_err());
    }

    #[tokio::test]
    async fn test_load_local_file() {
        let path = std::env::temp_dir().join("occupancy_heatmap_test_load.csv");
        std::fs::write(&path, CSV).unwrap();

        let client = BasicClient::new().unwrap();
        let text = load_source(&client, path.to_str().unwrap()).await.unwrap();
        assert_eq!(text, CSV);

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let client = BasicClient::new().unwrap();
        let result = load_source(&client, "/nonexistent/occupancy.csv").await;
        assert!(result.is_err());
    }
}
