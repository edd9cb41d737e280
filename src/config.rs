use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_OUTPUT_DIR: &str = "./output";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Where converted books are stored and served from.
    pub output_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = lookup("FB2_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("FB2_BIND_ADDR is not a socket address")?;

        let output_dir = lookup("FB2_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let max_upload_bytes = match lookup("FB2_MAX_UPLOAD_BYTES") {
            Some(value) => value
                .parse()
                .with_context(|| format!("FB2_MAX_UPLOAD_BYTES is not a byte count: {}", value))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Config {
            bind_addr,
            output_dir,
            max_upload_bytes,
        })
    }
}
