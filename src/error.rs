use std::path::PathBuf;
use thiserror::Error;

/// Failures a conversion reports to its caller.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("No chapters to convert")]
    NoContent,

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
