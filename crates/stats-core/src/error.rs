use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by browser-stats.
#[derive(Error, Debug)]
pub enum StatsError {
    /// A required dataset file is not present on disk.
    #[error("Data not present ({path}). First run `browser-stats --download`")]
    MissingData { path: PathBuf },

    /// A file exists but could not be read.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed or did not match the dataset shape.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A version key that is neither numeric, a sentinel, nor a range.
    #[error("Invalid version: {0:?}")]
    InvalidVersion(String),

    /// A region was requested that is not `global` or a configured region.
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fetching a dataset file over HTTP failed.
    #[error("Failed to download {url}: {message}")]
    Download { url: String, message: String },

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the browser-stats crates.
pub type Result<T> = std::result::Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_data() {
        let err = StatsError::MissingData {
            path: PathBuf::from("data/AU.json"),
        };
        assert_eq!(
            err.to_string(),
            "Data not present (data/AU.json). First run `browser-stats --download`"
        );
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StatsError::FileRead {
            path: PathBuf::from("/data/data.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/data.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_error_display_invalid_version() {
        let err = StatsError::InvalidVersion("beta".to_string());
        assert_eq!(err.to_string(), "Invalid version: \"beta\"");
    }

    #[test]
    fn test_error_display_unknown_region() {
        let err = StatsError::UnknownRegion("XX".to_string());
        assert_eq!(err.to_string(), "Unknown region: XX");
    }

    #[test]
    fn test_error_display_download() {
        let err = StatsError::Download {
            url: "https://example.com/a.json".to_string(),
            message: "HTTP 404".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to download https://example.com/a.json: HTTP 404"
        );
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: StatsError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: StatsError = io_err.into();
        assert!(err.to_string().contains("boom"));
    }
}
