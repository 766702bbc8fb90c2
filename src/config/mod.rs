use std::env;
use std::path::PathBuf;

/// How rows are streamed into the staging table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestMode {
    /// Load the whole file, `batch_size` rows per multi-row insert.
    Full,
    /// One insert per row, capped at `preview_rows` rows.
    Preview,
}

impl IngestMode {
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "full" => Some(IngestMode::Full),
            "preview" => Some(IngestMode::Preview),
            _ => None,
        }
    }
}

/// Configuration for the bulk import subsystem
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Directory holding previously uploaded files (default: "uploads")
    pub upload_dir: PathBuf,

    /// Bundled fallback directory used when `upload_dir` is missing
    /// (default: "sample_data")
    pub sample_data_dir: PathBuf,

    /// Row ingestion mode: "full" or "preview" (default: "full")
    pub ingest_mode: IngestMode,

    /// Rows accumulated per multi-row insert in full mode (default: 100)
    pub batch_size: usize,

    /// Row cap in preview mode (default: 10)
    pub preview_rows: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            sample_data_dir: PathBuf::from("sample_data"),
            ingest_mode: IngestMode::Full,
            batch_size: 100,
            preview_rows: 10,
        }
    }
}

impl ImportConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),

            sample_data_dir: env::var("SAMPLE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.sample_data_dir),

            ingest_mode: env::var("INGEST_MODE")
                .ok()
                .and_then(|v| IngestMode::parse(&v))
                .unwrap_or(default.ingest_mode),

            batch_size: env::var("BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(default.batch_size),

            preview_rows: env::var("PREVIEW_ROWS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(default.preview_rows),
        }
    }

    /// Create a preview-mode config (bounded row cap, single-row inserts)
    pub fn preview(rows: usize) -> Self {
        Self {
            ingest_mode: IngestMode::Preview,
            preview_rows: rows,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ImportConfig::default();
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.sample_data_dir, PathBuf::from("sample_data"));
        assert_eq!(config.ingest_mode, IngestMode::Full);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.preview_rows, 10);
    }

    #[test]
    fn test_preview_config() {
        let config = ImportConfig::preview(5);
        assert_eq!(config.ingest_mode, IngestMode::Preview);
        assert_eq!(config.preview_rows, 5);
        assert_eq!(config.batch_size, 100);
    }

    #[test]
    fn test_ingest_mode_parse() {
        assert_eq!(IngestMode::parse("full"), Some(IngestMode::Full));
        assert_eq!(IngestMode::parse("Preview"), Some(IngestMode::Preview));
        assert_eq!(IngestMode::parse("stream"), None);
    }
}
