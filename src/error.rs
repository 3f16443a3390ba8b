use std::path::PathBuf;

/// Failures that end the current command. Per-archive problems during
/// indexing never reach this type; they are logged and skipped.
#[derive(Debug, thiserror::Error)]
pub enum JdocError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Index not found at {0} (run `jdoc index` first)")]
    MissingIndex(PathBuf),

    #[error("Unsupported document layout in {path}: missing {region}")]
    MalformedDocument { path: PathBuf, region: &'static str },

    #[error("Source file not found: {0} (only documentation was extracted for this archive)")]
    SourceNotFound(PathBuf),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}
