//! Error types for metadata extraction

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("yt-dlp not found. Install with: pip install yt-dlp")]
    YtDlpNotFound,

    #[error("yt-dlp failed with exit code {code:?}: {stderr}")]
    YtDlpFailed { code: Option<i32>, stderr: String },

    #[error("yt-dlp returned no data for {0}")]
    NoData(String),

    #[error("Video unavailable or private: {0}")]
    Unavailable(String),

    #[error("Sign-in required for {0} (check cookies)")]
    SignInRequired(String),

    #[error("Invalid browser cookie spec: {0}")]
    InvalidCookieSpec(String),

    #[error("Failed to parse yt-dlp output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
