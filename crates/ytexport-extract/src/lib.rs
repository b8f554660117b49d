//! Metadata extraction bridge for yt-playlist-export
//!
//! This crate wraps the external `yt-dlp` tool:
//! - `MetadataSource`: the lookups the exporter needs (playlist, video, subscriptions)
//! - `YtDlp`: process-backed implementation printing single JSON documents
//! - `RawRecord`: schema-less view over whatever yt-dlp printed

mod cookies;
mod error;
mod raw;
mod ytdlp;

pub use cookies::{BrowserSpec, SUPPORTED_BROWSERS, SUPPORTED_KEYRINGS};
pub use error::ExtractError;
pub use raw::RawRecord;
pub use ytdlp::{YtDlp, YtDlpOptions, SUBSCRIPTIONS_FEED, WATCH_URL};

use async_trait::async_trait;

/// Resolves URLs and IDs into raw extractor records.
///
/// Calls are awaited one at a time by the pipeline; implementations need not
/// support overlapping requests.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Flat listing of a playlist (or channel tab) with its `entries`.
    async fn playlist(&self, url: &str) -> Result<RawRecord, ExtractError>;

    /// Metadata for a single video ID.
    async fn video(&self, video_id: &str) -> Result<RawRecord, ExtractError>;

    /// The logged-in account's channel subscriptions feed.
    async fn subscriptions(&self) -> Result<RawRecord, ExtractError>;
}
