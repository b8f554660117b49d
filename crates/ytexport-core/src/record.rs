//! Canonical records
//!
//! Field names and order follow FreeTube's playlist database schema.

use crate::stamp::Stamper;
use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "N/A";
pub const DEFAULT_PLAYLIST_NAME: &str = "Imported Playlist";
pub const PLAYLIST_ID_PREFIX: &str = "ft-playlist--";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub author: String,
    pub author_id: String,
    pub length_seconds: u64,
    pub published: u64,
    pub time_added: i64,
    pub playlist_item_id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl VideoRecord {
    /// Record with only the ID known.
    pub fn placeholder(video_id: &str, stamper: &Stamper) -> Self {
        Self {
            video_id: video_id.to_string(),
            title: UNKNOWN.to_string(),
            author: UNKNOWN.to_string(),
            author_id: UNKNOWN.to_string(),
            length_seconds: 0,
            published: 0,
            time_added: stamper.now_ms(),
            playlist_item_id: stamper.unique_id(),
            kind: "video".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistRecord {
    pub playlist_name: String,
    pub protected: bool,
    pub description: String,
    pub videos: Vec<VideoRecord>,
    #[serde(rename = "_id")]
    pub id: String,
    pub created_at: i64,
    pub last_updated_at: i64,
}

impl PlaylistRecord {
    pub fn new(name: &str, description: &str, stamper: &Stamper) -> Self {
        let ts = stamper.now_ms();
        let playlist_name = if name.is_empty() {
            DEFAULT_PLAYLIST_NAME.to_string()
        } else {
            name.to_string()
        };
        Self {
            playlist_name,
            protected: false,
            description: description.to_string(),
            videos: Vec::new(),
            id: format!("{}{}", PLAYLIST_ID_PREFIX, stamper.unique_id()),
            created_at: ts,
            last_updated_at: ts,
        }
    }

    pub fn add_video(&mut self, video: VideoRecord, stamper: &Stamper) {
        self.videos.push(video);
        self.last_updated_at = stamper.now_ms();
    }

    pub fn video_ids(&self) -> Vec<String> {
        self.videos.iter().map(|v| v.video_id.clone()).collect()
    }

    pub fn summary(&self) -> PlaylistSummary {
        PlaylistSummary {
            id: self.id.clone(),
            name: self.playlist_name.clone(),
            video_ids: self.video_ids(),
        }
    }
}

/// Flattened `(name, [videoId...])` view used by the list-shaped exporters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    /// Owning playlist's generated ID; used when the name sanitizes to nothing
    pub id: String,
    pub name: String,
    pub video_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionEntry {
    pub channel_url: String,
    pub display_name: String,
}
