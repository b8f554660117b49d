//! Raw extractor records to canonical records

use crate::error::{ExportError, Result};
use crate::record::{PlaylistRecord, SubscriptionEntry, VideoRecord, DEFAULT_PLAYLIST_NAME, UNKNOWN};
use crate::stamp::Stamper;
use crate::text::{clean_text, to_int};
use tracing::{debug, warn};
use ytexport_extract::{ExtractError, MetadataSource, RawRecord};

pub const CHANNEL_URL: &str = "https://www.youtube.com/channel/";

pub fn video_from_entry(raw: &RawRecord, stamper: &Stamper) -> VideoRecord {
    let text_or_unknown = |keys: &[&str]| {
        clean_text(Some(raw.first_text(keys).as_deref().unwrap_or(UNKNOWN)))
    };

    VideoRecord {
        video_id: text_or_unknown(&["id"]),
        title: text_or_unknown(&["title"]),
        author: text_or_unknown(&["channel", "uploader"]),
        author_id: text_or_unknown(&["channel_id", "uploader_id"]),
        length_seconds: to_int(raw.text("duration").as_deref()),
        published: to_int(raw.text("timestamp").as_deref()),
        time_added: stamper.now_ms(),
        playlist_item_id: stamper.unique_id(),
        kind: "video".to_string(),
    }
}

pub fn video_placeholder(video_id: &str, stamper: &Stamper) -> VideoRecord {
    VideoRecord::placeholder(video_id, stamper)
}

/// Full record when the lookup produced an `id` and a non-null `title`,
/// otherwise a placeholder for `video_id`.
pub fn video_from_lookup(
    video_id: &str,
    lookup: std::result::Result<RawRecord, ExtractError>,
    stamper: &Stamper,
) -> VideoRecord {
    match lookup {
        Ok(raw) if raw.has("id") && raw.is_present("title") => video_from_entry(&raw, stamper),
        Ok(_) => {
            debug!("No usable metadata for {}, using placeholder", video_id);
            video_placeholder(video_id, stamper)
        }
        Err(e) => {
            warn!("Lookup failed for {}: {}", video_id, e);
            video_placeholder(video_id, stamper)
        }
    }
}

/// Build a playlist from a flat listing. Entries whose ID is empty after
/// cleaning are skipped; everything else keeps source order.
pub fn playlist_from_entries(
    raw: &RawRecord,
    name_override: Option<&str>,
    description: &str,
    stamper: &Stamper,
) -> PlaylistRecord {
    let name = match name_override.filter(|n| !n.is_empty()) {
        Some(n) => n.to_string(),
        None => clean_text(raw.text("title").as_deref()),
    };
    let name = if name.is_empty() {
        DEFAULT_PLAYLIST_NAME.to_string()
    } else {
        name
    };

    let mut playlist = PlaylistRecord::new(&name, description, stamper);
    for entry in raw.entries() {
        if clean_text(entry.text("id").as_deref()).is_empty() {
            continue;
        }
        playlist.add_video(video_from_entry(&entry, stamper), stamper);
    }
    playlist
}

/// Build a playlist by looking up each ID in turn. A failed lookup degrades
/// to a placeholder and never aborts the build.
pub async fn playlist_from_ids<S, F>(
    ids: &[String],
    source: &S,
    name: &str,
    description: &str,
    stamper: &Stamper,
    mut on_video: F,
) -> PlaylistRecord
where
    S: MetadataSource + ?Sized,
    F: FnMut(usize, &VideoRecord),
{
    let name = if name.is_empty() {
        format!("Imported IDs ({} videos)", ids.len())
    } else {
        name.to_string()
    };

    let mut playlist = PlaylistRecord::new(&name, description, stamper);
    for (idx, id) in ids.iter().enumerate() {
        let lookup = source.video(id).await;
        let video = video_from_lookup(id, lookup, stamper);
        on_video(idx, &video);
        playlist.add_video(video, stamper);
    }
    playlist
}

/// Channel entries of the `/feed/channels` listing, in feed order.
pub fn subscriptions_from_feed(raw: &RawRecord) -> Result<Vec<SubscriptionEntry>> {
    if !raw.has("entries") {
        return Err(ExportError::SubscriptionsFetch(
            "could not extract subscriptions list (login cookies may be invalid)".to_string(),
        ));
    }

    Ok(raw
        .entries()
        .into_iter()
        .filter_map(|entry| {
            let channel_id = entry.first_text(&["channel_id", "id"])?;
            let display_name = entry
                .first_text(&["title", "channel"])
                .unwrap_or_else(|| "Unknown".to_string());
            Some(SubscriptionEntry {
                channel_url: format!("{}{}", CHANNEL_URL, channel_id),
                display_name,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeSource {
        videos: HashMap<String, serde_json::Value>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MetadataSource for FakeSource {
        async fn playlist(&self, url: &str) -> std::result::Result<RawRecord, ExtractError> {
            Err(ExtractError::NoData(url.to_string()))
        }

        async fn video(&self, video_id: &str) -> std::result::Result<RawRecord, ExtractError> {
            self.calls.lock().unwrap().push(video_id.to_string());
            self.videos
                .get(video_id)
                .cloned()
                .map(RawRecord::new)
                .ok_or_else(|| ExtractError::Unavailable(video_id.to_string()))
        }

        async fn subscriptions(&self) -> std::result::Result<RawRecord, ExtractError> {
            Err(ExtractError::NoData("subs".to_string()))
        }
    }

    #[test]
    fn test_video_from_entry_mapping() {
        let stamper = Stamper::fixed(500);
        let raw = RawRecord::new(json!({
            "id": "dQw4w9WgXcQ",
            "title": " Never\u{200B} Gonna ",
            "uploader": "Rick",
            "uploader_id": "@rick",
            "duration": 212.0,
            "timestamp": "1,256,000",
        }));

        let video = video_from_entry(&raw, &stamper);
        assert_eq!(video.video_id, "dQw4w9WgXcQ");
        assert_eq!(video.title, "Never Gonna");
        assert_eq!(video.author, "Rick");
        assert_eq!(video.author_id, "@rick");
        assert_eq!(video.length_seconds, 212);
        assert_eq!(video.published, 1_256_000);
        assert_eq!(video.time_added, 500);
        assert_eq!(video.playlist_item_id, "id-1");
    }

    #[test]
    fn test_video_from_entry_defaults() {
        let video = video_from_entry(&RawRecord::new(json!({})), &Stamper::fixed(0));
        assert_eq!(video.video_id, "N/A");
        assert_eq!(video.author, "N/A");
        assert_eq!(video.length_seconds, 0);
        assert_eq!(video.published, 0);
    }

    #[test]
    fn test_playlist_skips_empty_ids() {
        let stamper = Stamper::fixed(0);
        let raw = RawRecord::new(json!({
            "title": "Mix",
            "entries": [
                {"id": "aaaaaaaaaaA", "title": "one"},
                {"id": " \u{200B} ", "title": "two"},
                {"id": "cccccccccc0", "title": "three"},
            ],
        }));

        let playlist = playlist_from_entries(&raw, None, "", &stamper);
        assert_eq!(playlist.playlist_name, "Mix");
        assert_eq!(playlist.video_ids(), vec!["aaaaaaaaaaA", "cccccccccc0"]);
    }

    #[test]
    fn test_playlist_name_precedence() {
        let stamper = Stamper::fixed(0);
        let raw = RawRecord::new(json!({"title": "Upstream"}));
        assert_eq!(playlist_from_entries(&raw, Some("Mine"), "", &stamper).playlist_name, "Mine");
        assert_eq!(playlist_from_entries(&raw, None, "", &stamper).playlist_name, "Upstream");
        let untitled = RawRecord::new(json!({"title": "\u{FEFF}"}));
        assert_eq!(
            playlist_from_entries(&untitled, None, "d", &stamper).playlist_name,
            "Imported Playlist"
        );
    }

    #[tokio::test]
    async fn test_playlist_from_ids_degrades_to_placeholder() {
        let source = FakeSource {
            videos: HashMap::from([
                ("aaaaaaaaaaA".to_string(), json!({"id": "aaaaaaaaaaA", "title": "Found", "channel": "Chan"})),
                ("bbbbbbbbbbE".to_string(), json!({"id": "bbbbbbbbbbE", "title": null})),
            ]),
            calls: Mutex::new(Vec::new()),
        };
        let ids: Vec<String> = ["aaaaaaaaaaA", "bbbbbbbbbbE", "cccccccccc0"].iter().map(|s| s.to_string()).collect();
        let stamper = Stamper::fixed(0);
        let mut seen = Vec::new();

        let playlist = playlist_from_ids(&ids, &source, "", "", &stamper, |idx, v| {
            seen.push((idx, v.video_id.clone()))
        })
        .await;

        assert_eq!(playlist.playlist_name, "Imported IDs (3 videos)");
        assert_eq!(*source.calls.lock().unwrap(), ids);
        assert_eq!(playlist.videos[0].title, "Found");
        assert_eq!(playlist.videos[0].author, "Chan");
        assert_eq!(playlist.videos[1].title, "N/A");
        assert_eq!(playlist.videos[1].video_id, "bbbbbbbbbbE");
        assert_eq!(playlist.videos[2].video_id, "cccccccccc0");
        assert_eq!(playlist.videos[2].author_id, "N/A");
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_subscriptions_from_feed() {
        let raw = RawRecord::new(json!({
            "entries": [
                {"id": "UC1", "title": "First"},
                null,
                {"channel_id": "UC2", "channel": "Second"},
                {"title": "no id"},
                {"id": "UC1", "title": "First"},
                {"id": "UC3"},
            ]
        }));
        let subs = subscriptions_from_feed(&raw).unwrap();
        assert_eq!(subs.len(), 4);
        assert_eq!(subs[0].channel_url, "https://www.youtube.com/channel/UC1");
        assert_eq!(subs[1].display_name, "Second");
        assert_eq!(subs[2], subs[0]);
        assert_eq!(subs[3].display_name, "Unknown");
    }

    #[test]
    fn test_subscriptions_without_entries_is_error() {
        assert!(subscriptions_from_feed(&RawRecord::new(json!({"title": "x"}))).is_err());
    }
}
