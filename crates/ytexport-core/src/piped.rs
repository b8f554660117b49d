//! Piped exporters: playlist JSON (whole or chunked) and the video CSV

use crate::error::Result;
use crate::output::{join_output, write_file, write_json, StemAllocator};
use crate::record::PlaylistSummary;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const WATCH_URL: &str = "https://youtube.com/watch?v=";
pub const DEFAULT_JSON: &str = "piped.json";
pub const DEFAULT_CSV: &str = "piped.csv";
pub const CHUNKS_DIR: &str = "chunks";

#[derive(Debug, Serialize)]
pub struct PipedDocument {
    pub format: &'static str,
    pub version: u32,
    pub playlists: Vec<PipedPlaylist>,
}

#[derive(Debug, Serialize)]
pub struct PipedPlaylist {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub visibility: &'static str,
    pub videos: Vec<String>,
}

impl PipedDocument {
    pub fn new(playlists: Vec<PipedPlaylist>) -> Self {
        Self {
            format: "Piped",
            version: 1,
            playlists,
        }
    }
}

impl PipedPlaylist {
    pub fn new(name: &str, video_ids: &[String]) -> Self {
        Self {
            name: name.to_string(),
            kind: "playlist",
            visibility: "private",
            videos: video_ids.iter().map(|id| watch_url(id)).collect(),
        }
    }
}

pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL, video_id)
}

pub fn export_json(playlists: &[PlaylistSummary], out_path: Option<&Path>, pretty: bool) -> Result<PathBuf> {
    let path = out_path.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(DEFAULT_JSON));
    let doc = PipedDocument::new(
        playlists
            .iter()
            .map(|p| PipedPlaylist::new(&p.name, &p.video_ids))
            .collect(),
    );
    write_json(&path, &doc, pretty)?;
    info!("Wrote Piped JSON: {}", path.display());
    Ok(path)
}

/// A single chunk file written by [`export_json_split`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFile {
    pub path: PathBuf,
    pub videos: usize,
}

/// Split every playlist into runs of `split` videos, one Piped document per
/// run, named `{base}_{playlist}_{NNN}.json`.
///
/// `base` is the stem of `out_path` (default `piped`). Files go to
/// `split_dir`, else `chunks/{base}`. Chunks never mix playlists.
pub fn export_json_split(
    playlists: &[PlaylistSummary],
    out_path: Option<&Path>,
    split: usize,
    split_dir: Option<&Path>,
    pretty: bool,
) -> Result<(PathBuf, Vec<ChunkFile>)> {
    let split = split.max(1);
    let base = out_path
        .unwrap_or(Path::new(DEFAULT_JSON))
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "piped".to_string());
    let out_dir = split_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Path::new(CHUNKS_DIR).join(&base));
    std::fs::create_dir_all(&out_dir)?;

    let mut stems = StemAllocator::new();
    let mut chunks = Vec::new();
    for playlist in playlists {
        let stem = stems.allocate(&playlist.name, &playlist.id);
        for (idx, chunk) in playlist.video_ids.chunks(split).enumerate() {
            let doc = PipedDocument::new(vec![PipedPlaylist::new(&playlist.name, chunk)]);
            let path = join_output(&out_dir, &format!("{}_{}_{:03}.json", base, stem, idx + 1));
            write_json(&path, &doc, pretty)?;
            debug!("Wrote {} ({} videos)", path.display(), chunk.len());
            chunks.push(ChunkFile {
                path,
                videos: chunk.len(),
            });
        }
    }

    info!(
        "Split Piped JSON finished: {} files in {}",
        chunks.len(),
        out_dir.display()
    );
    Ok((out_dir, chunks))
}

/// `videoId,addedAt` table; `addedAt` is always left empty.
pub fn export_csv<'a, I>(video_ids: I, out_path: Option<&Path>) -> Result<PathBuf>
where
    I: IntoIterator<Item = &'a str>,
{
    let path = out_path.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(DEFAULT_CSV));
    write_file(&path, |w| {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::CRLF)
            .from_writer(w);
        writer.write_record(["videoId", "addedAt"])?;
        for id in video_ids {
            writer.write_record([id, ""])?;
        }
        writer.flush()?;
        Ok(())
    })?;
    info!("Wrote Piped CSV: {}", path.display());
    Ok(path)
}
