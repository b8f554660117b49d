//! Pipeline orchestration: resolve inputs, build canonical records, export

use crate::error::{ExportError, Result};
use crate::freetube;
use crate::lists;
use crate::mapper::{playlist_from_entries, playlist_from_ids, subscriptions_from_feed};
use crate::newpipe::{self, AppVersion};
use crate::piped;
use crate::record::{PlaylistRecord, PlaylistSummary};
use crate::stamp::Stamper;
use crate::text::read_ids_file;

use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, info};
use ytexport_extract::MetadataSource;

/// Export target, one per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    FreetubeDb,
    FreetubeJson,
    PipedJson,
    PipedCsv,
    Urls,
    Ids,
    NewpipeSubs,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::FreetubeDb => write!(f, "FreeTube database"),
            ExportFormat::FreetubeJson => write!(f, "FreeTube JSON"),
            ExportFormat::PipedJson => write!(f, "Piped JSON"),
            ExportFormat::PipedCsv => write!(f, "Piped CSV"),
            ExportFormat::Urls => write!(f, "URL list"),
            ExportFormat::Ids => write!(f, "ID list"),
            ExportFormat::NewpipeSubs => write!(f, "NewPipe subscriptions"),
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub playlist_urls: Vec<String>,
    pub ids_file: Option<PathBuf>,
    /// Name for the ID-file playlist, or for the playlist of a single URL
    pub name: Option<String>,
    pub description: String,
    pub format: ExportFormat,
    pub output: Option<PathBuf>,
    /// FreeTube database file or directory
    pub db_path: Option<PathBuf>,
    pub split: Option<usize>,
    pub split_dir: Option<PathBuf>,
    pub pretty: bool,
    pub newpipe_version: AppVersion,
}

/// Pipeline progress stages
#[derive(Debug, Clone)]
pub enum PipelineStage {
    FetchingPlaylist { index: usize, total: usize, url: String },
    ResolvingIds { total: usize },
    VideoResolved { index: usize, total: usize, video_id: String, title: String, author: String },
    PlaylistBuilt { name: String, videos: usize },
    FetchingSubscriptions,
    SubscriptionsFetched { count: usize },
    Exporting { format: ExportFormat },
    ChunkWritten { path: PathBuf, videos: usize },
    Complete { paths: Vec<PathBuf> },
    Failed { stage: String, error: String },
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub paths: Vec<PathBuf>,
    pub records: usize,
}

/// Main export pipeline
pub struct Pipeline {
    config: PipelineConfig,
    source: Box<dyn MetadataSource>,
    stamper: Stamper,
    progress_tx: mpsc::UnboundedSender<PipelineStage>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        source: Box<dyn MetadataSource>,
        stamper: Stamper,
        progress_tx: mpsc::UnboundedSender<PipelineStage>,
    ) -> Self {
        Self {
            config,
            source,
            stamper,
            progress_tx,
        }
    }

    pub async fn run(&self) -> Result<ExportOutcome> {
        let result = if self.config.format == ExportFormat::NewpipeSubs {
            self.run_subscriptions().await
        } else {
            self.run_playlists().await
        };

        if let Err(ref e) = result {
            self.emit(PipelineStage::Failed {
                stage: self.config.format.to_string(),
                error: e.to_string(),
            });
        }
        result
    }

    fn emit(&self, stage: PipelineStage) {
        // The receiver going away only means nobody is rendering progress.
        let _ = self.progress_tx.send(stage);
    }

    async fn run_subscriptions(&self) -> Result<ExportOutcome> {
        self.emit(PipelineStage::FetchingSubscriptions);

        let raw = self
            .source
            .subscriptions()
            .await
            .map_err(|e| ExportError::SubscriptionsFetch(e.to_string()))?;
        let subs = subscriptions_from_feed(&raw)?;
        if subs.is_empty() {
            return Err(ExportError::NoSubscriptions);
        }
        self.emit(PipelineStage::SubscriptionsFetched { count: subs.len() });
        self.emit(PipelineStage::Exporting {
            format: self.config.format,
        });

        let path = newpipe::export_subscriptions(
            &subs,
            self.config.output.as_deref(),
            &self.config.newpipe_version,
            self.config.pretty,
        )?;
        self.finish(vec![path], subs.len())
    }

    async fn run_playlists(&self) -> Result<ExportOutcome> {
        if self.config.playlist_urls.is_empty() && self.config.ids_file.is_none() {
            return Err(ExportError::Usage(
                "Provide playlist URL(s) or --ids-file, or use --export newpipe-subs".to_string(),
            ));
        }

        let playlists = self.collect_playlists().await?;
        let records = playlists.iter().map(|p| p.videos.len()).sum();
        self.emit(PipelineStage::Exporting {
            format: self.config.format,
        });
        let paths = self.dispatch(&playlists)?;
        self.finish(paths, records)
    }

    fn finish(&self, paths: Vec<PathBuf>, records: usize) -> Result<ExportOutcome> {
        self.emit(PipelineStage::Complete {
            paths: paths.clone(),
        });
        Ok(ExportOutcome { paths, records })
    }

    /// ID-file playlist first, then one playlist per URL in the order given.
    async fn collect_playlists(&self) -> Result<Vec<PlaylistRecord>> {
        let mut playlists = Vec::new();

        if let Some(ref ids_file) = self.config.ids_file {
            playlists.push(self.playlist_from_ids_file(ids_file).await?);
        }

        let total = self.config.playlist_urls.len();
        let name_override = match (&self.config.name, total) {
            (Some(name), 1) => Some(name.as_str()),
            _ => None,
        };

        for (index, url) in self.config.playlist_urls.iter().enumerate() {
            self.emit(PipelineStage::FetchingPlaylist {
                index,
                total,
                url: url.clone(),
            });
            let raw = self
                .source
                .playlist(url)
                .await
                .map_err(|source| ExportError::PlaylistFetch {
                    url: url.clone(),
                    source,
                })?;
            let playlist =
                playlist_from_entries(&raw, name_override, &self.config.description, &self.stamper);
            info!(
                "Playlist '{}': {} videos",
                playlist.playlist_name,
                playlist.videos.len()
            );
            self.emit(PipelineStage::PlaylistBuilt {
                name: playlist.playlist_name.clone(),
                videos: playlist.videos.len(),
            });
            playlists.push(playlist);
        }

        Ok(playlists)
    }

    async fn playlist_from_ids_file(&self, ids_file: &Path) -> Result<PlaylistRecord> {
        let ids = read_ids_file(ids_file)?;
        if ids.is_empty() {
            return Err(ExportError::NoValidIds(ids_file.to_path_buf()));
        }
        debug!("Read {} IDs from {}", ids.len(), ids_file.display());

        let name = self
            .config
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| {
                ids_file
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_else(|| format!("Imported IDs ({})", ids.len()));

        let total = ids.len();
        self.emit(PipelineStage::ResolvingIds { total });
        let playlist = playlist_from_ids(
            &ids,
            self.source.as_ref(),
            &name,
            &self.config.description,
            &self.stamper,
            |index, video| {
                self.emit(PipelineStage::VideoResolved {
                    index,
                    total,
                    video_id: video.video_id.clone(),
                    title: video.title.clone(),
                    author: video.author.clone(),
                })
            },
        )
        .await;

        self.emit(PipelineStage::PlaylistBuilt {
            name: playlist.playlist_name.clone(),
            videos: playlist.videos.len(),
        });
        Ok(playlist)
    }

    fn dispatch(&self, playlists: &[PlaylistRecord]) -> Result<Vec<PathBuf>> {
        let output = self.config.output.as_deref();
        let pretty = self.config.pretty;
        let summaries: Vec<PlaylistSummary> = playlists.iter().map(PlaylistRecord::summary).collect();
        let flat_ids: Vec<&str> = summaries
            .iter()
            .flat_map(|s| s.video_ids.iter().map(String::as_str))
            .collect();

        match self.config.format {
            ExportFormat::FreetubeDb => {
                let db_path = freetube::resolve_db_path(self.config.db_path.as_deref());
                for playlist in playlists {
                    freetube::append_to_db(playlist, &db_path)?;
                }
                Ok(vec![db_path])
            }
            ExportFormat::FreetubeJson => match playlists {
                [single] => Ok(vec![freetube::export_json(single, output, pretty)?]),
                many => freetube::export_json_dir(many, output, pretty),
            },
            ExportFormat::PipedJson => match self.config.split {
                Some(split) => {
                    let (out_dir, chunks) = piped::export_json_split(
                        &summaries,
                        output,
                        split,
                        self.config.split_dir.as_deref(),
                        pretty,
                    )?;
                    for chunk in &chunks {
                        self.emit(PipelineStage::ChunkWritten {
                            path: chunk.path.clone(),
                            videos: chunk.videos,
                        });
                    }
                    Ok(vec![out_dir])
                }
                None => Ok(vec![piped::export_json(&summaries, output, pretty)?]),
            },
            ExportFormat::PipedCsv => Ok(vec![piped::export_csv(flat_ids, output)?]),
            ExportFormat::Urls => Ok(vec![lists::export_urls(flat_ids, output)?]),
            ExportFormat::Ids => Ok(vec![lists::export_ids(flat_ids, output)?]),
            ExportFormat::NewpipeSubs => Err(ExportError::Usage(
                "Subscriptions export does not take playlist input".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use ytexport_extract::{ExtractError, RawRecord};

    #[derive(Default)]
    struct FakeSource {
        playlists: HashMap<String, serde_json::Value>,
        videos: HashMap<String, serde_json::Value>,
        subscriptions: Option<serde_json::Value>,
    }

    #[async_trait]
    impl MetadataSource for FakeSource {
        async fn playlist(&self, url: &str) -> std::result::Result<RawRecord, ExtractError> {
            self.playlists
                .get(url)
                .cloned()
                .map(RawRecord::new)
                .ok_or_else(|| ExtractError::NoData(url.to_string()))
        }

        async fn video(&self, video_id: &str) -> std::result::Result<RawRecord, ExtractError> {
            self.videos
                .get(video_id)
                .cloned()
                .map(RawRecord::new)
                .ok_or_else(|| ExtractError::Unavailable(video_id.to_string()))
        }

        async fn subscriptions(&self) -> std::result::Result<RawRecord, ExtractError> {
            self.subscriptions
                .clone()
                .map(RawRecord::new)
                .ok_or_else(|| ExtractError::NoData("feed".to_string()))
        }
    }

    fn config(format: ExportFormat, output: Option<PathBuf>) -> PipelineConfig {
        PipelineConfig {
            playlist_urls: Vec::new(),
            ids_file: None,
            name: None,
            description: String::new(),
            format,
            output,
            db_path: None,
            split: None,
            split_dir: None,
            pretty: false,
            newpipe_version: AppVersion {
                name: "0.19.8".to_string(),
                code: 953,
            },
        }
    }

    fn build(config: PipelineConfig, source: FakeSource) -> (Pipeline, mpsc::UnboundedReceiver<PipelineStage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Pipeline::new(config, Box::new(source), Stamper::fixed(1_000), tx), rx)
    }

    fn two_playlists() -> FakeSource {
        FakeSource {
            playlists: HashMap::from([
                (
                    "u1".to_string(),
                    json!({"title": "First", "entries": [{"id": "aaaaaaaaaaA"}, {"id": "bbbbbbbbbbE"}]}),
                ),
                (
                    "u2".to_string(),
                    json!({"title": "Second", "entries": [{"id": "cccccccccc0"}, null, {"id": ""}]}),
                ),
            ]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_ids_export_concatenates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("ids.txt");
        let mut cfg = config(ExportFormat::Ids, Some(out.clone()));
        cfg.playlist_urls = vec!["u1".to_string(), "u2".to_string()];

        let (pipeline, _rx) = build(cfg, two_playlists());
        let outcome = pipeline.run().await.unwrap();

        assert_eq!(outcome.paths, vec![out.clone()]);
        assert_eq!(outcome.records, 3);
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "aaaaaaaaaaA\nbbbbbbbbbbE\ncccccccccc0\n"
        );
    }

    #[tokio::test]
    async fn test_ids_file_with_failed_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let ids_file = dir.path().join("favourites.txt");
        std::fs::write(&ids_file, "# faves\naaaaaaaaaaA\nhttps://youtu.be/bbbbbbbbbbE\n").unwrap();
        let db = dir.path().join("playlists.db");

        let source = FakeSource {
            videos: HashMap::from([(
                "aaaaaaaaaaA".to_string(),
                json!({"id": "aaaaaaaaaaA", "title": "Known", "channel": "Chan", "duration": 61}),
            )]),
            ..Default::default()
        };
        let mut cfg = config(ExportFormat::FreetubeDb, None);
        cfg.ids_file = Some(ids_file);
        cfg.db_path = Some(db.clone());

        let (pipeline, mut rx) = build(cfg, source);
        pipeline.run().await.unwrap();

        let line = std::fs::read_to_string(&db).unwrap();
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["playlistName"], "favourites");
        assert_eq!(value["videos"][0]["title"], "Known");
        assert_eq!(value["videos"][0]["lengthSeconds"], 61);
        assert_eq!(value["videos"][1]["videoId"], "bbbbbbbbbbE");
        assert_eq!(value["videos"][1]["title"], "N/A");
        assert_eq!(value["videos"][1]["author"], "N/A");

        let mut resolved = 0;
        while let Ok(stage) = rx.try_recv() {
            if matches!(stage, PipelineStage::VideoResolved { .. }) {
                resolved += 1;
            }
        }
        assert_eq!(resolved, 2);
    }

    #[tokio::test]
    async fn test_ids_file_without_ids_fails() {
        let dir = tempfile::tempdir().unwrap();
        let ids_file = dir.path().join("empty.txt");
        std::fs::write(&ids_file, "# nothing\n\n").unwrap();
        let mut cfg = config(ExportFormat::Ids, Some(dir.path().join("out.txt")));
        cfg.ids_file = Some(ids_file);

        let (pipeline, _rx) = build(cfg, FakeSource::default());
        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(err, ExportError::NoValidIds(_)));
        assert_eq!(err.exit_code(), 1);
        assert!(!dir.path().join("out.txt").exists());
    }

    #[tokio::test]
    async fn test_missing_input_is_usage_error() {
        let (pipeline, _rx) = build(config(ExportFormat::Urls, None), FakeSource::default());
        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(err, ExportError::Usage(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_playlist_fetch_failure_aborts() {
        let mut cfg = config(ExportFormat::Urls, None);
        cfg.playlist_urls = vec!["u1".to_string(), "missing".to_string()];
        let (pipeline, mut rx) = build(cfg, two_playlists());

        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(err, ExportError::PlaylistFetch { ref url, .. } if url == "missing"));

        let mut failed = false;
        while let Ok(stage) = rx.try_recv() {
            failed |= matches!(stage, PipelineStage::Failed { .. });
        }
        assert!(failed);
    }

    #[tokio::test]
    async fn test_name_override_only_for_single_url() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("piped.json");
        let mut cfg = config(ExportFormat::PipedJson, Some(out.clone()));
        cfg.playlist_urls = vec!["u1".to_string()];
        cfg.name = Some("Renamed".to_string());

        let (pipeline, _rx) = build(cfg.clone(), two_playlists());
        pipeline.run().await.unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["playlists"][0]["name"], "Renamed");

        cfg.playlist_urls.push("u2".to_string());
        let (pipeline, _rx) = build(cfg, two_playlists());
        pipeline.run().await.unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["playlists"][0]["name"], "First");
        assert_eq!(value["playlists"][1]["name"], "Second");
    }

    #[tokio::test]
    async fn test_split_reports_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let chunk_dir = dir.path().join("chunks");
        let mut cfg = config(ExportFormat::PipedJson, None);
        cfg.playlist_urls = vec!["u1".to_string(), "u2".to_string()];
        cfg.split = Some(1);
        cfg.split_dir = Some(chunk_dir.clone());

        let (pipeline, mut rx) = build(cfg, two_playlists());
        let outcome = pipeline.run().await.unwrap();
        assert_eq!(outcome.paths, vec![chunk_dir.clone()]);

        let mut chunks = Vec::new();
        while let Ok(stage) = rx.try_recv() {
            if let PipelineStage::ChunkWritten { path, .. } = stage {
                chunks.push(path.file_name().unwrap().to_string_lossy().into_owned());
            }
        }
        assert_eq!(
            chunks,
            vec!["piped_First_001.json", "piped_First_002.json", "piped_Second_001.json"]
        );
    }

    #[tokio::test]
    async fn test_empty_subscriptions_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("subs.json");
        let source = FakeSource {
            subscriptions: Some(json!({"entries": []})),
            ..Default::default()
        };

        let (pipeline, _rx) = build(config(ExportFormat::NewpipeSubs, Some(out.clone())), source);
        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(err, ExportError::NoSubscriptions));
        assert_eq!(err.exit_code(), 2);
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_subscription_fetch_error_exits_one() {
        let (pipeline, _rx) = build(config(ExportFormat::NewpipeSubs, None), FakeSource::default());
        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(err, ExportError::SubscriptionsFetch(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_subscriptions_export() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("subs.json");
        let source = FakeSource {
            subscriptions: Some(json!({"entries": [{"id": "UC1", "title": "One"}, {"id": "UC1", "title": "One"}]})),
            ..Default::default()
        };

        let (pipeline, _rx) = build(config(ExportFormat::NewpipeSubs, Some(out.clone())), source);
        let outcome = pipeline.run().await.unwrap();
        assert_eq!(outcome.records, 2);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["subscriptions"].as_array().unwrap().len(), 2);
        assert_eq!(value["app_version_int"], 953);
    }
}
