use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use ytexport_core::pipeline::ExportFormat;

#[derive(Parser)]
#[command(name = "yt-playlist-export")]
#[command(
    author,
    version,
    about = "Export YouTube playlists/IDs to FreeTube, Piped and NewPipe"
)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// YouTube playlist URL(s)
    #[arg(value_name = "PLAYLIST_URL")]
    pub playlist_urls: Vec<String>,

    /// File with YouTube IDs or URLs (one per line)
    #[arg(short = 'f', long)]
    pub ids_file: Option<PathBuf>,

    /// Playlist name (single URL or IDs mode)
    #[arg(long)]
    pub name: Option<String>,

    /// Playlist description
    #[arg(long, default_value = "")]
    pub description: String,

    /// cookies-from-browser spec, e.g. "brave:Default"
    #[arg(short = 'c', long)]
    pub browser_cookies: Option<String>,

    /// Path to a Netscape cookie file
    #[arg(long)]
    pub cookies: Option<PathBuf>,

    /// Skip the YouTube tab authentication check
    #[arg(long)]
    pub skip_authcheck: bool,

    /// Sleep between extractor requests (seconds)
    #[arg(long, value_name = "SECONDS")]
    pub sleep: Option<f64>,

    /// Export format
    #[arg(short, long, value_enum, default_value = "freetube-db")]
    pub export: ExportType,

    /// Output path (file or directory, depending on format)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override FreeTube playlists.db location (file or directory)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Split Piped JSON into chunks of N videos
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub split: Option<u64>,

    /// Output directory for split JSON files (default chunks/<basename>)
    #[arg(long)]
    pub split_dir: Option<PathBuf>,

    /// Pretty-print JSON outputs
    #[arg(long)]
    pub pretty: bool,

    /// NewPipe app_version
    #[arg(long)]
    pub newpipe_version: Option<String>,

    /// NewPipe app_version_int
    #[arg(long)]
    pub newpipe_version_int: Option<u32>,

    /// Only print warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output (-v, -vv); also makes yt-dlp verbose
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn has_input(&self) -> bool {
        !self.playlist_urls.is_empty() || self.ids_file.is_some()
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that yt-dlp is available
    Doctor,

    /// Show configuration
    Config,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportType {
    /// Append to FreeTube's playlists.db
    #[value(alias = "db")]
    FreetubeDb,
    /// FreeTube playlist JSON (one file per playlist)
    #[value(alias = "json")]
    FreetubeJson,
    /// Piped playlists JSON
    #[value(alias = "alt-json")]
    PipedJson,
    /// Piped CSV of video IDs
    #[value(alias = "alt-csv")]
    PipedCsv,
    /// Watch URLs, one per line
    Urls,
    /// Video IDs, one per line
    Ids,
    /// NewPipe subscriptions JSON
    #[value(alias = "subscriptions")]
    NewpipeSubs,
}

impl From<ExportType> for ExportFormat {
    fn from(value: ExportType) -> Self {
        match value {
            ExportType::FreetubeDb => ExportFormat::FreetubeDb,
            ExportType::FreetubeJson => ExportFormat::FreetubeJson,
            ExportType::PipedJson => ExportFormat::PipedJson,
            ExportType::PipedCsv => ExportFormat::PipedCsv,
            ExportType::Urls => ExportFormat::Urls,
            ExportType::Ids => ExportFormat::Ids,
            ExportType::NewpipeSubs => ExportFormat::NewpipeSubs,
        }
    }
}
