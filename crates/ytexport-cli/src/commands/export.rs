use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::args::{Cli, ExportType};
use ytexport_core::{
    config::Config,
    newpipe::AppVersion,
    pipeline::{Pipeline, PipelineConfig, PipelineStage},
    stamp::Stamper,
};
use ytexport_extract::YtDlp;

pub async fn run(cli: &Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    apply_overrides(&mut config, cli);

    let verbose = cli.verbose > 0;
    let options = if cli.export == ExportType::NewpipeSubs {
        config.subscription_options(cli.browser_cookies.as_deref(), verbose)?
    } else {
        config.extractor_options(verbose)?
    };
    let yt_dlp_path = config.yt_dlp_path()?;
    debug!("Using yt-dlp at {}", yt_dlp_path.display());
    let yt_dlp = YtDlp::new(yt_dlp_path, options);

    let pipeline_config = PipelineConfig {
        playlist_urls: cli.playlist_urls.clone(),
        ids_file: cli.ids_file.clone(),
        name: cli.name.clone(),
        description: cli.description.clone(),
        format: cli.export.into(),
        output: cli.output.clone(),
        db_path: cli.path.clone(),
        split: cli.split.map(|n| usize::try_from(n).unwrap_or(usize::MAX)),
        split_dir: cli.split_dir.clone(),
        pretty: cli.pretty || config.output.pretty,
        newpipe_version: AppVersion {
            name: config.newpipe.app_version.clone(),
            code: config.newpipe.app_version_int,
        },
    };

    // Create progress channel
    let (tx, rx) = mpsc::unbounded_channel();
    let progress_handle = tokio::spawn(render_progress(rx, cli.quiet));

    let pipeline = Pipeline::new(pipeline_config, Box::new(yt_dlp), Stamper::system(), tx);
    let result = pipeline.run().await;

    // Closing the channel lets the renderer finish
    drop(pipeline);
    progress_handle.await?;

    let outcome = result.context("Export failed")?;
    if !cli.quiet {
        for path in &outcome.paths {
            println!("Output: {}", path.display());
        }
    }
    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(ref cookies) = cli.cookies {
        config.auth.cookies = Some(cookies.clone());
    }
    if let Some(ref spec) = cli.browser_cookies {
        config.auth.browser_cookies = spec.clone();
    }
    if cli.skip_authcheck {
        config.auth.skip_authcheck = true;
    }
    if cli.sleep.is_some() {
        config.auth.sleep_requests = cli.sleep;
    }
    if let Some(ref version) = cli.newpipe_version {
        config.newpipe.app_version = version.clone();
    }
    if let Some(code) = cli.newpipe_version_int {
        config.newpipe.app_version_int = code;
    }
}

async fn render_progress(mut rx: mpsc::UnboundedReceiver<PipelineStage>, quiet: bool) {
    if quiet {
        while rx.recv().await.is_some() {}
        return;
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style.tick_chars("=>-"));
    }
    pb.enable_steady_tick(Duration::from_millis(100));

    while let Some(stage) = rx.recv().await {
        match stage {
            PipelineStage::FetchingPlaylist { index, total, url } => {
                pb.set_message(format!("[{}/{}] Fetching {}", index + 1, total, truncate(&url, 60)));
            }
            PipelineStage::ResolvingIds { total } => {
                pb.set_message(format!("Resolving {} video IDs...", total));
            }
            PipelineStage::VideoResolved {
                index,
                total,
                video_id,
                title,
                author,
            } => {
                pb.println(format!("{}  |  {}  |  {}", video_id, title, author));
                pb.set_message(format!("[{}/{}] {}", index + 1, total, truncate(&title, 50)));
            }
            PipelineStage::PlaylistBuilt { name, videos } => {
                pb.println(format!("Playlist '{}': {} videos", name, videos));
            }
            PipelineStage::FetchingSubscriptions => {
                pb.set_message("Fetching subscriptions via /feed/channels...");
            }
            PipelineStage::SubscriptionsFetched { count } => {
                pb.println(format!("Found {} subscriptions", count));
            }
            PipelineStage::Exporting { format } => {
                pb.set_message(format!("Writing {}...", format));
            }
            PipelineStage::ChunkWritten { path, videos } => {
                pb.println(format!("  -> {} ({} videos)", path.display(), videos));
            }
            PipelineStage::Complete { paths } => {
                pb.finish_with_message(format!("Done ({} output(s))", paths.len()));
            }
            PipelineStage::Failed { stage, error } => {
                pb.abandon_with_message(format!("Failed at {}: {}", stage, error));
            }
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
