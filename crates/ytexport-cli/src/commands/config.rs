use anyhow::{Context, Result};
use std::path::Path;
use ytexport_core::config::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("yt-playlist-export configuration\n");

    let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;
    println!("{}", rendered.trim_end());
    if config.paths.yt_dlp.is_none() {
        println!("# paths.yt_dlp not set, auto-detecting from PATH");
    }

    // Show config file locations
    println!("\nConfig sources (later entries win):");
    if let Some(p) = Config::default_file() {
        let state = if p.exists() { "" } else { " (not present)" };
        println!("  1. {}{}", p.display(), state);
    }
    if let Some(p) = config_path {
        println!("  2. {} (specified)", p.display());
    }
    println!("  3. Environment variables (YTEXPORT_<SECTION>__<KEY>)");

    Ok(())
}
