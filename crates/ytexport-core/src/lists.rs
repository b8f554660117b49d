//! Plain-text URL and ID lists

use crate::error::Result;
use crate::output::write_file;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use ytexport_extract::WATCH_URL;

pub const DEFAULT_URLS: &str = "urls.txt";
pub const DEFAULT_IDS: &str = "ids.txt";

/// One `https://www.youtube.com/watch?v=` URL per line.
pub fn export_urls<'a, I>(video_ids: I, out_path: Option<&Path>) -> Result<PathBuf>
where
    I: IntoIterator<Item = &'a str>,
{
    let path = out_path.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(DEFAULT_URLS));
    write_lines(&path, video_ids.into_iter().map(|id| format!("{}{}", WATCH_URL, id)))?;
    info!("Wrote URL list: {}", path.display());
    Ok(path)
}

pub fn export_ids<'a, I>(video_ids: I, out_path: Option<&Path>) -> Result<PathBuf>
where
    I: IntoIterator<Item = &'a str>,
{
    let path = out_path.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(DEFAULT_IDS));
    write_lines(&path, video_ids)?;
    info!("Wrote ID list: {}", path.display());
    Ok(path)
}

fn write_lines<I, S>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    write_file(path, |w| {
        for line in lines {
            writeln!(w, "{}", line.as_ref())?;
        }
        Ok(())
    })
}
