//! FreeTube exporters: the append-only `playlists.db` and JSON import files

use crate::error::{ExportError, Result};
use crate::output::{join_output, write_json, StemAllocator};
use crate::record::PlaylistRecord;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DATABASE_NAME: &str = "playlists.db";
pub const JSON_SUFFIX: &str = ".freetube.json";
pub const MULTI_JSON_DIR: &str = "freetube_json_playlists";

const FLATPAK_CONFIG: &str = ".var/app/io.freetubeapp.FreeTube/config/FreeTube";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }
}

/// The slice of the environment the default database location depends on.
#[derive(Debug, Clone, Default)]
pub struct PathEnv {
    pub home: PathBuf,
    /// `%APPDATA%` on Windows
    pub app_data: Option<PathBuf>,
    /// Whether the Flatpak config directory exists under `home`
    pub flatpak_installed: bool,
}

impl PathEnv {
    pub fn from_system() -> Self {
        let home = dirs::home_dir().unwrap_or_default();
        let flatpak_installed = home.join(FLATPAK_CONFIG).exists();
        Self {
            app_data: std::env::var_os("APPDATA").map(PathBuf::from),
            home,
            flatpak_installed,
        }
    }
}

/// Default `playlists.db` location for FreeTube on `platform`.
pub fn default_db_path(platform: Platform, env: &PathEnv) -> PathBuf {
    let base = match platform {
        Platform::Windows => env.app_data.clone().unwrap_or_default().join("FreeTube"),
        Platform::Linux if env.flatpak_installed => env.home.join(FLATPAK_CONFIG),
        Platform::Linux | Platform::Other => env.home.join(".config/FreeTube"),
        Platform::MacOs => env.home.join("Library/Application Support/FreeTube"),
    };
    base.join(DATABASE_NAME)
}

/// An existing file or a `.db`/`.json` path is used as given; any other path
/// is treated as a directory holding `playlists.db`.
pub fn resolve_db_path(user_path: Option<&Path>) -> PathBuf {
    match user_path {
        Some(path) => {
            let has_db_ext = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("db") || e.eq_ignore_ascii_case("json"));
            if path.is_file() || has_db_ext {
                path.to_path_buf()
            } else {
                path.join(DATABASE_NAME)
            }
        }
        None => default_db_path(Platform::current(), &PathEnv::from_system()),
    }
}

/// Append one minified playlist line to the database and sync it to disk.
///
/// The parent directory must already exist. Concurrent appends from other
/// processes are not coordinated.
pub fn append_to_db(playlist: &PlaylistRecord, db_path: &Path) -> Result<PathBuf> {
    let parent = match db_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.is_dir() {
        return Err(ExportError::MissingParent(parent.to_path_buf()));
    }

    let mut line = serde_json::to_vec(playlist)?;
    line.push(b'\n');

    let mut file = OpenOptions::new().create(true).append(true).open(db_path)?;
    file.write_all(&line)?;
    file.flush()?;
    file.sync_all()?;

    info!(
        "Playlist '{}' appended to {}",
        playlist.playlist_name,
        db_path.display()
    );
    Ok(db_path.to_path_buf())
}

pub fn export_json(playlist: &PlaylistRecord, out_path: Option<&Path>, pretty: bool) -> Result<PathBuf> {
    let path = match out_path {
        Some(p) => p.to_path_buf(),
        None => {
            let stem = StemAllocator::new().allocate(&playlist.playlist_name, &playlist.id);
            PathBuf::from(format!("{}{}", stem, JSON_SUFFIX))
        }
    };
    write_json(&path, playlist, pretty)?;
    info!("Wrote FreeTube JSON: {}", path.display());
    Ok(path)
}

/// One `<name>.json` per playlist inside `out_dir` (created if missing).
pub fn export_json_dir(playlists: &[PlaylistRecord], out_dir: Option<&Path>, pretty: bool) -> Result<Vec<PathBuf>> {
    let dir = out_dir.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(MULTI_JSON_DIR));
    std::fs::create_dir_all(&dir)?;

    let mut stems = StemAllocator::new();
    let mut written = Vec::with_capacity(playlists.len());
    for playlist in playlists {
        let stem = stems.allocate(&playlist.playlist_name, &playlist.id);
        let path = join_output(&dir, &format!("{}.json", stem));
        write_json(&path, playlist, pretty)?;
        debug!("Wrote {}", path.display());
        written.push(path);
    }
    info!("Wrote {} FreeTube JSON files to {}", written.len(), dir.display());
    Ok(written)
}
