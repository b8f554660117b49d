//! Shared file-writing helpers for the exporters

use crate::error::Result;
use crate::text::sanitize_name;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Write a whole file through a temporary sibling so a failed export never
/// leaves a truncated target behind.
///
/// New files get the same mode `File::create` would give them. An existing
/// target keeps its permissions, symlinks are written through, and a file
/// with other hard links is rewritten in place so the links stay shared.
pub fn write_file<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let existing = fs::metadata(path).ok();
    let target = match existing {
        Some(_) => fs::canonicalize(path)?,
        None => path.to_path_buf(),
    };

    if existing.as_ref().is_some_and(has_other_links) {
        let mut writer = BufWriter::new(File::create(&target)?);
        fill(&mut writer)?;
        writer.flush()?;
        return Ok(());
    }

    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = temp_file_in(parent)?;
    {
        let mut writer = BufWriter::new(&mut tmp);
        fill(&mut writer)?;
        writer.flush()?;
    }
    if let Some(meta) = existing {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;
    // 0o666 less the umask, as for File::create
    tempfile::Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}

#[cfg(unix)]
fn has_other_links(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    meta.nlink() > 1
}

#[cfg(not(unix))]
fn has_other_links(_meta: &fs::Metadata) -> bool {
    false
}

/// Serialize `value` as JSON, indented by two spaces or fully minified.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    write_file(path, |w| {
        if pretty {
            serde_json::to_writer_pretty(w, value)?;
        } else {
            serde_json::to_writer(w, value)?;
        }
        Ok(())
    })
}

/// Hands out filesystem-safe stems, never the same one twice.
///
/// Names that sanitize to nothing use the fallback (the playlist ID); a
/// repeated stem gets `-2`, `-3`, ... appended.
#[derive(Debug, Default)]
pub struct StemAllocator {
    used: HashSet<String>,
}

impl StemAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, name: &str, fallback: &str) -> String {
        let mut stem = sanitize_name(name);
        if stem.is_empty() {
            stem = sanitize_name(fallback);
        }
        if stem.is_empty() {
            stem = "playlist".to_string();
        }

        let mut candidate = stem.clone();
        let mut n = 2;
        while !self.used.insert(candidate.clone()) {
            candidate = format!("{}-{}", stem, n);
            n += 1;
        }
        candidate
    }
}

/// `dir/name`, or just `name` when `dir` is empty.
pub fn join_output(dir: &Path, name: &str) -> PathBuf {
    if dir.as_os_str().is_empty() {
        PathBuf::from(name)
    } else {
        dir.join(name)
    }
}
