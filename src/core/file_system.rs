//! File system helpers for tool input and output files

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Prefix of every temporary file created by this crate
pub const TEMP_PREFIX: &str = "xpdf";

/// Check that an input PDF exists and is a regular file
pub fn ensure_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::invalid_file(path))
    }
}

/// Create an empty temporary file that a binary can write its output into.
///
/// The file is removed when the returned handle is dropped.
pub fn temp_output() -> Result<NamedTempFile> {
    Ok(tempfile::Builder::new().prefix(TEMP_PREFIX).tempfile()?)
}

/// Reserve a unique file name in `dir` to be used as an output root.
///
/// The placeholder file stays on disk until the handle is dropped, so no
/// other temporary file can take the same name meanwhile.
pub fn reserve_root(dir: &Path) -> Result<NamedTempFile> {
    Ok(tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(dir)?)
}

/// Get all files next to `root` whose name starts with the name of `root`, sorted
pub fn files_with_prefix(root: &Path) -> Result<Vec<PathBuf>> {
    let (Some(dir), Some(prefix)) = (root.parent(), root.file_name().and_then(OsStr::to_str))
    else {
        return Err(Error::invalid_file(root));
    };
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| match e.into_io_error() {
            Some(io) => Error::Io(io),
            None => Error::invalid_file(dir),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        // The root itself is the reservation placeholder
        let matches = entry
            .file_name()
            .to_str()
            .map(|name| name != prefix && name.starts_with(prefix))
            .unwrap_or(false);
        if matches {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Delete files, ignoring ones that are already gone
pub fn remove_files(paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
