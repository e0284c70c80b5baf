//! Executable lookup on the search path

use std::path::{Path, PathBuf};

/// Locates executables either by explicit path or by searching `PATH`
#[derive(Debug, Clone)]
pub struct ExecutableFinder {
    /// Directories searched for bare executable names
    search_paths: Vec<PathBuf>,
}

impl Default for ExecutableFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutableFinder {
    /// Create a finder over the current `PATH`
    pub fn new() -> Self {
        let search_paths = std::env::var_os("PATH")
            .map(|paths| std::env::split_paths(&paths).collect())
            .unwrap_or_default();
        Self { search_paths }
    }

    /// Create a finder over explicit directories
    pub fn with_paths(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// Find an executable.
    ///
    /// Names containing a path separator are checked as-is, bare names are
    /// looked up in each search directory in order.
    pub fn find(&self, name: &Path) -> Option<PathBuf> {
        if name.as_os_str().is_empty() {
            return None;
        }

        if name.components().count() > 1 || name.is_absolute() {
            return Self::executable_variants(name)
                .into_iter()
                .find(|candidate| is_executable(candidate));
        }

        self.search_paths
            .iter()
            .flat_map(|dir| Self::executable_variants(&dir.join(name)))
            .find(|candidate| is_executable(candidate))
    }

    #[cfg(windows)]
    fn executable_variants(path: &Path) -> Vec<PathBuf> {
        let mut variants = vec![path.to_path_buf()];
        let exts = std::env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
        for ext in exts.split(';').filter(|e| !e.is_empty()) {
            let mut with_ext = std::ffi::OsString::from(path.as_os_str());
            with_ext.push(ext);
            variants.push(PathBuf::from(with_ext));
        }
        variants
    }

    #[cfg(not(windows))]
    fn executable_variants(path: &Path) -> Vec<PathBuf> {
        vec![path.to_path_buf()]
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::testing::fake_binary;

    #[test]
    fn test_find_in_search_paths() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let expected = fake_binary(second.path(), "pdftotext", "exit 0");

        let finder = ExecutableFinder::with_paths(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        assert_eq!(finder.find(Path::new("pdftotext")), Some(expected));
        assert_eq!(finder.find(Path::new("pdfinfo")), None);
    }

    #[test]
    fn test_find_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let binary = fake_binary(dir.path(), "pdfinfo", "exit 0");

        let finder = ExecutableFinder::with_paths(Vec::new());
        assert_eq!(finder.find(&binary), Some(binary.clone()));
        assert_eq!(finder.find(&dir.path().join("missing")), None);
    }

    #[test]
    fn test_skips_non_executable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pdfimages"), "#!/bin/sh\n").unwrap();

        let finder = ExecutableFinder::with_paths(vec![dir.path().to_path_buf()]);
        assert_eq!(finder.find(Path::new("pdfimages")), None);
        assert_eq!(finder.find(Path::new("")), None);
    }
}
