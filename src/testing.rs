//! Shared test helpers

use std::path::{Path, PathBuf};

/// Write an executable shell script standing in for an XPDF binary
#[cfg(unix)]
pub(crate) fn fake_binary(dir: &Path, name: &str, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Write a placeholder input file; the fake binaries never parse it
pub(crate) fn fake_pdf(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"%PDF-1.4\n%%EOF\n").unwrap();
    path
}
