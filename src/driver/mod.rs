//! Binary driver shared by the XPDF tool adapters

pub mod finder;
pub mod runner;

pub use finder::ExecutableFinder;
pub use runner::{ProcessOutput, ProcessRunner};

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// A resolved executable plus the runner used to invoke it
#[derive(Debug, Clone)]
pub struct BinaryDriver {
    /// Tool name
    name: &'static str,
    /// Resolved executable path
    binary: PathBuf,
    /// Process runner
    runner: ProcessRunner,
}

impl BinaryDriver {
    /// Create a driver for an already resolved executable
    pub fn new(name: &'static str, binary: PathBuf, timeout: Option<Duration>) -> Self {
        Self {
            name,
            binary,
            runner: ProcessRunner::new(timeout),
        }
    }

    /// Resolve the first usable candidate on the current `PATH`
    pub fn load(name: &'static str, candidates: &[PathBuf], timeout: Option<Duration>) -> Result<Self> {
        Self::load_with(&ExecutableFinder::new(), name, candidates, timeout)
    }

    /// Resolve the first usable candidate with a specific finder
    pub fn load_with(
        finder: &ExecutableFinder,
        name: &'static str,
        candidates: &[PathBuf],
        timeout: Option<Duration>,
    ) -> Result<Self> {
        for candidate in candidates {
            if let Some(binary) = finder.find(candidate) {
                tracing::debug!("Resolved {} to {}", name, binary.display());
                return Ok(Self::new(name, binary, timeout));
            }
            tracing::trace!("Candidate {} for {} not found", candidate.display(), name);
        }

        Err(Error::ExecutableNotFound {
            name: name.to_string(),
            candidates: candidates.to_vec(),
        })
    }

    /// Get the tool name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the resolved executable path
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Get the process timeout
    pub fn timeout(&self) -> Option<Duration> {
        self.runner.timeout()
    }

    /// Set the process timeout
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.runner.set_timeout(timeout);
    }

    /// Run the binary with the given arguments and return its stdout
    pub async fn command<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self.runner.run(&self.binary, args).await?;
        if !output.stderr.is_empty() {
            tracing::debug!("{} stderr: {}", self.name, output.stderr.trim());
        }
        Ok(output.stdout)
    }
}

/// Common interface of the XPDF tool adapters
pub trait Binary {
    /// Get the tool name
    fn name(&self) -> &'static str {
        self.driver().name()
    }

    /// Get the underlying driver
    fn driver(&self) -> &BinaryDriver;

    /// Get the underlying driver mutably
    fn driver_mut(&mut self) -> &mut BinaryDriver;

    /// Get the resolved executable path
    fn binary(&self) -> &Path {
        self.driver().binary()
    }

    /// Get the process timeout
    fn timeout(&self) -> Option<Duration> {
        self.driver().timeout()
    }

    /// Set the process timeout
    fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.driver_mut().set_timeout(timeout);
    }
}
