//! Tool configuration management

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default process timeout in seconds
pub const DEFAULT_TIMEOUT: u64 = 60;

/// The XPDF binaries this crate knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    PdfToText,
    PdfInfo,
    PdfImages,
}

impl Tool {
    /// Executable name as shipped by xpdf/poppler
    pub fn name(self) -> &'static str {
        match self {
            Tool::PdfToText => "pdftotext",
            Tool::PdfInfo => "pdfinfo",
            Tool::PdfImages => "pdfimages",
        }
    }
}

/// Configuration shared by all tool adapters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Process timeout in seconds (0 = disabled, unset = 60)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// pdftotext settings
    pub pdftotext: BinaryConfig,
    /// pdfinfo settings
    pub pdfinfo: BinaryConfig,
    /// pdfimages settings
    pub pdfimages: BinaryConfig,
}

/// Per-binary settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryConfig {
    /// Candidate executables, tried in order
    #[serde(deserialize_with = "one_or_many")]
    pub binaries: Vec<PathBuf>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(PathBuf),
    Many(Vec<PathBuf>),
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(path) => vec![path],
        OneOrMany::Many(paths) => paths,
    })
}

impl Configuration {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "xpdf", "xpdf").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the platform config directory
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok_or(Error::ConfigDirUnavailable)?;
        Self::load_from(&path)
    }

    /// Load configuration from a file, falling back to defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to the platform config directory
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or(Error::ConfigDirUnavailable)?;
        self.save_to(&path)
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, content)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Set the process timeout in seconds
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Some(secs);
        self
    }

    /// Set the candidate executables for a tool
    pub fn with_binaries<I, P>(mut self, tool: Tool, binaries: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.binary_config_mut(tool).binaries = binaries.into_iter().map(Into::into).collect();
        self
    }

    /// Effective timeout; `None` means the process may run forever
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout.unwrap_or(DEFAULT_TIMEOUT) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Candidate executables for a tool, defaulting to its bare name
    pub fn binaries_for(&self, tool: Tool) -> Vec<PathBuf> {
        let binaries = &self.binary_config(tool).binaries;
        if binaries.is_empty() {
            vec![PathBuf::from(tool.name())]
        } else {
            binaries.clone()
        }
    }

    fn binary_config(&self, tool: Tool) -> &BinaryConfig {
        match tool {
            Tool::PdfToText => &self.pdftotext,
            Tool::PdfInfo => &self.pdfinfo,
            Tool::PdfImages => &self.pdfimages,
        }
    }

    fn binary_config_mut(&mut self, tool: Tool) -> &mut BinaryConfig {
        match tool {
            Tool::PdfToText => &mut self.pdftotext,
            Tool::PdfInfo => &mut self.pdfinfo,
            Tool::PdfImages => &mut self.pdfimages,
        }
    }
}
