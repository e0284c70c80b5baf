//! Document information through the pdfinfo binary

use std::path::Path;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::core::config::{Configuration, Tool};
use crate::core::file_system;
use crate::driver::{Binary, BinaryDriver};
use crate::error::{Error, Result};

fn line_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\r\n|\r|\n").expect("valid line break regex"))
}

fn page_size_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([0-9.]+)\s*x\s*([0-9.]+)\s*pts(?:\s*\(([^)]+)\))?")
            .expect("valid page size regex")
    })
}

/// Page dimensions reported by pdfinfo
#[derive(Debug, Clone, PartialEq)]
pub struct PageSize {
    /// Width in points
    pub width: f64,
    /// Height in points
    pub height: f64,
    /// Paper name, e.g. `letter` or `A4`
    pub paper: Option<String>,
}

/// Key/value information extracted from a PDF, in output order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfInfo {
    entries: Vec<(String, String)>,
}

impl PdfInfo {
    /// Parse pdfinfo output.
    ///
    /// Each non-empty line is split at its first colon; the value is trimmed.
    pub fn parse(output: &str) -> Self {
        let mut info = Self::default();

        for line in line_break().split(output).filter(|l| !l.is_empty()) {
            match line.split_once(':') {
                Some((key, value)) => info.insert(key, value.trim()),
                None => tracing::debug!("Ignoring pdfinfo line without key: {}", line),
            }
        }

        info
    }

    fn insert(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    /// Get a raw value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over all entries in output order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn title(&self) -> Option<&str> {
        self.get("Title")
    }

    pub fn author(&self) -> Option<&str> {
        self.get("Author")
    }

    pub fn creator(&self) -> Option<&str> {
        self.get("Creator")
    }

    pub fn producer(&self) -> Option<&str> {
        self.get("Producer")
    }

    /// Number of pages
    pub fn pages(&self) -> Option<u32> {
        self.get("Pages").and_then(|v| v.parse().ok())
    }

    /// Whether the document is encrypted
    pub fn encrypted(&self) -> Option<bool> {
        self.get("Encrypted").map(|v| v.starts_with("yes"))
    }

    /// Size of the first page
    pub fn page_size(&self) -> Option<PageSize> {
        let caps = page_size_re().captures(self.get("Page size")?)?;
        Some(PageSize {
            width: caps.get(1)?.as_str().parse().ok()?,
            height: caps.get(2)?.as_str().parse().ok()?,
            paper: caps.get(3).map(|m| m.as_str().to_string()),
        })
    }
}

impl Serialize for PdfInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Adapter for `pdfinfo`
#[derive(Debug, Clone)]
pub struct PdfInfoReader {
    driver: BinaryDriver,
    data: PdfInfo,
}

impl Binary for PdfInfoReader {
    fn driver(&self) -> &BinaryDriver {
        &self.driver
    }

    fn driver_mut(&mut self) -> &mut BinaryDriver {
        &mut self.driver
    }
}

impl PdfInfoReader {
    /// Wrap an existing driver
    pub fn new(driver: BinaryDriver) -> Self {
        Self {
            driver,
            data: PdfInfo::default(),
        }
    }

    /// Resolve the binary from configuration
    pub fn create(config: &Configuration) -> Result<Self> {
        let tool = Tool::PdfInfo;
        BinaryDriver::load(tool.name(), &config.binaries_for(tool), config.timeout())
            .map(Self::new)
            .map_err(|e| Error::BinaryNotFound {
                binary: tool.name(),
                source: Box::new(e),
            })
    }

    /// Information from the last successful extraction
    pub fn data(&self) -> &PdfInfo {
        &self.data
    }

    /// Extract the document information of a PDF
    pub async fn extract_info(&mut self, path: &Path) -> Result<PdfInfo> {
        file_system::ensure_file(path)?;

        let output = self
            .driver
            .command([path])
            .await
            .map_err(|e| Error::runtime("Unable to extract info", e))?;

        self.data = PdfInfo::parse(&output);
        tracing::debug!("Extracted {} info entries from {}", self.data.len(), path.display());
        Ok(self.data.clone())
    }
}
