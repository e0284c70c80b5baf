//! Text extraction through the pdftotext binary

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::core::config::{Configuration, Tool};
use crate::core::file_system;
use crate::driver::{Binary, BinaryDriver};
use crate::error::{Error, Result};
use crate::tools::pages::PageQuantity;

/// Default output charset
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// Text layout produced by pdftotext
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Content stream order
    #[default]
    Raw,
    /// Physical layout of the page
    Layout,
}

impl OutputMode {
    /// Command line flag for this mode
    pub fn flag(self) -> &'static str {
        match self {
            OutputMode::Raw => "-raw",
            OutputMode::Layout => "-layout",
        }
    }
}

impl FromStr for OutputMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "raw" | "-raw" => Ok(OutputMode::Raw),
            "layout" | "-layout" => Ok(OutputMode::Layout),
            _ => Err(Error::InvalidArgument(
                "Mode must be \"raw\" or \"layout\"".to_string(),
            )),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flag()[1..])
    }
}

/// Adapter for `pdftotext`
#[derive(Debug, Clone)]
pub struct PdfToText {
    driver: BinaryDriver,
    charset: String,
    pages: PageQuantity,
    mode: OutputMode,
}

impl Binary for PdfToText {
    fn driver(&self) -> &BinaryDriver {
        &self.driver
    }

    fn driver_mut(&mut self) -> &mut BinaryDriver {
        &mut self.driver
    }
}

impl PdfToText {
    /// Wrap an existing driver
    pub fn new(driver: BinaryDriver) -> Self {
        Self {
            driver,
            charset: DEFAULT_ENCODING.to_string(),
            pages: PageQuantity::default(),
            mode: OutputMode::default(),
        }
    }

    /// Resolve the binary from configuration
    pub fn create(config: &Configuration) -> Result<Self> {
        let tool = Tool::PdfToText;
        BinaryDriver::load(tool.name(), &config.binaries_for(tool), config.timeout())
            .map(Self::new)
            .map_err(|e| Error::BinaryNotFound {
                binary: tool.name(),
                source: Box::new(e),
            })
    }

    /// Set the output charset; an unknown charset only fails at extraction time
    pub fn set_output_encoding(&mut self, charset: impl Into<String>) -> &mut Self {
        self.charset = charset.into();
        self
    }

    /// Get the output charset, UTF-8 by default
    pub fn output_encoding(&self) -> &str {
        &self.charset
    }

    /// Set how many pages are extracted when no last page is given
    pub fn set_page_quantity(&mut self, pages: i64) -> Result<&mut Self> {
        self.pages.set(pages)?;
        Ok(self)
    }

    /// Get the default page quantity
    pub fn page_quantity(&self) -> Option<u32> {
        self.pages.get()
    }

    /// Set the output mode
    pub fn set_output_mode(&mut self, mode: OutputMode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Get the output mode
    pub fn output_mode(&self) -> OutputMode {
        self.mode
    }

    /// Extract the text of a PDF, optionally restricted to a page range.
    ///
    /// The output must be valid UTF-8; for other charsets use
    /// [`PdfToText::get_text_bytes`].
    pub async fn get_text(&self, path: &Path, first: Option<u32>, last: Option<u32>) -> Result<String> {
        let bytes = self.get_text_bytes(path, first, last).await?;
        String::from_utf8(bytes).map_err(|source| Error::Decode {
            charset: self.charset.clone(),
            source,
        })
    }

    /// Extract the text of a PDF as raw bytes in the output charset
    pub async fn get_text_bytes(
        &self,
        path: &Path,
        first: Option<u32>,
        last: Option<u32>,
    ) -> Result<Vec<u8>> {
        file_system::ensure_file(path)?;

        let output = file_system::temp_output()?;
        let args = self.build_args(path, output.path(), first, last);

        self.driver
            .command(&args)
            .await
            .map_err(|e| Error::runtime("Unable to extract text", e))?;

        Ok(tokio::fs::read(output.path()).await?)
    }

    fn build_args(
        &self,
        path: &Path,
        output: &Path,
        first: Option<u32>,
        last: Option<u32>,
    ) -> Vec<std::ffi::OsString> {
        let mut args: Vec<std::ffi::OsString> = self
            .pages
            .args(first, last)
            .into_iter()
            .map(Into::into)
            .collect();

        args.push(self.mode.flag().into());
        args.push("-nopgbrk".into());
        args.push("-enc".into());
        args.push(self.charset.as_str().into());
        args.push("-eol".into());
        args.push("unix".into());
        args.push(path.into());
        args.push(output.into());
        args
    }
}
