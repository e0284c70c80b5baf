//! Toolkit bundling all adapters and an opened-document view over it

use std::path::{Path, PathBuf};

use crate::core::config::Configuration;
use crate::core::file_system;
use crate::error::Result;
use crate::tools::{PdfImages, PdfInfo, PdfInfoReader, PdfToText};

/// All three XPDF adapters built from one configuration
#[derive(Debug, Clone)]
pub struct Xpdf {
    pdftotext: PdfToText,
    pdfinfo: PdfInfoReader,
    pdfimages: PdfImages,
}

impl Xpdf {
    /// Resolve every binary from configuration
    pub fn create(config: &Configuration) -> Result<Self> {
        Ok(Self::new(
            PdfToText::create(config)?,
            PdfInfoReader::create(config)?,
            PdfImages::create(config)?,
        ))
    }

    /// Bundle already built adapters
    pub fn new(pdftotext: PdfToText, pdfinfo: PdfInfoReader, pdfimages: PdfImages) -> Self {
        Self {
            pdftotext,
            pdfinfo,
            pdfimages,
        }
    }

    pub fn pdftotext(&self) -> &PdfToText {
        &self.pdftotext
    }

    pub fn pdftotext_mut(&mut self) -> &mut PdfToText {
        &mut self.pdftotext
    }

    pub fn pdfinfo(&self) -> &PdfInfoReader {
        &self.pdfinfo
    }

    pub fn pdfinfo_mut(&mut self) -> &mut PdfInfoReader {
        &mut self.pdfinfo
    }

    pub fn pdfimages(&self) -> &PdfImages {
        &self.pdfimages
    }

    pub fn pdfimages_mut(&mut self) -> &mut PdfImages {
        &mut self.pdfimages
    }

    /// Open a PDF for repeated extraction
    pub fn open(&mut self, path: &Path) -> Result<PdfDocument<'_>> {
        file_system::ensure_file(path)?;
        tracing::debug!("Opened document: {}", path.display());
        Ok(PdfDocument {
            xpdf: self,
            path: path.to_path_buf(),
        })
    }
}

/// A PDF file bound to the toolkit that reads it
#[derive(Debug)]
pub struct PdfDocument<'a> {
    xpdf: &'a mut Xpdf,
    path: PathBuf,
}

impl PdfDocument<'_> {
    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extract the text of all pages
    pub async fn text(&self) -> Result<String> {
        self.text_pages(None, None).await
    }

    /// Extract the text of a page range
    pub async fn text_pages(&self, first: Option<u32>, last: Option<u32>) -> Result<String> {
        self.xpdf.pdftotext.get_text(&self.path, first, last).await
    }

    /// Extract the document information
    pub async fn info(&mut self) -> Result<PdfInfo> {
        self.xpdf.pdfinfo.extract_info(&self.path).await
    }

    /// Extract all images
    pub async fn images(&self) -> Result<Vec<PathBuf>> {
        self.xpdf.pdfimages.get_images(&self.path, None, None).await
    }

    /// Get the document title from its info, falling back to the file stem
    pub async fn title(&mut self) -> Result<String> {
        let info = self.info().await?;
        Ok(info
            .title()
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                self.path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "Untitled".to_string())
            }))
    }
}
