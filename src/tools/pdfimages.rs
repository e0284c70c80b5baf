//! Image extraction through the pdfimages binary

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::config::{Configuration, Tool};
use crate::core::file_system;
use crate::driver::{Binary, BinaryDriver};
use crate::error::{Error, Result};
use crate::tools::pages::PageQuantity;

/// Format of extracted images
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageFormat {
    /// PBM for monochrome, PPM for everything else
    #[default]
    Bitmap,
    /// DCT images saved as JPEG, the rest as PBM/PPM
    Jpeg,
}

impl ImageFormat {
    /// Command line flag for this format, if any
    pub fn flag(self) -> Option<&'static str> {
        match self {
            ImageFormat::Bitmap => None,
            ImageFormat::Jpeg => Some("-j"),
        }
    }
}

impl FromStr for ImageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" | "-j" => Ok(ImageFormat::Jpeg),
            "bitmap" => Ok(ImageFormat::Bitmap),
            _ => Err(Error::InvalidArgument(
                "Format must be \"jpeg\" or \"bitmap\"".to_string(),
            )),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Bitmap => f.write_str("bitmap"),
            ImageFormat::Jpeg => f.write_str("jpeg"),
        }
    }
}

/// Adapter for `pdfimages`
#[derive(Debug, Clone)]
pub struct PdfImages {
    driver: BinaryDriver,
    pages: PageQuantity,
    format: ImageFormat,
    output_dir: Option<PathBuf>,
}

impl Binary for PdfImages {
    fn driver(&self) -> &BinaryDriver {
        &self.driver
    }

    fn driver_mut(&mut self) -> &mut BinaryDriver {
        &mut self.driver
    }
}

impl PdfImages {
    /// Wrap an existing driver
    pub fn new(driver: BinaryDriver) -> Self {
        Self {
            driver,
            pages: PageQuantity::default(),
            format: ImageFormat::default(),
            output_dir: None,
        }
    }

    /// Resolve the binary from configuration
    pub fn create(config: &Configuration) -> Result<Self> {
        let tool = Tool::PdfImages;
        BinaryDriver::load(tool.name(), &config.binaries_for(tool), config.timeout())
            .map(Self::new)
            .map_err(|e| Error::BinaryNotFound {
                binary: tool.name(),
                source: Box::new(e),
            })
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

    /// Set the image output format
    pub fn set_output_format(&mut self, format: ImageFormat) -> &mut Self {
        self.format = format;
        self
    }

    /// Get the image output format
    pub fn output_format(&self) -> ImageFormat {
        self.format
    }

    /// Write images into `dir` instead of the system temp directory
    pub fn set_output_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Directory the images are written to
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Extract the images of a PDF, optionally restricted to a page range.
    ///
    /// Returns the paths of the written files, sorted. The caller owns them.
    pub async fn get_images(
        &self,
        path: &Path,
        first: Option<u32>,
        last: Option<u32>,
    ) -> Result<Vec<PathBuf>> {
        file_system::ensure_file(path)?;

        let dir = self.output_dir();
        tokio::fs::create_dir_all(&dir).await?;
        let placeholder = file_system::reserve_root(&dir)?;
        let root = placeholder.path().to_path_buf();

        let mut args: Vec<OsString> = self
            .pages
            .args(first, last)
            .into_iter()
            .map(Into::into)
            .collect();
        if let Some(flag) = self.format.flag() {
            args.push(flag.into());
        }
        args.push(path.into());
        args.push(root.as_path().into());

        if let Err(e) = self.driver.command(&args).await {
            // Drop whatever was written before the failure
            let cleanup = file_system::files_with_prefix(&root)
                .and_then(|partial| file_system::remove_files(&partial));
            if let Err(cleanup) = cleanup {
                tracing::warn!(
                    "Failed to remove partial images for {}: {}",
                    root.display(),
                    cleanup
                );
            }
            return Err(Error::runtime("Unable to extract images", e));
        }

        let images = file_system::files_with_prefix(&root)?;
        placeholder.close()?;
        tracing::info!("Extracted {} images from {}", images.len(), path.display());
        Ok(images)
    }
}
