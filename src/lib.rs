//! xpdf - drive the XPDF command line tools from Rust
//!
//! Wraps `pdftotext`, `pdfinfo` and `pdfimages` as child processes with
//! executable lookup, timeouts and typed results.
//!
//! ```no_run
//! use std::path::Path;
//! use xpdf::{Configuration, PdfToText};
//!
//! # async fn run() -> xpdf::Result<()> {
//! let config = Configuration::load()?;
//! let pdftotext = PdfToText::create(&config)?;
//! let text = pdftotext.get_text(Path::new("report.pdf"), Some(1), Some(2)).await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod driver;
pub mod error;
pub mod tools;

#[cfg(test)]
mod testing;

pub use crate::core::config::{BinaryConfig, Configuration, Tool, DEFAULT_TIMEOUT};
pub use crate::core::document::{PdfDocument, Xpdf};
pub use driver::{Binary, BinaryDriver, ExecutableFinder};
pub use error::{Error, Result};
pub use tools::{ImageFormat, OutputMode, PageSize, PdfImages, PdfInfo, PdfInfoReader, PdfToText};

/// Package name
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Package version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// One line package description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_metadata() {
        assert_eq!(NAME, "xpdf");
        assert!(!VERSION.is_empty());
        assert!(VERSION.split('.').all(|part| part.parse::<u32>().is_ok()));
        assert!(!DESCRIPTION.is_empty());
        assert!(!env!("CARGO_PKG_AUTHORS").is_empty());
    }
}
