//! Adapters for the individual XPDF binaries

pub mod pages;
pub mod pdfimages;
pub mod pdfinfo;
pub mod pdftotext;

pub use pages::PageQuantity;
pub use pdfimages::{ImageFormat, PdfImages};
pub use pdfinfo::{PageSize, PdfInfo, PdfInfoReader};
pub use pdftotext::{OutputMode, PdfToText};
