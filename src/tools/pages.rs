//! Page range selection shared by pdftotext and pdfimages

use crate::error::{Error, Result};

/// Default page quantity applied when no last page is requested
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageQuantity(Option<u32>);

impl PageQuantity {
    /// Set the quantity, rejecting non-positive values
    pub fn set(&mut self, pages: i64) -> Result<()> {
        if pages <= 0 {
            return Err(Error::InvalidArgument(
                "Page quantity must be a positive value".to_string(),
            ));
        }
        let pages = u32::try_from(pages).map_err(|_| {
            Error::InvalidArgument(format!("Page quantity {} is too large", pages))
        })?;
        self.0 = Some(pages);
        Ok(())
    }

    /// Get the quantity
    pub fn get(&self) -> Option<u32> {
        self.0
    }

    /// Build the `-f`/`-l` arguments for a request.
    ///
    /// An explicit last page wins; otherwise the quantity counts from the
    /// first page (or page 1) inclusively.
    pub fn args(&self, first: Option<u32>, last: Option<u32>) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(first) = first {
            args.push("-f".to_string());
            args.push(first.to_string());
        }

        let last = last.or_else(|| {
            self.0
                .map(|pages| first.unwrap_or(1).saturating_add(pages - 1))
        });
        if let Some(last) = last {
            args.push("-l".to_string());
            args.push(last.to_string());
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive() {
        let mut quantity = PageQuantity::default();
        assert!(matches!(quantity.set(0), Err(Error::InvalidArgument(_))));
        assert!(matches!(quantity.set(-3), Err(Error::InvalidArgument(_))));
        assert_eq!(quantity.get(), None);
    }

    #[test]
    fn test_args() {
        let mut quantity = PageQuantity::default();
        assert!(quantity.args(None, None).is_empty());
        assert_eq!(quantity.args(Some(2), None), vec!["-f", "2"]);
        assert_eq!(quantity.args(Some(1), Some(1)), vec!["-f", "1", "-l", "1"]);

        quantity.set(3).unwrap();
        assert_eq!(quantity.args(None, None), vec!["-l", "3"]);
        assert_eq!(quantity.args(Some(4), None), vec!["-f", "4", "-l", "6"]);
        assert_eq!(quantity.args(Some(4), Some(4)), vec!["-f", "4", "-l", "4"]);
    }
}
