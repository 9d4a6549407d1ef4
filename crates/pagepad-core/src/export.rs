//! Export seam: turning the page book into downloadable files.

use crate::codec::{CodecError, PageCodec};
use crate::pages::Page;
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("Image error: {0}")]
    Image(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A finished export, ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested download file name.
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Read-only view of the document handed to an exporter.
pub struct ExportSource<'a> {
    pub pages: &'a [Page],
    /// Surface width at export time.
    pub width: u32,
    /// Surface height at export time.
    pub height: u32,
    pub codec: &'a dyn PageCodec,
}

impl ExportSource<'_> {
    /// Indices and pages that hold content, in page order.
    pub fn populated_pages(&self) -> impl Iterator<Item = (usize, &Page)> {
        self.pages
            .iter()
            .enumerate()
            .filter(|(_, page)| !page.is_blank())
    }
}

/// Produces an artifact from the pages of a document.
pub trait Exporter {
    fn export(&self, source: &ExportSource<'_>) -> Result<ExportArtifact, ExportError>;
}
