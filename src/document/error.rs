use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type DocumentResult<T> = std::result::Result<T, DocumentError>;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("PDF not found: {path}")]
    NotFound { path: PathBuf },
    #[error("failed to read {path}")]
    Io { path: PathBuf, source: io::Error },
    #[error("not a valid PDF file: {reason}")]
    InvalidPdf { reason: String },
    #[error("PDF is password protected")]
    PasswordProtected,
    #[error("PDF has no pages")]
    EmptyDocument,
    #[error("page {page} out of bounds (total: {total})")]
    PageOutOfBounds { page: u32, total: u32 },
    #[error("PDFium error: {reason}")]
    Pdfium { reason: String },
}

impl DocumentError {
    /// Short message for modal dialogs; the full error goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { path } => format!("The file {} no longer exists.", path.display()),
            Self::Io { path, .. } => format!("The file {} could not be read.", path.display()),
            Self::InvalidPdf { .. } => "The selected file is not a valid PDF.".to_string(),
            Self::PasswordProtected => "Password-protected PDFs are not supported.".to_string(),
            Self::EmptyDocument => "The selected PDF has no pages.".to_string(),
            Self::PageOutOfBounds { page, total } => {
                format!("Page {} does not exist (document has {total}).", page + 1)
            }
            Self::Pdfium { .. } => "The PDF could not be rendered.".to_string(),
        }
    }
}
