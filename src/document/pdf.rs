use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use pdfium_render::prelude::*;

use super::error::{DocumentError, DocumentResult};

const PDF_MAGIC: &[u8] = b"%PDF";
const MIN_RENDER_WIDTH: u32 = 64;
const MAX_RENDER_WIDTH: u32 = 8192;

/// A loaded PDF. Holds the raw bytes; rendering goes through [`PdfEngine`].
///
/// [`PdfEngine`]: super::PdfEngine
#[derive(Debug, Clone)]
pub struct PdfDocument {
    path: PathBuf,
    bytes: Arc<[u8]>,
    page_count: u32,
}

#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub index: u32,
    pub image: RgbaImage,
}

impl RenderedPage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl PdfDocument {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub(super) fn page_index(&self, index: u32) -> DocumentResult<u16> {
        if index >= self.page_count {
            return Err(DocumentError::PageOutOfBounds {
                page: index,
                total: self.page_count,
            });
        }
        u16::try_from(index).map_err(|_| DocumentError::PageOutOfBounds {
            page: index,
            total: self.page_count,
        })
    }
}

pub(super) fn read_pdf_bytes(path: &Path) -> DocumentResult<Vec<u8>> {
    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => DocumentError::NotFound {
            path: path.to_path_buf(),
        },
        _ => DocumentError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    validate_pdf_header(&bytes)?;
    Ok(bytes)
}

/// Loads already-validated bytes with `pdfium` and counts the pages.
pub(super) fn load_document(
    pdfium: &Pdfium,
    path: &Path,
    bytes: Vec<u8>,
) -> DocumentResult<PdfDocument> {
    let page_count = {
        let document = pdfium
            .load_pdf_from_byte_slice(&bytes, None)
            .map_err(map_pdfium_error)?;
        document.pages().len() as u32
    };
    ensure_has_pages(page_count)?;

    tracing::info!(path = %path.display(), page_count, "opened PDF");
    Ok(PdfDocument {
        path: path.to_path_buf(),
        bytes: Arc::from(bytes),
        page_count,
    })
}

pub(super) fn render_with(
    pdfium: &Pdfium,
    source: &PdfDocument,
    index: u32,
    target_width: u32,
) -> DocumentResult<RenderedPage> {
    let page_index = source.page_index(index)?;
    let target_width = target_width.clamp(MIN_RENDER_WIDTH, MAX_RENDER_WIDTH);

    let document = pdfium
        .load_pdf_from_byte_slice(&source.bytes, None)
        .map_err(map_pdfium_error)?;
    let page = document
        .pages()
        .get(page_index)
        .map_err(|err| DocumentError::Pdfium {
            reason: format!("failed to get page {}: {err}", index + 1),
        })?;

    let config = PdfRenderConfig::new()
        .set_target_width(target_width as i32)
        .render_form_data(true)
        .render_annotations(true);
    let bitmap = page
        .render_with_config(&config)
        .map_err(|err| DocumentError::Pdfium {
            reason: format!("failed to render page {}: {err}", index + 1),
        })?;

    let image = bitmap.as_image().into_rgba8();
    tracing::debug!(
        page = index,
        width = image.width(),
        height = image.height(),
        "rendered page"
    );
    Ok(RenderedPage { index, image })
}

#[cfg(test)]
impl PdfDocument {
    pub(super) fn from_parts(path: &str, bytes: &[u8], page_count: u32) -> Self {
        Self {
            path: PathBuf::from(path),
            bytes: Arc::from(bytes),
            page_count,
        }
    }
}

fn validate_pdf_header(bytes: &[u8]) -> DocumentResult<()> {
    if bytes.len() < PDF_MAGIC.len() || &bytes[..PDF_MAGIC.len()] != PDF_MAGIC {
        return Err(DocumentError::InvalidPdf {
            reason: "missing %PDF header".to_string(),
        });
    }
    Ok(())
}

fn ensure_has_pages(page_count: u32) -> DocumentResult<()> {
    if page_count == 0 {
        return Err(DocumentError::EmptyDocument);
    }
    Ok(())
}

// Binding initializes the library process-wide and dropping the `Pdfium`
// tears it down, so only the engine thread may call this.
pub(super) fn bind_pdfium() -> DocumentResult<Pdfium> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "/opt/pdfium/lib",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|err| DocumentError::Pdfium {
            reason: format!("failed to initialize PDFium: {err}"),
        })?;

    Ok(Pdfium::new(bindings))
}

fn map_pdfium_error(err: PdfiumError) -> DocumentError {
    match err {
        PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
            DocumentError::PasswordProtected
        }
        other => DocumentError::Pdfium {
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_validation_rejects_non_pdf_bytes() {
        assert!(validate_pdf_header(b"%PDF-1.7\n").is_ok());
        assert!(matches!(
            validate_pdf_header(b"PK\x03\x04"),
            Err(DocumentError::InvalidPdf { .. })
        ));
        assert!(matches!(
            validate_pdf_header(b"%P"),
            Err(DocumentError::InvalidPdf { .. })
        ));
    }

    #[test]
    fn zero_page_documents_are_rejected() {
        assert!(matches!(
            ensure_has_pages(0),
            Err(DocumentError::EmptyDocument)
        ));
        assert!(ensure_has_pages(1).is_ok());
    }

    #[test]
    fn read_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.pdf");

        let err = read_pdf_bytes(&missing).unwrap_err();
        assert!(matches!(err, DocumentError::NotFound { path } if path == missing));
    }

    #[test]
    fn read_rejects_files_without_pdf_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, "plain text pretending to be a pdf").unwrap();

        assert!(matches!(
            read_pdf_bytes(&path),
            Err(DocumentError::InvalidPdf { .. })
        ));
    }

    #[test]
    fn page_index_rejects_pages_past_the_end() {
        let document = PdfDocument::from_parts("/books/a.pdf", b"%PDF-1.4", 3);

        assert_eq!(document.page_index(2).unwrap(), 2);
        assert!(matches!(
            document.page_index(3),
            Err(DocumentError::PageOutOfBounds { page: 3, total: 3 })
        ));
    }

    #[test]
    fn user_messages_use_one_based_pages() {
        let message = DocumentError::PageOutOfBounds { page: 4, total: 3 }.user_message();
        assert_eq!(message, "Page 5 does not exist (document has 3).");
    }
}
