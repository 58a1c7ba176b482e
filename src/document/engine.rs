use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use pdfium_render::prelude::Pdfium;

use super::error::{DocumentError, DocumentResult};
use super::pdf::{
    bind_pdfium, load_document, read_pdf_bytes, render_with, PdfDocument, RenderedPage,
};

const ENGINE_THREAD_NAME: &str = "pagelock-pdfium";

/// Orders render requests. Issuing a ticket supersedes every earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RenderTicket(u64);

impl RenderTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub enum RenderOutcome {
    Rendered(RenderedPage),
    /// A newer ticket was issued before this request reached the engine.
    Superseded,
}

enum EngineRequest {
    Open {
        path: PathBuf,
        bytes: Vec<u8>,
        reply: mpsc::Sender<DocumentResult<PdfDocument>>,
    },
    Render {
        ticket: RenderTicket,
        document: PdfDocument,
        index: u32,
        target_width: u32,
        reply: mpsc::Sender<DocumentResult<RenderOutcome>>,
    },
}

/// Handle to the thread that owns the process's only PDFium binding.
///
/// `Pdfium::new` initializes the library globally and dropping it destroys
/// it, so every open and render runs on that one thread, one at a time.
/// Calls block the caller until the engine answers; the reader calls
/// [`PdfEngine::render`] from a worker, never from the GTK thread.
#[derive(Debug, Clone)]
pub struct PdfEngine {
    requests: mpsc::Sender<EngineRequest>,
    latest_ticket: Arc<AtomicU64>,
}

impl PdfEngine {
    pub fn spawn() -> DocumentResult<Self> {
        let (requests, inbox) = mpsc::channel();
        let latest_ticket = Arc::new(AtomicU64::new(0));
        let engine_ticket = latest_ticket.clone();
        thread::Builder::new()
            .name(ENGINE_THREAD_NAME.to_string())
            .spawn(move || run_engine(inbox, engine_ticket))
            .map_err(|err| DocumentError::Pdfium {
                reason: format!("failed to start PDF engine: {err}"),
            })?;

        Ok(Self {
            requests,
            latest_ticket,
        })
    }

    pub fn open(&self, path: impl AsRef<Path>) -> DocumentResult<PdfDocument> {
        let path = path.as_ref();
        let bytes = read_pdf_bytes(path)?;

        let (reply, response) = mpsc::channel();
        self.submit(EngineRequest::Open {
            path: path.to_path_buf(),
            bytes,
            reply,
        })?;
        receive(response)
    }

    pub fn next_ticket(&self) -> RenderTicket {
        RenderTicket(self.latest_ticket.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Renders `index` unless `ticket` has been superseded by the time the
    /// engine gets to it.
    pub fn render(
        &self,
        ticket: RenderTicket,
        document: &PdfDocument,
        index: u32,
        target_width: u32,
    ) -> DocumentResult<RenderOutcome> {
        document.page_index(index)?;

        let (reply, response) = mpsc::channel();
        self.submit(EngineRequest::Render {
            ticket,
            document: document.clone(),
            index,
            target_width,
            reply,
        })?;
        receive(response)
    }

    fn submit(&self, request: EngineRequest) -> DocumentResult<()> {
        self.requests.send(request).map_err(|_| engine_stopped())
    }
}

fn receive<T>(response: mpsc::Receiver<DocumentResult<T>>) -> DocumentResult<T> {
    response.recv().map_err(|_| engine_stopped())?
}

fn engine_stopped() -> DocumentError {
    DocumentError::Pdfium {
        reason: "PDF engine is not running".to_string(),
    }
}

fn run_engine(inbox: mpsc::Receiver<EngineRequest>, latest_ticket: Arc<AtomicU64>) {
    let mut pdfium = None;
    for request in inbox {
        match request {
            EngineRequest::Open { path, bytes, reply } => {
                let result = bound_pdfium(&mut pdfium)
                    .and_then(|pdfium| load_document(pdfium, &path, bytes));
                let _ = reply.send(result);
            }
            EngineRequest::Render {
                ticket,
                document,
                index,
                target_width,
                reply,
            } => {
                if latest_ticket.load(Ordering::Acquire) != ticket.sequence() {
                    tracing::debug!(
                        sequence = ticket.sequence(),
                        page = index,
                        "skipping superseded render"
                    );
                    let _ = reply.send(Ok(RenderOutcome::Superseded));
                    continue;
                }
                let result = bound_pdfium(&mut pdfium)
                    .and_then(|pdfium| render_with(pdfium, &document, index, target_width))
                    .map(RenderOutcome::Rendered);
                let _ = reply.send(result);
            }
        }
    }
    tracing::debug!("pdf engine stopped");
}

// Binds on first use and keeps the binding for the life of the thread.
fn bound_pdfium(slot: &mut Option<Pdfium>) -> DocumentResult<&Pdfium> {
    if slot.is_none() {
        *slot = Some(bind_pdfium()?);
        tracing::info!("bound PDFium library");
    }
    slot.as_ref().ok_or_else(engine_stopped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> PdfDocument {
        PdfDocument::from_parts("/books/a.pdf", b"%PDF-1.4", 3)
    }

    #[test]
    fn tickets_increase_monotonically() {
        let engine = PdfEngine::spawn().unwrap();
        let first = engine.next_ticket();
        let second = engine.clone().next_ticket();

        assert!(second > first);
        assert_eq!(second.sequence(), first.sequence() + 1);
    }

    #[test]
    fn superseded_render_is_skipped_without_touching_pdfium() {
        let engine = PdfEngine::spawn().unwrap();
        let stale = engine.next_ticket();
        let _current = engine.next_ticket();

        let outcome = engine.render(stale, &sample_document(), 0, 800).unwrap();
        assert!(matches!(outcome, RenderOutcome::Superseded));
    }

    #[test]
    fn stale_renders_from_many_workers_are_all_skipped() {
        let engine = PdfEngine::spawn().unwrap();
        let document = sample_document();
        let stale: Vec<RenderTicket> = (0..4).map(|_| engine.next_ticket()).collect();
        let _current = engine.next_ticket();

        let workers: Vec<_> = stale
            .into_iter()
            .map(|ticket| {
                let engine = engine.clone();
                let document = document.clone();
                thread::spawn(move || engine.render(ticket, &document, 1, 800))
            })
            .collect();
        for worker in workers {
            let outcome = worker.join().unwrap().unwrap();
            assert!(matches!(outcome, RenderOutcome::Superseded));
        }
    }

    #[test]
    fn render_checks_bounds_before_queueing() {
        let engine = PdfEngine::spawn().unwrap();
        let ticket = engine.next_ticket();

        let err = engine.render(ticket, &sample_document(), 3, 800).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::PageOutOfBounds { page: 3, total: 3 }
        ));
    }

    #[test]
    fn open_reports_missing_file_before_reaching_the_engine() {
        let engine = PdfEngine::spawn().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.pdf");

        let err = engine.open(&missing).unwrap_err();
        assert!(matches!(err, DocumentError::NotFound { path } if path == missing));
    }
}
