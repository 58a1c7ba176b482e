mod engine;
mod error;
mod pdf;

pub use engine::{PdfEngine, RenderOutcome, RenderTicket};
pub use error::{DocumentError, DocumentResult};
pub use pdf::{PdfDocument, RenderedPage};
