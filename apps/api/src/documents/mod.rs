// Document upload: PDF text extraction for question-generation context.
// Extraction is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod handlers;
