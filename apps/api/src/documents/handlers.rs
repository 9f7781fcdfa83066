//! PDF upload used as extra context for question generation.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Serialize)]
pub struct ParsedDocument {
    pub file_name: Option<String>,
    pub text: String,
}

/// Rejects anything that is not a PDF or exceeds `max_bytes`.
pub fn validate_pdf(file_name: Option<&str>, data: &[u8], max_bytes: usize) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if data.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "File exceeds the {} MB limit",
            max_bytes / (1024 * 1024)
        )));
    }
    let named_pdf = file_name
        .map(|n| n.to_lowercase().ends_with(".pdf"))
        .unwrap_or(true);
    if !named_pdf || !data.starts_with(PDF_MAGIC) {
        return Err(AppError::Validation("Only PDF files are supported".to_string()));
    }
    Ok(())
}

/// POST /api/documents/parse
pub async fn handle_parse_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParsedDocument>, AppError> {
    let max_bytes = state.config.max_upload_mb * 1024 * 1024;

    let mut upload: Option<(Option<String>, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
        upload = Some((file_name, data));
        break;
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::Validation("A 'file' field is required".to_string()))?;
    validate_pdf(file_name.as_deref(), &data, max_bytes)?;

    // PDF text extraction is CPU-bound.
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF extraction: {e}")))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction failed: {e}")))?;

    let text = text.trim().to_string();
    info!(
        "Extracted {} chars from {}",
        text.len(),
        file_name.as_deref().unwrap_or("upload")
    );
    Ok(Json(ParsedDocument { file_name, text }))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{app, default_state};

    const MB: usize = 1024 * 1024;

    #[test]
    fn test_validate_pdf() {
        assert!(validate_pdf(Some("cv.pdf"), b"%PDF-1.7 ...", MB).is_ok());
        assert!(validate_pdf(Some("CV.PDF"), b"%PDF-1.4", MB).is_ok());
        assert!(validate_pdf(Some("notes.txt"), b"%PDF-1.4", MB).is_err());
        assert!(validate_pdf(Some("fake.pdf"), b"hello", MB).is_err());
        assert!(validate_pdf(Some("big.pdf"), &vec![b'%'; MB + 1], MB).is_err());
        assert!(validate_pdf(Some("empty.pdf"), b"", MB).is_err());
    }

    #[tokio::test]
    async fn test_non_pdf_upload_is_rejected() {
        let state = default_state();
        let boundary = "XBOUNDARY";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"notes.txt\"\r\nContent-Type: text/plain\r\n\r\nhello\r\n--{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/documents/parse")
            .header("content-type", format!("multipart/form-data; boundary={boundary}"))
            .body(Body::from(body))
            .unwrap();

        let response = app(&state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), 400);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"]["message"], "Only PDF files are supported");
    }
}
