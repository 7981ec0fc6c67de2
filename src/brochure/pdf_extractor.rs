//! PDF text extraction wrapper
//!
//! Fetches a PDF over HTTP and extracts its text page by page with the
//! pdf-extract crate. Failures come back tagged so each one keeps its own
//! log line:
//! - Non-success HTTP status
//! - Network/transport errors
//! - Corrupted or non-PDF bodies
//! - Scanned/image-only or encrypted PDFs (no text layer)

use reqwest::Client;
use tracing::{error, info, warn};

/// Why a brochure produced no text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("brochure endpoint returned HTTP {0}")]
    Status(u16),

    #[error("failed to fetch brochure: {0}")]
    Fetch(String),

    #[error("failed to parse PDF: {0}")]
    Parse(String),

    #[error("PDF contains no extractable text")]
    Empty,
}

/// Join per-page text in page order, skipping pages without text
///
/// Kept pages are joined as extracted; only the joined text is trimmed.
pub fn join_page_texts<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(|page| page.as_ref())
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn text_from_pages(pages: &[String]) -> Result<String, ExtractError> {
    let text = join_page_texts(pages);
    if text.is_empty() {
        return Err(ExtractError::Empty);
    }
    Ok(text)
}

/// Download `url` and extract its text
///
/// Exactly one GET is issued. Parsing runs on the blocking pool; a panic
/// inside the parser is reported as [`ExtractError::Parse`].
pub async fn fetch_document_text(client: &Client, url: &str) -> Result<String, ExtractError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ExtractError::Fetch(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ExtractError::Status(status.as_u16()));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ExtractError::Fetch(format!("failed to read body: {}", e)))?
        .to_vec();

    let pages = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem_by_pages(&bytes))
        .await
        .map_err(|e| ExtractError::Parse(format!("PDF parser aborted: {}", e)))?
        .map_err(|e| ExtractError::Parse(e.to_string()))?;

    text_from_pages(&pages)
}

/// Brochure text for the Q&A handler; every failure is logged and becomes ""
pub async fn load_brochure_text(client: &Client, url: &str) -> String {
    match fetch_document_text(client, url).await {
        Ok(text) => {
            info!(chars = text.chars().count(), "PDF loaded successfully");
            text
        }
        Err(ExtractError::Status(status)) => {
            warn!(status, "Failed to fetch brochure");
            String::new()
        }
        Err(ExtractError::Empty) => {
            warn!("PDF extracted no text. The file may be scanned or encrypted.");
            String::new()
        }
        Err(e @ ExtractError::Fetch(_)) => {
            error!(error = %e, "Error downloading brochure");
            String::new()
        }
        Err(e @ ExtractError::Parse(_)) => {
            error!(error = %e, "Error reading brochure PDF");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{minimal_pdf, spawn_stub, unreachable_url};
    use axum::{Router, http::StatusCode, routing::get};

    #[test]
    fn test_join_skips_empty_pages() {
        assert_eq!(join_page_texts(&["Welcome", "", "End"]), "Welcome\nEnd");
    }

    #[test]
    fn test_join_trims_only_the_joined_text() {
        assert_eq!(join_page_texts(&["\n\nWelcome\n", "  \n", "End\n"]), "Welcome\n\nEnd");
    }

    #[test]
    fn test_join_keeps_inner_page_whitespace() {
        assert_eq!(join_page_texts(&["Rates  ", "  Floors", "End"]), "Rates  \n  Floors\nEnd");
    }

    #[test]
    fn test_only_empty_pages_is_empty() {
        let pages = vec![String::new(), "\n".to_string(), "  ".to_string()];
        assert_eq!(join_page_texts(&pages), "");
        assert_eq!(text_from_pages(&pages), Err(ExtractError::Empty));
    }

    #[tokio::test]
    async fn test_not_found_status() {
        let app = Router::new().route("/brochure.pdf", get(|| async { StatusCode::NOT_FOUND }));
        let base = spawn_stub(app).await;
        let url = format!("{}/brochure.pdf", base);
        let client = Client::new();

        assert_eq!(fetch_document_text(&client, &url).await, Err(ExtractError::Status(404)));
        assert_eq!(load_brochure_text(&client, &url).await, "");
    }

    #[tokio::test]
    async fn test_non_pdf_body_is_parse_error() {
        let app = Router::new().route("/brochure.pdf", get(|| async { "definitely not a pdf" }));
        let base = spawn_stub(app).await;
        let url = format!("{}/brochure.pdf", base);
        let client = Client::new();

        let result = fetch_document_text(&client, &url).await;
        assert!(matches!(result, Err(ExtractError::Parse(_))), "got {:?}", result);
        assert_eq!(load_brochure_text(&client, &url).await, "");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        let url = unreachable_url().await;
        let client = Client::new();

        let result = fetch_document_text(&client, &url).await;
        assert!(matches!(result, Err(ExtractError::Fetch(_))), "got {:?}", result);
        assert_eq!(load_brochure_text(&client, &url).await, "");
    }

    #[tokio::test]
    async fn test_pages_joined_in_order() {
        let pdf = minimal_pdf(&["Welcome", "", "End"]);
        let app = Router::new().route("/brochure.pdf", get(move || async move { pdf }));
        let base = spawn_stub(app).await;
        let url = format!("{}/brochure.pdf", base);

        let text = fetch_document_text(&Client::new(), &url).await.unwrap();
        assert_eq!(text, text.trim());
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        assert_eq!(lines, ["Welcome", "End"]);
    }

    #[tokio::test]
    async fn test_blank_pages_only_is_empty() {
        let pdf = minimal_pdf(&["", ""]);
        let app = Router::new().route("/brochure.pdf", get(move || async move { pdf }));
        let base = spawn_stub(app).await;
        let url = format!("{}/brochure.pdf", base);
        let client = Client::new();

        assert_eq!(fetch_document_text(&client, &url).await, Err(ExtractError::Empty));
        assert_eq!(load_brochure_text(&client, &url).await, "");
    }
}
