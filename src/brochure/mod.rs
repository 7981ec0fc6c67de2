//! Brochure question answering
//!
//! The extractor turns a remote PDF into plain text; the prompt module
//! bounds that text and wraps it around the caller's question.

pub mod pdf_extractor;
pub mod prompt;

pub use pdf_extractor::{ExtractError, fetch_document_text, join_page_texts, load_brochure_text};
pub use prompt::{BROCHURE_CONTEXT_CHARS, BROCHURE_UNAVAILABLE, build_brochure_prompt};
