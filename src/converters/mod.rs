//! Text post-processing shared by extraction.
//!
//! The host crate this engine is built on also ships Markdown/HTML/Office
//! conversion; none of that output-format machinery is needed to redact a
//! page, so only the whitespace cleanup `document::extract_text` depends on
//! survives here.

pub mod whitespace;

pub use whitespace::{cleanup_markdown, cleanup_plain_text, normalize_whitespace, remove_page_artifacts};
