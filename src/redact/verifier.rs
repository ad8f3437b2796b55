//! Post-redaction check: re-parse the rewritten bytes and confirm nothing
//! text-shaped is still recoverable from inside the redacted region.
//!
//! This is the component that turns "we removed some operators" into an
//! actual security property. [`engine`](crate::redact::engine) treats a
//! failed verification as fatal and rolls back to the bytes captured
//! before the rewrite began, rather than shipping a page that merely
//! looks redacted.

use crate::error::Result;
use crate::redact::fontmetrics::FontMetricsProvider;
use crate::redact::operation::{Operation, Rect};
use crate::redact::page::PageHandle;
use crate::redact::parser::ContentStreamParser;
use crate::content::operators::{Operator, TextElement};

/// Outcome of a [`RedactionVerifier::verify`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifierReport {
    passed: bool,
    /// Human-readable renderings of any text-showing operators still
    /// found intersecting the region, for diagnostic reporting. Empty
    /// when `passed()` is `true`.
    pub residual_glyphs: Vec<String>,
}

impl VerifierReport {
    /// Whether no text-showing operation's bbox intersects the region.
    pub fn passed(&self) -> bool {
        self.passed
    }
}

/// Re-parses rewritten content-stream bytes and checks for residual text.
pub struct RedactionVerifier;

impl RedactionVerifier {
    /// Re-parse `bytes` and confirm no `Text` operation's bbox intersects
    /// `region`. `page`/`fonts` are used only to resolve font metrics for
    /// the re-parse; the rewritten bytes are never written back here.
    pub fn verify(
        bytes: &[u8],
        page: &mut PageHandle<'_>,
        fonts: &mut FontMetricsProvider,
        region: &Rect,
    ) -> Result<VerifierReport> {
        let ops = ContentStreamParser::parse(bytes, page, fonts)?;

        let residual_glyphs: Vec<String> = ops
            .iter()
            .filter_map(|op| match op {
                Operation::Text { operator, bbox, .. }
                    if bbox.is_some_and(|b| b.intersects(region)) =>
                {
                    Some(describe_text_operator(operator))
                },
                _ => None,
            })
            .collect();

        Ok(VerifierReport { passed: residual_glyphs.is_empty(), residual_glyphs })
    }
}

/// Render a text-showing operator's content as a diagnostic string, lossily
/// decoding its byte strings as UTF-8 (content-stream text is rarely UTF-8,
/// but this is for a log line, not round-tripping).
fn describe_text_operator(operator: &Operator) -> String {
    match operator {
        Operator::Tj { text } | Operator::Quote { text } => {
            String::from_utf8_lossy(text).into_owned()
        },
        Operator::DoubleQuote { text, .. } => String::from_utf8_lossy(text).into_owned(),
        Operator::TJ { array } => array
            .iter()
            .filter_map(|el| match el {
                TextElement::String(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
                TextElement::Offset(_) => None,
            })
            .collect::<Vec<_>>()
            .join(""),
        other => format!("{other:?}"),
    }
}
