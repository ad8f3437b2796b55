//! Error taxonomy for the redaction engine.
//!
//! Distinct from [`crate::error::Error`] so the engine's failure modes stay
//! named by cause (matching the host crate's own `error.rs` style), with a
//! `#[from]`-style conversion at the boundary so callers still work in terms
//! of the crate's single `Result` alias.

/// Errors the redaction engine can raise.
#[derive(Debug, thiserror::Error)]
pub enum RedactError {
    /// Tokenizer or operator-dispatch failure while parsing a content
    /// stream. Fatal: the page is left unmodified.
    #[error("malformed content stream at byte {offset}: {reason}")]
    MalformedStream {
        /// Byte offset of the failing token.
        offset: usize,
        /// Human-readable description of the failure.
        reason: String,
    },

    /// `BT`/`ET` or `q`/`Q` were left unbalanced after a full parse. Fatal.
    #[error("unbalanced graphics/text state: {reason}")]
    UnbalancedState {
        /// What was left unbalanced.
        reason: String,
    },

    /// Content removal began and then a fatal error forced a rollback.
    #[error("verifier found residual content inside the redaction region")]
    VerifierDisagreement {
        /// Description of the glyph runs (or other content) still found.
        residual: String,
    },

    /// The page handle could not be constructed or used (e.g. a malformed
    /// media box, an out-of-range page index).
    #[error("page handle error: {0}")]
    PageHandle(String),

    /// [`crate::redact::coords::CoordinateConverter`]'s pixel→PDFPoint→pixel
    /// round trip for the requested region drifted by more than the
    /// configured tolerance. Should only ever fire from a degenerate
    /// page size or rotation value, since the forward/inverse transforms are
    /// otherwise exact up to floating-point error.
    #[error("coordinate round-trip drifted {delta_px:.4}px, exceeding tolerance {tolerance_px:.4}px")]
    CoordinateRoundTrip {
        /// Largest per-axis discrepancy observed, in pixels.
        delta_px: f64,
        /// The tolerance the caller configured via
        /// [`crate::redact::RedactionOptions::dpi_tolerance`].
        tolerance_px: f64,
    },
}

impl From<RedactError> for crate::error::Error {
    fn from(err: RedactError) -> Self {
        crate::error::Error::Redact(err.to_string())
    }
}
