//! Content-level PDF redaction.
//!
//! This module implements true redaction: content-stream operators that fall
//! inside a caller-specified region are structurally removed from the page,
//! not merely covered by a visual overlay. A black confirmation rectangle is
//! drawn afterward, but the security property comes from the removal, which
//! [`verifier`] checks for before the call reports success.
//!
//! The pipeline, end to end:
//! [`coords`] converts the caller's pixel region to PDF points, [`parser`]
//! turns the page's content-stream bytes into a [`operation::Operation`]
//! list with per-operation bounding boxes, [`engine`] filters that list
//! against the region and hands the survivors to [`builder`], which
//! re-serializes them, and [`verifier`] re-parses the result to confirm
//! nothing in the region is still recoverable.

pub mod audit;
pub mod builder;
pub mod coords;
pub mod engine;
pub mod error;
pub mod fontmetrics;
pub mod operation;
pub mod page;
pub mod parser;
pub mod textbounds;
pub mod verifier;

pub use audit::AuditRecord;
pub use engine::{RedactionEngine, RedactionMode, RedactionResult};
pub use error::RedactError;
pub use operation::{Operation, PathRun, Rect};
pub use page::{FontDescriptorHandle, PageHandle};
pub use verifier::VerifierReport;

/// Tunable knobs for a single [`RedactionEngine::redact_area`] call.
///
/// Follows the same constructor-method convention as
/// [`crate::editor::document_editor::SaveOptions`]: a `default()` plus
/// chainable `with_*` setters, rather than public fields, so new options can
/// be added without breaking callers.
#[derive(Debug, Clone)]
pub struct RedactionOptions {
    confirmation_mark: bool,
    allow_visual_only_on_no_content: bool,
    dpi_tolerance: f64,
}

impl Default for RedactionOptions {
    fn default() -> Self {
        Self {
            confirmation_mark: true,
            allow_visual_only_on_no_content: false,
            dpi_tolerance: 0.01,
        }
    }
}

impl RedactionOptions {
    /// Whether to draw the black confirmation rectangle after a successful
    /// true redaction. Defaults to `true`; structural removal still happens
    /// either way.
    pub fn with_confirmation_mark(mut self, enabled: bool) -> Self {
        self.confirmation_mark = enabled;
        self
    }

    /// Whether an empty removed-set is still allowed to draw a visual mark.
    /// Defaults to `false`: a region with no removable content never gets a
    /// black rectangle on its own, since that would look like redaction
    /// happened when nothing was structurally removed.
    pub fn allow_visual_only_on_no_content(mut self, allowed: bool) -> Self {
        self.allow_visual_only_on_no_content = allowed;
        self
    }

    /// Tolerance, in pixels, for the coordinate round-trip check used by
    /// tests and diagnostics. Defaults to `0.01`.
    pub fn dpi_tolerance(mut self, tolerance: f64) -> Self {
        self.dpi_tolerance = tolerance;
        self
    }

    pub(crate) fn confirmation_mark_enabled(&self) -> bool {
        self.confirmation_mark
    }

    pub(crate) fn visual_only_on_no_content(&self) -> bool {
        self.allow_visual_only_on_no_content
    }

    pub(crate) fn tolerance(&self) -> f64 {
        self.dpi_tolerance
    }
}
