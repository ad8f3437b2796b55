//! The mandatory failure-audit sink spec.md §6 requires: one record per
//! `redact_area` call that "cannot be silenced by log-level configuration."
//!
//! `log::error!` passes a default `env_logger` filter (which defaults to
//! `Error`-and-above even with no `RUST_LOG` set) under any target, so
//! logging at `Error` under a dedicated target is the cheapest way to meet
//! that requirement without inventing a second logging framework. The
//! record is also attached to [`crate::redact::engine::RedactionResult`] so
//! a caller cannot lose it purely by misconfiguring logging — the audit
//! trail is a return value, not just a side effect.

use crate::redact::engine::RedactionMode;

/// Target `env_logger`/`log` consumers can grep or route separately from
/// the rest of the crate's `debug`/`warn` chatter.
pub const AUDIT_TARGET: &str = "pdf_oxide::redact::audit";

/// One audit line per [`crate::redact::engine::RedactionEngine::redact_area`]
/// call: the fields spec.md §6 names, nothing more.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    /// Outcome of the call.
    pub mode: RedactionMode,
    /// Text-showing operators removed.
    pub text_removed: usize,
    /// Path operations removed.
    pub path_removed: usize,
    /// Image XObject invocations removed.
    pub image_removed: usize,
}

impl AuditRecord {
    /// Build a record and log it immediately at `error` level under
    /// [`AUDIT_TARGET`]. Called exactly once per `redact_area` invocation,
    /// regardless of outcome.
    pub fn emit(mode: RedactionMode, text_removed: usize, path_removed: usize, image_removed: usize) -> Self {
        let record = Self { mode, text_removed, path_removed, image_removed };
        log::error!(
            target: AUDIT_TARGET,
            "mode={:?} text_removed={} path_removed={} image_removed={}",
            record.mode,
            record.text_removed,
            record.path_removed,
            record.image_removed,
        );
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_returns_the_fields_it_was_given() {
        let record = AuditRecord::emit(RedactionMode::TrueRedaction, 1, 2, 3);
        assert_eq!(record.mode, RedactionMode::TrueRedaction);
        assert_eq!(record.text_removed, 1);
        assert_eq!(record.path_removed, 2);
        assert_eq!(record.image_removed, 3);
    }
}
