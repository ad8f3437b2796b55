//! Orchestrates one redaction call end to end: convert region, parse,
//! filter, rebuild, replace, mark, verify, and roll back on disagreement.
//!
//! This is the only entry point a caller needs; everything else in
//! `redact` exists to give this module the pieces it filters, rebuilds,
//! and checks.

use crate::error::Result;
use crate::redact::audit::AuditRecord;
use crate::redact::builder::ContentStreamBuilder;
use crate::redact::coords::{CoordinateConverter, PixelRect};
use crate::redact::error::RedactError;
use crate::redact::fontmetrics::FontMetricsProvider;
use crate::redact::operation::{Operation, Rect};
use crate::redact::page::PageHandle;
use crate::redact::parser::ContentStreamParser;
use crate::redact::verifier::{RedactionVerifier, VerifierReport};
use crate::redact::RedactionOptions;

/// Outcome category of a [`RedactionEngine::redact_area`] call.
///
/// Deliberately a three-way enum rather than a boolean "success" flag:
/// collapsing `NoContent` into "success" would let a caller mistake "there
/// was nothing to redact" for "redaction happened," and collapsing
/// `Failed` into a plain `Err` would lose the partially-computed counts a
/// caller needs for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedactionMode {
    /// Content intersecting the region was found, removed, and the
    /// verifier confirmed nothing recoverable remains.
    TrueRedaction,
    /// The region contained no removable content; the page is unchanged
    /// unless the caller opted into visual-only marking.
    NoContent,
    /// Content was found and an attempt was made to remove it, but the
    /// verifier still found residual glyphs; the page has been rolled back
    /// to its pre-call bytes.
    Failed,
}

/// Result of one [`RedactionEngine::redact_area`] call.
#[derive(Debug, Clone)]
pub struct RedactionResult {
    /// Outcome category.
    pub mode: RedactionMode,
    /// Text-showing operators removed.
    pub text_ops_removed: usize,
    /// Path operations removed.
    pub path_ops_removed: usize,
    /// Image XObject invocations removed.
    pub image_ops_removed: usize,
    /// The caller's region, converted to the page's intrinsic PDFPoint
    /// frame.
    pub region_points: Rect,
    /// Font names the page's resources had no entry for; metrics fell
    /// back to the standard-14/conservative tiers for these. Non-fatal.
    pub unresolved_fonts: Vec<String>,
    /// The mandatory audit record, already logged at `error!` by the time
    /// this result is returned.
    pub audit: AuditRecord,
    /// Human-readable detail for a `Failed` outcome (the verifier's
    /// residual glyph runs). `None` for `TrueRedaction`/`NoContent`.
    pub diagnostic: Option<String>,
}

/// Stateless orchestrator for true content-level redaction of one page
/// region at a time.
pub struct RedactionEngine;

impl RedactionEngine {
    /// Run the full redact-area sequence against `page`, within `region`
    /// (caller pixels at `dpi`), per `options`.
    ///
    /// On success or `NoContent`, the page's staged content (see
    /// [`crate::editor::document_editor::DocumentEditor`]) reflects the
    /// new bytes; the caller still owns deciding when to `save()`. On
    /// `Failed`, any staged content for this page has been rolled back to
    /// the bytes captured at the start of this call.
    ///
    /// Fails fast with [`RedactError::CoordinateRoundTrip`], before touching
    /// the page, if `options.dpi_tolerance` can't be satisfied by the
    /// region/page/rotation/dpi combination.
    pub fn redact_area(
        &self,
        page: &mut PageHandle<'_>,
        region: PixelRect,
        dpi: f64,
        options: &RedactionOptions,
    ) -> Result<RedactionResult> {
        let (page_width, page_height) = page.media_box()?;
        let rotation = page.rotation()?;
        let region_points =
            CoordinateConverter::pixel_rect_to_pdf(region, page_width, page_height, rotation, dpi);
        check_round_trip(region, page_width, page_height, rotation, dpi, options.tolerance())?;

        let original_bytes = page.content_streams()?;
        let mut fonts = FontMetricsProvider::new();
        let ops = ContentStreamParser::parse(&original_bytes, page, &mut fonts)?;

        let mut kept = Vec::with_capacity(ops.len());
        let (mut text_removed, mut path_removed, mut image_removed) = (0usize, 0usize, 0usize);
        for op in ops {
            if op.intersects_region(&region_points) {
                match op {
                    Operation::Text { .. } => text_removed += 1,
                    Operation::Path { .. } => path_removed += 1,
                    Operation::Image { .. } => image_removed += 1,
                    // StateChange/Unknown never carry a bbox, so they never
                    // reach this branch (see Operation::intersects_region).
                    _ => unreachable!("non-geometric operation reported a region intersection"),
                }
            } else {
                kept.push(op);
            }
        }
        let removed_count = text_removed + path_removed + image_removed;
        let unresolved_fonts = fonts.unresolved_fonts().to_vec();

        if removed_count == 0 {
            let audit = AuditRecord::emit(RedactionMode::NoContent, 0, 0, 0);
            if options.visual_only_on_no_content() && options.confirmation_mark_enabled() {
                let mark = confirmation_mark_bytes(&region_points);
                page.append_content_stream(&mark)?;
            }
            return Ok(RedactionResult {
                mode: RedactionMode::NoContent,
                text_ops_removed: 0,
                path_ops_removed: 0,
                image_ops_removed: 0,
                region_points,
                unresolved_fonts,
                audit,
                diagnostic: None,
            });
        }

        let new_bytes = ContentStreamBuilder::build(&kept)?;
        page.replace_content_streams(&new_bytes)?;

        let mark_bytes = if options.confirmation_mark_enabled() {
            let mark = confirmation_mark_bytes(&region_points);
            page.append_content_stream(&mark)?;
            mark
        } else {
            Vec::new()
        };

        let mut verify_bytes = new_bytes;
        verify_bytes.extend_from_slice(&mark_bytes);
        let report = RedactionVerifier::verify(&verify_bytes, page, &mut fonts, &region_points)?;

        if !report.passed() {
            page.clear_pending_content();
            page.replace_content_streams(&original_bytes)?;
            let diagnostic = Some(RedactError::VerifierDisagreement {
                residual: report.residual_glyphs.join("; "),
            }.to_string());
            let audit = AuditRecord::emit(RedactionMode::Failed, text_removed, path_removed, image_removed);
            return Ok(RedactionResult {
                mode: RedactionMode::Failed,
                text_ops_removed: text_removed,
                path_ops_removed: path_removed,
                image_ops_removed: image_removed,
                region_points,
                unresolved_fonts,
                audit,
                diagnostic,
            });
        }

        let audit =
            AuditRecord::emit(RedactionMode::TrueRedaction, text_removed, path_removed, image_removed);
        Ok(RedactionResult {
            mode: RedactionMode::TrueRedaction,
            text_ops_removed: text_removed,
            path_ops_removed: path_removed,
            image_ops_removed: image_removed,
            region_points,
            unresolved_fonts,
            audit,
            diagnostic: None,
        })
    }

    /// Diagnostic-only variant: report whether `region` currently contains
    /// any recoverable text, without modifying the page.
    pub fn verify_only(
        &self,
        page: &mut PageHandle<'_>,
        region: PixelRect,
        dpi: f64,
    ) -> Result<VerifierReport> {
        let (page_width, page_height) = page.media_box()?;
        let rotation = page.rotation()?;
        let region_points =
            CoordinateConverter::pixel_rect_to_pdf(region, page_width, page_height, rotation, dpi);

        let bytes = page.content_streams()?;
        let mut fonts = FontMetricsProvider::new();
        RedactionVerifier::verify(&bytes, page, &mut fonts, &region_points)
    }
}

/// Re-derives `region`'s four corners in PDFPoint and converts them straight
/// back to pixels, failing if any corner drifts from its original pixel
/// coordinates by more than `tolerance_px`. Guards the invariant that
/// [`CoordinateConverter`]'s forward and inverse transforms stay exact
/// inverses of each other for whatever page size/rotation a caller passes.
fn check_round_trip(
    region: PixelRect,
    page_width: f64,
    page_height: f64,
    rotation: i32,
    dpi: f64,
    tolerance_px: f64,
) -> Result<()> {
    let corners = [
        (region.x, region.y),
        (region.x + region.width, region.y),
        (region.x, region.y + region.height),
        (region.x + region.width, region.y + region.height),
    ];

    let mut max_delta = 0.0f64;
    for (px, py) in corners {
        let (x, y) = CoordinateConverter::pixel_point_to_pdf_point(
            px, py, page_width, page_height, rotation, dpi,
        );
        let (px2, py2) = CoordinateConverter::pdf_point_to_pixel_point(
            x, y, page_width, page_height, rotation, dpi,
        );
        max_delta = max_delta.max((px - px2).abs()).max((py - py2).abs());
    }

    if max_delta > tolerance_px {
        return Err(RedactError::CoordinateRoundTrip { delta_px: max_delta, tolerance_px }.into());
    }
    Ok(())
}

/// Build the confirmation-mark content-stream fragment: `/Artifact BMC / q
/// / 0 0 0 rg / <x> <y> <w> <h> re / f / Q / EMC`, coordinates formatted
/// with up to 4 decimals, trailing zeros trimmed.
///
/// Wrapped in an `/Artifact` marked-content span (ISO 32000-1 14.8.2.2, the
/// same tag [`crate::extractors::text`] already treats as page furniture
/// rather than document content) so [`crate::redact::parser`] never gives
/// its rectangle a bbox: a later `redact_area` call over the same region
/// re-parses this fragment but can't mistake it for removable content,
/// which is what makes redaction idempotent.
fn confirmation_mark_bytes(region: &Rect) -> Vec<u8> {
    let x = mark_num(region.x_min);
    let y = mark_num(region.y_min);
    let w = mark_num(region.x_max - region.x_min);
    let h = mark_num(region.y_max - region.y_min);
    format!("/Artifact BMC\nq\n0 0 0 rg\n{x} {y} {w} {h} re\nf\nQ\nEMC\n").into_bytes()
}

/// Number formatting for the confirmation mark: integers print bare,
/// non-integers print with up to 4 decimals and trailing zeros trimmed
/// (spec.md §6's confirmation-mark template, distinct from the 5-decimal
/// convention [`crate::writer::object_serializer`] uses elsewhere).
fn mark_num(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let formatted = format!("{:.4}", value);
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_mark_matches_template_shape() {
        let region = Rect::from_corners(90.0, 690.0, 230.0, 715.0);
        let bytes = confirmation_mark_bytes(&region);
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("/Artifact BMC"));
        assert_eq!(lines.next(), Some("q"));
        assert_eq!(lines.next(), Some("0 0 0 rg"));
        assert_eq!(lines.next(), Some("90 690 140 25 re"));
        assert_eq!(lines.next(), Some("f"));
        assert_eq!(lines.next(), Some("Q"));
        assert_eq!(lines.next(), Some("EMC"));
    }

    #[test]
    fn mark_num_trims_trailing_zeros() {
        assert_eq!(mark_num(12.5), "12.5");
        assert_eq!(mark_num(12.0), "12");
        assert_eq!(mark_num(12.125), "12.125");
    }

    #[test]
    fn round_trip_passes_within_default_tolerance() {
        let region = PixelRect::new(50.0, 50.0, 100.0, 40.0);
        let result = check_round_trip(region, 612.0, 792.0, 90, 150.0, 0.01);
        assert!(result.is_ok());
    }

    #[test]
    fn round_trip_rejects_unsatisfiable_tolerance() {
        // A negative tolerance can never be satisfied, regardless of the
        // actual (always non-negative) round-trip delta.
        let region = PixelRect::new(50.0, 50.0, 100.0, 40.0);
        let result = check_round_trip(region, 612.0, 792.0, 0, 150.0, -1.0);
        match result {
            Err(crate::error::Error::Redact(msg)) => {
                assert!(msg.contains("round-trip"), "unexpected message: {msg}")
            },
            other => panic!("expected a Redact error, got {other:?}"),
        }
    }
}
