//! Glyph advance widths and ascent/descent, resolved per named font.
//!
//! Three-tier resolution, cheapest-and-most-accurate first: an embedded
//! font descriptor on the page's own resources, then the PDF Base-14
//! standard metrics, then a conservative fixed fallback. The fallback is
//! deliberately oversized (ascent 750, descent −250, advance 500/1000 em)
//! so a bounding box computed from it is too generous rather than too
//! tight — the safe direction for a redaction engine to be wrong in.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::redact::page::{FontDescriptorHandle, PageHandle};
use crate::writer::FontManager;

lazy_static! {
    /// The writer crate's Base-14 font table, built once per process and
    /// reused for every `Standard14`-tier lookup. Follows the same shared-
    /// static pattern the crate already uses for font/cmap lookup tables.
    static ref STANDARD14: FontManager = FontManager::new();
}

/// Resolved glyph metrics for one font, in glyph-space (1000-unit em)
/// coordinates.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// Ascent above the baseline.
    pub ascent: f32,
    /// Descent below the baseline (typically negative).
    pub descent: f32,
    /// Whether character codes for this font are 2-byte CIDs rather than
    /// single bytes. Controls both width lookup and whether `Tw` (word
    /// spacing) ever applies: per the PDF spec, `Tw` only ever affects the
    /// single-byte code `0x20`, never a multi-byte code.
    pub is_composite: bool,
    source: WidthsSource,
}

#[derive(Debug, Clone)]
enum WidthsSource {
    /// Widths resolved from the page's own `/Resources/Font` entry.
    Embedded(FontDescriptorHandle),
    /// No resource entry (or no resources at all) matched the font name;
    /// fall back to a standard-14 table keyed by name, or the fixed
    /// conservative default if the name isn't one of the 14.
    Standard14 { name: String },
    /// Fixed advance for every code, used only by unit tests that need a
    /// `FontMetrics` without constructing a full page/resource graph.
    #[cfg(test)]
    Fixed(f32),
}

/// Conservative glyph-space defaults used when neither an embedded
/// descriptor nor a standard-14 table can resolve a font. Oversized on
/// purpose: see the module doc comment.
const FALLBACK_ASCENT: f32 = 750.0;
const FALLBACK_DESCENT: f32 = -250.0;
const FALLBACK_ADVANCE: f32 = 500.0;

impl FontMetrics {
    /// Horizontal advance, in glyph-space (1000-unit em) units, for one
    /// character code (a single byte for simple fonts, a CID for
    /// composite ones).
    pub fn advance_for(&self, code: u16) -> f32 {
        match &self.source {
            WidthsSource::Embedded(handle) => handle.advance_for(code),
            WidthsSource::Standard14 { name } => STANDARD14
                .get_font(name)
                .map(|f| f.char_width(code as u8 as char))
                .unwrap_or(FALLBACK_ADVANCE),
            #[cfg(test)]
            WidthsSource::Fixed(width) => *width,
        }
    }

    /// Build a `FontMetrics` with a fixed per-code advance, bypassing both
    /// resource lookup and the standard-14 table. Used only by tests in
    /// [`crate::redact::textbounds`] that exercise bbox geometry without
    /// needing a real page/resources graph.
    #[cfg(test)]
    pub fn for_test(ascent: f32, descent: f32, is_composite: bool, fixed_advance: f32) -> Self {
        Self { ascent, descent, is_composite, source: WidthsSource::Fixed(fixed_advance) }
    }
}

/// Conservative metrics for text shown with no resolvable font at all (a
/// malformed content stream that shows text before any `Tf`). Never
/// produced by a well-formed page; exists so the parser has something to
/// measure a bbox against rather than aborting.
pub(crate) fn conservative_default(is_composite: bool) -> FontMetrics {
    FontMetrics {
        ascent: FALLBACK_ASCENT,
        descent: FALLBACK_DESCENT,
        is_composite,
        source: WidthsSource::Standard14 { name: String::new() },
    }
}

/// Resolves [`FontMetrics`] for a named font on a page, caching results for
/// the lifetime of one `redact_area` call (not across calls: the cache is a
/// plain `HashMap` owned by the provider, matching spec's "purity per
/// `(font_name, resources)`, not actual cross-call sharing").
#[derive(Debug, Default)]
pub struct FontMetricsProvider {
    cache: HashMap<String, FontMetrics>,
    /// Font names the page's resources did not have an entry for. Surfaced
    /// on the redaction result as the non-fatal `UnresolvedFont` condition.
    unresolved: Vec<String>,
}

impl FontMetricsProvider {
    /// Create an empty provider with no cached lookups yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve metrics for `font_name` against `page`'s resources, using
    /// the cache if this exact name was already resolved during this call.
    pub fn metrics_for(
        &mut self,
        page: &mut PageHandle<'_>,
        font_name: &str,
    ) -> crate::error::Result<FontMetrics> {
        if let Some(cached) = self.cache.get(font_name) {
            return Ok(cached.clone());
        }

        let metrics = match page.resources_font_entry(font_name)? {
            Some(handle) if handle.ascent != 0.0 || handle.descent != 0.0 => FontMetrics {
                ascent: handle.ascent,
                descent: handle.descent,
                is_composite: handle.is_composite(),
                source: WidthsSource::Embedded(handle),
            },
            Some(handle) => {
                // Resource entry exists but carries no FontDescriptor
                // (common for the non-embedded Base-14 case): widths can
                // still come from the resource's /Widths array if present,
                // but ascent/descent falls through to the standard-14/
                // fallback tiers keyed by BaseFont name.
                let base_font = handle.info.base_font.clone();
                let is_composite = handle.is_composite();
                if let Some(font) = STANDARD14.get_font(&base_font) {
                    FontMetrics {
                        ascent: font.ascender,
                        descent: font.descender,
                        is_composite,
                        source: WidthsSource::Embedded(handle),
                    }
                } else {
                    self.unresolved.push(font_name.to_string());
                    FontMetrics {
                        ascent: FALLBACK_ASCENT,
                        descent: FALLBACK_DESCENT,
                        is_composite,
                        source: WidthsSource::Embedded(handle),
                    }
                }
            },
            None => {
                self.unresolved.push(font_name.to_string());
                if let Some(font) = STANDARD14.get_font(font_name) {
                    FontMetrics {
                        ascent: font.ascender,
                        descent: font.descender,
                        is_composite: false,
                        source: WidthsSource::Standard14 { name: font_name.to_string() },
                    }
                } else {
                    FontMetrics {
                        ascent: FALLBACK_ASCENT,
                        descent: FALLBACK_DESCENT,
                        is_composite: false,
                        source: WidthsSource::Standard14 { name: font_name.to_string() },
                    }
                }
            },
        };

        self.cache.insert(font_name.to_string(), metrics.clone());
        Ok(metrics)
    }

    /// Font names that fell through to the standard-14/fallback tiers
    /// because the page had no resolvable resource entry for them.
    pub fn unresolved_fonts(&self) -> &[String] {
        &self.unresolved
    }
}
