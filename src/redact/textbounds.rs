//! Axis-aligned bounding boxes for text-showing operators.
//!
//! Mirrors how [`crate::extractors::text`] walks glyph advances to rebuild
//! extracted strings, but here the output is geometry rather than
//! characters: a rectangle in text space that the parser then carries
//! through `Tm × CTM` into page space.

use crate::content::graphics_state::Matrix;
use crate::redact::fontmetrics::FontMetrics;
use crate::redact::operation::Rect;

/// Text-state fields that affect glyph placement, independent of the
/// graphics-state CTM. Named after the operators that set them.
#[derive(Debug, Clone, Copy)]
pub struct TextState {
    /// `Tc`: extra space, in unscaled text units, added after every glyph.
    pub char_spacing: f64,
    /// `Tw`: extra space added after the single-byte code `0x20`, never
    /// applied to multi-byte (composite-font) codes.
    pub word_spacing: f64,
    /// `Tz`: horizontal scale, as a fraction (100 = 1.0).
    pub horizontal_scale: f64,
    /// `TL`: leading, used by `T*`/`'`/`"` but not by bbox computation
    /// itself.
    pub leading: f64,
    /// `Tf` font size.
    pub font_size: f64,
    /// `Tr` render mode. Mode 3 is invisible text; still produces a bbox
    /// per spec, since invisible text is still extractable.
    pub render_mode: i32,
    /// `Ts`: baseline rise.
    pub rise: f64,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            leading: 0.0,
            font_size: 0.0,
            render_mode: 0,
            rise: 0.0,
        }
    }
}

/// One piece of a `TJ` array: either a run of bytes to show, or a raw
/// number that displaces the text position (in thousandths of text-space
/// units, subtracted from the pen position before scaling).
pub enum ShowPiece<'a> {
    Bytes(&'a [u8]),
    Adjustment(f64),
}

/// Computes bounding boxes for `Tj`/`'`/`"`/`TJ` and tracks the text-space
/// advance so the parser can update `Tm` afterward.
pub struct TextBoundsCalculator;

impl TextBoundsCalculator {
    /// Compute the axis-aligned bbox, in PDF user-space points, of showing
    /// `pieces` under `state`/`metrics`, with the text-line matrix `tm` and
    /// current transform `ctm` in effect. Also returns the total text-space
    /// advance (already scaled by `Tz`), which the caller uses to update
    /// `Tm` by translating `(advance, 0)` afterward.
    ///
    /// Whether a byte is "composite" (2-byte CID vs single byte) is decided
    /// by `metrics.is_composite`; composite codes are read big-endian pairs
    /// and never receive word spacing, per the PDF spec.
    pub fn measure(
        pieces: &[ShowPiece<'_>],
        state: &TextState,
        metrics: &FontMetrics,
        tm: &Matrix,
        ctm: &Matrix,
    ) -> (Rect, f64) {
        let th = state.horizontal_scale;
        let mut advance = 0.0_f64;

        for piece in pieces {
            match piece {
                ShowPiece::Bytes(bytes) => {
                    if metrics.is_composite {
                        let mut i = 0;
                        while i + 1 < bytes.len() {
                            let code = u16::from_be_bytes([bytes[i], bytes[i + 1]]);
                            advance += glyph_advance(code, false, state, metrics);
                            i += 2;
                        }
                    } else {
                        for &byte in bytes.iter() {
                            let is_space = byte == 0x20;
                            advance += glyph_advance(byte as u16, is_space, state, metrics);
                        }
                    }
                },
                ShowPiece::Adjustment(amount) => {
                    advance -= (amount / 1000.0) * state.font_size * th;
                },
            }
        }

        let ascent_pts = metrics.ascent as f64 * state.font_size / 1000.0;
        let descent_pts = metrics.descent as f64 * state.font_size / 1000.0;

        let y_min = descent_pts + state.rise;
        let y_max = ascent_pts + state.rise;
        let (x_min, x_max) = if advance >= 0.0 { (0.0, advance) } else { (advance, 0.0) };

        let combined = tm.multiply(ctm);
        let corners = [
            combined.transform_point(x_min as f32, y_min as f32),
            combined.transform_point(x_max as f32, y_min as f32),
            combined.transform_point(x_min as f32, y_max as f32),
            combined.transform_point(x_max as f32, y_max as f32),
        ];

        let mut bbox = Rect::point(corners[0].x as f64, corners[0].y as f64);
        for corner in &corners[1..] {
            bbox = bbox.union_point(corner.x as f64, corner.y as f64);
        }

        (bbox, advance)
    }
}

/// Advance, in unscaled text-space units, contributed by one character
/// code: glyph width plus char spacing plus (for a single-byte space)
/// word spacing, all scaled by `Tz`.
fn glyph_advance(code: u16, is_space: bool, state: &TextState, metrics: &FontMetrics) -> f64 {
    let glyph_w = metrics.advance_for(code) as f64 / 1000.0 * state.font_size;
    let word = if is_space { state.word_spacing } else { 0.0 };
    (glyph_w + state.char_spacing + word) * state.horizontal_scale
}
