//! Turns a page's content-stream bytes into an ordered [`Operation`] list.
//!
//! Built on top of [`crate::content::parser::parse_content_stream_strict`],
//! which already tokenizes the content-stream grammar and fails fast with a
//! byte offset on the first malformed operator. This module adds the
//! interpretation layer on top: a graphics/text state machine, path
//! buffering, and per-operator bounding-box computation, following the same
//! state-machine shape as [`crate::extractors::text`] but producing
//! geometry instead of strings.

use crate::content::graphics_state::{GraphicsStateStack, Matrix};
use crate::content::operators::{Operator, TextElement};
use crate::content::parser::parse_content_stream_strict;
use crate::error::Result;
use crate::redact::error::RedactError;
use crate::redact::fontmetrics::{conservative_default, FontMetricsProvider};
use crate::redact::operation::{Operation, PathRun, Rect};
use crate::redact::page::PageHandle;
use crate::redact::textbounds::{ShowPiece, TextBoundsCalculator, TextState};

/// Path-painting operator names that `content::parser::build_operator`
/// leaves in the `Operator::Other` catch-all rather than giving a
/// dedicated variant. Recognized here by name so `s`/`F`/`B`/`B*`/`b*`
/// still close a path run like their dedicated siblings do.
const OTHER_PAINT_OPS: &[&str] = &["s", "F", "B", "B*", "b*"];

/// Interprets a page's content-stream bytes into a typed operation list.
pub struct ContentStreamParser;

impl ContentStreamParser {
    /// Parse `data` (the page's content streams, already concatenated by
    /// the caller) into an ordered [`Operation`] list, resolving font
    /// metrics against `page`/`fonts` as text-showing operators are
    /// encountered.
    ///
    /// Fails with [`RedactError::MalformedStream`] (wrapping the tokenizer's
    /// byte offset and reason) on a malformed token, or with
    /// [`RedactError::UnbalancedState`] if `q`/`Q` or `BT`/`ET` are not
    /// balanced by the end of the stream. Never silently drops an
    /// operator: anything not specifically interpreted becomes an
    /// `Operation::Unknown` holding its exact original bytes.
    pub fn parse(
        data: &[u8],
        page: &mut PageHandle<'_>,
        fonts: &mut FontMetricsProvider,
    ) -> Result<Vec<Operation>> {
        let tokens = parse_content_stream_strict(data).map_err(|e| match e {
            crate::error::Error::ParseError { offset, reason } => {
                RedactError::MalformedStream { offset, reason }.into()
            },
            other => other,
        })?;
        let mut interp = Interpreter::new(data, page, fonts);

        for (i, (offset, operator)) in tokens.iter().enumerate() {
            let end = tokens.get(i + 1).map(|(o, _)| *o).unwrap_or(data.len());
            interp.dispatch(*offset, end, operator)?;
        }

        interp.finish()
    }
}

struct Interpreter<'a, 'p> {
    data: &'a [u8],
    page: &'a mut PageHandle<'p>,
    fonts: &'a mut FontMetricsProvider,
    state: GraphicsStateStack,
    in_text_object: bool,
    path_segments: Vec<Operator>,
    path_clip: Option<Operator>,
    path_bbox: Option<Rect>,
    current_point: (f32, f32),
    subpath_start: (f32, f32),
    ops: Vec<Operation>,
    /// One entry per open BMC/BDC, recording whether that span (or an
    /// ancestor of it) is tagged `/Artifact` (ISO 32000-1 14.8.2.2).
    /// Geometry built while the top entry is `true` is page furniture, not
    /// document content — see `finish_path`. A stack rather than a depth
    /// counter so an EMC that closes a non-Artifact span nested inside an
    /// outer Artifact span doesn't clear the outer one's state.
    marked_content: Vec<bool>,
}

impl<'a, 'p> Interpreter<'a, 'p> {
    fn new(data: &'a [u8], page: &'a mut PageHandle<'p>, fonts: &'a mut FontMetricsProvider) -> Self {
        Self {
            data,
            page,
            fonts,
            state: GraphicsStateStack::new(),
            in_text_object: false,
            path_segments: Vec::new(),
            path_clip: None,
            path_bbox: None,
            current_point: (0.0, 0.0),
            subpath_start: (0.0, 0.0),
            ops: Vec::new(),
            marked_content: Vec::new(),
        }
    }

    fn in_artifact(&self) -> bool {
        self.marked_content.last().copied().unwrap_or(false)
    }

    fn raw(&self, start: usize, end: usize) -> Vec<u8> {
        self.data[start..end].to_vec()
    }

    fn push_unknown(&mut self, start: usize, end: usize) {
        self.ops.push(Operation::Unknown { raw_bytes: self.raw(start, end) });
    }

    fn dispatch(&mut self, offset: usize, end: usize, operator: &Operator) -> Result<()> {
        // Inline images are re-parsed into a typed dict+data operator by the
        // tokenizer, but re-serializing that representation would not
        // reproduce the original bytes exactly (key order, whitespace,
        // binary data framing). Preserve the original bytes verbatim
        // instead, same as any other operator we choose not to interpret.
        if matches!(operator, Operator::InlineImage { .. }) {
            self.push_unknown(offset, end);
            return Ok(());
        }

        if self.is_out_of_context_text_op(operator) {
            log::warn!(
                target: "pdf_oxide::redact::parser",
                "text operator at byte {offset} outside BT/ET; preserved unchanged"
            );
            self.push_unknown(offset, end);
            return Ok(());
        }

        match operator {
            Operator::SaveState => {
                self.state.save();
                self.ops.push(Operation::StateChange { operator: operator.clone() });
            },
            Operator::RestoreState => {
                if self.state.depth() == 1 {
                    log::warn!(
                        target: "pdf_oxide::redact::parser",
                        "Q at byte {offset} with no matching q; ignored"
                    );
                }
                self.state.restore();
                self.ops.push(Operation::StateChange { operator: operator.clone() });
            },
            Operator::Cm { a, b, c, d, e, f } => {
                let local = Matrix { a: *a, b: *b, c: *c, d: *d, e: *e, f: *f };
                let old_ctm = self.state.current().ctm;
                self.state.current_mut().ctm = local.multiply(&old_ctm);
                self.ops.push(Operation::StateChange { operator: operator.clone() });
            },

            Operator::BeginText => {
                self.in_text_object = true;
                self.state.current_mut().text_matrix = Matrix::identity();
                self.state.current_mut().text_line_matrix = Matrix::identity();
                self.ops.push(Operation::StateChange { operator: operator.clone() });
            },
            Operator::EndText => {
                self.in_text_object = false;
                let gs = self.state.current_mut();
                gs.char_space = 0.0;
                gs.word_space = 0.0;
                gs.horizontal_scaling = 100.0;
                gs.leading = 0.0;
                gs.font_name = None;
                gs.text_rise = 0.0;
                gs.render_mode = 0;
                self.ops.push(Operation::StateChange { operator: operator.clone() });
            },

            Operator::Tc { char_space } => {
                self.state.current_mut().char_space = *char_space;
                self.ops.push(Operation::StateChange { operator: operator.clone() });
            },
            Operator::Tw { word_space } => {
                self.state.current_mut().word_space = *word_space;
                self.ops.push(Operation::StateChange { operator: operator.clone() });
            },
            Operator::Tz { scale } => {
                self.state.current_mut().horizontal_scaling = *scale;
                self.ops.push(Operation::StateChange { operator: operator.clone() });
            },
            Operator::TL { leading } => {
                self.state.current_mut().leading = *leading;
                self.ops.push(Operation::StateChange { operator: operator.clone() });
            },
            Operator::Tf { font, size } => {
                self.state.current_mut().font_name = Some(font.clone());
                self.state.current_mut().font_size = *size;
                self.ops.push(Operation::StateChange { operator: operator.clone() });
            },
            Operator::Tr { render } => {
                self.state.current_mut().render_mode = *render;
                self.ops.push(Operation::StateChange { operator: operator.clone() });
            },
            Operator::Ts { rise } => {
                self.state.current_mut().text_rise = *rise;
                self.ops.push(Operation::StateChange { operator: operator.clone() });
            },

            Operator::Td { tx, ty } => {
                self.apply_line_translation(*tx, *ty);
                self.ops.push(Operation::StateChange { operator: operator.clone() });
            },
            Operator::TD { tx, ty } => {
                self.state.current_mut().leading = -*ty;
                self.apply_line_translation(*tx, *ty);
                self.ops.push(Operation::StateChange { operator: operator.clone() });
            },
            Operator::Tm { a, b, c, d, e, f } => {
                let m = Matrix { a: *a, b: *b, c: *c, d: *d, e: *e, f: *f };
                self.state.current_mut().text_line_matrix = m;
                self.state.current_mut().text_matrix = m;
                self.ops.push(Operation::StateChange { operator: operator.clone() });
            },
            Operator::TStar => {
                let leading = self.state.current().leading;
                self.apply_line_translation(0.0, -leading);
                self.ops.push(Operation::StateChange { operator: operator.clone() });
            },

            Operator::Tj { text } => {
                self.show_text(operator.clone(), &[ShowPiece::Bytes(text)]);
            },
            Operator::TJ { array } => {
                let pieces: Vec<ShowPiece<'_>> = array
                    .iter()
                    .map(|el| match el {
                        TextElement::String(bytes) => ShowPiece::Bytes(bytes),
                        TextElement::Offset(n) => ShowPiece::Adjustment(*n as f64),
                    })
                    .collect();
                self.show_text(operator.clone(), &pieces);
            },
            Operator::Quote { text } => {
                let leading = self.state.current().leading;
                self.apply_line_translation(0.0, -leading);
                self.show_text(operator.clone(), &[ShowPiece::Bytes(text)]);
            },
            Operator::DoubleQuote { word_space, char_space, text } => {
                self.state.current_mut().word_space = *word_space;
                self.state.current_mut().char_space = *char_space;
                let leading = self.state.current().leading;
                self.apply_line_translation(0.0, -leading);
                self.show_text(operator.clone(), &[ShowPiece::Bytes(text)]);
            },

            Operator::MoveTo { x, y } => {
                self.current_point = (*x, *y);
                self.subpath_start = (*x, *y);
                self.extend_path_bbox(&[(*x, *y)]);
                self.path_segments.push(operator.clone());
            },
            Operator::LineTo { x, y } => {
                self.current_point = (*x, *y);
                self.extend_path_bbox(&[(*x, *y)]);
                self.path_segments.push(operator.clone());
            },
            Operator::CurveTo { x1, y1, x2, y2, x3, y3 } => {
                self.extend_path_bbox(&[(*x1, *y1), (*x2, *y2), (*x3, *y3)]);
                self.current_point = (*x3, *y3);
                self.path_segments.push(operator.clone());
            },
            Operator::CurveToV { x2, y2, x3, y3 } => {
                self.extend_path_bbox(&[(*x2, *y2), (*x3, *y3)]);
                self.current_point = (*x3, *y3);
                self.path_segments.push(operator.clone());
            },
            Operator::CurveToY { x1, y1, x3, y3 } => {
                self.extend_path_bbox(&[(*x1, *y1), (*x3, *y3)]);
                self.current_point = (*x3, *y3);
                self.path_segments.push(operator.clone());
            },
            Operator::ClosePath => {
                self.current_point = self.subpath_start;
                self.path_segments.push(operator.clone());
            },
            Operator::Rectangle { x, y, width, height } => {
                self.extend_path_bbox(&[
                    (*x, *y),
                    (*x + *width, *y),
                    (*x, *y + *height),
                    (*x + *width, *y + *height),
                ]);
                self.current_point = (*x, *y);
                self.subpath_start = (*x, *y);
                self.path_segments.push(operator.clone());
            },

            Operator::ClipNonZero | Operator::ClipEvenOdd => {
                self.path_clip = Some(operator.clone());
            },

            Operator::Stroke
            | Operator::Fill
            | Operator::FillEvenOdd
            | Operator::CloseFillStroke
            | Operator::EndPath => {
                self.finish_path(operator.clone());
            },
            Operator::Other { name, .. } if OTHER_PAINT_OPS.contains(&name.as_str()) => {
                self.finish_path(operator.clone());
            },

            Operator::Do { name } => {
                let subtype = self.page.xobject_subtype(name)?;
                if subtype.as_deref() == Some("Image") {
                    let ctm = self.state.current().ctm;
                    let corners = [
                        ctm.transform_point(0.0, 0.0),
                        ctm.transform_point(1.0, 0.0),
                        ctm.transform_point(0.0, 1.0),
                        ctm.transform_point(1.0, 1.0),
                    ];
                    let mut bbox = Rect::point(corners[0].x as f64, corners[0].y as f64);
                    for corner in &corners[1..] {
                        bbox = bbox.union_point(corner.x as f64, corner.y as f64);
                    }
                    self.ops.push(Operation::Image {
                        operator: operator.clone(),
                        placement_matrix: ctm,
                        bbox: if self.in_artifact() { None } else { Some(bbox) },
                    });
                } else {
                    // Form XObjects (and unresolvable resource names) are
                    // opaque: this engine does not recurse into a form's own
                    // content stream, so it cannot claim a bbox for what the
                    // form might paint. Keeping it as a state change (never
                    // filtered) is the safe default.
                    self.ops.push(Operation::StateChange { operator: operator.clone() });
                }
            },

            Operator::BeginMarkedContent { tag } | Operator::BeginMarkedContentDict { tag, .. } => {
                self.marked_content.push(tag == "Artifact" || self.in_artifact());
                self.ops.push(Operation::StateChange { operator: operator.clone() });
            },
            Operator::EndMarkedContent => {
                self.marked_content.pop();
                self.ops.push(Operation::StateChange { operator: operator.clone() });
            },

            // Everything else the tokenizer recognizes but this engine has
            // no special handling for: preserved faithfully as a state
            // change. Covers line style, color, clipping intent outside a
            // path, ExtGState, shading, and compatibility operators.
            _ => {
                self.ops.push(Operation::StateChange { operator: operator.clone() });
            },
        }

        Ok(())
    }

    /// Whether `operator` is a text-positioning or text-showing operator
    /// encountered outside a `BT`/`ET` pair, which spec treats as a
    /// structural error: recorded, but the operator is preserved unchanged
    /// rather than interpreted against undefined state.
    fn is_out_of_context_text_op(&self, operator: &Operator) -> bool {
        if self.in_text_object {
            return false;
        }
        matches!(
            operator,
            Operator::Td { .. }
                | Operator::TD { .. }
                | Operator::Tm { .. }
                | Operator::TStar
                | Operator::Tj { .. }
                | Operator::TJ { .. }
                | Operator::Quote { .. }
                | Operator::DoubleQuote { .. }
        )
    }

    /// `Td`-style line-matrix update: `Tlm' = translate(tx, ty) × Tlm`,
    /// `Tm' = Tlm'` (applying the translation first, the existing line
    /// matrix second, per this crate's verified `Matrix::multiply` order).
    fn apply_line_translation(&mut self, tx: f32, ty: f32) {
        let translate = Matrix::translation(tx, ty);
        let old_tlm = self.state.current().text_line_matrix;
        let new_tlm = translate.multiply(&old_tlm);
        self.state.current_mut().text_line_matrix = new_tlm;
        self.state.current_mut().text_matrix = new_tlm;
    }

    fn extend_path_bbox(&mut self, points: &[(f32, f32)]) {
        let ctm = self.state.current().ctm;
        for &(x, y) in points {
            let p = ctm.transform_point(x, y);
            self.path_bbox = Some(match self.path_bbox {
                Some(bbox) => bbox.union_point(p.x as f64, p.y as f64),
                None => Rect::point(p.x as f64, p.y as f64),
            });
        }
    }

    fn finish_path(&mut self, paint: Operator) {
        let run = PathRun {
            segments: std::mem::take(&mut self.path_segments),
            clip: self.path_clip.take(),
            paint,
        };
        // A path inside an /Artifact span (e.g. this engine's own
        // confirmation mark) is page furniture: keep the geometry in the
        // builder's output but never let it carry a bbox, so a later
        // redact_area call over the same region can never treat it as
        // removable content.
        let bbox = if self.in_artifact() { None } else { self.path_bbox.take() };
        self.path_bbox = None;
        self.ops.push(Operation::Path { run, bbox });
    }

    fn show_text(&mut self, operator: Operator, pieces: &[ShowPiece<'_>]) {
        let gs = self.state.current().clone();
        let font_name = gs.font_name.clone();
        let metrics = match &font_name {
            Some(name) => match self.fonts.metrics_for(self.page, name) {
                Ok(m) => m,
                Err(e) => {
                    log::warn!(
                        target: "pdf_oxide::redact::parser",
                        "font '{name}' failed to resolve ({e}); using conservative fallback"
                    );
                    conservative_default(false)
                },
            },
            None => {
                log::warn!(
                    target: "pdf_oxide::redact::parser",
                    "text shown with no font selected; using conservative fallback"
                );
                conservative_default(false)
            },
        };

        let text_state = TextState {
            char_spacing: gs.char_space as f64,
            word_spacing: gs.word_space as f64,
            horizontal_scale: gs.horizontal_scaling as f64 / 100.0,
            leading: gs.leading as f64,
            font_size: gs.font_size as f64,
            render_mode: gs.render_mode as i32,
            rise: gs.text_rise as f64,
        };

        let (bbox, advance) =
            TextBoundsCalculator::measure(pieces, &text_state, &metrics, &gs.text_matrix, &gs.ctm);
        let effective_matrix = gs.text_matrix.multiply(&gs.ctm);

        self.ops.push(Operation::Text {
            operator,
            font: font_name,
            font_size: gs.font_size,
            effective_matrix,
            bbox: if self.in_artifact() { None } else { Some(bbox) },
        });

        let translate = Matrix::translation(advance as f32, 0.0);
        let new_tm = translate.multiply(&gs.text_matrix);
        self.state.current_mut().text_matrix = new_tm;
    }

    fn finish(self) -> Result<Vec<Operation>> {
        if self.state.depth() != 1 {
            return Err(RedactError::UnbalancedState {
                reason: format!("{} unmatched 'q' at end of content stream", self.state.depth() - 1),
            }
            .into());
        }
        if self.in_text_object {
            return Err(RedactError::UnbalancedState {
                reason: "content stream ended inside an unterminated BT/ET block".to_string(),
            }
            .into());
        }
        Ok(self.ops)
    }
}
