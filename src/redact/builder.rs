//! Re-serializes a filtered [`Operation`] list back into content-stream
//! bytes.
//!
//! The input is the subset of operations [`crate::redact::engine`] decided
//! to keep, in their original relative order. This module's only
//! responsibilities are: (1) emit each survivor as valid content-stream
//! syntax, faithfully preserving the operator it was parsed from (`Tj` stays
//! `Tj`, `'` stays `'`, kerning arrays in `TJ` are never flattened), and (2)
//! elide a `BT`…`ET` text object entirely if every `Text` operation inside it
//! was filtered out, since an empty text object with leftover `Tf`/`Td`
//! state-setters has no observable effect and spec.md §4.6 asks for the
//! whole group to disappear rather than leaving dead state-setters behind.
//!
//! `q`/`Q` balance needs no special handling here: [`crate::redact::parser`]
//! never gives `Operation::StateChange` a bbox, so save/restore operators
//! are never candidates for removal and the original nesting survives
//! unchanged.

use crate::content::operators::{Operator, TextElement};
use crate::error::Result;
use crate::object::Object;
use crate::redact::operation::Operation;
use crate::writer::ObjectSerializer;

/// Serializes a kept-operation list into a content-stream byte buffer.
pub struct ContentStreamBuilder;

impl ContentStreamBuilder {
    /// Build content-stream bytes for `ops`, in order. One operator per
    /// line (LF-terminated), a single space between tokens within a line.
    pub fn build(ops: &[Operation]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for group in Self::group_text_objects(ops) {
            match group {
                Group::Plain(op) => Self::write_operation(&mut out, op),
                Group::TextObject(inner) => {
                    if inner.iter().any(|op| matches!(op, Operation::Text { .. })) {
                        for op in inner {
                            Self::write_operation(&mut out, op);
                        }
                    }
                    // Every Text op inside was filtered: the whole BT..ET
                    // group (including its begin/end markers and any
                    // leftover Tf/Td state-setters) is dropped.
                },
            }
        }
        Ok(out)
    }

    /// Partition `ops` into top-level items, pairing a `BeginText`
    /// `StateChange` with its matching `EndText` and everything between
    /// them into a single [`Group::TextObject`]. PDF text objects never
    /// nest, so a single linear scan suffices.
    fn group_text_objects(ops: &[Operation]) -> Vec<Group<'_>> {
        let mut groups = Vec::new();
        let mut i = 0;
        while i < ops.len() {
            if matches!(&ops[i], Operation::StateChange { operator: Operator::BeginText }) {
                let start = i;
                let mut j = i + 1;
                while j < ops.len()
                    && !matches!(&ops[j], Operation::StateChange { operator: Operator::EndText })
                {
                    j += 1;
                }
                // `j` is either the matching EndText or ops.len() (an
                // unterminated object, which the parser's balance check
                // already rejects before this code runs — included only so
                // this function never panics on malformed input).
                let end = (j + 1).min(ops.len());
                groups.push(Group::TextObject(&ops[start..end]));
                i = end;
            } else {
                groups.push(Group::Plain(&ops[i]));
                i += 1;
            }
        }
        groups
    }

    fn write_operation(out: &mut Vec<u8>, op: &Operation) {
        match op {
            Operation::Text { operator, .. } => write_operator(out, operator),
            Operation::Path { run, .. } => {
                for seg in &run.segments {
                    write_operator(out, seg);
                }
                if let Some(clip) = &run.clip {
                    write_operator(out, clip);
                }
                write_operator(out, &run.paint);
            },
            Operation::Image { operator, .. } => write_operator(out, operator),
            Operation::StateChange { operator } => write_operator(out, operator),
            Operation::Unknown { raw_bytes } => out.extend_from_slice(raw_bytes),
        }
    }
}

enum Group<'a> {
    Plain(&'a Operation),
    TextObject(&'a [Operation]),
}

/// Write one operator as a content-stream line: operands, a space, the
/// operator keyword, then a newline.
fn write_operator(out: &mut Vec<u8>, op: &Operator) {
    match op {
        Operator::Td { tx, ty } => line(out, vec![num(*tx), num(*ty)], "Td"),
        Operator::TD { tx, ty } => line(out, vec![num(*tx), num(*ty)], "TD"),
        Operator::Tm { a, b, c, d, e, f } => {
            line(out, vec![num(*a), num(*b), num(*c), num(*d), num(*e), num(*f)], "Tm")
        },
        Operator::TStar => line(out, vec![], "T*"),

        Operator::Tj { text } => line(out, vec![pdf_string(text)], "Tj"),
        Operator::TJ { array } => line(out, vec![tj_array(array)], "TJ"),
        Operator::Quote { text } => line(out, vec![pdf_string(text)], "'"),
        Operator::DoubleQuote { word_space, char_space, text } => {
            line(out, vec![num(*word_space), num(*char_space), pdf_string(text)], "\"")
        },

        Operator::Tc { char_space } => line(out, vec![num(*char_space)], "Tc"),
        Operator::Tw { word_space } => line(out, vec![num(*word_space)], "Tw"),
        Operator::Tz { scale } => line(out, vec![num(*scale)], "Tz"),
        Operator::TL { leading } => line(out, vec![num(*leading)], "TL"),
        Operator::Tf { font, size } => line(out, vec![pdf_name(font), num(*size)], "Tf"),
        Operator::Tr { render } => line(out, vec![render.to_string()], "Tr"),
        Operator::Ts { rise } => line(out, vec![num(*rise)], "Ts"),

        Operator::SaveState => line(out, vec![], "q"),
        Operator::RestoreState => line(out, vec![], "Q"),
        Operator::Cm { a, b, c, d, e, f } => {
            line(out, vec![num(*a), num(*b), num(*c), num(*d), num(*e), num(*f)], "cm")
        },

        Operator::SetFillRgb { r, g, b } => line(out, vec![num(*r), num(*g), num(*b)], "rg"),
        Operator::SetStrokeRgb { r, g, b } => line(out, vec![num(*r), num(*g), num(*b)], "RG"),
        Operator::SetFillGray { gray } => line(out, vec![num(*gray)], "g"),
        Operator::SetStrokeGray { gray } => line(out, vec![num(*gray)], "G"),
        Operator::SetFillCmyk { c, m, y, k } => {
            line(out, vec![num(*c), num(*m), num(*y), num(*k)], "k")
        },
        Operator::SetStrokeCmyk { c, m, y, k } => {
            line(out, vec![num(*c), num(*m), num(*y), num(*k)], "K")
        },
        Operator::SetFillColorSpace { name } => line(out, vec![pdf_name(name)], "cs"),
        Operator::SetStrokeColorSpace { name } => line(out, vec![pdf_name(name)], "CS"),
        Operator::SetFillColor { components } => line(out, nums(components), "sc"),
        Operator::SetStrokeColor { components } => line(out, nums(components), "SC"),
        Operator::SetFillColorN { components, name } => {
            let mut tokens = nums(components);
            if let Some(name) = name {
                tokens.push(pdf_name(name));
            }
            line(out, tokens, "scn")
        },
        Operator::SetStrokeColorN { components, name } => {
            let mut tokens = nums(components);
            if let Some(name) = name {
                tokens.push(pdf_name(name));
            }
            line(out, tokens, "SCN")
        },

        Operator::BeginText => line(out, vec![], "BT"),
        Operator::EndText => line(out, vec![], "ET"),

        Operator::Do { name } => line(out, vec![pdf_name(name)], "Do"),

        Operator::MoveTo { x, y } => line(out, vec![num(*x), num(*y)], "m"),
        Operator::LineTo { x, y } => line(out, vec![num(*x), num(*y)], "l"),
        Operator::CurveTo { x1, y1, x2, y2, x3, y3 } => {
            line(out, vec![num(*x1), num(*y1), num(*x2), num(*y2), num(*x3), num(*y3)], "c")
        },
        Operator::CurveToV { x2, y2, x3, y3 } => {
            line(out, vec![num(*x2), num(*y2), num(*x3), num(*y3)], "v")
        },
        Operator::CurveToY { x1, y1, x3, y3 } => {
            line(out, vec![num(*x1), num(*y1), num(*x3), num(*y3)], "y")
        },
        Operator::ClosePath => line(out, vec![], "h"),
        Operator::Rectangle { x, y, width, height } => {
            line(out, vec![num(*x), num(*y), num(*width), num(*height)], "re")
        },
        Operator::Stroke => line(out, vec![], "S"),
        Operator::Fill => line(out, vec![], "f"),
        Operator::FillEvenOdd => line(out, vec![], "f*"),
        Operator::CloseFillStroke => line(out, vec![], "b"),
        Operator::EndPath => line(out, vec![], "n"),
        Operator::ClipNonZero => line(out, vec![], "W"),
        Operator::ClipEvenOdd => line(out, vec![], "W*"),

        Operator::SetLineWidth { width } => line(out, vec![num(*width)], "w"),
        Operator::SetDash { array, phase } => {
            let arr = format!("[{}]", nums(array).join(" "));
            line(out, vec![arr, num(*phase)], "d")
        },
        Operator::SetLineCap { cap_style } => line(out, vec![cap_style.to_string()], "J"),
        Operator::SetLineJoin { join_style } => line(out, vec![join_style.to_string()], "j"),
        Operator::SetMiterLimit { limit } => line(out, vec![num(*limit)], "M"),
        Operator::SetRenderingIntent { intent } => line(out, vec![pdf_name(intent)], "ri"),
        Operator::SetFlatness { tolerance } => line(out, vec![num(*tolerance)], "i"),
        Operator::SetExtGState { dict_name } => line(out, vec![pdf_name(dict_name)], "gs"),
        Operator::PaintShading { name } => line(out, vec![pdf_name(name)], "sh"),

        Operator::InlineImage { .. } => {
            // The parser always preserves inline images as `Operation::Unknown`
            // (see `redact::parser::Interpreter::dispatch`), so a typed
            // `InlineImage` operator never reaches the builder in practice.
            log::warn!(
                target: "pdf_oxide::redact::builder",
                "inline image operator reached the builder directly; dropping it"
            );
        },

        Operator::BeginMarkedContent { tag } => line(out, vec![pdf_name(tag)], "BMC"),
        Operator::BeginMarkedContentDict { tag, properties } => {
            let props = ObjectSerializer::compact().serialize_to_string(properties);
            line(out, vec![pdf_name(tag), props], "BDC")
        },
        Operator::EndMarkedContent => line(out, vec![], "EMC"),

        Operator::Other { name, operands } => {
            let tokens: Vec<String> = operands
                .iter()
                .map(|o| ObjectSerializer::compact().serialize_to_string(o))
                .collect();
            line(out, tokens, name)
        },
    }
}

/// Append one content-stream line: operand tokens separated by single
/// spaces, then a space, the operator keyword, then `\n`.
fn line(out: &mut Vec<u8>, operands: Vec<String>, operator: &str) {
    for token in &operands {
        out.extend_from_slice(token.as_bytes());
        out.push(b' ');
    }
    out.extend_from_slice(operator.as_bytes());
    out.push(b'\n');
}

fn nums(values: &[f32]) -> Vec<String> {
    values.iter().map(|v| num(*v)).collect()
}

/// Format a number the way [`crate::writer::object_serializer`] formats
/// PDF reals: integers print bare, non-integers print with up to 5
/// decimals and trailing zeros trimmed.
fn num(value: f32) -> String {
    let value = value as f64;
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let formatted = format!("{:.5}", value);
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// `/Name` token.
fn pdf_name(name: &str) -> String {
    format!("/{name}")
}

/// A literal `(...)` or hex `<...>` string. The parsed [`Operator`]
/// variants only carry raw bytes, not which original form (literal vs hex)
/// produced them, so this always emits the literal form for printable ASCII
/// and falls back to hex for anything else — behaviorally identical to a
/// renderer, which treats the two forms as interchangeable.
fn pdf_string(bytes: &[u8]) -> String {
    let printable = bytes.iter().all(|&b| (0x20..=0x7e).contains(&b) || b == b'\n' || b == b'\r' || b == b'\t');
    if printable {
        let mut s = String::with_capacity(bytes.len() + 2);
        s.push('(');
        for &b in bytes {
            match b {
                b'(' | b')' | b'\\' => {
                    s.push('\\');
                    s.push(b as char);
                },
                _ => s.push(b as char),
            }
        }
        s.push(')');
        s
    } else {
        let mut s = String::with_capacity(bytes.len() * 2 + 2);
        s.push('<');
        for &b in bytes {
            s.push_str(&format!("{b:02X}"));
        }
        s.push('>');
        s
    }
}

/// A `TJ` array: `[ (str) -120 (str) ... ]`.
fn tj_array(elements: &[TextElement]) -> String {
    let mut s = String::from("[");
    for (i, el) in elements.iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        match el {
            TextElement::String(bytes) => s.push_str(&pdf_string(bytes)),
            TextElement::Offset(n) => s.push_str(&num(*n)),
        }
    }
    s.push(']');
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::graphics_state::Matrix;
    use crate::redact::operation::{PathRun, Rect};

    fn state_change(op: Operator) -> Operation {
        Operation::StateChange { operator: op }
    }

    #[test]
    fn plain_operators_round_trip_as_text() {
        let ops = vec![
            state_change(Operator::SaveState),
            state_change(Operator::Cm { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 10.0, f: 20.0 }),
            state_change(Operator::RestoreState),
        ];
        let bytes = ContentStreamBuilder::build(&ops).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "q\n1 0 0 1 10 20 cm\nQ\n");
    }

    #[test]
    fn empty_text_object_is_fully_elided() {
        let ops = vec![
            state_change(Operator::BeginText),
            state_change(Operator::Tf { font: "F1".to_string(), size: 12.0 }),
            state_change(Operator::Td { tx: 0.0, ty: 0.0 }),
            state_change(Operator::EndText),
        ];
        let bytes = ContentStreamBuilder::build(&ops).unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn text_object_with_surviving_text_is_kept_whole() {
        let ops = vec![
            state_change(Operator::BeginText),
            state_change(Operator::Tf { font: "F1".to_string(), size: 12.0 }),
            Operation::Text {
                operator: Operator::Tj { text: b"Public".to_vec() },
                font: Some("F1".to_string()),
                font_size: 12.0,
                effective_matrix: Matrix::identity(),
                bbox: Some(Rect::from_corners(0.0, 0.0, 10.0, 10.0)),
            },
            state_change(Operator::EndText),
        ];
        let bytes = ContentStreamBuilder::build(&ops).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "BT\n/F1 12 Tf\n(Public) Tj\nET\n");
    }

    #[test]
    fn path_run_emits_segments_then_paint() {
        let run = PathRun {
            segments: vec![
                Operator::MoveTo { x: 0.0, y: 0.0 },
                Operator::LineTo { x: 10.0, y: 0.0 },
            ],
            clip: None,
            paint: Operator::Stroke,
        };
        let ops = vec![Operation::Path { run, bbox: Some(Rect::from_corners(0.0, 0.0, 10.0, 0.0)) }];
        let bytes = ContentStreamBuilder::build(&ops).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "0 0 m\n10 0 l\nS\n");
    }

    #[test]
    fn unknown_bytes_pass_through_verbatim() {
        let ops = vec![Operation::Unknown { raw_bytes: b"BI\n/W 1 ID \x00\x01 EI\n".to_vec() }];
        let bytes = ContentStreamBuilder::build(&ops).unwrap();
        assert_eq!(bytes, b"BI\n/W 1 ID \x00\x01 EI\n");
    }

    #[test]
    fn number_formatting_trims_trailing_zeros() {
        assert_eq!(num(12.0), "12");
        assert_eq!(num(12.5), "12.5");
        assert_eq!(num(0.1), "0.1");
    }
}
