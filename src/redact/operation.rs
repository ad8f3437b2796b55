//! The typed operation list a content stream is parsed into.
//!
//! An [`Operation`] is the unit the redaction engine filters on: every
//! drawing operator that can cover area on the page carries a `bbox`, and
//! everything else (state changes, unrecognized tokens) carries `None` and is
//! always kept.

use crate::content::operators::Operator;
use crate::content::graphics_state::Matrix;

/// Axis-aligned rectangle in PDF user-space points, bottom-left origin.
///
/// Distinct from [`crate::geometry::Rect`], which is a top-left,
/// width/height rectangle used by the rest of the crate for pixel-space
/// layout analysis. The two are never interchanged; [`crate::redact::coords`]
/// is the only bridge between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Minimum x coordinate
    pub x_min: f64,
    /// Minimum y coordinate
    pub y_min: f64,
    /// Maximum x coordinate
    pub x_max: f64,
    /// Maximum y coordinate
    pub y_max: f64,
}

impl Rect {
    /// Build a rectangle from two arbitrary corners, normalizing min/max.
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x_min: x0.min(x1),
            y_min: y0.min(y1),
            x_max: x0.max(x1),
            y_max: y0.max(y1),
        }
    }

    /// Extend this rectangle to cover `other` as well.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    /// Extend this rectangle to also cover a point.
    pub fn union_point(&self, x: f64, y: f64) -> Rect {
        Rect {
            x_min: self.x_min.min(x),
            y_min: self.y_min.min(y),
            x_max: self.x_max.max(x),
            y_max: self.y_max.max(y),
        }
    }

    /// A single point as a degenerate rectangle, the seed for a running union.
    pub fn point(x: f64, y: f64) -> Self {
        Rect { x_min: x, y_min: y, x_max: x, y_max: y }
    }

    /// Four-inequality AABB overlap test. Touching edges do not count as an
    /// intersection, so content directly adjacent to a redaction region is
    /// never swept in by accident.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x_min < other.x_max
            && self.x_max > other.x_min
            && self.y_min < other.y_max
            && self.y_max > other.y_min
    }
}

/// A fully-constructed path, buffered from its construction operators up to
/// (and including) the painting operator that ends it.
#[derive(Debug, Clone)]
pub struct PathRun {
    /// Construction operators (`m`, `l`, `c`, `v`, `y`, `re`, `h`), in order.
    pub segments: Vec<Operator>,
    /// An optional `W`/`W*` clip-intent operator observed before painting.
    pub clip: Option<Operator>,
    /// The operator that ended the path (`S`, `s`, `f`, `F`, `f*`, `B`, `B*`,
    /// `b`, `b*`, or `n`).
    pub paint: Operator,
}

/// One entry of the content-stream operation list.
///
/// This is a tagged union, not a trait hierarchy: filtering is an exhaustive
/// match, and passthrough of operators the engine does not otherwise act on
/// is a single catch-all arm rather than a virtual no-op method.
#[derive(Debug, Clone)]
pub enum Operation {
    /// A single text-showing operator (`Tj`, `TJ`, `'`, `"`).
    Text {
        /// The original operator, preserved so the builder can re-emit the
        /// exact operator kind (kerning arrays in `TJ` are never flattened).
        operator: Operator,
        /// Font name active when this operator ran, if any was set.
        font: Option<String>,
        /// Font size active when this operator ran.
        font_size: f32,
        /// `Tm × CTM` at the time the glyphs were shown.
        effective_matrix: Matrix,
        /// Axis-aligned bounding box of the rendered glyphs in PDF points.
        bbox: Option<Rect>,
    },
    /// A complete path: its construction operators plus the operator that
    /// painted or discarded it.
    Path {
        /// The buffered construction + paint operators.
        run: PathRun,
        /// Axis-aligned bounding box of the path's control points, under the
        /// CTM in effect while it was built.
        bbox: Option<Rect>,
    },
    /// An XObject invocation (`Do`) that names an Image XObject.
    Image {
        /// The original `Do` operator.
        operator: Operator,
        /// CTM at the time of invocation; an image XObject is always placed
        /// in the unit square under this matrix.
        placement_matrix: Matrix,
        /// Transformed unit-square bounding box.
        bbox: Option<Rect>,
    },
    /// Any operator that changes interpreter state but has no geometry of
    /// its own: color, font, CTM, save/restore, text positioning, BT/ET,
    /// marked content, `Do` of a non-image XObject, and anything else the
    /// parser recognized but does not compute a bbox for.
    StateChange {
        /// The original operator.
        operator: Operator,
    },
    /// A token the tokenizer could not interpret as a known operator or
    /// operand, preserved verbatim so the builder reproduces it unchanged.
    Unknown {
        /// Raw bytes of the unrecognized segment.
        raw_bytes: Vec<u8>,
    },
}

impl Operation {
    /// The bbox this operation claims, if any. `None` means "always kept."
    pub fn bbox(&self) -> Option<Rect> {
        match self {
            Operation::Text { bbox, .. } => *bbox,
            Operation::Path { bbox, .. } => *bbox,
            Operation::Image { bbox, .. } => *bbox,
            Operation::StateChange { .. } | Operation::Unknown { .. } => None,
        }
    }

    /// Whether this operation should be removed for a given redaction
    /// region: it has a bbox, and that bbox intersects the region.
    pub fn intersects_region(&self, region: &Rect) -> bool {
        self.bbox().is_some_and(|b| b.intersects(region))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_intersects_overlapping() {
        let a = Rect::from_corners(0.0, 0.0, 100.0, 100.0);
        let b = Rect::from_corners(50.0, 50.0, 150.0, 150.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn rect_touching_is_not_intersecting() {
        let a = Rect::from_corners(0.0, 0.0, 100.0, 100.0);
        let b = Rect::from_corners(100.0, 0.0, 200.0, 100.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn rect_union_covers_both() {
        let a = Rect::from_corners(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_corners(20.0, 20.0, 30.0, 30.0);
        let u = a.union(&b);
        assert_eq!(u.x_min, 0.0);
        assert_eq!(u.y_max, 30.0);
    }

    #[test]
    fn state_change_has_no_bbox_and_is_never_removed() {
        let op = Operation::StateChange { operator: Operator::SaveState };
        let region = Rect::from_corners(0.0, 0.0, 1000.0, 1000.0);
        assert!(!op.intersects_region(&region));
    }
}
