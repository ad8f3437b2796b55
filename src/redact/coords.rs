//! Bidirectional mapping between caller pixels and PDF user-space points.
//!
//! Two frames: **Pixel** (origin top-left, +x right, +y down, unit = pixels
//! at a caller-supplied DPI) and **PDFPoint** (origin bottom-left, +x right,
//! +y up, unit = 1/72 inch — [`crate::redact::operation::Rect`]'s
//! convention). Page rotation (0/90/180/270) applies an orthogonal transform
//! between the *displayed* frame a pixel region is drawn against and the
//! page's own intrinsic content-stream frame, which is what
//! [`crate::redact::parser`] computes bounding boxes in.

use crate::redact::operation::Rect;

/// A caller-supplied region, top-left origin, in pixels at some DPI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    /// Distance from the left edge of the page bitmap.
    pub x: f64,
    /// Distance from the top edge of the page bitmap.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl PixelRect {
    /// Construct a pixel-space rectangle from its top-left corner and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// Converts between [`PixelRect`]/pixel points and [`Rect`]/PDFPoint points
/// for a page of a given intrinsic (unrotated) MediaBox size and rotation.
pub struct CoordinateConverter;

impl CoordinateConverter {
    /// Convert a pixel-space redaction region into PDFPoint, in the page's
    /// intrinsic content-stream coordinate frame (i.e. the frame
    /// [`crate::redact::parser::ContentStreamParser`] computes bounding
    /// boxes in, which is unaffected by `/Rotate` — rotation only changes
    /// how a viewer displays that content).
    pub fn pixel_rect_to_pdf(
        region: PixelRect,
        page_width: f64,
        page_height: f64,
        rotation: i32,
        dpi: f64,
    ) -> Rect {
        let scale = 72.0 / dpi;
        let (_, displayed_height) = displayed_dimensions(page_width, page_height, rotation);

        let disp_x0 = region.x * scale;
        let disp_x1 = disp_x0 + region.width * scale;
        let disp_y0 = displayed_height - (region.y + region.height) * scale;
        let disp_y1 = displayed_height - region.y * scale;

        let (x0, y0) = inverse_rotate(disp_x0, disp_y0, page_width, page_height, rotation);
        let (x1, y1) = inverse_rotate(disp_x1, disp_y1, page_width, page_height, rotation);

        Rect::from_corners(x0, y0, x1, y1)
    }

    /// Convert a single pixel point (top-left origin) to a PDFPoint point in
    /// the page's intrinsic content frame.
    pub fn pixel_point_to_pdf_point(
        px: f64,
        py: f64,
        page_width: f64,
        page_height: f64,
        rotation: i32,
        dpi: f64,
    ) -> (f64, f64) {
        let scale = 72.0 / dpi;
        let (_, displayed_height) = displayed_dimensions(page_width, page_height, rotation);
        let disp_x = px * scale;
        let disp_y = displayed_height - py * scale;
        inverse_rotate(disp_x, disp_y, page_width, page_height, rotation)
    }

    /// The exact inverse of [`Self::pixel_point_to_pdf_point`]: given a
    /// point in the page's intrinsic content frame, the pixel coordinates a
    /// caller would need to click to land on it.
    pub fn pdf_point_to_pixel_point(
        x: f64,
        y: f64,
        page_width: f64,
        page_height: f64,
        rotation: i32,
        dpi: f64,
    ) -> (f64, f64) {
        let scale = 72.0 / dpi;
        let (_, displayed_height) = displayed_dimensions(page_width, page_height, rotation);
        let (disp_x, disp_y) = forward_rotate(x, y, page_width, page_height, rotation);
        let px = disp_x / scale;
        let py = (displayed_height - disp_y) / scale;
        (px, py)
    }
}

/// Size, in points, of the canvas a viewer displays for a page of intrinsic
/// size `(w, h)` under `rotation`: unchanged for 0/180, swapped for 90/270.
fn displayed_dimensions(w: f64, h: f64, rotation: i32) -> (f64, f64) {
    match normalize(rotation) {
        90 | 270 => (h, w),
        _ => (w, h),
    }
}

/// Maps a point in the page's intrinsic content frame (bottom-left origin,
/// bounds `[0, w] x [0, h]`) to the frame a viewer displays after rotating
/// the content clockwise by `rotation` degrees.
fn forward_rotate(x: f64, y: f64, w: f64, h: f64, rotation: i32) -> (f64, f64) {
    match normalize(rotation) {
        90 => (y, w - x),
        180 => (w - x, h - y),
        270 => (h - y, x),
        _ => (x, y),
    }
}

/// The inverse of [`forward_rotate`]: maps a point in the displayed frame
/// back to the page's intrinsic content frame.
fn inverse_rotate(x: f64, y: f64, w: f64, h: f64, rotation: i32) -> (f64, f64) {
    match normalize(rotation) {
        90 => (w - y, x),
        180 => (w - x, h - y),
        270 => (y, h - x),
        _ => (x, y),
    }
}

/// Reduce a rotation to one of `{0, 90, 180, 270}`, tolerating negative or
/// out-of-range input the way [`crate::redact::page::PageHandle::rotation`]
/// already normalizes `/Rotate`.
fn normalize(rotation: i32) -> i32 {
    ((rotation % 360) + 360) % 360
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrotated_round_trip() {
        let (w, h) = (612.0, 792.0);
        for dpi in [72.0, 150.0, 300.0] {
            let (px, py) = (123.4, 456.7);
            let (x, y) = CoordinateConverter::pixel_point_to_pdf_point(px, py, w, h, 0, dpi);
            let (px2, py2) = CoordinateConverter::pdf_point_to_pixel_point(x, y, w, h, 0, dpi);
            assert!((px - px2).abs() < 0.01, "dpi={dpi}");
            assert!((py - py2).abs() < 0.01, "dpi={dpi}");
        }
    }

    #[test]
    fn rotated_round_trip_all_angles() {
        let (w, h) = (612.0, 792.0);
        for rotation in [0, 90, 180, 270] {
            let (px, py) = (200.0, 300.0);
            let (x, y) = CoordinateConverter::pixel_point_to_pdf_point(px, py, w, h, rotation, 150.0);
            let (px2, py2) =
                CoordinateConverter::pdf_point_to_pixel_point(x, y, w, h, rotation, 150.0);
            assert!((px - px2).abs() < 0.01, "rotation={rotation}");
            assert!((py - py2).abs() < 0.01, "rotation={rotation}");
        }
    }

    #[test]
    fn unrotated_origin_maps_to_top_left_becomes_bottom_left() {
        // Top-left pixel corner (0,0) is the top of the page: PDF y should
        // come out near the MediaBox height.
        let rect = PixelRect::new(0.0, 0.0, 72.0, 72.0);
        let region = CoordinateConverter::pixel_rect_to_pdf(rect, 612.0, 792.0, 0, 72.0);
        assert!((region.y_max - 792.0).abs() < 1e-9);
        assert!((region.x_min - 0.0).abs() < 1e-9);
    }

    #[test]
    fn dpi_invariance_for_same_physical_region() {
        // A physical region of 1in x 1in starting 1in from the top-left,
        // expressed at different DPIs, must resolve to the same PDF rect.
        let page = (612.0, 792.0);
        let mut results = Vec::new();
        for dpi in [72.0, 150.0, 300.0] {
            let rect = PixelRect::new(dpi, dpi, dpi, dpi);
            results.push(CoordinateConverter::pixel_rect_to_pdf(rect, page.0, page.1, 0, dpi));
        }
        for pair in results.windows(2) {
            assert!((pair[0].x_min - pair[1].x_min).abs() < 1e-6);
            assert!((pair[0].y_min - pair[1].y_min).abs() < 1e-6);
            assert!((pair[0].x_max - pair[1].x_max).abs() < 1e-6);
            assert!((pair[0].y_max - pair[1].y_max).abs() < 1e-6);
        }
    }

    #[test]
    fn rotation_90_maps_displayed_top_left_to_content_origin() {
        // A page is displayed by rotating its content clockwise by
        // /Rotate degrees. Rotating a sheet clockwise 90 moves its
        // content bottom-left corner to the displayed top-left: a pixel
        // region pinned to the displayed top-left corner must resolve
        // near the content frame's origin, not its top-left.
        let rect = PixelRect::new(0.0, 0.0, 10.0, 10.0);
        let region = CoordinateConverter::pixel_rect_to_pdf(rect, 612.0, 792.0, 90, 72.0);
        assert!(region.x_min >= 0.0 && region.x_max <= 20.0);
        assert!(region.y_min >= 0.0 && region.y_max <= 20.0);
    }

    #[test]
    fn rotation_90_and_270_are_mutual_inverses() {
        let (w, h) = (612.0, 792.0);
        let (x, y) = (300.0, 400.0);
        let (disp_x, disp_y) = forward_rotate(x, y, w, h, 90);
        let (back_x, back_y) = inverse_rotate(disp_x, disp_y, w, h, 90);
        assert!((x - back_x).abs() < 1e-9);
        assert!((y - back_y).abs() < 1e-9);

        let (disp_x, disp_y) = forward_rotate(x, y, w, h, 270);
        let (back_x, back_y) = inverse_rotate(disp_x, disp_y, w, h, 270);
        assert!((x - back_x).abs() < 1e-9);
        assert!((y - back_y).abs() < 1e-9);
    }
}
