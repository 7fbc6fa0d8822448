//! Abstract 2D drawing surface.

use kurbo::{Affine, BezPath, Point, Rect, Stroke};
use notesketch_core::element::TextAlign;
use notesketch_core::text::{FontSpec, TextMeasure};
use peniko::Color;

/// Drawing target for [`crate::SketchRenderer`].
///
/// Any immediate-mode 2D API fits: an HTML canvas, Skia, Cairo, a GPU
/// scene builder. Coordinates passed to every call are in the space of the
/// current transform.
pub trait Surface: TextMeasure {
    /// Replace the current transform.
    fn set_transform(&mut self, transform: Affine);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_path(&mut self, path: &BezPath, style: &Stroke, color: Color);

    fn fill_path(&mut self, path: &BezPath, color: Color);

    /// Intersect the clip region with `path` until the matching pop.
    fn push_clip(&mut self, path: &BezPath);

    fn pop_clip(&mut self);

    /// Draw one line of text with its top edge at `anchor.y`. `anchor.x`
    /// is the left edge, center or right edge depending on `align`.
    fn fill_text(&mut self, text: &str, anchor: Point, align: TextAlign, font: &FontSpec, color: Color);
}
