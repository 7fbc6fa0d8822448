//! Hand-drawn primitives.
//!
//! Every primitive appends jittered subpaths to a caller-owned [`BezPath`].
//! The jitter comes from a [`Prng`] the caller seeds per element, so the
//! same element always produces the same geometry.

use std::f64::consts::FRAC_PI_6;

use kurbo::{BezPath, Ellipse, Point, Rect, RoundedRect, Shape, Vec2};
use notesketch_core::element::{Element, ElementKind, FillStyle, Roundness};
use notesketch_core::geometry::bend_control_point;

use crate::prng::Prng;

/// Bezier approximation constant for a quarter ellipse.
const ELLIPSE_KAPPA: f64 = 0.55228;
/// Arrow head side length.
pub const ARROW_HEAD_LENGTH: f64 = 20.0;
/// Distance between hachure lines.
pub const HACHURE_GAP: f64 = 8.0;
/// Upper bound on hachure lines per direction.
pub const MAX_HACHURE_LINES: usize = 4096;
/// Flattening tolerance for outlines built from kurbo shapes.
const OUTLINE_TOLERANCE: f64 = 0.1;

/// Per-element stroke parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoughOptions {
    pub roughness: f64,
    pub roundness: Roundness,
}

impl RoughOptions {
    pub fn new(roughness: f64, roundness: Roundness) -> Self {
        Self { roughness, roundness }
    }

    pub fn sharp(roughness: f64) -> Self {
        Self::new(roughness, Roundness::Sharp)
    }

    fn with_sharp(self) -> Self {
        Self::sharp(self.roughness)
    }

    /// Number of passes a closed shape is stroked with.
    fn passes(&self) -> usize {
        if self.roughness == 0.0 { 1 } else { 2 }
    }
}

impl From<&Element> for RoughOptions {
    fn from(element: &Element) -> Self {
        Self::new(element.roughness, element.roundness)
    }
}

/// Generator of jittered paths.
pub struct RoughGenerator {
    prng: Prng,
}

impl RoughGenerator {
    pub fn new(prng: Prng) -> Self {
        Self { prng }
    }

    fn jitter(&mut self, roughness: f64) -> f64 {
        self.prng.jitter(roughness)
    }

    fn jittered(&mut self, point: Point, roughness: f64) -> Point {
        let x = point.x + self.jitter(roughness);
        let y = point.y + self.jitter(roughness);
        Point::new(x, y)
    }

    /// A line from `start` to `end`, bent through the connector control
    /// point when round. A second pass is added when roughness is positive.
    ///
    /// Segments shorter than one unit are skipped without consuming jitter.
    pub fn line(&mut self, path: &mut BezPath, start: Point, end: Point, options: RoughOptions) {
        if start.distance(end) < 1.0 {
            return;
        }
        let passes = if options.roughness > 0.0 { 2 } else { 1 };
        let control = bend_control_point(start, end);
        for _ in 0..passes {
            path.move_to(self.jittered(start, options.roughness));
            match options.roundness {
                Roundness::Round => {
                    let cp = self.jittered(control, options.roughness);
                    let to = self.jittered(end, options.roughness);
                    path.quad_to(cp, to);
                }
                Roundness::Sharp => path.line_to(self.jittered(end, options.roughness)),
            }
        }
    }

    /// Rectangle outline over `rect`, which may have negative extent.
    ///
    /// Sharp rectangles are four rough lines. Round rectangles trace straight
    /// sides joined by quadratic corners of radius `min(|w|, |h|) * 0.2`,
    /// with every point jittered.
    pub fn rectangle(&mut self, path: &mut BezPath, rect: Rect, options: RoughOptions) {
        match options.roundness {
            Roundness::Sharp => {
                let sides = [
                    (Point::new(rect.x0, rect.y0), Point::new(rect.x1, rect.y0)),
                    (Point::new(rect.x1, rect.y0), Point::new(rect.x1, rect.y1)),
                    (Point::new(rect.x1, rect.y1), Point::new(rect.x0, rect.y1)),
                    (Point::new(rect.x0, rect.y1), Point::new(rect.x0, rect.y0)),
                ];
                for (from, to) in sides {
                    self.line(path, from, to, options);
                }
            }
            Roundness::Round => {
                let r = rect.abs();
                let radius = r.width().min(r.height()) * 0.2;
                let corners = [
                    Point::new(r.x1, r.y0),
                    Point::new(r.x1, r.y1),
                    Point::new(r.x0, r.y1),
                    Point::new(r.x0, r.y0),
                ];
                let (start, segments) = rounded_polygon(&corners, radius);
                self.closed_rounded(path, start, &segments, options);
            }
        }
    }

    /// Diamond through the edge midpoints of `rect` (top, right, bottom,
    /// left). Round diamonds cut each vertex by `min(w, h) * 0.1`.
    pub fn diamond(&mut self, path: &mut BezPath, rect: Rect, options: RoughOptions) {
        let [top, right, bottom, left] = diamond_vertices(rect);
        match options.roundness {
            Roundness::Sharp => {
                for (from, to) in [(top, right), (right, bottom), (bottom, left), (left, top)] {
                    self.line(path, from, to, options);
                }
            }
            Roundness::Round => {
                let radius = rect.width().min(rect.height()) * 0.1;
                let (start, segments) = rounded_polygon(&[right, bottom, left, top], radius);
                self.closed_rounded(path, start, &segments, options);
            }
        }
    }

    fn closed_rounded(&mut self, path: &mut BezPath, start: Point, segments: &[CornerSegment], options: RoughOptions) {
        let roughness = options.roughness;
        for _ in 0..options.passes() {
            path.move_to(self.jittered(start, roughness));
            for segment in segments {
                path.line_to(self.jittered(segment.line_to, roughness));
                let control = self.jittered(segment.corner, roughness);
                let to = self.jittered(segment.exit, roughness);
                path.quad_to(control, to);
            }
        }
    }

    /// Ellipse inscribed in `rect` as four cubic segments starting at the
    /// rightmost point. Every coordinate is jittered independently.
    pub fn ellipse(&mut self, path: &mut BezPath, rect: Rect, options: RoughOptions) {
        let rx = rect.width() / 2.0;
        let ry = rect.height() / 2.0;
        let cx = rect.x0 + rx;
        let cy = rect.y0 + ry;
        let k = ELLIPSE_KAPPA;
        let quarters = [
            [(cx + rx, cy + k * ry), (cx + k * rx, cy + ry), (cx, cy + ry)],
            [(cx - k * rx, cy + ry), (cx - rx, cy + k * ry), (cx - rx, cy)],
            [(cx - rx, cy - k * ry), (cx - k * rx, cy - ry), (cx, cy - ry)],
            [(cx + k * rx, cy - ry), (cx + rx, cy - k * ry), (cx + rx, cy)],
        ];
        let roughness = options.roughness;
        for _ in 0..options.passes() {
            path.move_to(self.jittered(Point::new(cx + rx, cy), roughness));
            for [c1, c2, to] in quarters {
                let c1 = self.jittered(c1.into(), roughness);
                let c2 = self.jittered(c2.into(), roughness);
                let to = self.jittered(to.into(), roughness);
                path.curve_to(c1, c2, to);
            }
        }
    }

    /// Two barbs at `end`, pointing back along the connector. Round
    /// connectors take their direction from the bend control point.
    pub fn arrow_head(&mut self, path: &mut BezPath, start: Point, end: Point, options: RoughOptions) {
        let from = match options.roundness {
            Roundness::Round => bend_control_point(start, end),
            Roundness::Sharp => start,
        };
        let angle = (end - from).atan2();
        for barb_angle in [angle - FRAC_PI_6, angle + FRAC_PI_6] {
            let barb = end - Vec2::from_angle(barb_angle) * ARROW_HEAD_LENGTH;
            self.line(path, end, barb, options.with_sharp());
        }
    }

    /// Parallel hachure lines over `rect`, long enough to cover it once
    /// clipped. Cross-hatch adds the mirrored direction.
    ///
    /// Boxes with a non-finite extent, or needing more than
    /// [`MAX_HACHURE_LINES`] per direction, produce no lines.
    pub fn hachure(&mut self, path: &mut BezPath, rect: Rect, style: FillStyle) {
        let w = rect.width();
        let h = rect.height();
        let extended = w.max(h).max(w.hypot(h));
        let finite = [w, h, extended, rect.x0, rect.y0].iter().all(|v| v.is_finite());
        if !finite {
            log::warn!("Skipping hachure over non-finite box {rect:?}");
            return;
        }
        let count = (extended * 3.0 / HACHURE_GAP).ceil() as usize;
        if count > MAX_HACHURE_LINES {
            log::warn!("Skipping hachure, {count} lines exceeds {MAX_HACHURE_LINES}");
            return;
        }
        let options = RoughOptions::sharp(1.0);
        let mut directions = vec![-h];
        if style == FillStyle::CrossHatch {
            directions.push(h);
        }
        for shift in directions {
            for k in 0..count {
                let x = rect.x0 - extended + k as f64 * HACHURE_GAP;
                let from = Point::new(x, rect.y0 - extended);
                let to = Point::new(x + shift, rect.y0 + extended * 2.0);
                self.line(path, from, to, options);
            }
        }
    }
}

/// One straight side followed by a rounded corner.
#[derive(Debug, Clone, Copy)]
struct CornerSegment {
    line_to: Point,
    corner: Point,
    exit: Point,
}

/// Point `distance` along the segment from `from` toward `to`.
fn point_toward(from: Point, to: Point, distance: f64) -> Point {
    let d = to - from;
    let len = d.hypot();
    if len == 0.0 {
        return from;
    }
    from + d / len * distance
}

/// Corner cut geometry of a closed polygon. The path starts just after the
/// last vertex, on its way toward the first one.
fn rounded_polygon(vertices: &[Point], radius: f64) -> (Point, Vec<CornerSegment>) {
    let n = vertices.len();
    let start = match vertices.last() {
        Some(&last) if n > 1 => point_toward(last, vertices[0], radius),
        _ => return (Point::ZERO, Vec::new()),
    };
    let segments = (0..n)
        .map(|i| {
            let corner = vertices[i];
            let prev = vertices[(i + n - 1) % n];
            let next = vertices[(i + 1) % n];
            CornerSegment {
                line_to: point_toward(corner, prev, radius),
                corner,
                exit: point_toward(corner, next, radius),
            }
        })
        .collect();
    (start, segments)
}

/// Top, right, bottom and left vertices of the diamond inscribed in `rect`.
pub fn diamond_vertices(rect: Rect) -> [Point; 4] {
    let cx = rect.x0 + rect.width() / 2.0;
    let cy = rect.y0 + rect.height() / 2.0;
    [
        Point::new(cx, rect.y0),
        Point::new(rect.x1, cy),
        Point::new(cx, rect.y1),
        Point::new(rect.x0, cy),
    ]
}

/// Exact outline of a fillable element, used for solid fills and as the
/// hachure clip. `None` for kinds without a fill.
pub fn outline_path(element: &Element) -> Option<BezPath> {
    let rect = element.normalized_box();
    let path = match element.kind {
        ElementKind::Rectangle => match element.roundness {
            Roundness::Round => {
                let radius = rect.width().min(rect.height()) * 0.2;
                RoundedRect::from_rect(rect, radius).to_path(OUTLINE_TOLERANCE)
            }
            Roundness::Sharp => rect.to_path(OUTLINE_TOLERANCE),
        },
        ElementKind::Ellipse => Ellipse::from_rect(rect).to_path(OUTLINE_TOLERANCE),
        ElementKind::Diamond => {
            let [top, right, bottom, left] = diamond_vertices(rect);
            let mut path = BezPath::new();
            match element.roundness {
                Roundness::Round => {
                    let radius = rect.width().min(rect.height()) * 0.1;
                    let (start, segments) = rounded_polygon(&[right, bottom, left, top], radius);
                    path.move_to(start);
                    for segment in segments {
                        path.line_to(segment.line_to);
                        path.quad_to(segment.corner, segment.exit);
                    }
                }
                Roundness::Sharp => {
                    path.move_to(top);
                    path.line_to(right);
                    path.line_to(bottom);
                    path.line_to(left);
                }
            }
            path.close_path();
            path
        }
        _ => return None,
    };
    Some(path)
}

/// Geometry of an element fill.
#[derive(Debug, Clone, PartialEq)]
pub enum FillGeometry {
    Solid(BezPath),
    Hatched { clip: BezPath, lines: BezPath },
}

/// Fill geometry of `element`, or `None` when it has no visible fill.
pub fn rough_fill(element: &Element, prng: Prng) -> Option<FillGeometry> {
    if element.fill.is_transparent() || !element.kind.has_fill() {
        return None;
    }
    let outline = outline_path(element)?;
    match element.fill_style {
        FillStyle::Solid => Some(FillGeometry::Solid(outline)),
        style => {
            let mut lines = BezPath::new();
            RoughGenerator::new(prng).hachure(&mut lines, element.normalized_box(), style);
            Some(FillGeometry::Hatched { clip: outline, lines })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;
    use notesketch_core::element::ColorRef;

    fn count_moves(path: &BezPath) -> usize {
        path.elements().iter().filter(|el| matches!(el, PathEl::MoveTo(_))).count()
    }

    fn generator() -> RoughGenerator {
        RoughGenerator::new(Prng::new(99))
    }

    #[test]
    fn test_zero_roughness_line_is_exact() {
        let mut path = BezPath::new();
        generator().line(&mut path, Point::new(0.0, 0.0), Point::new(100.0, 0.0), RoughOptions::sharp(0.0));
        assert_eq!(
            path.elements(),
            &[PathEl::MoveTo(Point::new(0.0, 0.0)), PathEl::LineTo(Point::new(100.0, 0.0))]
        );
    }

    #[test]
    fn test_rough_line_has_two_passes() {
        let mut path = BezPath::new();
        generator().line(&mut path, Point::new(0.0, 0.0), Point::new(100.0, 50.0), RoughOptions::sharp(1.0));
        assert_eq!(count_moves(&path), 2);
        for el in path.elements() {
            let p = match el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) => *p,
                other => panic!("unexpected {other:?}"),
            };
            let near_start = p.distance(Point::new(0.0, 0.0)) <= 2.0_f64.sqrt();
            let near_end = p.distance(Point::new(100.0, 50.0)) <= 2.0_f64.sqrt();
            assert!(near_start || near_end);
        }
    }

    #[test]
    fn test_short_line_skipped() {
        let mut path = BezPath::new();
        let mut rough = generator();
        rough.line(&mut path, Point::new(0.0, 0.0), Point::new(0.5, 0.5), RoughOptions::sharp(1.0));
        assert!(path.is_empty());
        // Jitter was not consumed.
        let mut fresh = Prng::new(99);
        assert_eq!(rough.prng.next_f64(), fresh.next_f64());
    }

    #[test]
    fn test_round_line_bends() {
        let mut path = BezPath::new();
        let options = RoughOptions::new(0.0, Roundness::Round);
        generator().line(&mut path, Point::new(0.0, 0.0), Point::new(100.0, 0.0), options);
        assert_eq!(
            path.elements()[1],
            PathEl::QuadTo(Point::new(50.0, 20.0), Point::new(100.0, 0.0))
        );
    }

    #[test]
    fn test_sharp_rectangle_four_sides() {
        let mut path = BezPath::new();
        generator().rectangle(&mut path, Rect::new(0.0, 0.0, 100.0, 50.0), RoughOptions::sharp(1.0));
        assert_eq!(count_moves(&path), 8);
        let mut path = BezPath::new();
        generator().rectangle(&mut path, Rect::new(0.0, 0.0, 100.0, 50.0), RoughOptions::sharp(0.0));
        assert_eq!(count_moves(&path), 4);
    }

    #[test]
    fn test_round_rectangle_corners() {
        let mut path = BezPath::new();
        let options = RoughOptions::new(0.0, Roundness::Round);
        // Negative extent is normalized first.
        generator().rectangle(&mut path, Rect::new(100.0, 50.0, 0.0, 0.0), options);
        let els = path.elements();
        // Radius = min(100, 50) * 0.2 = 10.
        assert_eq!(els[0], PathEl::MoveTo(Point::new(10.0, 0.0)));
        assert_eq!(els[1], PathEl::LineTo(Point::new(90.0, 0.0)));
        assert_eq!(els[2], PathEl::QuadTo(Point::new(100.0, 0.0), Point::new(100.0, 10.0)));
        assert_eq!(count_moves(&path), 1);
    }

    #[test]
    fn test_round_diamond_path_order() {
        let mut path = BezPath::new();
        let options = RoughOptions::new(0.0, Roundness::Round);
        generator().diamond(&mut path, Rect::new(0.0, 0.0, 100.0, 100.0), options);
        let els = path.elements();
        assert_eq!(els.len(), 9);
        // Starts next to the top vertex heading right.
        match els[0] {
            PathEl::MoveTo(p) => {
                assert!(p.x > 50.0 && p.y > 0.0);
                assert!((p.distance(Point::new(50.0, 0.0)) - 10.0).abs() < 1e-9);
            }
            ref other => panic!("unexpected {other:?}"),
        }
        match els[2] {
            PathEl::QuadTo(corner, _) => assert_eq!(corner, Point::new(100.0, 50.0)),
            ref other => panic!("unexpected {other:?}"),
        }
        match els[8] {
            PathEl::QuadTo(corner, end) => {
                assert_eq!(corner, Point::new(50.0, 0.0));
                match els[0] {
                    PathEl::MoveTo(start) => assert!(start.distance(end) < 1e-9),
                    _ => unreachable!(),
                }
            }
            ref other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_ellipse_passes() {
        let mut path = BezPath::new();
        generator().ellipse(&mut path, Rect::new(0.0, 0.0, 100.0, 60.0), RoughOptions::sharp(0.0));
        assert_eq!(path.elements().len(), 5);
        assert_eq!(path.elements()[0], PathEl::MoveTo(Point::new(100.0, 30.0)));
        let mut path = BezPath::new();
        generator().ellipse(&mut path, Rect::new(0.0, 0.0, 100.0, 60.0), RoughOptions::sharp(2.0));
        assert_eq!(count_moves(&path), 2);
    }

    #[test]
    fn test_arrow_head_barbs() {
        let mut path = BezPath::new();
        generator().arrow_head(&mut path, Point::new(0.0, 0.0), Point::new(100.0, 0.0), RoughOptions::sharp(0.0));
        let els = path.elements();
        assert_eq!(els.len(), 4);
        let expected_dx = 100.0 - ARROW_HEAD_LENGTH * FRAC_PI_6.cos();
        let expected_dy = ARROW_HEAD_LENGTH * FRAC_PI_6.sin();
        match (els[1], els[3]) {
            (PathEl::LineTo(a), PathEl::LineTo(b)) => {
                assert!((a.x - expected_dx).abs() < 1e-9);
                assert!((a.y - expected_dy).abs() < 1e-9);
                assert!((b.y + expected_dy).abs() < 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_hachure_line_count() {
        let rect = Rect::new(0.0, 0.0, 30.0, 40.0);
        // extended = max(30, 40, 50) = 50; i from -50 while < 100 step 8.
        let expected = ((150.0_f64) / HACHURE_GAP).ceil() as usize;
        let mut path = BezPath::new();
        generator().hachure(&mut path, rect, FillStyle::Hachure);
        assert_eq!(count_moves(&path), expected * 2);
        let mut path = BezPath::new();
        generator().hachure(&mut path, rect, FillStyle::CrossHatch);
        assert_eq!(count_moves(&path), expected * 4);
    }

    #[test]
    fn test_hachure_huge_box_is_bounded() {
        let mut path = BezPath::new();
        generator().hachure(&mut path, Rect::new(0.0, 0.0, 1e17, 10.0), FillStyle::CrossHatch);
        assert!(count_moves(&path) <= MAX_HACHURE_LINES * 4);

        let mut path = BezPath::new();
        generator().hachure(&mut path, Rect::new(0.0, 0.0, 2.0e5, 10.0), FillStyle::Hachure);
        assert!(path.elements().is_empty());
    }

    #[test]
    fn test_hachure_non_finite_box() {
        let mut path = BezPath::new();
        // hypot overflows to infinity.
        generator().hachure(&mut path, Rect::new(0.0, 0.0, 1e308, 1e308), FillStyle::Hachure);
        assert!(path.elements().is_empty());

        let mut path = BezPath::new();
        generator().hachure(&mut path, Rect::new(0.0, 0.0, f64::NAN, 10.0), FillStyle::Hachure);
        assert!(path.elements().is_empty());
    }

    #[test]
    fn test_fill_geometry() {
        let mut element = Element::new(ElementKind::Rectangle, Point::new(0.0, 0.0)).with_size(50.0, 50.0);
        assert!(rough_fill(&element, Prng::new(1)).is_none());

        element.fill = ColorRef::Explicit("#ffc9c9".into());
        element.fill_style = FillStyle::Solid;
        assert!(matches!(rough_fill(&element, Prng::new(1)), Some(FillGeometry::Solid(_))));

        element.fill_style = FillStyle::Hachure;
        assert!(matches!(rough_fill(&element, Prng::new(1)), Some(FillGeometry::Hatched { .. })));

        element.kind = ElementKind::Line;
        assert!(rough_fill(&element, Prng::new(1)).is_none());
    }

    #[test]
    fn test_outline_kinds() {
        let element = Element::new(ElementKind::Diamond, Point::new(0.0, 0.0)).with_size(40.0, 20.0);
        let outline = outline_path(&element).unwrap();
        assert_eq!(outline.elements()[0], PathEl::MoveTo(Point::new(20.0, 0.0)));
        assert_eq!(outline.elements().last(), Some(&PathEl::ClosePath));
        let text = Element::new(ElementKind::Text, Point::new(0.0, 0.0));
        assert!(outline_path(&text).is_none());
    }
}
