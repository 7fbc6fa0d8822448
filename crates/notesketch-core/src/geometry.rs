//! Geometry kernel: hit testing, connector binding and snapping.

use kurbo::{Point, Rect, Vec2};

use crate::config::EditorConfig;
use crate::element::{ConnectorEnd, Element, ElementId, ElementKind};

/// Tolerances used by [`hit_test`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTolerance {
    /// Square radius around each freedraw point.
    pub freedraw_radius: f64,
    /// Padding of the box around lines and arrows.
    pub connector_padding: f64,
}

impl Default for HitTolerance {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for HitTolerance {
    fn from(config: &EditorConfig) -> Self {
        Self {
            freedraw_radius: config.freedraw_hit_radius,
            connector_padding: config.connector_hit_padding,
        }
    }
}

/// Intersect the segment `p1 -> p2` with the four edges of `rect`.
///
/// Edges are tested in the order top, right, bottom, left. Parallel edges
/// are skipped. When several edges are crossed the point closest to `p2`
/// is returned.
pub fn segment_box_intersection(p1: Point, p2: Point, rect: Rect) -> Option<Point> {
    let edges = [
        (Point::new(rect.x0, rect.y0), Point::new(rect.x1, rect.y0)),
        (Point::new(rect.x1, rect.y0), Point::new(rect.x1, rect.y1)),
        (Point::new(rect.x1, rect.y1), Point::new(rect.x0, rect.y1)),
        (Point::new(rect.x0, rect.y1), Point::new(rect.x0, rect.y0)),
    ];

    let mut closest: Option<(Point, f64)> = None;
    for (a, b) in edges {
        let Some(hit) = segment_intersection(p1, p2, a, b) else {
            continue;
        };
        let dist_sq = (hit - p2).hypot2();
        if closest.is_none_or(|(_, best)| dist_sq < best) {
            closest = Some((hit, dist_sq));
        }
    }
    closest.map(|(point, _)| point)
}

/// Intersection of segments `p1 -> p2` and `a -> b`, endpoints inclusive.
fn segment_intersection(p1: Point, p2: Point, a: Point, b: Point) -> Option<Point> {
    let r = p2 - p1;
    let s = b - a;
    let det = r.cross(s);
    if det == 0.0 {
        return None;
    }
    let offset = a - p1;
    let t = offset.cross(s) / det;
    let u = offset.cross(r) / det;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(p1 + r * t)
    } else {
        None
    }
}

/// Point where one end of `connector` should touch `bound_shape`.
///
/// The ray runs from the shape's center toward the connector's opposite raw
/// endpoint. Returns `None` when the shape is absent or the ray does not
/// cross the boundary (the opposite end lies inside the shape).
pub fn bound_endpoint(
    connector: &Element,
    bound_shape: Option<&Element>,
    end: ConnectorEnd,
) -> Option<Point> {
    let shape = bound_shape?;
    let other = match end {
        ConnectorEnd::Start => connector.far_point(),
        ConnectorEnd::End => connector.origin(),
    };
    let bounds = shape.normalized_box();
    segment_box_intersection(bounds.center(), other, bounds)
}

/// Find an element by id.
pub fn find<'a>(elements: &'a [Element], id: &ElementId) -> Option<&'a Element> {
    elements.iter().find(|el| &el.id == id)
}

/// Endpoints a connector is drawn with.
///
/// Bound ends are moved onto their shape's boundary. Ends whose shape is
/// missing, or that yield no intersection, keep the raw coordinate.
pub fn resolved_endpoints(connector: &Element, elements: &[Element]) -> (Point, Point) {
    let mut start = connector.origin();
    let mut end = connector.far_point();
    if !connector.kind.is_connector() {
        return (start, end);
    }
    let anchor = |end: ConnectorEnd| {
        let id = connector.binding(end)?;
        bound_endpoint(connector, find(elements, id), end)
    };
    if let Some(point) = anchor(ConnectorEnd::Start) {
        start = point;
    }
    if let Some(point) = anchor(ConnectorEnd::End) {
        end = point;
    }
    (start, end)
}

/// Re-anchor the ends of `connector` bound to `shape`, which has moved or
/// been resized.
///
/// Both ends are computed from the connector as it was before this call.
/// An unbound end keeps its raw coordinate.
pub fn reanchor_connector(connector: &Element, shape: &Element) -> Element {
    let start_bound = connector.start_binding_id.as_ref() == Some(&shape.id);
    let end_bound = connector.end_binding_id.as_ref() == Some(&shape.id);
    let original_start = connector.origin();
    let original_end = connector.far_point();

    let mut updated = connector.clone();
    if start_bound {
        let start = bound_endpoint(connector, Some(shape), ConnectorEnd::Start)
            .unwrap_or(original_start);
        updated.x = start.x;
        updated.y = start.y;
        updated.width = original_end.x - start.x;
        updated.height = original_end.y - start.y;
    }
    if end_bound {
        let end =
            bound_endpoint(connector, Some(shape), ConnectorEnd::End).unwrap_or(original_end);
        if !start_bound {
            updated.x = original_start.x;
            updated.y = original_start.y;
        }
        updated.width = end.x - updated.x;
        updated.height = end.y - updated.y;
    }
    updated
}

/// Whether `point` lies on `element`.
pub fn hit_test(point: Point, element: &Element, tolerance: &HitTolerance) -> bool {
    match element.kind {
        ElementKind::Freedraw => {
            let r = tolerance.freedraw_radius;
            element
                .points
                .iter()
                .any(|p| (p.x - point.x).abs() < r && (p.y - point.y).abs() < r)
        }
        ElementKind::Arrow | ElementKind::Line => {
            let padded = element
                .normalized_box()
                .inflate(tolerance.connector_padding, tolerance.connector_padding);
            contains_inclusive(padded, point)
        }
        _ => contains_inclusive(element.normalized_box(), point),
    }
}

/// Topmost element under `point`. Later elements are on top.
pub fn topmost_hit_at<'a>(
    point: Point,
    elements: &'a [Element],
    tolerance: &HitTolerance,
) -> Option<&'a Element> {
    elements
        .iter()
        .rev()
        .find(|el| hit_test(point, el, tolerance))
}

/// Shape a connector endpoint dropped at `point` should bind to.
///
/// Scans in document order and returns the first bindable shape whose box,
/// padded by `snap_distance`, contains the point and which has a corner
/// strictly closer than `snap_distance`.
pub fn proximity_snap_target(
    point: Point,
    elements: &[Element],
    exclude: Option<&ElementId>,
    snap_distance: f64,
) -> Option<ElementId> {
    let limit_sq = snap_distance * snap_distance;
    elements
        .iter()
        .filter(|el| el.kind.is_bindable() && Some(&el.id) != exclude)
        .find(|el| {
            let bounds = el.normalized_box();
            if !contains_inclusive(bounds.inflate(snap_distance, snap_distance), point) {
                return false;
            }
            corners(bounds)
                .iter()
                .any(|corner| (*corner - point).hypot2() < limit_sq)
        })
        .map(|el| el.id.clone())
}

/// Corners in the order top-left, top-right, bottom-left, bottom-right.
pub fn corners(rect: Rect) -> [Point; 4] {
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x0, rect.y1),
        Point::new(rect.x1, rect.y1),
    ]
}

fn contains_inclusive(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Bend control point of a round connector from `start` to `end`.
pub fn bend_control_point(start: Point, end: Point) -> Point {
    let d = end - start;
    start.midpoint(end) + Vec2::new(-d.y, d.x) * 0.2
}
