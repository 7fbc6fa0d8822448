//! Resize handles of the selected element.

use kurbo::{Point, Rect};

use crate::element::Element;

/// Pointer cursor the host should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Crosshair,
    Grab,
    NwseResize,
    NsResize,
    NeswResize,
    EwResize,
    /// Hide the system cursor.
    None,
}

impl CursorHint {
    /// CSS `cursor` value.
    pub fn css_name(self) -> &'static str {
        match self {
            CursorHint::Default => "default",
            CursorHint::Crosshair => "crosshair",
            CursorHint::Grab => "grab",
            CursorHint::NwseResize => "nwse-resize",
            CursorHint::NsResize => "ns-resize",
            CursorHint::NeswResize => "nesw-resize",
            CursorHint::EwResize => "ew-resize",
            CursorHint::None => "none",
        }
    }
}

/// Compass direction of a resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleDirection {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
}

impl HandleDirection {
    /// Handle order used for layout and hit testing.
    pub const ALL: [HandleDirection; 8] = [
        HandleDirection::NorthWest,
        HandleDirection::North,
        HandleDirection::NorthEast,
        HandleDirection::East,
        HandleDirection::SouthEast,
        HandleDirection::South,
        HandleDirection::SouthWest,
        HandleDirection::West,
    ];

    pub fn moves_top(self) -> bool {
        matches!(
            self,
            HandleDirection::NorthWest | HandleDirection::North | HandleDirection::NorthEast
        )
    }

    pub fn moves_bottom(self) -> bool {
        matches!(
            self,
            HandleDirection::SouthWest | HandleDirection::South | HandleDirection::SouthEast
        )
    }

    pub fn moves_left(self) -> bool {
        matches!(
            self,
            HandleDirection::NorthWest | HandleDirection::West | HandleDirection::SouthWest
        )
    }

    pub fn moves_right(self) -> bool {
        matches!(
            self,
            HandleDirection::NorthEast | HandleDirection::East | HandleDirection::SouthEast
        )
    }

    pub fn cursor(self) -> CursorHint {
        match self {
            HandleDirection::NorthWest | HandleDirection::SouthEast => CursorHint::NwseResize,
            HandleDirection::North | HandleDirection::South => CursorHint::NsResize,
            HandleDirection::NorthEast | HandleDirection::SouthWest => CursorHint::NeswResize,
            HandleDirection::East | HandleDirection::West => CursorHint::EwResize,
        }
    }

    fn anchor(self, rect: Rect) -> Point {
        let cx = rect.x0 + rect.width() / 2.0;
        let cy = rect.y0 + rect.height() / 2.0;
        match self {
            HandleDirection::NorthWest => Point::new(rect.x0, rect.y0),
            HandleDirection::North => Point::new(cx, rect.y0),
            HandleDirection::NorthEast => Point::new(rect.x1, rect.y0),
            HandleDirection::East => Point::new(rect.x1, cy),
            HandleDirection::SouthEast => Point::new(rect.x1, rect.y1),
            HandleDirection::South => Point::new(cx, rect.y1),
            HandleDirection::SouthWest => Point::new(rect.x0, rect.y1),
            HandleDirection::West => Point::new(rect.x0, cy),
        }
    }

    /// Apply a pointer delta to a snapshot of the element.
    ///
    /// The result is derived from `original` every time so a long drag does
    /// not accumulate error.
    pub fn resize(self, original: &Element, dx: f64, dy: f64) -> Element {
        let mut resized = original.clone();
        if self.moves_top() {
            resized.y += dy;
            resized.height -= dy;
        }
        if self.moves_bottom() {
            resized.height += dy;
        }
        if self.moves_left() {
            resized.x += dx;
            resized.width -= dx;
        }
        if self.moves_right() {
            resized.width += dx;
        }
        resized
    }
}

/// A resize handle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeHandle {
    pub direction: HandleDirection,
    pub position: Point,
}

impl ResizeHandle {
    pub fn cursor(&self) -> CursorHint {
        self.direction.cursor()
    }

    /// Square hit test. `tolerance` is in world units.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point.x - self.position.x).abs() < tolerance && (point.y - self.position.y).abs() < tolerance
    }
}

/// The eight handles on the element's normalized box.
pub fn resize_handles(element: &Element) -> [ResizeHandle; 8] {
    let rect = element.normalized_box();
    HandleDirection::ALL.map(|direction| ResizeHandle {
        direction,
        position: direction.anchor(rect),
    })
}

/// First handle in layout order hit by `point`.
pub fn hit_resize_handle(element: &Element, point: Point, tolerance: f64) -> Option<ResizeHandle> {
    resize_handles(element)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
}
