//! Background grid overlay.

use kurbo::{BezPath, Point, Rect, Size, Stroke};
use notesketch_core::theme::ThemePalette;
use notesketch_core::viewport::{GridKind, Viewport};

use crate::surface::Surface;

/// Grid cell size in world units.
pub const GRID_SIZE: f64 = 20.0;

/// World-space range `(start_x, start_y, end_x, end_y)` covering the visible
/// area. Start values are snapped down to a grid line.
pub fn grid_bounds(viewport: &Viewport, viewport_size: Size) -> (f64, f64, f64, f64) {
    let scale = viewport.scale;
    let start_x = (-viewport.pan_offset.x / scale / GRID_SIZE).floor() * GRID_SIZE;
    let start_y = (-viewport.pan_offset.y / scale / GRID_SIZE).floor() * GRID_SIZE;
    let end_x = start_x + viewport_size.width / scale + GRID_SIZE;
    let end_y = start_y + viewport_size.height / scale + GRID_SIZE;
    (start_x, start_y, end_x, end_y)
}

/// Draw the grid in world coordinates. The viewport transform must already
/// be applied to the surface.
pub fn draw_grid<S: Surface + ?Sized>(
    surface: &mut S,
    kind: GridKind,
    viewport: &Viewport,
    viewport_size: Size,
    theme: &ThemePalette,
) {
    match kind {
        GridKind::None => {}
        GridKind::Line => draw_grid_lines(surface, viewport, viewport_size, theme),
        GridKind::Dot => draw_grid_dots(surface, viewport, viewport_size, theme),
    }
}

fn draw_grid_lines<S: Surface + ?Sized>(surface: &mut S, viewport: &Viewport, viewport_size: Size, theme: &ThemePalette) {
    let (start_x, start_y, end_x, end_y) = grid_bounds(viewport, viewport_size);
    let stroke = Stroke::new(1.0 / viewport.scale);

    // All lines in one path, one stroke call.
    let mut path = BezPath::new();
    let mut x = start_x;
    while x < end_x {
        path.move_to(Point::new(x, start_y));
        path.line_to(Point::new(x, end_y));
        x += GRID_SIZE;
    }
    let mut y = start_y;
    while y < end_y {
        path.move_to(Point::new(start_x, y));
        path.line_to(Point::new(end_x, y));
        y += GRID_SIZE;
    }
    surface.stroke_path(&path, &stroke, theme.border);
}

fn draw_grid_dots<S: Surface + ?Sized>(surface: &mut S, viewport: &Viewport, viewport_size: Size, theme: &ThemePalette) {
    let (start_x, start_y, end_x, end_y) = grid_bounds(viewport, viewport_size);
    let half = 1.0 / viewport.scale;

    let mut x = start_x;
    while x < end_x {
        let mut y = start_y;
        while y < end_y {
            surface.fill_rect(Rect::new(x - half, y - half, x + half, y + half), theme.muted);
            y += GRID_SIZE;
        }
        x += GRID_SIZE;
    }
}
