//! Frame composition.

use kurbo::{Affine, BezPath, Cap, Join, Point, Rect, Size, Stroke};
use notesketch_core::config::EditorConfig;
use notesketch_core::document::Document;
use notesketch_core::editor::Editor;
use notesketch_core::element::{Element, ElementId, ElementKind};
use notesketch_core::geometry::resolved_endpoints;
use notesketch_core::handles::resize_handles;
use notesketch_core::text::layout_element_text;
use notesketch_core::theme::ThemePalette;
use notesketch_core::viewport::{GridKind, Viewport};

use crate::grid::draw_grid;
use crate::prng::Prng;
use crate::rough::{FillGeometry, RoughGenerator, RoughOptions, rough_fill};
use crate::surface::Surface;

/// Dash pattern of the selection box.
const SELECTION_DASH: [f64; 2] = [5.0, 5.0];

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The document to draw.
    pub document: &'a Document,
    pub viewport: Viewport,
    /// Surface size in screen units.
    pub viewport_size: Size,
    pub theme: ThemePalette,
    pub grid: GridKind,
    /// Element drawn with selection chrome.
    pub selected: Option<&'a ElementId>,
    /// Element whose text is being edited. Its text is not drawn and it
    /// gets no selection chrome.
    pub editing: Option<&'a ElementId>,
    pub config: &'a EditorConfig,
}

impl<'a> RenderContext<'a> {
    pub fn new(document: &'a Document, viewport_size: Size) -> Self {
        Self {
            document,
            viewport: Viewport::default(),
            viewport_size,
            theme: ThemePalette::default(),
            grid: GridKind::default(),
            selected: None,
            editing: None,
            config: &EditorConfig::DEFAULT,
        }
    }

    /// Everything the editor currently shows.
    pub fn from_editor(editor: &'a Editor, viewport_size: Size) -> Self {
        Self {
            document: editor.document(),
            viewport: editor.viewport().clone(),
            viewport_size,
            theme: *editor.theme(),
            grid: editor.grid(),
            selected: editor.selected_id(),
            editing: editor.editing_id(),
            config: editor.config(),
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_theme(mut self, theme: ThemePalette) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_grid(mut self, grid: GridKind) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_selected(mut self, selected: Option<&'a ElementId>) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_editing(mut self, editing: Option<&'a ElementId>) -> Self {
        self.editing = editing;
        self
    }

    pub fn with_config(mut self, config: &'a EditorConfig) -> Self {
        self.config = config;
        self
    }

    fn shows_chrome(&self, id: &ElementId) -> bool {
        self.selected == Some(id) && self.editing.is_none()
    }

    fn shows_text(&self, id: &ElementId) -> bool {
        self.editing != Some(id)
    }
}

/// Draws documents in the hand-drawn style.
///
/// Output depends only on the context: each element's jitter is seeded from
/// its stored seed, so repeated frames are identical.
#[derive(Debug, Clone, Copy, Default)]
pub struct SketchRenderer;

impl SketchRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw one frame.
    pub fn render<S: Surface>(&self, ctx: &RenderContext<'_>, surface: &mut S) {
        surface.set_transform(Affine::IDENTITY);
        surface.fill_rect(
            Rect::from_origin_size(Point::ZERO, ctx.viewport_size),
            ctx.theme.background,
        );

        let scale = ctx.viewport.scale;
        if !(scale.is_finite() && scale > 0.0) {
            log::warn!("Skipping frame, invalid viewport scale {scale}");
            return;
        }
        surface.set_transform(ctx.viewport.transform());
        draw_grid(surface, ctx.grid, &ctx.viewport, ctx.viewport_size, &ctx.theme);

        let elements = &ctx.document.elements;
        for element in elements {
            if ctx.shows_chrome(&element.id) {
                self.draw_selection(ctx, element, surface);
            }
            self.draw_fill(ctx, element, surface);
            self.draw_stroke(ctx, element, elements, surface);
            if ctx.shows_text(&element.id) {
                self.draw_text(ctx, element, surface);
            }
        }
    }

    fn draw_selection<S: Surface>(&self, ctx: &RenderContext<'_>, element: &Element, surface: &mut S) {
        let scale = ctx.viewport.scale;
        let color = ctx.theme.primary;
        let outline = Stroke::new(1.0 / scale);

        let padded = element.normalized_box().inflate(ctx.config.selection_padding, ctx.config.selection_padding);
        let dashed = outline.clone().with_dashes(0.0, SELECTION_DASH);
        surface.stroke_path(&rect_path(padded), &dashed, color);

        let half = ctx.config.handle_size / scale / 2.0;
        for handle in resize_handles(element) {
            let square = Rect::from_center_size(handle.position, (half * 2.0, half * 2.0));
            surface.fill_rect(square, ctx.theme.card);
            surface.stroke_path(&rect_path(square), &outline, color);
        }
    }

    fn draw_fill<S: Surface>(&self, ctx: &RenderContext<'_>, element: &Element, surface: &mut S) {
        let Some(color) = ctx.theme.resolve(&element.fill) else {
            return;
        };
        match rough_fill(element, Prng::for_fill(element.seed)) {
            Some(FillGeometry::Solid(path)) => surface.fill_path(&path, color),
            Some(FillGeometry::Hatched { clip, lines }) => {
                surface.push_clip(&clip);
                surface.stroke_path(&lines, &sketch_stroke(1.0), color);
                surface.pop_clip();
            }
            None => {}
        }
    }

    fn draw_stroke<S: Surface>(&self, ctx: &RenderContext<'_>, element: &Element, elements: &[Element], surface: &mut S) {
        let color = ctx.theme.resolve_stroke(&element.stroke);
        let mut rough = RoughGenerator::new(Prng::for_stroke(element.seed));
        let options = RoughOptions::from(element);
        let mut path = BezPath::new();
        match element.kind {
            ElementKind::Rectangle => rough.rectangle(&mut path, raw_box(element), options),
            ElementKind::Diamond => rough.diamond(&mut path, element.normalized_box(), options),
            ElementKind::Ellipse => rough.ellipse(&mut path, raw_box(element), options),
            ElementKind::Line | ElementKind::Arrow => {
                let (start, end) = resolved_endpoints(element, elements);
                rough.line(&mut path, start, end, options);
                if element.kind == ElementKind::Arrow {
                    rough.arrow_head(&mut path, start, end, options);
                }
            }
            ElementKind::Freedraw => {
                let Some(first) = element.points.first() else {
                    return;
                };
                path.move_to(*first);
                for point in &element.points {
                    path.line_to(*point);
                }
            }
            ElementKind::Text => return,
        }
        if !path.is_empty() {
            surface.stroke_path(&path, &sketch_stroke(element.stroke_width), color);
        }
    }

    fn draw_text<S: Surface>(&self, ctx: &RenderContext<'_>, element: &Element, surface: &mut S) {
        let Some(layout) = layout_element_text(element, &*surface, ctx.config) else {
            return;
        };
        let color = ctx.theme.resolve_stroke(&element.stroke);
        for line in &layout.lines {
            surface.fill_text(&line.text, line.anchor, layout.align, &layout.font, color);
        }
        let underlines = layout.underlines();
        if !underlines.is_empty() {
            let mut path = BezPath::new();
            for (from, to) in underlines {
                path.move_to(from);
                path.line_to(to);
            }
            surface.stroke_path(&path, &Stroke::new(1.0), color);
        }
    }
}

/// Stroke with round caps and joins.
fn sketch_stroke(width: f64) -> Stroke {
    Stroke::new(width).with_caps(Cap::Round).with_join(Join::Round)
}

fn rect_path(rect: Rect) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((rect.x0, rect.y0));
    path.line_to((rect.x1, rect.y0));
    path.line_to((rect.x1, rect.y1));
    path.line_to((rect.x0, rect.y1));
    path.close_path();
    path
}

/// Box spanned by the element's stored origin and size, without
/// normalizing negative extents.
fn raw_box(element: &Element) -> Rect {
    Rect::new(element.x, element.y, element.x + element.width, element.y + element.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_list::{DisplayList, DrawCommand};
    use kurbo::{PathEl, Vec2};
    use notesketch_core::element::{ColorRef, FillStyle, TextDecoration};
    use notesketch_core::input::MouseButton;

    fn rgba(color: peniko::Color) -> [u8; 4] {
        color.to_rgba8().to_u8_array()
    }

    fn frame(ctx: &RenderContext<'_>) -> Vec<DrawCommand> {
        let mut list = DisplayList::new();
        SketchRenderer::new().render(ctx, &mut list);
        list.into_commands()
    }

    fn strokes(commands: &[DrawCommand]) -> Vec<&BezPath> {
        commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::StrokePath { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }

    fn boxed(kind: ElementKind, id: &str) -> Element {
        Element::new(kind, Point::new(100.0, 0.0))
            .with_id(id)
            .with_size(100.0, 100.0)
            .with_seed(7)
    }

    #[test]
    fn test_frame_prologue() {
        let document = Document::new();
        let mut viewport = Viewport::default();
        viewport.pan_offset = Vec2::new(10.0, 20.0);
        viewport.scale = 2.0;
        let theme = ThemePalette::dark();
        let ctx = RenderContext::new(&document, Size::new(800.0, 600.0))
            .with_viewport(viewport.clone())
            .with_theme(theme);
        let commands = frame(&ctx);

        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], DrawCommand::SetTransform(Affine::IDENTITY));
        match &commands[1] {
            DrawCommand::FillRect { rect, color } => {
                assert_eq!(*rect, Rect::new(0.0, 0.0, 800.0, 600.0));
                assert_eq!(rgba(*color), rgba(theme.background));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(commands[2], DrawCommand::SetTransform(viewport.transform()));
    }

    #[test]
    fn test_frames_are_identical() {
        let json = r##"{"elements": [
            {"id": "a", "type": "rectangle", "x": 10, "y": 10, "width": 80, "height": 40,
             "fill": "#ffc9c9", "fillStyle": "cross-hatch", "seed": 12345},
            {"id": "b", "type": "ellipse", "x": 120, "y": 10, "width": 60, "height": 60, "seed": 999},
            {"id": "c", "type": "arrow", "x": 0, "y": 100, "width": 200, "height": 30,
             "roundness": "round", "seed": 42}
        ]}"##;
        let first = Document::load(json);
        let second = Document::load(json);
        let a = frame(&RenderContext::new(&first, Size::new(400.0, 300.0)));
        let b = frame(&RenderContext::new(&second, Size::new(400.0, 300.0)));
        assert_eq!(a, b);

        // A different seed moves the jitter.
        let mut reseeded = Document::load(json);
        reseeded.elements[1].seed = 1000;
        let c = frame(&RenderContext::new(&reseeded, Size::new(400.0, 300.0)));
        assert_ne!(a, c);

        let value: serde_json::Value = serde_json::from_str(&first.to_json().unwrap()).unwrap();
        assert_eq!(value["elements"][0]["seed"], 12345);
    }

    #[test]
    fn test_transparent_fill_skipped() {
        let document = Document::from_elements(vec![boxed(ElementKind::Rectangle, "r")]);
        let commands = frame(&RenderContext::new(&document, Size::new(100.0, 100.0)));
        assert!(!commands.iter().any(|c| matches!(c, DrawCommand::PushClip(_) | DrawCommand::FillPath { .. })));
        assert_eq!(strokes(&commands).len(), 1);
    }

    #[test]
    fn test_hachure_fill_is_clipped() {
        let mut element = boxed(ElementKind::Diamond, "d");
        element.fill = ColorRef::Explicit("#a5d8ff".into());
        let document = Document::from_elements(vec![element]);
        let commands = frame(&RenderContext::new(&document, Size::new(100.0, 100.0)));
        let clip = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::PushClip(_)))
            .unwrap();
        assert!(matches!(commands[clip + 1], DrawCommand::StrokePath { .. }));
        assert_eq!(commands[clip + 2], DrawCommand::PopClip);
        // Fill comes before the outline stroke.
        assert_eq!(commands.len(), clip + 4);
    }

    #[test]
    fn test_solid_fill() {
        let mut element = boxed(ElementKind::Ellipse, "e");
        element.fill = ColorRef::Explicit("#ff0000".into());
        element.fill_style = FillStyle::Solid;
        let document = Document::from_elements(vec![element]);
        let commands = frame(&RenderContext::new(&document, Size::new(100.0, 100.0)));
        let fill = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::FillPath { color, .. } => Some(*color),
                _ => None,
            })
            .unwrap();
        assert_eq!(rgba(fill), [255, 0, 0, 255]);
    }

    #[test]
    fn test_selection_chrome() {
        let document = Document::from_elements(vec![boxed(ElementKind::Rectangle, "r")]);
        let id = ElementId::from("r");
        let theme = ThemePalette::dark();
        let ctx = RenderContext::new(&document, Size::new(400.0, 400.0))
            .with_theme(theme)
            .with_selected(Some(&id));
        let commands = frame(&ctx);

        let handles: Vec<Rect> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { rect, color } if rgba(*color) == rgba(theme.card) => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(handles.len(), 8);
        assert!((handles[0].width() - 8.0).abs() < f64::EPSILON);
        assert_eq!(handles[0].center(), Point::new(100.0, 0.0));

        let dashed = commands.iter().find_map(|c| match c {
            DrawCommand::StrokePath { style, path, .. } if !style.dash_pattern.is_empty() => Some(path.clone()),
            _ => None,
        });
        let dashed = dashed.unwrap();
        assert_eq!(dashed.elements()[0], PathEl::MoveTo(Point::new(96.0, -4.0)));
    }

    #[test]
    fn test_editing_hides_text_and_chrome() {
        let mut element = Element::new(ElementKind::Text, Point::new(0.0, 0.0))
            .with_id("t")
            .with_size(100.0, 30.0);
        element.text = "hello".into();
        let document = Document::from_elements(vec![element]);
        let id = ElementId::from("t");

        let shown = frame(&RenderContext::new(&document, Size::new(200.0, 200.0)).with_selected(Some(&id)));
        assert!(shown.iter().any(|c| matches!(c, DrawCommand::FillText { .. })));

        let editing = RenderContext::new(&document, Size::new(200.0, 200.0))
            .with_selected(Some(&id))
            .with_editing(Some(&id));
        let hidden = frame(&editing);
        assert!(!hidden.iter().any(|c| matches!(c, DrawCommand::FillText { .. })));
        assert_eq!(hidden.len(), 3);
    }

    #[test]
    fn test_label_text_and_underline() {
        let mut element = boxed(ElementKind::Rectangle, "r");
        element.text = "label".into();
        element.stroke = ColorRef::Explicit("#1971c2".into());
        element.text_decoration = TextDecoration::Underline;
        let document = Document::from_elements(vec![element]);
        let commands = frame(&RenderContext::new(&document, Size::new(400.0, 400.0)));

        let (anchor, color) = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::FillText { text, anchor, color, .. } if text == "label" => Some((*anchor, *color)),
                _ => None,
            })
            .unwrap();
        // Centered label, inset by the label padding.
        assert_eq!(anchor, Point::new(150.0, 10.0));
        assert_eq!(rgba(color), [0x19, 0x71, 0xc2, 255]);

        match commands.last() {
            Some(DrawCommand::StrokePath { style, path, .. }) => {
                assert!((style.width - 1.0).abs() < f64::EPSILON);
                match path.elements()[0] {
                    PathEl::MoveTo(p) => assert!((p.y - (10.0 + 24.0 * 1.2 * 0.9)).abs() < 1e-9),
                    ref other => panic!("unexpected {other:?}"),
                }
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_bound_arrow_draws_to_boundary() {
        let mut shape = boxed(ElementKind::Rectangle, "box");
        shape.roughness = 0.0;
        let mut arrow = Element::new(ElementKind::Arrow, Point::new(0.0, 50.0))
            .with_id("arrow")
            .with_size(150.0, 0.0);
        arrow.roughness = 0.0;
        arrow.end_binding_id = Some(ElementId::from("box"));
        let document = Document::from_elements(vec![shape, arrow]);
        let commands = frame(&RenderContext::new(&document, Size::new(400.0, 400.0)));

        let arrow_path = strokes(&commands).pop().unwrap().clone();
        let els = arrow_path.elements();
        assert_eq!(els[0], PathEl::MoveTo(Point::new(0.0, 50.0)));
        match els[1] {
            PathEl::LineTo(end) => {
                assert!((end.x - 100.0).abs() < 1e-9);
                assert!((end.y - 50.0).abs() < 1e-9);
            }
            ref other => panic!("unexpected {other:?}"),
        }
        // Shaft plus two barbs.
        let moves = els.iter().filter(|el| matches!(el, PathEl::MoveTo(_))).count();
        assert_eq!(moves, 3);
    }

    #[test]
    fn test_freedraw_polyline() {
        let mut element = Element::new(ElementKind::Freedraw, Point::new(0.0, 0.0)).with_id("f");
        element.points = vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0), Point::new(10.0, 0.0)];
        let document = Document::from_elements(vec![element]);
        let commands = frame(&RenderContext::new(&document, Size::new(100.0, 100.0)));
        let path = strokes(&commands)[0];
        assert_eq!(path.elements().len(), 4);
        assert_eq!(path.elements()[3], PathEl::LineTo(Point::new(10.0, 0.0)));
    }

    #[test]
    fn test_invalid_scale_skips_world() {
        let _ = env_logger::builder().is_test(true).try_init();
        let document = Document::from_elements(vec![boxed(ElementKind::Rectangle, "r")]);
        let mut viewport = Viewport::default();
        viewport.scale = f64::NAN;
        let commands = frame(&RenderContext::new(&document, Size::new(100.0, 100.0)).with_viewport(viewport));
        assert_eq!(commands.len(), 2);
    }

    #[test]
    fn test_context_from_editor() {
        let document = Document::from_elements(vec![boxed(ElementKind::Rectangle, "r")]);
        let mut editor = Editor::new(document);
        editor.set_grid(GridKind::Dot);
        editor.pointer_down(Point::new(150.0, 50.0), MouseButton::Left);
        editor.pointer_up();

        let ctx = RenderContext::from_editor(&editor, Size::new(100.0, 100.0));
        assert_eq!(ctx.selected.map(ElementId::as_str), Some("r"));
        assert!(ctx.editing.is_none());
        assert_eq!(ctx.grid, GridKind::Dot);

        let commands = frame(&ctx);
        assert!(commands.iter().any(|c| matches!(c, DrawCommand::StrokePath { style, .. } if !style.dash_pattern.is_empty())));
    }
}
