//! Interaction state machine.
//!
//! [`Editor`] owns the live document, the committed history and all UI
//! state. Hosts forward pointer, keyboard and wheel events to it and redraw
//! afterwards. Drags mutate the live document on every move; one history
//! snapshot is committed when the gesture ends.

use kurbo::{Point, Vec2};
use peniko::Color;

use crate::config::EditorConfig;
use crate::document::Document;
use crate::element::{
    Element, ElementId, ElementKind, FontFamily, FontStyle, FontWeight, TextAlign, TextDecoration,
};
use crate::geometry::{self, HitTolerance};
use crate::handles::{self, CursorHint, HandleDirection};
use crate::history::History;
use crate::input::{Key, Modifiers, MouseButton};
use crate::style::{StyleProperty, StyleSettings};
use crate::text::{self, ApproximateMeasure, FontSpec, TextMeasure};
use crate::theme::ThemePalette;
use crate::tools::ToolKind;
use crate::viewport::{GridKind, Viewport};

/// Callback receiving the document whenever the committed state changes.
pub type SaveCallback = Box<dyn FnMut(&Document)>;

static FALLBACK_MEASURE: ApproximateMeasure = ApproximateMeasure;

/// What the current gesture is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
    #[default]
    None,
    Drawing,
    Moving,
    Resizing,
    Panning,
    Writing,
}

/// Screen geometry and style of the text edit overlay.
///
/// Matches what the canvas draws for the element so the switch between
/// drawn and editable text is seamless.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    pub element_id: ElementId,
    pub text: String,
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub min_height: f64,
    /// Font size in screen units.
    pub font_size: f64,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    pub font_family: FontFamily,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub text_decoration: TextDecoration,
    pub text_align: TextAlign,
    pub color: Color,
    pub outline: Color,
}

/// State captured at pointer-down for the active gesture.
#[derive(Debug, Clone)]
struct Gesture {
    start: Point,
    /// Pre-gesture copy of the element being moved or resized.
    snapshot: Option<Element>,
    handle: Option<HandleDirection>,
}

/// The diagram editor.
pub struct Editor {
    document: Document,
    history: History,
    viewport: Viewport,
    tool: ToolKind,
    action: Action,
    selected: Option<ElementId>,
    /// New text element not yet inserted because it has no text.
    pending_text: Option<Element>,
    style: StyleSettings,
    theme: ThemePalette,
    grid: GridKind,
    config: EditorConfig,
    space_held: bool,
    hide_system_cursor: bool,
    hover_cursor: Option<CursorHint>,
    gesture: Option<Gesture>,
    last_pointer: Point,
    measurer: Option<Box<dyn TextMeasure>>,
    on_save: Option<SaveCallback>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Document::default())
    }
}

impl Editor {
    /// Create an editor for `document` with the default configuration.
    pub fn new(document: Document) -> Self {
        Self::with_config(document, EditorConfig::default())
    }

    pub fn with_config(document: Document, config: EditorConfig) -> Self {
        Self {
            history: History::new(document.clone(), config.max_history),
            viewport: Viewport::with_limits(&config),
            document,
            tool: ToolKind::default(),
            action: Action::None,
            selected: None,
            pending_text: None,
            style: StyleSettings::default(),
            theme: ThemePalette::default(),
            grid: GridKind::default(),
            config,
            space_held: false,
            hide_system_cursor: false,
            hover_cursor: None,
            gesture: None,
            last_pointer: Point::ZERO,
            measurer: None,
            on_save: None,
        }
    }

    /// Create an editor from serialized input. Bad input gives an empty
    /// document.
    pub fn load(json: &str) -> Self {
        Self::new(Document::load(json))
    }

    /// Register the callback invoked after every committed change.
    pub fn set_save_callback(&mut self, callback: impl FnMut(&Document) + 'static) {
        self.on_save = Some(Box::new(callback));
    }

    /// Use the host's text measurement from now on.
    pub fn attach_measurer(&mut self, measurer: Box<dyn TextMeasure>) {
        self.measurer = Some(measurer);
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn is_writing(&self) -> bool {
        self.action == Action::Writing
    }

    pub fn style(&self) -> &StyleSettings {
        &self.style
    }

    pub fn theme(&self) -> &ThemePalette {
        &self.theme
    }

    pub fn grid(&self) -> GridKind {
        self.grid
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn selected_id(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    /// The selected element, including a text element still being typed.
    pub fn selected_element(&self) -> Option<&Element> {
        let id = self.selected.as_ref()?;
        match &self.pending_text {
            Some(pending) if &pending.id == id => Some(pending),
            _ => self.document.get(id),
        }
    }

    /// Id of the element whose text is being edited.
    pub fn editing_id(&self) -> Option<&ElementId> {
        if self.is_writing() {
            self.selected.as_ref()
        } else {
            None
        }
    }

    /// Whether the property panel should be shown.
    pub fn panel_visible(&self) -> bool {
        self.selected.is_some() || self.tool.is_drawing_tool()
    }

    fn measure(&self) -> &dyn TextMeasure {
        measurer_or_fallback(&self.measurer)
    }

    fn hit_tolerance(&self) -> HitTolerance {
        HitTolerance::from(&self.config)
    }

    /// Handle tolerance converted to world units.
    fn handle_tolerance(&self) -> f64 {
        self.config.handle_tolerance / self.viewport.scale
    }

    // ---- Pointer events ----------------------------------------------

    /// Pointer pressed at a screen position.
    pub fn pointer_down(&mut self, screen: Point, button: MouseButton) {
        if self.is_writing() {
            // The click only ends the text session.
            self.finish_writing();
            return;
        }

        let world = self.viewport.screen_to_world(screen);
        self.last_pointer = screen;
        self.gesture = Some(Gesture {
            start: world,
            snapshot: None,
            handle: None,
        });

        if self.space_held || button == MouseButton::Middle || self.tool == ToolKind::Pan {
            self.action = Action::Panning;
            return;
        }

        match self.tool.element_kind() {
            None => self.select_at(world),
            Some(kind) => self.start_element(kind, world),
        }
    }

    fn select_at(&mut self, world: Point) {
        if let Some(selected) = self.selected_element() {
            let tolerance = self.handle_tolerance();
            if let Some(handle) = handles::hit_resize_handle(selected, world, tolerance) {
                let snapshot = selected.clone();
                self.gesture = Some(Gesture {
                    start: world,
                    snapshot: Some(snapshot),
                    handle: Some(handle.direction),
                });
                self.action = Action::Resizing;
                return;
            }
        }

        let tolerance = self.hit_tolerance();
        let hit = geometry::topmost_hit_at(world, &self.document.elements, &tolerance).cloned();
        match hit {
            Some(element) => {
                self.selected = Some(element.id.clone());
                self.style = StyleSettings::from_element(&element);
                self.gesture = Some(Gesture {
                    start: world,
                    snapshot: Some(element),
                    handle: None,
                });
                self.action = Action::Moving;
            }
            None => {
                self.selected = None;
                self.action = Action::None;
            }
        }
    }

    fn start_element(&mut self, kind: ElementKind, world: Point) {
        let mut element = Element::new(kind, world);
        self.style.apply_to(&mut element);
        self.selected = Some(element.id.clone());

        match kind {
            ElementKind::Text => {
                self.pending_text = Some(element);
                self.action = Action::Writing;
                return;
            }
            ElementKind::Freedraw => element.points.push(world),
            _ => {}
        }
        self.document.push(element);
        self.action = Action::Drawing;
    }

    /// Pointer moved to a screen position.
    pub fn pointer_move(&mut self, screen: Point) {
        let world = self.viewport.screen_to_world(screen);
        let screen_delta = screen - self.last_pointer;
        self.last_pointer = screen;

        if self.tool == ToolKind::Selection {
            let tolerance = self.handle_tolerance();
            self.hover_cursor = self
                .selected_element()
                .and_then(|el| handles::hit_resize_handle(el, world, tolerance))
                .map(|handle| handle.cursor());
        }

        match self.action {
            Action::Panning => self.viewport.pan(screen_delta),
            Action::Drawing => self.extend_drawing(world),
            Action::Moving | Action::Resizing => self.drag_selected(world),
            Action::None | Action::Writing => {}
        }
    }

    fn extend_drawing(&mut self, world: Point) {
        let Some(id) = self.selected.clone() else {
            return;
        };
        let Some(element) = self.document.get_mut(&id) else {
            return;
        };
        if element.kind == ElementKind::Freedraw {
            element.points.push(world);
        } else {
            element.width = world.x - element.x;
            element.height = world.y - element.y;
        }
    }

    fn drag_selected(&mut self, world: Point) {
        let Some(gesture) = &self.gesture else {
            return;
        };
        let Some(snapshot) = &gesture.snapshot else {
            return;
        };
        let delta = world - gesture.start;
        let updated = match gesture.handle {
            Some(direction) => direction.resize(snapshot, delta.x, delta.y),
            None => {
                let mut moved = snapshot.clone();
                moved.translate(delta.x, delta.y);
                moved
            }
        };
        self.apply_shape_update(updated);
    }

    /// Store a moved or resized shape and re-anchor its bound connectors.
    fn apply_shape_update(&mut self, shape: Element) {
        for connector_id in self.document.connectors_bound_to(&shape.id) {
            if let Some(connector) = self.document.get(&connector_id) {
                let updated = geometry::reanchor_connector(connector, &shape);
                self.document.replace(updated);
            }
        }
        self.document.replace(shape);
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) {
        match self.action {
            Action::Drawing => {
                if self.tool.element_kind().is_some_and(ElementKind::is_connector) {
                    self.bind_drawn_connector();
                }
                self.commit();
            }
            Action::Moving | Action::Resizing => self.commit(),
            Action::Writing => return,
            Action::None | Action::Panning => {}
        }
        self.action = Action::None;
        self.gesture = None;
    }

    fn bind_drawn_connector(&mut self) {
        let Some(id) = self.selected.clone() else {
            return;
        };
        let Some(connector) = self.document.get(&id) else {
            return;
        };
        let snap = self.config.snap_distance;
        let elements = &self.document.elements;
        let start = geometry::proximity_snap_target(connector.origin(), elements, Some(&id), snap);
        let end = geometry::proximity_snap_target(connector.far_point(), elements, Some(&id), snap);
        if start.is_some() || end.is_some() {
            log::debug!("Connector {id} bound: start={start:?} end={end:?}");
        }
        if let Some(connector) = self.document.get_mut(&id) {
            connector.start_binding_id = start;
            connector.end_binding_id = end;
        }
    }

    /// Double click: edit the text of the element under the pointer.
    pub fn double_click(&mut self, screen: Point) {
        if self.tool != ToolKind::Selection || self.is_writing() {
            return;
        }
        let world = self.viewport.screen_to_world(screen);
        let tolerance = self.hit_tolerance();
        let Some(element) = geometry::topmost_hit_at(world, &self.document.elements, &tolerance) else {
            return;
        };
        self.style.font_size = element.font_size;
        self.style.font_family = element.font_family;
        self.selected = Some(element.id.clone());
        self.action = Action::Writing;
        self.gesture = None;
    }

    /// Wheel scrolled. With Ctrl/Cmd the vertical delta zooms.
    pub fn wheel(&mut self, delta: Vec2, modifiers: Modifiers) {
        self.viewport
            .wheel(delta, modifiers.command(), self.config.wheel_zoom_factor);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_by(self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_by(-self.config.zoom_step);
    }

    // ---- Keyboard ---------------------------------------------------

    /// Key pressed. Returns true if the editor handled it.
    ///
    /// While a text input has focus, or text is being written, only Escape
    /// is handled and it ends the text session.
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers, text_input_focused: bool) -> bool {
        if text_input_focused || self.is_writing() {
            if key == Key::Escape && self.is_writing() {
                self.finish_writing();
                return true;
            }
            return false;
        }

        match key {
            Key::Space => {
                self.space_held = true;
                true
            }
            k if modifiers.command() && k.is_letter('z') => {
                if modifiers.shift {
                    self.redo();
                } else {
                    self.undo();
                }
                true
            }
            k if modifiers.command() && k.is_letter('y') => {
                self.redo();
                true
            }
            Key::Delete | Key::Backspace => self.delete_selected(),
            Key::Char(c) => match ToolKind::from_digit(c) {
                Some(tool) => {
                    self.set_tool(tool);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if key == Key::Space {
            self.space_held = false;
        }
    }

    // ---- Text -------------------------------------------------------

    /// Text of the edit overlay changed.
    pub fn text_changed(&mut self, new_text: &str) {
        if !self.is_writing() {
            return;
        }
        let measure = measurer_or_fallback(&self.measurer);
        let target = match self.pending_text.as_mut() {
            Some(pending) => Some(pending),
            None => match &self.selected {
                Some(id) => self.document.get_mut(id),
                None => None,
            },
        };
        let Some(element) = target else {
            return;
        };

        element.text = new_text.to_string();
        if element.kind == ElementKind::Text {
            let size = text::text_element_size(new_text, &FontSpec::from_element(element), measure, &self.config);
            element.width = size.width;
            element.height = size.height;
        }

        if !new_text.is_empty() {
            if let Some(pending) = self.pending_text.take() {
                self.document.push(pending);
            }
        }
    }

    /// End the text session.
    ///
    /// A text element left blank is discarded. Either way the document is
    /// committed, which is a no-op when it matches the last snapshot. The
    /// tool returns to selection.
    pub fn finish_writing(&mut self) {
        if !self.is_writing() {
            return;
        }
        let pending = self.pending_text.take();
        let blank_text = self
            .selected_element()
            .or(pending.as_ref())
            .is_some_and(|el| el.kind == ElementKind::Text && el.text.trim().is_empty());

        if blank_text {
            if let Some(id) = &self.selected {
                self.document.remove(id);
            }
            log::debug!("Discarded empty text element");
        }
        self.commit();

        self.action = Action::None;
        self.tool = ToolKind::Selection;
        self.selected = None;
        self.gesture = None;
    }

    /// Overlay geometry for the element being written, if any.
    pub fn text_overlay(&self) -> Option<TextOverlay> {
        if !self.is_writing() {
            return None;
        }
        let element = self.selected_element()?;
        let scale = self.viewport.scale;
        let rect = element.normalized_box();
        let min_width = self.config.text_min_width * scale;
        let font_size = element.font_size * scale;

        let mut top = rect.y0 * scale + self.viewport.pan_offset.y;
        let mut left = rect.x0 * scale + self.viewport.pan_offset.x;
        let mut width = rect.width() * scale;
        if element.kind != ElementKind::Text {
            let padding = self.config.label_padding * scale;
            top += padding;
            left += padding;
            width -= padding * 2.0;
        }

        Some(TextOverlay {
            element_id: element.id.clone(),
            text: element.text.clone(),
            top,
            left,
            width: width.max(min_width),
            min_height: font_size * self.config.line_height,
            font_size,
            line_height: self.config.line_height,
            font_family: element.font_family,
            font_weight: element.font_weight,
            font_style: element.font_style,
            text_decoration: element.text_decoration,
            text_align: element.text_align,
            color: self.theme.resolve_stroke(&element.stroke),
            outline: self.theme.primary,
        })
    }

    // ---- Panel, toolbar, history -----------------------------------------

    /// Write a panel property to the defaults and to the selected element.
    ///
    /// Outside a text session the change is committed immediately.
    pub fn update_property(&mut self, property: StyleProperty) {
        self.style.set(&property);

        let measure = measurer_or_fallback(&self.measurer);
        let target = match self.pending_text.as_mut() {
            Some(pending) => Some(pending),
            None => match &self.selected {
                Some(id) => self.document.get_mut(id),
                None => None,
            },
        };
        let Some(element) = target else {
            return;
        };
        property.apply_to(element);
        if element.kind == ElementKind::Text && !element.text.is_empty() {
            let size = text::text_element_size(&element.text, &FontSpec::from_element(element), measure, &self.config);
            element.width = size.width;
            element.height = size.height;
        }

        if !self.is_writing() {
            self.commit();
        }
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.is_writing() {
            self.finish_writing();
        }
        self.tool = tool;
        self.hover_cursor = None;
    }

    pub fn undo(&mut self) {
        if self.is_writing() {
            self.finish_writing();
        }
        let Some(snapshot) = self.history.undo() else {
            return;
        };
        self.document = snapshot.clone();
        self.after_history_move();
        log::debug!("Undo to step {}", self.history.step());
    }

    pub fn redo(&mut self) {
        if self.is_writing() {
            self.finish_writing();
        }
        let Some(snapshot) = self.history.redo() else {
            return;
        };
        self.document = snapshot.clone();
        self.after_history_move();
        log::debug!("Redo to step {}", self.history.step());
    }

    fn after_history_move(&mut self) {
        self.selected = None;
        self.action = Action::None;
        self.gesture = None;
        self.notify_save();
    }

    /// Delete the selected element. Connectors bound to it are detached.
    pub fn delete_selected(&mut self) -> bool {
        if self.is_writing() {
            return false;
        }
        let Some(id) = self.selected.take() else {
            return false;
        };
        if self.document.remove(&id).is_none() {
            return false;
        }
        self.commit();
        true
    }

    pub fn set_theme(&mut self, theme: ThemePalette) {
        self.theme = theme;
    }

    pub fn set_grid(&mut self, grid: GridKind) {
        self.grid = grid;
    }

    pub fn toggle_system_cursor(&mut self) {
        self.hide_system_cursor = !self.hide_system_cursor;
    }

    /// Cursor the host should show over the canvas.
    pub fn cursor(&self) -> CursorHint {
        if self.hide_system_cursor {
            return CursorHint::None;
        }
        if let Some(hover) = self.hover_cursor {
            return hover;
        }
        if self.tool == ToolKind::Pan || self.space_held {
            return CursorHint::Grab;
        }
        if self.tool == ToolKind::Selection {
            return CursorHint::Default;
        }
        CursorHint::Crosshair
    }

    /// Text measurement in use.
    pub fn text_measure(&self) -> &dyn TextMeasure {
        self.measure()
    }

    fn commit(&mut self) {
        if self.history.current() == Some(&self.document) {
            log::debug!("Skipping commit, document unchanged");
            return;
        }
        self.history.commit(self.document.clone());
        self.notify_save();
    }

    fn notify_save(&mut self) {
        if let Some(callback) = self.on_save.as_mut() {
            callback(&self.document);
        }
    }
}

fn measurer_or_fallback(measurer: &Option<Box<dyn TextMeasure>>) -> &dyn TextMeasure {
    match measurer.as_deref() {
        Some(measure) => measure,
        None => &FALLBACK_MEASURE,
    }
}
