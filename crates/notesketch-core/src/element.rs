//! Element data model.
//!
//! Elements are flat records in the persisted `{ "elements": [...] }`
//! payload. Field names follow the camelCase JSON schema and every field
//! except `id` and `type` has a default so partial records still load.

use std::fmt;

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Modulus of the Park-Miller generator the renderer seeds from each element.
const SEED_MODULUS: u32 = 2_147_483_647;

/// Unique identifier for an element.
///
/// Fresh ids are UUID v4 strings. Ids of loaded documents are kept verbatim,
/// whatever their format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Generate a new random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of a persisted element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Rectangle,
    Diamond,
    Ellipse,
    Arrow,
    Line,
    Freedraw,
    Text,
}

impl ElementKind {
    /// Arrows and lines: elements whose endpoints can bind to shapes.
    pub fn is_connector(self) -> bool {
        matches!(self, ElementKind::Arrow | ElementKind::Line)
    }

    /// Whether a connector endpoint may bind to an element of this kind.
    pub fn is_bindable(self) -> bool {
        matches!(
            self,
            ElementKind::Rectangle | ElementKind::Diamond | ElementKind::Ellipse
        )
    }

    /// Kinds that carry a closed outline and can be filled.
    pub fn has_fill(self) -> bool {
        self.is_bindable()
    }
}

/// A color reference as stored on an element.
///
/// `Neutral` and `Transparent` are sentinels resolved against the active
/// theme at draw time. Anything else is kept as a CSS color string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColorRef {
    #[default]
    Neutral,
    Transparent,
    Explicit(String),
}

impl ColorRef {
    pub fn is_transparent(&self) -> bool {
        matches!(self, ColorRef::Transparent)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ColorRef::Neutral => "neutral",
            ColorRef::Transparent => "transparent",
            ColorRef::Explicit(css) => css,
        }
    }
}

impl From<String> for ColorRef {
    fn from(value: String) -> Self {
        match value.trim() {
            "" | "neutral" => ColorRef::Neutral,
            "transparent" => ColorRef::Transparent,
            _ => ColorRef::Explicit(value),
        }
    }
}

impl From<&str> for ColorRef {
    fn from(value: &str) -> Self {
        ColorRef::from(value.to_string())
    }
}

impl From<ColorRef> for String {
    fn from(value: ColorRef) -> Self {
        match value {
            ColorRef::Explicit(css) => css,
            other => other.as_str().to_string(),
        }
    }
}

/// Corner treatment for rectangles/diamonds, curve treatment for connectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Roundness {
    #[default]
    Sharp,
    Round,
}

/// Interior fill pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillStyle {
    #[default]
    Hachure,
    CrossHatch,
    Solid,
}

/// Font family, persisted as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum FontFamily {
    /// Handwritten face (code 1).
    #[default]
    Hand,
    /// Sans-serif face (code 2).
    Sans,
    /// Monospace face (code 3).
    Mono,
}

impl FontFamily {
    /// CSS font stack used when the host lays out text.
    pub fn css_stack(self) -> &'static str {
        match self {
            FontFamily::Hand => "\"Caveat\", cursive",
            FontFamily::Sans => "sans-serif",
            FontFamily::Mono => "monospace",
        }
    }
}

impl From<u8> for FontFamily {
    fn from(code: u8) -> Self {
        match code {
            2 => FontFamily::Sans,
            3 => FontFamily::Mono,
            _ => FontFamily::Hand,
        }
    }
}

impl From<FontFamily> for u8 {
    fn from(family: FontFamily) -> Self {
        match family {
            FontFamily::Hand => 1,
            FontFamily::Sans => 2,
            FontFamily::Mono => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
}

/// Which endpoint of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorEnd {
    Start,
    End,
}

/// One persisted drawable object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Top-left for shapes, start point for connectors.
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    /// Signed extent; the sign encodes the drag direction.
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    /// Absolute world points, freedraw only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<Point>,
    #[serde(default)]
    pub stroke: ColorRef,
    #[serde(default = "default_fill")]
    pub fill: ColorRef,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default = "default_roughness")]
    pub roughness: f64,
    #[serde(default)]
    pub roundness: Roundness,
    #[serde(default)]
    pub fill_style: FillStyle,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub font_family: FontFamily,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub text_decoration: TextDecoration,
    /// Fixes the jitter of the sketch renderer.
    #[serde(default = "generate_seed")]
    pub seed: u32,
    #[serde(default)]
    pub start_binding_id: Option<ElementId>,
    #[serde(default)]
    pub end_binding_id: Option<ElementId>,
}

fn default_fill() -> ColorRef {
    ColorRef::Transparent
}

fn default_stroke_width() -> f64 {
    2.0
}

fn default_roughness() -> f64 {
    1.0
}

fn default_font_size() -> f64 {
    24.0
}

/// Generate a seed for a new element.
///
/// The result lies in `[1, 2^31 - 2]`, the valid state range of the
/// renderer's Park-Miller generator.
pub fn generate_seed() -> u32 {
    use std::sync::atomic::{AtomicU32, Ordering};

    static SEED_COUNTER: AtomicU32 = AtomicU32::new(1);
    let counter = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    let mut x = counter.wrapping_mul(0x9E37_79B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EB_CA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2_AE35);
    x ^= x >> 16;
    x % (SEED_MODULUS - 1) + 1
}

impl Element {
    /// Create an element of the given kind at `origin` with zero size and
    /// default style.
    pub fn new(kind: ElementKind, origin: Point) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            x: origin.x,
            y: origin.y,
            width: 0.0,
            height: 0.0,
            points: Vec::new(),
            stroke: ColorRef::Neutral,
            fill: default_fill(),
            stroke_width: default_stroke_width(),
            roughness: default_roughness(),
            roundness: Roundness::Sharp,
            fill_style: FillStyle::Hachure,
            text: String::new(),
            font_size: default_font_size(),
            font_family: FontFamily::Hand,
            text_align: TextAlign::Center,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            text_decoration: TextDecoration::None,
            seed: generate_seed(),
            start_binding_id: None,
            end_binding_id: None,
        }
    }

    /// Builder-style id override.
    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = id.into();
        self
    }

    /// Builder-style size override.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Raw far point `(x + width, y + height)`. For connectors, the stored end.
    pub fn far_point(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    /// Axis-aligned box with non-negative extents.
    pub fn normalized_box(&self) -> Rect {
        normalized_box(self.origin(), self.width, self.height)
    }

    /// Same as [`Element::normalized_box`]; the name reads better at call
    /// sites that want corner coordinates.
    pub fn bounds(&self) -> Rect {
        self.normalized_box()
    }

    pub fn center(&self) -> Point {
        self.normalized_box().center()
    }

    /// Binding id for one end of a connector.
    pub fn binding(&self, end: ConnectorEnd) -> Option<&ElementId> {
        match end {
            ConnectorEnd::Start => self.start_binding_id.as_ref(),
            ConnectorEnd::End => self.end_binding_id.as_ref(),
        }
    }

    /// Whether either end of this connector is bound to `id`.
    pub fn is_bound_to(&self, id: &ElementId) -> bool {
        self.start_binding_id.as_ref() == Some(id) || self.end_binding_id.as_ref() == Some(id)
    }

    /// Translate the element, including freedraw points.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
        for point in &mut self.points {
            point.x += dx;
            point.y += dy;
        }
    }
}

/// Resolve a signed origin/extent pair into a canonical rectangle.
pub fn normalized_box(origin: Point, width: f64, height: f64) -> Rect {
    let x = if width < 0.0 { origin.x + width } else { origin.x };
    let y = if height < 0.0 { origin.y + height } else { origin.y };
    Rect::new(x, y, x + width.abs(), y + height.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_box_flips_negative_extents() {
        let el = Element::new(ElementKind::Rectangle, Point::new(100.0, 50.0)).with_size(-40.0, -20.0);
        let rect = el.normalized_box();
        assert!((rect.x0 - 60.0).abs() < f64::EPSILON);
        assert!((rect.y0 - 30.0).abs() < f64::EPSILON);
        assert!((rect.width() - 40.0).abs() < f64::EPSILON);
        assert!((rect.height() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalized_box_idempotent() {
        let once = normalized_box(Point::new(10.0, 10.0), -5.0, 7.0);
        let twice = normalized_box(once.origin(), once.width(), once.height());
        assert_eq!(once, twice);
        assert!(once.width() >= 0.0 && once.height() >= 0.0);
    }

    #[test]
    fn test_color_ref_strings() {
        assert_eq!(ColorRef::from("neutral"), ColorRef::Neutral);
        assert_eq!(ColorRef::from(""), ColorRef::Neutral);
        assert_eq!(ColorRef::from("transparent"), ColorRef::Transparent);
        assert_eq!(
            ColorRef::from("#c92a2a"),
            ColorRef::Explicit("#c92a2a".to_string())
        );
        assert_eq!(String::from(ColorRef::Transparent), "transparent");
    }

    #[test]
    fn test_partial_record_uses_defaults() {
        let el: Element = serde_json::from_str(r#"{"id":"a","type":"rectangle","x":5}"#).unwrap();
        assert_eq!(el.id.as_str(), "a");
        assert!((el.x - 5.0).abs() < f64::EPSILON);
        assert_eq!(el.stroke, ColorRef::Neutral);
        assert_eq!(el.fill, ColorRef::Transparent);
        assert!((el.stroke_width - 2.0).abs() < f64::EPSILON);
        assert!((el.font_size - 24.0).abs() < f64::EPSILON);
        assert!(el.start_binding_id.is_none());
        assert!(el.seed >= 1);
    }

    #[test]
    fn test_json_field_names() {
        let mut el = Element::new(ElementKind::Arrow, Point::ZERO).with_id("arrow-1");
        el.fill_style = FillStyle::CrossHatch;
        el.font_family = FontFamily::Mono;
        el.end_binding_id = Some(ElementId::from("rect-1"));
        let value = serde_json::to_value(&el).unwrap();
        assert_eq!(value["type"], "arrow");
        assert_eq!(value["fillStyle"], "cross-hatch");
        assert_eq!(value["fontFamily"], 3);
        assert_eq!(value["endBindingId"], "rect-1");
        assert!(value["startBindingId"].is_null());
        assert_eq!(value["strokeWidth"], 2.0);
        assert!(value.get("points").is_none());
    }

    #[test]
    fn test_seeds_stay_in_generator_range() {
        for _ in 0..1000 {
            let seed = generate_seed();
            assert!(seed >= 1 && seed < SEED_MODULUS);
        }
    }

    #[test]
    fn test_translate_moves_points() {
        let mut el = Element::new(ElementKind::Freedraw, Point::new(1.0, 1.0));
        el.points = vec![Point::new(1.0, 1.0), Point::new(3.0, 4.0)];
        el.translate(10.0, -1.0);
        assert_eq!(el.origin(), Point::new(11.0, 0.0));
        assert_eq!(el.points[1], Point::new(13.0, 3.0));
    }
}
