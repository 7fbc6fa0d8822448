//! Property panel state: defaults for the next element and the option sets
//! the panel offers.

use crate::element::{
    ColorRef, Element, FillStyle, FontFamily, FontStyle, FontWeight, Roundness, TextAlign,
    TextDecoration,
};

/// Stroke swatches, `neutral` first.
pub const STROKE_PALETTE: [&str; 16] = [
    "neutral", "#000000", "#343a40", "#495057", "#c92a2a", "#a61e4d", "#862e9c", "#5f3dc4",
    "#364fc7", "#1864ab", "#0b7285", "#087f5b", "#2b8a3e", "#5c940d", "#e67700", "#d9480f",
];

/// Background swatches, `transparent` then `neutral` first.
pub const BACKGROUND_PALETTE: [&str; 18] = [
    "transparent", "neutral", "#ffffff", "#f8f9fa", "#ced4da", "#ffc9c9", "#fcc2d7", "#eebefa",
    "#d0bfff", "#bac8ff", "#a5d8ff", "#99e9f2", "#66d9e8", "#8ce99a", "#b2f2bb", "#d8f5a2",
    "#ffec99", "#ffc078",
];

/// Font size options with their panel labels.
pub const FONT_SIZES: [(&str, f64); 4] = [("S", 16.0), ("M", 24.0), ("L", 36.0), ("XL", 48.0)];

pub const STROKE_WIDTHS: [f64; 3] = [1.0, 2.0, 4.0];

/// Roughness options: architect, artist, cartoonist.
pub const ROUGHNESS_LEVELS: [f64; 3] = [0.0, 1.0, 2.0];

/// Style applied to newly created elements, and mirrored from the
/// selected element when one is picked.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSettings {
    pub stroke: ColorRef,
    pub fill: ColorRef,
    pub stroke_width: f64,
    pub roughness: f64,
    pub roundness: Roundness,
    pub fill_style: FillStyle,
    pub font_size: f64,
    pub font_family: FontFamily,
    pub text_align: TextAlign,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub text_decoration: TextDecoration,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            stroke: ColorRef::Neutral,
            fill: ColorRef::Transparent,
            stroke_width: 2.0,
            roughness: 1.0,
            roundness: Roundness::Sharp,
            fill_style: FillStyle::Hachure,
            font_size: 24.0,
            font_family: FontFamily::Hand,
            text_align: TextAlign::Center,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            text_decoration: TextDecoration::None,
        }
    }
}

impl StyleSettings {
    /// Copy every style field of `element`.
    pub fn from_element(element: &Element) -> Self {
        Self {
            stroke: element.stroke.clone(),
            fill: element.fill.clone(),
            stroke_width: element.stroke_width,
            roughness: element.roughness,
            roundness: element.roundness,
            fill_style: element.fill_style,
            font_size: element.font_size,
            font_family: element.font_family,
            text_align: element.text_align,
            font_weight: element.font_weight,
            font_style: element.font_style,
            text_decoration: element.text_decoration,
        }
    }

    /// Stamp these settings onto a new element.
    pub fn apply_to(&self, element: &mut Element) {
        element.stroke = self.stroke.clone();
        element.fill = self.fill.clone();
        element.stroke_width = self.stroke_width;
        element.roughness = self.roughness;
        element.roundness = self.roundness;
        element.fill_style = self.fill_style;
        element.font_size = self.font_size;
        element.font_family = self.font_family;
        element.text_align = self.text_align;
        element.font_weight = self.font_weight;
        element.font_style = self.font_style;
        element.text_decoration = self.text_decoration;
    }

    /// Set one property.
    pub fn set(&mut self, property: &StyleProperty) {
        match property {
            StyleProperty::Stroke(c) => self.stroke = c.clone(),
            StyleProperty::Fill(c) => self.fill = c.clone(),
            StyleProperty::StrokeWidth(w) => self.stroke_width = *w,
            StyleProperty::Roughness(r) => self.roughness = *r,
            StyleProperty::Roundness(r) => self.roundness = *r,
            StyleProperty::FillStyle(f) => self.fill_style = *f,
            StyleProperty::FontSize(s) => self.font_size = *s,
            StyleProperty::FontFamily(f) => self.font_family = *f,
            StyleProperty::TextAlign(a) => self.text_align = *a,
            StyleProperty::FontWeight(w) => self.font_weight = *w,
            StyleProperty::FontStyle(s) => self.font_style = *s,
            StyleProperty::TextDecoration(d) => self.text_decoration = *d,
        }
    }
}

/// A single property panel write.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleProperty {
    Stroke(ColorRef),
    Fill(ColorRef),
    StrokeWidth(f64),
    Roughness(f64),
    Roundness(Roundness),
    FillStyle(FillStyle),
    FontSize(f64),
    FontFamily(FontFamily),
    TextAlign(TextAlign),
    FontWeight(FontWeight),
    FontStyle(FontStyle),
    TextDecoration(TextDecoration),
}

impl StyleProperty {
    /// Write the property onto an element.
    pub fn apply_to(&self, element: &mut Element) {
        match self {
            StyleProperty::Stroke(c) => element.stroke = c.clone(),
            StyleProperty::Fill(c) => element.fill = c.clone(),
            StyleProperty::StrokeWidth(w) => element.stroke_width = *w,
            StyleProperty::Roughness(r) => element.roughness = *r,
            StyleProperty::Roundness(r) => element.roundness = *r,
            StyleProperty::FillStyle(f) => element.fill_style = *f,
            StyleProperty::FontSize(s) => element.font_size = *s,
            StyleProperty::FontFamily(f) => element.font_family = *f,
            StyleProperty::TextAlign(a) => element.text_align = *a,
            StyleProperty::FontWeight(w) => element.font_weight = *w,
            StyleProperty::FontStyle(s) => element.font_style = *s,
            StyleProperty::TextDecoration(d) => element.text_decoration = *d,
        }
    }

    /// Toggle bold relative to the current weight.
    pub fn toggle_bold(current: FontWeight) -> Self {
        StyleProperty::FontWeight(match current {
            FontWeight::Normal => FontWeight::Bold,
            FontWeight::Bold => FontWeight::Normal,
        })
    }

    pub fn toggle_italic(current: FontStyle) -> Self {
        StyleProperty::FontStyle(match current {
            FontStyle::Normal => FontStyle::Italic,
            FontStyle::Italic => FontStyle::Normal,
        })
    }

    pub fn toggle_underline(current: TextDecoration) -> Self {
        StyleProperty::TextDecoration(match current {
            TextDecoration::None => TextDecoration::Underline,
            TextDecoration::Underline => TextDecoration::None,
        })
    }
}
