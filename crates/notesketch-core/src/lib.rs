//! notesketch core library
//!
//! Platform-agnostic document model, geometry and interaction state for the
//! notesketch diagram editor.

pub mod config;
pub mod document;
pub mod editor;
pub mod element;
pub mod geometry;
pub mod handles;
pub mod history;
pub mod input;
pub mod style;
pub mod text;
pub mod theme;
pub mod tools;
pub mod viewport;

pub use config::{ConfigError, EditorConfig};
pub use document::{Document, DocumentError};
pub use editor::{Action, Editor, SaveCallback, TextOverlay};
pub use element::{
    ColorRef, ConnectorEnd, Element, ElementId, ElementKind, FillStyle, FontFamily, FontStyle,
    FontWeight, Roundness, TextAlign, TextDecoration,
};
pub use handles::{CursorHint, HandleDirection, ResizeHandle};
pub use history::History;
pub use input::{Key, Modifiers, MouseButton};
pub use style::{StyleProperty, StyleSettings};
pub use text::{FontSpec, TextMeasure};
pub use theme::{ThemeError, ThemePalette};
pub use tools::ToolKind;
pub use viewport::{GridKind, Viewport};
