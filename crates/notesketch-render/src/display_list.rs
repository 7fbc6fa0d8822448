//! Recording surface.

use kurbo::{Affine, BezPath, Point, Rect, Stroke};
use notesketch_core::element::TextAlign;
use notesketch_core::text::{ApproximateMeasure, FontSpec, TextMeasure};
use peniko::Color;

use crate::surface::Surface;

/// One recorded [`Surface`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetTransform(Affine),
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokePath {
        path: BezPath,
        style: Stroke,
        color: Color,
    },
    FillPath {
        path: BezPath,
        color: Color,
    },
    PushClip(BezPath),
    PopClip,
    FillText {
        text: String,
        anchor: Point,
        align: TextAlign,
        font: FontSpec,
        color: Color,
    },
}

/// A [`Surface`] that records every call for later replay.
///
/// Text is measured with the attached measurer, or with
/// [`ApproximateMeasure`] when none is attached.
#[derive(Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
    measurer: Option<Box<dyn TextMeasure>>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record with a host-provided text measurer.
    pub fn with_measurer(measurer: Box<dyn TextMeasure>) -> Self {
        Self {
            commands: Vec::new(),
            measurer: Some(measurer),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop recorded commands, keeping the measurer.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Issue every recorded command, in order, to `surface`.
    pub fn replay<S: Surface + ?Sized>(&self, surface: &mut S) {
        for command in &self.commands {
            match command {
                DrawCommand::SetTransform(transform) => surface.set_transform(*transform),
                DrawCommand::FillRect { rect, color } => surface.fill_rect(*rect, *color),
                DrawCommand::StrokePath { path, style, color } => surface.stroke_path(path, style, *color),
                DrawCommand::FillPath { path, color } => surface.fill_path(path, *color),
                DrawCommand::PushClip(path) => surface.push_clip(path),
                DrawCommand::PopClip => surface.pop_clip(),
                DrawCommand::FillText {
                    text,
                    anchor,
                    align,
                    font,
                    color,
                } => surface.fill_text(text, *anchor, *align, font, *color),
            }
        }
    }
}

impl TextMeasure for DisplayList {
    fn measure_text(&self, text: &str, font: &FontSpec) -> f64 {
        match &self.measurer {
            Some(measurer) => measurer.measure_text(text, font),
            None => ApproximateMeasure.measure_text(text, font),
        }
    }
}

impl Surface for DisplayList {
    fn set_transform(&mut self, transform: Affine) {
        self.commands.push(DrawCommand::SetTransform(transform));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_path(&mut self, path: &BezPath, style: &Stroke, color: Color) {
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            style: style.clone(),
            color,
        });
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.commands.push(DrawCommand::FillPath {
            path: path.clone(),
            color,
        });
    }

    fn push_clip(&mut self, path: &BezPath) {
        self.commands.push(DrawCommand::PushClip(path.clone()));
    }

    fn pop_clip(&mut self) {
        self.commands.push(DrawCommand::PopClip);
    }

    fn fill_text(&mut self, text: &str, anchor: Point, align: TextAlign, font: &FontSpec, color: Color) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            anchor,
            align,
            font: *font,
            color,
        });
    }
}
