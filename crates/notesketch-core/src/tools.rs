//! Toolbar tools.

use serde::{Deserialize, Serialize};

use crate::element::ElementKind;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Selection,
    Rectangle,
    Diamond,
    Ellipse,
    Arrow,
    Line,
    Freedraw,
    Text,
    Pan,
}

impl ToolKind {
    /// Toolbar order.
    pub const ALL: [ToolKind; 9] = [
        ToolKind::Selection,
        ToolKind::Rectangle,
        ToolKind::Diamond,
        ToolKind::Ellipse,
        ToolKind::Arrow,
        ToolKind::Line,
        ToolKind::Freedraw,
        ToolKind::Text,
        ToolKind::Pan,
    ];

    /// Tool bound to a digit key, `1` through `8`.
    pub fn from_digit(digit: char) -> Option<Self> {
        let index = digit.to_digit(10)?.checked_sub(1)? as usize;
        // Pan has no digit; it lives on the space bar.
        ToolKind::ALL[..8].get(index).copied()
    }

    /// Toolbar tooltip, including the shortcut.
    pub fn label(self) -> &'static str {
        match self {
            ToolKind::Selection => "Selection (1)",
            ToolKind::Rectangle => "Rectangle (2)",
            ToolKind::Diamond => "Diamond (3)",
            ToolKind::Ellipse => "Ellipse (4)",
            ToolKind::Arrow => "Arrow (5)",
            ToolKind::Line => "Line (6)",
            ToolKind::Freedraw => "Draw (7)",
            ToolKind::Text => "Text (8)",
            ToolKind::Pan => "Pan (Space)",
        }
    }

    /// Element kind this tool creates.
    pub fn element_kind(self) -> Option<ElementKind> {
        match self {
            ToolKind::Rectangle => Some(ElementKind::Rectangle),
            ToolKind::Diamond => Some(ElementKind::Diamond),
            ToolKind::Ellipse => Some(ElementKind::Ellipse),
            ToolKind::Arrow => Some(ElementKind::Arrow),
            ToolKind::Line => Some(ElementKind::Line),
            ToolKind::Freedraw => Some(ElementKind::Freedraw),
            ToolKind::Text => Some(ElementKind::Text),
            ToolKind::Selection | ToolKind::Pan => None,
        }
    }

    pub fn is_drawing_tool(self) -> bool {
        self.element_kind().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_shortcuts() {
        assert_eq!(ToolKind::from_digit('1'), Some(ToolKind::Selection));
        assert_eq!(ToolKind::from_digit('3'), Some(ToolKind::Diamond));
        assert_eq!(ToolKind::from_digit('7'), Some(ToolKind::Freedraw));
        assert_eq!(ToolKind::from_digit('8'), Some(ToolKind::Text));
        assert_eq!(ToolKind::from_digit('9'), None);
        assert_eq!(ToolKind::from_digit('0'), None);
        assert_eq!(ToolKind::from_digit('x'), None);
    }

    #[test]
    fn test_labels_match_shortcuts() {
        for (i, tool) in ToolKind::ALL[..8].iter().enumerate() {
            let digit = char::from_digit(i as u32 + 1, 10).unwrap();
            assert!(tool.label().ends_with(&format!("({digit})")));
            assert_eq!(ToolKind::from_digit(digit), Some(*tool));
        }
        assert!(!ToolKind::Pan.is_drawing_tool());
        assert_eq!(ToolKind::Text.element_kind(), Some(ElementKind::Text));
    }
}
