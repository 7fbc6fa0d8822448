//! Text measurement and layout for labels and text elements.

use kurbo::{Point, Size};

use crate::config::EditorConfig;
use crate::element::{Element, ElementKind, FontFamily, FontStyle, FontWeight, TextAlign, TextDecoration};

/// Font used to draw or measure a run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub size: f64,
    pub family: FontFamily,
    pub weight: FontWeight,
    pub style: FontStyle,
}

impl FontSpec {
    pub fn from_element(element: &Element) -> Self {
        Self {
            size: element.font_size,
            family: element.font_family,
            weight: element.font_weight,
            style: element.font_style,
        }
    }

    /// CSS `font` shorthand, e.g. `italic bold 24px sans-serif`.
    pub fn css(&self) -> String {
        let style = match self.style {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        };
        let weight = match self.weight {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        };
        format!("{style} {weight} {}px {}", self.size, self.family.css_stack())
    }
}

/// Measures the advance width of a single line of text.
pub trait TextMeasure {
    fn measure_text(&self, text: &str, font: &FontSpec) -> f64;
}

/// Fixed-advance estimate used until the host attaches a real measurer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMeasure;

impl ApproximateMeasure {
    /// Advance per character as a fraction of the font size.
    pub const ADVANCE: f64 = 0.6;
}

impl TextMeasure for ApproximateMeasure {
    fn measure_text(&self, text: &str, font: &FontSpec) -> f64 {
        text.chars().count() as f64 * font.size * Self::ADVANCE
    }
}

/// Greedy word wrap.
///
/// Explicit newlines start new lines. Within a paragraph a word joins the
/// current line only while the joined width stays strictly below
/// `max_width`. A single word wider than the limit gets its own line.
pub fn wrap_lines(text: &str, max_width: f64, font: &FontSpec, measure: &dyn TextMeasure) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut words = paragraph.split(' ');
        let mut current = words.next().unwrap_or_default().to_string();
        for word in words {
            let candidate = format!("{current} {word}");
            if measure.measure_text(&candidate, font) < max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }
    lines
}

/// One positioned line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    /// Alignment anchor on the line's top edge.
    pub anchor: Point,
    /// Measured advance width.
    pub width: f64,
}

impl TextLine {
    /// Horizontal extent of the line given the alignment of its anchor.
    pub fn span(&self, align: TextAlign) -> (f64, f64) {
        match align {
            TextAlign::Left => (self.anchor.x, self.anchor.x + self.width),
            TextAlign::Center => (self.anchor.x - self.width / 2.0, self.anchor.x + self.width / 2.0),
            TextAlign::Right => (self.anchor.x - self.width, self.anchor.x),
        }
    }
}

/// Laid out text of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<TextLine>,
    pub font: FontSpec,
    pub align: TextAlign,
    pub line_height: f64,
    pub decoration: TextDecoration,
}

impl TextLayout {
    /// Underline segments, one per line, at 90% of the line height.
    pub fn underlines(&self) -> Vec<(Point, Point)> {
        if self.decoration != TextDecoration::Underline {
            return Vec::new();
        }
        self.lines
            .iter()
            .map(|line| {
                let y = line.anchor.y + self.line_height * 0.9;
                let (x0, x1) = line.span(self.align);
                (Point::new(x0, y), Point::new(x1, y))
            })
            .collect()
    }
}

/// Lay out the text of an element, or `None` if it has no text.
///
/// Text elements keep their explicit lines and start at the box origin.
/// Shape labels wrap to the box width minus padding on both sides and are
/// inset by the padding.
pub fn layout_element_text(element: &Element, measure: &dyn TextMeasure, config: &EditorConfig) -> Option<TextLayout> {
    if element.text.is_empty() {
        return None;
    }
    let font = FontSpec::from_element(element);
    let rect = element.normalized_box();
    let is_text = element.kind == ElementKind::Text;
    let inset = if is_text { 0.0 } else { config.label_padding };

    let lines: Vec<String> = if is_text {
        element.text.split('\n').map(str::to_string).collect()
    } else {
        let max_width = (rect.width() - config.label_padding * 2.0).max(0.0);
        wrap_lines(&element.text, max_width, &font, measure)
    };

    let anchor_x = match element.text_align {
        TextAlign::Left => rect.x0 + inset,
        TextAlign::Center => rect.x0 + rect.width() / 2.0,
        TextAlign::Right => rect.x1 - inset,
    };
    let top = rect.y0 + inset;
    let line_height = element.font_size * config.line_height;

    let lines = lines
        .into_iter()
        .enumerate()
        .map(|(i, text)| TextLine {
            width: measure.measure_text(&text, &font),
            anchor: Point::new(anchor_x, top + i as f64 * line_height),
            text,
        })
        .collect();

    Some(TextLayout {
        lines,
        font,
        align: element.text_align,
        line_height,
        decoration: element.text_decoration,
    })
}

/// Box of a text element holding `text`.
///
/// Width is the widest line plus padding, at least the minimum width.
/// Height is one line height per line, at least one line.
pub fn text_element_size(text: &str, font: &FontSpec, measure: &dyn TextMeasure, config: &EditorConfig) -> Size {
    let line_height = font.size * config.line_height;
    let mut line_count = 0usize;
    let mut widest: f64 = 0.0;
    for line in text.split('\n') {
        line_count += 1;
        widest = widest.max(measure.measure_text(line, font));
    }
    Size::new(
        (widest + config.text_width_padding).max(config.text_min_width),
        (line_count as f64 * line_height).max(line_height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is 10 units wide.
    struct FixedMeasure;

    impl TextMeasure for FixedMeasure {
        fn measure_text(&self, text: &str, _font: &FontSpec) -> f64 {
            text.chars().count() as f64 * 10.0
        }
    }

    fn font() -> FontSpec {
        FontSpec {
            size: 20.0,
            family: FontFamily::Sans,
            weight: FontWeight::Normal,
            style: FontStyle::Normal,
        }
    }

    #[test]
    fn test_wrap_lines_greedy() {
        let lines = wrap_lines("aa bb cc dd", 60.0, &font(), &FixedMeasure);
        assert_eq!(lines, vec!["aa bb", "cc dd"]);

        // "aa bb" is exactly 50 wide; the strict comparison pushes bb down.
        let lines = wrap_lines("aa bb", 50.0, &font(), &FixedMeasure);
        assert_eq!(lines, vec!["aa", "bb"]);
    }

    #[test]
    fn test_wrap_lines_newlines_and_long_words() {
        let lines = wrap_lines("one\n\ntwo verylongword", 50.0, &font(), &FixedMeasure);
        assert_eq!(lines, vec!["one", "", "two", "verylongword"]);
        assert!(wrap_lines("", 50.0, &font(), &FixedMeasure).is_empty());
    }

    #[test]
    fn test_label_layout_is_padded() {
        let mut el = Element::new(ElementKind::Rectangle, Point::new(0.0, 0.0)).with_size(100.0, 100.0);
        el.text = "hello world".into();
        el.font_size = 20.0;
        el.text_align = TextAlign::Left;
        let layout = layout_element_text(&el, &FixedMeasure, &EditorConfig::default()).unwrap();
        // 80 units available, "hello world" needs 110.
        assert_eq!(layout.lines.len(), 2);
        assert_eq!(layout.lines[0].anchor, Point::new(10.0, 10.0));
        assert!((layout.lines[1].anchor.y - 34.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_element_layout_keeps_lines() {
        let mut el = Element::new(ElementKind::Text, Point::new(5.0, 5.0)).with_size(200.0, 60.0);
        el.text = "a very long line that is not wrapped\nsecond".into();
        el.text_align = TextAlign::Right;
        el.text_decoration = TextDecoration::Underline;
        let layout = layout_element_text(&el, &FixedMeasure, &EditorConfig::default()).unwrap();
        assert_eq!(layout.lines.len(), 2);
        assert!((layout.lines[0].anchor.x - 205.0).abs() < f64::EPSILON);
        assert!((layout.lines[0].anchor.y - 5.0).abs() < f64::EPSILON);

        let underlines = layout.underlines();
        let (start, end) = underlines[1];
        assert!((end.x - 205.0).abs() < f64::EPSILON);
        assert!((start.x - 145.0).abs() < f64::EPSILON);
        assert!((start.y - (5.0 + 24.0 * 1.2 + 24.0 * 1.2 * 0.9)).abs() < 1e-9);
    }

    #[test]
    fn test_no_layout_without_text() {
        let el = Element::new(ElementKind::Ellipse, Point::ZERO).with_size(10.0, 10.0);
        assert!(layout_element_text(&el, &FixedMeasure, &EditorConfig::default()).is_none());
    }

    #[test]
    fn test_text_element_size() {
        let config = EditorConfig::default();
        let size = text_element_size("abc\nabcdefgh", &font(), &FixedMeasure, &config);
        assert!((size.width - 100.0).abs() < f64::EPSILON);
        assert!((size.height - 48.0).abs() < 1e-9);

        let empty = text_element_size("", &font(), &FixedMeasure, &config);
        assert!((empty.width - 50.0).abs() < f64::EPSILON);
        assert!((empty.height - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_font_css() {
        let mut f = font();
        f.weight = FontWeight::Bold;
        assert_eq!(f.css(), "normal bold 20px sans-serif");
    }
}
