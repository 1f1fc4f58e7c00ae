use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

pub const TITLE_FONT_FAMILY: &str = "Source Sans Pro";
pub const TITLE_FONT_SIZE: f64 = 16.0;
pub const SUBTITLE_FONT_SIZE: f64 = 10.0;
pub const LINK_LABEL_FONT_SIZE: f64 = 8.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 16.0,
            font_weight: None,
        }
    }
}

impl TextStyle {
    /// Style of the card title run; focused cards render it bold.
    pub fn title(focused: bool) -> Self {
        Self {
            font_family: Some(TITLE_FONT_FAMILY.to_string()),
            font_size: TITLE_FONT_SIZE,
            font_weight: Some(if focused { "bold" } else { "400" }.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

/// Reads back the bounding box of a rendered text run.
///
/// In an interactive host this is the paint-then-`getBBox()` round-trip; the card composer only
/// ever asks once per title (see [`crate::card::CardComposer`]).
pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Font-free measurer: display columns × font size × factor.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.5
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.25
        } else {
            self.line_height_factor
        };

        let font_size = style.font_size.max(1.0);
        let lines: Vec<&str> = text.split('\n').collect();
        let max_columns = lines.iter().map(|l| l.width()).max().unwrap_or(0);

        TextMetrics {
            width: max_columns as f64 * font_size * char_width_factor,
            height: lines.len() as f64 * font_size * line_height_factor,
            line_count: lines.len(),
        }
    }
}

/// A fixed answer regardless of input, for hosts that already know the box.
#[derive(Debug, Clone, Copy)]
pub struct FixedTextMeasurer(pub TextMetrics);

impl TextMeasurer for FixedTextMeasurer {
    fn measure(&self, _text: &str, _style: &TextStyle) -> TextMetrics {
        self.0
    }
}
