//! Title truncation and the fixed two-line subtitle wrap.
//!
//! Both rules cut on character boundaries (Unicode scalar values) with no word awareness; the
//! break points are part of the rendered contract.

use serde::{Deserialize, Serialize};

pub const TITLE_MAX_CHARS: usize = 30;
pub const ELLIPSIS: &str = "...";

pub const SUBTITLE_SINGLE_LINE_MAX: usize = 55;
pub const SUBTITLE_LINE_CHARS: usize = 45;
pub const SUBTITLE_MAX_CHARS: usize = 90;
/// Vertical advance of the second subtitle line.
pub const SUBTITLE_LINE_DY: f64 = 12.0;

fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let mut indices = s.char_indices().map(|(i, _)| i).chain(std::iter::once(s.len()));
    let from = indices.nth(start).unwrap_or(s.len());
    let to = if end > start {
        indices.nth(end - start - 1).unwrap_or(s.len())
    } else {
        from
    };
    &s[from..to]
}

pub fn truncate_title(title: &str) -> String {
    if title.chars().count() <= TITLE_MAX_CHARS {
        return title.to_string();
    }
    format!("{}{ELLIPSIS}", char_slice(title, 0, TITLE_MAX_CHARS))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "lines", rename_all = "camelCase")]
pub enum SubtitleLines {
    Single(String),
    Wrapped(String, String),
}

impl SubtitleLines {
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Single(line) => vec![line.as_str()],
            Self::Wrapped(first, second) => vec![first.as_str(), second.as_str()],
        }
    }
}

pub fn wrap_subtitle(subtitle: &str) -> SubtitleLines {
    let n = subtitle.chars().count();
    if n <= SUBTITLE_SINGLE_LINE_MAX {
        return SubtitleLines::Single(subtitle.to_string());
    }
    let first = char_slice(subtitle, 0, SUBTITLE_LINE_CHARS).to_string();
    let mut second = char_slice(subtitle, SUBTITLE_LINE_CHARS, SUBTITLE_MAX_CHARS).to_string();
    if n > SUBTITLE_MAX_CHARS {
        second.push_str(ELLIPSIS);
    }
    SubtitleLines::Wrapped(first, second)
}
