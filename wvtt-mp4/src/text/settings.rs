//! WebVTT cue settings grammar.

/*
    REFERENCES
    ----------

    1. https://github.com/shaka-project/shaka-player/blob/f539147d480fff9cc8d685f3aac0e6f5dc28a182/lib/text/vtt_text_parser.js
    2. https://w3c.github.io/webvtt/#cue-settings

*/

use super::{
    Cue,
    cue::{CueSetting, LineAlign, LineValue, PositionAlign, TextAlign, WritingMode},
};
use regex::Regex;
use std::sync::LazyLock;

static ALIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^align:(start|middle|center|end|left|right)$").unwrap());
static VERTICAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^vertical:(lr|rl)$").unwrap());
static SIZE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^size:(\d{1,2}|100)%$").unwrap());
static POSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^position:(\d{1,2}|100)%(?:,(line-left|line-right|center|start|end))?$").unwrap()
});
static LINE_PERCENTAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^line:(\d{1,2}(?:\.\d+)?|100)%(?:,(start|end|center))?$").unwrap()
});
static LINE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^line:(-?\d+)(?:,(start|end|center))?$").unwrap());

/// Split a settings line into tokens (runs of non-whitespace characters).
pub fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split_whitespace()
}

/// Apply one settings token to the cue.
///
/// Returns false, leaving the cue untouched, when the token is not a
/// recognized setting.
pub fn parse_setting(cue: &mut Cue, word: &str) -> bool {
    match setting(word) {
        Some(setting) => {
            cue.settings.push(setting);
            true
        }
        None => false,
    }
}

fn setting(word: &str) -> Option<CueSetting> {
    if let Some(captures) = ALIGN.captures(word) {
        return Some(CueSetting::Align(match &captures[1] {
            "start" => TextAlign::Start,
            "middle" | "center" => TextAlign::Center,
            "end" => TextAlign::End,
            "left" => TextAlign::Left,
            _ => TextAlign::Right,
        }));
    }

    if let Some(captures) = VERTICAL.captures(word) {
        return Some(CueSetting::Vertical(match &captures[1] {
            "lr" => WritingMode::VerticalLr,
            _ => WritingMode::VerticalRl,
        }));
    }

    if let Some(captures) = SIZE.captures(word) {
        return Some(CueSetting::Size(captures[1].parse().ok()?));
    }

    if let Some(captures) = POSITION.captures(word) {
        return Some(CueSetting::Position {
            percent: captures[1].parse().ok()?,
            align: captures.get(2).map(|x| match x.as_str() {
                "line-left" => PositionAlign::LineLeft,
                "line-right" => PositionAlign::LineRight,
                "center" => PositionAlign::Center,
                "start" => PositionAlign::Start,
                _ => PositionAlign::End,
            }),
        });
    }

    if let Some(captures) = LINE_PERCENTAGE.captures(word) {
        return Some(CueSetting::Line {
            value: LineValue::Percentage(captures[1].parse().ok()?),
            align: captures.get(2).map(|x| line_align(x.as_str())),
        });
    }

    if let Some(captures) = LINE_NUMBER.captures(word) {
        return Some(CueSetting::Line {
            value: LineValue::Number(captures[1].parse().ok()?),
            align: captures.get(2).map(|x| line_align(x.as_str())),
        });
    }

    None
}

fn line_align(value: &str) -> LineAlign {
    match value {
        "start" => LineAlign::Start,
        "center" => LineAlign::Center,
        _ => LineAlign::End,
    }
}
