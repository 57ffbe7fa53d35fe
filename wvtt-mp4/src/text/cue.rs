/*
    REFERENCES
    ----------

    1. https://github.com/shaka-project/shaka-player/blob/9ce2f675d88d5de6f779f2a62a4f4af2bcc14611/lib/text/cue.js
    2. https://w3c.github.io/webvtt/#cue-settings

*/

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A single timed text entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Cue {
    /// Start time in seconds.
    pub start_time: f64,
    /// End time in seconds.
    pub end_time: f64,
    pub id: Option<String>,
    /// Cue text, markup is kept as is.
    pub text: String,
    /// Settings applied to this cue, in the order they were read.
    pub settings: Vec<CueSetting>,
}

impl Cue {
    pub fn new(start_time: f64, end_time: f64, text: impl Into<String>) -> Self {
        Self {
            start_time,
            end_time,
            id: None,
            text: text.into(),
            settings: Vec::new(),
        }
    }

    /// Settings joined back into a WebVTT settings line.
    pub fn settings_line(&self) -> String {
        self.settings
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A styling directive parsed from a cue settings token.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CueSetting {
    Align(TextAlign),
    Vertical(WritingMode),
    /// Cue box size, as a percentage of the video.
    Size(u8),
    Position {
        percent: u8,
        align: Option<PositionAlign>,
    },
    Line {
        value: LineValue,
        align: Option<LineAlign>,
    },
}

impl fmt::Display for CueSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Align(align) => write!(f, "align:{align}"),
            Self::Vertical(mode) => write!(f, "vertical:{mode}"),
            Self::Size(size) => write!(f, "size:{size}%"),
            Self::Position { percent, align } => {
                write!(f, "position:{percent}%")?;
                if let Some(align) = align {
                    write!(f, ",{align}")?;
                }
                Ok(())
            }
            Self::Line { value, align } => {
                write!(f, "line:{value}")?;
                if let Some(align) = align {
                    write!(f, ",{align}")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TextAlign {
    Start,
    Center,
    End,
    Left,
    Right,
}

impl fmt::Display for TextAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum WritingMode {
    /// Vertical, growing left to right.
    VerticalLr,
    /// Vertical, growing right to left.
    VerticalRl,
}

impl fmt::Display for WritingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::VerticalLr => "lr",
            Self::VerticalRl => "rl",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PositionAlign {
    LineLeft,
    LineRight,
    Center,
    Start,
    End,
}

impl fmt::Display for PositionAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LineLeft => "line-left",
            Self::LineRight => "line-right",
            Self::Center => "center",
            Self::Start => "start",
            Self::End => "end",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LineAlign {
    Start,
    Center,
    End,
}

impl fmt::Display for LineAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LineValue {
    /// Line number, snapped to lines. Negative values count from the bottom.
    Number(i32),
    /// Percentage of the video height, not snapped to lines.
    Percentage(f64),
}

impl fmt::Display for LineValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Percentage(percent) => write!(f, "{percent}%"),
        }
    }
}

/// A cue setting that was dropped because it could not be understood.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SettingWarning {
    pub token: String,
    /// Start time of the cue the token belonged to.
    pub start_time: f64,
}
