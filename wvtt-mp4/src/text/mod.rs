//! Vtt cue extraction from mp4 segments.

/*
    REFERENCES
    ----------

    1. https://github.com/shaka-project/shaka-player/tree/main/lib/text

*/

mod cue;
mod mp4_vtt_parser;
pub mod settings;
mod subtitles;

pub use cue::{
    Cue, CueSetting, LineAlign, LineValue, PositionAlign, SettingWarning, TextAlign, WritingMode,
};
pub use mp4_vtt_parser::Mp4VttParser;
pub use subtitles::Subtitles;
