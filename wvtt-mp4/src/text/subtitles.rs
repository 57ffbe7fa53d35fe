use super::{Cue, SettingWarning};
use std::fmt::Write;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Cues extracted from mp4 segments.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Subtitles {
    cues: Vec<Cue>,
    warnings: Vec<SettingWarning>,
}

impl Subtitles {
    pub(crate) fn new(cues: Vec<Cue>, warnings: Vec<SettingWarning>) -> Self {
        Self { cues, warnings }
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Cue settings that were dropped while building the cues.
    pub fn warnings(&self) -> &[SettingWarning] {
        &self.warnings
    }

    pub fn into_cues(self) -> Vec<Cue> {
        self.cues
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Append the cues of another segment. Cues are not merged.
    pub fn extend(&mut self, other: Subtitles) {
        self.cues.extend(other.cues);
        self.warnings.extend(other.warnings);
    }

    /// Build subtitles in subrip format.
    pub fn as_srt(&self) -> String {
        let mut subtitles = String::new();

        for (i, cue) in self.cues.iter().enumerate() {
            let _ = write!(
                subtitles,
                "{}\n{} --> {}\n{}\n\n",
                i + 1,
                timestamp(cue.start_time, ','),
                timestamp(cue.end_time, ','),
                cue.text
            );
        }

        subtitles
    }

    /// Build subtitles in webvtt format.
    pub fn as_vtt(&self) -> String {
        let mut subtitles = "WEBVTT\n\n".to_owned();

        for cue in &self.cues {
            if let Some(id) = &cue.id {
                let _ = writeln!(subtitles, "{id}");
            }

            let _ = write!(
                subtitles,
                "{} --> {}",
                timestamp(cue.start_time, '.'),
                timestamp(cue.end_time, '.')
            );

            if !cue.settings.is_empty() {
                let _ = write!(subtitles, " {}", cue.settings_line());
            }

            let _ = write!(subtitles, "\n{}\n\n", cue.text);
        }

        subtitles
    }
}

fn timestamp(seconds: f64, sep: char) -> String {
    let divmod = |x, y| (x / y, x % y);
    let (s, ms) = divmod((seconds.max(0.0) * 1000.0).round() as u64, 1000);
    let (m, s) = divmod(s, 60);
    let (h, m) = divmod(m, 60);
    format!("{h:02}:{m:02}:{s:02}{sep}{ms:03}")
}
