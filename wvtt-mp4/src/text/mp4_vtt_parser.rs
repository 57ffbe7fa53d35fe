/*
    REFERENCES
    ----------

    1. https://github.com/shaka-project/shaka-player/blob/a4e926772e1b754fe968ee6f97490f08a40fe535/lib/text/mp4_vtt_parser.js

*/

use crate::{
    Error, ParsedBox, Result,
    boxes::{MdhdBox, TfdtBox, TrunBox, TrunSample},
    fourcc::{
        IDEN, MDAT, MDHD, MDIA, MINF, MOOF, MOOV, PAYL, STBL, STSD, STTG, TFDT, TRAF, TRAK, TRUN,
        VTTC, VTTE, WVTT,
    },
    parser::{BoxHandler, Mp4Parser, SeenBoxes},
    text::{Cue, SettingWarning, Subtitles, settings},
};
use log::warn;
use std::sync::LazyLock;

/// Cue payload of one sample, in the order the boxes appear in `mdat`.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Payload {
    /// Raw body of a `vttc` box.
    Cue(Vec<u8>),
    /// A `vtte` box. It produces no cue but still occupies a sample.
    Empty,
}

/// Timing and payloads of one `moof` + `mdat` pair.
struct Fragment {
    base_time: u64,
    samples: Vec<TrunSample>,
    payloads: Vec<Payload>,
}

/// Everything collected from one segment.
#[derive(Default)]
struct SegmentState {
    timescale: Option<u32>,
    base_time: u64,
    /// Samples of the last `trun`, waiting for their `mdat`.
    sample_count: u32,
    samples: Vec<TrunSample>,
    fragments: Vec<Fragment>,
}

static SEGMENT_PARSER: LazyLock<Mp4Parser<SegmentState>> = LazyLock::new(|| {
    Mp4Parser::<SegmentState>::new()
        .base_box(MDAT, BoxHandler::Fields(on_mdat))
        .base_box(MDIA, BoxHandler::Children)
        .full_box(MDHD, BoxHandler::Fields(on_mdhd))
        .base_box(MINF, BoxHandler::Children)
        .base_box(MOOF, BoxHandler::Children)
        .base_box(MOOV, BoxHandler::Children)
        .base_box(STBL, BoxHandler::Children)
        .full_box(STSD, BoxHandler::SampleDescription)
        .full_box(TFDT, BoxHandler::Fields(on_tfdt))
        .base_box(TRAF, BoxHandler::Children)
        .base_box(TRAK, BoxHandler::Children)
        .full_box(TRUN, BoxHandler::Fields(on_trun))
        .base_box(WVTT, BoxHandler::Fields(on_wvtt))
});

static MDAT_PARSER: LazyLock<Mp4Parser<Vec<Payload>>> = LazyLock::new(|| {
    Mp4Parser::<Vec<Payload>>::new()
        .base_box(VTTE, BoxHandler::Fields(on_vtte))
        .base_box(VTTC, BoxHandler::AllData(on_vttc))
});

fn on_mdhd(box_: &mut ParsedBox<'_>, state: &mut SegmentState) -> Result<()> {
    let mdhd = MdhdBox::new(box_)?;

    if mdhd.timescale != 0 {
        state.timescale.get_or_insert(mdhd.timescale);
    }

    Ok(())
}

fn on_tfdt(box_: &mut ParsedBox<'_>, state: &mut SegmentState) -> Result<()> {
    state.base_time = TfdtBox::new(box_)?.base_media_decode_time;
    Ok(())
}

fn on_trun(box_: &mut ParsedBox<'_>, state: &mut SegmentState) -> Result<()> {
    let trun = TrunBox::new(box_)?;
    state.sample_count = trun.sample_count;
    state.samples = trun.sample_data;
    Ok(())
}

fn on_mdat(box_: &mut ParsedBox<'_>, state: &mut SegmentState) -> Result<()> {
    let mut payloads = Vec::new();
    MDAT_PARSER.parse(box_.reader.read_to_end(), &mut payloads)?;

    let sample_count = std::mem::take(&mut state.sample_count) as usize;
    let samples = std::mem::take(&mut state.samples);

    if sample_count != payloads.len() {
        return Err(Error::SampleCountMismatch {
            samples: sample_count,
            payloads: payloads.len(),
        });
    }

    if !payloads.is_empty() {
        state.fragments.push(Fragment {
            base_time: state.base_time,
            samples,
            payloads,
        });
    }

    Ok(())
}

fn on_vtte(_: &mut ParsedBox<'_>, payloads: &mut Vec<Payload>) -> Result<()> {
    // The placeholder keeps the payloads in step with the samples.
    payloads.push(Payload::Empty);
    Ok(())
}

fn on_vttc(data: &[u8], payloads: &mut Vec<Payload>) -> Result<()> {
    payloads.push(Payload::Cue(data.to_vec()));
    Ok(())
}

fn on_wvtt(_: &mut ParsedBox<'_>, _: &mut SegmentState) -> Result<()> {
    // A valid vtt init segment, though we have no actual subtitles yet.
    Ok(())
}

/// Parse vtt subtitles from mp4 files.
///
/// The timescale found in an init segment is kept, so the same parser can be
/// fed the init segment followed by its media segments. A buffer may hold
/// several `moof` + `mdat` pairs, each one is timed on its own.
#[derive(Clone, Debug, Default)]
pub struct Mp4VttParser {
    timescale: Option<u32>,
}

impl Mp4VttParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser for media segments whose init segment is not available.
    pub fn with_timescale(timescale: u32) -> Self {
        Self {
            timescale: Some(timescale).filter(|x| *x != 0),
        }
    }

    /// Ticks per second used to convert sample times.
    pub fn timescale(&self) -> Option<u32> {
        self.timescale
    }

    /// Parse intialization segment, a valid `wvtt` box and a timescale should be present.
    pub fn parse_init(data: &[u8]) -> Result<Self> {
        let mut parser = Self::new();
        let (_, seen) = parser.parse_segment(data)?;

        if !seen.contains(WVTT) {
            return Err(Error::InvalidContainer);
        }

        if parser.timescale.is_none() {
            return Err(Error::MissingTimescale);
        }

        Ok(parser)
    }

    /// Parse one init or media segment into cues.
    ///
    /// The parser keeps its timescale untouched when an error is returned.
    pub fn parse(&mut self, data: &[u8]) -> Result<Subtitles> {
        Ok(self.parse_segment(data)?.0)
    }

    fn parse_segment(&mut self, data: &[u8]) -> Result<(Subtitles, SeenBoxes)> {
        let mut state = SegmentState::default();
        let seen = SEGMENT_PARSER.parse(data, &mut state)?;

        if !seen.contains_any(&[MDAT, TFDT, TRUN, WVTT]) {
            // If the moof and other boxes were not found, a wvtt box should
            // have been seen (a valid vtt init segment with no actual subtitles).
            return Err(Error::InvalidContainer);
        }

        // A trun whose samples never met an mdat.
        if state.sample_count != 0 {
            return Err(Error::SampleCountMismatch {
                samples: state.sample_count as usize,
                payloads: 0,
            });
        }

        let timescale = state.timescale.or(self.timescale);
        let mut subtitles = Subtitles::default();

        for fragment in &state.fragments {
            let timescale = timescale.ok_or(Error::MissingTimescale)?;
            subtitles.extend(correlate(
                timescale,
                fragment.base_time,
                &fragment.samples,
                &fragment.payloads,
            )?);
        }

        if state.timescale.is_some() {
            self.timescale = state.timescale;
        }

        Ok((subtitles, seen))
    }
}

fn correlate(
    timescale: u32,
    base_time: u64,
    samples: &[TrunSample],
    payloads: &[Payload],
) -> Result<Subtitles> {
    let timescale = timescale as f64;
    let mut current_time = base_time;
    let mut cues = Vec::new();
    let mut warnings = Vec::new();

    // No samples at all when the trun has no per-sample fields.
    for (sample, payload) in samples.iter().zip(payloads) {
        // A sample without a duration contributes nothing, not even time.
        let Some(duration) = sample.sample_duration else {
            continue;
        };

        let start_time = match sample.sample_composition_time_offset {
            Some(offset) => base_time.saturating_add_signed(offset),
            None => current_time,
        };

        current_time = start_time.saturating_add(duration as u64);

        // An empty cue still moves the clock forward.
        let Payload::Cue(data) = payload else {
            continue;
        };

        if let Some(cue) = parse_vttc(
            data,
            start_time as f64 / timescale,
            current_time as f64 / timescale,
            &mut warnings,
        )? {
            cues.push(cue);
        }
    }

    Ok(Subtitles::new(cues, warnings))
}

/// Boxes found inside one `vttc` box.
#[derive(Default)]
struct VttcState {
    text: Option<String>,
    id: Option<String>,
    settings: Option<String>,
}

static VTTC_PARSER: LazyLock<Mp4Parser<VttcState>> = LazyLock::new(|| {
    Mp4Parser::<VttcState>::new()
        .base_box(PAYL, BoxHandler::AllData(on_payl))
        .base_box(IDEN, BoxHandler::AllData(on_iden))
        .base_box(STTG, BoxHandler::AllData(on_sttg))
});

fn on_payl(data: &[u8], state: &mut VttcState) -> Result<()> {
    state.text = Some(String::from_utf8(data.to_vec())?);
    Ok(())
}

fn on_iden(data: &[u8], state: &mut VttcState) -> Result<()> {
    state.id = Some(String::from_utf8(data.to_vec())?);
    Ok(())
}

fn on_sttg(data: &[u8], state: &mut VttcState) -> Result<()> {
    state.settings = Some(String::from_utf8(data.to_vec())?);
    Ok(())
}

/// Parses a vttc box into a cue.
fn parse_vttc(
    data: &[u8],
    start_time: f64,
    end_time: f64,
    warnings: &mut Vec<SettingWarning>,
) -> Result<Option<Cue>> {
    let mut state = VttcState::default();
    VTTC_PARSER.parse(data, &mut state)?;

    let Some(text) = state.text.filter(|x| !x.is_empty()) else {
        return Ok(None);
    };

    let mut cue = Cue::new(start_time, end_time, text);
    cue.id = state.id.filter(|x| !x.is_empty());

    if let Some(settings) = &state.settings {
        for word in settings::tokens(settings) {
            if !settings::parse_setting(&mut cue, word) {
                warn!("vtt parser encountered an invalid vtt setting: {word}, the setting will be ignored.");
                warnings.push(SettingWarning {
                    token: word.to_owned(),
                    start_time,
                });
            }
        }
    }

    Ok(Some(cue))
}
