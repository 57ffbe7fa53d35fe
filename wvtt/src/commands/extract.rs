use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use log::{debug, info, warn};
use std::{
    fs,
    path::{Path, PathBuf},
};
use wvtt_mp4::text::{Mp4VttParser, Subtitles};

/// Extract subtitles from wvtt mp4 segments.
#[derive(Debug, Clone, Args)]
pub struct Extract {
    /// Path of init segment containing the WVTT box. A complete fragmented
    /// mp4 file (init and media boxes in one file) is also accepted.
    #[arg(required = true)]
    init: PathBuf,

    /// Media segments e.g. *.m4s, parsed in the given order.
    /// Glob patterns are expanded and sorted.
    segments: Vec<String>,

    /// Codec for output subtitles.
    #[arg(short, long, value_enum, default_value_t = Codec::Webvtt)]
    codec: Codec,

    /// Path for output file, subtitles are printed to stdout if not set.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Ticks per second, used when the init segment has no MDHD box.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    timescale: Option<u32>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Codec {
    Json,
    Subrip,
    Webvtt,
}

impl Extract {
    pub fn execute(self) -> Result<()> {
        let mut parser = match self.timescale {
            Some(timescale) => Mp4VttParser::with_timescale(timescale),
            None => Mp4VttParser::new(),
        };

        let mut subtitles = parse_file(&mut parser, &self.init)?;

        for pattern in &self.segments {
            let mut files = glob::glob(pattern)?.collect::<Result<Vec<_>, _>>()?;

            if files.is_empty() {
                bail!("No segment matches {pattern}.");
            }

            files.sort();

            for file in files {
                subtitles.extend(parse_file(&mut parser, &file)?);
            }
        }

        if !subtitles.warnings().is_empty() {
            warn!(
                "Dropped {} invalid cue setting(s).",
                subtitles.warnings().len()
            );
        }

        info!("Extracted {} cue(s).", subtitles.cues().len());

        let output = match self.codec {
            Codec::Json => serde_json::to_string_pretty(&subtitles)? + "\n",
            Codec::Subrip => subtitles.as_srt(),
            Codec::Webvtt => subtitles.as_vtt(),
        };

        match &self.output {
            Some(path) => fs::write(path, output)
                .with_context(|| format!("Cannot write {}.", path.display()))?,
            None => print!("{output}"),
        }

        Ok(())
    }
}

fn parse_file(parser: &mut Mp4VttParser, path: &Path) -> Result<Subtitles> {
    debug!("Parsing {}", path.display());
    let data = fs::read(path).with_context(|| format!("Cannot read {}.", path.display()))?;
    parser
        .parse(&data)
        .with_context(|| format!("Cannot extract vtt cues from {}.", path.display()))
}
