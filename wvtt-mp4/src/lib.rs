#![cfg_attr(docsrs, feature(doc_cfg))]

//! This crate extracts WebVTT cues packaged inside fragmented mp4 files
//! (`application/mp4; codecs="wvtt"`), following the box layout used by
//! [shaka-player](https://github.com/shaka-project/shaka-player).
//!
//! Cue text lives in `vttc` boxes inside `mdat`, while cue timing lives in the
//! `mdhd`, `tfdt` and `trun` boxes. Both are collected in one pass over the
//! segment and paired up by position.
//!
//! ```no_run
//! use wvtt_mp4::text::Mp4VttParser;
//!
//! let init = std::fs::read("init.mp4")?;
//! let segment = std::fs::read("segment_1.m4s")?;
//!
//! let mut parser = Mp4VttParser::parse_init(&init)?;
//! let subtitles = parser.parse(&segment)?;
//! print!("{}", subtitles.as_vtt());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Optional Features
//!
//! - **serde**: Derives `Serialize` for cues and subtitles.

pub mod boxes;
pub mod fourcc;
pub mod text;

mod error;
mod parser;
mod reader;

pub use error::Error;
pub use parser::*;
pub use reader::Reader;

/// A `Result` alias where the `Err` case is `wvtt_mp4::Error`.
pub type Result<T> = std::result::Result<T, Error>;
