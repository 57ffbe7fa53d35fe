//! Error types for box traversal and cue extraction.

use thiserror::Error;

/// Errors that can occur while extracting cues from mp4 data.
#[derive(Debug, Error)]
pub enum Error {
    /// Tried to read past the end of a box or buffer.
    #[error("cannot read {what} at offset {position}: wanted {wanted} bytes, {available} available")]
    Read {
        what: &'static str,
        position: usize,
        wanted: usize,
        available: usize,
    },

    /// A box header that cannot describe a valid box.
    #[error("malformed {fourcc} box: {reason}")]
    Malformed { fourcc: String, reason: String },

    /// A full box carrying a version this parser does not understand.
    #[error("unsupported {fourcc} box version {version} (expected 0 or 1)")]
    UnsupportedVersion { fourcc: &'static str, version: u8 },

    /// Cue times cannot be computed without a timescale.
    #[error("missing timescale for vtt content (should exist inside mdhd box)")]
    MissingTimescale,

    /// None of mdat, tfdt, trun or wvtt boxes were found.
    #[error("invalid mp4 vtt data: neither a media segment nor a wvtt init segment")]
    InvalidContainer,

    /// Run box samples and mdat payloads do not pair up.
    #[error("trun box declares {samples} samples but mdat holds {payloads} vtt payloads")]
    SampleCountMismatch { samples: usize, payloads: usize },

    /// Cue text, identifier or settings that are not valid utf-8.
    #[error("cannot decode vtt payload as utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
