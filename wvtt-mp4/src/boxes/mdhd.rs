use crate::{Error, ParsedBox, Result};

pub struct MdhdBox {
    /// Per ISO/IEC 14496-12: an integer that specifies the time‐scale for this media;
    /// this is the number of time units that pass in one second
    pub timescale: u32,
    /// Duration of this media in timescale units
    pub duration: u64,
    /// Language code for this media, if the box carries one
    pub language: Option<String>,
}

impl MdhdBox {
    /// Parses a MDHD Box.
    pub fn new(box_: &mut ParsedBox<'_>) -> Result<Self> {
        let version = box_.version.unwrap_or_default();
        let reader = &mut box_.reader;

        let (timescale, duration) = match version {
            0 => {
                reader.skip(4)?; // creation_time
                reader.skip(4)?; // modification_time
                let timescale = reader.read_u32()?;
                (timescale, reader.read_u32()? as u64)
            }
            1 => {
                reader.skip(8)?; // creation_time
                reader.skip(8)?; // modification_time
                let timescale = reader.read_u32()?;
                (timescale, reader.read_u64()?)
            }
            version => {
                return Err(Error::UnsupportedVersion {
                    fourcc: "mdhd",
                    version,
                });
            }
        };

        let language = if reader.remaining() >= 2 {
            decode_language(reader.read_u16()?)
        } else {
            None
        };

        Ok(Self {
            timescale,
            duration,
            language,
        })
    }
}

/// Language is stored as an ISO-639-2/T code in an array of three 5-bit
/// fields, each field is the packed difference between its ASCII value and 0x60.
fn decode_language(packed: u16) -> Option<String> {
    [(packed >> 10) & 0x1f, (packed >> 5) & 0x1f, packed & 0x1f]
        .into_iter()
        .map(|letter| char::from_u32(letter as u32 + 0x60).filter(char::is_ascii_lowercase))
        .collect()
}
