use crate::{Error, ParsedBox, Result};

pub struct TfdtBox {
    /// Per ISO/IEC 14496-12: the absolute decode time, measured on the media
    /// timeline, of the first sample in decode order in the track fragment
    pub base_media_decode_time: u64,
}

impl TfdtBox {
    /// Parses a TFDT Box.
    pub fn new(box_: &mut ParsedBox<'_>) -> Result<Self> {
        let reader = &mut box_.reader;

        let base_media_decode_time = match box_.version.unwrap_or_default() {
            0 => reader.read_u32()? as u64,
            1 => reader.read_u64()?,
            version => {
                return Err(Error::UnsupportedVersion {
                    fourcc: "tfdt",
                    version,
                });
            }
        };

        Ok(Self {
            base_media_decode_time,
        })
    }
}
