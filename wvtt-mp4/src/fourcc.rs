//! Four character codes of the boxes used when extracting vtt cues.

/// Convert an ascii box name to the integer type for a box.
pub const fn fourcc(name: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*name)
}

/// Convert an integer box type into its ascii name.
/// Bytes that are not printable ascii are shown as `.`.
pub fn fourcc_to_string(code: u32) -> String {
    code.to_be_bytes()
        .iter()
        .map(|byte| {
            if byte.is_ascii_graphic() || *byte == b' ' {
                *byte as char
            } else {
                '.'
            }
        })
        .collect()
}

pub const MDAT: u32 = fourcc(b"mdat");
pub const MDHD: u32 = fourcc(b"mdhd");
pub const MDIA: u32 = fourcc(b"mdia");
pub const MINF: u32 = fourcc(b"minf");
pub const MOOF: u32 = fourcc(b"moof");
pub const MOOV: u32 = fourcc(b"moov");
pub const STBL: u32 = fourcc(b"stbl");
pub const STSD: u32 = fourcc(b"stsd");
pub const TFDT: u32 = fourcc(b"tfdt");
pub const TRAF: u32 = fourcc(b"traf");
pub const TRAK: u32 = fourcc(b"trak");
pub const TRUN: u32 = fourcc(b"trun");

/// Empty vtt cue.
pub const VTTE: u32 = fourcc(b"vtte");
/// Non-empty vtt cue.
pub const VTTC: u32 = fourcc(b"vttc");
/// Vtt sample entry, present in init segments.
pub const WVTT: u32 = fourcc(b"wvtt");

/// Cue text, child of `vttc`.
pub const PAYL: u32 = fourcc(b"payl");
/// Cue identifier, child of `vttc`.
pub const IDEN: u32 = fourcc(b"iden");
/// Cue settings, child of `vttc`.
pub const STTG: u32 = fourcc(b"sttg");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(WVTT, 0x77767474);
        assert_eq!(VTTC, 0x76747463);
        assert_eq!(VTTE, 0x76747465);
    }

    #[test]
    fn test_fourcc_to_string() {
        assert_eq!(fourcc_to_string(MDAT), "mdat");
        assert_eq!(fourcc_to_string(0x00_61_62_01), ".ab.");
    }
}
