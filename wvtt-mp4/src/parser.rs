/*
    REFERENCES
    ----------

    1. https://github.com/shaka-project/shaka-player/blob/7098f43f70119226bca2e5583833aaf27b498e33/lib/util/mp4_parser.js
    2. https://github.com/shaka-project/shaka-player/blob/7098f43f70119226bca2e5583833aaf27b498e33/externs/shaka/mp4_parser.js

*/

use crate::{Error, Reader, Result, fourcc::fourcc_to_string};
use log::{debug, trace};
use std::collections::{HashMap, HashSet};

/// Handler that decodes fixed fields from a box payload into the parse state.
pub type FieldsHandler<S> = fn(&mut ParsedBox<'_>, &mut S) -> Result<()>;
/// Handler that receives every payload byte of a box.
pub type AllDataHandler<S> = fn(&[u8], &mut S) -> Result<()>;

/// What to do with the body of a registered box.
pub enum BoxHandler<S> {
    /// Treat the body as a series of boxes, limited by the size of the parent box.
    Children,
    /// Treat the body as a sample description. A sample description box has a
    /// fixed number of children, represented by a 4 byte unsigned integer.
    SampleDescription,
    /// Decode fields from the body using a scoped reader.
    Fields(FieldsHandler<S>),
    /// Treat the body as a binary blob.
    AllData(AllDataHandler<S>),
}

impl<S> Clone for BoxHandler<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for BoxHandler<S> {}

/// An enum used to track the type of box so that the correct values can be
/// read from the header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoxType {
    BasicBox,
    FullBox,
}

/// Mp4 box tree walker.
///
/// The parser only holds the dispatch table. Everything handlers produce is
/// written into the state value passed to [`Mp4Parser::parse`], so one parser
/// can be shared between independent parses.
pub struct Mp4Parser<S> {
    definitions: HashMap<u32, (BoxType, BoxHandler<S>)>,
}

impl<S> Default for Mp4Parser<S> {
    fn default() -> Self {
        Self {
            definitions: HashMap::new(),
        }
    }
}

impl<S> Mp4Parser<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a box type as a Basic Box.
    pub fn base_box(mut self, code: u32, handler: BoxHandler<S>) -> Self {
        self.definitions.insert(code, (BoxType::BasicBox, handler));
        self
    }

    /// Declare a box type as a Full Box.
    pub fn full_box(mut self, code: u32, handler: BoxHandler<S>) -> Self {
        self.definitions.insert(code, (BoxType::FullBox, handler));
        self
    }

    /// Parse the given data using the registered handlers.
    ///
    /// Returns the codes of every registered box that was encountered.
    pub fn parse(&self, data: &[u8], state: &mut S) -> Result<SeenBoxes> {
        let mut reader = Reader::new(data);
        let mut seen = SeenBoxes::default();

        while reader.has_more_data() {
            self.parse_next(0, &mut reader, state, &mut seen)?;
        }

        Ok(seen)
    }

    /// Parse the next box on the current level.
    ///
    /// `abs_start` is the absolute position of `reader` in the original buffer.
    fn parse_next(
        &self,
        abs_start: u64,
        reader: &mut Reader<'_>,
        state: &mut S,
        seen: &mut SeenBoxes,
    ) -> Result<()> {
        let start = reader.position();

        // size(4 bytes) + type(4 bytes) = 8 bytes
        let mut size = reader.read_u32()? as u64;
        let code = reader.read_u32()?;
        let mut has_64_bit_size = false;

        match size {
            0 => size = (reader.len() - start) as u64,
            1 => {
                size = reader.read_u64()?;
                has_64_bit_size = true;
            }
            _ => (),
        }

        if size < (reader.position() - start) as u64 {
            return Err(Error::Malformed {
                fourcc: fourcc_to_string(code),
                reason: format!("declared size {size} is smaller than its header"),
            });
        }

        let end = (start as u64).saturating_add(size);

        let Some((box_type, handler)) = self.definitions.get(&code).copied() else {
            debug!("skipping unhandled {} box", fourcc_to_string(code));
            // If the box is longer than the remaining parts of the buffer,
            // just skip to the end.
            let skip = (end - reader.position() as u64).min(reader.remaining() as u64);
            return reader.skip(skip as usize);
        };

        let mut version = None;
        let mut flags = None;

        if box_type == BoxType::FullBox {
            if end < reader.position() as u64 + 4 {
                return Err(Error::Malformed {
                    fourcc: fourcc_to_string(code),
                    reason: format!("declared size {size} leaves no room for version and flags"),
                });
            }

            let version_and_flags = reader.read_u32()?;
            version = Some((version_and_flags >> 24) as u8);
            flags = Some(version_and_flags & 0xFFFFFF);
        }

        // Read the whole payload so that the current level can be safely read
        // regardless of how the payload is parsed.
        let payload_size = usize::try_from(end - reader.position() as u64).map_err(|_| {
            Error::Malformed {
                fourcc: fourcc_to_string(code),
                reason: format!("declared size {size} does not fit in memory"),
            }
        })?;
        let payload = reader.read_bytes(payload_size)?;

        trace!(
            "parsing {} box at {} ({} bytes)",
            fourcc_to_string(code),
            abs_start + start as u64,
            size
        );
        seen.0.insert(code);

        let mut box_ = ParsedBox {
            code,
            start: abs_start + start as u64,
            size,
            version,
            flags,
            reader: Reader::new(payload),
            has_64_bit_size,
        };

        match handler {
            BoxHandler::Children => self.children(&mut box_, state, seen),
            BoxHandler::SampleDescription => self.sample_description(&mut box_, state, seen),
            BoxHandler::Fields(handler) => handler(&mut box_, state),
            BoxHandler::AllData(handler) => handler(box_.reader.read_to_end(), state),
        }
    }

    fn children(
        &self,
        box_: &mut ParsedBox<'_>,
        state: &mut S,
        seen: &mut SeenBoxes,
    ) -> Result<()> {
        // The reader starts at the payload, so the header has to be added to
        // the start position. The header size varies.
        let abs_start = box_.start + box_.header_size();

        while box_.reader.has_more_data() {
            self.parse_next(abs_start, &mut box_.reader, state, seen)?;
        }

        Ok(())
    }

    fn sample_description(
        &self,
        box_: &mut ParsedBox<'_>,
        state: &mut S,
        seen: &mut SeenBoxes,
    ) -> Result<()> {
        let abs_start = box_.start + box_.header_size();
        let count = box_.reader.read_u32()?;

        for _ in 0..count {
            if !box_.reader.has_more_data() {
                break;
            }

            self.parse_next(abs_start, &mut box_.reader, state, seen)?;
        }

        Ok(())
    }
}

/// Codes of the registered boxes encountered during one parse.
#[derive(Clone, Debug, Default)]
pub struct SeenBoxes(HashSet<u32>);

impl SeenBoxes {
    pub fn contains(&self, code: u32) -> bool {
        self.0.contains(&code)
    }

    pub fn contains_any(&self, codes: &[u32]) -> bool {
        codes.iter().any(|code| self.contains(*code))
    }
}

/// Parsed mp4 box.
pub struct ParsedBox<'a> {
    /// The box type.
    pub code: u32,
    /// The start of this box (before the header) in the original buffer.
    pub start: u64,
    /// The size of this box (including the header).
    pub size: u64,
    /// The version for a full box, `None` for basic boxes.
    pub version: Option<u8>,
    /// The flags for a full box, `None` for basic boxes.
    pub flags: Option<u32>,
    /// The reader for this box is only for this box. Reading or not reading to
    /// the end will have no affect on the parser reading other sibling boxes.
    pub reader: Reader<'a>,
    /// If true, the box header had a 64-bit size field.
    pub has_64_bit_size: bool,
}

impl ParsedBox<'_> {
    /// Find the header size of the box.
    pub fn header_size(&self) -> u64 {
        let basic_header_size = 8;
        let large_size_field = if self.has_64_bit_size { 8 } else { 0 };
        let version_and_flags_size = if self.flags.is_some() { 4 } else { 0 };
        basic_header_size + large_size_field + version_and_flags_size
    }

    /// The box type as a four character string.
    pub fn name(&self) -> String {
        fourcc_to_string(self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fourcc::fourcc;

    fn mp4_box(name: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut data = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
        data.extend_from_slice(name);
        data.extend_from_slice(payload);
        data
    }

    #[derive(Default)]
    struct Collected {
        blobs: Vec<Vec<u8>>,
        versions: Vec<(u8, u32)>,
    }

    fn collect_blob(data: &[u8], state: &mut Collected) -> Result<()> {
        state.blobs.push(data.to_vec());
        Ok(())
    }

    fn collect_version(box_: &mut ParsedBox<'_>, state: &mut Collected) -> Result<()> {
        state
            .versions
            .push((box_.version.unwrap_or_default(), box_.flags.unwrap_or_default()));
        Ok(())
    }

    #[test]
    fn test_children_and_all_data() {
        let leaf_a = mp4_box(b"leaf", b"one");
        let leaf_b = mp4_box(b"leaf", b"two");
        let skipped = mp4_box(b"free", b"ignored");
        let outer = mp4_box(b"outr", &[leaf_a, skipped, leaf_b].concat());

        let mut state = Collected::default();
        let seen = Mp4Parser::<Collected>::new()
            .base_box(fourcc(b"outr"), BoxHandler::Children)
            .base_box(fourcc(b"leaf"), BoxHandler::AllData(collect_blob))
            .parse(&outer, &mut state)
            .unwrap();

        assert_eq!(state.blobs, vec![b"one".to_vec(), b"two".to_vec()]);
        assert!(seen.contains(fourcc(b"outr")));
        assert!(!seen.contains(fourcc(b"free")));
    }

    #[test]
    fn test_full_box_version_and_flags() {
        let data = mp4_box(b"full", &[1, 0x00, 0x0F, 0x01, 0xAA]);

        let mut state = Collected::default();
        Mp4Parser::<Collected>::new()
            .full_box(fourcc(b"full"), BoxHandler::Fields(collect_version))
            .parse(&data, &mut state)
            .unwrap();

        assert_eq!(state.versions, vec![(1, 0x000F01)]);
    }

    #[test]
    fn test_large_and_open_ended_sizes() {
        let mut large = 1_u32.to_be_bytes().to_vec();
        large.extend_from_slice(b"leaf");
        large.extend_from_slice(&19_u64.to_be_bytes());
        large.extend_from_slice(b"big");

        let mut open = 0_u32.to_be_bytes().to_vec();
        open.extend_from_slice(b"leaf");
        open.extend_from_slice(b"rest");

        let mut state = Collected::default();
        Mp4Parser::<Collected>::new()
            .base_box(fourcc(b"leaf"), BoxHandler::AllData(collect_blob))
            .parse(&[large, open].concat(), &mut state)
            .unwrap();

        assert_eq!(state.blobs, vec![b"big".to_vec(), b"rest".to_vec()]);
    }

    #[test]
    fn test_sample_description_children() {
        let entry = mp4_box(b"leaf", b"entry");
        let mut payload = vec![0, 0, 0, 0]; // version and flags
        payload.extend_from_slice(&1_u32.to_be_bytes());
        payload.extend_from_slice(&entry);
        let stsd = mp4_box(b"stsd", &payload);

        let mut state = Collected::default();
        Mp4Parser::<Collected>::new()
            .full_box(fourcc(b"stsd"), BoxHandler::SampleDescription)
            .base_box(fourcc(b"leaf"), BoxHandler::AllData(collect_blob))
            .parse(&stsd, &mut state)
            .unwrap();

        assert_eq!(state.blobs, vec![b"entry".to_vec()]);
    }

    #[test]
    fn test_truncated_box_is_read_error() {
        let mut data = mp4_box(b"leaf", b"payload");
        data.truncate(10);

        let result = Mp4Parser::<Collected>::new()
            .base_box(fourcc(b"leaf"), BoxHandler::AllData(collect_blob))
            .parse(&data, &mut Collected::default());

        assert!(matches!(result, Err(Error::Read { .. })));
    }

    #[test]
    fn test_size_smaller_than_header_is_malformed() {
        let mut data = 4_u32.to_be_bytes().to_vec();
        data.extend_from_slice(b"leaf");

        let result = Mp4Parser::<Collected>::new().parse(&data, &mut Collected::default());
        assert!(matches!(result, Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_unhandled_box_longer_than_buffer_is_skipped() {
        let mut data = 64_u32.to_be_bytes().to_vec();
        data.extend_from_slice(b"free");
        data.extend_from_slice(b"short");

        let seen = Mp4Parser::<Collected>::new()
            .parse(&data, &mut Collected::default())
            .unwrap();
        assert!(!seen.contains(fourcc(b"free")));
    }
}
