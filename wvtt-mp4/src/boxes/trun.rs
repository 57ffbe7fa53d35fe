use crate::{Error, ParsedBox, Reader, Result};

/// Optional fields of a track run, in the order they are stored.
#[derive(Clone, Copy)]
enum TrunField {
    DataOffset,
    FirstSampleFlags,
    SampleDuration,
    SampleSize,
    SampleFlags,
    SampleCompositionTimeOffset,
}

/// Fields stored once, before the sample table.
const LEADING_FIELDS: [(u32, TrunField); 2] = [
    (0x000001, TrunField::DataOffset),
    (0x000004, TrunField::FirstSampleFlags),
];

/// Fields stored for every sample. Reordering these changes the byte layout.
const SAMPLE_FIELDS: [(u32, TrunField); 4] = [
    (0x000100, TrunField::SampleDuration),
    (0x000200, TrunField::SampleSize),
    (0x000400, TrunField::SampleFlags),
    (0x000800, TrunField::SampleCompositionTimeOffset),
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrunSample {
    /// The length of the sample in timescale units.
    pub sample_duration: Option<u32>,
    /// The size of the sample in bytes.
    pub sample_size: Option<u32>,
    /// The time since the start of the fragment in timescale units. If this
    /// value is missing, the accumulated durations preceeding this sample
    /// are used to create the start time.
    pub sample_composition_time_offset: Option<i64>,
}

pub struct TrunBox {
    /// Per ISO/IEC 14496-12: the number of samples being added in this run;
    pub sample_count: u32,
    /// An array of size sampleCount containing data for each sample.
    /// Empty when the flags select no per-sample field, since every sample
    /// would then be the default.
    pub sample_data: Vec<TrunSample>,
    /// If specified via flags, this indicate the offset of the sample in bytes.
    pub data_offset: Option<i32>,
}

impl TrunBox {
    /// Parses a TRUN Box.
    pub fn new(box_: &mut ParsedBox<'_>) -> Result<Self> {
        let version = box_.version.unwrap_or_default();
        let flags = box_.flags.unwrap_or_default();
        let reader = &mut box_.reader;

        let sample_count = reader.read_u32()?;
        let mut data_offset = None;

        for (bit, field) in LEADING_FIELDS {
            if flags & bit == 0 {
                continue;
            }

            match field {
                TrunField::DataOffset => data_offset = Some(reader.read_i32()?),
                _ => reader.skip(4)?,
            }
        }

        let sample_size = SAMPLE_FIELDS
            .iter()
            .filter(|(bit, _)| flags & bit != 0)
            .count()
            * 4;

        if sample_size == 0 {
            return Ok(Self {
                sample_count,
                sample_data: Vec::new(),
                data_offset,
            });
        }

        if sample_count as usize > reader.remaining() / sample_size {
            return Err(Error::Read {
                what: "trun sample table",
                position: reader.position(),
                wanted: (sample_count as usize).saturating_mul(sample_size),
                available: reader.remaining(),
            });
        }

        let mut sample_data = Vec::with_capacity(sample_count as usize);

        for _ in 0..sample_count {
            sample_data.push(read_sample(reader, version, flags)?);
        }

        Ok(Self {
            sample_count,
            sample_data,
            data_offset,
        })
    }
}

fn read_sample(reader: &mut Reader<'_>, version: u8, flags: u32) -> Result<TrunSample> {
    let mut sample = TrunSample::default();

    for (bit, field) in SAMPLE_FIELDS {
        if flags & bit == 0 {
            continue;
        }

        match field {
            TrunField::SampleDuration => sample.sample_duration = Some(reader.read_u32()?),
            TrunField::SampleSize => sample.sample_size = Some(reader.read_u32()?),
            TrunField::SampleCompositionTimeOffset => {
                sample.sample_composition_time_offset = Some(if version == 0 {
                    reader.read_u32()? as i64
                } else {
                    reader.read_i32()? as i64
                });
            }
            _ => reader.skip(4)?,
        }
    }

    Ok(sample)
}
