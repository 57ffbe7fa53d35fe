//! Helpers for building synthetic wvtt segments.

#![allow(dead_code)]

pub fn mp4_box(name: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut data = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
    data.extend_from_slice(name);
    data.extend_from_slice(payload);
    data
}

pub fn full_box(name: &[u8; 4], version: u8, flags: u32, payload: &[u8]) -> Vec<u8> {
    let mut body = (((version as u32) << 24) | (flags & 0xFFFFFF)).to_be_bytes().to_vec();
    body.extend_from_slice(payload);
    mp4_box(name, &body)
}

pub fn mdhd(version: u8, timescale: u32) -> Vec<u8> {
    let time_width = if version == 1 { 8 } else { 4 };
    let mut payload = vec![0; time_width * 2]; // creation_time, modification_time
    payload.extend_from_slice(&timescale.to_be_bytes());
    payload.extend_from_slice(&vec![0; time_width]); // duration
    payload.extend_from_slice(&0x15C7_u16.to_be_bytes()); // "eng"
    payload.extend_from_slice(&[0, 0]); // pre_defined
    full_box(b"mdhd", version, 0, &payload)
}

/// `moov` box describing a single wvtt track.
pub fn init_segment(mdhd: Vec<u8>) -> Vec<u8> {
    let mut stsd = 1_u32.to_be_bytes().to_vec();
    stsd.extend(mp4_box(b"wvtt", &[0; 8]));

    let stbl = mp4_box(b"stbl", &full_box(b"stsd", 0, 0, &stsd));
    let minf = mp4_box(b"minf", &stbl);
    let mdia = mp4_box(b"mdia", &[mdhd, minf].concat());
    let trak = mp4_box(b"trak", &mdia);
    mp4_box(b"moov", &trak)
}

pub fn tfdt(version: u8, base_time: u64) -> Vec<u8> {
    if version == 1 {
        full_box(b"tfdt", 1, 0, &base_time.to_be_bytes())
    } else {
        full_box(b"tfdt", 0, 0, &(base_time as u32).to_be_bytes())
    }
}

#[derive(Clone, Copy, Default)]
pub struct Sample {
    pub duration: Option<u32>,
    pub offset: Option<i32>,
}

pub fn sample(duration: u32) -> Sample {
    Sample {
        duration: Some(duration),
        offset: None,
    }
}

pub fn sample_at(duration: u32, offset: i32) -> Sample {
    Sample {
        duration: Some(duration),
        offset: Some(offset),
    }
}

/// Track run with a sample size field, so fields that are not read are
/// skipped in between. Durations and offsets are present for every sample
/// when at least one sample has them.
pub fn trun(version: u8, samples: &[Sample]) -> Vec<u8> {
    let has_duration = samples.iter().any(|x| x.duration.is_some());
    let has_offset = samples.iter().any(|x| x.offset.is_some());

    let mut flags = 0x000200;
    if has_duration {
        flags |= 0x000100;
    }
    if has_offset {
        flags |= 0x000800;
    }

    let mut payload = (samples.len() as u32).to_be_bytes().to_vec();

    for sample in samples {
        if has_duration {
            payload.extend_from_slice(&sample.duration.unwrap_or(0).to_be_bytes());
        }
        payload.extend_from_slice(&64_u32.to_be_bytes()); // sample_size
        if has_offset {
            payload.extend_from_slice(&sample.offset.unwrap_or(0).to_be_bytes());
        }
    }

    full_box(b"trun", version, flags, &payload)
}

pub fn vttc(text: &str) -> Vec<u8> {
    vttc_with(text, None, None)
}

pub fn vttc_with(text: &str, id: Option<&str>, settings: Option<&str>) -> Vec<u8> {
    let mut payload = vec![];

    if let Some(id) = id {
        payload.extend(mp4_box(b"iden", id.as_bytes()));
    }

    if let Some(settings) = settings {
        payload.extend(mp4_box(b"sttg", settings.as_bytes()));
    }

    payload.extend(mp4_box(b"payl", text.as_bytes()));
    mp4_box(b"vttc", &payload)
}

pub fn vtte() -> Vec<u8> {
    mp4_box(b"vtte", &[])
}

/// `moof` + `mdat` pair.
pub fn media_segment(tfdt: Vec<u8>, trun: Vec<u8>, payloads: &[Vec<u8>]) -> Vec<u8> {
    let traf = mp4_box(b"traf", &[tfdt, trun].concat());
    let moof = mp4_box(b"moof", &traf);
    let mdat = mp4_box(b"mdat", &payloads.concat());
    [moof, mdat].concat()
}
