// Builders for synthesized test files
#![allow(dead_code)]

use std::io::Write;

use tagscope::utils::synchsafe;
use tempfile::NamedTempFile;

/// Write `bytes` to a temporary file with the given suffix
pub fn write_temp(suffix: &str, bytes: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(bytes).expect("write temp file");
    file
}

/// ID3v2 tag with the given major version and pre-built frames
pub fn id3_tag(major: u8, flags: u8, frames: &[Vec<u8>]) -> Vec<u8> {
    let body = frames.concat();
    let mut out = b"ID3".to_vec();
    out.extend([major, 0, flags]);
    out.extend(synchsafe::encode(body.len() as u32));
    out.extend(body);
    out
}

/// v2.2 frame: 3-char id, 3-byte size
pub fn frame_v22(id: &str, payload: &[u8]) -> Vec<u8> {
    assert_eq!(id.len(), 3);
    let mut out = id.as_bytes().to_vec();
    out.extend(&(payload.len() as u32).to_be_bytes()[1..]);
    out.extend(payload);
    out
}

/// v2.3 frame: 4-char id, plain 4-byte size, flags
pub fn frame_v23(id: &str, payload: &[u8]) -> Vec<u8> {
    let mut out = id.as_bytes().to_vec();
    out.extend((payload.len() as u32).to_be_bytes());
    out.extend([0, 0]);
    out.extend(payload);
    out
}

/// v2.4 frame: 4-char id, synchsafe size, flags
pub fn frame_v24(id: &str, payload: &[u8]) -> Vec<u8> {
    let mut out = id.as_bytes().to_vec();
    out.extend(synchsafe::encode(payload.len() as u32));
    out.extend([0, 0]);
    out.extend(payload);
    out
}

/// Latin-1 text payload
pub fn latin1(text: &str) -> Vec<u8> {
    let mut out = vec![0];
    out.extend(text.chars().map(|c| c as u8));
    out
}

/// UTF-16 payload with a little-endian BOM and a terminator
pub fn utf16(text: &str) -> Vec<u8> {
    let mut out = vec![1, 0xFF, 0xFE];
    for unit in text.encode_utf16() {
        out.extend(unit.to_le_bytes());
    }
    out.extend([0, 0]);
    out
}

/// UTF-8 payload
pub fn utf8(text: &str) -> Vec<u8> {
    let mut out = vec![3];
    out.extend(text.as_bytes());
    out
}

/// Some fake MPEG audio
pub fn audio(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8 | 0x01).collect()
}

pub fn atom(name: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = ((body.len() + 8) as u32).to_be_bytes().to_vec();
    out.extend(name);
    out.extend(body);
    out
}

pub fn data_atom(flags: u8, value: &[u8]) -> Vec<u8> {
    let mut body = vec![0, 0, 0, flags, 0, 0, 0, 0];
    body.extend(value);
    atom(b"data", &body)
}

pub fn text_item(name: &[u8; 4], text: &str) -> Vec<u8> {
    atom(name, &data_atom(1, text.as_bytes()))
}

pub fn track_item(track: u8, total: u8) -> Vec<u8> {
    atom(b"trkn", &data_atom(0, &[0, 0, 0, track, 0, total, 0, 0]))
}

/// A minimal M4A file: ftyp, moov/udta/meta/ilst with `items`, mdat
pub fn m4a_file(items: &[Vec<u8>]) -> Vec<u8> {
    let ilst = atom(b"ilst", &items.concat());
    let mut meta_body = vec![0, 0, 0, 0];
    meta_body.extend(atom(b"hdlr", &[0u8; 25]));
    meta_body.extend(ilst);
    let udta = atom(b"udta", &atom(b"meta", &meta_body));
    let moov = atom(b"moov", &[atom(b"mvhd", &[0u8; 100]), udta].concat());
    [
        atom(b"ftyp", b"M4A \x00\x00\x02\x00isomiso2"),
        moov,
        atom(b"mdat", &audio(512)),
    ]
    .concat()
}
