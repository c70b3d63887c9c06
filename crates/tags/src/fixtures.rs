//! Minimal but well-formed audio files for exercising real tag reads and
//! writes.

use std::fs;
use std::path::Path;

const SAMPLE_RATE: u64 = 44_100;

fn block_header(block_type: u8, last: bool, len: usize) -> [u8; 4] {
    let len = len as u32;
    let flag = if last { 0x80 } else { 0 };
    [
        flag | block_type,
        (len >> 16) as u8,
        (len >> 8) as u8,
        len as u8,
    ]
}

fn stream_info() -> Vec<u8> {
    let mut info = Vec::with_capacity(34);
    info.extend_from_slice(&4096u16.to_be_bytes());
    info.extend_from_slice(&4096u16.to_be_bytes());
    // min/max frame size unknown
    info.extend_from_slice(&[0; 6]);
    // sample rate, 2 channels, 16 bits per sample, no sample count
    let packed = (SAMPLE_RATE << 44) | (1 << 41) | (15 << 36);
    info.extend_from_slice(&packed.to_be_bytes());
    info.extend_from_slice(&[0; 16]);
    info
}

fn vorbis_comment(comments: &[(&str, &str)]) -> Vec<u8> {
    let vendor = b"album-tidy fixture";
    let mut block = Vec::new();
    block.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
    block.extend_from_slice(vendor);
    block.extend_from_slice(&(comments.len() as u32).to_le_bytes());
    for (key, value) in comments {
        let entry = format!("{}={}", key, value);
        block.extend_from_slice(&(entry.len() as u32).to_le_bytes());
        block.extend_from_slice(entry.as_bytes());
    }
    block
}

/// FLAC stream with STREAMINFO, the given comments, trailing padding and a
/// few bytes standing in for audio frames
pub fn write_flac(path: &Path, comments: &[(&str, &str)]) {
    let info = stream_info();
    let comment = vorbis_comment(comments);
    let padding = [0u8; 64];

    let mut bytes = b"fLaC".to_vec();
    bytes.extend_from_slice(&block_header(0, false, info.len()));
    bytes.extend_from_slice(&info);
    bytes.extend_from_slice(&block_header(4, false, comment.len()));
    bytes.extend_from_slice(&comment);
    bytes.extend_from_slice(&block_header(1, true, padding.len()));
    bytes.extend_from_slice(&padding);
    bytes.extend_from_slice(&[0xFF, 0xF8, 0x69, 0x08, 0, 0, 0, 0]);

    fs::write(path, bytes).unwrap();
}

fn syncsafe(size: usize) -> [u8; 4] {
    let size = size as u32;
    [
        ((size >> 21) & 0x7F) as u8,
        ((size >> 14) & 0x7F) as u8,
        ((size >> 7) & 0x7F) as u8,
        (size & 0x7F) as u8,
    ]
}

/// MP3 with an ID3v2.3 tag of Latin-1 text frames followed by silent
/// MPEG-1 Layer III frames (128 kbps, 44.1 kHz)
pub fn write_mp3(path: &Path, frames: &[(&str, &str)]) {
    let mut body = Vec::new();
    for (id, text) in frames {
        body.extend_from_slice(id.as_bytes());
        body.extend_from_slice(&(text.len() as u32 + 1).to_be_bytes());
        body.extend_from_slice(&[0, 0]);
        body.push(0);
        body.extend_from_slice(text.as_bytes());
    }

    let mut bytes = b"ID3".to_vec();
    bytes.extend_from_slice(&[3, 0, 0]);
    bytes.extend_from_slice(&syncsafe(body.len()));
    bytes.extend_from_slice(&body);

    for _ in 0..10 {
        bytes.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
        bytes.extend_from_slice(&[0; 413]);
    }

    fs::write(path, bytes).unwrap();
}
