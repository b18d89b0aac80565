//! Fixture encoder shared by the integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

const CRITICAL: [u8; 7] = [0x00, 0x09, 0x0A, 0x0D, 0x20, 0x2E, 0x3D];

/// Encode `data` as yEnc data lines of at most `line_len` characters
pub fn encode_lines(data: &[u8], line_len: usize) -> Vec<u8> {
    let mut out = Vec::new();
    let mut col = 0;
    for &byte in data {
        let encoded = byte.wrapping_add(42);
        if CRITICAL.contains(&encoded) {
            out.push(b'=');
            out.push(encoded.wrapping_add(64));
            col += 2;
        } else {
            out.push(encoded);
            col += 1;
        }
        if col >= line_len {
            out.extend_from_slice(b"\r\n");
            col = 0;
        }
    }
    if col > 0 {
        out.extend_from_slice(b"\r\n");
    }
    out
}

/// A complete single-part post with a correct `crc32`
pub fn single_part(name: &str, data: &[u8]) -> Vec<u8> {
    let mut out = format!("=ybegin line=128 size={} name={}\r\n", data.len(), name).into_bytes();
    out.extend(encode_lines(data, 128));
    out.extend(
        format!("=yend size={} crc32={:08x}\r\n", data.len(), crc32fast::hash(data)).into_bytes(),
    );
    out
}

/// Split `data` into parts of `part_len` bytes. Every trailer carries
/// `pcrc32`; the last one also carries the whole-file `crc32`.
pub fn multipart(name: &str, data: &[u8], part_len: usize) -> Vec<Vec<u8>> {
    let chunks: Vec<&[u8]> = data.chunks(part_len).collect();
    let total = chunks.len();
    let mut begin = 1;

    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let part = i + 1;
            let end = begin + chunk.len() - 1;
            let mut out = format!(
                "=ybegin part={} total={} line=128 size={} name={}\r\n=ypart begin={} end={}\r\n",
                part,
                total,
                data.len(),
                name,
                begin,
                end
            )
            .into_bytes();
            out.extend(encode_lines(chunk, 128));
            let mut trailer = format!(
                "=yend size={} part={} pcrc32={:08x}",
                chunk.len(),
                part,
                crc32fast::hash(chunk)
            );
            if part == total {
                trailer.push_str(&format!(" crc32={:08x}", crc32fast::hash(data)));
            }
            trailer.push_str("\r\n");
            out.extend(trailer.into_bytes());
            begin = end + 1;
            out
        })
        .collect()
}

/// Write each post to `dir/<stem>.<n>.yenc`
pub fn write_posts(dir: &Path, stem: &str, posts: &[Vec<u8>]) -> Vec<PathBuf> {
    posts
        .iter()
        .enumerate()
        .map(|(i, post)| {
            let path = dir.join(format!("{}.{:03}.yenc", stem, i + 1));
            fs::write(&path, post).unwrap();
            path
        })
        .collect()
}

/// Deterministic pseudo-random bytes
pub fn sample_data(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + 13) as u8).collect()
}
