//! STL decoding from raw upload bytes.
//!
//! Supports both binary and ASCII STL. Format detection follows the usual
//! heuristic: ASCII files start with "solid" and contain no NUL bytes in the
//! leading 80 bytes, everything else is treated as binary (80-byte header,
//! little-endian face count, 50-byte triangle records).

use crate::error::ParseError;
use crate::mesh::MeshBuffer;

const HEADER_SIZE: usize = 80;
/// Normal (12) + three vertices (36) + attribute byte count (2).
const TRIANGLE_SIZE: usize = 50;

/// Decode a raw mesh payload into a [`MeshBuffer`].
///
/// The payload is borrowed only for the duration of the call; the returned
/// buffer owns its own vertex data.
pub fn parse_mesh(bytes: &[u8]) -> Result<MeshBuffer, ParseError> {
    if bytes.len() < 6 {
        return Err(ParseError::TooSmall(bytes.len()));
    }
    if looks_ascii(bytes) {
        parse_ascii(bytes)
    } else {
        parse_binary(bytes)
    }
}

/// Binary STLs occasionally begin with "solid" too; NUL bytes in what would
/// be the ASCII preamble give them away.
fn looks_ascii(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(HEADER_SIZE)];
    let text = String::from_utf8_lossy(head);
    text.trim_start().starts_with("solid") && !head.contains(&0)
}

fn parse_binary(bytes: &[u8]) -> Result<MeshBuffer, ParseError> {
    if bytes.len() < HEADER_SIZE + 4 {
        return Err(ParseError::TooSmall(bytes.len()));
    }
    let face_count = u32::from_le_bytes([
        bytes[HEADER_SIZE],
        bytes[HEADER_SIZE + 1],
        bytes[HEADER_SIZE + 2],
        bytes[HEADER_SIZE + 3],
    ]) as usize;

    if face_count == 0 {
        return Err(ParseError::NoTriangles);
    }
    let needed = HEADER_SIZE + 4 + face_count * TRIANGLE_SIZE;
    if bytes.len() < needed {
        return Err(ParseError::invalid(format!(
            "binary STL declares {} triangles but payload holds {} bytes",
            face_count,
            bytes.len()
        )));
    }

    let mut vertices = Vec::with_capacity(face_count * 3);
    for face in 0..face_count {
        let record = &bytes[HEADER_SIZE + 4 + face * TRIANGLE_SIZE..];
        // Skip the 12-byte normal; it is frequently wrong anyway.
        for v in 0..3 {
            vertices.push(read_vertex(&record[12 + v * 12..]));
        }
    }
    MeshBuffer::soup(vertices)
}

fn read_vertex(buf: &[u8]) -> [f64; 3] {
    let f = |o: usize| f32::from_le_bytes([buf[o], buf[o + 1], buf[o + 2], buf[o + 3]]) as f64;
    [f(0), f(4), f(8)]
}

fn parse_ascii(bytes: &[u8]) -> Result<MeshBuffer, ParseError> {
    let text = String::from_utf8_lossy(bytes);
    let mut vertices = Vec::new();

    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("vertex") {
            continue;
        }
        let mut coord = [0.0f64; 3];
        for c in &mut coord {
            *c = tokens
                .next()
                .and_then(|t| t.parse::<f64>().ok())
                .ok_or_else(|| ParseError::invalid(format!("bad vertex line: {}", line.trim())))?;
        }
        vertices.push(coord);
    }

    if vertices.is_empty() {
        return Err(ParseError::NoTriangles);
    }
    if vertices.len() % 3 != 0 {
        return Err(ParseError::invalid(format!(
            "ASCII STL has {} vertices, not a whole number of facets",
            vertices.len()
        )));
    }
    MeshBuffer::soup(vertices)
}
