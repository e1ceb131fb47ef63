//! Lossless text decoding for classified-text files.
//!
//! Decoding never fails for arbitrary byte content: BOM-carrying files decode
//! with the implied encoding (replacement characters on malformed units),
//! everything else tries strict UTF-8 and falls back to Latin-1, which maps
//! every byte 0-255 to one character. Python sources get one extra step: a
//! PEP 263 `coding:` comment on the first two lines is honored when its label
//! is recognized.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::classify::{Bom, SAMPLE_BYTES};
use crate::error::SnapshotError;

static CODING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"coding[:=][ \t]*([-_.a-zA-Z0-9]+)").unwrap());

/// Reads a text file, preserving the decoded characters exactly.
pub fn read_text(path: &Path) -> Result<String, SnapshotError> {
    let bytes = fs::read(path).map_err(|e| SnapshotError::io(path, e))?;
    if path.extension().and_then(|e| e.to_str()) == Some("py") {
        if let Some(decoded) = decode_with_pragma(&bytes) {
            return Ok(decoded);
        }
    }
    Ok(decode_generic(&bytes))
}

/// BOM-aware decode with UTF-8 then Latin-1 fallback.
fn decode_generic(bytes: &[u8]) -> String {
    if let Some(bom) = Bom::detect(bytes) {
        let body = &bytes[bom.len()..];
        return match bom {
            Bom::Utf8 => String::from_utf8_lossy(body).into_owned(),
            Bom::Utf16Le => decode_utf16(body, true),
            Bom::Utf16Be => decode_utf16(body, false),
            Bom::Utf32Le => decode_utf32(body, true),
            Bom::Utf32Be => decode_utf32(body, false),
        };
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        Err(_) => decode_latin1(bytes),
    }
}

/// Looks for a `coding[:=] <label>` comment on the first two lines and decodes
/// with it. Returns `None` when there is no pragma or the label is unknown,
/// in which case the caller falls through to the generic path.
fn decode_with_pragma(bytes: &[u8]) -> Option<String> {
    let head_len = bytes.len().min(SAMPLE_BYTES);
    let head = String::from_utf8_lossy(&bytes[..head_len]);
    for line in head.lines().take(2) {
        if !line.trim_start().starts_with('#') {
            continue;
        }
        if let Some(captures) = CODING_RE.captures(line) {
            return decode_label(&captures[1].to_ascii_lowercase(), bytes);
        }
    }
    None
}

fn decode_label(label: &str, bytes: &[u8]) -> Option<String> {
    match label {
        "utf-8" | "utf8" | "ascii" | "us-ascii" => Some(match std::str::from_utf8(bytes) {
            Ok(text) => text.to_owned(),
            Err(_) => String::from_utf8_lossy(bytes).into_owned(),
        }),
        "utf-8-sig" => {
            let body = match Bom::detect(bytes) {
                Some(Bom::Utf8) => &bytes[3..],
                _ => bytes,
            };
            Some(String::from_utf8_lossy(body).into_owned())
        }
        "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Some(decode_latin1(bytes)),
        "utf-16" | "utf-16-le" | "utf16" => Some(decode_generic_utf16(bytes, true)),
        "utf-16-be" => Some(decode_generic_utf16(bytes, false)),
        _ => None,
    }
}

/// UTF-16 decode that strips a leading BOM if one is present.
fn decode_generic_utf16(bytes: &[u8], little_endian: bool) -> String {
    match Bom::detect(bytes) {
        Some(Bom::Utf16Le) => decode_utf16(&bytes[2..], true),
        Some(Bom::Utf16Be) => decode_utf16(&bytes[2..], false),
        _ => decode_utf16(bytes, little_endian),
    }
}

fn decode_utf16(bytes: &[u8], little_endian: bool) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| {
            let pair = [pair[0], pair[1]];
            if little_endian {
                u16::from_le_bytes(pair)
            } else {
                u16::from_be_bytes(pair)
            }
        })
        .collect();
    let mut text = String::from_utf16_lossy(&units);
    // A trailing odd byte cannot form a code unit; surface it as U+FFFD.
    if bytes.len() % 2 != 0 {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}

fn decode_utf32(bytes: &[u8], little_endian: bool) -> String {
    let mut text = String::with_capacity(bytes.len() / 4);
    for quad in bytes.chunks_exact(4) {
        let quad = [quad[0], quad[1], quad[2], quad[3]];
        let unit = if little_endian {
            u32::from_le_bytes(quad)
        } else {
            u32::from_be_bytes(quad)
        };
        text.push(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
    }
    if bytes.len() % 4 != 0 {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}

/// Byte 0-255 maps to U+0000-U+00FF, so this never fails and re-encoding
/// reproduces the original bytes exactly.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn utf8_content_read_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.md");
        fs::write(&path, "héllo\nwörld").unwrap();
        assert_eq!(read_text(&path).unwrap(), "héllo\nwörld");
    }

    #[test]
    fn latin1_round_trip_is_lossless() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("legacy.cfg");
        let original: Vec<u8> = (128u8..=255).collect();
        fs::write(&path, &original).unwrap();
        let text = read_text(&path).unwrap();
        let reencoded: Vec<u8> = text.chars().map(|c| c as u32 as u8).collect();
        assert_eq!(reencoded, original);
    }

    #[test]
    fn utf16le_bom_is_stripped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.txt");
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "snapshot".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        fs::write(&path, &bytes).unwrap();
        assert_eq!(read_text(&path).unwrap(), "snapshot");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sig.txt");
        fs::write(&path, b"\xEF\xBB\xBFhello").unwrap();
        assert_eq!(read_text(&path).unwrap(), "hello");
    }

    #[test]
    fn utf32be_decodes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide32.txt");
        let mut bytes = vec![0x00, 0x00, 0xFE, 0xFF];
        for c in "ok".chars() {
            bytes.extend_from_slice(&(c as u32).to_be_bytes());
        }
        fs::write(&path, &bytes).unwrap();
        assert_eq!(read_text(&path).unwrap(), "ok");
    }

    #[test]
    fn python_coding_pragma_is_honored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("legacy.py");
        let mut bytes = b"# -*- coding: latin-1 -*-\ns = '".to_vec();
        bytes.push(0xE9); // 'é' in Latin-1, invalid as standalone UTF-8
        bytes.extend_from_slice(b"'\n");
        fs::write(&path, &bytes).unwrap();
        let text = read_text(&path).unwrap();
        assert!(text.contains('é'));
    }

    #[test]
    fn unknown_pragma_label_falls_back_to_generic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("odd.py");
        fs::write(&path, "# coding: koi8-r\nprint('ok')\n").unwrap();
        assert_eq!(read_text(&path).unwrap(), "# coding: koi8-r\nprint('ok')\n");
    }

    #[test]
    fn pragma_only_checked_on_first_two_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("late.py");
        let content = "x = 1\ny = 2\n# coding: latin-1\n";
        fs::write(&path, content).unwrap();
        assert_eq!(read_text(&path).unwrap(), content);
    }
}
