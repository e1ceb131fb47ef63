//! Text/binary classification.
//!
//! A file is considered text if its extension is on the allow-list, if it
//! starts with a Unicode byte-order mark, if its guessed MIME type is textual,
//! or if a sample of its leading bytes passes the control-byte heuristic.
//! Sampling failures classify as binary rather than aborting the run.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// How many leading bytes are sampled for BOM detection and the byte heuristic.
pub const SAMPLE_BYTES: usize = 4096;

/// Extensions (and dotfile basenames) always treated as text, whatever the
/// sampled bytes look like.
const TEXT_EXTENSIONS: &[&str] = &[
    // Code
    ".java", ".kt", ".kts",
    ".js", ".ts", ".jsx", ".tsx",
    ".css", ".scss", ".sass", ".less",
    ".html", ".htm", ".vue", ".svelte",
    ".c", ".h", ".cpp", ".hpp", ".cc", ".m", ".mm",
    ".go", ".rs", ".py", ".php", ".rb", ".swift", ".scala",
    ".cs", ".sql", ".sh", ".bat", ".ps1",
    // Config / data / docs
    ".json", ".yaml", ".yml", ".xml", ".ini", ".cfg", ".conf", ".properties",
    ".toml", ".gradle", ".md", ".txt", ".env", ".csv", ".tsv",
    ".gitignore", ".gitattributes", ".editorconfig", ".prettierrc", ".eslintrc",
];

/// MIME types treated as text even when the extension is unknown, on top of
/// the whole `text/*` family.
const TEXT_MIME_EXTRAS: &[&str] = &[
    "application/json",
    "application/xml",
    "application/javascript",
    "application/x-sh",
    "application/x-shellscript",
];

/// A leading byte-order mark and the encoding it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bom {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl Bom {
    /// Detects a BOM at the start of `head`. UTF-32 prefixes are checked
    /// before UTF-16 since `FF FE 00 00` also starts with the UTF-16 LE mark.
    pub fn detect(head: &[u8]) -> Option<Bom> {
        if head.starts_with(&[0xEF, 0xBB, 0xBF]) {
            Some(Bom::Utf8)
        } else if head.starts_with(&[0xFF, 0xFE, 0x00, 0x00]) {
            Some(Bom::Utf32Le)
        } else if head.starts_with(&[0x00, 0x00, 0xFE, 0xFF]) {
            Some(Bom::Utf32Be)
        } else if head.starts_with(&[0xFF, 0xFE]) {
            Some(Bom::Utf16Le)
        } else if head.starts_with(&[0xFE, 0xFF]) {
            Some(Bom::Utf16Be)
        } else {
            None
        }
    }

    /// Length of the mark in bytes.
    pub fn len(self) -> usize {
        match self {
            Bom::Utf8 => 3,
            Bom::Utf16Le | Bom::Utf16Be => 2,
            Bom::Utf32Le | Bom::Utf32Be => 4,
        }
    }
}

/// Reads up to [`SAMPLE_BYTES`] from the start of the file.
pub(crate) fn sample_head(path: &Path) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut head = Vec::with_capacity(SAMPLE_BYTES);
    file.take(SAMPLE_BYTES as u64).read_to_end(&mut head)?;
    Ok(head)
}

/// Whether the extension (or dotfile basename) is on the text allow-list.
pub fn has_text_extension(path: &Path) -> bool {
    if let Some(name) = path.file_name().and_then(OsStr::to_str) {
        if name.starts_with('.') && TEXT_EXTENSIONS.contains(&name.to_ascii_lowercase().as_str()) {
            return true;
        }
    }
    match path.extension().and_then(OsStr::to_str) {
        Some(ext) => {
            let dotted = format!(".{}", ext.to_ascii_lowercase());
            TEXT_EXTENSIONS.contains(&dotted.as_str())
        }
        None => false,
    }
}

fn looks_binary(head: &[u8]) -> bool {
    if head.contains(&0) {
        return true;
    }
    if head.is_empty() {
        return false;
    }
    // Control bytes other than \t \n \r \x0c count as "weird".
    let weird = head
        .iter()
        .filter(|&&b| b < 32 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0C))
        .count();
    weird as f64 / head.len() as f64 > 0.30
}

fn mime_is_text(path: &Path) -> bool {
    match mime_guess::from_path(path).first() {
        Some(mime) => {
            mime.type_() == mime_guess::mime::TEXT
                || TEXT_MIME_EXTRAS.contains(&mime.essence_str())
        }
        None => false,
    }
}

/// Decides whether `path` holds text. First match wins: extension allow-list,
/// BOM, MIME guess, then the byte heuristic. Sampling errors yield `false`.
pub fn is_text(path: &Path) -> bool {
    if has_text_extension(path) {
        return true;
    }
    let head = match sample_head(path) {
        Ok(head) => head,
        Err(_) => return false,
    };
    if Bom::detect(&head).is_some() {
        return true;
    }
    if mime_is_text(path) {
        return true;
    }
    !looks_binary(&head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn allowlisted_extension_wins_over_nul_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weird.rs");
        fs::write(&path, [0u8, 0, 0, 0]).unwrap();
        assert!(is_text(&path));
    }

    #[test]
    fn dotfile_basenames_match_the_allowlist() {
        assert!(has_text_extension(Path::new(".gitignore")));
        assert!(has_text_extension(Path::new(".editorconfig")));
        assert!(!has_text_extension(Path::new(".hidden")));
    }

    #[test]
    fn nul_byte_means_binary() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.dat");
        fs::write(&path, b"abc\x00def").unwrap();
        assert!(!is_text(&path));
    }

    #[test]
    fn bom_means_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bommed.dat");
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "hi".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        fs::write(&path, &bytes).unwrap();
        assert!(is_text(&path));
    }

    #[test]
    fn utf32_bom_detected_before_utf16() {
        assert_eq!(
            Bom::detect(&[0xFF, 0xFE, 0x00, 0x00]),
            Some(Bom::Utf32Le)
        );
        assert_eq!(Bom::detect(&[0xFF, 0xFE, 0x41, 0x00]), Some(Bom::Utf16Le));
        assert_eq!(Bom::detect(&[0x00, 0x00, 0xFE, 0xFF]), Some(Bom::Utf32Be));
        assert_eq!(Bom::detect(b"plain"), None);
    }

    #[test]
    fn control_heavy_sample_is_binary() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ctrl.dat");
        // Half the bytes are \x01, well past the 30% threshold.
        let mut bytes = Vec::new();
        for _ in 0..50 {
            bytes.push(0x01);
            bytes.push(b'a');
        }
        fs::write(&path, &bytes).unwrap();
        assert!(!is_text(&path));
    }

    #[test]
    fn plain_ascii_without_extension_is_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("LICENSE");
        fs::write(&path, "MIT License\n").unwrap();
        assert!(is_text(&path));
    }

    #[test]
    fn missing_file_is_binary() {
        assert!(!is_text(Path::new("/nonexistent/definitely-not-here")));
    }
}
