//! Text decoding with a single fallback encoding.
//!
//! Input files are read as:
//! - UTF-8 (a leading BOM is dropped)
//! - otherwise one fallback encoding, either a fixed label such as
//!   `windows-1255` or `auto` for chardetng detection
//!
//! A file that decodes under neither is an error.

use anyhow::{Context, Result};
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::path::Path;

/// Fallback label that asks for detection instead of a fixed encoding.
pub const AUTO_ENCODING: &str = "auto";

const UTF8_BOM: &[u8] = &[0xef, 0xbb, 0xbf];
const DEFAULT_SAMPLE_SIZE: usize = 8192;

/// Guess the encoding of a non-UTF-8 byte sample.
///
/// The `.il` TLD hint biases chardetng toward Hebrew code pages.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    let sample = &bytes[..bytes.len().min(DEFAULT_SAMPLE_SIZE)];
    let mut detector = EncodingDetector::new();
    detector.feed(sample, sample.len() == bytes.len());
    detector.guess(Some(b"il".as_slice()), true)
}

/// Decode `bytes` as UTF-8, then once more with `fallback`.
///
/// Returns the text and the lowercase name of the encoding that worked.
pub fn decode_with_fallback(bytes: &[u8], fallback: &str) -> Result<(String, String)> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(body) {
        return Ok((text.to_string(), "utf-8".to_string()));
    }

    let encoding = if fallback.eq_ignore_ascii_case(AUTO_ENCODING) {
        detect_encoding(bytes)
    } else {
        Encoding::for_label(fallback.trim().as_bytes())
            .with_context(|| format!("Unknown fallback encoding '{fallback}'"))?
    };

    let name = encoding.name().to_lowercase();
    let text = encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .with_context(|| format!("Input is neither valid UTF-8 nor valid {name}"))?;
    tracing::debug!(encoding = %name, "decoded input with fallback encoding");
    Ok((text.into_owned(), name))
}

/// Read a text file with [`decode_with_fallback`].
pub fn read_text_with_fallback(path: &Path, fallback: &str) -> Result<(String, String)> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    decode_with_fallback(&bytes, fallback)
        .with_context(|| format!("Failed to decode {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_utf8_fast_path() {
        let (text, enc) = decode_with_fallback("שלום".as_bytes(), "windows-1255").unwrap();
        assert_eq!(text, "שלום");
        assert_eq!(enc, "utf-8");
    }

    #[test]
    fn test_utf8_bom_is_dropped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("date,title".as_bytes());
        let (text, _) = decode_with_fallback(&bytes, "windows-1255").unwrap();
        assert_eq!(text, "date,title");
    }

    #[test]
    fn test_windows_1255_fallback() {
        let (bytes, _, _) = encoding_rs::WINDOWS_1255.encode("ועדת הכספים");
        let (text, enc) = decode_with_fallback(&bytes, "windows-1255").unwrap();
        assert_eq!(text, "ועדת הכספים");
        assert_eq!(enc, "windows-1255");
    }

    #[test]
    fn test_cp1255_label_alias() {
        let (bytes, _, _) = encoding_rs::WINDOWS_1255.encode("מרכז המחקר");
        let (text, _) = decode_with_fallback(&bytes, "cp1255").unwrap();
        assert_eq!(text, "מרכז המחקר");
    }

    #[test]
    fn test_unknown_fallback_label() {
        let err = decode_with_fallback(&[0xff, 0xfe, 0xfd], "no-such-encoding").unwrap_err();
        assert!(err.to_string().contains("Unknown fallback encoding"));
    }

    #[test]
    fn test_read_text_with_fallback_missing_file() {
        assert!(read_text_with_fallback(Path::new("/nonexistent/input.csv"), "auto").is_err());
    }

    #[test]
    fn test_read_text_with_fallback_file() {
        let mut file = NamedTempFile::new().unwrap();
        let (bytes, _, _) = encoding_rs::WINDOWS_1255.encode("date,title\n2021-01-01,דוח\n");
        file.write_all(&bytes).unwrap();
        file.flush().unwrap();

        let (text, enc) = read_text_with_fallback(file.path(), "windows-1255").unwrap();
        assert!(text.contains("דוח"));
        assert_eq!(enc, "windows-1255");
    }
}
