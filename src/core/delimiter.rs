// Record delimiter: an immutable byte pattern plus a precomputed
// Boyer-Moore-Horspool skip table.
//
// The skip table has one entry per possible byte value. A failed match
// shifts the search window by skip[trailing byte]; bytes that never occur
// in the pattern shift by the full pattern length, which is what makes the
// search sub-linear on average for patterns with low self-similarity.

use std::fmt;

use crate::error::{Error, Result};

/// An immutable byte pattern marking record boundaries.
///
/// Construct once, then share freely across concurrent scanners; searching
/// never mutates the delimiter.
#[derive(Clone)]
pub struct Delimiter {
    pattern: Vec<u8>,
    skip: [usize; 256],
}

impl Delimiter {
    /// Single-byte delimiter. Cannot fail: any byte is a valid pattern.
    pub fn from_byte(byte: u8) -> Delimiter {
        Self::build(vec![byte])
    }

    /// Multi-byte delimiter from a byte sequence.
    pub fn from_bytes(pattern: impl AsRef<[u8]>) -> Result<Delimiter> {
        let pattern = pattern.as_ref();
        if pattern.is_empty() {
            return Err(Error::InvalidPattern("pattern must not be empty".into()));
        }
        Ok(Self::build(pattern.to_vec()))
    }

    /// Delimiter from UTF-8 text, matched byte-wise.
    pub fn from_text(text: &str) -> Result<Delimiter> {
        Self::from_bytes(text.as_bytes())
    }

    /// The common newline (`\n`) record delimiter.
    pub fn newline() -> Delimiter {
        Self::from_byte(b'\n')
    }

    fn build(pattern: Vec<u8>) -> Delimiter {
        let len = pattern.len();
        let mut skip = [len; 256];
        // Rightmost occurrence wins; the final pattern byte keeps the
        // default shift.
        for (i, &byte) in pattern[..len - 1].iter().enumerate() {
            skip[byte as usize] = len - 1 - i;
        }
        Delimiter { pattern, skip }
    }

    /// Pattern length in bytes.
    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    /// A delimiter is never empty; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The raw pattern bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pattern
    }

    /// Offset of the first occurrence of the pattern in `haystack`.
    pub fn search(&self, haystack: &[u8]) -> Option<usize> {
        self.search_from(haystack, 0)
    }

    /// Offset of the first occurrence at or after `from`.
    ///
    /// The returned offset is absolute within `haystack`.
    pub fn search_from(&self, haystack: &[u8], from: usize) -> Option<usize> {
        let m = self.pattern.len();
        let n = haystack.len();
        if from > n || n - from < m {
            return None;
        }
        let mut i = from;
        while i + m <= n {
            // Compare right-to-left inside the current window.
            let mut j = m;
            while j > 0 && haystack[i + j - 1] == self.pattern[j - 1] {
                j -= 1;
            }
            if j == 0 {
                return Some(i);
            }
            i += self.skip[haystack[i + m - 1] as usize];
        }
        None
    }
}

impl fmt::Debug for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Delimiter({})", self)
    }
}

/// Diagnostic rendering only: control bytes map to visible glyphs so a
/// delimiter shows up in logs. Never used for matching.
impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.pattern {
            match byte {
                0x00 => f.write_str("\u{2400}")?,         // ␀ NUL
                0x09 => f.write_str("\u{2409}")?,         // ␉ TAB
                0x0a => f.write_str("\u{240a}")?,         // ␊ LF
                0x0d => f.write_str("\u{240d}")?,         // ␍ CR
                0x1e => f.write_str("\u{241e}")?,         // ␞ RS
                0x20 => f.write_str("\u{2420}")?,         // ␠ SP
                b',' | b'"' => write!(f, "{}", byte as char)?,
                0x21..=0x7e => write!(f, "{}", byte as char)?,
                other => write!(f, "\\x{:02x}", other)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn skip_table_defaults_to_pattern_length() {
        let d = Delimiter::from_bytes(b"::").unwrap();
        // ':' occurs before the last position: shift 1. Everything else: 2.
        assert_eq!(d.skip[b':' as usize], 1);
        assert_eq!(d.skip[b'a' as usize], 2);
    }

    #[test]
    fn skip_table_rightmost_occurrence_wins() {
        let d = Delimiter::from_bytes(b"abcab").unwrap();
        // 'a' at index 3 overwrites index 0: 5 - 1 - 3 = 1
        assert_eq!(d.skip[b'a' as usize], 1);
        // 'b' at index 1 (last byte does not enter the table): 5 - 1 - 1 = 3
        assert_eq!(d.skip[b'b' as usize], 3);
        assert_eq!(d.skip[b'c' as usize], 2);
        assert_eq!(d.skip[b'z' as usize], 5);
    }

    #[rstest]
    #[case(b"ab\ncd".as_slice(), Some(2))]
    #[case(b"\nabc".as_slice(), Some(0))]
    #[case(b"abc\n".as_slice(), Some(3))]
    #[case(b"abc".as_slice(), None)]
    #[case(b"".as_slice(), None)]
    fn search_single_byte(#[case] haystack: &[u8], #[case] expected: Option<usize>) {
        let d = Delimiter::newline();
        assert_eq!(d.search(haystack), expected);
    }

    #[rstest]
    #[case(b"ab\r\ncd\r\n".as_slice(), 0, Some(2))]
    #[case(b"ab\r\ncd\r\n".as_slice(), 3, Some(6))]
    #[case(b"ab\rcd".as_slice(), 0, None)]
    #[case(b"\r\r\n".as_slice(), 0, Some(1))]
    fn search_multi_byte(#[case] haystack: &[u8], #[case] from: usize, #[case] expected: Option<usize>) {
        let d = Delimiter::from_bytes(b"\r\n").unwrap();
        assert_eq!(d.search_from(haystack, from), expected);
    }

    #[test]
    fn search_from_past_end_is_none() {
        let d = Delimiter::newline();
        assert_eq!(d.search_from(b"a\n", 2), None);
        assert_eq!(d.search_from(b"a\n", 10), None);
    }

    #[test]
    fn search_finds_first_of_many() {
        let d = Delimiter::from_bytes(b"--").unwrap();
        assert_eq!(d.search(b"a--b--c"), Some(1));
        assert_eq!(d.search_from(b"a--b--c", 2), Some(4));
    }

    #[test]
    fn self_similar_pattern_matches() {
        let d = Delimiter::from_bytes(b"aaa").unwrap();
        assert_eq!(d.search(b"aabaaa"), Some(3));
        assert_eq!(d.search(b"aaaa"), Some(0));
    }

    #[test]
    fn empty_pattern_is_invalid() {
        assert!(matches!(
            Delimiter::from_bytes(b""),
            Err(Error::InvalidPattern(_))
        ));
        assert!(matches!(
            Delimiter::from_text(""),
            Err(Error::InvalidPattern(_))
        ));
    }

    #[test]
    fn display_maps_control_bytes_to_glyphs() {
        let d = Delimiter::from_bytes(b"\r\n").unwrap();
        assert_eq!(d.to_string(), "\u{240d}\u{240a}");
        let d = Delimiter::from_byte(b',');
        assert_eq!(d.to_string(), ",");
        let d = Delimiter::from_byte(0x1e);
        assert_eq!(d.to_string(), "\u{241e}");
        let d = Delimiter::from_byte(0x07);
        assert_eq!(d.to_string(), "\\x07");
    }
}
