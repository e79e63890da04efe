//! Fixed-size overlapping chunker.
//!
//! Windows are counted in characters, not bytes, so Cyrillic and CJK
//! knowledge documents are never split mid-character. No sentence or
//! paragraph awareness — the corpus is small enough that overlap alone
//! keeps answers from falling across a boundary.

use konsult_core::error::{KonsultError, Result};
use konsult_core::types::Passage;

/// Split `text` into consecutive windows of `chunk_size` characters,
/// advancing by `chunk_size - overlap` each step. The final window may be
/// shorter. Output preserves source order; `source_offset` is the starting
/// character index of each passage.
pub fn split(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<Passage>> {
    if chunk_size == 0 {
        return Err(KonsultError::InvalidArgument(
            "chunk_size must be positive".into(),
        ));
    }
    if overlap >= chunk_size {
        return Err(KonsultError::InvalidArgument(format!(
            "overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"
        )));
    }
    if text.is_empty() {
        return Ok(Vec::new());
    }

    // Byte offset of every char boundary, plus the end of the text, so each
    // window is a plain subslice instead of a per-chunk char walk.
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()))
        .collect();
    let total_chars = boundaries.len() - 1;

    let step = chunk_size - overlap;
    let mut passages = Vec::new();
    let mut start = 0usize;

    while start < total_chars {
        let end = (start + chunk_size).min(total_chars);
        passages.push(Passage {
            text: text[boundaries[start]..boundaries[end]].to_string(),
            source_offset: start,
        });
        if end == total_chars {
            break;
        }
        start += step;
    }

    Ok(passages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        assert!(split("", 100, 10).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(matches!(
            split("abc", 0, 0),
            Err(KonsultError::InvalidArgument(_))
        ));
        assert!(matches!(
            split("abc", 10, 10),
            Err(KonsultError::InvalidArgument(_))
        ));
        assert!(matches!(
            split("abc", 10, 11),
            Err(KonsultError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_exact_windows_no_overlap() {
        let passages = split("abcdefghij", 5, 0).unwrap();
        assert_eq!(passages.len(), 2);
        assert_eq!(passages[0].text, "abcde");
        assert_eq!(passages[0].source_offset, 0);
        assert_eq!(passages[1].text, "fghij");
        assert_eq!(passages[1].source_offset, 5);
    }

    #[test]
    fn test_overlapping_windows() {
        let passages = split("abcdefg", 3, 1).unwrap();
        // step = 2; the window reaching the end is the last one emitted —
        // no degenerate pure-overlap tail.
        assert_eq!(
            passages.iter().map(|p| p.text.as_str()).collect::<Vec<_>>(),
            vec!["abc", "cde", "efg"]
        );
        assert_eq!(
            passages.iter().map(|p| p.source_offset).collect::<Vec<_>>(),
            vec![0, 2, 4]
        );
    }

    #[test]
    fn test_short_final_window() {
        let passages = split("abcdefgh", 3, 1).unwrap();
        assert_eq!(
            passages.iter().map(|p| p.text.as_str()).collect::<Vec<_>>(),
            vec!["abc", "cde", "efg", "gh"]
        );
        assert_eq!(passages.last().unwrap().source_offset, 6);
    }

    #[test]
    fn test_text_shorter_than_chunk() {
        let passages = split("hi", 100, 10).unwrap();
        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].text, "hi");
    }

    #[test]
    fn test_multibyte_never_split() {
        // Cyrillic is 2 bytes per char; a byte-indexed implementation panics.
        let text = "Максимальная нагрузка на ось составляет 25 тонн.";
        let passages = split(text, 10, 3).unwrap();
        assert!(!passages.is_empty());
        for p in &passages {
            assert!(p.text.chars().count() <= 10);
        }
        // Every passage is valid UTF-8 from the source by construction; the
        // windows must also cover the whole text.
        assert!(passages.last().unwrap().text.ends_with("тонн."));
    }

    #[test]
    fn test_reconstruction_property() {
        // Concatenating each passage minus its leading overlap reproduces
        // the input exactly — no characters dropped or duplicated.
        let cases = [
            ("abcdefghijklmnopqrstuvwxyz", 7, 3),
            ("Максимальная нагрузка на ось — 25 тонн", 5, 2),
            ("short", 10, 4),
            ("0123456789", 5, 0),
        ];
        for (text, chunk_size, overlap) in cases {
            let passages = split(text, chunk_size, overlap).unwrap();
            let mut rebuilt = String::new();
            let mut covered = 0usize;
            for p in &passages {
                let skip = covered - p.source_offset;
                rebuilt.extend(p.text.chars().skip(skip));
                covered = p.source_offset + p.text.chars().count();
            }
            assert_eq!(rebuilt, text, "case ({text:?}, {chunk_size}, {overlap})");
        }
    }

    #[test]
    fn test_chunk_length_bounded() {
        let passages = split(&"x".repeat(1234), 100, 20).unwrap();
        for p in &passages {
            assert!(p.text.chars().count() <= 100);
        }
    }
}
