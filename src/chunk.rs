//! Overlapping text chunker.
//!
//! Splits extracted document text into [`Chunk`]s of at most `chunk_chars`
//! characters, each overlapping its predecessor by `overlap_chars`
//! characters. Break points prefer paragraph boundaries (`\n\n`), then line
//! breaks, sentence ends and word boundaries, before falling back to a raw
//! character cut. A preferred break is only taken in the latter half of the
//! window so chunks do not degenerate.
//!
//! Every chunk records its byte offset into the source text; offsets plus
//! the overlap make the original text reconstructible from the chunks.

use crate::models::Chunk;

/// Break preference order. Each separator stays attached to the chunk it
/// terminates.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

/// Split text into overlapping chunks. Whitespace-only input yields no
/// chunks. All cuts land on UTF-8 character boundaries.
pub fn split_text(text: &str, chunk_chars: usize, overlap_chars: usize) -> Vec<Chunk> {
    debug_assert!(overlap_chars < chunk_chars);

    if text.trim().is_empty() {
        return Vec::new();
    }

    // Byte offset of every char start, plus one-past-end.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = bounds.len() - 1;

    if char_count <= chunk_chars {
        return vec![Chunk {
            index: 0,
            start: 0,
            text: text.to_string(),
        }];
    }

    let mut chunks = Vec::new();
    let mut start_ci = 0usize;

    loop {
        let end_ci = (start_ci + chunk_chars).min(char_count);
        let window_start = bounds[start_ci];

        if end_ci == char_count {
            chunks.push(Chunk {
                index: chunks.len(),
                start: window_start,
                text: text[window_start..].to_string(),
            });
            break;
        }

        let window = &text[window_start..bounds[end_ci]];
        let break_rel = find_break(window);
        let break_abs = window_start + break_rel;

        chunks.push(Chunk {
            index: chunks.len(),
            start: window_start,
            text: text[window_start..break_abs].to_string(),
        });

        // Next chunk starts `overlap_chars` characters before the break,
        // but always makes progress past the current start.
        let break_ci = bounds.partition_point(|&b| b < break_abs);
        start_ci = break_ci.saturating_sub(overlap_chars).max(start_ci + 1);
    }

    chunks
}

/// Byte offset into `window` where the chunk should end. Prefers the latest
/// separator occurrence in the latter half of the window; falls back to the
/// full window (raw cut at the character limit).
fn find_break(window: &str) -> usize {
    let min = window.len() / 2;

    for sep in SEPARATORS {
        if let Some(pos) = window.rfind(sep) {
            let end = pos + sep.len();
            if end > min && end < window.len() {
                return end;
            }
        }
    }

    window.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct(chunks: &[Chunk]) -> String {
        let mut rebuilt = String::new();
        for chunk in chunks {
            let skip = rebuilt.len() - chunk.start;
            rebuilt.push_str(&chunk.text[skip..]);
        }
        rebuilt
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = split_text("Hello, world!", 300, 40);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].start, 0);
        assert_eq!(chunks[0].text, "Hello, world!");
    }

    #[test]
    fn empty_and_whitespace_text_yield_no_chunks() {
        assert!(split_text("", 300, 40).is_empty());
        assert!(split_text("   \n\n\t  ", 300, 40).is_empty());
    }

    #[test]
    fn chunks_respect_max_size() {
        let text = "word ".repeat(500);
        let chunks = split_text(&text, 300, 40);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(
                chunk.text.chars().count() <= 300,
                "chunk {} has {} chars",
                chunk.index,
                chunk.text.chars().count()
            );
        }
    }

    #[test]
    fn offsets_reconstruct_the_source_text() {
        let text = (0..60)
            .map(|i| format!("Sentence number {} has a handful of words in it.", i))
            .collect::<Vec<_>>()
            .join(" ");
        let chunks = split_text(&text, 300, 40);
        assert!(chunks.len() > 1);
        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn ascii_neighbors_overlap_by_exactly_overlap_chars() {
        let text = "alpha beta gamma delta ".repeat(100);
        let chunks = split_text(&text, 300, 40);
        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let prev_end = pair[0].start + pair[0].text.len();
            assert_eq!(prev_end - pair[1].start, 40);
        }
    }

    #[test]
    fn prefers_paragraph_boundary() {
        let text = format!("{}\n\n{}", "a".repeat(200), "b".repeat(200));
        let chunks = split_text(&text, 300, 40);
        assert!(chunks[0].text.ends_with("\n\n"));
        assert_eq!(chunks[0].text.len(), 202);
    }

    #[test]
    fn prefers_sentence_boundary_over_raw_cut() {
        let text = format!("{}. {}", "a".repeat(200), "b".repeat(200));
        let chunks = split_text(&text, 300, 40);
        assert!(chunks[0].text.ends_with(". "));
    }

    #[test]
    fn makes_progress_without_any_separator() {
        let text = "x".repeat(1000);
        let chunks = split_text(&text, 300, 40);
        assert_eq!(reconstruct(&chunks), text);
        for chunk in &chunks {
            assert!(chunk.text.len() <= 300);
        }
        for pair in chunks.windows(2) {
            assert!(pair[1].start > pair[0].start);
        }
    }

    #[test]
    fn multibyte_text_never_splits_a_character() {
        let text = "héllo wörld grüße straße ".repeat(60);
        let chunks = split_text(&text, 300, 40);
        assert!(chunks.len() > 1);
        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn indices_are_contiguous_from_zero() {
        let text = "Paragraph one.\n\n".repeat(80);
        let chunks = split_text(&text, 300, 40);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }
}
