//! Sliding-window chunking over character offsets.
//!
//! Documents are split into fixed-size overlapping windows: window `[i, i + size)`,
//! advancing `i` by `size - overlap` each step. Window ends prefer the last whitespace
//! boundary that still lies past the next window's start, so words are not cut and the
//! emitted spans can never leave a gap between neighbors. All lengths are measured in
//! characters, not bytes, so multi-byte text chunks the same as ASCII.

/// Chunking parameters; all lengths are character counts.
#[derive(Debug, Clone, Copy)]
pub struct ChunkPolicy {
    /// Target window length.
    pub size: usize,
    /// Overlap carried between adjacent windows.
    pub overlap: usize,
    /// Minimum emitted chunk length; a shorter trailing chunk is discarded.
    pub min_length: usize,
}

impl ChunkPolicy {
    fn stride(&self) -> usize {
        // Config validation guarantees overlap < size.
        self.size - self.overlap
    }
}

/// Split `text` into overlapping chunks according to `policy`.
///
/// Chunk indices are implicitly the vector positions: contiguous from 0 in emission
/// order. Text shorter than `policy.min_length` produces no chunks at all.
pub fn chunk_text(text: &str, policy: ChunkPolicy) -> Vec<String> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    chunk_spans(&chars, policy)
        .map(|(start, end)| {
            let byte_start = chars[start].0;
            let byte_end = chars.get(end).map_or(text.len(), |(offset, _)| *offset);
            text[byte_start..byte_end].to_string()
        })
        .collect()
}

/// Lazy sequence of `(start, end)` character spans for the chunks of `chars`.
///
/// Exposed separately from [`chunk_text`] so coverage properties can be checked on
/// offsets without re-deriving them from chunk strings.
pub(crate) fn chunk_spans(
    chars: &[(usize, char)],
    policy: ChunkPolicy,
) -> impl Iterator<Item = (usize, usize)> + '_ {
    let total = chars.len();
    let stride = policy.stride();
    let mut pos = 0usize;
    let mut done = total == 0;

    std::iter::from_fn(move || {
        if done {
            return None;
        }

        let end_limit = (pos + policy.size).min(total);
        if end_limit == total {
            done = true;
            if total - pos < policy.min_length {
                return None;
            }
            return Some((pos, total));
        }

        // The next window starts at pos + stride; breaking at or before that point
        // would leave characters no window covers, so only whitespace past it counts.
        let floor = pos + stride;
        let break_at = (floor + 1..end_limit)
            .rev()
            .find(|&candidate| chars[candidate].1.is_whitespace())
            .unwrap_or(end_limit);

        let span = (pos, break_at);
        pos += stride;
        Some(span)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(size: usize, overlap: usize, min_length: usize) -> ChunkPolicy {
        ChunkPolicy {
            size,
            overlap,
            min_length,
        }
    }

    fn spans_of(text: &str, policy: ChunkPolicy) -> Vec<(usize, usize)> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        chunk_spans(&chars, policy).collect()
    }

    #[test]
    fn unbroken_text_follows_the_window_formula() {
        let text = "A".repeat(1000);
        let spans = spans_of(&text, policy(500, 50, 50));
        assert_eq!(spans, vec![(0, 500), (450, 950), (900, 1000)]);
    }

    #[test]
    fn text_of_two_windows_minus_overlap_yields_two_chunks() {
        let text = "B".repeat(950);
        let chunks = chunk_text(&text, policy(500, 50, 50));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 500);
        assert_eq!(chunks[1].chars().count(), 500);
    }

    #[test]
    fn text_shorter_than_minimum_yields_no_chunks() {
        let chunks = chunk_text("tiny", policy(500, 50, 50));
        assert!(chunks.is_empty());
    }

    #[test]
    fn final_window_absorbs_a_short_tail() {
        // 920 chars: the second window reaches the end, so no third window forms.
        let text = "C".repeat(920);
        let spans = spans_of(&text, policy(500, 50, 50));
        assert_eq!(spans, vec![(0, 500), (450, 920)]);
    }

    #[test]
    fn trailing_window_below_minimum_is_dropped() {
        // stride 90: windows [0,100), [90,190), then a 15-char tail at 180 which
        // falls under the 50-char minimum and is discarded.
        let text = "D".repeat(195);
        let spans = spans_of(&text, policy(100, 10, 50));
        assert_eq!(spans, vec![(0, 100), (90, 190)]);
    }

    #[test]
    fn chunking_is_deterministic() {
        let text = "lorem ipsum dolor sit amet ".repeat(40);
        let first = chunk_text(&text, policy(200, 20, 30));
        let second = chunk_text(&text, policy(200, 20, 30));
        assert_eq!(first, second);
    }

    #[test]
    fn windows_break_at_whitespace_not_mid_word() {
        let text = "word ".repeat(300);
        let chunks = chunk_text(&text, policy(500, 50, 50));
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(
                chunk.trim_end().ends_with("word"),
                "chunk ends mid-word: {:?}",
                &chunk[chunk.len().saturating_sub(12)..]
            );
        }
    }

    #[test]
    fn spans_cover_the_text_without_gaps() {
        let text = "the quick brown fox jumps over the lazy dog ".repeat(30);
        let spans = spans_of(&text, policy(120, 20, 10));
        assert!(!spans.is_empty());
        assert_eq!(spans[0].0, 0);
        for window in spans.windows(2) {
            let (_, prev_end) = window[0];
            let (next_start, _) = window[1];
            assert!(next_start <= prev_end, "gap between adjacent spans");
        }
    }

    #[test]
    fn chunk_lengths_are_measured_in_characters() {
        // Multi-byte characters count once each.
        let text = "é".repeat(600);
        let chunks = chunk_text(&text, policy(500, 50, 50));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 500);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", policy(500, 50, 50)).is_empty());
    }
}
