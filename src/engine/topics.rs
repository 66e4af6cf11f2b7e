//! Heading-shaped topic extraction from stored chunks.
//!
//! QA-format documents phrase their sections as questions ("Can I sleep in my
//! lenses?") or ALL-CAPS titles. Scanning chunk lines for those two shapes yields a
//! short list of navigation topics without any model involvement. Chunks overlap, so
//! results are deduplicated case-insensitively before capping.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Maximum number of topics reported per document.
pub const MAX_TOPICS: usize = 12;

const MIN_LINE_CHARS: usize = 10;
const MAX_QUESTION_CHARS: usize = 80;

fn question_start() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(what|how|can|should|why|is|do|are|when|where|which|who)\s")
            .expect("static regex compiles")
    })
}

/// Derive up to [`MAX_TOPICS`] topic phrases from a document's chunk texts.
///
/// Two line shapes qualify:
/// 1. Short interrogatives — an interrogative opener, ending in `?`, under 80 chars.
/// 2. ALL-CAPS section titles of 3 to 6 words.
pub fn extract_topics<'a, I>(chunks: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut topics: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    'chunks: for chunk in chunks {
        for raw_line in chunk.lines() {
            let line = raw_line.trim();
            if line.chars().count() < MIN_LINE_CHARS {
                continue;
            }

            if !is_question_heading(line) && !is_caps_heading(line) {
                continue;
            }

            let cleaned = line.split_whitespace().collect::<Vec<_>>().join(" ");
            let key = cleaned.to_lowercase();
            if seen.insert(key) {
                topics.push(cleaned);
            }
            if topics.len() >= MAX_TOPICS {
                break 'chunks;
            }
        }
    }

    topics
}

fn is_question_heading(line: &str) -> bool {
    question_start().is_match(line)
        && line.ends_with('?')
        && line.chars().count() < MAX_QUESTION_CHARS
}

fn is_caps_heading(line: &str) -> bool {
    let words = line.split_whitespace().count();
    line.chars().any(|c| c.is_alphabetic())
        && line == line.to_uppercase()
        && (3..=6).contains(&words)
        && line.chars().count() < 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_lines_become_topics() {
        let chunk = "Some intro text here.\nCan I wear lenses while swimming?\nMore body text.";
        let topics = extract_topics([chunk]);
        assert_eq!(topics, vec!["Can I wear lenses while swimming?"]);
    }

    #[test]
    fn caps_titles_become_topics() {
        let chunk = "CARE AND CLEANING GUIDE\nRinse the lens with solution every night.";
        let topics = extract_topics([chunk]);
        assert_eq!(topics, vec!["CARE AND CLEANING GUIDE"]);
    }

    #[test]
    fn long_questions_are_not_headings() {
        let long = format!("What {}?", "very ".repeat(20));
        let topics = extract_topics([long.as_str()]);
        assert!(topics.is_empty());
    }

    #[test]
    fn overlapping_chunks_deduplicate_case_insensitively() {
        let a = "How do I store my lenses?\nbody";
        let b = "how do i store my lenses?\nmore body";
        let topics = extract_topics([a, b]);
        assert_eq!(topics.len(), 1);
    }

    #[test]
    fn plain_prose_yields_nothing() {
        let chunk = "the lens sits on the tear film and moves slightly with each blink.";
        assert!(extract_topics([chunk]).is_empty());
    }

    #[test]
    fn topic_count_is_capped() {
        let lines: Vec<String> = (0..30)
            .map(|i| format!("What about topic number {i}?"))
            .collect();
        let chunk = lines.join("\n");
        let topics = extract_topics([chunk.as_str()]);
        assert_eq!(topics.len(), MAX_TOPICS);
    }

    #[test]
    fn short_and_two_word_caps_lines_are_skipped() {
        let chunk = "THE END\nA B C D E F G H\nWARNINGS AND PRECAUTIONS SECTION";
        let topics = extract_topics([chunk]);
        assert_eq!(topics, vec!["WARNINGS AND PRECAUTIONS SECTION"]);
    }
}
