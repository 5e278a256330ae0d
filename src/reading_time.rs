//! Reading-time estimates for Markdown bodies. The Markdown is reduced to its
//! plain text with [`pulldown_cmark`], then words are counted and divided by a
//! reading speed.

use pulldown_cmark::{Event, Parser, Tag};
use std::fmt;

/// The reading speed used when none is configured.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// The estimate for one body of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReadingTime {
    /// The number of words counted.
    pub words: usize,

    /// The unrounded reading time.
    pub minutes: f64,
}

impl ReadingTime {
    /// The rounded-up number of minutes shown to readers. The raw value is
    /// rounded to two decimals first so float noise like `1.0000001` doesn't
    /// tip an even minute over to the next one.
    pub fn displayed_minutes(&self) -> u64 {
        ((self.minutes * 100.0).round() / 100.0).ceil() as u64
    }
}

impl fmt::Display for ReadingTime {
    /// Formats the estimate as `"<n> min read"`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} min read", self.displayed_minutes())
    }
}

/// Estimates how long `markdown` takes to read at `words_per_minute`. A speed
/// of zero is treated as [`DEFAULT_WORDS_PER_MINUTE`].
pub fn estimate(markdown: &str, words_per_minute: u32) -> ReadingTime {
    let words_per_minute = match words_per_minute {
        0 => DEFAULT_WORDS_PER_MINUTE,
        wpm => wpm,
    };
    let words = count_words(&plain_text(markdown));
    ReadingTime {
        words,
        minutes: words as f64 / f64::from(words_per_minute),
    }
}

/// Strips Markdown syntax, keeping text and inline code. Block boundaries and
/// line breaks become spaces so adjacent blocks don't run together.
pub fn plain_text(markdown: &str) -> String {
    let mut text = String::with_capacity(markdown.len());
    for event in Parser::new(markdown) {
        match event {
            Event::Text(s) | Event::Code(s) => text.push_str(&s),
            // inline spans end mid-word, e.g. `**bold**ness`
            Event::End(Tag::Emphasis)
            | Event::End(Tag::Strong)
            | Event::End(Tag::Strikethrough)
            | Event::End(Tag::Link(..)) => {}
            Event::SoftBreak | Event::HardBreak | Event::End(_) => text.push(' '),
            _ => {}
        }
    }
    text
}

/// Counts whitespace-separated tokens that contain at least one alphanumeric
/// character. CJK characters are written without spaces, so each of them
/// counts as a word of its own.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace()
        .map(|token| {
            let cjk = token.chars().filter(|c| is_cjk(*c)).count();
            let rest = token.chars().any(|c| c.is_alphanumeric() && !is_cjk(c));
            cjk + rest as usize
        })
        .sum()
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30ff}'     // hiragana, katakana
        | '\u{3400}'..='\u{4dbf}'   // CJK extension A
        | '\u{4e00}'..='\u{9fff}'   // CJK unified ideographs
        | '\u{ac00}'..='\u{d7af}'   // hangul syllables
        | '\u{f900}'..='\u{faff}'   // CJK compatibility ideographs
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_plain_text_strips_markup() {
        let text = plain_text("# Title\n\nSome *emphasis* and `code`.\n\n- one\n- two");
        assert_eq!(
            vec!["Title", "Some", "emphasis", "and", "code.", "one", "two"],
            text.split_whitespace().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_count_words_ignores_punctuation_tokens() {
        assert_eq!(3, count_words("one — two ... three"));
    }

    #[test]
    fn test_count_words_cjk() {
        assert_eq!(4, count_words("日本語 hello"));
    }

    #[test]
    fn test_estimate_rounds_up() {
        let body = "word ".repeat(250);
        let estimate = estimate(&body, 200);
        assert_eq!(250, estimate.words);
        assert_eq!(2, estimate.displayed_minutes());
        assert_eq!("2 min read", estimate.to_string());
    }

    #[test]
    fn test_estimate_exact_minute() {
        let body = "word ".repeat(400);
        assert_eq!("2 min read", estimate(&body, 200).to_string());
    }

    #[test]
    fn test_estimate_tiny_fraction_is_rounded_away() {
        // 1.001 minutes rounds to 1.00 before the ceiling is taken.
        let time = ReadingTime {
            words: 1001,
            minutes: 1.001,
        };
        assert_eq!(1, time.displayed_minutes());
    }

    #[test]
    fn test_estimate_empty() {
        assert_eq!("0 min read", estimate("", 200).to_string());
    }

    #[test]
    fn test_estimate_zero_speed_falls_back() {
        let body = "word ".repeat(300);
        assert_eq!(estimate(&body, DEFAULT_WORDS_PER_MINUTE), estimate(&body, 0));
    }
}
