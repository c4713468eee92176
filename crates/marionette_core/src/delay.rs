//! Simulated human reading delay.

use crate::Line;
use std::time::Duration;

/// Average reading speed of an audience watching the replay.
pub const READING_WORDS_PER_MINUTE: u64 = 200;

/// Words in a text, counted by splitting on single spaces.
pub fn word_count(text: &str) -> u64 {
    text.split(' ').count() as u64
}

/// Time an audience needs to read the line's text.
///
/// Lines without text (files, or empty text) take no time.
///
/// # Examples
///
/// ```
/// use marionette_core::{LineBuilder, estimate};
/// use std::time::Duration;
///
/// let line = LineBuilder::default().text("hi").build().unwrap();
/// assert_eq!(estimate(&line), Duration::from_millis(300));
/// ```
pub fn estimate(line: &Line) -> Duration {
    match line.joined_text() {
        Some(text) => Duration::from_millis(word_count(&text) * 60_000 / READING_WORDS_PER_MINUTE),
        None => Duration::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LineBuilder, LineText};

    fn text_line(text: impl Into<LineText>) -> Line {
        LineBuilder::default().text(text).build().expect("valid line")
    }

    #[test]
    fn no_text_is_zero() {
        let line = LineBuilder::default().filename("a.png").build().expect("valid line");
        assert_eq!(estimate(&line), Duration::ZERO);
    }

    #[test]
    fn empty_text_is_zero() {
        assert_eq!(estimate(&text_line("")), Duration::ZERO);
    }

    #[test]
    fn two_hundred_words_is_a_minute() {
        let text = vec!["word"; 200].join(" ");
        assert_eq!(estimate(&text_line(text)), Duration::from_secs(60));
    }

    #[test]
    fn grows_with_word_count() {
        let mut previous = Duration::ZERO;
        for words in 1..50 {
            let delay = estimate(&text_line(vec!["w"; words].join(" ")));
            assert!(delay > previous);
            previous = delay;
        }
    }

    #[test]
    fn newlines_do_not_split_words() {
        let parts = LineText::Parts(vec!["one two".to_string(), "three".to_string()]);
        // "one two\nthree" splits on spaces into two words
        assert_eq!(estimate(&text_line(parts)), Duration::from_millis(600));
    }
}
