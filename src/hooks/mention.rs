// SPDX-License-Identifier: MPL-2.0

//! Caret-anchored `@mention` tokens and the edits built on them.
//!
//! Everything here is pure text processing over an [`InputState`] snapshot.
//! Offsets are counted in characters (Unicode scalar values), matching how
//! text controls report caret positions; word characters are ASCII
//! `[A-Za-z0-9_]`.

use regex::Regex;
use std::sync::LazyLock;

// Compile regexes once. Both are anchored at the end of the text before the caret.
static LOOKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_]{2,})$").unwrap());

static PARTIAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@[A-Za-z0-9_]*$").unwrap());

/// Buffer and caret of a text control, read at the start of a handler and
/// written back at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    pub buffer: String,
    /// Character offset, always within `0..=char_len(buffer)`
    pub caret: usize,
}

impl InputState {
    /// Out-of-range carets are clamped to the end of the buffer.
    pub fn new(buffer: impl Into<String>, caret: usize) -> Self {
        let buffer = buffer.into();
        let caret = caret.min(buffer.chars().count());
        Self { buffer, caret }
    }

    /// Snapshot with the caret at end-of-buffer, used when the control
    /// reports no caret.
    pub fn at_end(buffer: impl Into<String>) -> Self {
        let buffer = buffer.into();
        let caret = buffer.chars().count();
        Self { buffer, caret }
    }

    pub fn head(&self) -> &str {
        &self.buffer[..byte_offset(&self.buffer, self.caret)]
    }

    pub fn tail(&self) -> &str {
        &self.buffer[byte_offset(&self.buffer, self.caret)..]
    }

    /// Insert a literal `@` at the caret and leave the caret just after it.
    pub fn with_marker(&self) -> InputState {
        let buffer = format!("{}@{}", self.head(), self.tail());
        InputState {
            buffer,
            caret: self.caret + 1,
        }
    }

    /// Replace the partial mention ending at the caret with `@label `.
    ///
    /// Without a partial mention the replacement is inserted at the caret.
    /// The caret ends up right after the trailing space.
    pub fn with_pinned(&self, label: &str) -> InputState {
        let head = self.head();
        let token_start = trailing_mention(&self.buffer, self.caret)
            .map(|token| byte_offset(head, token.start))
            .unwrap_or(head.len());

        let new_head = format!("{}@{} ", &head[..token_start], label);
        let caret = new_head.chars().count();
        InputState {
            buffer: new_head + self.tail(),
            caret,
        }
    }
}

/// A partial mention that ends at the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MentionToken<'a> {
    /// Character offset of the `@`
    pub start: usize,
    /// Character offset just past the token (the caret)
    pub end: usize,
    /// Word characters after the `@`, possibly empty
    pub query: &'a str,
}

/// Byte index of the `char_idx`-th character, or `text.len()` past the end.
fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

fn head_of(buffer: &str, caret: usize) -> &str {
    &buffer[..byte_offset(buffer, caret)]
}

/// The query to look up for the text before the caret: `@` followed by at
/// least two word characters, ending exactly at the caret.
pub fn mention_query(buffer: &str, caret: usize) -> Option<&str> {
    LOOKUP_RE
        .captures(head_of(buffer, caret))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// The `@` token (zero or more word characters) ending at the caret.
pub fn trailing_mention(buffer: &str, caret: usize) -> Option<MentionToken<'_>> {
    let head = head_of(buffer, caret);
    let m = PARTIAL_RE.find(head)?;
    let start = head[..m.start()].chars().count();
    Some(MentionToken {
        start,
        end: start + m.as_str().chars().count(),
        query: &m.as_str()[1..],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_query_needs_two_word_chars() {
        assert_eq!(mention_query("hi @j", 5), None);
        assert_eq!(mention_query("hi @jo", 6), Some("jo"));
        assert_eq!(mention_query("hi @john_99", 11), Some("john_99"));
    }

    #[test]
    fn test_query_anchored_at_caret() {
        // Caret inside the token: only the part before the caret counts
        assert_eq!(mention_query("hi @john", 6), Some("jo"));
        assert_eq!(mention_query("hi @john", 5), None);
        // Caret past a space after the token
        assert_eq!(mention_query("@john rest", 10), None);
        // Text after the caret is irrelevant
        assert_eq!(mention_query("@jo and more", 3), Some("jo"));
    }

    #[test]
    fn test_query_ignores_non_word_chars() {
        assert_eq!(mention_query("@jo-", 4), None);
        assert_eq!(mention_query("@", 1), None);
        assert_eq!(mention_query("plain text", 10), None);
        assert_eq!(mention_query("mail me@host", 12), Some("host"));
    }

    #[test]
    fn test_query_word_chars_are_ascii() {
        assert_eq!(mention_query("@jé", 3), None);
        assert_eq!(mention_query("@ab\u{e9}", 4), None);
    }

    #[test]
    fn test_query_with_multibyte_prefix() {
        let text = "\u{1F600} @amy";
        assert_eq!(mention_query(text, 6), Some("amy"));
    }

    #[test]
    fn test_trailing_mention_accepts_bare_at() {
        let token = trailing_mention("hi @", 4).unwrap();
        assert_eq!(token, MentionToken {
            start: 3,
            end: 4,
            query: ""
        });
    }

    #[test]
    fn test_trailing_mention_absent() {
        assert_eq!(trailing_mention("hi ", 3), None);
        assert_eq!(trailing_mention("@jo ", 4), None);
    }

    #[test]
    fn test_trailing_mention_picks_last_at() {
        let token = trailing_mention("a@@bc", 5).unwrap();
        assert_eq!(token.start, 2);
        assert_eq!(token.query, "bc");
    }

    #[test]
    fn test_pin_replaces_partial_token() {
        let state = InputState::new("hi @jo", 6).with_pinned("John");
        assert_eq!(state.buffer, "hi @John ");
        assert_eq!(state.caret, 9);
    }

    #[test]
    fn test_pin_without_token_inserts_at_caret() {
        let state = InputState::new("hi ", 3).with_pinned("Amy");
        assert_eq!(state.buffer, "hi @Amy ");
        assert_eq!(state.caret, 8);
    }

    #[test]
    fn test_pin_keeps_tail() {
        let state = InputState::new("ask @jo about it", 7).with_pinned("Joanna");
        assert_eq!(state.buffer, "ask @Joanna  about it");
        assert_eq!(state.caret, 12);
    }

    #[test]
    fn test_pin_with_caret_mid_token_keeps_rest() {
        let state = InputState::new("@john", 3).with_pinned("Jo");
        assert_eq!(state.buffer, "@Jo hn");
        assert_eq!(state.caret, 4);
    }

    #[test]
    fn test_pin_counts_chars_not_bytes() {
        let state = InputState::new("caf\u{e9} @am", 8).with_pinned("Amy");
        assert_eq!(state.buffer, "caf\u{e9} @Amy ");
        assert_eq!(state.caret, 10);
    }

    #[test]
    fn test_marker_splits_at_caret() {
        let state = InputState::new("ab", 1).with_marker();
        assert_eq!(state, InputState::new("a@b", 2));
    }

    #[test]
    fn test_marker_at_end_and_start() {
        assert_eq!(
            InputState::at_end("ab").with_marker(),
            InputState::new("ab@", 3)
        );
        assert_eq!(
            InputState::new("ab", 0).with_marker(),
            InputState::new("@ab", 1)
        );
    }

    #[test]
    fn test_new_clamps_caret() {
        let state = InputState::new("abc", 99);
        assert_eq!(state.caret, 3);
        assert_eq!(state.head(), "abc");
        assert_eq!(state.tail(), "");
    }
}
