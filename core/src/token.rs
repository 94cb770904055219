//! Word location and eligibility filtering.
//!
//! Finds the word directly before the cursor in an input line and
//! decides whether it is worth sending to a spelling backend. Paths,
//! URLs, addresses and number-ish tokens are skipped entirely, and
//! surrounding punctuation is split off so callers can glue it back
//! around replacement text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Byte range of a located word inside the input line.
///
/// Offsets are byte offsets and always fall on char boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSpan {
    /// Byte offset of the first char of the word.
    pub start: usize,
    /// Length of the word in bytes.
    pub len: usize,
}

impl WordSpan {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Byte offset one past the last char of the word.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// A checkable word located next to the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// The word with affix punctuation stripped.
    pub word: String,
    /// Where `word` sits in the original line.
    pub span: WordSpan,
    /// Non-word chars stripped from the front of the token.
    pub prefix: String,
    /// Non-word chars stripped from the back, sentence-final mark last.
    pub suffix: String,
}

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+$").unwrap());
static SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+://").unwrap());
static ADDRESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@]+@[^@]+$").unwrap());
static LEADING_NONWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\W+").unwrap());
static TRAILING_NONWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+$").unwrap());
static NUMBERISH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\W]+$").unwrap());

/// Locate the checkable word at or before `cursor`.
///
/// The candidate token is the last run of non-whitespace before the
/// cursor; whitespace between it and the cursor is skipped, so a word
/// just finished with a separator still gets checked. A single
/// sentence-final `.`, `?` or `!` is peeled off before the filters
/// run:
///
/// - shorter than two chars
/// - starts with `/` (command or path)
/// - `scheme://` URLs and `user@host` addresses
/// - nothing but digits and punctuation once affixes are stripped
///
/// A cursor past the end of the line or inside a multi-byte char is
/// pulled back to the nearest boundary.
pub fn locate(text: &str, cursor: usize) -> Option<Located> {
    let cursor = clamp_cursor(text, cursor);
    // trim_end drops bytes only from the back, so match offsets stay
    // valid for `text`
    let m = TOKEN.find(text[..cursor].trim_end())?;
    let mut start = m.start();
    let mut token = m.as_str();

    let mut tail = "";
    if let Some(rest) = token.strip_suffix(['.', '?', '!']) {
        tail = &token[rest.len()..];
        token = rest;
    }

    if token.chars().count() < 2 {
        return None;
    }
    if token.starts_with('/') {
        return None;
    }
    if SCHEME.is_match(token) || ADDRESS.is_match(token) {
        return None;
    }

    let mut prefix = "";
    if let Some(m) = LEADING_NONWORD.find(token) {
        prefix = m.as_str();
        start += m.end();
        token = &token[m.end()..];
    }
    let mut word = token;
    let mut suffix = String::new();
    if let Some(m) = TRAILING_NONWORD.find(word) {
        suffix.push_str(m.as_str());
        word = &word[..m.start()];
    }
    suffix.push_str(tail);

    if word.chars().count() < 2 {
        return None;
    }
    if NUMBERISH.is_match(word) {
        return None;
    }

    Some(Located {
        word: word.to_string(),
        span: WordSpan::new(start, word.len()),
        prefix: prefix.to_string(),
        suffix,
    })
}

/// Pull a cursor back to the nearest char boundary at or before it.
pub fn clamp_cursor(text: &str, cursor: usize) -> usize {
    let mut c = cursor.min(text.len());
    while c > 0 && !text.is_char_boundary(c) {
        c -= 1;
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_at_end(text: &str) -> Option<Located> {
        locate(text, text.len())
    }

    #[test]
    fn test_locates_last_word() {
        let loc = word_at_end("this is wrogn").unwrap();
        assert_eq!(loc.word, "wrogn");
        assert_eq!(loc.span, WordSpan::new(8, 5));
        assert_eq!(loc.prefix, "");
        assert_eq!(loc.suffix, "");
    }

    #[test]
    fn test_word_before_trailing_whitespace_is_found() {
        // a word just closed with a separator is still the word to check
        let loc = word_at_end("helo ").unwrap();
        assert_eq!(loc.word, "helo");
        assert_eq!(loc.span, WordSpan::new(0, 4));

        let loc = locate("helo world", 5).unwrap();
        assert_eq!(loc.word, "helo");
        assert!(word_at_end("   ").is_none());
    }

    #[test]
    fn test_cursor_mid_line() {
        let loc = locate("helo world", 4).unwrap();
        assert_eq!(loc.word, "helo");
        assert_eq!(loc.span, WordSpan::new(0, 4));
    }

    #[test]
    fn test_single_sentence_mark_stripped() {
        let loc = word_at_end("see you tomorow.").unwrap();
        assert_eq!(loc.word, "tomorow");
        assert_eq!(loc.span, WordSpan::new(8, 7));
        assert_eq!(loc.suffix, ".");
    }

    #[test]
    fn test_trailing_punctuation_run() {
        let loc = word_at_end("wat?!").unwrap();
        assert_eq!(loc.word, "wat");
        // run first, peeled sentence mark last
        assert_eq!(loc.suffix, "?!");
    }

    #[test]
    fn test_wrapping_punctuation_becomes_affixes() {
        let loc = word_at_end("(qoute)").unwrap();
        assert_eq!(loc.word, "qoute");
        assert_eq!(loc.span, WordSpan::new(1, 5));
        assert_eq!(loc.prefix, "(");
        assert_eq!(loc.suffix, ")");
    }

    #[test]
    fn test_too_short() {
        assert!(word_at_end("a").is_none());
        assert!(word_at_end("ok x").is_none());
        // shrinks below two chars after affix stripping
        assert!(word_at_end("(a)").is_none());
    }

    #[test]
    fn test_commands_and_paths_skipped() {
        assert!(word_at_end("/join").is_none());
        assert!(word_at_end("/usr/bin/env").is_none());
    }

    #[test]
    fn test_urls_and_addresses_skipped() {
        assert!(word_at_end("https://example.com/x").is_none());
        assert!(word_at_end("ftp://host").is_none());
        assert!(word_at_end("someone@example.com").is_none());
    }

    #[test]
    fn test_numbers_skipped() {
        assert!(word_at_end("1234").is_none());
        assert!(word_at_end("3.14").is_none());
        assert!(word_at_end("12:30").is_none());
    }

    #[test]
    fn test_apostrophe_stays_inside_word() {
        let loc = word_at_end("dont't").unwrap();
        assert_eq!(loc.word, "dont't");
    }

    #[test]
    fn test_multibyte_offsets() {
        let text = "no tak zażółc";
        let loc = word_at_end(text).unwrap();
        assert_eq!(loc.word, "zażółc");
        assert_eq!(loc.span.start, 7);
        assert_eq!(loc.span.len, "zażółc".len());
        assert_eq!(&text[loc.span.start..loc.span.end()], "zażółc");
    }

    #[test]
    fn test_cursor_clamped_to_boundary() {
        let text = "ż";
        // inside the two-byte char, pulled back to 0
        assert!(locate(text, 1).is_none());
        assert_eq!(clamp_cursor(text, 99), text.len());
    }

    #[test]
    fn test_sentence_mark_then_length_check() {
        // "ok." is two chars once the mark is gone
        let loc = word_at_end("well ok.").unwrap();
        assert_eq!(loc.word, "ok");
        assert!(word_at_end("x.").is_none());
    }
}
