//! The ispell `-a` response grammar.
//!
//! After the `@`-prefixed version greeting, every checked word
//! produces one response line followed by a blank line:
//!
//! ```text
//! *                       correct
//! + root                  correct, found via affix root
//! -                       correct, compound
//! & orig n off: s1, s2    misspelled, with suggestions
//! ? orig n off: s1, s2    near-miss guesses, same shape
//! # orig off              misspelled, nothing to offer
//! ```
//!
//! Everything here is pure line parsing; no process is involved.

use chatspell_core::BackendError;

/// One word's worth of speller output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Correct,
    Misspelled(Vec<String>),
}

/// Whether `line` is the version banner a healthy speller prints
/// first.
pub fn is_greeting(line: &str) -> bool {
    line.starts_with('@')
}

/// Parse one response line.
pub fn parse_response(line: &str) -> Result<Response, BackendError> {
    match line.chars().next() {
        Some('*' | '+' | '-') => Ok(Response::Correct),
        Some('&' | '?') => Ok(Response::Misspelled(parse_suggestions(line))),
        Some('#') => Ok(Response::Misspelled(Vec::new())),
        _ => Err(BackendError::Protocol(format!(
            "unrecognized speller reply: {line:?}"
        ))),
    }
}

/// Suggestions are everything after the first colon, comma-separated.
/// Multi-word suggestions ("a lot") are kept whole.
fn parse_suggestions(line: &str) -> Vec<String> {
    match line.split_once(':') {
        Some((_, rest)) => rest
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}
