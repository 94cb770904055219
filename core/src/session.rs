//! Per-conversation suggestion cycling state.

use crate::token::WordSpan;

/// Cycling state for one flagged word.
///
/// A freshly flagged word has no selection yet; the first advance
/// starts cycling at the head of the list. `span` tracks whatever
/// currently occupies the word's place in the input line, so its
/// length changes as replacements are spliced in, while `original`
/// keeps the word the user actually typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionState {
    span: WordSpan,
    original: String,
    suggestions: Vec<String>,
    selected: Option<usize>,
}

impl SuggestionState {
    /// State for a freshly flagged word.
    ///
    /// `suggestions` must not be empty; words without suggestions are
    /// never flagged in the first place.
    pub fn flagged(span: WordSpan, original: &str, suggestions: Vec<String>) -> Self {
        debug_assert!(!suggestions.is_empty());
        Self {
            span,
            original: original.to_string(),
            suggestions,
            selected: None,
        }
    }

    /// Span currently occupied by the word or its replacement.
    pub fn span(&self) -> WordSpan {
        self.span
    }

    /// The misspelled word as typed.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Index of the current selection, `None` until cycling starts.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Whether a replacement has been spliced into the line.
    pub fn is_cycling(&self) -> bool {
        self.selected.is_some()
    }

    /// Step to the next suggestion, wrapping past the end, and return
    /// the new selection.
    pub fn advance(&mut self) -> &str {
        let next = match self.selected {
            None => 0,
            Some(i) => (i + 1) % self.suggestions.len(),
        };
        self.selected = Some(next);
        &self.suggestions[next]
    }

    /// Record that `len` bytes now occupy the word's place.
    pub fn set_occupied_len(&mut self, len: usize) {
        self.span = WordSpan::new(self.span.start, len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> SuggestionState {
        SuggestionState::flagged(
            WordSpan::new(0, 4),
            "helo",
            vec!["Hello".to_string(), "Help".to_string(), "Held".to_string()],
        )
    }

    #[test]
    fn test_flagged_has_no_selection() {
        let s = state();
        assert!(!s.is_cycling());
        assert_eq!(s.selected(), None);
        assert_eq!(s.original(), "helo");
    }

    #[test]
    fn test_advance_walks_and_wraps() {
        let mut s = state();
        assert_eq!(s.advance(), "Hello");
        assert_eq!(s.advance(), "Help");
        assert_eq!(s.advance(), "Held");
        // back to the head
        assert_eq!(s.advance(), "Hello");
        assert_eq!(s.selected(), Some(0));
        assert!(s.is_cycling());
    }

    #[test]
    fn test_single_suggestion_wraps_onto_itself() {
        let mut s = SuggestionState::flagged(
            WordSpan::new(3, 3),
            "wat",
            vec!["what".to_string()],
        );
        assert_eq!(s.advance(), "what");
        assert_eq!(s.advance(), "what");
        assert_eq!(s.selected(), Some(0));
    }

    #[test]
    fn test_span_tracks_replacement_length() {
        let mut s = state();
        s.advance();
        s.set_occupied_len("Hello".len());
        assert_eq!(s.span(), WordSpan::new(0, 5));
        assert_eq!(s.original(), "helo");
    }
}
