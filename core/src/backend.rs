//! Spelling backend traits.
//!
//! A `Backend` opens one `Dictionary` per language tag; the dictionary
//! answers check/suggest queries and accepts personal-word additions.
//! Everything above this seam is backend-agnostic, so a compiled
//! wordlist, a spawned `aspell -a` process or an in-memory test double
//! all plug in the same way.

use thiserror::Error;

/// Errors produced by backends and their dictionaries.
#[derive(Debug, Error)]
pub enum BackendError {
    /// No dictionary exists for the requested language tag.
    #[error("no dictionary for language `{0}`")]
    NotFound(String),
    /// An I/O failure while opening or talking to a dictionary.
    #[error("dictionary i/o: {0}")]
    Io(#[from] std::io::Error),
    /// A subprocess replied with something other than its protocol.
    #[error("backend protocol: {0}")]
    Protocol(String),
    /// Backend-specific storage failure.
    #[error("{0}")]
    Storage(String),
}

/// Factory for per-language dictionaries.
pub trait Backend {
    type Dict: Dictionary;

    /// Open the dictionary for one language tag.
    ///
    /// Failure here is a configuration problem (missing dictionary,
    /// missing binary) and callers treat it as such; transient trouble
    /// belongs to the `Dictionary` calls instead.
    fn open(&self, tag: &str) -> Result<Self::Dict, BackendError>;
}

/// One opened dictionary for one language tag.
pub trait Dictionary {
    /// Whether the backend considers `word` correctly spelled.
    fn check(&mut self, word: &str) -> Result<bool, BackendError>;

    /// Replacement candidates for a misspelled word, best first.
    ///
    /// Backends may return fewer than `limit` entries, including none.
    fn suggest(&mut self, word: &str, limit: usize) -> Result<Vec<String>, BackendError>;

    /// Add `word` to this language's personal dictionary.
    ///
    /// Adding a word that is already present is a no-op.
    fn add_word(&mut self, word: &str) -> Result<(), BackendError>;
}
