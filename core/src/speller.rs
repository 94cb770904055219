//! Backend adapter: verdicts for words against a language set.
//!
//! Sits between the engine and whatever `Backend` is plugged in. One
//! dictionary handle per language tag is opened lazily and reused for
//! the life of the speller; verdicts are cached in an LRU keyed by
//! language set and word, since input redisplay re-asks about the same
//! word on every keystroke.

use std::num::NonZeroUsize;

use ahash::AHashMap;
use lru::LruCache;
use thiserror::Error;

use crate::backend::{Backend, BackendError, Dictionary};
use crate::resolver::LangSet;
use crate::utils;

/// Most suggestions ever shown for one word.
pub const SUGGESTION_CAP: usize = 5;

/// Outcome of checking one word against a language set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// At least one dictionary accepts the word.
    Correct,
    /// Every dictionary rejects it; merged suggestions, best first.
    /// The list may be empty.
    Misspelled(Vec<String>),
}

#[derive(Debug, Error)]
pub enum SpellerError {
    /// A dictionary could not be opened. This is a configuration
    /// problem and the word is deliberately not checked at all.
    #[error("no dictionary for language `{tag}`: {source}")]
    NoDictionary {
        tag: String,
        source: BackendError,
    },
    /// A personal-dictionary update failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Spell checking over memoized per-language dictionary handles.
pub struct Speller<B: Backend> {
    backend: B,
    handles: AHashMap<String, B::Dict>,
    verdicts: LruCache<(String, String), Verdict>,
}

impl<B: Backend> Speller<B> {
    pub fn new(backend: B, cache_size: usize) -> Self {
        Self {
            backend,
            handles: AHashMap::new(),
            verdicts: LruCache::new(cache_capacity(cache_size)),
        }
    }

    /// Verdict for `word` against every tag of `langs`.
    ///
    /// Every dictionary of the set is opened before anything is
    /// checked, so a missing dictionary surfaces as
    /// [`SpellerError::NoDictionary`] instead of silently checking
    /// against a narrower set. A failed open is not remembered; the
    /// next call retries, so fixing the environment fixes the session.
    ///
    /// Call failures on an open dictionary go the other way: they are
    /// logged and the word passes as correct, uncached, because
    /// transient backend trouble must not flag good text.
    pub fn verdict(&mut self, word: &str, langs: &LangSet) -> Result<Verdict, SpellerError> {
        let word = utils::normalize(word);
        let key = (langs.as_str().to_string(), word.clone());
        if let Some(v) = self.verdicts.get(&key) {
            return Ok(v.clone());
        }

        for tag in langs.tags() {
            self.handle(tag)?;
        }

        match self.compute(&word, langs) {
            Some(verdict) => {
                self.verdicts.put(key, verdict.clone());
                Ok(verdict)
            }
            None => Ok(Verdict::Correct),
        }
    }

    /// Add `word` to the personal dictionary of `tag`.
    ///
    /// Cached verdicts are dropped so the addition is visible to the
    /// very next check.
    pub fn add_word(&mut self, tag: &str, word: &str) -> Result<(), SpellerError> {
        let word = utils::normalize(word);
        let dict = self.handle(tag)?;
        dict.add_word(&word)?;
        self.verdicts.clear();
        Ok(())
    }

    /// Resize the verdict cache, dropping current entries.
    pub fn set_cache_size(&mut self, cache_size: usize) {
        self.verdicts = LruCache::new(cache_capacity(cache_size));
    }

    fn handle(&mut self, tag: &str) -> Result<&mut B::Dict, SpellerError> {
        use std::collections::hash_map::Entry;

        match self.handles.entry(tag.to_string()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(v) => {
                let dict = self.backend.open(tag).map_err(|source| {
                    SpellerError::NoDictionary {
                        tag: tag.to_string(),
                        source,
                    }
                })?;
                Ok(v.insert(dict))
            }
        }
    }

    /// Check phase then suggest phase; `None` means a call failed and
    /// the word passes uncached.
    fn compute(&mut self, word: &str, langs: &LangSet) -> Option<Verdict> {
        for tag in langs.tags() {
            let Some(dict) = self.handles.get_mut(tag) else {
                continue;
            };
            match dict.check(word) {
                Ok(true) => return Some(Verdict::Correct),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!("check failed for `{word}` in `{tag}`: {e}");
                    return None;
                }
            }
        }

        let mut merged: Vec<String> = Vec::new();
        for tag in langs.tags() {
            if merged.len() >= SUGGESTION_CAP {
                break;
            }
            let Some(dict) = self.handles.get_mut(tag) else {
                continue;
            };
            match dict.suggest(word, SUGGESTION_CAP) {
                Ok(list) => {
                    for s in list {
                        if merged.len() >= SUGGESTION_CAP {
                            break;
                        }
                        if !merged.contains(&s) {
                            merged.push(s);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("suggest failed for `{word}` in `{tag}`: {e}");
                    return None;
                }
            }
        }
        Some(Verdict::Misspelled(merged))
    }
}

fn cache_capacity(cache_size: usize) -> NonZeroUsize {
    NonZeroUsize::new(cache_size).unwrap_or(NonZeroUsize::new(1024).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Dictionary;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use std::rc::Rc;

    #[derive(Default)]
    struct Calls {
        checks: usize,
        suggests: usize,
        opens: usize,
    }

    #[derive(Clone, Default)]
    struct FakeBackend {
        words: HashMap<String, HashSet<String>>,
        suggestions: HashMap<String, Vec<String>>,
        broken_tags: HashSet<String>,
        failing_checks: HashSet<String>,
        calls: Rc<RefCell<Calls>>,
    }

    impl FakeBackend {
        fn with_tag(mut self, tag: &str, words: &[&str]) -> Self {
            self.words
                .insert(tag.to_string(), words.iter().map(|w| w.to_string()).collect());
            self
        }

        fn with_suggestions(mut self, tag: &str, word: &str, suggs: &[&str]) -> Self {
            self.suggestions.insert(
                format!("{tag}:{word}"),
                suggs.iter().map(|s| s.to_string()).collect(),
            );
            self
        }

        fn with_broken_tag(mut self, tag: &str) -> Self {
            self.broken_tags.insert(tag.to_string());
            self
        }

        fn with_failing_check(mut self, tag: &str) -> Self {
            self.failing_checks.insert(tag.to_string());
            self
        }
    }

    struct FakeDict {
        tag: String,
        backend: FakeBackend,
        added: HashSet<String>,
    }

    impl Backend for FakeBackend {
        type Dict = FakeDict;

        fn open(&self, tag: &str) -> Result<FakeDict, BackendError> {
            self.calls.borrow_mut().opens += 1;
            if self.broken_tags.contains(tag) || !self.words.contains_key(tag) {
                return Err(BackendError::NotFound(tag.to_string()));
            }
            Ok(FakeDict {
                tag: tag.to_string(),
                backend: self.clone(),
                added: HashSet::new(),
            })
        }
    }

    impl Dictionary for FakeDict {
        fn check(&mut self, word: &str) -> Result<bool, BackendError> {
            self.backend.calls.borrow_mut().checks += 1;
            if self.backend.failing_checks.contains(&self.tag) {
                return Err(BackendError::Protocol("pipe closed".to_string()));
            }
            Ok(self.backend.words[&self.tag].contains(word) || self.added.contains(word))
        }

        fn suggest(&mut self, word: &str, limit: usize) -> Result<Vec<String>, BackendError> {
            self.backend.calls.borrow_mut().suggests += 1;
            let mut list = self
                .backend
                .suggestions
                .get(&format!("{}:{}", self.tag, word))
                .cloned()
                .unwrap_or_default();
            list.truncate(limit);
            Ok(list)
        }

        fn add_word(&mut self, word: &str) -> Result<(), BackendError> {
            self.added.insert(word.to_string());
            Ok(())
        }
    }

    fn langs(spec: &str) -> LangSet {
        LangSet::new(spec)
    }

    #[test]
    fn test_correct_in_any_tag_short_circuits() {
        let backend = FakeBackend::default()
            .with_tag("en", &[])
            .with_tag("pl", &["czesc"]);
        let calls = backend.calls.clone();
        let mut speller = Speller::new(backend, 16);
        let v = speller.verdict("czesc", &langs("en+pl")).unwrap();
        assert_eq!(v, Verdict::Correct);
        // both checked, no suggestion calls
        assert_eq!(calls.borrow().checks, 2);
        assert_eq!(calls.borrow().suggests, 0);
    }

    #[test]
    fn test_suggestions_merge_in_tag_order_with_dedup() {
        let backend = FakeBackend::default()
            .with_tag("en", &[])
            .with_tag("pl", &[])
            .with_suggestions("en", "helo", &["Hello", "Help"])
            .with_suggestions("pl", "helo", &["Help", "Halo"]);
        let mut speller = Speller::new(backend, 16);
        let v = speller.verdict("helo", &langs("en+pl")).unwrap();
        assert_eq!(
            v,
            Verdict::Misspelled(vec![
                "Hello".to_string(),
                "Help".to_string(),
                "Halo".to_string()
            ])
        );
    }

    #[test]
    fn test_suggestions_capped() {
        let backend = FakeBackend::default()
            .with_tag("en", &[])
            .with_suggestions("en", "x", &["a", "b", "c", "d", "e", "f", "g"]);
        let mut speller = Speller::new(backend, 16);
        match speller.verdict("x", &langs("en")).unwrap() {
            Verdict::Misspelled(s) => assert_eq!(s.len(), SUGGESTION_CAP),
            v => panic!("unexpected verdict {v:?}"),
        }
    }

    #[test]
    fn test_no_suggestions_is_still_misspelled() {
        let backend = FakeBackend::default().with_tag("en", &[]);
        let mut speller = Speller::new(backend, 16);
        let v = speller.verdict("zzz", &langs("en")).unwrap();
        assert_eq!(v, Verdict::Misspelled(vec![]));
    }

    #[test]
    fn test_missing_dictionary_fails_closed() {
        let backend = FakeBackend::default()
            .with_tag("en", &["hello"])
            .with_broken_tag("xx");
        let calls = backend.calls.clone();
        let mut speller = Speller::new(backend, 16);
        let err = speller.verdict("hello", &langs("en+xx")).unwrap_err();
        match err {
            SpellerError::NoDictionary { tag, .. } => assert_eq!(tag, "xx"),
            e => panic!("unexpected error {e:?}"),
        }
        // nothing was checked once the set could not be completed
        assert_eq!(calls.borrow().checks, 0);
    }

    #[test]
    fn test_failed_open_retried_next_time() {
        let backend = FakeBackend::default().with_broken_tag("en");
        let calls = backend.calls.clone();
        let mut speller = Speller::new(backend, 16);
        assert!(speller.verdict("word", &langs("en")).is_err());
        assert!(speller.verdict("word", &langs("en")).is_err());
        assert_eq!(calls.borrow().opens, 2);
    }

    #[test]
    fn test_check_failure_passes_word_uncached() {
        let backend = FakeBackend::default()
            .with_tag("en", &[])
            .with_failing_check("en");
        let calls = backend.calls.clone();
        let mut speller = Speller::new(backend, 16);
        assert_eq!(speller.verdict("helo", &langs("en")).unwrap(), Verdict::Correct);
        assert_eq!(speller.verdict("helo", &langs("en")).unwrap(), Verdict::Correct);
        // not cached: the backend was consulted both times
        assert_eq!(calls.borrow().checks, 2);
    }

    #[test]
    fn test_verdicts_cached_per_set_and_word() {
        let backend = FakeBackend::default().with_tag("en", &["hello"]);
        let calls = backend.calls.clone();
        let mut speller = Speller::new(backend, 16);
        speller.verdict("hello", &langs("en")).unwrap();
        speller.verdict("hello", &langs("en")).unwrap();
        assert_eq!(calls.borrow().checks, 1);
    }

    #[test]
    fn test_add_word_invalidates_cache() {
        let backend = FakeBackend::default().with_tag("en", &[]);
        let mut speller = Speller::new(backend, 16);
        assert_eq!(
            speller.verdict("zorp", &langs("en")).unwrap(),
            Verdict::Misspelled(vec![])
        );
        speller.add_word("en", "zorp").unwrap();
        assert_eq!(speller.verdict("zorp", &langs("en")).unwrap(), Verdict::Correct);
    }

    #[test]
    fn test_handles_reused_across_words() {
        let backend = FakeBackend::default().with_tag("en", &["one", "two"]);
        let calls = backend.calls.clone();
        let mut speller = Speller::new(backend, 16);
        speller.verdict("one", &langs("en")).unwrap();
        speller.verdict("two", &langs("en")).unwrap();
        assert_eq!(calls.borrow().opens, 1);
    }
}
