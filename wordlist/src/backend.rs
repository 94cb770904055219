//! Backend over compiled word sets.
//!
//! `open` maps a language tag to `<dict_dir>/<tag>.fst` plus the
//! matching personal database, loading the whole set into memory. The
//! sets are compiled lowercase (see `compile`), so checking folds case
//! and suggesting queries with the lowercased word, re-capitalizing
//! the results when the input was title-cased.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use fst::automaton::Levenshtein;
use fst::{IntoStreamer, Set, Streamer};

use chatspell_core::{Backend, BackendError, Dictionary};

use crate::config::WordlistConfig;
use crate::personal::PersonalDict;
use crate::storage_error;

/// Factory resolving tags to on-disk artifacts.
#[derive(Debug, Clone)]
pub struct WordlistBackend {
    dict_dir: PathBuf,
    personal_dir: PathBuf,
}

impl WordlistBackend {
    pub fn new<P: Into<PathBuf>>(dict_dir: P, personal_dir: P) -> Self {
        Self {
            dict_dir: dict_dir.into(),
            personal_dir: personal_dir.into(),
        }
    }

    pub fn from_config(config: &WordlistConfig) -> Self {
        Self::new(config.dict_dir.clone(), config.personal_dir.clone())
    }

    fn dict_path(&self, tag: &str) -> PathBuf {
        self.dict_dir.join(format!("{tag}.fst"))
    }

    fn personal_path(&self, tag: &str) -> PathBuf {
        self.personal_dir.join(format!("{tag}.redb"))
    }
}

impl Backend for WordlistBackend {
    type Dict = WordlistDict;

    fn open(&self, tag: &str) -> Result<WordlistDict, BackendError> {
        let path = self.dict_path(tag);
        let set = {
            let mut f = File::open(&path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BackendError::NotFound(tag.to_string())
                } else {
                    BackendError::Io(e)
                }
            })?;
            let mut buf = Vec::new();
            f.read_to_end(&mut buf)?;
            Set::new(buf).map_err(storage_error)?
        };
        let personal = PersonalDict::open(self.personal_path(tag)).map_err(storage_error)?;
        tracing::debug!("opened wordlist `{}` ({} words)", path.display(), set.len());
        Ok(WordlistDict { set, personal })
    }
}

/// One language's compiled set plus its personal additions.
#[derive(Debug)]
pub struct WordlistDict {
    set: Set<Vec<u8>>,
    personal: PersonalDict,
}

impl WordlistDict {
    /// Set members within the given edit distance of `query`, in the
    /// set's own (lexicographic) order.
    fn within_distance(
        &self,
        query: &str,
        distance: u32,
        limit: usize,
    ) -> Result<Vec<String>, BackendError> {
        let automaton = Levenshtein::new(query, distance).map_err(storage_error)?;
        let mut stream = self.set.search(&automaton).into_stream();
        let mut found = Vec::new();
        while let Some(key) = stream.next() {
            if found.len() >= limit {
                break;
            }
            found.push(String::from_utf8_lossy(key).into_owned());
        }
        Ok(found)
    }
}

impl Dictionary for WordlistDict {
    fn check(&mut self, word: &str) -> Result<bool, BackendError> {
        if self.set.contains(word) {
            return Ok(true);
        }
        let lower = word.to_lowercase();
        if lower != word && self.set.contains(&lower) {
            return Ok(true);
        }
        if self.personal.contains(word).map_err(storage_error)? {
            return Ok(true);
        }
        if lower != word && self.personal.contains(&lower).map_err(storage_error)? {
            return Ok(true);
        }
        Ok(false)
    }

    fn suggest(&mut self, word: &str, limit: usize) -> Result<Vec<String>, BackendError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let query = word.to_lowercase();
        let mut found = self.within_distance(&query, 1, limit)?;
        if found.is_empty() {
            found = self.within_distance(&query, 2, limit)?;
        }
        if is_title_case(word) {
            found = found.iter().map(|s| title_case(s)).collect();
        }
        Ok(found)
    }

    fn add_word(&mut self, word: &str) -> Result<(), BackendError> {
        let added = self.personal.add(word).map_err(storage_error)?;
        if !added {
            tracing::debug!("`{word}` already in the personal dictionary");
        }
        Ok(())
    }
}

/// First char uppercase, everything after lowercase.
fn is_title_case(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.is_uppercase() && chars.all(|c| !c.is_uppercase()),
        None => false,
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
