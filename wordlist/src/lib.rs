//! chatspell-wordlist crate root
//!
//! In-process spelling backend built on compiled word sets. Each
//! language tag pairs an `fst`-compiled set (`<dict_dir>/<tag>.fst`)
//! with a small `redb` database of personal additions
//! (`<personal_dir>/<tag>.redb`). Checking is set membership with case
//! folding; suggestions come from a Levenshtein automaton over the
//! same set, so the backend never proposes a word it would not accept.
//!
//! Public API exported here:
//! - `WordlistBackend` and `WordlistDict` from `backend`
//! - `WordlistConfig` from `config`
//! - `compile_wordlist` from `compile`
//! - `PersonalDict` from `personal`

pub mod backend;
pub mod compile;
pub mod config;
pub mod personal;

pub use backend::{WordlistBackend, WordlistDict};
pub use compile::compile_wordlist;
pub use config::WordlistConfig;
pub use personal::PersonalDict;

use chatspell_core::BackendError;

pub(crate) fn storage_error(e: impl std::fmt::Display) -> BackendError {
    BackendError::Storage(e.to_string())
}
