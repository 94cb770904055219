//! chatspell-ispell crate root
//!
//! Spelling backend that drives an external `aspell` or `hunspell`
//! process in ispell pipe mode (`-a`). One child per language tag;
//! words go down the pipe as `^word` lines and come back as the
//! classic one-group-per-word responses. The protocol grammar lives in
//! `protocol`, the process plumbing in `backend`.
//!
//! Public API exported here:
//! - `IspellBackend` and `IspellDict` from `backend`
//! - `IspellConfig` and `Dialect` from `config`

pub mod backend;
pub mod config;
pub mod protocol;

pub use backend::{IspellBackend, IspellDict};
pub use config::{Dialect, IspellConfig};
