//! Wordlist-specific configuration that extends the base `Config` from
//! core with the two directories this backend reads and writes:
//! `dict_dir` for compiled `<tag>.fst` sets and `personal_dir` for
//! per-tag personal databases.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WordlistConfig {
    /// Base configuration fields (languages, colors, cache size, ...)
    #[serde(flatten)]
    pub base: chatspell_core::Config,

    /// Directory holding one compiled `<tag>.fst` per language.
    pub dict_dir: PathBuf,

    /// Directory holding one `<tag>.redb` personal dictionary per
    /// language. Created on demand.
    pub personal_dir: PathBuf,
}

impl Default for WordlistConfig {
    fn default() -> Self {
        Self {
            base: chatspell_core::Config::default(),
            dict_dir: PathBuf::from("dicts"),
            personal_dir: PathBuf::from("personal"),
        }
    }
}

impl WordlistConfig {
    /// Convert this config into the base config for `SpellEngine::new`.
    pub fn into_base(self) -> chatspell_core::Config {
        self.base
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &chatspell_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut chatspell_core::Config {
        &mut self.base
    }

    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattened_base_fields_parse() {
        let content = r#"
            default_language = "pl_PL"
            dict_dir = "/var/lib/chatspell/dicts"
        "#;
        let config: WordlistConfig = toml::from_str(content).unwrap();
        assert_eq!(config.base.default_language, "pl_PL");
        assert_eq!(config.dict_dir, PathBuf::from("/var/lib/chatspell/dicts"));
        // untouched fields keep their defaults
        assert_eq!(config.personal_dir, PathBuf::from("personal"));
        assert!(config.base.enabled);
    }
}
