//! Ispell-specific configuration that extends the base `Config` from
//! core with the speller program to spawn and how to tell it the
//! language.

use serde::{Deserialize, Serialize};

/// Which flavor of `-a` speller is being driven. They agree on the
/// pipe protocol but not on how a language is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `aspell -a --lang=<tag>`
    Aspell,
    /// `hunspell -a -d <tag>`
    Hunspell,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IspellConfig {
    /// Base configuration fields (languages, colors, cache size, ...)
    #[serde(flatten)]
    pub base: chatspell_core::Config,

    /// Executable to spawn, name or full path.
    pub program: String,

    /// Command-line convention the program follows.
    pub dialect: Dialect,

    /// Extra arguments appended verbatim (encodings, custom homes).
    pub extra_args: Vec<String>,
}

impl Default for IspellConfig {
    fn default() -> Self {
        Self {
            base: chatspell_core::Config::default(),
            program: "aspell".to_string(),
            dialect: Dialect::Aspell,
            extra_args: Vec::new(),
        }
    }
}

impl IspellConfig {
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
