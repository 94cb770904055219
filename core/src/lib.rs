//! chatspell-core
//!
//! Inline spell checking for chat input lines: word location, language
//! resolution per conversation, suggestion cycling and rendering,
//! shared by the backend crates (chatspell-wordlist, chatspell-ispell).
//!
//! Public API:
//! - `SpellEngine` - Facade the chat host drives with refreshes and keys
//! - `Backend` / `Dictionary` - Seam a spelling backend implements
//! - `Speller` - Verdicts for words against a language set
//! - `LanguageResolver` - Conversation → language-set rules
//! - `SuggestionState` - Cycling state for one flagged word
//! - `Config` - Options, TOML round-trip and the host key/value bridge
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Core modules
pub mod token;
pub use token::{Located, WordSpan};

pub mod backend;
pub use backend::{Backend, BackendError, Dictionary};

pub mod speller;
pub use speller::{Speller, SpellerError, Verdict, SUGGESTION_CAP};

pub mod resolver;
pub use resolver::{ConversationKey, LangSet, LanguageResolver, UNDETERMINED};

pub mod session;
pub use session::SuggestionState;

pub mod nick;
pub use nick::NickProvider;

pub mod render;
pub use render::Palette;

pub mod engine;
pub use engine::{Conversation, ConversationKind, KeyEvent, KeyOutcome, Lookup, Notice, SpellEngine};

/// Options shared by every backend and host.
///
/// Backend crates flatten this into their own config structs, so one
/// TOML file configures the whole stack.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Master switch; when off the engine never decorates or consumes
    /// anything.
    pub enabled: bool,

    /// Language set for conversations no rule matches (e.g. "en_US",
    /// "en_US+pl_PL").
    pub default_language: String,

    /// Per-conversation rules, first match wins. Each entry is
    /// `lang`, `room/lang` or `network/room/lang`.
    pub languages: Vec<String>,

    /// Color name for the flagged word.
    pub word_color: String,

    /// Color name for the selection while cycling.
    pub selection_color: String,

    /// Chars that start a command line; such lines are not checked
    /// unless they continue with `say` or `me`.
    pub command_prefixes: String,

    /// Host window to show suggestions in, empty for none.
    pub window_name: String,

    /// Height of that window, in lines.
    pub window_height: u32,

    /// Verdict cache entries kept per engine.
    pub cache_size: usize,

    /// Extra engine tracing for debugging sessions.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            default_language: "en_US".to_string(),
            languages: vec![],
            word_color: "red".to_string(),
            selection_color: "magenta".to_string(),
            command_prefixes: "/".to_string(),
            window_name: String::new(),
            window_height: 10,
            cache_size: 1024,
            debug: false,
        }
    }
}

/// Errors from the host key/value option bridge.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("invalid value `{value}` for option `{option}`")]
    InvalidValue { option: String, value: String },
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Set one option from its string form, as chat hosts store them.
    ///
    /// Booleans accept `1/0`, `true/false`, `yes/no`, `on/off`. The
    /// `languages` list is comma-separated. Unknown names and
    /// unparsable values are rejected so the caller can tell the user
    /// which setting is wrong.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        match name {
            "enabled" => self.enabled = parse_bool(name, value)?,
            "debug" => self.debug = parse_bool(name, value)?,
            "default_language" => self.default_language = value.to_string(),
            "languages" => {
                self.languages = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "word_color" => self.word_color = value.to_string(),
            "selection_color" => self.selection_color = value.to_string(),
            "command_prefixes" => self.command_prefixes = value.to_string(),
            "window_name" => self.window_name = value.to_string(),
            "window_height" => {
                self.window_height = value.parse().map_err(|_| ConfigError::InvalidValue {
                    option: name.to_string(),
                    value: value.to_string(),
                })?;
            }
            "cache_size" => {
                self.cache_size = value.parse().map_err(|_| ConfigError::InvalidValue {
                    option: name.to_string(),
                    value: value.to_string(),
                })?;
            }
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// String form of one option, `None` for unknown names. Booleans
    /// come back as `1`/`0`, the `languages` list comma-joined.
    pub fn get_option(&self, name: &str) -> Option<String> {
        let value = match name {
            "enabled" => bool_str(self.enabled),
            "debug" => bool_str(self.debug),
            "default_language" => self.default_language.clone(),
            "languages" => self.languages.join(","),
            "word_color" => self.word_color.clone(),
            "selection_color" => self.selection_color.clone(),
            "command_prefixes" => self.command_prefixes.clone(),
            "window_name" => self.window_name.clone(),
            "window_height" => self.window_height.to_string(),
            "cache_size" => self.cache_size.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            option: name.to_string(),
            value: value.to_string(),
        }),
    }
}

fn bool_str(v: bool) -> String {
    if v { "1" } else { "0" }.to_string()
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}
