//! Engine facade: everything a chat host calls.
//!
//! `SpellEngine` owns the speller, the language resolver and one
//! suggestion state per conversation. Hosts feed it display refreshes
//! and key events; it hands back decorated lines and input edits, and
//! queues notices for anything the user should hear about.

use std::fmt;

use ahash::AHashMap;

use crate::backend::Backend;
use crate::nick::{self, NickProvider};
use crate::render::{self, Palette};
use crate::resolver::{ConversationKey, LanguageResolver};
use crate::session::SuggestionState;
use crate::speller::{Speller, SpellerError, Verdict, SUGGESTION_CAP};
use crate::token;
use crate::{Config, ConfigError};

/// What kind of conversation a line is typed into.
///
/// Nickname suggestions only make sense where there are nicknames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationKind {
    /// Multi-user room.
    Room,
    /// One-on-one conversation.
    Private,
    /// Anything else (status windows, logs).
    Other,
}

/// One conversation as the host sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub key: ConversationKey,
    pub kind: ConversationKind,
}

impl Conversation {
    pub fn room(network: &str, name: &str) -> Self {
        Self {
            key: ConversationKey::new(network, name),
            kind: ConversationKind::Room,
        }
    }

    pub fn private(network: &str, counterpart: &str) -> Self {
        Self {
            key: ConversationKey::new(network, counterpart),
            kind: ConversationKind::Private,
        }
    }

    pub fn other(network: &str, name: &str) -> Self {
        Self {
            key: ConversationKey::new(network, name),
            kind: ConversationKind::Other,
        }
    }
}

/// Key events the engine cares about. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// The cycle key (tab in the reference bindings).
    Advance,
    /// A word separator carrying the char to append (usually space).
    Commit(char),
    /// Any other editing key (movement, deletion, history, enter).
    Other,
}

/// What the host should do with the key it just reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not consumed; let the key do whatever it normally does.
    PassThrough,
    /// Consumed; replace the input line and move the cursor.
    Edit { text: String, cursor: usize },
}

/// Word lookup outcome for direct queries (commands, CLI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Checking is off here (globally or via the `und` language).
    Disabled,
    /// The token is skipped before any dictionary sees it.
    Ineligible,
    Correct,
    Misspelled(Vec<String>),
}

/// User-facing message queued by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Info(msg) | Notice::Error(msg) => write!(f, "{msg}"),
        }
    }
}

/// Inline spell checking over one pluggable backend.
pub struct SpellEngine<B: Backend> {
    config: Config,
    speller: Speller<B>,
    resolver: LanguageResolver,
    sessions: AHashMap<ConversationKey, SuggestionState>,
    notices: Vec<Notice>,
}

impl<B: Backend> SpellEngine<B> {
    pub fn new(backend: B, config: Config) -> Self {
        let resolver = LanguageResolver::new(&config.languages, &config.default_language);
        let speller = Speller::new(backend, config.cache_size);
        Self {
            config,
            speller,
            resolver,
            sessions: AHashMap::new(),
            notices: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Change one option, re-deriving whatever depends on it.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        self.config.set_option(name, value)?;
        match name {
            "languages" | "default_language" => {
                self.resolver =
                    LanguageResolver::new(&self.config.languages, &self.config.default_language);
            }
            "cache_size" => self.speller.set_cache_size(self.config.cache_size),
            _ => {}
        }
        Ok(())
    }

    /// Decorate the input line for display, or `None` to show it as-is.
    ///
    /// Runs on every input refresh:
    ///
    /// 1. Skip empty lines, commands, disabled conversations.
    /// 2. Locate the word next to the cursor; nothing there means
    ///    nothing to do.
    /// 3. Reconcile stored state: a different span means the user
    ///    moved on, so the old state is dropped. A matching span with
    ///    a replacement spliced in is re-rendered as-is, because the
    ///    replacement is not a word to re-check.
    /// 4. Otherwise check the word, seed nickname matches in front of
    ///    dictionary suggestions, and flag it if anything came back.
    ///
    /// Dictionary configuration failures queue a [`Notice`] and leave
    /// the line undecorated.
    pub fn redisplay(
        &mut self,
        conv: &Conversation,
        nicks: &dyn NickProvider,
        text: &str,
        cursor: usize,
    ) -> Option<String> {
        if !self.config.enabled {
            return None;
        }
        if text.trim().is_empty() || self.is_command(text) {
            return None;
        }
        let langs = self.resolver.resolve(&conv.key);
        if langs.is_undetermined() {
            return None;
        }
        let located = token::locate(text, cursor)?;

        let mut moved_away = false;
        if let Some(state) = self.sessions.get(&conv.key) {
            if state.span() != located.span {
                moved_away = true;
            } else if state.is_cycling() {
                return Some(render::decorate(text, state, &self.palette()));
            }
        }
        if moved_away {
            self.sessions.remove(&conv.key);
        }

        let verdict = match self.speller.verdict(&located.word, &langs) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("cannot check `{}`: {e}", located.word);
                self.notices.push(Notice::Error(format!("spell check unavailable: {e}")));
                self.sessions.remove(&conv.key);
                return None;
            }
        };
        let dict_suggestions = match verdict {
            Verdict::Correct => {
                self.sessions.remove(&conv.key);
                return None;
            }
            Verdict::Misspelled(s) => s,
        };

        let mut suggestions = Vec::new();
        if matches!(conv.kind, ConversationKind::Room | ConversationKind::Private) {
            suggestions.extend(nick::prefix_matches(&nicks.nicknames(), &located.word));
        }
        suggestions.extend(dict_suggestions);
        suggestions.truncate(SUGGESTION_CAP);
        if suggestions.is_empty() {
            self.sessions.remove(&conv.key);
            return None;
        }

        if self.config.debug {
            tracing::debug!(
                "flagging `{}` in {} with {} suggestion(s)",
                located.word,
                conv.key,
                suggestions.len()
            );
        }
        let state = SuggestionState::flagged(located.span, &located.word, suggestions);
        let rendered = render::decorate(text, &state, &self.palette());
        self.sessions.insert(conv.key.clone(), state);
        Some(rendered)
    }

    /// React to a key event. The engine never consumes a key unless a
    /// flagged word is actually being cycled.
    pub fn process_key(&mut self, conv: &Conversation, key: KeyEvent, text: &str) -> KeyOutcome {
        if !self.config.enabled {
            return KeyOutcome::PassThrough;
        }
        match key {
            KeyEvent::Advance => self.advance(conv, text),
            KeyEvent::Commit(separator) => self.commit(conv, separator, text),
            KeyEvent::Other => {
                if self.is_cycling(&conv.key) {
                    self.sessions.remove(&conv.key);
                }
                KeyOutcome::PassThrough
            }
        }
    }

    /// Completion candidates for the word before the cursor, with the
    /// punctuation it was typed with glued back on.
    ///
    /// Unlike display decoration this tolerates whitespace between the
    /// word and the cursor, and it never creates or disturbs cycling
    /// state.
    pub fn completions(&mut self, conv: &Conversation, text: &str, cursor: usize) -> Vec<String> {
        if !self.config.enabled {
            return Vec::new();
        }
        let langs = self.resolver.resolve(&conv.key);
        if langs.is_undetermined() {
            return Vec::new();
        }
        let cursor = token::clamp_cursor(text, cursor);
        let left = &text[..cursor];
        let trimmed = left.trim_end();
        let trailing_ws = &left[trimmed.len()..];
        let Some(located) = token::locate(trimmed, trimmed.len()) else {
            return Vec::new();
        };
        match self.speller.verdict(&located.word, &langs) {
            Ok(Verdict::Misspelled(suggestions)) => suggestions
                .into_iter()
                .map(|s| format!("{}{}{}{}", located.prefix, s, located.suffix, trailing_ws))
                .collect(),
            Ok(Verdict::Correct) => Vec::new(),
            Err(e) => {
                self.notices.push(Notice::Error(format!("spell check unavailable: {e}")));
                Vec::new()
            }
        }
    }

    /// Direct verdict for one word in this conversation's languages.
    pub fn lookup(&mut self, conv: &Conversation, word: &str) -> Result<Lookup, SpellerError> {
        if !self.config.enabled {
            return Ok(Lookup::Disabled);
        }
        let langs = self.resolver.resolve(&conv.key);
        if langs.is_undetermined() {
            return Ok(Lookup::Disabled);
        }
        let Some(located) = token::locate(word, word.len()) else {
            return Ok(Lookup::Ineligible);
        };
        match self.speller.verdict(&located.word, &langs)? {
            Verdict::Correct => Ok(Lookup::Correct),
            Verdict::Misspelled(s) => Ok(Lookup::Misspelled(s)),
        }
    }

    /// Add words to the personal dictionary of the conversation's
    /// primary language. Failures are reported per word and do not
    /// stop the rest; returns how many went in.
    pub fn add_words(&mut self, conv: &Conversation, words: &[String]) -> usize {
        let langs = self.resolver.resolve(&conv.key);
        if langs.is_undetermined() {
            self.notices.push(Notice::Error(
                "spell checking is disabled here, no dictionary to add to".to_string(),
            ));
            return 0;
        }
        let Some(tag) = langs.primary().map(str::to_string) else {
            self.notices
                .push(Notice::Error("no language configured".to_string()));
            return 0;
        };
        let mut added = 0;
        for word in words {
            match self.speller.add_word(&tag, word) {
                Ok(()) => {
                    added += 1;
                    self.notices
                        .push(Notice::Info(format!("added `{word}` to the {tag} dictionary")));
                }
                Err(e) => {
                    self.notices
                        .push(Notice::Error(format!("could not add `{word}`: {e}")));
                }
            }
        }
        added
    }

    /// Forget a conversation entirely (closed buffer, left room).
    pub fn purge(&mut self, key: &ConversationKey) {
        self.sessions.remove(key);
    }

    /// Whether a word is currently flagged in this conversation.
    pub fn has_state(&self, key: &ConversationKey) -> bool {
        self.sessions.contains_key(key)
    }

    /// Take every queued notice, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn advance(&mut self, conv: &Conversation, text: &str) -> KeyOutcome {
        let span = match self.sessions.get(&conv.key) {
            Some(state) => state.span(),
            None => return KeyOutcome::PassThrough,
        };
        // the host can rewrite the line behind our back; a span that no
        // longer fits means our picture is stale
        if span.end() > text.len()
            || !text.is_char_boundary(span.start)
            || !text.is_char_boundary(span.end())
        {
            self.sessions.remove(&conv.key);
            return KeyOutcome::PassThrough;
        }
        let Some(state) = self.sessions.get_mut(&conv.key) else {
            return KeyOutcome::PassThrough;
        };
        let chosen = state.advance().to_string();
        state.set_occupied_len(chosen.len());
        if self.config.debug {
            tracing::debug!("cycled `{}` -> `{chosen}` in {}", state.original(), conv.key);
        }
        let mut new_text = String::with_capacity(text.len() + chosen.len());
        new_text.push_str(&text[..span.start]);
        new_text.push_str(&chosen);
        new_text.push_str(&text[span.end()..]);
        let cursor = span.start + chosen.len();
        KeyOutcome::Edit {
            text: new_text,
            cursor,
        }
    }

    fn commit(&mut self, conv: &Conversation, separator: char, text: &str) -> KeyOutcome {
        if !self.is_cycling(&conv.key) {
            return KeyOutcome::PassThrough;
        }
        self.sessions.remove(&conv.key);
        let mut new_text = text.to_string();
        new_text.push(separator);
        let cursor = new_text.len();
        KeyOutcome::Edit {
            text: new_text,
            cursor,
        }
    }

    fn is_cycling(&self, key: &ConversationKey) -> bool {
        self.sessions
            .get(key)
            .map(|s| s.is_cycling())
            .unwrap_or(false)
    }

    /// Lines starting with a command prefix are left alone, except the
    /// say/me forms that carry user prose.
    fn is_command(&self, text: &str) -> bool {
        let Some(first) = text.chars().next() else {
            return false;
        };
        if !self.config.command_prefixes.contains(first) {
            return false;
        }
        let lower = text[first.len_utf8()..].to_lowercase();
        for keyword in ["say", "me"] {
            if let Some(rest) = lower.strip_prefix(keyword) {
                if rest.starts_with(char::is_whitespace) {
                    return false;
                }
            }
        }
        true
    }

    fn palette(&self) -> Palette {
        Palette::from_names(&self.config.word_color, &self.config.selection_color)
    }
}
