//! Per-conversation language resolution.
//!
//! Conversations are identified by network and room name. An ordered
//! rule list maps them to language sets; the first matching rule wins
//! and a configurable default covers the rest. The reserved tag `und`
//! switches checking off for whatever it resolves to.

use std::fmt;

/// Language tag that disables checking for a conversation.
pub const UNDETERMINED: &str = "und";

/// Identity of one conversation, normalized for rule matching.
///
/// Network and room are lowercased. Broadcast-style room names keep
/// their `!` marker but lose the five creation-id chars behind it, so
/// every incarnation of the room resolves to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    network: String,
    name: String,
}

impl ConversationKey {
    pub fn new(network: &str, name: &str) -> Self {
        Self {
            network: network.to_lowercase(),
            name: normalize_room(name),
        }
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.network.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.network, self.name)
        }
    }
}

fn normalize_room(name: &str) -> String {
    match name.strip_prefix('!') {
        Some(rest) => {
            let short: String = rest.chars().skip(5).collect();
            format!("!{short}").to_lowercase()
        }
        None => name.to_lowercase(),
    }
}

/// One or more language tags joined with `+`, checked in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LangSet(String);

impl LangSet {
    pub fn new(tags: &str) -> Self {
        let joined = tags
            .split('+')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("+");
        Self(joined)
    }

    /// The tags in check order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.0.split('+').filter(|t| !t.is_empty())
    }

    /// First tag of the set; personal-word additions go here.
    pub fn primary(&self) -> Option<&str> {
        self.tags().next()
    }

    /// Whether this set is the reserved "leave this text alone" value.
    pub fn is_undetermined(&self) -> bool {
        self.0 == UNDETERMINED
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LangSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A parsed rule entry: `lang`, `room/lang` or `network/room/lang`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LanguageRule {
    network: Option<String>,
    room: Option<String>,
    langs: LangSet,
}

impl LanguageRule {
    fn parse(entry: &str) -> Option<Self> {
        let parts: Vec<&str> = entry.split('/').collect();
        match parts.as_slice() {
            [lang] if !lang.is_empty() => Some(Self {
                network: None,
                room: None,
                langs: LangSet::new(lang),
            }),
            [room, lang] if !room.is_empty() && !lang.is_empty() => Some(Self {
                network: None,
                room: Some(room.to_lowercase()),
                langs: LangSet::new(lang),
            }),
            [network, room, lang] if !network.is_empty() && !room.is_empty() && !lang.is_empty() => {
                Some(Self {
                    network: Some(network.to_lowercase()),
                    room: Some(room.to_lowercase()),
                    langs: LangSet::new(lang),
                })
            }
            _ => None,
        }
    }

    fn matches(&self, key: &ConversationKey) -> bool {
        let network_ok = match &self.network {
            Some(n) => n == key.network(),
            None => true,
        };
        let room_ok = match &self.room {
            Some(r) => r == key.name(),
            None => true,
        };
        network_ok && room_ok
    }
}

/// Ordered rule list plus the fallback language set.
#[derive(Debug, Clone)]
pub struct LanguageResolver {
    rules: Vec<LanguageRule>,
    default: LangSet,
}

impl LanguageResolver {
    /// Build a resolver from rule entries and the default language.
    ///
    /// Malformed entries are logged and skipped rather than taking the
    /// whole rule list down.
    pub fn new(entries: &[String], default_language: &str) -> Self {
        let mut rules = Vec::new();
        for entry in entries {
            match LanguageRule::parse(entry) {
                Some(rule) => rules.push(rule),
                None => tracing::warn!("ignoring malformed language rule: {entry:?}"),
            }
        }
        Self {
            rules,
            default: LangSet::new(default_language),
        }
    }

    /// Language set for one conversation, first matching rule wins.
    pub fn resolve(&self, key: &ConversationKey) -> LangSet {
        for rule in &self.rules {
            if rule.matches(key) {
                return rule.langs.clone();
            }
        }
        self.default.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(entries: &[&str], default: &str) -> LanguageResolver {
        let entries: Vec<String> = entries.iter().map(|s| s.to_string()).collect();
        LanguageResolver::new(&entries, default)
    }

    #[test]
    fn test_default_when_no_rule_matches() {
        let r = resolver(&["libera/#rust-pl/pl_PL"], "en_US");
        let key = ConversationKey::new("libera", "#rust");
        assert_eq!(r.resolve(&key).as_str(), "en_US");
    }

    #[test]
    fn test_three_part_rule_needs_both_fields() {
        let r = resolver(&["libera/#rust-pl/pl_PL"], "en_US");
        assert_eq!(
            r.resolve(&ConversationKey::new("libera", "#rust-pl")).as_str(),
            "pl_PL"
        );
        assert_eq!(
            r.resolve(&ConversationKey::new("oftc", "#rust-pl")).as_str(),
            "en_US"
        );
    }

    #[test]
    fn test_two_part_rule_matches_any_network() {
        let r = resolver(&["#rust-pl/pl_PL"], "en_US");
        assert_eq!(
            r.resolve(&ConversationKey::new("libera", "#rust-pl")).as_str(),
            "pl_PL"
        );
        assert_eq!(
            r.resolve(&ConversationKey::new("oftc", "#rust-pl")).as_str(),
            "pl_PL"
        );
    }

    #[test]
    fn test_first_match_wins() {
        let r = resolver(&["#dev/de_DE", "#dev/fr_FR"], "en_US");
        assert_eq!(
            r.resolve(&ConversationKey::new("x", "#dev")).as_str(),
            "de_DE"
        );
    }

    #[test]
    fn test_bare_rule_is_a_catch_all() {
        let r = resolver(&["#dev/de_DE", "pl_PL", "#other/fr_FR"], "en_US");
        // reached before #other can match
        assert_eq!(
            r.resolve(&ConversationKey::new("x", "#other")).as_str(),
            "pl_PL"
        );
        assert_eq!(
            r.resolve(&ConversationKey::new("x", "#dev")).as_str(),
            "de_DE"
        );
    }

    #[test]
    fn test_layered_rules_narrowest_first() {
        let r = resolver(&["work/#dev/en_US", "#dev/pl_PL", "de_DE"], "en_US");
        assert_eq!(
            r.resolve(&ConversationKey::new("work", "#dev")).as_str(),
            "en_US"
        );
        assert_eq!(
            r.resolve(&ConversationKey::new("home", "#dev")).as_str(),
            "pl_PL"
        );
        assert_eq!(
            r.resolve(&ConversationKey::new("other", "#random")).as_str(),
            "de_DE"
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let r = resolver(&["Libera/#Rust-PL/pl_PL"], "en_US");
        assert_eq!(
            r.resolve(&ConversationKey::new("LIBERA", "#rust-pl")).as_str(),
            "pl_PL"
        );
    }

    #[test]
    fn test_broadcast_room_normalized() {
        let key = ConversationKey::new("IRCnet", "!ABCDEops");
        assert_eq!(key.name(), "!ops");
        let r = resolver(&["ircnet/!ops/fi_FI"], "en_US");
        assert_eq!(r.resolve(&key).as_str(), "fi_FI");
    }

    #[test]
    fn test_malformed_rules_skipped() {
        let r = resolver(&["a/b/c/d", "//x", "#dev/pl_PL"], "en_US");
        assert_eq!(
            r.resolve(&ConversationKey::new("x", "#dev")).as_str(),
            "pl_PL"
        );
    }

    #[test]
    fn test_langset_splits_and_trims() {
        let set = LangSet::new("en_US + pl_PL+");
        let tags: Vec<&str> = set.tags().collect();
        assert_eq!(tags, vec!["en_US", "pl_PL"]);
        assert_eq!(set.primary(), Some("en_US"));
        assert_eq!(set.as_str(), "en_US+pl_PL");
    }

    #[test]
    fn test_undetermined_is_whole_set_only() {
        assert!(LangSet::new("und").is_undetermined());
        assert!(!LangSet::new("en_US+und").is_undetermined());
    }
}
