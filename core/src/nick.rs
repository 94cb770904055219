//! Nickname lookups for suggestion seeding.
//!
//! Hosts know who is present in a conversation; the engine only needs
//! the names. Room and private conversations feed these through
//! [`prefix_matches`] so a half-typed nickname beats dictionary output.

/// Source of the nicknames visible in the current conversation.
pub trait NickProvider {
    fn nicknames(&self) -> Vec<String>;
}

/// No nicknames, for hosts without a member list.
impl NickProvider for () {
    fn nicknames(&self) -> Vec<String> {
        Vec::new()
    }
}

impl NickProvider for Vec<String> {
    fn nicknames(&self) -> Vec<String> {
        self.clone()
    }
}

impl<'a> NickProvider for &'a [&'a str] {
    fn nicknames(&self) -> Vec<String> {
        self.iter().map(|n| n.to_string()).collect()
    }
}

/// Nicknames starting with `prefix`, compared case-insensitively.
///
/// Order of the input is preserved; the caller caps the combined list.
pub fn prefix_matches(nicks: &[String], prefix: &str) -> Vec<String> {
    let wanted = prefix.to_lowercase();
    nicks
        .iter()
        .filter(|n| n.to_lowercase().starts_with(&wanted))
        .cloned()
        .collect()
}
