//! Noise-tolerant key normalization
//!
//! User keys arrive with stray whitespace, underscores instead of spaces and
//! inconsistent case. Matching runs through a fixed ladder of [`MatchTier`]s,
//! from exact to most permissive; the first tier with a hit wins.

/// Canonical separator substituted for whitespace/underscore runs.
pub const SEPARATOR: char = ' ';

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '_'
}

/// Trim and collapse every whitespace/underscore run into one [`SEPARATOR`].
pub fn canonical(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut pending = false;
    for c in key.trim_matches(is_separator).chars() {
        if is_separator(c) {
            pending = true;
            continue;
        }
        if pending {
            out.push(SEPARATOR);
            pending = false;
        }
        out.push(c);
    }
    out
}

/// Key with all separators removed.
pub fn stripped(key: &str) -> String {
    key.chars().filter(|c| !is_separator(*c)).collect()
}

/// Separator-free, lower-cased key.
pub fn folded(key: &str) -> String {
    stripped(key).to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTier {
    /// Whitespace-trimmed key as given
    Exact,
    Canonical,
    SeparatorInsensitive,
    CaseInsensitive,
}

impl MatchTier {
    pub const ALL: [MatchTier; 4] = [
        MatchTier::Exact,
        MatchTier::Canonical,
        MatchTier::SeparatorInsensitive,
        MatchTier::CaseInsensitive,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The form of `key` compared at this tier.
    pub fn key(self, key: &str) -> String {
        match self {
            MatchTier::Exact => key.trim().to_string(),
            MatchTier::Canonical => canonical(key),
            MatchTier::SeparatorInsensitive => stripped(key),
            MatchTier::CaseInsensitive => folded(key),
        }
    }
}
