//! Key normalization for Vietnamese address text.
//!
//! Two strengths are provided and they are deliberately distinct types:
//! - `StrictKey` - diacritics stripped, lowercased, everything outside
//!   `[a-z0-9]` removed (spaces included). Used only as a dictionary key.
//! - `DisplayKey` - diacritics stripped and lowercased, but internal spacing
//!   and punctuation are kept. Used for output fields.
//!
//! Every lexicon index is keyed by `StrictKey`, so a probe must go through the
//! same function that built the index.

use std::fmt;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Remove Vietnamese tone marks and modifier diacritics.
///
/// Canonical decomposition, drop combining marks, recompose. `đ`/`Đ` has no
/// decomposition and is mapped to `d`/`D` explicitly.
pub fn strip_diacritics(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            'đ' => 'd',
            'Đ' => 'D',
            _ => c,
        })
        .nfc()
        .collect()
}

/// Canonical composition (NFC). OCR engines and some keyboards emit
/// decomposed tone marks.
pub fn compose(s: &str) -> String {
    s.nfc().collect()
}

/// Dictionary key form: only `[a-z0-9]` survives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StrictKey(String);

impl StrictKey {
    pub fn new(s: &str) -> Self {
        let key = strip_diacritics(s)
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            .collect();
        StrictKey(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, other: &StrictKey) -> bool {
        !other.is_empty() && self.0.contains(other.as_str())
    }
}

impl fmt::Display for StrictKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&DisplayKey> for StrictKey {
    fn from(d: &DisplayKey) -> Self {
        StrictKey::new(d.as_str())
    }
}

/// Human-facing form: lowercase ASCII-folded text with punctuation kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DisplayKey(String);

impl DisplayKey {
    pub fn new(s: &str) -> Self {
        let folded = strip_diacritics(s).to_lowercase();
        DisplayKey(folded.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn to_strict(&self) -> StrictKey {
        StrictKey::from(self)
    }
}

impl fmt::Display for DisplayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shorthand for `StrictKey::new(s).as_str().to_string()`.
pub fn normalize_key(s: &str) -> String {
    StrictKey::new(s).0
}

/// Shorthand for `DisplayKey::new(s).into_string()`.
pub fn normalize_display(s: &str) -> String {
    DisplayKey::new(s).0
}
