//! Ward resolution.
//!
//! Runs after the district resolver on whatever segments are left, scanning
//! from the last toward the first. A segment that starts with a digit is
//! house/street text and is never taken as a ward.

use once_cell::sync::Lazy;
use regex::Regex;
use vnaddr_core::{normalize::compose, DisplayKey, Lexicon, StrictKey};

use crate::words::{scan_windows, starts_with_digit};

static NUMBERED_WARD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^\p{L}\p{N}])(?:phường|phuong|p|f)\.?\s*([0-9]{1,2})(?:[^0-9]|$)")
        .expect("valid regex")
});

/// Display-form prefixes that mark a segment as a ward.
const WARD_PREFIXES: &[&str] = &["phuong", "p.", "f."];

/// Commune-level words, matched on lowercased composed text. Without the
/// tone mark `xa` is also the start of street names such as `Xa lộ Hà Nội`.
const COMMUNE_PREFIXES: &[&str] = &["xã", "thị trấn"];

/// Every ward word in display form, stripped when building lookup keys.
const KEY_PREFIXES: &[&str] = &["phuong", "thi tran", "xa", "p.", "f."];

type Rule = fn(&str, &Lexicon) -> Option<String>;

const RULES: &[(&str, Rule)] = &[
    ("ward_label", labelled),
    ("numbered", numbered),
    ("ward_prefix", prefixed),
    ("ward_index", indexed),
];

/// Resolve the ward and remove its segment.
pub fn resolve(segments: &mut Vec<String>, lexicon: &Lexicon) -> Option<String> {
    for i in (0..segments.len()).rev() {
        if starts_with_digit(&segments[i]) {
            continue;
        }
        if let Some(ward) = match_segment(&segments[i], lexicon) {
            segments.remove(i);
            return Some(ward);
        }
    }
    None
}

/// Run the rule list over one segment.
pub fn match_segment(segment: &str, lexicon: &Lexicon) -> Option<String> {
    RULES.iter().find_map(|(name, rule)| {
        let ward = rule(segment, lexicon)?;
        tracing::debug!(rule = name, segment, ward = %ward, "ward matched");
        Some(ward)
    })
}

/// The remainder after a leading ward word (`phuong`, `p.`, `xa`, ...) in a
/// display-form string, if there is one.
pub fn strip_ward_prefix(display: &str) -> Option<&str> {
    strip_prefix_word(display, KEY_PREFIXES)
}

/// True if the segment opens with a ward word. `Xã` and `Thị trấn` count only
/// with their diacritics.
pub fn has_ward_prefix(segment: &str) -> bool {
    if strip_prefix_word(DisplayKey::new(segment).as_str(), WARD_PREFIXES).is_some() {
        return true;
    }
    let lowered = compose(segment).to_lowercase();
    let lowered = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    strip_prefix_word(&lowered, COMMUNE_PREFIXES).is_some()
}

fn strip_prefix_word<'a>(text: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes
        .iter()
        .find_map(|prefix| {
            let rest = text.strip_prefix(prefix)?;
            let boundary = prefix.ends_with('.')
                || rest
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_digit() || !c.is_alphanumeric());
            boundary.then(|| rest.trim_start_matches(|c: char| c == '.' || c.is_whitespace()))
        })
        .filter(|rest| !rest.is_empty())
}

/// Strict keys to probe ward-keyed tables with: the full ward, then the ward
/// with its leading ward word removed.
pub fn ward_keys(ward: &str) -> Vec<StrictKey> {
    let display = DisplayKey::new(ward);
    let mut keys = vec![display.to_strict()];
    if let Some(rest) = strip_ward_prefix(display.as_str()) {
        keys.push(StrictKey::new(rest));
    }
    keys.retain(|k| !k.is_empty());
    keys.dedup();
    keys
}

fn labelled(segment: &str, lexicon: &Lexicon) -> Option<String> {
    lexicon
        .ward_label(&StrictKey::new(segment))
        .map(str::to_string)
}

/// `Phường 5`, `P.12`, `F22` anywhere in the segment.
fn numbered(segment: &str, _lexicon: &Lexicon) -> Option<String> {
    let digits = NUMBERED_WARD.captures(segment)?.get(1)?.as_str();
    let n = digits.parse::<u32>().ok()?;
    Some(format!("Phường {}", n))
}

fn prefixed(segment: &str, _lexicon: &Lexicon) -> Option<String> {
    has_ward_prefix(segment).then(|| segment.trim().to_string())
}

/// A known ward name, as the whole segment or a two/three word window.
fn indexed(segment: &str, lexicon: &Lexicon) -> Option<String> {
    if lexicon.resolve_ward_key(&StrictKey::new(segment)).is_some() {
        return Some(segment.trim().to_string());
    }
    scan_windows(segment, &[2, 3], |w| lexicon.resolve_ward_key(&StrictKey::new(w)))
        .map(|(_, start, end)| segment[start..end].to_string())
}
