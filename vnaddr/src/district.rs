//! District resolution.
//!
//! Segments are scanned from the last toward the first, since Vietnamese
//! addresses end with the broadest unit. Each segment goes through an ordered
//! list of rules; the first rule that hits wins and the scan stops.

use once_cell::sync::Lazy;
use regex::Regex;
use vnaddr_core::{Lexicon, StrictKey};

use crate::ward::has_ward_prefix;
use crate::words::{
    is_house_number, is_plain_word, is_short_number, scan_windows, starts_with_digit, word_spans,
};

static NUMBERED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^\p{L}\p{N}])((?:quận|quan|q)\.?\s*([0-9]{1,2}))(?:[^0-9]|$)")
        .expect("valid regex")
});

static PREFIXED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(?:quận|quan|huyện|huyen)(?:\.\s*|\s+)|q(?:\.\s*|\s+))([^0-9].*)$")
        .expect("valid regex")
});

static WORD_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:quận|quan|q)\.?(\p{L}.*)$").expect("valid regex"));

/// A district mention found inside a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictHit {
    /// Canonical district id.
    pub id: String,
    /// Byte offset in the segment where the matched text starts.
    pub start: usize,
}

impl DistrictHit {
    fn new<S: Into<String>>(id: S, start: usize) -> Self {
        Self {
            id: id.into(),
            start,
        }
    }
}

type Rule = fn(&str, &Lexicon) -> Option<DistrictHit>;

const RULES: &[(&str, Rule)] = &[
    ("numbered", numbered),
    ("prefixed_name", prefixed_name),
    ("whole_segment", whole_segment),
    ("token_scan", token_scan),
    ("ward_fallback", ward_fallback),
];

/// Resolve the district and consume its text from `segments`.
///
/// A matching segment is removed, unless it starts with a digit and text
/// remains in front of the match: then only the match and everything after it
/// is cut, and the leading house/street text stays.
pub fn resolve(segments: &mut Vec<String>, lexicon: &Lexicon) -> Option<String> {
    for i in (0..segments.len()).rev() {
        let Some(hit) = match_segment(&segments[i], lexicon) else {
            continue;
        };
        match leftover(&segments[i], hit.start) {
            Some(rest) => segments[i] = rest,
            None => {
                segments.remove(i);
            }
        }
        return Some(hit.id);
    }
    None
}

/// Run the rule list over one segment.
pub fn match_segment(segment: &str, lexicon: &Lexicon) -> Option<DistrictHit> {
    RULES.iter().find_map(|(name, rule)| {
        let hit = rule(segment, lexicon)?;
        tracing::debug!(rule = name, segment, district = %hit.id, "district matched");
        Some(hit)
    })
}

/// Text kept from a digit-prefixed segment once the district mention at
/// `start` and everything after it is cut.
pub fn leftover(segment: &str, start: usize) -> Option<String> {
    if !starts_with_digit(segment) {
        return None;
    }
    let rest = segment[..start]
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '.' | ':' | '('));
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

fn district_for(lexicon: &Lexicon, text: &str) -> Option<String> {
    let key = StrictKey::new(text);
    if key.is_empty() {
        return None;
    }
    lexicon.resolve_district_key(&key).map(str::to_string)
}

/// `Quận 3`, `Q.10`, `q 1` anywhere in the segment.
fn numbered(segment: &str, _lexicon: &Lexicon) -> Option<DistrictHit> {
    let caps = NUMBERED.captures(segment)?;
    let whole = caps.get(1)?;
    let digits = caps.get(2)?.as_str();
    let id = digits
        .parse::<u32>()
        .map(|n| n.to_string())
        .unwrap_or_else(|_| digits.to_string());
    Some(DistrictHit::new(id, whole.start()))
}

/// `Quận Bình Thạnh`, `Q.bthanh`: the name after the prefix, or its last
/// one, two or three words.
fn prefixed_name(segment: &str, lexicon: &Lexicon) -> Option<DistrictHit> {
    let caps = PREFIXED.captures(segment)?;
    let rest = caps.get(1)?.as_str();
    if let Some(id) = district_for(lexicon, rest) {
        return Some(DistrictHit::new(id, 0));
    }
    let words: Vec<&str> = rest.split_whitespace().collect();
    (1..=3)
        .filter(|&n| n <= words.len())
        .find_map(|n| district_for(lexicon, &words[words.len() - n..].join(" ")))
        .map(|id| DistrictHit::new(id, 0))
}

fn whole_segment(segment: &str, lexicon: &Lexicon) -> Option<DistrictHit> {
    district_for(lexicon, segment).map(|id| DistrictHit::new(id, 0))
}

/// Walk words backward trying the word, the word without a `q` prefix, and
/// the two- and three-word windows ending at it. A bare one or two digit
/// token or a `1/2`-style number is a house number unless it is the whole
/// segment. Single words are probed only when they are all letters or all
/// digits.
fn token_scan(segment: &str, lexicon: &Lexicon) -> Option<DistrictHit> {
    let spans = word_spans(segment);
    let alone = spans.len() == 1;
    for i in (0..spans.len()).rev() {
        let (start, end) = spans[i];
        let word = &segment[start..end];
        if !alone && (is_short_number(word) || is_house_number(word)) {
            continue;
        }
        if is_plain_word(word) {
            if let Some(id) = district_for(lexicon, word) {
                return Some(DistrictHit::new(id, start));
            }
        }
        if let Some(bare) = WORD_PREFIX.captures(word).and_then(|c| c.get(1)) {
            if let Some(id) = district_for(lexicon, bare.as_str()) {
                return Some(DistrictHit::new(id, start));
            }
        }
        for back in 1..=2 {
            if i < back {
                break;
            }
            let from = spans[i - back].0;
            if let Some(id) = district_for(lexicon, &segment[from..end]) {
                return Some(DistrictHit::new(id, from));
            }
        }
    }
    None
}

/// A ward name written without the word "phường" still pins the district.
/// Segments that do carry a ward prefix are left for the ward resolver.
fn ward_fallback(segment: &str, lexicon: &Lexicon) -> Option<DistrictHit> {
    if has_ward_prefix(segment) {
        return None;
    }
    let whole = StrictKey::new(segment);
    if let Some(id) = lexicon.resolve_ward_key(&whole) {
        return Some(DistrictHit::new(id, 0));
    }
    scan_windows(segment, &[2, 3], |w| {
        lexicon
            .resolve_ward_key(&StrictKey::new(w))
            .map(str::to_string)
    })
    .map(|(id, start, _)| DistrictHit::new(id, start))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn numbered_forms() {
        let lx = Lexicon::builtin();
        for s in ["Q.1", "q 1", "Quận 1", "quan.01", "Q1 TP.HCM"] {
            assert_eq!(match_segment(s, &lx).map(|h| h.id), Some("1".to_string()), "{s}");
        }
        assert_eq!(match_segment("Q123", &lx), None);
    }

    #[test]
    fn prefixed_names_and_aliases() {
        let lx = Lexicon::builtin();
        assert_eq!(match_segment("Q.bthanh", &lx).unwrap().id, "binh thanh");
        assert_eq!(match_segment("Quận Gò Vấp", &lx).unwrap().id, "go vap");
        assert_eq!(match_segment("Q. Khu B Thủ Đức", &lx).unwrap().id, "thu duc");
        assert_eq!(match_segment("Huyện Bình Chánh", &lx).unwrap().id, "binh chanh");
    }

    #[test]
    fn whole_segment_without_diacritics() {
        let lx = Lexicon::builtin();
        assert_eq!(match_segment("binh thanh", &lx).unwrap().id, "binh thanh");
        assert_eq!(match_segment("PHÚ NHUẬN.", &lx).unwrap().id, "phu nhuan");
    }

    #[test]
    fn token_scan_skips_house_numbers() {
        let lx = Lexicon::builtin();
        let hit = match_segment("208 Nguyễn Hữu Cảnh Gò Vấp TPHCM", &lx).unwrap();
        assert_eq!(hit.id, "go vap");
        assert_eq!(hit.start, "208 Nguyễn Hữu Cảnh ".len());
        assert_eq!(match_segment("Hẻm 5 Lê Lợi", &lx), None);
        assert_eq!(match_segment("5", &lx).unwrap().id, "5");
    }

    #[test]
    fn slashed_house_numbers_are_not_districts() {
        let lx = Lexicon::builtin();
        assert_eq!(match_segment("1/2 Lê Lợi", &lx), None);
        assert_eq!(match_segment("1-1 Lê Lợi", &lx), None);
        let hit = match_segment("1-1 Gò Vấp", &lx).unwrap();
        assert_eq!(hit.id, "go vap");
        assert_eq!(hit.start, "1-1 ".len());
    }

    #[test]
    fn fullwidth_digits_are_not_district_numbers() {
        let lx = Lexicon::builtin();
        assert_eq!(match_segment("Q１", &lx), None);
        assert_eq!(match_segment("Quận １２", &lx), None);
    }

    #[test]
    fn ward_name_yields_district() {
        let lx = Lexicon::builtin();
        assert_eq!(match_segment("Thảo Điền", &lx).unwrap().id, "thu duc");
        assert_eq!(match_segment("khu pho 3 Hiệp Bình", &lx).unwrap().id, "thu duc");
        // ward-prefixed segments are left to the ward resolver
        assert_eq!(match_segment("Phường Thảo Điền", &lx), None);
    }

    #[test]
    fn matching_segment_is_removed() {
        let lx = Lexicon::builtin();
        let mut s = segs(&["12 Lê Lợi", "Phường 5", "Quận 3"]);
        assert_eq!(resolve(&mut s, &lx), Some("3".to_string()));
        assert_eq!(s, segs(&["12 Lê Lợi", "Phường 5"]));
    }

    #[test]
    fn digit_prefixed_segment_keeps_leading_text() {
        let lx = Lexicon::builtin();
        let mut s = segs(&["208 Nguyễn Hữu Cảnh Gò Vấp TPHCM"]);
        assert_eq!(resolve(&mut s, &lx), Some("go vap".to_string()));
        assert_eq!(s, segs(&["208 Nguyễn Hữu Cảnh"]));

        // nothing in front of the match: the segment goes
        let mut s = segs(&["12 Lê Lợi", "Gò Vấp"]);
        resolve(&mut s, &lx);
        assert_eq!(s, segs(&["12 Lê Lợi"]));

        // not digit-prefixed: the whole segment goes
        let mut s = segs(&["Chung cư X Gò Vấp"]);
        resolve(&mut s, &lx);
        assert!(s.is_empty());
    }

    #[test]
    fn leftover_boundaries() {
        let s = "12 Lê Lợi - Q1";
        assert_eq!(leftover(s, s.find("Q1").unwrap()), Some("12 Lê Lợi".to_string()));
        assert_eq!(leftover("12 Q1", 3), Some("12".to_string()));
        assert_eq!(leftover("Lê Lợi Q1", 7), None);
        assert_eq!(leftover("12 Q1", 0), None);
    }

    #[test]
    fn scan_prefers_the_last_segment() {
        let lx = Lexicon::builtin();
        let mut s = segs(&["Tân Bình", "Gò Vấp"]);
        assert_eq!(resolve(&mut s, &lx), Some("go vap".to_string()));
        assert_eq!(s, segs(&["Tân Bình"]));
    }
}
