//! House number and street name extraction.
//!
//! Works on whatever segments are left after the district and ward are
//! consumed. Patterns are tried from the most to the least specific.

use once_cell::sync::Lazy;
use regex::Regex;

/// House number shape: `12`, `12A`, `45/2`, `45/2B-3`.
const HOUSE_NUMBER: &str = r"\d+\p{L}?(?:[/\-]\d+\p{L}?)*";

static STREET_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(?:đường|quốc\s+lộ|quoc\s+lo|tỉnh\s+lộ|tinh\s+lo|hẻm|hem|ngách|ngach|ngõ)\s+|[dđ]\.\s*|(?:ql|tl)\.?\s*)(\S.*)$",
    )
    .expect("valid regex")
});

static BARE_HOUSE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d/\-]+$").expect("valid regex"));

static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\p{L}?\s+(.+)$").expect("valid regex"));

static LEADING_NUMBER_D: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\d+\s*đ\.\s*").expect("valid regex"));

static NUMBER_DUONG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^({HOUSE_NUMBER})\s+đường\s+(.+?)(?:\s+(?:khu|lô|kdc)\b.*)?$"
    ))
    .expect("valid regex")
});

static NUMBER_D_DOT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)^({HOUSE_NUMBER})\s*đ\.\s*(.+)$")).expect("valid regex")
});

static ENDS_IN_DIGIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*\d\S*)\s+(\D+)$").expect("valid regex"));

static NUMBER_REST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s+(.+)$").expect("valid regex"));

static LANDMARK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:cổng|lô|tầng|block|căn|phòng|kiosk)\b").expect("valid regex")
});

/// House/building identifier and street name, both possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HouseStreet {
    pub house_id: String,
    pub street_name: String,
}

impl HouseStreet {
    fn new(house_id: &str, street_name: &str) -> Self {
        Self {
            house_id: clean(house_id),
            street_name: clean(street_name),
        }
    }
}

/// Split the remaining segments into a house id and a street name.
pub fn extract(segments: &[String]) -> HouseStreet {
    let found = keyword_segment(segments)
        .or_else(|| bare_number_first(segments))
        .or_else(|| {
            let remaining = segments.join(", ");
            numbered_street(&remaining)
                .or_else(|| landmark(&remaining))
                .or_else(|| (!remaining.trim().is_empty()).then(|| HouseStreet::new("", &remaining)))
        })
        .unwrap_or_default();
    tracing::trace!(?segments, house = %found.house_id, street = %found.street_name, "house/street");
    found
}

/// A later segment opening with a street keyword (`Đường`, `Hẻm`, `QL`...):
/// it is the street, everything before it the house.
fn keyword_segment(segments: &[String]) -> Option<HouseStreet> {
    if segments.len() < 2 {
        return None;
    }
    segments.iter().enumerate().skip(1).find_map(|(i, seg)| {
        let name = STREET_KEYWORD.captures(seg.trim())?.get(1)?.as_str();
        Some(HouseStreet::new(&segments[..i].join(", "), name))
    })
}

/// `12, 34 Lê Lợi` or `12, Lê Lợi`: the first segment is the house number and
/// the street comes from the second.
fn bare_number_first(segments: &[String]) -> Option<HouseStreet> {
    if segments.len() < 2 || !BARE_HOUSE_NUMBER.is_match(segments[0].trim()) {
        return None;
    }
    let second = segments[1].trim();
    let street = match LEADING_NUMBER.captures(second).and_then(|c| c.get(1)) {
        Some(rest) => rest.as_str(),
        None => match LEADING_NUMBER_D.find(second) {
            Some(m) => &second[m.end()..],
            None => second,
        },
    };
    Some(HouseStreet::new(&segments[0], street))
}

fn numbered_street(text: &str) -> Option<HouseStreet> {
    let text = text.trim();
    [&*NUMBER_DUONG, &*NUMBER_D_DOT, &*ENDS_IN_DIGIT, &*NUMBER_REST]
        .iter()
        .find_map(|re| {
            let caps = re.captures(text)?;
            Some(HouseStreet::new(caps.get(1)?.as_str(), caps.get(2)?.as_str()))
        })
}

/// `Cổng 3`, `Lô B2`, `Tầng 5`: a building reference with no street.
fn landmark(text: &str) -> Option<HouseStreet> {
    let text = text.trim();
    LANDMARK.is_match(text).then(|| HouseStreet::new(text, ""))
}

/// Collapse whitespace and drop trailing punctuation.
fn clean(s: &str) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | ';' | ':' | '-'))
        .to_string()
}
