//! Address segmentation.
//!
//! OCR output and hand-typed addresses often drop the commas between the
//! house/street part and the administrative names. The segmenter runs a fixed
//! sequence of comma-insertion passes, then splits on commas. Each pass is a
//! pure `&str -> String` function. The order matters: the narrowest patterns
//! run first so the broader ones cannot swallow text a specific pattern
//! should have isolated.

use once_cell::sync::Lazy;
use regex::Regex;
use vnaddr_core::{normalize::compose, Lexicon};

static GLUED_WARD_DISTRICT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)P([0-9]{1,2})Q([0-9]{1,2})\b").expect("valid regex"));

static NUMBERED_WARD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)P\.?\s?[0-9]{1,2}").expect("valid regex"));

static NUMBERED_DISTRICT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Q\.?\s?[0-9]{1,2}").expect("valid regex"));

static NAMED_DISTRICT_ABBREV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Q\.|Qu[aậ]n\s)\s*[^0-9\s,.]").expect("valid regex")
});

static WARD_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:(?:Phường|Phuong)\s+\S|P\.\s*\p{L})").expect("valid regex")
});

static DISTRICT_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Quận|Quan|Huyện|Huyen)\s+\S").expect("valid regex")
});

/// An administrative keyword at the very end of the text before a district
/// name; the name is already delimited by it.
static ADMIN_WORD_TAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:^|[^\p{L}])(?:quận|quan|huyện|huyen|q|tp|thành phố|thanh pho|phường|phuong|p|xã|xa)\.?$",
    )
    .expect("valid regex")
});

/// Splits raw address text into trimmed, non-empty segments.
#[derive(Debug)]
pub struct Segmenter {
    /// One end-anchored pattern per multi-word district spelling, in the
    /// lexicon's order (diacritic forms, then ASCII forms).
    district_tails: Vec<Regex>,
}

impl Segmenter {
    pub fn new(lexicon: &Lexicon) -> Self {
        let district_tails = lexicon
            .multiword_district_names()
            .iter()
            .filter_map(|name| {
                let body = name
                    .split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+");
                let pattern = format!(r"(?i)(?:^|[^\p{{L}}])({})[\s\p{{P}}]*$", body);
                match Regex::new(&pattern) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        tracing::warn!(name = %name, error = %e, "skipping district pattern");
                        None
                    }
                }
            })
            .collect();
        Self { district_tails }
    }

    /// Run every pass in order and split the result.
    pub fn segment(&self, address: &str) -> Vec<String> {
        let text = unify_separators(&compose(address));
        let text = split_glued_ward_district(&text);
        let text = break_before_numbered_ward(&text);
        let text = break_before_numbered_district(&text);
        let text = break_before_district_abbrev_name(&text);
        let text = break_before_ward_word(&text);
        let text = break_before_district_word(&text);
        let text = self.break_before_trailing_district(&text);
        let segments = split_segments(&text);
        tracing::trace!(?segments, "segmented");
        segments
    }

    /// Pass 7: insert a comma before the first known multi-word district name
    /// that ends the text. At most one insertion.
    pub fn break_before_trailing_district(&self, text: &str) -> String {
        for re in &self.district_tails {
            let Some(name) = re.captures(text).and_then(|c| c.get(1)) else {
                continue;
            };
            let before = text[..name.start()].trim_end();
            if before.is_empty() || before.ends_with(',') || ADMIN_WORD_TAIL.is_match(before) {
                return text.to_string();
            }
            return format!("{}, {}", &text[..name.start()], &text[name.start()..]);
        }
        text.to_string()
    }
}

/// Semicolons and line breaks separate segments the same way commas do.
pub fn unify_separators(text: &str) -> String {
    text.replace([';', '\n', '\r'], ",")
}

/// Pass 1: `P3Q10` -> `, P3, Q10`.
pub fn split_glued_ward_district(text: &str) -> String {
    GLUED_WARD_DISTRICT
        .replace_all(text, ", P${1}, Q${2}")
        .into_owned()
}

/// Pass 2: break before a lone `P`/`P.` with one or two digits. A third digit
/// means the token is part of something else (a unit number) and is left.
pub fn break_before_numbered_ward(text: &str) -> String {
    insert_breaks(text, &NUMBERED_WARD, |t, start, end| {
        standalone(t, start) && !next_char(t, end).is_some_and(|c| c.is_ascii_digit())
    })
}

/// Pass 3: break before a lone `Q`/`Q.` with one or two digits.
pub fn break_before_numbered_district(text: &str) -> String {
    insert_breaks(text, &NUMBERED_DISTRICT, |t, start, _| standalone(t, start))
}

/// Pass 4: break before `Q.`/`Quận` followed by a name glued onto prior text.
pub fn break_before_district_abbrev_name(text: &str) -> String {
    insert_breaks(text, &NAMED_DISTRICT_ABBREV, |t, start, _| glued_to_prior(t, start))
}

/// Pass 5: break before `Phường <name>` (or `P.<name>`) glued onto prior text.
pub fn break_before_ward_word(text: &str) -> String {
    insert_breaks(text, &WARD_WORD, |t, start, _| {
        standalone(t, start) && glued_to_prior(t, start)
    })
}

/// Pass 6: break before `Quận <name>` glued onto prior text.
pub fn break_before_district_word(text: &str) -> String {
    insert_breaks(text, &DISTRICT_WORD, |t, start, _| {
        standalone(t, start) && glued_to_prior(t, start)
    })
}

/// Split on commas, trim, drop empties.
pub fn split_segments(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Insert `", "` before every match of `re` that `keep(text, start, end)`
/// accepts.
fn insert_breaks<F>(text: &str, re: &Regex, keep: F) -> String
where
    F: Fn(&str, usize, usize) -> bool,
{
    let mut out = String::with_capacity(text.len() + 8);
    let mut last = 0;
    for m in re.find_iter(text) {
        if !keep(text, m.start(), m.end()) {
            continue;
        }
        out.push_str(&text[last..m.start()]);
        out.push_str(", ");
        last = m.start();
    }
    out.push_str(&text[last..]);
    out
}

fn next_char(text: &str, at: usize) -> Option<char> {
    text[at..].chars().next()
}

/// The token at `at` is not the tail of a longer word or number.
fn standalone(text: &str, at: usize) -> bool {
    text[..at]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric())
}

/// Some non-separator text precedes `at`.
fn glued_to_prior(text: &str, at: usize) -> bool {
    let before = text[..at].trim_end();
    !before.is_empty() && !before.ends_with(',')
}
