//! Address parser facade.
//!
//! Ties the segmenter, the district and ward resolvers and the house/street
//! extractor together behind a single `parse(text) -> ParsedAddress` call,
//! then scores the result and converts every field to display form.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::Serialize;
use vnaddr_core::{Config, DisplayKey, Lexicon};

use crate::segmenter::Segmenter;
use crate::{district, street, ward};

static DEFAULT_PARSER: Lazy<AddressParser> = Lazy::new(AddressParser::builtin);

/// Structured result of one parse. Fields are display-normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedAddress {
    pub house_id: String,
    pub street_name: String,
    pub ward: String,
    /// Canonical district id: `"1"`..`"12"` or an ASCII name like `"binh thanh"`.
    pub district: String,
    /// Additive score in `[0, 1]`.
    pub confidence: f64,
}

impl ParsedAddress {
    /// True if no field was resolved.
    pub fn is_empty(&self) -> bool {
        self.house_id.is_empty()
            && self.street_name.is_empty()
            && self.ward.is_empty()
            && self.district.is_empty()
    }
}

impl fmt::Display for ParsedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format(self))
    }
}

/// Non-empty fields joined with `", "` in house, street, ward, district order.
pub fn format(parsed: &ParsedAddress) -> String {
    [
        &parsed.house_id,
        &parsed.street_name,
        &parsed.ward,
        &parsed.district,
    ]
    .iter()
    .filter(|s| !s.is_empty())
    .map(|s| s.as_str())
    .collect::<Vec<_>>()
    .join(", ")
}

/// Parse with the built-in lexicon and default configuration.
pub fn parse(address: &str) -> ParsedAddress {
    DEFAULT_PARSER.parse(address)
}

/// Rule-based resolver for free-form address text.
///
/// Holds no per-call state; one parser can be shared across threads.
#[derive(Debug)]
pub struct AddressParser {
    lexicon: Arc<Lexicon>,
    segmenter: Segmenter,
    config: Config,
}

impl AddressParser {
    /// Build a parser. The lexicon indices are built here so that the first
    /// `parse` does not pay for them.
    pub fn new(lexicon: Arc<Lexicon>, config: Config) -> Self {
        lexicon.warm();
        let segmenter = Segmenter::new(&lexicon);
        Self {
            lexicon,
            segmenter,
            config,
        }
    }

    /// Parser over the embedded Ho Chi Minh City lexicon.
    pub fn builtin() -> Self {
        Self::new(Lexicon::builtin(), Config::default())
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve one address. Never fails; unresolved fields are left empty.
    pub fn parse(&self, address: &str) -> ParsedAddress {
        let address = truncate_chars(address.trim(), self.config.max_input_chars);
        if address.is_empty() {
            return ParsedAddress::default();
        }

        let mut segments = self.segmenter.segment(address);
        if self.config.drop_locality_segments {
            segments.retain(|s| !self.config.is_locality_marker(s));
        }

        let district = district::resolve(&mut segments, &self.lexicon).unwrap_or_default();
        let ward = ward::resolve(&mut segments, &self.lexicon).unwrap_or_default();
        let street::HouseStreet {
            house_id,
            street_name,
        } = street::extract(&segments);

        let district = if district.is_empty() && !ward.is_empty() {
            self.district_from_ward(&ward).unwrap_or_default()
        } else {
            district
        };

        let mut parsed = ParsedAddress {
            house_id: display(&house_id),
            street_name: display(&street_name),
            ward: display(&ward),
            district: display(&district),
            confidence: 0.0,
        };
        parsed.confidence = score(&parsed);
        tracing::debug!(input = address, result = %parsed, confidence = parsed.confidence, "parsed");
        parsed
    }

    /// Parse every line, keeping order.
    pub fn parse_batch<S: AsRef<str>>(&self, addresses: &[S]) -> Vec<ParsedAddress> {
        addresses.iter().map(|a| self.parse(a.as_ref())).collect()
    }

    fn district_from_ward(&self, ward: &str) -> Option<String> {
        let id = ward::ward_keys(ward)
            .iter()
            .find_map(|k| self.lexicon.resolve_ward_key(k))
            .map(str::to_string);
        if let Some(id) = &id {
            tracing::trace!(ward, district = %id, "district filled from ward");
        }
        id
    }
}

impl Default for AddressParser {
    fn default() -> Self {
        Self::builtin()
    }
}

/// 0.3 each for district and ward, 0.2 each for house and street, capped at 1.
fn score(parsed: &ParsedAddress) -> f64 {
    let tenths = [
        (!parsed.district.is_empty(), 3),
        (!parsed.ward.is_empty(), 3),
        (!parsed.house_id.is_empty(), 2),
        (!parsed.street_name.is_empty(), 2),
    ]
    .iter()
    .filter(|(found, _)| *found)
    .map(|(_, w)| w)
    .sum::<u32>();
    f64::from(tenths.min(10)) / 10.0
}

fn display(field: &str) -> String {
    DisplayKey::new(field).into_string()
}

/// At most `max` chars of `s`; `0` means no limit.
fn truncate_chars(s: &str, max: usize) -> &str {
    if max == 0 {
        return s;
    }
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
