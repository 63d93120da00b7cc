//! Lexicon store for the address engine.
//!
//! `LexiconTables` is the raw, serializable configuration supplied by the
//! surrounding application (or the embedded Ho Chi Minh City data). `Lexicon`
//! wraps the tables together with strict-keyed indices that are built once,
//! on first lookup or on an explicit `warm()`, and are read-only afterwards.
//!
//! Public API:
//! - `LexiconTables` - the six lookup tables plus the default router
//! - `Lexicon` - lookups over the normalized indices
//! - `Lexicon::builtin()` - process-wide lexicon built from `data/lexicon.toml`

use ahash::AHashMap;
use anyhow::{bail, Context, Result};
use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::normalize::{strip_diacritics, StrictKey};

const BUILTIN_LEXICON: &str = include_str!("../data/lexicon.toml");

static BUILTIN: Lazy<Arc<Lexicon>> = Lazy::new(|| {
    Arc::new(Lexicon::from_toml_str(BUILTIN_LEXICON).expect("embedded lexicon.toml is valid"))
});

/// Static lookup tables, keyed by free-form spellings.
///
/// Fee values are in thousands of currency units.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LexiconTables {
    /// Canonical spelling or number -> canonical district id.
    pub district_names: BTreeMap<String, String>,
    /// Informal abbreviation -> canonical district id.
    pub district_aliases: BTreeMap<String, String>,
    /// Ward name -> canonical district id.
    pub ward_to_district: BTreeMap<String, String>,
    /// Explicit ward spelling -> canonical ward label.
    #[serde(default)]
    pub ward_names: BTreeMap<String, String>,
    pub ship_fee_by_ward: BTreeMap<String, f64>,
    pub ship_fee_by_district: BTreeMap<String, f64>,
    /// Ward or district -> assigned person.
    pub area_to_router: BTreeMap<String, String>,
    pub default_router: String,
}

impl LexiconTables {
    /// Parse tables from TOML and validate them.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let tables: LexiconTables = toml::from_str(content).context("parse lexicon tables")?;
        tables.validate()?;
        Ok(tables)
    }

    /// Reject tables the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.district_names.is_empty() {
            bail!("lexicon has no district_names entries");
        }
        if self.default_router.trim().is_empty() {
            bail!("lexicon default_router is blank");
        }
        Ok(())
    }

    /// Spellings that normalize to the same strict key but map to different
    /// values. Names and aliases are checked together since they share an
    /// index.
    pub fn strict_collisions(&self) -> Vec<(StrictKey, Vec<String>)> {
        let mut groups: BTreeMap<StrictKey, Vec<(String, String)>> = BTreeMap::new();
        for (k, v) in self.district_names.iter().chain(self.district_aliases.iter()) {
            groups
                .entry(StrictKey::new(k))
                .or_default()
                .push((k.clone(), v.clone()));
        }
        for (k, v) in &self.ward_to_district {
            groups
                .entry(StrictKey::new(k))
                .or_default()
                .push((format!("ward:{}", k), v.clone()));
        }

        groups
            .into_iter()
            .filter(|(_, entries)| {
                let plain: Vec<&(String, String)> =
                    entries.iter().filter(|(k, _)| !k.starts_with("ward:")).collect();
                let wards: Vec<&(String, String)> =
                    entries.iter().filter(|(k, _)| k.starts_with("ward:")).collect();
                conflicting(&plain) || conflicting(&wards)
            })
            .map(|(key, entries)| (key, entries.into_iter().map(|(k, _)| k).collect()))
            .collect()
    }
}

fn conflicting(entries: &[&(String, String)]) -> bool {
    entries.windows(2).any(|w| w[0].1 != w[1].1)
}

/// Strict-keyed views of the tables.
#[derive(Debug, Default)]
struct LexiconIndex {
    districts: AHashMap<StrictKey, String>,
    wards: AHashMap<StrictKey, String>,
    ward_labels: Vec<(StrictKey, String)>,
    fee_by_ward: AHashMap<StrictKey, f64>,
    fee_by_district: AHashMap<StrictKey, f64>,
    routers: AHashMap<StrictKey, String>,
    multiword_districts: Vec<String>,
}

impl LexiconIndex {
    fn build(tables: &LexiconTables) -> Self {
        let mut districts = AHashMap::new();
        // names before aliases; first writer wins
        for (k, v) in tables.district_names.iter().chain(tables.district_aliases.iter()) {
            insert_first(&mut districts, k, v.clone());
        }

        let mut wards = AHashMap::new();
        for (k, v) in &tables.ward_to_district {
            insert_first(&mut wards, k, v.clone());
        }

        let ward_labels = tables
            .ward_names
            .iter()
            .map(|(k, v)| (StrictKey::new(k), v.clone()))
            .filter(|(k, _)| !k.is_empty())
            .collect();

        let mut fee_by_ward = AHashMap::new();
        for (k, v) in &tables.ship_fee_by_ward {
            insert_first(&mut fee_by_ward, k, *v);
        }
        let mut fee_by_district = AHashMap::new();
        for (k, v) in &tables.ship_fee_by_district {
            insert_first(&mut fee_by_district, k, *v);
        }
        let mut routers = AHashMap::new();
        for (k, v) in &tables.area_to_router {
            insert_first(&mut routers, k, v.clone());
        }

        let index = Self {
            districts,
            wards,
            ward_labels,
            fee_by_ward,
            fee_by_district,
            routers,
            multiword_districts: multiword_names(tables),
        };
        tracing::info!(
            districts = index.districts.len(),
            wards = index.wards.len(),
            ward_labels = index.ward_labels.len(),
            fees = index.fee_by_ward.len() + index.fee_by_district.len(),
            routers = index.routers.len(),
            "lexicon indices built"
        );
        index
    }
}

fn insert_first<V>(map: &mut AHashMap<StrictKey, V>, raw: &str, value: V) {
    let key = StrictKey::new(raw);
    if key.is_empty() {
        return;
    }
    if map.contains_key(&key) {
        tracing::debug!(key = %key, raw, "duplicate strict key ignored");
        return;
    }
    map.insert(key, value);
}

/// Multi-word district spellings: diacritic forms first, then their ASCII
/// forms, each list longest first.
fn multiword_names(tables: &LexiconTables) -> Vec<String> {
    let mut accented: Vec<String> = tables
        .district_names
        .keys()
        .map(|k| k.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|k| k.contains(' '))
        .collect();
    accented.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));

    let mut ascii: Vec<String> = accented
        .iter()
        .map(|k| strip_diacritics(k))
        .filter(|k| !accented.contains(k))
        .collect();
    ascii.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    ascii.dedup();

    accented.extend(ascii);
    accented
}

/// Tables plus their lazily built strict-key indices.
#[derive(Debug)]
pub struct Lexicon {
    tables: LexiconTables,
    index: OnceCell<LexiconIndex>,
}

impl Lexicon {
    pub fn new(tables: LexiconTables) -> Self {
        Self {
            tables,
            index: OnceCell::new(),
        }
    }

    /// Load and validate tables from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(Self::new(LexiconTables::from_toml_str(content)?))
    }

    /// Load and validate tables from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read lexicon {}", path.display()))?;
        let tables = LexiconTables::from_toml_str(&content)
            .with_context(|| format!("load lexicon {}", path.display()))?;
        Ok(Self::new(tables))
    }

    /// The embedded Ho Chi Minh City lexicon, shared for the process lifetime.
    pub fn builtin() -> Arc<Lexicon> {
        Arc::clone(&BUILTIN)
    }

    pub fn tables(&self) -> &LexiconTables {
        &self.tables
    }

    /// Build the indices now instead of on first lookup.
    pub fn warm(&self) {
        self.index();
    }

    fn index(&self) -> &LexiconIndex {
        self.index.get_or_init(|| LexiconIndex::build(&self.tables))
    }

    /// District id for a district name or alias key.
    pub fn resolve_district_key(&self, key: &StrictKey) -> Option<&str> {
        self.index().districts.get(key).map(String::as_str)
    }

    /// District id for a ward name key.
    pub fn resolve_ward_key(&self, key: &StrictKey) -> Option<&str> {
        self.index().wards.get(key).map(String::as_str)
    }

    /// Canonical label from the explicit ward-name table, matched exactly or
    /// as a substring of `segment`.
    pub fn ward_label(&self, segment: &StrictKey) -> Option<&str> {
        let labels = &self.index().ward_labels;
        labels
            .iter()
            .find(|(k, _)| k == segment)
            .or_else(|| labels.iter().find(|(k, _)| segment.contains(k)))
            .map(|(_, label)| label.as_str())
    }

    pub fn ship_fee_for_ward(&self, key: &StrictKey) -> Option<f64> {
        self.index().fee_by_ward.get(key).copied()
    }

    pub fn ship_fee_for_district(&self, key: &StrictKey) -> Option<f64> {
        self.index().fee_by_district.get(key).copied()
    }

    /// Assigned person for a ward or district key.
    pub fn router_for(&self, key: &StrictKey) -> Option<&str> {
        self.index().routers.get(key).map(String::as_str)
    }

    pub fn default_router(&self) -> &str {
        &self.tables.default_router
    }

    /// Known multi-word district spellings, diacritic forms first.
    pub fn multiword_district_names(&self) -> &[String] {
        &self.index().multiword_districts
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new(BUILTIN.tables.clone())
    }
}
