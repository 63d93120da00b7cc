//! Ship-fee and router lookups for a resolved ward/district pair.
//!
//! Both lookups walk the same three tiers, stopping at the first hit:
//! 1. the ward itself in the ward-keyed table
//! 2. the ward mapped to its district, in the district-keyed table
//! 3. the supplied district in the district-keyed table
//!
//! A missing fee stays unknown (`None`). A missing router falls back to the
//! lexicon's default router.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use vnaddr_core::{Lexicon, StrictKey};

use crate::parser::ParsedAddress;
use crate::ward::ward_keys;

/// Which tier produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Ward,
    WardDistrict,
    District,
    Default,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tier::Ward => "ward",
            Tier::WardDistrict => "ward-district",
            Tier::District => "district",
            Tier::Default => "default",
        };
        f.write_str(s)
    }
}

/// Fee and router for one address, with the tier behind each.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dispatch {
    /// Fee in thousands; `None` when nothing is configured.
    pub fee: Option<f64>,
    pub fee_tier: Option<Tier>,
    pub router: String,
    pub router_tier: Tier,
}

/// Tiered fee/router resolver over a lexicon.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    lexicon: Arc<Lexicon>,
}

impl Dispatcher {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn builtin() -> Self {
        Self::new(Lexicon::builtin())
    }

    /// Shipping fee, or `None` if no tier has one.
    pub fn ship_fee(&self, ward: &str, district: &str) -> Option<f64> {
        self.fee_with_tier(ward, district).map(|(fee, _)| fee)
    }

    /// Responsible person; the default router if no tier has one.
    pub fn router(&self, ward: &str, district: &str) -> String {
        self.router_with_tier(ward, district).0
    }

    /// Both lookups at once.
    pub fn resolve(&self, ward: &str, district: &str) -> Dispatch {
        let fee = self.fee_with_tier(ward, district);
        let (router, router_tier) = self.router_with_tier(ward, district);
        Dispatch {
            fee: fee.map(|(f, _)| f),
            fee_tier: fee.map(|(_, t)| t),
            router,
            router_tier,
        }
    }

    /// Lookups for a parsed address.
    pub fn dispatch(&self, parsed: &ParsedAddress) -> Dispatch {
        self.resolve(&parsed.ward, &parsed.district)
    }

    fn fee_with_tier(&self, ward: &str, district: &str) -> Option<(f64, Tier)> {
        let found = self.tiered(
            ward,
            district,
            |k| self.lexicon.ship_fee_for_ward(k),
            |k| self.lexicon.ship_fee_for_district(k),
        );
        tracing::debug!(ward, district, ?found, "ship fee");
        found
    }

    fn router_with_tier(&self, ward: &str, district: &str) -> (String, Tier) {
        let lx = &self.lexicon;
        let found = self
            .tiered(ward, district, |k| lx.router_for(k), |k| lx.router_for(k))
            .map(|(r, tier)| (r.to_string(), tier))
            .unwrap_or_else(|| (lx.default_router().to_string(), Tier::Default));
        tracing::debug!(ward, district, router = %found.0, tier = %found.1, "router");
        found
    }

    /// Ward exact, then ward -> district, then district exact.
    fn tiered<T, W, D>(
        &self,
        ward: &str,
        district: &str,
        by_ward: W,
        by_district: D,
    ) -> Option<(T, Tier)>
    where
        W: Fn(&StrictKey) -> Option<T>,
        D: Fn(&StrictKey) -> Option<T>,
    {
        let keys = ward_keys(ward);
        if let Some(v) = keys.iter().find_map(&by_ward) {
            return Some((v, Tier::Ward));
        }
        let mapped = keys
            .iter()
            .find_map(|k| self.lexicon.resolve_ward_key(k))
            .map(StrictKey::new);
        if let Some(v) = mapped.as_ref().and_then(&by_district) {
            return Some((v, Tier::WardDistrict));
        }
        let key = StrictKey::new(district);
        if key.is_empty() {
            return None;
        }
        by_district(&key).map(|v| (v, Tier::District))
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Fee lookup against the built-in lexicon.
pub fn get_ship_fee(ward: &str, district: &str) -> Option<f64> {
    Dispatcher::builtin().ship_fee(ward, district)
}

/// Router lookup against the built-in lexicon.
pub fn get_router(ward: &str, district: &str) -> String {
    Dispatcher::builtin().router(ward, district)
}
