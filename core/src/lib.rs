//! vnaddr-core
//!
//! Normalization, lexicon tables and configuration shared by the `vnaddr`
//! address engine.
//!
//! Public API:
//! - `StrictKey` / `DisplayKey` - the two normalization strengths
//! - `Lexicon` / `LexiconTables` - district, ward, fee and routing tables
//! - `Config` - engine configuration

pub mod config;
pub use config::Config;

pub mod lexicon;
pub use lexicon::{Lexicon, LexiconTables};

pub mod normalize;
pub use normalize::{normalize_display, normalize_key, strip_diacritics, DisplayKey, StrictKey};
