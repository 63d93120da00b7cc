//! vnaddr crate root
//!
//! Rule-based resolution of noisy Vietnamese address text into house id,
//! street, ward and district, plus tiered ship-fee and router lookups driven
//! by the result. Normalization and lexicon tables live in `vnaddr-core`.
//!
//! Public API exported here:
//! - `AddressParser`, `ParsedAddress`, `parse` and `format` from `parser`
//! - `Segmenter` from `segmenter`
//! - `Dispatcher`, `Dispatch` and `Tier` from `routing`

pub mod district;
pub mod parser;
pub mod routing;
pub mod segmenter;
pub mod street;
pub mod ward;
mod words;

// Re-export the shared core types so callers need only this crate.
pub use vnaddr_core::{Config, DisplayKey, Lexicon, LexiconTables, StrictKey};

pub use parser::{format, parse, AddressParser, ParsedAddress};
pub use routing::{get_router, get_ship_fee, Dispatch, Dispatcher, Tier};
pub use segmenter::Segmenter;
