//! Static lookup data: sales abbreviations and enumerated filter values.

pub mod abbreviations;
pub mod entities;


pub use abbreviations::{ABBREVIATIONS, AbbreviationExpander, collapse_repeated_words};
pub use entities::{
    CRM_TYPES, EntityKind, EntityTables, INDUSTRIES, MARKET_SEGMENTS, USE_CASES,
};
