//! Inventory collection
//!
//! Turns the raw text of a snapshot listing into [`ListingRow`]s. Parsing is
//! all-or-nothing: one unrecognized line rejects the whole listing, because a
//! silently truncated inventory would cause spurious re-transfers or skip
//! provenance checks.
//!
//! [`ListingRow`]: crate::model::ListingRow

pub mod collector;
pub mod parser;

pub use collector::collect_inventory;
pub use parser::{parse_line, parse_listing};
