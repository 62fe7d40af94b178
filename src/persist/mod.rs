//! Persistence for leaf statistics.
//!
//! Two formats are supported:
//!
//! - **Text records** ([`LeafStats::write_text`] / [`LeafStats::read_text`]):
//!   one whitespace-separated line per leaf, embedded in a larger model file.
//! - **JSON** ([`LeafStats::write_json`] / [`LeafStats::read_json`]) through
//!   the schema types in this module.

mod convert;
mod schema;
mod text;

pub use schema::{LeafStatsSchema, LeafTableSchema};
pub use text::{read_text_records, write_text_records};
