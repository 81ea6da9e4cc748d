//! Transformation module.
//!
//! This module handles 給与R4 → Mykomon conversion:
//! - Mapping: fixed destination layout and direct copies
//! - Lookup: categorical value translations
//! - Rules: per-field conversions (dates, address, title, counts)
//! - Executor: source table → destination table
//! - Pipeline: decode, convert and export in one call

pub mod executor;
pub mod lookup;
pub mod mapping;
pub mod pipeline;
pub mod rules;

pub use executor::{
    missing_columns, read_record, resolve_columns, transform_record, transform_table,
    SourceColumns, TransformOutput,
};
pub use lookup::{lookups_description, Lookup};
pub use mapping::{mapping_description, SourceField, DESTINATION_COLUMNS};
pub use pipeline::*;
