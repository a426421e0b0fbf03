//! The header core.
//!
//! Turns license templates into matching patterns, classifies extracted
//! headers against the acceptable and known-bad variant sets, checks the
//! copyright year against the last-changed authority, and rewrites
//! non-conforming headers into the canonical form.

mod classify;
mod registry;
mod repair;
mod template;
mod year;

pub use classify::{Classification, classify};
pub use registry::{KnownBad, Variant, VariantRegistry};
pub use repair::{RepairEngine, RepairType, copyright_lines};
pub use year::{
    COPYRIGHT_PATTERN, add_copyright_date, extract_year, is_current, last_year, this_year,
};
