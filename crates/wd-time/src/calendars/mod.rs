//! Built-in jurisdiction datasets.

use wd_core::errors::Result;

use crate::dataset::CalendarDataset;

/// Mainland China (国务院 holiday arrangements).
pub mod china;

/// Return the built-in dataset for `jurisdiction`, if one ships with the
/// crate.
pub fn builtin(jurisdiction: &str) -> Option<Result<CalendarDataset>> {
    match jurisdiction.to_ascii_uppercase().as_str() {
        china::JURISDICTION => Some(china::china()),
        _ => None,
    }
}
