// crates/cnregion-core/src/years.rs

//! Catalogue of the data years published by the statistics bureau.
//!
//! The bureau republishes the whole hierarchy once a year, and the
//! four-digit year doubles as the data version.

use crate::error::{RegionError, Result};

/// A data version: the four-digit publication year.
pub type Year = u16;

/// First year with published data.
pub const START: Year = 2009;

/// Latest published year. Bump after each data refresh.
pub const LATEST: Year = 2023;

/// Whether `year` lies within [`START`, `LATEST`].
pub fn is_valid(year: Year) -> bool {
    (START..=LATEST).contains(&year)
}

/// Every published year, newest first.
pub fn all() -> Vec<Year> {
    (START..=LATEST).rev().collect()
}

/// Years from `begin` up to [`LATEST`], newest first.
pub fn begin_with(begin: Year) -> Result<Vec<Year>> {
    range(begin, LATEST)
}

/// Years within `[begin, end]`, newest first.
pub fn range(begin: Year, end: Year) -> Result<Vec<Year>> {
    for year in [begin, end] {
        if !is_valid(year) {
            return Err(invalid(year));
        }
    }
    if begin > end {
        return Err(invalid(begin));
    }

    Ok((begin..=end).rev().collect())
}

fn invalid(year: Year) -> RegionError {
    RegionError::InvalidYear {
        year,
        start: START,
        latest: LATEST,
    }
}
