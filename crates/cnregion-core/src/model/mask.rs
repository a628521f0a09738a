// crates/cnregion-core/src/model/mask.rs
use crate::error::{RegionError, Result};
use crate::years::Year;
use std::fmt;

/// Bitset over positions in a database's version list.
///
/// Bit `i` stands for `versions[i]`, not for a year value, so a mask is
/// only meaningful next to the version list it was built against.
/// Positions are capped at [`YearMask::MAX_VERSIONS`] so that the
/// encoded integer always fits a signed 64-bit reader.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct YearMask(u64);

impl YearMask {
    pub const MAX_VERSIONS: usize = 63;

    pub const fn empty() -> Self {
        YearMask(0)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Wraps raw bits read from a file whose version list has `len` entries.
    pub fn from_bits(bits: u64, len: usize) -> Option<Self> {
        let allowed = Self::all(len)?.0;
        (bits & !allowed == 0).then_some(YearMask(bits))
    }

    /// Mask with the first `len` positions set.
    pub fn all(len: usize) -> Option<Self> {
        match len {
            0 => Some(YearMask(0)),
            n if n <= Self::MAX_VERSIONS => Some(YearMask(u64::MAX >> (64 - n))),
            _ => None,
        }
    }

    pub fn insert(&mut self, index: usize) -> Result<()> {
        if index >= Self::MAX_VERSIONS {
            return Err(RegionError::TooManyVersions {
                max: Self::MAX_VERSIONS,
            });
        }
        self.0 |= 1 << index;
        Ok(())
    }

    pub const fn contains(self, index: usize) -> bool {
        index < Self::MAX_VERSIONS && self.0 & (1 << index) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Positions set in the mask, lowest first.
    pub fn indices(self) -> impl Iterator<Item = usize> {
        (0..Self::MAX_VERSIONS).filter(move |i| self.contains(*i))
    }

    /// Builds the mask of `years` against `versions`.
    pub fn encode(years: &[Year], versions: &[Year]) -> Result<Self> {
        let mut mask = YearMask::empty();
        for year in years {
            let index = versions
                .iter()
                .position(|v| v == year)
                .ok_or(RegionError::UnknownVersion(*year))?;
            mask.insert(index)?;
        }
        Ok(mask)
    }

    /// Years of `versions` selected by the mask, in version-list order.
    pub fn decode(self, versions: &[Year]) -> Vec<Year> {
        self.indices()
            .filter_map(|i| versions.get(i).copied())
            .collect()
    }
}

impl fmt::Display for YearMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
