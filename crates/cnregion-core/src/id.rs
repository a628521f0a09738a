// crates/cnregion-core/src/id.rs

//! # Region IDs
//!
//! A region ID is a 12 digit string made of five fixed-width segments:
//!
//! ```text
//! 33 03 05 103 233
//! |  |  |  |   `-- village (3)
//! |  |  |  `------ town    (3)
//! |  |  `--------- county  (2)
//! |  `------------ city    (2)
//! `--------------- province(2)
//! ```
//!
//! An all-zero segment means "no value at this level" and ends the
//! meaningful prefix: `330300000000` is the city `33 03`.

use crate::error::{RegionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Administrative level of a region, usable as a bitmask.
///
/// Single levels are powers of two so that several can be combined with
/// `|` into a filter. The synthetic root has [`Level::NONE`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Level(u8);

impl Level {
    pub const NONE: Level = Level(0);
    pub const VILLAGE: Level = Level(1);
    pub const TOWN: Level = Level(1 << 1);
    pub const COUNTY: Level = Level(1 << 2);
    pub const CITY: Level = Level(1 << 3);
    pub const PROVINCE: Level = Level(1 << 4);
    pub const ALL: Level = Level(0b1_1111);

    /// Levels from the top of the hierarchy down.
    pub const ORDERED: [Level; 5] = [
        Level::PROVINCE,
        Level::CITY,
        Level::COUNTY,
        Level::TOWN,
        Level::VILLAGE,
    ];

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Builds a mask, rejecting bits that name no level.
    pub fn from_bits(bits: u8) -> Result<Self> {
        if bits & !Level::ALL.0 != 0 {
            return Err(RegionError::InvalidLevel(bits));
        }
        Ok(Level(bits))
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Level) -> bool {
        self.0 & other.0 == other.0
    }

    /// Level reached after `depth` path segments (1 = province).
    pub fn from_depth(depth: usize) -> Option<Level> {
        depth
            .checked_sub(1)
            .and_then(|i| Level::ORDERED.get(i).copied())
    }

    /// Number of path segments leading to this level, 0 for the root.
    pub fn depth(self) -> Option<usize> {
        if self == Level::NONE {
            return Some(0);
        }
        Level::ORDERED
            .iter()
            .position(|l| *l == self)
            .map(|i| i + 1)
    }

    /// The level directly below this one.
    pub fn child(self) -> Option<Level> {
        match self {
            Level::NONE => Some(Level::PROVINCE),
            Level::VILLAGE => None,
            l if l.depth().is_some() => Some(Level(l.0 >> 1)),
            _ => None,
        }
    }

    /// Significant ID width at this level (0 for the root).
    pub fn width(self) -> Option<usize> {
        match self {
            Level::NONE => Some(0),
            Level::PROVINCE => Some(2),
            Level::CITY => Some(4),
            Level::COUNTY => Some(6),
            Level::TOWN => Some(9),
            Level::VILLAGE => Some(ID_LEN),
            _ => None,
        }
    }

    /// Width of this level's own segment.
    pub fn segment_width(self) -> Option<usize> {
        let depth = self.depth()?;
        depth.checked_sub(1).map(|i| SEGMENT_WIDTHS[i])
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::NONE => "root",
            Level::PROVINCE => "province",
            Level::CITY => "city",
            Level::COUNTY => "county",
            Level::TOWN => "town",
            Level::VILLAGE => "village",
            _ => "mixed",
        }
    }
}

impl BitOr for Level {
    type Output = Level;

    fn bitor(self, rhs: Level) -> Level {
        Level(self.0 | rhs.0)
    }
}

impl BitOrAssign for Level {
    fn bitor_assign(&mut self, rhs: Level) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Full width of a region ID.
pub const ID_LEN: usize = 12;

/// Widths of the province, city, county, town and village segments.
pub const SEGMENT_WIDTHS: [usize; 5] = [2, 2, 2, 3, 3];

/// The ID of the root, i.e. "all regions".
pub const ROOT_ID: &str = "000000000000";

/// Splits a 12 digit ID into its five segments.
///
/// ```rust
/// use cnregion_core::id;
///
/// let parts = id::split("330203103233").unwrap();
/// assert_eq!(parts, ["33", "02", "03", "103", "233"]);
/// ```
pub fn split(id: &str) -> Result<[&str; 5]> {
    if id.len() != ID_LEN {
        return Err(RegionError::InvalidLength {
            expected: ID_LEN,
            found: id.to_string(),
        });
    }
    if !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RegionError::invalid_id(id, "region ids are decimal digits"));
    }

    let mut parts = [""; 5];
    let mut start = 0;
    for (part, width) in parts.iter_mut().zip(SEGMENT_WIDTHS) {
        *part = &id[start..start + width];
        start += width;
    }
    Ok(parts)
}

/// Splits `id` and keeps the leading non-zero segments.
///
/// `330312123000` gives `["33", "03", "12", "123"]`; the zero ID gives
/// an empty list. A non-zero segment after a zero one is rejected.
pub fn split_filter(id: &str) -> Result<Vec<&str>> {
    let parts = split(id)?;
    let len = parts.iter().position(|p| is_zero(p)).unwrap_or(parts.len());
    if parts[len..].iter().any(|p| !is_zero(p)) {
        return Err(RegionError::invalid_id(
            id,
            "non-zero segment after an all-zero segment",
        ));
    }
    Ok(parts[..len].to_vec())
}

/// The non-zero prefix of `id`: `330312123000` gives `330312123`.
pub fn prefix(id: &str) -> Result<String> {
    Ok(split_filter(id)?.concat())
}

/// The significant prefix of the parent region: `330312123456` gives
/// `330312123`.
pub fn parent(id: &str) -> Result<String> {
    let list = split_filter(id)?;
    match list.split_last() {
        Some((_, parents)) => Ok(parents.concat()),
        None => Err(RegionError::invalid_id(id, "the root has no parent")),
    }
}

/// Pads `id` with trailing zeros up to the width of `level`.
///
/// Fails when `id` is longer than that width, or when it is exactly one
/// character short (no segment is one character wide).
pub fn fill(id: &str, level: Level) -> Result<String> {
    let width = level
        .width()
        .filter(|w| *w > 0)
        .ok_or(RegionError::InvalidLevel(level.bits()))?;

    match width.checked_sub(id.len()) {
        Some(0) => Ok(id.to_string()),
        Some(rem) if rem >= 2 => Ok(format!("{id}{}", "0".repeat(rem))),
        _ => Err(RegionError::invalid_id(id, "cannot be padded to the level width")),
    }
}

/// True if every character is `0`; the empty string counts as zero.
pub fn is_zero(segment: &str) -> bool {
    segment.bytes().all(|b| b == b'0')
}
