// crates/cnregion-core/src/common.rs
use serde::{Deserialize, Serialize};

/// Region counts per level.
///
/// Returned by [`Database::stats`](crate::Database::stats). The counts
/// describe the in-memory tree, after any year filter applied at load.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbStats {
    pub provinces: usize,
    pub cities: usize,
    pub counties: usize,
    pub towns: usize,
    pub villages: usize,
}

impl DbStats {
    pub fn total(&self) -> usize {
        self.provinces + self.cities + self.counties + self.towns + self.villages
    }
}
