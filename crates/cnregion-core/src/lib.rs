// crates/cnregion-core/src/lib.rs

//! # cnregion-core
//!
//! China's five-level administrative divisions (province, city, county,
//! town, village) across several data years, kept in one tree and stored
//! in a compact text format.
//!
//! ```rust
//! use cnregion_core::prelude::*;
//!
//! let mut db = Database::with_separator(">");
//! db.add_version(2020)?;
//! db.add_item("330000000000", "浙江省", 2020)?;
//! db.add_item("330300000000", "温州市", 2020)?;
//!
//! let data = db.to_bytes()?;
//! let db = Database::load(&data, "-", CompressionMode::None, &[2020])?;
//! let wz = db.find_id("330300000000")?.expect("present");
//! assert_eq!(wz.full_name(), "浙江省-温州市");
//! # Ok::<(), cnregion_core::RegionError>(())
//! ```

pub mod api;
pub mod common;
pub mod error;
pub mod id;
pub mod loader;
pub mod model;
pub mod traits;
pub mod view;
pub mod years;

pub use crate::common::DbStats;
pub use crate::error::{RegionError, Result};
pub use crate::id::Level;
pub use crate::loader::CompressionMode;
pub use crate::model::{Database, Region, SearchOptions, YearMask, FORMAT_VERSION};
pub use crate::traits::{RegionInfo, RegionSearch};
pub use crate::view::{District, ViewRegion, YearView};
pub use crate::years::Year;

#[cfg(feature = "builder")]
pub use crate::loader::builder::{build_database, BuildReport};

pub mod prelude {
    pub use crate::api::RegionRecord;
    pub use crate::{
        CompressionMode, Database, Level, Region, RegionError, RegionInfo, RegionSearch,
        SearchOptions, Year, YearView,
    };
}
