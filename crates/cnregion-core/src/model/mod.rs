// crates/cnregion-core/src/model/mod.rs
pub mod codec;
pub mod database;
pub mod mask;
pub mod region;
pub mod search;

pub use codec::FORMAT_VERSION;
pub use database::Database;
pub use mask::YearMask;
pub use region::Region;
pub use search::SearchOptions;
