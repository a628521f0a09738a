// crates/cnregion-core/src/traits.rs
use crate::error::Result;
use crate::model::SearchOptions;
use crate::years::Year;

/// Read-only capability shared by everything that looks like a region.
///
/// Implemented by year-restricted views of database regions and by the
/// synthetic district groupings, which have no stored counterpart.
///
/// # Examples
/// ```rust
/// use cnregion_core::{Database, RegionInfo};
///
/// let mut db = Database::with_separator(">");
/// db.add_version(2020).unwrap();
/// db.add_item("330000000000", "浙江省", 2020).unwrap();
///
/// let view = db.view(&[2020]).unwrap();
/// for district in view.districts() {
///     println!("{} {} ({} provinces)", district.id(), district.name(), district.items().len());
/// }
/// ```
pub trait RegionInfo<'a> {
    /// Short ID: the local segment, or the district digit.
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn full_name(&self) -> &str;
    /// The 12 digit ID.
    fn full_id(&self) -> &str;
    /// Years in which the region is visible through its view.
    fn versions(&self) -> Vec<Year>;
    /// Children visible through the same view.
    fn items(&self) -> Vec<crate::view::ViewRegion<'a>>;
}

/// Name search over a region tree.
pub trait RegionSearch {
    type Hit<'a>
    where
        Self: 'a;

    /// Regions whose name contains `opts.text`, in pre-order.
    fn search(&self, opts: &SearchOptions) -> Result<Vec<Self::Hit<'_>>>;
}
