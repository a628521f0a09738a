// crates/cnregion-core/src/view.rs

//! # Versioned view
//!
//! A [`YearView`] borrows a [`Database`] and hides every region that is
//! not attested in at least one of the requested years. Provinces and
//! the six administrative districts are computed on first use and
//! cached for the lifetime of the view; the cache is safe to fill from
//! several threads at once.

use crate::error::{RegionError, Result};
use crate::id::{Level, ID_LEN};
use crate::model::{Database, Region, SearchOptions};
use crate::traits::{RegionInfo, RegionSearch};
use crate::years::Year;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Administrative districts keyed by the first digit of a province ID.
pub const DISTRICTS: [(char, &str); 6] = [
    ('1', "华北地区"),
    ('2', "东北地区"),
    ('3', "华东地区"),
    ('4', "中南地区"),
    ('5', "西南地区"),
    ('6', "西北地区"),
];

/// A read-only view of a database restricted to a set of years.
#[derive(Debug)]
pub struct YearView<'a> {
    db: &'a Database,
    years: Arc<[Year]>,
    provinces: OnceCell<Vec<ViewRegion<'a>>>,
    districts: OnceCell<Vec<District<'a>>>,
}

impl Database {
    /// Restricts the database to `years`.
    ///
    /// An empty slice selects every version of the database. Each
    /// requested year must be registered.
    pub fn view(&self, years: &[Year]) -> Result<YearView<'_>> {
        let mut selected: Vec<Year> = Vec::with_capacity(years.len());
        for &year in years {
            if self.version_index(year).is_none() {
                return Err(RegionError::UnknownVersion(year));
            }
            if !selected.contains(&year) {
                selected.push(year);
            }
        }
        if selected.is_empty() {
            selected = self.versions.clone();
        }

        Ok(YearView {
            db: self,
            years: selected.into(),
            provinces: OnceCell::new(),
            districts: OnceCell::new(),
        })
    }
}

impl<'a> YearView<'a> {
    pub fn database(&self) -> &'a Database {
        self.db
    }

    /// The years this view selects.
    pub fn versions(&self) -> &[Year] {
        &self.years
    }

    fn wrap(&self, node: &'a Region) -> ViewRegion<'a> {
        ViewRegion {
            node,
            years: Arc::clone(&self.years),
        }
    }

    fn visible(&self, node: &Region) -> bool {
        node.is_root() || node.is_supported_any(&self.years)
    }

    /// Looks a region up by its 12 digit ID.
    ///
    /// A region absent from every selected year is reported as not found.
    /// The empty string yields the root.
    pub fn find(&self, region_id: &str) -> Result<Option<ViewRegion<'a>>> {
        let db: &'a Database = self.db;
        Ok(db
            .find_id(region_id)?
            .filter(|node| self.visible(node))
            .map(|node| self.wrap(node)))
    }

    /// Children of `node` present in the selected years.
    pub fn items(&self, node: &'a Region) -> Vec<ViewRegion<'a>> {
        self.wrap(node).items()
    }

    /// Top-level regions present in the selected years.
    pub fn provinces(&self) -> &[ViewRegion<'a>] {
        let db: &'a Database = self.db;
        self.provinces.get_or_init(|| self.items(&db.root))
    }

    /// Provinces grouped into the six districts, in district order.
    ///
    /// Every district is present even when none of its provinces are.
    pub fn districts(&self) -> &[District<'a>] {
        self.districts.get_or_init(|| {
            let provinces = self.provinces();
            DISTRICTS
                .iter()
                .map(|&(digit, name)| District {
                    id: digit.to_string(),
                    name,
                    full_id: format!("{digit:0<width$}", width = ID_LEN),
                    items: provinces
                        .iter()
                        .filter(|p| p.node.id.starts_with(digit))
                        .cloned()
                        .collect(),
                })
                .collect()
        })
    }
}

impl<'a> RegionSearch for YearView<'a> {
    type Hit<'v>
        = ViewRegion<'a>
    where
        Self: 'v;

    /// Same as [`Database`] search, limited to the selected years. The
    /// year filter applies before `opts.max`.
    fn search(&self, opts: &SearchOptions) -> Result<Vec<Self::Hit<'_>>> {
        let db: &'a Database = self.db;
        let hits = db.search_where(opts, |node| node.is_supported_any(&self.years))?;
        Ok(hits.into_iter().map(|node| self.wrap(node)).collect())
    }
}

/// A database region seen through a [`YearView`].
#[derive(Clone, Debug)]
pub struct ViewRegion<'a> {
    node: &'a Region,
    years: Arc<[Year]>,
}

impl<'a> ViewRegion<'a> {
    /// The underlying database node.
    pub fn region(&self) -> &'a Region {
        self.node
    }

    pub fn level(&self) -> Level {
        self.node.level()
    }
}

impl PartialEq for ViewRegion<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.node, other.node) && self.years == other.years
    }
}

impl<'a> RegionInfo<'a> for ViewRegion<'a> {
    fn id(&self) -> &str {
        self.node.id()
    }

    fn name(&self) -> &str {
        self.node.name()
    }

    fn full_name(&self) -> &str {
        self.node.full_name()
    }

    fn full_id(&self) -> &str {
        self.node.full_id()
    }

    fn versions(&self) -> Vec<Year> {
        self.node
            .versions()
            .iter()
            .copied()
            .filter(|y| self.years.contains(y))
            .collect()
    }

    fn items(&self) -> Vec<ViewRegion<'a>> {
        let node: &'a Region = self.node;
        node.items()
            .iter()
            .filter(|item| item.is_supported_any(&self.years))
            .map(|item| ViewRegion {
                node: item,
                years: Arc::clone(&self.years),
            })
            .collect()
    }
}

/// A group of provinces sharing the first ID digit.
///
/// Districts are not stored in the database; their `full_id` is the digit
/// padded with zeros.
#[derive(Clone, Debug)]
pub struct District<'a> {
    id: String,
    name: &'static str,
    full_id: String,
    items: Vec<ViewRegion<'a>>,
}

impl<'a> RegionInfo<'a> for District<'a> {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        self.name
    }

    fn full_name(&self) -> &str {
        self.name
    }

    fn full_id(&self) -> &str {
        &self.full_id
    }

    /// Union of the member provinces' years, in view order.
    fn versions(&self) -> Vec<Year> {
        let Some(first) = self.items.first() else {
            return Vec::new();
        };
        first
            .years
            .iter()
            .copied()
            .filter(|y| self.items.iter().any(|p| p.node.is_supported(*y)))
            .collect()
    }

    fn items(&self) -> Vec<ViewRegion<'a>> {
        self.items.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Database {
        let mut db = Database::with_separator(">");
        db.add_version(2020).unwrap();
        db.add_version(2019).unwrap();
        for (region_id, name, year) in [
            ("110000000000", "北京市", 2020),
            ("110000000000", "北京市", 2019),
            ("130000000000", "河北省", 2020),
            ("330000000000", "浙江省", 2020),
            ("330000000000", "浙江省", 2019),
            ("330300000000", "温州市", 2020),
            ("330400000000", "嘉兴市", 2019),
            ("650000000000", "新疆维吾尔自治区", 2019),
        ] {
            db.add_item(region_id, name, year).unwrap();
        }
        db
    }

    fn ids<'a>(items: impl IntoIterator<Item = &'a ViewRegion<'a>>) -> Vec<String> {
        items.into_iter().map(|r| r.id().to_string()).collect()
    }

    #[test]
    fn unknown_year_is_rejected() {
        let db = sample();
        assert!(matches!(db.view(&[2018]), Err(RegionError::UnknownVersion(2018))));
    }

    #[test]
    fn empty_years_select_everything() {
        let db = sample();
        let view = db.view(&[]).unwrap();
        assert_eq!(view.versions(), [2020, 2019]);
        assert_eq!(ids(view.provinces()), ["11", "13", "33", "65"]);
    }

    #[test]
    fn provinces_are_year_filtered() {
        let db = sample();
        let view = db.view(&[2019]).unwrap();
        assert_eq!(ids(view.provinces()), ["11", "33", "65"]);

        let view = db.view(&[2020, 2020]).unwrap();
        assert_eq!(view.versions(), [2020]);
        assert_eq!(ids(view.provinces()), ["11", "13", "33"]);
    }

    #[test]
    fn provinces_are_memoized() {
        let db = sample();
        let view = db.view(&[2020]).unwrap();
        let first = view.provinces().as_ptr();
        assert_eq!(first, view.provinces().as_ptr());
        let districts = view.districts().as_ptr();
        assert_eq!(districts, view.districts().as_ptr());
    }

    #[test]
    fn view_is_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<YearView<'_>>();
    }

    #[test]
    fn districts_fill_once_across_threads() {
        let db = sample();
        let view = db.view(&[2020]).unwrap();

        let ptrs: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| view.districts().as_ptr() as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(ptrs.iter().all(|&p| p == ptrs[0]));
        assert_eq!(ptrs[0], view.districts().as_ptr() as usize);

        let districts = view.districts();
        assert_eq!(districts.len(), 6);
        assert_eq!(ids(&districts[0].items()), ["11", "13"]);
        assert_eq!(ids(&districts[2].items()), ["33"]);
        assert_eq!(ids(view.provinces()), ["11", "13", "33"]);
    }

    #[test]
    fn find_hides_other_years() {
        let db = sample();
        let view = db.view(&[2019]).unwrap();
        assert!(view.find("330300000000").unwrap().is_none());
        let jx = view.find("330400000000").unwrap().unwrap();
        assert_eq!(jx.full_name(), "浙江省>嘉兴市");
        assert_eq!(jx.versions(), [2019]);
        assert!(view.find("").unwrap().unwrap().region().is_root());
        assert!(view.find("33").is_err());
    }

    #[test]
    fn items_and_versions_follow_the_view() {
        let db = sample();
        let zj = db.find(&["33"]).unwrap();

        let view = db.view(&[2020]).unwrap();
        assert_eq!(ids(&view.items(zj)), ["03"]);
        assert_eq!(view.find("330000000000").unwrap().unwrap().versions(), [2020]);

        let view = db.view(&[]).unwrap();
        assert_eq!(ids(&view.items(zj)), ["03", "04"]);
        assert_eq!(
            view.find("330000000000").unwrap().unwrap().versions(),
            [2020, 2019]
        );
    }

    #[test]
    fn districts_group_by_first_digit() {
        let db = sample();
        let view = db.view(&[2020]).unwrap();
        let districts = view.districts();
        assert_eq!(districts.len(), 6);

        let north = &districts[0];
        assert_eq!(north.id(), "1");
        assert_eq!(north.name(), "华北地区");
        assert_eq!(north.full_name(), "华北地区");
        assert_eq!(north.full_id(), "100000000000");
        assert_eq!(ids(&north.items()), ["11", "13"]);
        assert_eq!(north.versions(), [2020]);

        assert!(districts[1].items().is_empty());
        assert!(districts[1].versions().is_empty());
        assert_eq!(ids(&districts[2].items()), ["33"]);
        // 新疆 only exists in 2019
        assert!(districts[5].items().is_empty());
    }

    #[test]
    fn search_filters_years_before_cap() {
        let db = sample();
        let view = db.view(&[2019]).unwrap();

        let hits = view.search(&SearchOptions::new("市")).unwrap();
        assert_eq!(ids(&hits), ["11", "04"]);

        let hits = view.search(&SearchOptions::new("市").max(2)).unwrap();
        assert_eq!(ids(&hits), ["11", "04"]);

        let hits = view
            .search(&SearchOptions::new("").level(Level::CITY))
            .unwrap();
        assert_eq!(hits[0].full_name(), "浙江省>嘉兴市");
    }
}
