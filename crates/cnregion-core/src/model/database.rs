// crates/cnregion-core/src/model/database.rs
use super::mask::YearMask;
use super::region::Region;
use crate::common::DbStats;
use crate::error::{RegionError, Result};
use crate::id::{self, Level};
use crate::years::Year;
use std::io::BufRead;
use tracing::{debug, info};

/// The region database: one root region and the list of data years.
///
/// `versions` is append-only; the position of a year in it is the bit
/// used for that year in the encoded file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Database {
    pub(crate) root: Region,
    pub(crate) versions: Vec<Year>,
    pub(crate) separator: String,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// An empty database: a root without children and no versions.
    pub fn new() -> Self {
        Database {
            root: Region::root(),
            versions: Vec::new(),
            separator: String::new(),
        }
    }

    /// An empty database whose full names join ancestors with `separator`.
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Database {
            separator: separator.into(),
            ..Self::new()
        }
    }

    pub fn root(&self) -> &Region {
        &self.root
    }

    /// Data years in the order they were added.
    pub fn versions(&self) -> &[Year] {
        &self.versions
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Top-level regions.
    pub fn provinces(&self) -> &[Region] {
        self.root.items()
    }

    /// Registers a new data year.
    ///
    /// Returns `Ok(true)` if the year was added and `Ok(false)` if it was
    /// already registered.
    pub fn add_version(&mut self, year: Year) -> Result<bool> {
        if self.version_index(year).is_some() {
            return Ok(false);
        }
        if self.versions.len() >= YearMask::MAX_VERSIONS {
            return Err(RegionError::TooManyVersions {
                max: YearMask::MAX_VERSIONS,
            });
        }

        debug!(year, "registering data version");
        self.versions.push(year);
        Ok(true)
    }

    /// Position of `year` in [`Database::versions`].
    pub fn version_index(&self, year: Year) -> Option<usize> {
        self.versions.iter().position(|v| *v == year)
    }

    /// Looks a region up by its path segments; no segments yields the root.
    pub fn find(&self, path: &[&str]) -> Option<&Region> {
        self.root.find_item(path)
    }

    /// Looks a region up by its 12 digit ID. The empty string is the root.
    pub fn find_id(&self, region_id: &str) -> Result<Option<&Region>> {
        if region_id.is_empty() {
            return Ok(Some(&self.root));
        }
        let path = id::split_filter(region_id)?;
        Ok(self.find(&path))
    }

    /// Records that `region_id` exists with `name` in `year`.
    ///
    /// An existing region is marked as supported in `year`; otherwise the
    /// region is inserted under its parent, which must already exist.
    pub fn add_item(&mut self, region_id: &str, name: &str, year: Year) -> Result<()> {
        let path = id::split_filter(region_id)?;
        let Some((last, parents)) = path.split_last() else {
            return Err(RegionError::invalid_id(
                region_id,
                "the root cannot be inserted",
            ));
        };

        let versions = self.versions.as_slice();
        if let Some(item) = self.root.find_item_mut(&path) {
            return item.set_supported(versions, year);
        }

        let level = Level::from_depth(path.len())
            .ok_or_else(|| RegionError::invalid_id(region_id, "too many segments"))?;
        let parent = self
            .root
            .find_item_mut(parents)
            .ok_or_else(|| RegionError::ParentNotFound(parents.concat()))?;
        parent.add_item(versions, &self.separator, last, name, level, year)
    }

    /// Adds every `<id>\t<name>` line of `reader` for `year`.
    ///
    /// Blank lines are skipped. Returns the number of records added.
    pub fn ingest<R: BufRead>(&mut self, year: Year, reader: R) -> Result<usize> {
        if self.version_index(year).is_none() {
            return Err(RegionError::UnknownVersion(year));
        }
        let records = read_records(reader)?;
        self.insert_records(year, records)
    }

    /// Inserts records sorted by ID, so that parents always precede their
    /// children.
    pub(crate) fn insert_records(
        &mut self,
        year: Year,
        mut records: Vec<(String, String)>,
    ) -> Result<usize> {
        records.sort_by(|a, b| a.0.cmp(&b.0));
        for (region_id, name) in &records {
            self.add_item(region_id, name, year)?;
        }

        info!(year, records = records.len(), "ingested region records");
        Ok(records.len())
    }

    /// Number of regions per level.
    pub fn stats(&self) -> DbStats {
        let mut stats = DbStats::default();
        self.root.walk(&mut |region| match region.level() {
            Level::PROVINCE => stats.provinces += 1,
            Level::CITY => stats.cities += 1,
            Level::COUNTY => stats.counties += 1,
            Level::TOWN => stats.towns += 1,
            Level::VILLAGE => stats.villages += 1,
            _ => {}
        });
        stats
    }
}

/// Parses `<id>\t<name>` lines; the line number of a bad record is
/// 1-based.
pub(crate) fn read_records<R: BufRead>(reader: R) -> Result<Vec<(String, String)>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim_end_matches('\r');
        if text.trim().is_empty() {
            continue;
        }
        match text.split('\t').collect::<Vec<_>>().as_slice() {
            [id, name] => records.push((id.to_string(), name.to_string())),
            _ => {
                return Err(RegionError::InvalidRecord {
                    line: index + 1,
                    text: text.to_string(),
                })
            }
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Database {
        let mut db = Database::with_separator("-");
        db.add_version(2020).unwrap();
        db.add_version(2019).unwrap();
        db
    }

    #[test]
    fn add_version_is_idempotent() {
        let mut db = Database::new();
        assert!(db.add_version(2020).unwrap());
        assert!(!db.add_version(2020).unwrap());
        assert!(db.add_version(2019).unwrap());
        assert_eq!(db.versions(), [2020, 2019]);
    }

    #[test]
    fn add_version_ceiling() {
        let mut db = Database::new();
        for year in 0..YearMask::MAX_VERSIONS as Year {
            assert!(db.add_version(1900 + year).unwrap());
        }
        assert!(matches!(
            db.add_version(2100),
            Err(RegionError::TooManyVersions { .. })
        ));
        // already present stays a no-op at the ceiling
        assert!(!db.add_version(1900).unwrap());
    }

    #[test]
    fn version_index_lookup() {
        let db = sample();
        assert_eq!(db.version_index(2020), Some(0));
        assert_eq!(db.version_index(2019), Some(1));
        assert_eq!(db.version_index(1990), None);
    }

    #[test]
    fn add_item_marks_existing_regions() {
        let mut db = sample();
        db.add_item("330000000000", "浙江", 2020).unwrap();
        db.add_item("330000000000", "浙江", 2019).unwrap();

        let zj = db.find(&["33"]).unwrap();
        assert_eq!(zj.versions(), [2020, 2019]);
        assert!(zj.is_supported(2019));
        assert!(!zj.is_supported(2018));
        assert_eq!(db.provinces().len(), 1);
    }

    #[test]
    fn add_item_infers_level() {
        let mut db = sample();
        db.add_item("330000000000", "浙江", 2020).unwrap();
        db.add_item("330300000000", "温州", 2020).unwrap();
        db.add_item("330305000000", "洞头区", 2020).unwrap();
        db.add_item("330305100000", "北岙街道", 2020).unwrap();
        db.add_item("330305100001", "东岙社区", 2020).unwrap();

        let expected = [
            ("330000000000", Level::PROVINCE),
            ("330300000000", Level::CITY),
            ("330305000000", Level::COUNTY),
            ("330305100000", Level::TOWN),
            ("330305100001", Level::VILLAGE),
        ];
        for (region_id, level) in expected {
            let region = db.find_id(region_id).unwrap().unwrap();
            assert_eq!(region.level(), level);
            assert_eq!(region.full_id(), region_id);
        }
        assert_eq!(
            db.find_id("330305100001").unwrap().unwrap().full_name(),
            "浙江-温州-洞头区-北岙街道-东岙社区"
        );
    }

    #[test]
    fn add_item_errors() {
        let mut db = sample();
        assert!(matches!(
            db.add_item("330100000000", "温州", 2020),
            Err(RegionError::ParentNotFound(ref p)) if p == "33"
        ));
        assert!(matches!(
            db.add_item("330000000000", "浙江", 2001),
            Err(RegionError::UnknownVersion(2001))
        ));
        assert!(matches!(
            db.add_item("3300", "浙江", 2020),
            Err(RegionError::InvalidLength { .. })
        ));
        assert!(matches!(
            db.add_item(id::ROOT_ID, "中国", 2020),
            Err(RegionError::InvalidId { .. })
        ));
        assert!(matches!(
            db.add_item("330000120000", "?", 2020),
            Err(RegionError::InvalidId { .. })
        ));
    }

    #[test]
    fn find_id_empty_is_root() {
        let db = sample();
        assert!(db.find_id("").unwrap().unwrap().is_root());
        assert!(db.find_id(id::ROOT_ID).unwrap().unwrap().is_root());
        assert!(db.find_id("110000000000").unwrap().is_none());
        assert!(db.find_id("11").is_err());
    }

    #[test]
    fn ingest_orders_parents_first() {
        let mut db = sample();
        let data = "330300000000\t温州\n\n330000000000\t浙江\r\n340000000000\t安徽\n";
        assert_eq!(db.ingest(2020, data.as_bytes()).unwrap(), 3);
        assert_eq!(db.find_id("330300000000").unwrap().unwrap().name(), "温州");
        assert_eq!(db.find_id("340000000000").unwrap().unwrap().name(), "安徽");
    }

    #[test]
    fn ingest_rejects_bad_lines() {
        let mut db = sample();
        let err = db
            .ingest(2020, "330000000000\t浙江\n330300000000 温州\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, RegionError::InvalidRecord { line: 2, .. }));

        assert!(matches!(
            db.ingest(2001, "".as_bytes()),
            Err(RegionError::UnknownVersion(2001))
        ));
    }

    #[test]
    fn stats_count_levels() {
        let mut db = sample();
        db.add_item("330000000000", "浙江", 2020).unwrap();
        db.add_item("340000000000", "安徽", 2020).unwrap();
        db.add_item("340100000000", "合肥", 2020).unwrap();

        let stats = db.stats();
        assert_eq!(stats.provinces, 2);
        assert_eq!(stats.cities, 1);
        assert_eq!(stats.total(), 3);
    }
}
