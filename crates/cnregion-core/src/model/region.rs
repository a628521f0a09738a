// crates/cnregion-core/src/model/region.rs
use crate::error::{RegionError, Result};
use crate::id::{self, Level};
use crate::years::Year;

/// A single administrative region, or the synthetic root of the tree.
///
/// `full_id` and `full_name` are derived from the ancestry when the node
/// is inserted or decoded; they are never written to the data file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) years: Vec<Year>,
    /// Sorted by `id`.
    pub(crate) items: Vec<Region>,

    pub(crate) full_name: String,
    pub(crate) full_id: String,
    pub(crate) level: Level,
}

impl Region {
    pub(crate) fn root() -> Self {
        Region {
            id: String::new(),
            name: String::new(),
            years: Vec::new(),
            items: Vec::new(),
            full_name: String::new(),
            full_id: id::ROOT_ID.to_string(),
            level: Level::NONE,
        }
    }

    /// The local segment, without the parent prefix or trailing zeros.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of every ancestor and this region joined with the database
    /// separator.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// The complete 12 digit ID.
    pub fn full_id(&self) -> &str {
        &self.full_id
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn is_root(&self) -> bool {
        self.level == Level::NONE
    }

    /// Years in which this region is attested, in database version order.
    pub fn versions(&self) -> &[Year] {
        &self.years
    }

    /// Child regions ordered by ID.
    pub fn items(&self) -> &[Region] {
        &self.items
    }

    pub fn is_supported(&self, year: Year) -> bool {
        self.years.contains(&year)
    }

    /// Supported in at least one of `years`.
    pub fn is_supported_any(&self, years: &[Year]) -> bool {
        self.years.iter().any(|y| years.contains(y))
    }

    /// Significant prefix of `full_id`.
    pub(crate) fn prefix(&self) -> &str {
        let width = self.level.width().unwrap_or(0);
        &self.full_id[..width]
    }

    /// Walks down one segment per level; an empty path yields `self`.
    pub fn find_item(&self, path: &[&str]) -> Option<&Region> {
        let mut current = self;
        for segment in path {
            let index = current.child_index(segment).ok()?;
            current = &current.items[index];
        }
        Some(current)
    }

    pub(crate) fn find_item_mut(&mut self, path: &[&str]) -> Option<&mut Region> {
        let mut current = self;
        for segment in path {
            let index = current.child_index(segment).ok()?;
            current = &mut current.items[index];
        }
        Some(current)
    }

    fn child_index(&self, id: &str) -> std::result::Result<usize, usize> {
        self.items.binary_search_by(|item| item.id.as_str().cmp(id))
    }

    /// Inserts a new child supported in `year` only.
    pub(crate) fn add_item(
        &mut self,
        versions: &[Year],
        separator: &str,
        id: &str,
        name: &str,
        level: Level,
        year: Year,
    ) -> Result<()> {
        if !versions.contains(&year) {
            return Err(RegionError::UnknownVersion(year));
        }
        if name.contains([':', '{', '}']) {
            return Err(RegionError::InvalidName(name.to_string()));
        }

        let index = match self.child_index(id) {
            Ok(_) => return Err(RegionError::DuplicateId(id.to_string())),
            Err(index) => index,
        };

        let full_id = id::fill(&format!("{}{id}", self.prefix()), Level::VILLAGE)?;
        let item = Region {
            id: id.to_string(),
            name: name.to_string(),
            years: vec![year],
            items: Vec::new(),
            full_name: self.child_full_name(separator, name),
            full_id,
            level,
        };
        self.items.insert(index, item);
        Ok(())
    }

    /// Marks this region as present in `year`. Idempotent.
    ///
    /// `years` is kept in the order of `versions`.
    pub(crate) fn set_supported(&mut self, versions: &[Year], year: Year) -> Result<()> {
        if !versions.contains(&year) {
            return Err(RegionError::UnknownVersion(year));
        }
        if !self.is_supported(year) {
            self.years.push(year);
            self.years
                .sort_by_key(|y| versions.iter().position(|v| v == y));
        }
        Ok(())
    }

    pub(crate) fn child_full_name(&self, separator: &str, name: &str) -> String {
        if self.full_name.is_empty() {
            name.to_string()
        } else {
            format!("{}{separator}{name}", self.full_name)
        }
    }

    /// Pre-order walk over this region and all descendants.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Region)) {
        f(self);
        for item in &self.items {
            item.walk(f);
        }
    }
}
