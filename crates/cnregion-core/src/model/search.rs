// crates/cnregion-core/src/model/search.rs
use super::database::Database;
use super::region::Region;
use crate::error::Result;
use crate::id::Level;
use crate::traits::RegionSearch;

/// Options of a name search.
///
/// `text` is matched as a plain substring of a single region name, so
/// search for "温州" rather than "浙江温州".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub text: String,
    /// Restricts the search to this region's subtree. `None` (or the
    /// empty string) searches the whole tree.
    pub parent: Option<String>,
    /// Levels to match; [`Level::NONE`] means all levels.
    pub level: Level,
    /// Maximum number of results; 0 means unlimited.
    pub max: usize,
}

impl SearchOptions {
    pub fn new(text: impl Into<String>) -> Self {
        SearchOptions {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn max(mut self, max: usize) -> Self {
        self.max = max;
        self
    }

    fn level_mask(&self) -> Level {
        if self.level.is_empty() {
            Level::ALL
        } else {
            self.level
        }
    }
}

impl Database {
    /// Depth-first pre-order search keeping the regions accepted by `keep`.
    ///
    /// Results come in ID order. The walk stops as soon as `opts.max`
    /// results have been collected.
    pub(crate) fn search_where<'a>(
        &'a self,
        opts: &SearchOptions,
        keep: impl Fn(&Region) -> bool,
    ) -> Result<Vec<&'a Region>> {
        let start = match opts.parent.as_deref() {
            None => Some(&self.root),
            Some(parent) => self.find_id(parent)?,
        };
        let Some(start) = start else {
            return Ok(Vec::new());
        };

        let mut walker = Walker {
            text: &opts.text,
            level: opts.level_mask(),
            max: opts.max,
            keep,
            found: Vec::with_capacity(if opts.max == 0 { 100 } else { opts.max }),
        };
        walker.visit(start);
        Ok(walker.found)
    }
}

impl RegionSearch for Database {
    type Hit<'a> = &'a Region;

    fn search(&self, opts: &SearchOptions) -> Result<Vec<Self::Hit<'_>>> {
        self.search_where(opts, |_| true)
    }
}

struct Walker<'a, 'o, F> {
    text: &'o str,
    level: Level,
    max: usize,
    keep: F,
    found: Vec<&'a Region>,
}

impl<'a, F: Fn(&Region) -> bool> Walker<'a, '_, F> {
    fn is_full(&self) -> bool {
        self.max > 0 && self.found.len() >= self.max
    }

    /// Returns false once the result cap is reached.
    fn visit(&mut self, region: &'a Region) -> bool {
        if !region.is_root()
            && self.level.contains(region.level())
            && region.name().contains(self.text)
            && (self.keep)(region)
        {
            self.found.push(region);
        }
        if self.is_full() {
            return false;
        }

        for item in region.items() {
            if !self.visit(item) {
                return false;
            }
        }
        true
    }
}
