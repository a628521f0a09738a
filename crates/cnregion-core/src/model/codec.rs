// crates/cnregion-core/src/model/codec.rs

//! # Dictionary format
//!
//! ```text
//! <format>:[<year>,<year>,...]:<node>
//! <node> = <id>:<name>:<mask>:<count>{<node>...<node>}
//! ```
//!
//! - `format` is [`FORMAT_VERSION`];
//! - the year list is [`Database::versions`] in registration order;
//! - `mask` has bit `i` set when the node exists in `versions[i]`;
//! - `count` is the number of child nodes inside the braces.
//!
//! The root node comes first with an empty id and name:
//!
//! ```text
//! 1:[2020,2019]:::0:1{33:浙江:3:1{01:杭州:1:0{}}}
//! ```

use super::database::Database;
use super::mask::YearMask;
use super::region::Region;
use crate::error::{RegionError, Result};
use crate::id::{self, Level};
use crate::years::Year;
use tracing::debug;

/// Version tag written at the start of every data file.
pub const FORMAT_VERSION: u32 = 1;

impl Database {
    /// Serializes the whole tree.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = String::with_capacity(64 * 1024);
        let years = self
            .versions
            .iter()
            .map(Year::to_string)
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&format!("{FORMAT_VERSION}:[{years}]:"));
        encode_region(&self.root, &self.versions, &mut out)?;
        Ok(out.into_bytes())
    }

    /// Reconstructs a database from [`Database::to_bytes`] output.
    ///
    /// With a non-empty `years` filter only regions present in at least
    /// one of those years are kept, and the versions of the result are
    /// exactly `years` in the given order. Every filtered year must exist
    /// in the data.
    pub fn from_bytes(data: &[u8], separator: &str, years: &[Year]) -> Result<Self> {
        let mut cursor = Cursor::new(data);

        let format = cursor.number::<u32>(b':', "format version")?;
        if format != FORMAT_VERSION {
            return Err(RegionError::IncompatibleVersion {
                expected: FORMAT_VERSION,
                found: format,
            });
        }

        let stored = cursor.versions()?;
        let filter = resolve_filter(&stored, years)?;
        debug!(?stored, ?filter, "decoding region data");

        let decoder = Decoder {
            stored: &stored,
            filter: &filter,
            separator,
        };

        let start = cursor.pos;
        let body = cursor.rest();
        let end = find_end(body).ok_or_else(|| RegionError::malformed(start, "unbalanced braces"))?;
        let trailing = &body[end + 1..];
        if !trailing.iter().all(u8::is_ascii_whitespace) {
            return Err(RegionError::malformed(start + end + 1, "trailing data after root"));
        }

        let root = decoder.decode_region(
            Cursor::at(&body[..end], start),
            &Region::root(),
            Level::NONE,
        )?;

        Ok(Database {
            root,
            versions: filter,
            separator: separator.to_string(),
        })
    }
}

fn resolve_filter(stored: &[Year], years: &[Year]) -> Result<Vec<Year>> {
    if years.is_empty() {
        return Ok(stored.to_vec());
    }

    let mut filter = Vec::with_capacity(years.len());
    for year in years {
        if !stored.contains(year) {
            return Err(RegionError::MissingVersion(*year));
        }
        if !filter.contains(year) {
            filter.push(*year);
        }
    }
    Ok(filter)
}

fn encode_region(region: &Region, versions: &[Year], out: &mut String) -> Result<()> {
    let mask = YearMask::encode(&region.years, versions)?;
    out.push_str(&format!(
        "{}:{}:{}:{}{{",
        region.id,
        region.name,
        mask,
        region.items.len()
    ));
    for item in &region.items {
        encode_region(item, versions, out)?;
    }
    out.push('}');
    Ok(())
}

/// Position of the brace closing the first `{` in `data`.
pub(crate) fn find_end(data: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in data.iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

struct Decoder<'a> {
    stored: &'a [Year],
    filter: &'a [Year],
    separator: &'a str,
}

impl Decoder<'_> {
    /// Decodes one node from its text without the closing brace.
    ///
    /// `parent` only provides the naming context (full name and prefix).
    fn decode_region(&self, mut cursor: Cursor<'_>, parent: &Region, level: Level) -> Result<Region> {
        let offset = cursor.offset();
        let id = cursor.text(b':', "id")?;
        let name = cursor.text(b':', "name")?;
        let bits = cursor.number::<u64>(b':', "supported mask")?;
        let count = cursor.number::<usize>(b'{', "child count")?;

        let mut region = if level == Level::NONE {
            if !id.is_empty() {
                return Err(RegionError::malformed(offset, "root id must be empty"));
            }
            Region {
                name: name.to_string(),
                ..Region::root()
            }
        } else {
            if Some(id.len()) != level.segment_width()
                || !id.bytes().all(|b| b.is_ascii_digit())
                || id::is_zero(id)
            {
                return Err(RegionError::malformed(
                    offset,
                    format!("id {id:?} is not a {level} segment"),
                ));
            }
            Region {
                id: id.to_string(),
                name: name.to_string(),
                years: Vec::new(),
                items: Vec::new(),
                full_name: parent.child_full_name(self.separator, name),
                full_id: id::fill(&format!("{}{id}", parent.prefix()), Level::VILLAGE)?,
                level,
            }
        };

        let mask = YearMask::from_bits(bits, self.stored.len()).ok_or_else(|| {
            RegionError::malformed(offset, format!("mask {bits} exceeds the version list"))
        })?;
        let present = mask.decode(self.stored);
        region.years = self
            .filter
            .iter()
            .filter(|y| present.contains(y))
            .copied()
            .collect();

        if count > 0 {
            let child_level = level
                .child()
                .ok_or_else(|| RegionError::malformed(offset, "nested deeper than village"))?;

            let mut previous: Option<String> = None;
            for _ in 0..count {
                let start = cursor.offset();
                let end = find_end(cursor.rest()).ok_or_else(|| {
                    RegionError::malformed(start, format!("expected {count} children"))
                })?;
                let child_cursor = Cursor::at(&cursor.rest()[..end], start);
                let item = self.decode_region(child_cursor, &region, child_level)?;
                cursor.advance(end + 1);

                if let Some(prev) = &previous {
                    if *prev >= item.id {
                        return Err(RegionError::malformed(
                            start,
                            format!("child {:?} out of order after {prev:?}", item.id),
                        ));
                    }
                }
                previous = Some(item.id.clone());

                // regions absent from every filtered year are dropped
                if !item.years.is_empty() {
                    region.items.push(item);
                }
            }
        }

        if !cursor.rest().is_empty() {
            return Err(RegionError::malformed(
                cursor.offset(),
                format!("more data than the {count} declared children"),
            ));
        }
        Ok(region)
    }
}

/// Byte cursor over the encoded data, tracking absolute offsets for errors.
struct Cursor<'a> {
    data: &'a [u8],
    base: usize,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self::at(data, 0)
    }

    fn at(data: &'a [u8], base: usize) -> Self {
        Cursor { data, base, pos: 0 }
    }

    fn offset(&self) -> usize {
        self.base + self.pos
    }

    fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Consumes bytes up to `delim` and skips the delimiter.
    fn field(&mut self, delim: u8, what: &str) -> Result<&'a [u8]> {
        let rest = self.rest();
        let index = rest.iter().position(|b| *b == delim).ok_or_else(|| {
            RegionError::malformed(
                self.offset(),
                format!("missing {:?} after {what}", delim as char),
            )
        })?;
        self.pos += index + 1;
        Ok(&rest[..index])
    }

    fn text(&mut self, delim: u8, what: &str) -> Result<&'a str> {
        let offset = self.offset();
        let raw = self.field(delim, what)?;
        std::str::from_utf8(raw)
            .map_err(|_| RegionError::malformed(offset, format!("{what} is not valid UTF-8")))
    }

    fn number<T: std::str::FromStr>(&mut self, delim: u8, what: &str) -> Result<T> {
        let offset = self.offset();
        let raw = self.text(delim, what)?;
        raw.parse()
            .map_err(|_| RegionError::malformed(offset, format!("{what} {raw:?} is not a number")))
    }

    fn versions(&mut self) -> Result<Vec<Year>> {
        let offset = self.offset();
        let raw = self.text(b':', "version list")?;
        let inner = raw
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| RegionError::malformed(offset, "version list must be bracketed"))?;
        if inner.is_empty() {
            return Ok(Vec::new());
        }

        let mut versions: Vec<Year> = Vec::new();
        for item in inner.split(',') {
            let year: Year = item
                .parse()
                .map_err(|_| RegionError::malformed(offset, format!("invalid year {item:?}")))?;
            if versions.contains(&year) {
                return Err(RegionError::malformed(offset, format!("duplicate year {year}")));
            }
            versions.push(year);
        }
        if versions.len() > YearMask::MAX_VERSIONS {
            return Err(RegionError::TooManyVersions {
                max: YearMask::MAX_VERSIONS,
            });
        }
        Ok(versions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "1:[2020,2019]:::0:2{33:浙江:1:1{01:温州:3:0{}}34:安徽:1:3{01:合肥:3:0{}02:芜湖:1:0{}03:芜湖-2:1:0{}}}";

    fn sample_db() -> Database {
        let mut db = Database::with_separator("-");
        db.add_version(2020).unwrap();
        db.add_version(2019).unwrap();
        for (region_id, name, years) in [
            ("330000000000", "浙江", &[2020][..]),
            ("330100000000", "温州", &[2020, 2019][..]),
            ("340000000000", "安徽", &[2020][..]),
            ("340100000000", "合肥", &[2020, 2019][..]),
            ("340200000000", "芜湖", &[2020][..]),
            ("340300000000", "芜湖-2", &[2020][..]),
        ] {
            for year in years {
                db.add_item(region_id, name, *year).unwrap();
            }
        }
        db
    }

    #[test]
    fn find_end_counts_depth() {
        assert_eq!(find_end(b"0123{56}"), Some(7));
        assert_eq!(find_end(b"a{b{c}d}e}"), Some(7));
        assert_eq!(find_end(b"a{b{c}"), None);
        assert_eq!(find_end(b"}{"), None);
        assert_eq!(find_end(b"plain"), None);
    }

    #[test]
    fn encodes_known_layout() {
        let bytes = sample_db().to_bytes().unwrap();
        assert_eq!(std::str::from_utf8(&bytes).unwrap(), SAMPLE);
    }

    #[test]
    fn decode_rebuilds_derived_fields() {
        let db = Database::from_bytes(SAMPLE.as_bytes(), "-", &[]).unwrap();
        assert_eq!(db, sample_db());

        let wh2 = db.find_id("340300000000").unwrap().unwrap();
        assert_eq!(wh2.name(), "芜湖-2");
        assert_eq!(wh2.full_name(), "安徽-芜湖-2");
        assert_eq!(wh2.level(), Level::CITY);
    }

    #[test]
    fn decode_with_other_separator() {
        let db = Database::from_bytes(SAMPLE.as_bytes(), ">", &[]).unwrap();
        let hf = db.find(&["34", "01"]).unwrap();
        assert_eq!(hf.full_name(), "安徽>合肥");
        assert_eq!(db.separator(), ">");
    }

    #[test]
    fn decode_filters_years() {
        let db = Database::from_bytes(SAMPLE.as_bytes(), "-", &[2019]).unwrap();
        assert_eq!(db.versions(), [2019]);
        // provinces only exist in 2020, so their subtrees go with them
        assert!(db.provinces().is_empty());

        let db = Database::from_bytes(SAMPLE.as_bytes(), "-", &[2019, 2020]).unwrap();
        assert_eq!(db.versions(), [2019, 2020]);
        assert_eq!(db.provinces().len(), 2);
        // re-encoding uses the filtered version order
        let again = Database::from_bytes(&db.to_bytes().unwrap(), "-", &[]).unwrap();
        assert_eq!(again, db);
    }

    #[test]
    fn decode_rejects_missing_filter_year() {
        assert!(matches!(
            Database::from_bytes(SAMPLE.as_bytes(), "-", &[2018]),
            Err(RegionError::MissingVersion(2018))
        ));
    }

    #[test]
    fn decode_rejects_other_format() {
        assert!(matches!(
            Database::from_bytes(b"100:[2020]:::1:0{}", "-", &[]),
            Err(RegionError::IncompatibleVersion { found: 100, .. })
        ));
    }

    #[test]
    fn empty_database_round_trips() {
        let db = Database::new();
        let bytes = db.to_bytes().unwrap();
        assert_eq!(bytes, b"1:[]:::0:0{}");
        assert_eq!(Database::from_bytes(&bytes, "", &[]).unwrap(), db);
    }

    #[test]
    fn root_name_survives_decode() {
        let db = Database::from_bytes("1:[2020]::中国:0:1{33:a:1:0{}}".as_bytes(), "-", &[]).unwrap();
        assert_eq!(db.root().name(), "中国");
        assert!(db.root().id().is_empty());
        // children are named from the root's full name, not its name
        assert_eq!(db.find(&["33"]).unwrap().full_name(), "a");
        assert_eq!(db.to_bytes().unwrap(), "1:[2020]::中国:0:1{33:a:1:0{}}".as_bytes());
    }

    #[test]
    fn decode_fails_closed() {
        let cases: &[&[u8]] = &[
            b"",
            b"x:[2020]:::0:0{}",
            b"1:2020:::0:0{}",
            b"1:[2020,x]:::0:0{}",
            b"1:[2020,2020]:::0:0{}",
            b"1:[2020]:::0:0{",
            b"1:[2020]:::0:1{}",
            b"1:[2020]:::0:1{33:a:1:0{}}}",
            b"1:[2020]:::0:0{}garbage",
            b"1:[2020]:::x:0{}",
            b"1:[2020]:::0:y{}",
            b"1:[2020]:::0:1{33:a:2:0{}}",
            b"1:[2020]:::0:1{333:a:1:0{}}",
            b"1:[2020]:::0:1{3a:a:1:0{}}",
            b"1:[2020]:::0:1{00:a:1:0{}}",
            b"1:[2020]:::0:2{34:a:1:0{}33:b:1:0{}}",
            b"1:[2020]:::0:2{33:a:1:0{}33:b:1:0{}}",
            b"1:[2020]:::0:1{33:a:1:0{}extra}",
            b"1:[2020]:1::0:0{}",
            b"1:[2020]:::0:1{33:a:1:1{01:b:1:1{01:c:1:1{001:d:1:1{001:e:1:1{1:f:1:0{}}}}}}}",
        ];
        for case in cases {
            let result = Database::from_bytes(case, "-", &[]);
            assert!(
                result.is_err(),
                "accepted {:?}",
                String::from_utf8_lossy(case)
            );
        }
    }

    #[test]
    fn deep_tree_round_trips() {
        let mut db = Database::with_separator("/");
        db.add_version(2021).unwrap();
        for region_id in [
            "330000000000",
            "330300000000",
            "330305000000",
            "330305100000",
            "330305100001",
        ] {
            db.add_item(region_id, region_id, 2021).unwrap();
        }
        let bytes = db.to_bytes().unwrap();
        assert_eq!(Database::from_bytes(&bytes, "/", &[]).unwrap(), db);
    }
}
