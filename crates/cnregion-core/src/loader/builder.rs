// crates/cnregion-core/src/loader/builder.rs
#![cfg(feature = "builder")]

use super::{common_io, CompressionMode};
use crate::error::Result;
use crate::model::database::read_records;
use crate::model::Database;
use crate::years::{self, Year};

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of [`build_database`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Years ingested by this run.
    pub added: Vec<Year>,
    /// Years already present in the output file.
    pub skipped: Vec<Year>,
    /// Records read for the added years.
    pub records: usize,
}

/// Builds or extends the data file at `output` from crawled text files.
///
/// Every file below `data_dir/<year>/` holds `<id>\t<name>` lines. An
/// existing `output` is loaded first and years it already contains are
/// skipped. An empty `years` means every published year. The first bad
/// record aborts the build and leaves `output` untouched.
pub fn build_database(
    data_dir: &Path,
    output: &Path,
    years: &[Year],
    compression: CompressionMode,
) -> Result<BuildReport> {
    let years = if years.is_empty() {
        years::all()
    } else {
        years.to_vec()
    };

    let mut db = if output.exists() {
        Database::load_file(output, "", compression, &[])?
    } else {
        Database::new()
    };

    let mut report = BuildReport::default();
    for year in years {
        if db.version_index(year).is_some() {
            info!(year, "version already present, skipping");
            report.skipped.push(year);
            continue;
        }
        report.records += build_year(&mut db, data_dir, year)?;
        report.added.push(year);
    }

    db.dump(output, compression)?;
    Ok(report)
}

fn build_year(db: &mut Database, data_dir: &Path, year: Year) -> Result<usize> {
    info!(year, "adding version");
    db.add_version(year)?;

    let mut files = Vec::new();
    collect_files(&data_dir.join(year.to_string()), &mut files)?;

    let mut records = Vec::new();
    for path in &files {
        let reader = common_io::open_stream(path, CompressionMode::None)?;
        let found = read_records(BufReader::new(reader)).inspect_err(|err| {
            warn!(path = %path.display(), %err, "invalid data file");
        })?;
        records.extend(found);
    }
    db.insert_records(year, records)
}

/// Recursively lists regular files, sorted by path.
fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegionError;

    fn write(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn builds_and_extends() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        let output = dir.path().join("regions.db");

        write(&data, "2020/33.txt", "330300000000\t温州市\n330000000000\t浙江省\n");
        write(&data, "2020/34/34.txt", "340000000000\t安徽省\n");
        write(&data, "2019/33.txt", "330000000000\t浙江省\n");

        let report = build_database(&data, &output, &[2020], CompressionMode::None).unwrap();
        assert_eq!(report.added, [2020]);
        assert_eq!(report.records, 3);

        let report =
            build_database(&data, &output, &[2020, 2019], CompressionMode::None).unwrap();
        assert_eq!(report.skipped, [2020]);
        assert_eq!(report.added, [2019]);

        let db = Database::load_file(&output, ">", CompressionMode::None, &[]).unwrap();
        assert_eq!(db.versions(), [2020, 2019]);
        let zj = db.find_id("330000000000").unwrap().unwrap();
        assert_eq!(zj.versions(), [2020, 2019]);
        let wz = db.find_id("330300000000").unwrap().unwrap();
        assert_eq!(wz.full_name(), "浙江省>温州市");
        assert_eq!(wz.versions(), [2020]);
    }

    #[test]
    fn parents_may_live_in_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("regions.db");
        write(dir.path(), "2021/a.txt", "330300000000\t温州市\n");
        write(dir.path(), "2021/b.txt", "330000000000\t浙江省\n");

        build_database(dir.path(), &output, &[2021], CompressionMode::None).unwrap();
        let db = Database::load_file(&output, "", CompressionMode::None, &[]).unwrap();
        assert_eq!(db.stats().total(), 2);
    }

    #[test]
    fn bad_record_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("regions.db");
        write(dir.path(), "2020/a.txt", "330000000000 浙江省\n");

        let err = build_database(dir.path(), &output, &[2020], CompressionMode::None).unwrap_err();
        assert!(matches!(err, RegionError::InvalidRecord { line: 1, .. }));
        assert!(!output.exists());
    }

    #[test]
    fn missing_year_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("regions.db");
        let err = build_database(dir.path(), &output, &[2018], CompressionMode::None).unwrap_err();
        assert!(matches!(err, RegionError::Io(_)));
    }
}
