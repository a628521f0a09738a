// crates/cnregion-core/src/loader/mod.rs

//! # Data Loader
//!
//! Handles the physical layer (files, gzip framing) and delegates the
//! payload to the text codec in [`crate::model::codec`].

use crate::error::Result;
use crate::model::Database;
use crate::years::Year;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

pub(crate) mod common_io;

#[cfg(feature = "builder")]
pub mod builder;

/// Framing of a data file on disk.
///
/// Framing is not detected from the content; the reader must use the
/// mode the file was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    Gzip,
    None,
}

impl Default for CompressionMode {
    /// Gzip when the `compact` feature is enabled.
    fn default() -> Self {
        #[cfg(feature = "compact")]
        {
            CompressionMode::Gzip
        }
        #[cfg(not(feature = "compact"))]
        {
            CompressionMode::None
        }
    }
}

impl Database {
    /// Decodes an in-memory data file.
    ///
    /// See [`Database::from_bytes`] for the meaning of `years`.
    pub fn load(
        data: &[u8],
        separator: &str,
        compression: CompressionMode,
        years: &[Year],
    ) -> Result<Self> {
        Self::load_from_reader(data, separator, compression, years)
    }

    /// Reads a whole data file from `reader`.
    pub fn load_from_reader<R: Read>(
        reader: R,
        separator: &str,
        compression: CompressionMode,
        years: &[Year],
    ) -> Result<Self> {
        let mut stream = common_io::decode_stream(reader, compression)?;
        let mut data = Vec::new();
        stream.read_to_end(&mut data)?;
        Self::from_bytes(&data, separator, years)
    }

    pub fn load_file(
        path: impl AsRef<Path>,
        separator: &str,
        compression: CompressionMode,
        years: &[Year],
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let db = Self::load_from_reader(BufReader::new(file), separator, compression, years)?;

        info!(
            path = %path.display(),
            versions = ?db.versions(),
            "loaded region database"
        );
        Ok(db)
    }

    /// Writes the database to `path`, replacing any existing file.
    pub fn dump(&self, path: impl AsRef<Path>, compression: CompressionMode) -> Result<()> {
        let path = path.as_ref();
        let data = self.to_bytes()?;
        common_io::write_stream(path, &data, compression)?;

        info!(
            path = %path.display(),
            bytes = data.len(),
            ?compression,
            "dumped region database"
        );
        Ok(())
    }
}
