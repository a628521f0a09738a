// crates/cnregion-core/src/error.rs

//! Error type shared by every module of the crate.

use crate::years::Year;
use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum RegionError {
    /// A region ID does not have the fixed 12 character width.
    #[error("invalid region id length: expected {expected} characters, got {found:?}")]
    InvalidLength { expected: usize, found: String },

    /// A region ID (or a partial ID) cannot be split, filled or inserted.
    #[error("invalid region id {id:?}: {reason}")]
    InvalidId { id: String, reason: &'static str },

    /// The data file was written with another format version.
    #[error("incompatible data file: format version {found}, expected {expected}")]
    IncompatibleVersion { expected: u32, found: u32 },

    /// The year has not been registered on the database.
    #[error("year {0} is not a registered version of this database")]
    UnknownVersion(Year),

    /// A sibling with the same short ID already exists.
    #[error("a region with id {0:?} already exists at this level")]
    DuplicateId(String),

    /// The parent path of an inserted region does not exist.
    #[error("parent region {0:?} not found")]
    ParentNotFound(String),

    /// A load filter asked for a year the data file does not contain.
    #[error("data file has no data for year {0}")]
    MissingVersion(Year),

    /// The supported-years bitmask cannot address more versions.
    #[error("too many versions: at most {max} years can be stored")]
    TooManyVersions { max: usize },

    /// The region name contains one of the wire delimiters.
    #[error("region name {0:?} contains a reserved character (':', '{{' or '}}')")]
    InvalidName(String),

    /// The year lies outside the published range.
    #[error("invalid year {year}: must be within [{start}, {latest}]")]
    InvalidYear { year: Year, start: Year, latest: Year },

    /// A level value is not a single administrative level.
    #[error("invalid level bits {0:#07b}")]
    InvalidLevel(u8),

    /// The serialized data is structurally invalid.
    #[error("malformed data at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: String },

    /// An ingest line is not `<id>\t<name>`.
    #[error("invalid record on line {line}: {text:?}")]
    InvalidRecord { line: usize, text: String },

    /// The request cannot be served with the compiled feature set.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenience `Result` type alias using the crate's [`RegionError`].
pub type Result<T> = std::result::Result<T, RegionError>;

impl RegionError {
    pub(crate) fn invalid_id(id: impl Into<String>, reason: &'static str) -> Self {
        RegionError::InvalidId {
            id: id.into(),
            reason,
        }
    }

    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        RegionError::Malformed {
            offset,
            reason: reason.into(),
        }
    }
}
