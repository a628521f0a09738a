//! Error handling example for cnregion-rs
//!
//! Every fallible operation returns a [`RegionError`]; this example
//! triggers the common ones and matches on them.

use cnregion_rs::prelude::*;

fn main() {
    let mut db = Database::with_separator(">");
    let _ = db.add_version(2023);

    // Years must be registered before use
    match db.add_item("330000000000", "浙江省", 2001) {
        Err(RegionError::UnknownVersion(year)) => println!("✓ unknown year {year}"),
        other => println!("unexpected: {other:?}"),
    }

    // IDs are 12 digits
    match db.add_item("3300", "浙江省", 2023) {
        Err(e @ RegionError::InvalidLength { .. }) => println!("✓ {e}"),
        other => println!("unexpected: {other:?}"),
    }

    // Parents are inserted first
    match db.add_item("330300000000", "温州市", 2023) {
        Err(RegionError::ParentNotFound(parent)) => println!("✓ missing parent {parent}"),
        other => println!("unexpected: {other:?}"),
    }

    // Corrupt data never yields a partial tree
    match Database::load(b"1:[2023]:::0:1{33:", ">", CompressionMode::None, &[]) {
        Err(e @ RegionError::Malformed { .. }) => println!("✓ {e}"),
        other => println!("unexpected: {other:?}"),
    }

    // Files from another format version are refused
    match Database::load(b"9:[2023]:::0:0{}", ">", CompressionMode::None, &[]) {
        Err(RegionError::IncompatibleVersion { expected, found }) => {
            println!("✓ format {found}, expected {expected}")
        }
        other => println!("unexpected: {other:?}"),
    }

    // Missing files surface as I/O errors
    match Database::load_file("does/not/exist.db", ">", CompressionMode::None, &[]) {
        Err(RegionError::Io(e)) => println!("✓ io: {e}"),
        other => println!("unexpected: {other:?}"),
    }
}
