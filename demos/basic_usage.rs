//! Basic usage example for cnregion-rs
//!
//! This example demonstrates how to:
//! - Register data years and add regions
//! - Look regions up by ID and walk their children
//! - Search by name
//! - Dump the database to disk and load it back

use cnregion_rs::prelude::*;
use cnregion_rs::Result;

fn main() -> Result<()> {
    println!("=== cnregion-rs Basic Usage Example ===\n");

    let mut db = Database::with_separator(">");
    db.add_version(2023)?;
    let records = "\
330000000000\t浙江省
330300000000\t温州市
330302000000\t鹿城区
330305000000\t洞头区
340000000000\t安徽省
340100000000\t合肥市
";
    let added = db.ingest(2023, records.as_bytes())?;
    println!("✓ Ingested {added} records\n");

    // Example 1: Provinces
    println!("--- Example 1: List all provinces ---");
    for (i, province) in db.provinces().iter().enumerate() {
        println!("{}. {} ({})", i + 1, province.name(), province.full_id());
    }
    println!();

    // Example 2: Lookup by ID
    println!("--- Example 2: Find a region by ID ---");
    if let Some(city) = db.find_id("330300000000")? {
        println!("Found: {}", city.full_name());
        println!("Level: {}", city.level());
        println!("Years: {:?}", city.versions());
        for county in city.items() {
            println!("  - {} {}", county.full_id(), county.name());
        }
    }
    println!();

    // Example 3: Search
    println!("--- Example 3: Search by name ---");
    let opts = SearchOptions::new("区").level(Level::COUNTY);
    for hit in db.search(&opts)? {
        println!("- {}", hit.full_name());
    }
    println!();

    // Example 4: Dump and load
    println!("--- Example 4: Dump and load ---");
    let path = std::env::temp_dir().join("cnregion-basic-usage.db");
    db.dump(&path, CompressionMode::default())?;
    let loaded = Database::load_file(&path, "-", CompressionMode::default(), &[])?;
    println!("Loaded {} regions from {}", loaded.stats().total(), path.display());
    std::fs::remove_file(&path)?;

    Ok(())
}
