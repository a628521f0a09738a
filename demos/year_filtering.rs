//! Working with several data years.
//!
//! Regions appear and disappear between releases. This example builds a
//! two-year database, then restricts it to one year twice: at load time
//! and through a view.

use cnregion_rs::prelude::*;
use cnregion_rs::Result;

fn main() -> Result<()> {
    let mut db = Database::with_separator(">");
    db.add_version(2023)?;
    db.add_version(2022)?;

    db.ingest(
        2022,
        "330000000000\t浙江省\n330300000000\t温州市\n110000000000\t北京市\n".as_bytes(),
    )?;
    db.ingest(
        2023,
        "330000000000\t浙江省\n330400000000\t嘉兴市\n650000000000\t新疆维吾尔自治区\n".as_bytes(),
    )?;

    println!("--- Whole database ---");
    for province in db.provinces() {
        println!("{} {:?}", province.name(), province.versions());
    }

    println!("\n--- Loaded with the 2022 filter ---");
    let data = db.to_bytes()?;
    let only_2022 = Database::load(&data, ">", CompressionMode::None, &[2022])?;
    println!("versions: {:?}", only_2022.versions());
    println!("嘉兴 present: {}", only_2022.find_id("330400000000")?.is_some());

    println!("\n--- 2023 view by district ---");
    let view = db.view(&[2023])?;
    for district in view.districts() {
        let names: Vec<_> = district.items().iter().map(|p| p.name().to_string()).collect();
        println!("{} {:?}", district.name(), names);
    }

    println!("\n--- Cities in the 2023 view ---");
    for city in view.search(&SearchOptions::new("").level(Level::CITY))? {
        println!("{} {:?}", city.full_name(), city.versions());
    }

    Ok(())
}
