//! cnregion: command-line interface for cnregion-core
//!
//! Builds the region data file from crawled text files and answers
//! queries against it.
//!
//! Usage examples
//! --------------
//!
//! - Compile `data/<year>/*.txt` into the data file
//!   $ cnregion build data
//!
//! - Show overall stats, or only the 2023 data
//!   $ cnregion stats
//!   $ cnregion --years 2023 stats
//!
//! - List provinces grouped by district
//!   $ cnregion districts
//!
//! - Look a region up, or list its children
//!   $ cnregion find 330300000000
//!   $ cnregion items 330300000000
//!
//! - Search by name, limited to cities and counties
//!   $ cnregion search 温州 --level city,county
//!
//! Add `--json` to any query for machine readable output and `--plain`
//! for data files written without gzip framing.
mod args;

use crate::args::{level_mask, CliArgs, Commands, Query};
use anyhow::Context;
use clap::Parser;
use cnregion_core::api::RegionRecord;
use cnregion_core::{CompressionMode, Database, RegionInfo, RegionSearch, SearchOptions};

fn init_tracing(args: &CliArgs) {
    // Quiet unless --verbose; RUST_LOG refines the level under --verbose.
    let filter = if args.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("off")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_tracing(&args);

    let compression = if args.plain {
        CompressionMode::None
    } else {
        CompressionMode::Gzip
    };

    match &args.command {
        Commands::Build { data_dir } => build(data_dir, &args, compression),
        Commands::Query(query) => run_query(query, &args, compression),
    }
}

fn run_query(query: &Query, args: &CliArgs, compression: CompressionMode) -> anyhow::Result<()> {
    tracing::debug!(input = %args.input, years = ?args.years, "loading data file");
    let db = Database::load_file(&args.input, &args.separator, compression, &args.years)
        .with_context(|| format!("failed to load {}", args.input))?;
    let view = db.view(&[])?;

    match query {
        Query::Stats => {
            let stats = db.stats();
            println!("Database statistics:");
            println!("  Versions: {:?}", db.versions());
            println!("  Provinces: {}", stats.provinces);
            println!("  Cities: {}", stats.cities);
            println!("  Counties: {}", stats.counties);
            println!("  Towns: {}", stats.towns);
            println!("  Villages: {}", stats.villages);
            println!("  Total: {}", stats.total());
        }

        Query::Versions => {
            for year in db.versions() {
                println!("{year}");
            }
        }

        Query::Provinces => {
            let records: Vec<_> = view.provinces().iter().map(RegionRecord::from).collect();
            print_records(&records, args.json)?;
        }

        Query::Districts => {
            if args.json {
                let records: Vec<_> = view.districts().iter().map(RegionRecord::from).collect();
                print_records(&records, true)?;
            } else {
                for district in view.districts() {
                    println!("{} {}", district.id(), district.name());
                    for province in district.items() {
                        println!("  - {} {}", province.full_id(), province.name());
                    }
                }
            }
        }

        Query::Find { id } => match view.find(id)? {
            Some(region) => print_records(&[RegionRecord::from(&region)], args.json)?,
            None => eprintln!("No region found for: {id}"),
        },

        Query::Items { id } => match view.find(id)? {
            Some(region) => {
                let records: Vec<_> = region.items().iter().map(RegionRecord::from).collect();
                print_records(&records, args.json)?;
            }
            None => eprintln!("No region found for: {id}"),
        },

        Query::Search {
            text,
            parent,
            level,
            max,
        } => {
            let mut opts = SearchOptions::new(text.as_str())
                .level(level_mask(level))
                .max(*max);
            opts.parent = parent.clone();

            let hits = view.search(&opts)?;
            if hits.is_empty() && !args.json {
                println!("No regions found matching: {text}");
            } else {
                let records: Vec<_> = hits.iter().map(RegionRecord::from).collect();
                print_records(&records, args.json)?;
            }
        }
    }

    Ok(())
}

#[cfg(feature = "builder")]
fn build(data_dir: &str, args: &CliArgs, compression: CompressionMode) -> anyhow::Result<()> {
    use cnregion_core::years;

    if let Some(year) = args.years.iter().find(|y| !years::is_valid(**y)) {
        anyhow::bail!(
            "no data published for {year}; years range from {} to {}",
            years::START,
            years::LATEST
        );
    }

    let report = cnregion_core::build_database(
        data_dir.as_ref(),
        args.input.as_ref(),
        &args.years,
        compression,
    )
    .with_context(|| format!("failed to build {} from {data_dir}", args.input))?;

    for year in &report.skipped {
        println!("Year {year} already present, skipped");
    }
    for year in &report.added {
        println!("Added year {year}");
    }
    println!("{} records written to {}", report.records, args.input);
    Ok(())
}

#[cfg(not(feature = "builder"))]
fn build(_: &str, _: &CliArgs, _: CompressionMode) -> anyhow::Result<()> {
    anyhow::bail!("this binary was built without the 'builder' feature")
}

fn print_records(records: &[RegionRecord], json: bool) -> anyhow::Result<()> {
    if json {
        #[cfg(feature = "json")]
        {
            println!("{}", cnregion_core::api::to_json_array(records)?);
            return Ok(());
        }
        #[cfg(not(feature = "json"))]
        {
            anyhow::bail!("this binary was built without the 'json' feature");
        }
    }

    for record in records {
        let level = record.level.as_deref().unwrap_or("-");
        println!("{} {:<8} {}", record.full_id, level, record.full_name);
    }
    Ok(())
}
