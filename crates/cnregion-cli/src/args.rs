use clap::{Parser, Subcommand, ValueEnum};
use cnregion_core::{Level, Year};

/// CLI arguments for cnregion
#[derive(Debug, Parser)]
#[command(
    name = "cnregion",
    version,
    about = "CLI for building and querying the China administrative region database"
)]
pub struct CliArgs {
    /// Path to the data file
    #[arg(short = 'i', long = "input", global = true, default_value = "data/regions.db")]
    pub input: String,

    /// Separator used to join full names
    #[arg(short = 's', long = "separator", global = true, default_value = ">")]
    pub separator: String,

    /// Comma-separated list of years to load (e.g. 2023,2022); all when omitted
    #[arg(short = 'y', long = "years", global = true, value_delimiter = ',')]
    pub years: Vec<Year>,

    /// The data file is not gzip framed
    #[arg(long, global = true)]
    pub plain: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log progress to stderr (honours RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compile per-year `<id>\t<name>` files into the data file
    Build {
        /// Directory holding one sub-directory per year
        data_dir: String,
    },

    #[command(flatten)]
    Query(Query),
}

/// Commands answered from an existing data file.
#[derive(Debug, Subcommand)]
pub enum Query {
    /// Show a summary of the database contents
    Stats,

    /// List the data years stored in the file
    Versions,

    /// List all provinces
    Provinces,

    /// List provinces grouped by district
    Districts,

    /// Show a region by its 12 digit ID
    Find {
        /// Region ID, e.g. 330300000000
        id: String,
    },

    /// List the direct children of a region
    Items {
        /// Region ID; empty for the top level
        #[arg(default_value = "")]
        id: String,
    },

    /// Search regions whose name contains a substring
    Search {
        /// Substring of a single region name
        text: String,

        /// Restrict the search to this region's subtree
        #[arg(short, long)]
        parent: Option<String>,

        /// Levels to match; repeat or separate with commas
        #[arg(short, long, value_enum, value_delimiter = ',')]
        level: Vec<LevelArg>,

        /// Maximum number of results, 0 for unlimited
        #[arg(short, long, default_value_t = 0)]
        max: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LevelArg {
    Province,
    City,
    County,
    Town,
    Village,
}

impl From<LevelArg> for Level {
    fn from(level: LevelArg) -> Level {
        match level {
            LevelArg::Province => Level::PROVINCE,
            LevelArg::City => Level::CITY,
            LevelArg::County => Level::COUNTY,
            LevelArg::Town => Level::TOWN,
            LevelArg::Village => Level::VILLAGE,
        }
    }
}

/// Combines repeated `--level` values into one mask; none means all.
pub fn level_mask(levels: &[LevelArg]) -> Level {
    levels
        .iter()
        .fold(Level::NONE, |mask, level| mask | Level::from(*level))
}
