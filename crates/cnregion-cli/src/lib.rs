//! cnregion-cli
//! ============
//!
//! Command-line interface for the `cnregion-core` region database.
//!
//! This crate primarily provides a binary (`cnregion`). The library target
//! exists so that docs.rs renders this overview.
//!
//! Quick start
//! -----------
//!
//! ```text
//! cnregion --help
//! cnregion build data
//! cnregion --years 2023 districts
//! cnregion search 温州 --level city --json
//! ```
//!
//! For programmatic access use the [`cnregion-core`] crate directly.
//!
//! [`cnregion-core`]: https://docs.rs/cnregion-core
#![cfg_attr(docsrs, feature(doc_cfg))]
