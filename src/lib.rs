//! Umbrella crate for the cnregion workspace; see [`cnregion_core`].

pub use cnregion_core::*;
