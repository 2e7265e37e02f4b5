//! Glue between the command line and the pipeline crates.
//!
//! Resolves the configuration from flags and files and opens the local
//! database for cache maintenance.

pub(crate) mod cache_manager;
