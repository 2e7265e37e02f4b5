//! Configuration resolution and cache access for the CLI.

use bite::data::cache::{SqliteCache, ZONE_TABLE, ZoneGeometryCache};
use bite::data::raw::RAW_TABLE;
use bite::data::{BiteConfig, DataError};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Get the default saving directory.
///
/// Uses platform-specific data directories:
/// - Linux: `~/.local/share/bite/`
/// - macOS: `~/Library/Application Support/bite/`
/// - Windows: `%APPDATA%\bite\`
pub(crate) fn default_saving_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bite")
}

/// Build the configuration from an optional file and an optional override.
///
/// A saving directory given on the command line wins over the file; with
/// neither, the platform data directory is used.
pub(crate) fn resolve_config(
    config_file: Option<&Path>,
    saving_dir: Option<&Path>,
) -> Result<BiteConfig, DataError> {
    let config = match (config_file, saving_dir) {
        (Some(file), Some(dir)) => BiteConfig::from_json_file(file)?.with_saving_dir(dir),
        (Some(file), None) => BiteConfig::from_json_file(file)?,
        (None, Some(dir)) => BiteConfig::default().with_saving_dir(dir),
        (None, None) => BiteConfig::default().with_saving_dir(default_saving_dir()),
    };
    config.validate()?;
    Ok(config)
}

/// Open the database, creating the saving directory if needed.
pub(crate) fn open_cache(config: &BiteConfig) -> Result<Rc<SqliteCache>, DataError> {
    std::fs::create_dir_all(&config.saving_dir)?;
    Ok(Rc::new(SqliteCache::new(config.database_path())?))
}

/// Print row counts and build times of the cached tables.
pub(crate) fn print_cache_info(config: &BiteConfig) -> Result<(), DataError> {
    let cache = open_cache(config)?;
    let stats = cache.get_stats()?;

    println!("Cache: {}", config.database_path().display());
    for (table, rows) in [
        (ZONE_TABLE, stats.zone_geometries),
        (RAW_TABLE, stats.raw_records),
    ] {
        match (rows, cache.last_build(table)?) {
            (Some(rows), Some(build)) => println!(
                "  {:<18} {:>10} rows  built {}",
                table,
                rows,
                build.built_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            (Some(rows), None) => println!("  {:<18} {:>10} rows", table, rows),
            (None, _) => println!("  {:<18} {:>10}", table, "not built"),
        }
    }
    Ok(())
}

/// Drop the zone geometry cache so the next run rebuilds it.
pub(crate) fn clear_zone_cache(config: &BiteConfig) -> Result<(), DataError> {
    ZoneGeometryCache::new(open_cache(config)?).clear()
}
