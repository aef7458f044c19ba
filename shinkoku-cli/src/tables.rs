//! Loading alternative statutory tables from TOML.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use shinkoku_core::TaxTable;

/// Reads a [`TaxTable`] from a TOML file and validates it before use.
///
/// The file holds `surtax_rate` plus a `[[brackets]]` array; the last
/// bracket omits `upper_limit` to mark the open-ended top bracket. Amounts
/// and rates may be written as strings to keep them exact.
pub fn load_tax_table(path: &Path) -> Result<TaxTable> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("cannot read tax table file: {}", path.display()))?;

    let table: TaxTable = toml::from_str(&contents)
        .with_context(|| format!("cannot parse tax table file: {}", path.display()))?;

    table
        .validate()
        .with_context(|| format!("invalid tax table file: {}", path.display()))?;

    Ok(table)
}
