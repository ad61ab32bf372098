use anyhow::{Context, Result};
use featherlay_world::{DropTableFile, DropTables};
use std::{fs, path::Path};
use tracing::{info, warn};

/// Load a drop-table pack on top of the built-in tables, falling back to the
/// built-ins when the pack is unreadable or invalid.
///
/// The pack is applied whole or not at all.
pub fn load_drop_tables_lenient(path: &Path) -> DropTables {
    match load_drop_tables(path) {
        Ok(tables) => tables,
        Err(err) => {
            warn!("Ignoring drop tables from {}: {err:#}. Using built-in tables", path.display());
            DropTables::builtin()
        }
    }
}

/// Load a drop-table pack on top of the built-in tables.
pub fn load_drop_tables(path: &Path) -> Result<DropTables> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read drop tables {}", path.display()))?;
    let tables = parse_drop_tables(&contents)
        .with_context(|| format!("Invalid drop tables in {}", path.display()))?;
    info!(path = %path.display(), "Loaded drop tables");
    Ok(tables)
}

fn parse_drop_tables(contents: &str) -> Result<DropTables> {
    let file: DropTableFile = serde_json::from_str(contents)?;
    Ok(DropTables::builtin().with_definitions(&file)?)
}
