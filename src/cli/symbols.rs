use super::ui;
use crate::core::{SymbolCatalogEntry, SymbolsCatalog};
use anyhow::{Context, Result};
use comfy_table::Cell;

pub fn display_as_table(entries: &[SymbolCatalogEntry]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Name")]);
    for entry in entries {
        table.add_row(vec![Cell::new(&entry.code), Cell::new(&entry.name)]);
    }
    table.to_string()
}

pub async fn run(catalog: &SymbolsCatalog) -> Result<()> {
    let pb = ui::new_spinner("Fetching currency symbols...");
    let result = catalog.refresh().await;
    pb.finish_and_clear();
    result.context("Failed to get currency symbols. Please try again later")?;

    println!("{}", display_as_table(&catalog.entries().await));
    Ok(())
}
