//! The `proctor list` command.
//!
//! Loads a directory of definitions into a catalog, the same registry the
//! operator panel browses, and prints the published view.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use proctor_catalog::Catalog;

pub fn execute(dir: PathBuf) -> Result<()> {
    let definitions = proctor_core::parser::load_definition_directory(&dir)?;

    if definitions.is_empty() {
        println!("No test definitions found in {}.", dir.display());
        return Ok(());
    }

    let mut catalog = Catalog::new();
    for definition in definitions {
        let title = definition.title().to_string();
        if let Err(e) = catalog.publish(definition) {
            println!("Skipping '{title}': {e}");
        }
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Title",
        "Category",
        "Questions",
        "Points",
        "Duration",
    ]);

    for definition in catalog.list() {
        table.add_row(vec![
            Cell::new(definition.title()),
            Cell::new(definition.category()),
            Cell::new(definition.question_count()),
            Cell::new(definition.total_points()),
            Cell::new(format!("{} min", definition.duration_minutes())),
        ]);
    }

    println!("{table}");

    let stats = catalog.stats();
    println!(
        "{} test(s), {} active, {} questions",
        stats.total_tests, stats.active_tests, stats.total_questions
    );

    Ok(())
}
