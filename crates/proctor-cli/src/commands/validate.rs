//! The `proctor validate` command.

use std::path::PathBuf;

use anyhow::Result;

use proctor_core::authoring::validate_for_publish;

pub fn execute(test_path: PathBuf) -> Result<()> {
    let definitions = if test_path.is_dir() {
        proctor_core::parser::load_definition_directory(&test_path)?
    } else {
        vec![proctor_core::parser::parse_definition(&test_path)?]
    };

    let mut total_warnings = 0;
    let mut failures = 0;

    for definition in &definitions {
        println!(
            "Test: {} ({} questions, {} points)",
            definition.title(),
            definition.question_count(),
            definition.total_points()
        );

        if let Err(e) = validate_for_publish(definition) {
            println!("  NOT PUBLISHABLE: {e}");
            failures += 1;
        }

        let warnings = proctor_core::parser::definition_warnings(definition);
        for w in &warnings {
            println!("  WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if failures > 0 {
        anyhow::bail!("{failures} test(s) cannot be published");
    }

    if total_warnings == 0 {
        println!("All tests publishable.");
    } else {
        println!("\nAll tests publishable, {total_warnings} warning(s) found.");
    }

    Ok(())
}
