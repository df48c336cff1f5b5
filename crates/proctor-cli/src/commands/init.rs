//! The `proctor init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    std::fs::create_dir_all("test-bank")?;
    let test_path = std::path::Path::new("test-bank/example.toml");
    if test_path.exists() {
        println!("test-bank/example.toml already exists, skipping.");
    } else {
        std::fs::write(test_path, EXAMPLE_TEST)?;
        println!("Created test-bank/example.toml");
    }

    let answers_path = std::path::Path::new("example-answers.toml");
    if answers_path.exists() {
        println!("example-answers.toml already exists, skipping.");
    } else {
        std::fs::write(answers_path, EXAMPLE_ANSWERS)?;
        println!("Created example-answers.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit test-bank/example.toml with your questions");
    println!("  2. Run: proctor validate --test test-bank/example.toml");
    println!("  3. Run: proctor take --test test-bank/example.toml --answers example-answers.toml");

    Ok(())
}

const EXAMPLE_TEST: &str = r#"[test]
title = "Grade 9 Mathematics"
description = "Algebra and geometry fundamentals"
category = "Mathematics"
duration_minutes = 30

[[questions]]
id = "square-of-sum"
text = "What is the square of a sum, (a + b)^2?"
type = "single"
options = ["a^2 + b^2", "a^2 + 2ab + b^2", "a^2 - 2ab + b^2", "2a + 2b"]
correct = "a^2 + 2ab + b^2"
points = 5

[[questions]]
id = "triangle-facts"
text = "Select every true statement about triangles"
type = "multiple"
options = [
    "The angles of a triangle sum to 180 degrees",
    "A right triangle has one 90 degree angle",
    "All sides of an isosceles triangle are equal",
]
correct = [
    "The angles of a triangle sum to 180 degrees",
    "A right triangle has one 90 degree angle",
]
points = 10

[[questions]]
id = "solve-linear"
text = "Solve 2x + 5 = 13 and enter the value of x"
type = "input"
correct = "4"
points = 8

# Bands must cover 0-100 with no gaps or overlaps.
[[grading]]
min = 85
max = 100
grade = "5"
description = "Excellent"

[[grading]]
min = 70
max = 84
grade = "4"
description = "Good"

[[grading]]
min = 50
max = 69
grade = "3"
description = "Satisfactory"

[[grading]]
min = 0
max = 49
grade = "2"
description = "Unsatisfactory"
"#;

const EXAMPLE_ANSWERS: &str = r#"# Answers keyed by question id. Use a string for single/input
# questions and an array for multiple-choice questions.

[answers]
square-of-sum = "a^2 + 2ab + b^2"
triangle-facts = [
    "The angles of a triangle sum to 180 degrees",
    "A right triangle has one 90 degree angle",
]
solve-linear = "4"
"#;
