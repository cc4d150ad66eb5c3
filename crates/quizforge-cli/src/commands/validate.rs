//! The `quizforge validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let bank = quizforge_core::parser::parse_bank_file(&bank_path)?;

    println!(
        "Question bank: {} ({} topics)",
        bank_path.display(),
        bank.entries().len()
    );
    for (topic, set) in bank.entries() {
        println!("  {topic}: {} question(s)", set.len());
    }

    let warnings = quizforge_core::parser::validate_bank(&bank);
    for w in &warnings {
        let prefix = w
            .topic
            .as_ref()
            .map(|topic| format!("  [{topic}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Question bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
