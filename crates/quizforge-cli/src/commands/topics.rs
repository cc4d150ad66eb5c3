//! The `quizforge topics` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizforge_core::bank::PICKER_TOPICS;
use quizforge_core::parser::parse_bank_file;
use quizforge_core::QuestionBank;

pub fn execute(bank_path: Option<PathBuf>) -> Result<()> {
    let builtin = QuestionBank::builtin();
    let extra = bank_path.as_deref().map(parse_bank_file).transpose()?;

    let bank = match &extra {
        Some(extra) => builtin.clone().with_overrides(extra.clone()),
        None => builtin.clone(),
    };

    let mut table = Table::new();
    table.set_header(vec!["Topic", "Questions", "Source", "In picker"]);

    for (topic, set) in bank.entries() {
        let from_file = extra.as_ref().is_some_and(|extra| extra.contains(topic));
        let source = match (from_file, builtin.contains(topic)) {
            (true, true) => "bank file (overrides built-in)",
            (true, false) => "bank file",
            _ => "built-in",
        };
        let in_picker = if PICKER_TOPICS.contains(&topic.as_str()) {
            "yes"
        } else {
            ""
        };

        table.add_row(vec![
            Cell::new(topic),
            Cell::new(set.len()),
            Cell::new(source),
            Cell::new(in_picker),
        ]);
    }

    println!("{table}");
    println!(
        "\nUnknown topics use the {} questions when AI generation is unavailable.",
        bank.default_topic()
    );

    Ok(())
}
