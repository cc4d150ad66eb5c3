//! The `quizforge init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizforge.toml").exists() {
        println!("quizforge.toml already exists, skipping.");
    } else {
        std::fs::write("quizforge.toml", SAMPLE_CONFIG)?;
        println!("Created quizforge.toml");
    }

    if std::path::Path::new("bank.toml").exists() {
        println!("bank.toml already exists, skipping.");
    } else {
        std::fs::write("bank.toml", EXAMPLE_BANK)?;
        println!("Created bank.toml");
    }

    println!("\nNext steps:");
    println!("  1. Export OPENAI_API_KEY or HUGGING_FACE_API_KEY (or edit quizforge.toml)");
    println!("  2. Run: quizforge validate --bank bank.toml");
    println!("  3. Run: quizforge play");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizforge configuration

default_provider = "openai"
temperature = 0.7
max_tokens = 1024
question_count = 3
fallback_delay_ms = 2000
bank_path = "bank.toml"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[providers.huggingface]
type = "huggingface"
api_key = "${HUGGING_FACE_API_KEY}"
"#;

const EXAMPLE_BANK: &str = r#"# Extra quiz topics, used when AI generation is unavailable.
# A topic named like a built-in one (React, JavaScript) replaces it.

[[topics]]
name = "Science"

[[topics.questions]]
text = "What is the chemical symbol for water?"
options = ["H2O", "CO2", "O2", "NaCl"]
answer = "H2O"

[[topics.questions]]
text = "Which planet is known as the Red Planet?"
options = ["Venus", "Mars", "Jupiter", "Mercury"]
answer = "Mars"

[[topics]]
name = "History"

[[topics.questions]]
text = "In which year did World War II end?"
options = ["1918", "1939", "1945", "1969"]
answer = "1945"

[[topics.questions]]
text = "Who was the first President of the United States?"
options = ["Abraham Lincoln", "George Washington", "Thomas Jefferson", "John Adams"]
answer = "George Washington"
"#;
