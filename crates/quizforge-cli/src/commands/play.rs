//! The `quizforge play` command.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

use quizforge_core::bank::PICKER_TOPICS;
use quizforge_core::parser::parse_bank_file;
use quizforge_core::traits::LlmProvider;
use quizforge_core::{
    DeliveryOutcome, Mode, QuestionBank, QuizController, QuizGateway, QuizSource,
};
use quizforge_providers::config::load_config_from;
use quizforge_providers::create_provider;

const FUN_FACTS: [&str; 6] = [
    "Bananas are berries, but strawberries aren't.",
    "The first computer bug was an actual moth.",
    "Octopuses have three hearts.",
    "React was created by a Facebook engineer in 2013.",
    "Shakespeare invented over 1,700 words.",
    "Honey never spoils. Archaeologists found 3,000-year-old honey still edible.",
];

pub struct PlayOptions {
    pub topic: Option<String>,
    pub provider: Option<String>,
    pub offline: bool,
    pub fallback_delay_ms: Option<u64>,
    pub bank: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

type Input = Lines<BufReader<Stdin>>;

pub async fn execute(opts: PlayOptions) -> Result<()> {
    let config = load_config_from(opts.config.as_deref())?;

    let bank_path = opts.bank.as_deref().or(config.bank_path.as_deref());
    let bank = load_bank(bank_path)?;

    let selected = if opts.offline {
        None
    } else {
        config.select_provider(opts.provider.as_deref())
    };
    if selected.is_none() && !opts.offline {
        let name = opts.provider.as_deref().unwrap_or(&config.default_provider);
        warn!(provider = %name, "provider not configured, quizzes come from the question bank");
    }

    let mut gateway_config = config.gateway_config(selected.map(|(_, c)| c));
    if let Some(ms) = opts.fallback_delay_ms {
        gateway_config.fallback_delay = Duration::from_millis(ms);
    }

    let provider: Option<Arc<dyn LlmProvider>> = match selected {
        Some((name, provider_config)) => {
            info!(provider = %name, model = %gateway_config.model, "generating quizzes");
            Some(Arc::from(create_provider(provider_config)?))
        }
        None => None,
    };

    let gateway = QuizGateway::new(provider, Arc::new(bank), gateway_config);
    let mut controller = QuizController::new(Arc::new(gateway));
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut first_topic = opts.topic;
    let mut announced = None;

    println!("🎓 quizforge");

    loop {
        match controller.state().mode() {
            Mode::TopicSelect => {
                let topic = match first_topic.take() {
                    Some(topic) => topic,
                    None => match pick_topic(&mut input, controller.gateway().bank()).await? {
                        Some(topic) => topic,
                        None => break,
                    },
                };
                controller.select_topic(topic)?;
            }
            Mode::Loading => {
                let generation = controller.state().generation();
                if announced != Some(generation) {
                    show_loading(&controller);
                    announced = Some(generation);
                }

                let interrupted = tokio::select! {
                    delivery = controller.next_delivery() => {
                        match delivery {
                            Some(DeliveryOutcome::Applied(source)) => show_source(&source),
                            Some(DeliveryOutcome::Stale) => {}
                            None => bail!("no quiz request in flight"),
                        }
                        false
                    }
                    signal = tokio::signal::ctrl_c() => {
                        signal?;
                        true
                    }
                };

                if interrupted {
                    controller.reset();
                    println!("\nCancelled. Back to topics.");
                }
            }
            Mode::Quiz => {
                let Some(option) = ask_question(&mut input, &controller).await? else {
                    break;
                };
                controller.submit_answer(option)?;
            }
            Mode::Result => {
                show_result(&controller);
                match read_line(&mut input, "Try another quiz? [y/N] ").await? {
                    Some(answer) if answer.eq_ignore_ascii_case("y") => controller.reset(),
                    _ => break,
                }
            }
        }
    }

    println!("Thanks for playing!");
    Ok(())
}

fn load_bank(path: Option<&Path>) -> Result<QuestionBank> {
    let builtin = QuestionBank::builtin();
    match path {
        Some(path) => {
            let extra = parse_bank_file(path)?;
            info!(path = %path.display(), topics = extra.entries().len(), "loaded question bank");
            Ok(builtin.with_overrides(extra))
        }
        None => Ok(builtin),
    }
}

/// Topics offered by the picker: the standard six, then any extra bank topics.
fn picker_topics(bank: &QuestionBank) -> Vec<String> {
    let mut topics: Vec<String> = PICKER_TOPICS.iter().map(|t| t.to_string()).collect();
    for topic in bank.topics() {
        if !topics.iter().any(|t| t == topic) {
            topics.push(topic.to_string());
        }
    }
    topics
}

/// Print `prompt` and read one trimmed line. `None` on end of input or
/// Ctrl-C.
async fn read_line(input: &mut Input, prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    std::io::stdout().flush()?;

    tokio::select! {
        line = input.next_line() => Ok(line?.map(|line| line.trim().to_string())),
        signal = tokio::signal::ctrl_c() => {
            signal?;
            println!();
            Ok(None)
        }
    }
}

async fn pick_topic(input: &mut Input, bank: &QuestionBank) -> Result<Option<String>> {
    let topics = picker_topics(bank);

    println!("\nChoose a topic:");
    for (i, topic) in topics.iter().enumerate() {
        println!("  {}. {topic}", i + 1);
    }

    loop {
        let Some(line) = read_line(input, "Topic (number or name, q to quit): ").await? else {
            return Ok(None);
        };
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        match line.parse::<usize>() {
            Ok(n) if (1..=topics.len()).contains(&n) => return Ok(Some(topics[n - 1].clone())),
            Ok(_) => println!("Pick a number between 1 and {}.", topics.len()),
            Err(_) => return Ok(Some(line)),
        }
    }
}

fn show_loading(controller: &QuizController) {
    let state = controller.state();
    let fact = FUN_FACTS[state.generation() as usize % FUN_FACTS.len()];

    println!("\nCreating {} Quiz...", state.topic());
    match controller.gateway().provider_name() {
        Some(name) => println!("Using AI to generate your quiz ({name})... 🤖"),
        None => println!("AI unavailable. Using smart pre-made questions 📚"),
    }
    println!("💡 Fun fact: {fact}");
}

fn show_source(source: &QuizSource) {
    match source {
        QuizSource::Generated { .. } => println!("AI quiz generated successfully! ✨"),
        QuizSource::Fallback(failure) => {
            println!("Using smart pre-made questions 📚 ({failure})")
        }
    }
}

/// Show the current question and read an answer: an option number or the
/// option text itself. `None` on end of input.
async fn ask_question(input: &mut Input, controller: &QuizController) -> Result<Option<String>> {
    let state = controller.state();
    let (Some(question), Some(questions)) = (state.current_question(), state.questions()) else {
        bail!("no question to show");
    };

    println!(
        "\nQuestion {} / {}    Topic: {}",
        state.current_index() + 1,
        questions.len(),
        state.topic()
    );
    println!("{}", question.text);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
    println!("Score: {} / {}", state.score(), state.current_index());

    loop {
        let Some(line) = read_line(input, "Answer: ").await? else {
            return Ok(None);
        };
        if let Some(option) = match_answer(&question.options, &line) {
            return Ok(Some(option.clone()));
        }
        println!("Enter a number from 1 to {}.", question.options.len());
    }
}

/// The option meant by `line`. Option text wins over option numbers, so an
/// option that is itself a numeral is picked by its text.
fn match_answer<'a>(options: &'a [String], line: &str) -> Option<&'a String> {
    options
        .iter()
        .find(|o| *o == line)
        .or_else(|| options.iter().find(|o| o.eq_ignore_ascii_case(line)))
        .or_else(|| {
            let n = line.parse::<usize>().ok()?;
            options.get(n.checked_sub(1)?)
        })
}

fn show_result(controller: &QuizController) {
    let state = controller.state();
    let Some(result) = state.result() else {
        return;
    };

    println!("\nQuiz Completed 🎉");
    println!("{} / {}", result.score, result.total);
    println!("{} Quiz", state.topic());
    println!("{}", result.tier.message());
}
