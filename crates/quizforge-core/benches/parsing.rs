use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizforge_core::translate::translate_questions;

fn bench_translate(c: &mut Criterion) {
    let mut group = c.benchmark_group("translate");

    let json = generate_json(3);

    let fenced = format!("Here is your quiz:\n\n```json\n{json}\n```\n\nHave fun!");

    let lettered = "Q1. Which hook manages state? A) useState B) useEffect C) useMemo D) useRef. Answer: A. \
                    Q2. What does JSX compile to? A) HTML B) Function calls C) CSS D) JSON. Answer: B.";

    let large = generate_json(200);

    group.bench_function("json", |b| b.iter(|| translate_questions(black_box(&json))));

    group.bench_function("fenced_json", |b| {
        b.iter(|| translate_questions(black_box(&fenced)))
    });

    group.bench_function("lettered", |b| {
        b.iter(|| translate_questions(black_box(lettered)))
    });

    group.bench_function("200_questions", |b| {
        b.iter(|| translate_questions(black_box(&large)))
    });

    group.finish();
}

fn bench_toml_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("toml_parsing");

    let small_toml = generate_bank_toml(5);
    let large_toml = generate_bank_toml(100);

    group.bench_function("5_topics", |b| {
        b.iter(|| {
            quizforge_core::parser::parse_bank_str(
                black_box(&small_toml),
                black_box("bench.toml".as_ref()),
            )
        })
    });

    group.bench_function("100_topics", |b| {
        b.iter(|| {
            quizforge_core::parser::parse_bank_str(
                black_box(&large_toml),
                black_box("bench.toml".as_ref()),
            )
        })
    });

    group.finish();
}

fn generate_json(n: usize) -> String {
    let items: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#"{{"question": "Question {i}?", "options": ["a{i}", "b{i}", "c{i}", "d{i}"], "answer": "c{i}"}}"#
            )
        })
        .collect();
    format!("[{}]", items.join(",\n"))
}

fn generate_bank_toml(n: usize) -> String {
    let mut s = String::new();
    for i in 0..n {
        s.push_str(&format!(
            r#"
[[topics]]
name = "Topic {i}"

[[topics.questions]]
text = "First question {i}?"
options = ["a", "b", "c", "d"]
answer = "a"

[[topics.questions]]
text = "Second question {i}?"
options = ["w", "x", "y", "z"]
answer = "z"
"#
        ));
    }
    s
}

criterion_group!(benches, bench_translate, bench_toml_parsing);
criterion_main!(benches);
