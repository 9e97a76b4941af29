// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use perfgraph::*;

use std::fs;
use std::path::PathBuf;
use std::process::Command;

/// A scratch directory removed when the test finishes.
struct Scratch(PathBuf);

impl Scratch {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "perfgraph-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        Scratch(dir)
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.0.join(name);
        fs::write(&path, content).unwrap();
        path
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|w| w == needle.as_bytes())
}

const RESULTS: &str = r#"{"query":"elias_fano::access", "seed":13, "sequence_lengths":[1024,2048,4096], "avg_ns_per_query":[21.5,24.75,30.0]}

{"query":"elias_fano::next_geq", "seed":13, "sequence_lengths":[1024,2048,4096], "avg_ns_per_query":[40.0,44.0,52.0]}
{"sequence_lengths":[1024,4096], "avg_ns_per_query":[9.0,11.0]}
"#;

#[test]
fn renders_report_next_to_input() {
    let scratch = Scratch::new("report");
    let input = scratch.file("results.json", RESULTS);

    let output = run(&input, &Render::default()).unwrap();

    assert_eq!(output, scratch.0.join("results.pdf"));
    let document = fs::read(&output).unwrap();
    assert!(document.starts_with(b"%PDF-"));
    assert!(contains(&document, "(elias_fano::access) Tj"));
    assert!(contains(&document, "(elias_fano::next_geq) Tj"));
    assert!(contains(&document, "(Query 3) Tj"));
    assert!(contains(&document, "(sequence length) Tj"));
    assert!(contains(&document, "(avg. ns/query) Tj"));
    // 2 rows of 432x288 point cells
    assert!(contains(&document, "/MediaBox [0 0 864 576]"));
}

#[test]
fn single_entry_with_power_of_two_ticks() {
    let scratch = Scratch::new("single");
    let input = scratch.file(
        "q1.json",
        r#"{"sequence_lengths": [1,2,4,8], "avg_ns_per_query": [10,20,15,30], "query": "Q1"}"#,
    );

    let output = run(&input, &Render::default()).unwrap();
    let document = fs::read(&output).unwrap();

    assert!(contains(&document, "(Q1) Tj"));
    assert!(!contains(&document, "(Query 2) Tj"));
    for exponent in 0..4 {
        assert!(contains(&document, &format!("({}) Tj", exponent)));
    }
    assert!(contains(&document, "/MediaBox [0 0 864 288]"));
}

#[test]
fn overwrites_existing_report() {
    let scratch = Scratch::new("overwrite");
    let input = scratch.file("results.json", RESULTS);
    let stale = scratch.file("results.pdf", "stale");

    run(&input, &Render::default()).unwrap();

    assert!(fs::read(&stale).unwrap().starts_with(b"%PDF-"));
}

#[test]
fn range_ticks_and_independent_axes() {
    let scratch = Scratch::new("range");
    let input = scratch.file("results.jsonl", RESULTS);
    let mut settings = Render::default();
    settings.set_ticks(TickStrategy::Range);
    settings.set_shared_y(false);
    settings.set_marker_size(0);

    let output = run(&input, &settings).unwrap();

    assert_eq!(output.file_name().unwrap(), "results.pdf");
    let document = fs::read(&output).unwrap();
    assert!(document.starts_with(b"%PDF-"));
    assert!(contains(&document, "(Query 3) Tj"));
}

#[test]
fn empty_input_is_an_error() {
    let scratch = Scratch::new("empty");
    let input = scratch.file("empty.json", "\n   \n");

    match run(&input, &Render::default()) {
        Err(Error::EmptyDataset { path }) => assert_eq!(path, input),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!scratch.0.join("empty.pdf").exists());
}

#[test]
fn malformed_input_writes_nothing() {
    let scratch = Scratch::new("malformed");
    let input = scratch.file(
        "bad.json",
        "{\"sequence_lengths\":[1],\"avg_ns_per_query\":[1]}\n{\"sequence_lengths\":[1,2]\n",
    );

    match run(&input, &Render::default()) {
        Err(Error::Parse { line, .. }) => assert_eq!(line, 2),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!scratch.0.join("bad.pdf").exists());
}

#[test]
fn invalid_entry_writes_nothing() {
    let scratch = Scratch::new("invalid");
    let input = scratch.file(
        "zero.json",
        "{\"sequence_lengths\":[0,2],\"avg_ns_per_query\":[1,2]}\n",
    );

    match run(&input, &Render::default()) {
        Err(Error::Validation { line, source, .. }) => {
            assert_eq!(line, 1);
            assert_eq!(source, Invalid::NonPositiveLength(0.0));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!scratch.0.join("zero.pdf").exists());
}

#[test]
fn missing_input_file() {
    let scratch = Scratch::new("missing");
    match run(&scratch.0.join("nope.json"), &Render::default()) {
        Err(Error::Io { .. }) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn refuses_to_replace_pdf_input() {
    let scratch = Scratch::new("collision");
    let input = scratch.file("results.pdf", RESULTS);

    match run(&input, &Render::default()) {
        Err(Error::OutputCollision { .. }) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(fs::read_to_string(&input).unwrap(), RESULTS);
}

#[test]
fn cli_without_argument_prints_usage() {
    let output = Command::new(env!("CARGO_BIN_EXE_perfgraph"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("USAGE"), "{}", stdout);
}

#[test]
fn cli_prints_confirmation() {
    let scratch = Scratch::new("cli");
    let input = scratch.file("results.json", RESULTS);

    let output = Command::new(env!("CARGO_BIN_EXE_perfgraph"))
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim_end(),
        format!("Plot saved to {}", scratch.0.join("results.pdf").display())
    );
}

#[test]
fn cli_reports_failures() {
    let scratch = Scratch::new("cli-fail");
    let input = scratch.file("bad.json", "nope\n");

    let output = Command::new(env!("CARGO_BIN_EXE_perfgraph"))
        .arg(&input)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}

#[test]
fn oversized_figure_writes_nothing() {
    let scratch = Scratch::new("oversized");
    let input = scratch.file("results.json", RESULTS);
    let mut settings = Render::default();
    settings.set_panel_size((432, u32::MAX));

    match run(&input, &settings) {
        Err(Error::Render(message)) => assert!(message.contains("exceed"), "{}", message),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!scratch.0.join("results.pdf").exists());
}

#[test]
fn latin1_titles_keep_their_glyphs() {
    let scratch = Scratch::new("latin1");
    let input = scratch.file(
        "accents.json",
        "{\"query\":\"r\u{e9}sum\u{e9}\", \"sequence_lengths\":[2,4], \"avg_ns_per_query\":[1.5,2.5]}\n",
    );

    let output = run(&input, &Render::default()).unwrap();
    let document = fs::read(&output).unwrap();

    assert!(contains(&document, "/WinAnsiEncoding"));
    assert!(!contains(&document, "(r?sum?) Tj"));
}
