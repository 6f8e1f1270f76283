//! End-to-end pipeline tests over the in-process fabric.
//!
//! These run all five roles (coordinator plus four workers) exactly as the
//! `run` command does and assert on the reassembled output file.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use storymill_lib::run_local;

/// Write `content` as the input file, run the full pipeline, and return the
/// output file's text.
fn transform_file(content: &str) -> String {
    transform_file_with(content, 2, 20).1
}

fn transform_file_with(content: &str, threads: usize, batch_size: usize) -> (u64, String) {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("stories.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, content).expect("write input");

    let written =
        run_local(&input, &output, threads, batch_size).expect("pipeline should succeed");
    (written, fs::read_to_string(&output).expect("read output"))
}

#[test]
fn test_single_comedy_paragraph() {
    let out = transform_file("comedy\nab cd\n\n");
    assert_eq!(out, "comedy\naB cD\n\n");
}

#[test]
fn test_single_horror_paragraph() {
    let out = transform_file("horror\nhello\n\n");
    assert_eq!(out, "horror\nhhellllo\n\n");
}

#[test]
fn test_single_fantasy_paragraph() {
    let out = transform_file("fantasy\nthe quick fox\n\n");
    assert_eq!(out, "fantasy\nThe Quick Fox\n\n");
}

#[test]
fn test_science_fiction_reverses_seventh_token() {
    let out = transform_file("science-fiction\na1 b2 c3 d4 e5 f6 g7 h8\n\n");
    assert_eq!(out, "science-fiction\na1 b2 c3 d4 e5 f6 7g h8\n\n");
}

#[test]
fn test_one_paragraph_per_category_keeps_order() {
    let input = "horror\nboo\n\ncomedy\nha ha\n\nfantasy\nelf lord\n\nscience-fiction\nwarp\n\n";
    let (written, out) = transform_file_with(input, 2, 20);
    assert_eq!(written, 4);
    assert_eq!(
        out,
        "horror\nbboo\n\ncomedy\nhA hA\n\nfantasy\nElf Lord\n\nscience-fiction\nwarp\n\n"
    );
}

#[test]
fn test_order_matches_input_regardless_of_category_interleaving() {
    // Many paragraphs, alternating categories, multi-line bodies.
    let mut input = String::new();
    let labels = ["horror", "comedy", "fantasy", "science-fiction"];
    for i in 0..40 {
        input.push_str(labels[i % 4]);
        input.push('\n');
        input.push_str(&format!("body {i} line one\nbody {i} line two\n"));
        input.push('\n');
    }

    let out = transform_file(&input);
    let headers: Vec<&str> = out
        .split("\n\n")
        .filter(|block| !block.is_empty())
        .map(|block| block.lines().next().unwrap())
        .collect();
    let expected: Vec<&str> = (0..40).map(|i| labels[i % 4]).collect();
    assert_eq!(headers, expected);

    // Spot-check that the body text still carries its original index.
    for (i, block) in out.split("\n\n").filter(|b| !b.is_empty()).enumerate() {
        assert!(
            block.contains(&format!("{i} ")) || block.contains(&format!("{i}")),
            "paragraph {i} lost its body: {block:?}"
        );
    }
}

#[test]
fn test_missing_trailing_blank_line_keeps_last_paragraph() {
    // Two paragraphs of the same category, EOF with no trailing blank line:
    // both must survive, untruncated.
    let input = "fantasy\nfirst story\n\nfantasy\nsecond story";
    let (written, out) = transform_file_with(input, 2, 20);
    assert_eq!(written, 2);
    assert_eq!(out, "fantasy\nFirst Story\n\nfantasy\nSecond Story\n\n");
}

#[test]
fn test_multi_line_paragraph_spanning_batches() {
    let body: String = (0..55).map(|i| format!("word number{i}\n")).collect();
    let input = format!("fantasy\n{body}\n");

    // Batch size 10 forces several pool jobs per paragraph.
    let (_, out) = transform_file_with(&input, 3, 10);
    let expected_body: String = (0..55).map(|i| format!("Word Number{i}\n")).collect();
    assert_eq!(out, format!("fantasy\n{expected_body}\n"));
}

#[test]
fn test_empty_input_produces_empty_output() {
    let (written, out) = transform_file_with("", 1, 20);
    assert_eq!(written, 0);
    assert_eq!(out, "");
}

#[test]
fn test_unreadable_input_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.txt");
    let output = dir.path().join("out.txt");
    assert!(run_local(Path::new(&missing), &output, 1, 20).is_err());
}
