//! Tests for reading candidate files (comments, blank rows, normalization)

use std::path::Path;

use domain_reach::input::read_candidate_lines;
use domain_reach::prepare_candidates;
use tempfile::TempDir;

#[tokio::test]
async fn test_reads_candidates_skipping_comments() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input_file = temp_dir.path().join("domains.txt");
    let content = "# Header\n\nexample.com\n   \n# Middle comment\nhttps://Rust-Lang.org\nlocalhost\n";
    std::fs::write(&input_file, content).expect("Failed to write test file");

    let raw = read_candidate_lines(&input_file)
        .await
        .expect("input should be readable");
    assert_eq!(
        raw,
        vec![
            String::new(),
            "example.com".to_string(),
            "   ".to_string(),
            "https://Rust-Lang.org".to_string(),
            "localhost".to_string()
        ]
    );

    let batch = prepare_candidates(raw, None);
    let hosts: Vec<&str> = batch.candidates.iter().map(|c| c.host.as_str()).collect();
    assert_eq!(hosts, vec!["example.com", "rust-lang.org"]);
    // Blank rows count as input rows and are dropped by normalization
    assert_eq!(batch.rows_read, 5);
    assert_eq!(batch.dropped, 3);
}

#[tokio::test]
async fn test_empty_file_yields_no_candidates() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input_file = temp_dir.path().join("empty.txt");
    std::fs::write(&input_file, "").expect("Failed to write test file");

    let raw = read_candidate_lines(&input_file)
        .await
        .expect("input should be readable");
    assert!(raw.is_empty());
}

#[tokio::test]
async fn test_missing_file_is_an_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let missing = temp_dir.path().join("does_not_exist.txt");

    let err = read_candidate_lines(&missing)
        .await
        .expect_err("missing file should fail");
    assert!(format!("{err:#}").contains("Failed to open input file"));
}

#[tokio::test]
async fn test_non_utf8_file_is_an_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input_file = temp_dir.path().join("binary.txt");
    std::fs::write(&input_file, [0xff, 0xfe, b'\n']).expect("Failed to write test file");

    assert!(read_candidate_lines(Path::new(&input_file)).await.is_err());
}
