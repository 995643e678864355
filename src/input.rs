//! Newline-delimited candidate input.
//!
//! The bundled binary reads one candidate per line from a file or stdin. Lines
//! starting with `#` are skipped; everything else, blank lines included, is
//! handed to the normalizer unchanged and counts as an input row.

use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Reads raw candidates from `path`, or from stdin when `path` is `-`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a line cannot be read.
pub async fn read_candidate_lines(path: &Path) -> Result<Vec<String>> {
    if path.as_os_str() == "-" {
        info!("Reading domains from stdin");
        return read_candidates_from(BufReader::new(tokio::io::stdin()))
            .await
            .context("Failed to read domains from stdin");
    }

    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open input file {}", path.display()))?;
    let candidates = read_candidates_from(BufReader::new(file))
        .await
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    info!("Read {} candidate lines from {}", candidates.len(), path.display());
    Ok(candidates)
}

/// Collects candidate lines from any buffered reader.
pub async fn read_candidates_from<R>(reader: R) -> std::io::Result<Vec<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut candidates = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if line.trim_start().starts_with('#') {
            continue;
        }
        candidates.push(line);
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_skips_comments_and_keeps_blank_rows() {
        let input = "# header\nexample.com\n\n   \n  # indented comment\n\tBB.co \n";
        let candidates = read_candidates_from(input.as_bytes()).await.unwrap();
        assert_eq!(
            candidates,
            vec![
                "example.com".to_string(),
                String::new(),
                "   ".to_string(),
                "\tBB.co ".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_handles_crlf_and_missing_trailing_newline() {
        let input = "a.com\r\nb.com";
        let candidates = read_candidates_from(input.as_bytes()).await.unwrap();
        assert_eq!(candidates, vec!["a.com".to_string(), "b.com".to_string()]);
    }
}
