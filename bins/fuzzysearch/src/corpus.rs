//! Corpus and index file I/O.

use anyhow::Context;
use fuzzysearch::{Index, RecordId};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CorpusRecord {
    id: RecordId,
    text: String,
}

/// Read `(id, text)` pairs from a corpus file.
///
/// A file whose first non-blank character is `[` is parsed as a JSON array
/// of `{id, text}` objects. Anything else is plain text: one record per
/// non-empty line, numbered from 1 in line order.
pub fn read_corpus(path: &Path) -> anyhow::Result<Vec<(RecordId, String)>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus {}", path.display()))?;
    parse_corpus(&content).with_context(|| format!("Failed to parse corpus {}", path.display()))
}

fn parse_corpus(content: &str) -> anyhow::Result<Vec<(RecordId, String)>> {
    if content.trim_start().starts_with('[') {
        let records: Vec<CorpusRecord> = serde_json::from_str(content)?;
        return Ok(records.into_iter().map(|r| (r.id, r.text)).collect());
    }

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .zip(1..)
        .map(|(line, id)| (id, line.to_string()))
        .collect())
}

/// Load a persisted index.
pub fn load_index(path: &Path) -> anyhow::Result<Index> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read index {}", path.display()))?;
    Index::from_json(&json).with_context(|| format!("Failed to load index {}", path.display()))
}

/// Persist an index, replacing `path` only once the new content is written.
pub fn save_index(path: &Path, index: &Index, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        index.to_json_pretty()?
    } else {
        index.to_json()?
    };

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move index into place at {}", path.display()))?;
    Ok(())
}
