use std::collections::HashMap;

use biblatex::{Bibliography, ChunksExt};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::SourceRecord;

/// Result of parsing one raw BibTeX export: the records that parsed, plus one
/// diagnostic line per entry that had to be skipped or renamed.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub records: Vec<SourceRecord>,
    pub diagnostics: Vec<String>,
}

/// Parse zero or more `@type{key, field = value, ...}` entries.
///
/// The text is split into brace-balanced chunks first and each chunk is parsed
/// on its own, so a single malformed entry is skipped with a diagnostic and
/// never aborts the batch. `@comment` and `@preamble` chunks are ignored;
/// `@string` chunks are carried forward so abbreviations resolve in later
/// entries. Duplicate keys within the batch get a `_2`, `_3`, ... suffix, the
/// first occurrence keeps the original key.
pub fn parse(raw: &str) -> ParseOutcome {
    let mut out = ParseOutcome::default();
    let mut string_defs = String::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for chunk in split_entries(raw, &mut out.diagnostics) {
        let kind = entry_kind(chunk);
        match kind.as_deref() {
            Some("comment") | Some("preamble") => continue,
            Some("string") => {
                string_defs.push_str(chunk);
                string_defs.push('\n');
                continue;
            }
            _ => {}
        }

        if !HAS_KEY_RE.is_match(chunk) {
            out.diagnostics
                .push(format!("skipping entry without a key: {}", head(chunk)));
            continue;
        }

        let source = if string_defs.is_empty() {
            chunk.to_string()
        } else {
            format!("{string_defs}{chunk}")
        };
        let bib = match Bibliography::parse(&source) {
            Ok(bib) => bib,
            Err(err) => {
                out.diagnostics
                    .push(format!("skipping malformed entry {}: {err}", head(chunk)));
                continue;
            }
        };

        for entry in bib.iter() {
            if entry.key.trim().is_empty() {
                out.diagnostics
                    .push(format!("skipping entry without a key: {}", head(chunk)));
                continue;
            }
            let count = seen.entry(entry.key.clone()).or_insert(0);
            *count += 1;
            let key = if *count > 1 {
                let renamed = format!("{}_{}", entry.key, count);
                out.diagnostics.push(format!(
                    "duplicate key {}, renaming occurrence to {renamed}",
                    entry.key
                ));
                renamed
            } else {
                entry.key.clone()
            };
            let fields = entry
                .fields
                .iter()
                .map(|(name, value)| (name.clone(), value.format_verbatim()))
                .collect();
            out.records.push(SourceRecord::new(
                key,
                entry.entry_type.to_string().to_lowercase(),
                fields,
            ));
        }
    }

    out
}

static HAS_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@\w+\s*[({]\s*[^,\s{}()]+\s*[,})]").unwrap());

/// First line of a chunk, for diagnostics.
fn head(chunk: &str) -> &str {
    chunk.lines().next().unwrap_or(chunk).trim_end_matches(',')
}

fn entry_kind(chunk: &str) -> Option<String> {
    static KIND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@(\w+)").unwrap());
    KIND_RE
        .captures(chunk)
        .map(|caps| caps[1].to_lowercase())
}

/// Split raw text into one slice per `@`-entry by balancing the outer
/// delimiter pair. An entry left unbalanced at end of input is reported and
/// everything after it is abandoned, since there is no safe resync point.
fn split_entries<'a>(raw: &'a str, diagnostics: &mut Vec<String>) -> Vec<&'a str> {
    let bytes = raw.as_bytes();
    let mut chunks = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'@' {
            i += 1;
            continue;
        }
        let start = i;
        i += 1;
        while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
            i += 1;
        }
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let (open, close) = match bytes.get(i) {
            Some(b'{') => (b'{', b'}'),
            Some(b'(') => (b'(', b')'),
            _ => {
                diagnostics.push(format!("skipping malformed entry: {}", head(&raw[start..])));
                continue;
            }
        };

        let mut depth = 0usize;
        let mut end = None;
        while i < bytes.len() {
            if bytes[i] == open {
                depth += 1;
            } else if bytes[i] == close {
                depth -= 1;
                if depth == 0 {
                    end = Some(i);
                    break;
                }
            }
            i += 1;
        }

        match end {
            Some(end) => {
                chunks.push(&raw[start..=end]);
                i = end + 1;
            }
            None => {
                diagnostics.push(format!(
                    "skipping unbalanced entry at end of input: {}",
                    head(&raw[start..])
                ));
                break;
            }
        }
    }

    chunks
}
