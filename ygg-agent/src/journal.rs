//! Journal intake: diary text → dated entries → sentences.
//!
//! An entry begins on any line that opens with a 1942–1944 date header such
//! as `Sunday, June 14, 1942` or `July 8, 1942`. Every following line up to the
//! next header belongs to that entry. Text before the first header is ignored.

use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

static DATE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday),?\s*)?(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},\s+194[2-4]",
    )
    .expect("valid regex")
});

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid regex"));

/// One dated diary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// The header line exactly as written (trimmed).
    pub date_line: String,
    /// Calendar date, when the header parses as one.
    pub date: Option<NaiveDate>,
    /// Body text, lines trimmed and joined with single spaces.
    pub text: String,
}

impl JournalEntry {
    /// The body split into sentences.
    #[must_use]
    pub fn sentences(&self) -> Vec<String> {
        split_sentences(&self.text)
    }
}

/// Read and parse a plain-text journal.
///
/// # Errors
/// Returns the I/O error if the file cannot be read.
pub fn read_journal(path: impl AsRef<Path>) -> std::io::Result<Vec<JournalEntry>> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_journal(&text))
}

/// Split journal text into entries. Entries with an empty body are dropped.
#[must_use]
pub fn parse_journal(text: &str) -> Vec<JournalEntry> {
    let mut entries = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.lines().map(str::trim) {
        if DATE_HEADER.is_match(line) {
            if let Some((header, body)) = current.take() {
                push_entry(&mut entries, header, &body);
            }
            current = Some((line.to_string(), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            if !line.is_empty() {
                body.push(line);
            }
        }
    }
    if let Some((header, body)) = current {
        push_entry(&mut entries, header, &body);
    }

    entries
}

fn push_entry(entries: &mut Vec<JournalEntry>, date_line: String, body: &[&str]) {
    let text = body.join(" ");
    if text.is_empty() {
        return;
    }
    let date = parse_date(&date_line);
    entries.push(JournalEntry {
        date_line,
        date,
        text,
    });
}

/// Parse the date out of a header line, ignoring anything after the year.
fn parse_date(date_line: &str) -> Option<NaiveDate> {
    let header = DATE_HEADER.find(date_line)?.as_str();
    let normalized = header.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDate::parse_from_str(&normalized, "%A, %B %d, %Y")
        .or_else(|_| NaiveDate::parse_from_str(&normalized, "%A %B %d, %Y"))
        .or_else(|_| NaiveDate::parse_from_str(&normalized, "%B %d, %Y"))
        .ok()
}

/// Split text into sentences at `.`, `!` or `?` followed by whitespace.
///
/// Terminators stay attached to their sentence; empty pieces are dropped.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END.find_iter(text) {
        let end = m.start() + 1;
        push_sentence(&mut sentences, &text[start..end]);
        start = m.end();
    }
    push_sentence(&mut sentences, &text[start..]);
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}
