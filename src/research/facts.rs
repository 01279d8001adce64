//! Facts captured while researching.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Longest fact snippet kept from a research summary, in characters.
pub const FACT_SNIPPET_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fact {
    pub fact: String,
    pub source: String,
    pub captured_at: DateTime<Utc>,
}

/// Append-only log of facts for one research run. No dedup, no bound.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FactLog {
    entries: Vec<Fact>,
}

impl FactLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fact. A missing source is recorded as "Not specified".
    pub fn record(&mut self, fact: impl Into<String>, source: Option<&str>) {
        self.entries.push(Fact {
            fact: fact.into(),
            source: source.unwrap_or("Not specified").to_string(),
            captured_at: Utc::now(),
        });
    }

    /// Record the leading snippet of a research summary.
    pub fn record_summary(&mut self, summary: &str, source: &str) {
        let snippet: String = summary.chars().take(FACT_SNIPPET_CHARS).collect();
        self.record(snippet, Some(source));
    }

    pub fn entries(&self) -> &[Fact] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
