//! Structured reports and their markdown export.

use serde::{Deserialize, Serialize};

use crate::interpret::{Interpretable, Shape};

/// Content type of every exported report.
pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

/// Section headings used when a report has to be synthesized.
const FALLBACK_OUTLINE: [&str; 3] = ["Introduction", "Body", "Conclusion"];

/// A finished report as emitted by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub outline: Vec<String>,
    /// Full body in markdown.
    pub report: String,
    pub sources: Vec<String>,
    pub word_count: u64,
}

impl Interpretable for Report {
    const SHAPE: Shape = Shape::Report;
}

impl Report {
    /// Synthesize a report around raw text that failed to decode.
    ///
    /// The body is never empty: blank text is replaced by a heading naming
    /// the title.
    pub fn fallback(title: &str, raw_text: &str) -> Self {
        let body = if raw_text.trim().is_empty() {
            format!("# Research on {}", title)
        } else {
            raw_text.to_string()
        };
        Self {
            title: title.to_string(),
            outline: FALLBACK_OUTLINE.iter().map(|s| s.to_string()).collect(),
            word_count: count_words(&body),
            report: body,
            sources: Vec::new(),
        }
    }

    /// First `max_chars` characters of the body followed by an ellipsis.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut preview: String = self.report.chars().take(max_chars).collect();
        preview.push_str("...");
        preview
    }

    /// Render the report as a standalone markdown document.
    pub fn to_markdown(&self) -> String {
        let mut out = format!("# {}\n\n{}\n", self.title, self.report.trim_end());
        if !self.sources.is_empty() {
            out.push_str("\n## Sources\n\n");
            for (i, source) in self.sources.iter().enumerate() {
                out.push_str(&format!("{}. {}\n", i + 1, source));
            }
        }
        out
    }
}

pub fn count_words(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

/// The downloadable report kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Research,
    Task,
}

impl ReportKind {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Research => "research_report.md",
            Self::Task => "task_report.md",
        }
    }
}

/// A report ready to be served as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl Export {
    pub fn new(kind: ReportKind, report: &Report) -> Self {
        Self {
            file_name: kind.file_name(),
            content_type: MARKDOWN_CONTENT_TYPE,
            body: report.to_markdown(),
        }
    }
}
