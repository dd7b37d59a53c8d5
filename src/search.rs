//! In-book search.
//!
//! The scan works on the raw text rather than the parsed blocks and keeps
//! its own running chapter, so attribution is always the nearest heading
//! above the matching line.

use regex::{Regex, RegexBuilder};

use crate::chapter::{NavTarget, chapter_id, heading_title};

/// Queries shorter than this (in characters) clear the results.
pub const MIN_QUERY_CHARS: usize = 2;

/// Collection stops once more than 50 results exist.
pub const RESULT_CAP: usize = 51;

/// Chapter title reported for lines above the first heading.
pub const START_OF_BOOK: &str = "Start of book";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// The query is a case-insensitive regular expression.
    #[default]
    Pattern,
    /// The query is matched as plain text.
    Literal,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

/// A result line split into plain and matched runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlighted {
    pub segments: Vec<Segment>,
}

impl Highlighted {
    fn build(line: &str, regex: &Regex) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;
        for m in regex.find_iter(line) {
            if m.start() > last {
                segments.push(Segment {
                    text: line[last..m.start()].to_string(),
                    highlighted: false,
                });
            }
            if !m.as_str().is_empty() {
                segments.push(Segment {
                    text: m.as_str().to_string(),
                    highlighted: true,
                });
            }
            last = m.end();
        }
        if last < line.len() {
            segments.push(Segment {
                text: line[last..].to_string(),
                highlighted: false,
            });
        }
        Self { segments }
    }

    pub fn plain(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Renders the line with every match wrapped by `open` and `close`.
    pub fn marked(&self, open: &str, close: &str, escape: impl Fn(&str) -> String) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if segment.highlighted {
                out.push_str(open);
                out.push_str(&escape(&segment.text));
                out.push_str(close);
            } else {
                out.push_str(&escape(&segment.text));
            }
        }
        out
    }

    pub fn matches(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .filter(|s| s.highlighted)
            .map(|s| s.text.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub chapter_title: String,
    /// Empty when the line precedes the first heading.
    pub chapter_id: String,
    pub line: Highlighted,
}

impl SearchResult {
    pub fn target(&self) -> NavTarget {
        NavTarget::from_chapter_id(&self.chapter_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchView {
    /// Query too short: nothing is shown, not even a "no results" note.
    #[default]
    Cleared,
    NoResults,
    Results(Vec<SearchResult>),
}

impl SearchView {
    pub fn results(&self) -> &[SearchResult] {
        match self {
            SearchView::Results(results) => results,
            SearchView::Cleared | SearchView::NoResults => &[],
        }
    }
}

pub fn compile(query: &str, mode: SearchMode) -> Result<Regex, SearchError> {
    let pattern = match mode {
        SearchMode::Pattern => query.to_string(),
        SearchMode::Literal => regex::escape(query),
    };
    Ok(RegexBuilder::new(&pattern).case_insensitive(true).build()?)
}

pub fn search(text: &str, query: &str, mode: SearchMode) -> Result<SearchView, SearchError> {
    if query.chars().count() < MIN_QUERY_CHARS {
        return Ok(SearchView::Cleared);
    }

    let regex = compile(query, mode)?;
    let mut results = Vec::new();
    let mut chapter_title = START_OF_BOOK.to_string();
    let mut current_id = String::new();
    let mut ordinal = 0;

    for line in text.split('\n') {
        if let Some(title) = heading_title(line) {
            chapter_title = title.to_string();
            current_id = chapter_id(ordinal);
            ordinal += 1;
            continue;
        }

        if results.len() >= RESULT_CAP {
            continue;
        }

        if regex.is_match(line) {
            results.push(SearchResult {
                chapter_title: chapter_title.clone(),
                chapter_id: current_id.clone(),
                line: Highlighted::build(line, &regex),
            });
        }
    }

    tracing::debug!(query, matches = results.len(), "search finished");

    if results.is_empty() {
        Ok(SearchView::NoResults)
    } else {
        Ok(SearchView::Results(results))
    }
}
