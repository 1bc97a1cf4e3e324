//! Keyword-matching fallback answers for when the LLM call fails.
//!
//! The query is bucketed by keyword lists and the answer is composed from
//! the chunks that were already retrieved, so the user still gets the most
//! relevant material even with no model available.

use std::fmt::Write;

use askrepo_index::retriever::RetrievedChunk;

/// Keyword bucket a query falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryCategory {
    TechStack,
    Setup,
    Overview,
    Generic,
}

const TECH_STACK_KEYWORDS: &[&str] = &["tech stack", "technologies", "frameworks"];
const SETUP_KEYWORDS: &[&str] = &["how to run", "how to install", "setup", "start"];
const OVERVIEW_KEYWORDS: &[&str] = &["what is", "what's", "tell me about", "describe"];

/// Maximum chunks quoted in a bucketed answer.
const MAX_QUOTED_CHUNKS: usize = 3;
/// Excerpt length for the generic bucket.
const GENERIC_EXCERPT_CHARS: usize = 300;

#[must_use]
pub fn classify(query: &str) -> QueryCategory {
    let q = query.to_lowercase();
    if TECH_STACK_KEYWORDS.iter().any(|k| q.contains(k)) {
        QueryCategory::TechStack
    } else if SETUP_KEYWORDS.iter().any(|k| q.contains(k)) {
        QueryCategory::Setup
    } else if OVERVIEW_KEYWORDS.iter().any(|k| q.contains(k)) {
        QueryCategory::Overview
    } else {
        QueryCategory::Generic
    }
}

/// Compose a fallback answer from the retrieved chunks.
#[must_use]
pub fn generate(query: &str, chunks: &[RetrievedChunk], sources: &[String]) -> String {
    let mut out = match classify(query) {
        QueryCategory::TechStack => {
            compose_quoted("**Technology indicators in the retrieved files:**", chunks)
        }
        QueryCategory::Setup => {
            compose_quoted("**Setup and run instructions found in the repository:**", chunks)
        }
        QueryCategory::Overview => {
            compose_quoted("**What the retrieved files say about this project:**", chunks)
        }
        QueryCategory::Generic => {
            let context = chunks
                .iter()
                .map(|c| c.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");
            format!(
                "Based on the retrieved information from the codebase:\n\n{}",
                excerpt(&context, GENERIC_EXCERPT_CHARS)
            )
        }
    };

    out.push_str(&sources_footer(sources));
    out.push_str("\n\n*Note: answer produced by local fallback parsing.*");
    out
}

fn compose_quoted(heading: &str, chunks: &[RetrievedChunk]) -> String {
    let mut out = String::from(heading);
    for chunk in chunks.iter().take(MAX_QUOTED_CHUNKS) {
        let _ = write!(
            out,
            "\n\n### {} (chunk {})\n{}",
            chunk.file,
            chunk.chunk_number,
            excerpt(&chunk.text, GENERIC_EXCERPT_CHARS)
        );
    }
    out
}

fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}

/// Format the sources footer appended to every answer.
#[must_use]
pub fn sources_footer(sources: &[String]) -> String {
    if sources.is_empty() {
        String::new()
    } else {
        format!("\n\n**Sources:** {}", sources.join(", "))
    }
}
