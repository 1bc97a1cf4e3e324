//! Regex-based file chunking.
//!
//! Splitting is best-effort: each file kind gets a handful of
//! line-anchored patterns, and anything that defeats them falls back to
//! blank-line paragraphs or a single whole-file chunk.

use std::sync::LazyLock;

use regex::Regex;

use crate::files::FileKind;

static PYTHON_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:def|class)\s+.*?:").expect("hardcoded pattern must compile")
});

/// Patterns tried in order for generic code files. The first one with any
/// match decides the chunk boundaries.
static GENERIC_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        // JS/TS declaration keywords
        Regex::new(r"(?m)^\s*(?:function|class|const|let|var|export|import)\s+.*?:"),
        // HTML tags
        Regex::new(r"(?m)^\s*<[^>]*>.*"),
        // CSS selectors
        Regex::new(r"(?m)^\s*[.#][a-zA-Z].*\{"),
        // general `name:` / `name =` bindings
        Regex::new(r"(?m)^\s*[a-zA-Z_][a-zA-Z0-9_]*\s*[:=]"),
    ]
    .map(|r| r.expect("hardcoded pattern must compile"))
});

/// Split a file into chunks according to its kind.
#[must_use]
pub fn chunk_file(source: &str, kind: FileKind) -> Vec<String> {
    match kind {
        FileKind::Python => chunk_python(source),
        FileKind::Markdown => chunk_markdown(source),
        FileKind::Generic => chunk_generic(source),
    }
}

/// Split Python source at `def`/`class` definition lines. Files without
/// any definition become a single chunk.
#[must_use]
pub fn chunk_python(source: &str) -> Vec<String> {
    split_at_match_starts(source, &PYTHON_DEF).unwrap_or_else(|| single_chunk(source))
}

/// Split text into blank-line separated paragraphs.
#[must_use]
pub fn chunk_markdown(source: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in source.lines() {
        if line.trim().is_empty() && !current.is_empty() {
            push_chunk(&mut chunks, &current.join("\n"));
            current.clear();
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        push_chunk(&mut chunks, &current.join("\n"));
    }

    chunks
}

/// Split generic code by the first matching pattern cascade, falling back
/// to blank-line paragraphs, then to the whole file.
#[must_use]
pub fn chunk_generic(source: &str) -> Vec<String> {
    for pattern in GENERIC_PATTERNS.iter() {
        if let Some(chunks) = split_at_match_starts(source, pattern)
            && !chunks.is_empty()
        {
            return chunks;
        }
    }

    if source.contains("\n\n") {
        return source
            .split("\n\n")
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(ToString::to_string)
            .collect();
    }

    single_chunk(source)
}

/// Chunk boundaries run from one match start to the next; text before the
/// first match belongs to no chunk. `None` when the pattern never matches.
fn split_at_match_starts(source: &str, pattern: &Regex) -> Option<Vec<String>> {
    let starts: Vec<usize> = pattern.find_iter(source).map(|m| m.start()).collect();
    if starts.is_empty() {
        return None;
    }

    let mut chunks = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(source.len());
        push_chunk(&mut chunks, &source[start..end]);
    }
    Some(chunks)
}

fn push_chunk(chunks: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn single_chunk(source: &str) -> Vec<String> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        Vec::new()
    } else {
        vec![trimmed.to_string()]
    }
}
