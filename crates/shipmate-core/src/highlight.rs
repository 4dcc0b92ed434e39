//! HTML-safe match highlighting and snippet extraction.
//!
//! [`highlight_text`] escapes both the haystack and the query for HTML,
//! then escapes the query again for the regex engine before compiling a
//! case-insensitive pattern. User input never reaches the pattern
//! compiler unescaped, and the output never contains raw `<`, `>`, `&`,
//! or quotes from the input.
//!
//! ```rust
//! use shipmate_core::highlight::highlight_text;
//!
//! assert_eq!(
//!     highlight_text("5 > 3 & ok", "3 & ok"),
//!     "5 &gt; <mark>3 &amp; ok</mark>"
//! );
//! ```

use regex::RegexBuilder;
use tracing::debug;

/// Opening and closing tags wrapped around each match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightMarker {
    pub open: String,
    pub close: String,
}

impl Default for HighlightMarker {
    fn default() -> Self {
        Self {
            open: "<mark>".to_string(),
            close: "</mark>".to_string(),
        }
    }
}

/// Escape `&`, `<`, `>`, `"`, and `'` as HTML entities.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Highlight with the default `<mark>` marker.
pub fn highlight_text(text: &str, query: &str) -> String {
    highlight_with(text, query, &HighlightMarker::default())
}

/// Escape `text` and wrap every case-insensitive occurrence of `query`.
///
/// A blank query or blank text returns the escaped text. Matches that
/// would start or end inside an entity produced by escaping are skipped,
/// so a query like `amp` cannot split `&amp;`.
pub fn highlight_with(text: &str, query: &str, marker: &HighlightMarker) -> String {
    let escaped_text = escape_html(text);
    let query = query.trim();
    if query.is_empty() || text.trim().is_empty() {
        return escaped_text;
    }

    let escaped_query = escape_html(query);
    let pattern = match RegexBuilder::new(&regex::escape(&escaped_query))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            debug!(error = %e, "highlight pattern rejected; returning plain text");
            return escaped_text;
        }
    };

    let entities = entity_spans(&escaped_text);
    let inside_entity = |pos: usize| entities.iter().any(|&(s, e)| pos > s && pos < e);

    let mut out = String::with_capacity(escaped_text.len() + 16);
    let mut last = 0;
    let mut pos = 0;
    while let Some(m) = pattern.find_at(&escaped_text, pos) {
        if inside_entity(m.start()) || inside_entity(m.end()) {
            // Retry one char later; a valid match may overlap this one.
            pos = m.start()
                + escaped_text[m.start()..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
            continue;
        }
        out.push_str(&escaped_text[last..m.start()]);
        out.push_str(&marker.open);
        out.push_str(m.as_str());
        out.push_str(&marker.close);
        last = m.end();
        pos = m.end();
    }
    out.push_str(&escaped_text[last..]);
    out
}

/// Byte ranges `[start, end)` of `&...;` entities in escaped text.
fn entity_spans(escaped: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    for (start, _) in escaped.match_indices('&') {
        if let Some(len) = escaped[start..].find(';') {
            spans.push((start, start + len + 1));
        }
    }
    spans
}

/// Plain-text excerpt of at most `max_chars` characters around the first
/// case-insensitive occurrence of `query`, with `…` on trimmed ends.
///
/// Falls back to the leading characters when the query doesn't occur.
pub fn make_snippet(content: &str, query: &str, max_chars: usize) -> String {
    let chars: Vec<char> = content.chars().collect();
    if chars.len() <= max_chars {
        return content.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }

    let query_chars: Vec<char> = query.trim().to_lowercase().chars().collect();
    let lowered: Vec<char> = chars
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect();
    let hit = if query_chars.is_empty() {
        None
    } else {
        lowered
            .windows(query_chars.len())
            .position(|w| w == query_chars.as_slice())
    };

    let start = match hit {
        Some(pos) => {
            let lead = max_chars.saturating_sub(query_chars.len()) / 2;
            pos.saturating_sub(lead).min(chars.len() - max_chars)
        }
        None => 0,
    };
    let end = start + max_chars;

    let mut snippet = String::new();
    if start > 0 {
        snippet.push('…');
    }
    snippet.extend(chars[start..end].iter());
    if end < chars.len() {
        snippet.push('…');
    }
    snippet
}
