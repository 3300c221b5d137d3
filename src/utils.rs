// src/utils.rs

/// Collapse runs of whitespace to a single space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split text into pieces of at most `max_chars` characters, never inside a char
pub fn chunk_chars(text: &str, max_chars: usize) -> Vec<&str> {
    if max_chars == 0 || text.is_empty() {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    chunks.push(&text[start..]);
    chunks
}

/// Strip a label prefix and trailing period, as in `aria-label="Company, Acme."`
pub fn strip_aria_label(label: &str, prefix: &str) -> String {
    let value = label.trim();
    let value = value.strip_prefix(prefix).unwrap_or(value);
    value.strip_suffix('.').unwrap_or(value).trim().to_string()
}

/// Whether the source argument names a remote page rather than a local file
pub fn is_http_url(source: &str) -> bool {
    let lower = source.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
