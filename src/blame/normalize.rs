//! Author normalization.
//!
//! Author strings differ between tools: full names, "Last, First", email
//! addresses, mixed case, stray punctuation. `normalize` maps them to a
//! canonical form that ignores token order and case:
//!
//! 1. drop the first `@` and everything after it
//! 2. split on runs of `.`, `,` and whitespace (hyphens stay inside tokens)
//! 3. lowercase every token
//! 4. sort tokens by code point
//! 5. join with single spaces
//!
//! Repeated tokens are kept.

/// Normalize an optional author; `None` stays `None`.
pub fn normalize_author(raw: Option<&str>) -> Option<String> {
    raw.map(normalize)
}

pub fn normalize(raw: &str) -> String {
    let local_part = raw.split_once('@').map_or(raw, |(local, _)| local);

    let mut tokens: Vec<String> = local_part
        .split(is_delimiter)
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect();

    // String ordering compares UTF-8 bytes, which matches code point order.
    tokens.sort_unstable();
    tokens.join(" ")
}

fn is_delimiter(c: char) -> bool {
    c == '.' || c == ',' || c.is_whitespace()
}
