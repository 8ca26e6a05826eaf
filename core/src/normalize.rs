//! Name normalization for clubs, opponents and players.
//!
//! "tigers cc" -> "Tigers CC", "ewhurst rfc" -> "Ewhurst RFC".

/// Tokens always rendered fully uppercase.
const ACRONYMS: [&str; 4] = ["cc", "fc", "rfc", "afc"];

/// Canonical display form of a free-text name.
/// Empty or whitespace-only input yields an empty string; callers reject it.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(normalize_token)
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_token(token: &str) -> String {
    let lower = token.to_ascii_lowercase();
    if ACRONYMS.contains(&lower.as_str()) {
        return token.to_ascii_uppercase();
    }
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
