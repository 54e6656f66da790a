#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Key translation from RAML's camelCase facet names to the model's
//! snake_case fields, and the English inflections used by `!singularize`
//! and `!pluralize` placeholder transforms.

/// Converts a camelCase facet name to snake_case.
///
/// Non-alphabetic keys (`(annotation)`, media types) pass through unchanged
/// apart from lowercasing.
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            for lc in c.to_lowercase() {
                result.push(lc);
            }
        } else {
            result.push(c);
        }
    }
    result
}

/// Naive English singular form (`users` -> `user`, `categories` -> `category`).
pub fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if lower.ends_with("ies") && word.len() > 3 {
        return format!("{}y", &word[..word.len() - 3]);
    }
    for suffix in ["sses", "shes", "ches", "xes", "zes"] {
        if lower.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if lower.ends_with("ss") || lower.ends_with("us") {
        return word.to_string();
    }
    match word.strip_suffix(['s', 'S']) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

/// Naive English plural form (`user` -> `users`, `box` -> `boxes`).
pub fn pluralize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    let mut chars = lower.chars().rev();
    let last = chars.next();
    let before_last = chars.next();

    match (before_last, last) {
        (Some(b), Some('y')) if !"aeiou".contains(b) => {
            format!("{}ies", &word[..word.len() - 1])
        }
        (_, Some('s' | 'x' | 'z')) => format!("{}es", word),
        (Some('c' | 's'), Some('h')) => format!("{}es", word),
        (_, None) => String::new(),
        _ => format!("{}s", word),
    }
}
