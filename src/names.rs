use std::collections::HashSet;
use std::hash::Hash;

/// Words always shown in upper case when abbreviation handling is on.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("ip", "IP"),
    ("id", "ID"),
    ("url", "URL"),
    ("uri", "URI"),
    ("vdc", "VDC"),
    ("os", "OS"),
    ("tcp", "TCP"),
    ("udp", "UDP"),
];

/// Turn a raw identifier such as `source_ip` into a display name (`Source IP`).
///
/// The input is trimmed and lower-cased, split on `_`, and each word gets an
/// upper-case first letter. With `abbreviations` set, known abbreviations are
/// upper-cased in full instead.
pub fn make_nice_name(raw: &str, abbreviations: bool) -> String {
    raw.trim()
        .to_lowercase()
        .split('_')
        .map(|word| {
            if abbreviations {
                if let Some((_, caps)) = ABBREVIATIONS.iter().find(|(w, _)| *w == word) {
                    return (*caps).to_string();
                }
            }
            capitalize(word)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Deduplicate by exact equality, keeping the first occurrence of each value.
pub fn unique_in_order<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}
