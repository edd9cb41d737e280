use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

use crate::models::SourceFile;

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPart {
    /// A digit run with leading zeros removed, so any length compares numerically.
    Number(String),
    Text(String),
}

impl Ord for KeyPart {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (KeyPart::Number(a), KeyPart::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (KeyPart::Text(a), KeyPart::Text(b)) => a.cmp(b),
            (KeyPart::Number(_), KeyPart::Text(_)) => Ordering::Less,
            (KeyPart::Text(_), KeyPart::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for KeyPart {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<KeyPart>);

/// Splits `s` into alternating text and number parts.
///
/// The key always starts with a (possibly empty) text part, so parts at the
/// same position in two keys are always of the same kind.
pub fn natural_key(s: &str) -> NaturalKey {
    let mut parts = Vec::new();
    let mut last = 0;

    for m in DIGITS.find_iter(s) {
        parts.push(KeyPart::Text(s[last..m.start()].to_lowercase()));
        let digits = m.as_str().trim_start_matches('0');
        parts.push(KeyPart::Number(digits.to_string()));
        last = m.end();
    }
    parts.push(KeyPart::Text(s[last..].to_lowercase()));

    NaturalKey(parts)
}

/// Natural ordering with ties broken by the strings themselves.
pub fn cmp_natural(a: &str, b: &str) -> Ordering {
    natural_key(a)
        .cmp(&natural_key(b))
        .then_with(|| a.cmp(b))
}

pub fn sort_naturally(sources: &mut [SourceFile]) {
    sources.sort_by(|a, b| cmp_natural(&a.name, &b.name));
}
