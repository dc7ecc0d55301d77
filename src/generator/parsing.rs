//! Free-text reply parsing.
//!
//! Every parser is pure and never fails: when a reply does not have the expected shape the
//! documented default is substituted and `used_default` is set so callers can log it.

use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

/// A minus sign only counts at the start or after whitespace, `:`, `=` or `(`.
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[\s:=(])(-\d+(?:\.\d+)?)|(\d+(?:\.\d+)?)").unwrap()
});

static LIST_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d.\-*+)•\s]+").unwrap());

/// List items this short are treated as noise.
const MIN_ITEM_CHARS: usize = 4;

/// A parsed value plus whether it came from the reply or from the fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    pub used_default: bool,
}

impl<T> Parsed<T> {
    fn parsed(value: T) -> Self {
        Self {
            value,
            used_default: false,
        }
    }

    fn fallback(value: T) -> Self {
        Self {
            value,
            used_default: true,
        }
    }
}

/// First number in the reply, clamped to [0, 100].
pub fn extract_score(text: &str, default: f64) -> Parsed<f64> {
    match NUMBER
        .captures(text)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .and_then(|m| m.as_str().parse::<f64>().ok())
    {
        Some(value) => Parsed::parsed(value.clamp(0.0, 100.0)),
        None => Parsed::fallback(default),
    }
}

/// The reply as one of `allowed`, compared case-insensitively after trimming.
pub fn extract_classification(text: &str, allowed: &[&str], default: &str) -> Parsed<String> {
    let normalized = text
        .trim()
        .trim_end_matches(['.', '!'])
        .trim_matches(['"', '\'', '*'])
        .to_lowercase();

    if allowed.iter().any(|label| *label == normalized) {
        Parsed::parsed(normalized)
    } else {
        Parsed::fallback(default.to_string())
    }
}

/// Newline-delimited list with bullets and numbering removed, capped at `max_items`.
///
/// `used_default` is set when nothing usable was found.
pub fn extract_list(text: &str, max_items: usize) -> Parsed<Vec<String>> {
    let items: Vec<String> = text
        .lines()
        .map(|line| LIST_PREFIX.replace(line.trim(), "").trim().to_string())
        .filter(|item| item.chars().count() >= MIN_ITEM_CHARS)
        .take(max_items)
        .collect();

    if items.is_empty() {
        Parsed::fallback(items)
    } else {
        Parsed::parsed(items)
    }
}

/// `Label: number` lines keyed by the label in snake_case. Unparsable lines are skipped.
pub fn parse_score_lines(text: &str) -> HashMap<String, f64> {
    text.lines()
        .filter_map(|line| {
            let (label, value) = line.split_once(':')?;
            let value = value.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
            let key = label.trim().to_lowercase().replace(' ', "_");
            Some((key, value))
        })
        .collect()
}

/// Splits a reply into `HEADER: body` sections.
///
/// A header line may carry its content after the colon, continue on following lines, or
/// both. Matching ignores case and leading markdown markers. Returned keys are the headers
/// as given; absent sections are not present in the map.
pub fn parse_sections(text: &str, headers: &[&str]) -> BTreeMap<String, String> {
    let mut sections: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut current: Option<&str> = None;

    for line in text.lines() {
        let cleaned = line.trim().trim_start_matches(['#', '*', ' ']);
        if let Some((header, rest)) = match_header(cleaned, headers) {
            current = Some(header);
            let body = sections.entry(header.to_string()).or_default();
            if !rest.is_empty() {
                body.push(rest.to_string());
            }
            continue;
        }

        if let Some(header) = current
            && !line.trim().is_empty()
        {
            sections
                .entry(header.to_string())
                .or_default()
                .push(line.trim().to_string());
        }
    }

    sections
        .into_iter()
        .map(|(header, lines)| (header, lines.join("\n")))
        .collect()
}

fn match_header<'h>(line: &str, headers: &[&'h str]) -> Option<(&'h str, String)> {
    headers.iter().find_map(|header| {
        // Headers are ASCII, so a case-insensitive prefix match keeps byte offsets valid.
        let prefix = line.get(..header.len())?;
        if !prefix.eq_ignore_ascii_case(header) {
            return None;
        }
        let rest = line[header.len()..]
            .trim_start_matches('*')
            .strip_prefix(':')?;
        let content = rest.trim().trim_matches('*').trim();
        Some((*header, content.to_string()))
    })
}
