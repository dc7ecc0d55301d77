use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s\-.,!?()&$%]").unwrap());

static LOCATION_ABBREVIATIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(Us|Usa|Uk|Ca|Ny|Tx|Fl)\b").unwrap());

static KEYWORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[a-zA-Z]{3,}\b").unwrap());

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[a-zA-Z]+\b").unwrap());

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "can", "this", "that",
    "these", "those",
];

const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "amazing",
    "wonderful",
    "fantastic",
    "innovative",
    "unique",
    "revolutionary",
    "successful",
    "profitable",
    "growing",
    "popular",
    "trending",
    "opportunity",
    "potential",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "poor",
    "terrible",
    "awful",
    "difficult",
    "challenging",
    "expensive",
    "risky",
    "saturated",
    "declining",
    "competitive",
    "limited",
    "restricted",
    "problematic",
    "complex",
];

/// Collapse whitespace runs and drop characters outside the prompt-safe allow-list.
pub fn clean_text(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text.trim(), " ");
    DISALLOWED.replace_all(&collapsed, "").into_owned()
}

/// Uppercase the first letter of every word and lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }
    result
}

/// Title-case a location and restore common country/state abbreviations.
pub fn standardize_location(location: &str) -> String {
    if location.is_empty() {
        return String::new();
    }
    let titled = title_case(location);
    LOCATION_ABBREVIATIONS
        .replace_all(&titled, |caps: &regex::Captures| caps[1].to_uppercase())
        .into_owned()
}

/// Lowercase, clean and deduplicate interest tags, keeping first-seen order.
pub fn normalize_interests(interests: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    interests
        .iter()
        .filter(|interest| !interest.trim().is_empty())
        .map(|interest| clean_text(&interest.to_lowercase()))
        .filter(|interest| seen.insert(interest.clone()))
        .collect()
}

/// Clean each entry and drop the blank ones.
pub fn clean_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .filter(|item| !item.trim().is_empty())
        .map(|item| clean_text(item))
        .collect()
}

/// Stop-word filtered keywords of three or more letters, in first-seen order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut seen = HashSet::new();
    KEYWORD
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|word| !STOP_WORDS.contains(word))
        .filter(|word| seen.insert(*word))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SentimentReport {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub positive_indicators: usize,
    pub negative_indicators: usize,
}

/// Lexicon-based sentiment of a free-text passage.
pub fn analyze_sentiment(text: &str) -> SentimentReport {
    if text.trim().is_empty() {
        return SentimentReport {
            sentiment: Sentiment::Neutral,
            confidence: 0.0,
            positive_indicators: 0,
            negative_indicators: 0,
        };
    }

    let lowered = text.to_lowercase();
    let words: HashSet<&str> = WORD.find_iter(&lowered).map(|m| m.as_str()).collect();
    let positive = words.iter().filter(|w| POSITIVE_WORDS.contains(*w)).count();
    let negative = words.iter().filter(|w| NEGATIVE_WORDS.contains(*w)).count();

    let lean = |diff: usize| (diff as f64 / words.len() as f64 * 10.0).min(0.8);
    let (sentiment, confidence) = if positive > negative {
        (Sentiment::Positive, lean(positive - negative))
    } else if negative > positive {
        (Sentiment::Negative, lean(negative - positive))
    } else {
        (Sentiment::Neutral, 0.5)
    };

    SentimentReport {
        sentiment,
        confidence,
        positive_indicators: positive,
        negative_indicators: negative,
    }
}
