//! Heuristic text feature extraction. Three cheap, independent strategies
//! (frequency topics, capitalized keywords, definition-pattern phrases) are
//! combined into one concept pool instead of a single "smart" extractor.
//! None of these can fail; the worst case is an empty pool, for which the
//! synthesizer substitutes [`FALLBACK_CONCEPT`].

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::quiz::templates::STOP_WORDS;

/// Substituted into question templates when no usable concept was found.
pub const FALLBACK_CONCEPT: &str = "the main concept";

const MAX_TOPICS: usize = 8;
const MAX_KEYWORDS: usize = 10;
const MAX_CONCEPTS: usize = 5;

static DEFINITION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)is defined as\s+([^.\n]+)",
        r"(?i)refers to\s+([^.\n]+)",
        r"(?i)\bmeans\s+([^.\n]+)",
        r"(?i)concept of\s+([^.\n]+)",
        r"(?i)principle of\s+([^.\n]+)",
        r"(?i)theory of\s+([^.\n]+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("definition pattern is valid"))
    .collect()
});

/// The deduplicated set of candidate subject phrases drawn from the notes,
/// in priority order: frequency topics, then keywords, then definition
/// phrases. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct ConceptPool {
    concepts: Vec<String>,
}

impl ConceptPool {
    pub fn from_text(text: &str) -> Self {
        let mut seen = HashSet::new();
        let mut concepts = Vec::new();
        for candidate in extract_topics(text)
            .into_iter()
            .chain(extract_keywords(text))
            .chain(extract_concepts(text))
        {
            if candidate.len() <= 3 {
                continue;
            }
            if seen.insert(candidate.to_lowercase()) {
                concepts.push(candidate);
            }
        }
        Self { concepts }
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Concept for question slot `i`. Concepts repeat cyclically when the
    /// pool is shorter than the quiz; an empty pool yields the fallback.
    pub fn concept_for(&self, i: usize) -> &str {
        if self.concepts.is_empty() {
            FALLBACK_CONCEPT
        } else {
            &self.concepts[i % self.concepts.len()]
        }
    }

    /// Every concept except the one a question is already about. Used to
    /// build concept-based distractors. Case-insensitive for non-ASCII
    /// concepts too, matching the dedup in `from_text`.
    pub fn others<'a>(&'a self, concept: &str) -> impl Iterator<Item = &'a str> {
        let concept = concept.to_lowercase();
        self.concepts
            .iter()
            .map(String::as_str)
            .filter(move |other| other.to_lowercase() != concept)
    }
}

/// Top words of the text by descending frequency, stop words and short
/// words dropped, capitalized. Ties keep encounter order.
pub fn extract_topics(text: &str) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut in_order: Vec<String> = Vec::new();
    for token in text.to_lowercase().split_whitespace() {
        let word: String = token.chars().filter(|c| c.is_alphabetic()).collect();
        if word.len() <= 4 || STOP_WORDS.contains(&word.as_str()) {
            continue;
        }
        let count = counts.entry(word.clone()).or_insert(0);
        if *count == 0 {
            in_order.push(word);
        }
        *count += 1;
    }
    in_order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    in_order
        .into_iter()
        .take(MAX_TOPICS)
        .map(|word| capitalize(&word))
        .collect()
}

/// Tokens that start with an uppercase letter, case preserved — a cheap
/// proper-noun/technical-term detector. First occurrences win.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();
    for token in text.split_whitespace() {
        let word: String = token.chars().filter(|c| c.is_alphabetic()).collect();
        if word.len() <= 3 {
            continue;
        }
        if !word.chars().next().is_some_and(|c| c.is_uppercase()) {
            continue;
        }
        if seen.insert(word.clone()) {
            keywords.push(word);
            if keywords.len() == MAX_KEYWORDS {
                break;
            }
        }
    }
    keywords
}

/// Clauses following definition markers ("is defined as", "refers to",
/// "means", "concept of", "principle of", "theory of"). Clauses outside
/// 4..=49 characters are dropped whole, not truncated.
pub fn extract_concepts(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut concepts = Vec::new();
    for pattern in DEFINITION_PATTERNS.iter() {
        for captures in pattern.captures_iter(text) {
            let clause = captures[1].trim().to_string();
            if clause.len() < 4 || clause.len() > 49 {
                continue;
            }
            if seen.insert(clause.clone()) {
                concepts.push(clause);
            }
            if concepts.len() == MAX_CONCEPTS {
                return concepts;
            }
        }
    }
    concepts
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTES: &str = "Recursion is defined as a function calling itself. \
        Recursion appears everywhere in algorithms. The Fibonacci sequence \
        uses recursion, and recursion depth matters for stacks. Dijkstra \
        invented shortest-path algorithms. The concept of memoization \
        speeds up recursive algorithms.";

    #[test]
    fn topics_are_ranked_by_frequency_and_capitalized() {
        let topics = extract_topics(NOTES);
        assert_eq!(topics.first().map(String::as_str), Some("Recursion"));
        assert!(topics.len() <= 8);
        for topic in &topics {
            assert!(topic.chars().next().unwrap().is_uppercase());
            assert!(topic.len() > 4);
        }
    }

    #[test]
    fn topics_of_empty_input_are_empty() {
        assert!(extract_topics("").is_empty());
        assert!(extract_keywords("").is_empty());
        assert!(extract_concepts("").is_empty());
    }

    #[test]
    fn topics_drop_stop_words() {
        let topics = extract_topics("because because because therefore therefore");
        assert!(topics.is_empty());
    }

    #[test]
    fn keywords_keep_encounter_order_and_case() {
        let keywords = extract_keywords("The Fibonacci numbers and Dijkstra met Fibonacci again");
        assert_eq!(keywords, vec!["Fibonacci", "Dijkstra"]);
    }

    #[test]
    fn keywords_cap_at_ten() {
        let text = "Alpha Bravo Charlie Delta Echo Foxtrot Golf Hotel India Juliett Kilo Lima";
        assert_eq!(extract_keywords(text).len(), 10);
    }

    #[test]
    fn concepts_capture_definition_clauses() {
        let concepts = extract_concepts(NOTES);
        assert!(concepts.iter().any(|c| c.contains("function calling itself")));
        assert!(concepts.iter().any(|c| c.starts_with("memoization")));
    }

    #[test]
    fn concepts_reject_overlong_clauses() {
        let text = format!("Entropy is defined as {}.", "x".repeat(120));
        assert!(extract_concepts(&text).is_empty());
    }

    #[test]
    fn concepts_reject_too_short_clauses() {
        assert!(extract_concepts("Pi means a.").is_empty());
    }

    #[test]
    fn extractors_never_return_duplicates() {
        for list in [
            extract_topics(NOTES),
            extract_keywords(NOTES),
            extract_concepts(NOTES),
        ] {
            let unique: HashSet<_> = list.iter().collect();
            assert_eq!(unique.len(), list.len());
        }
    }

    #[test]
    fn pool_is_deduplicated_and_cycles() {
        let pool = ConceptPool::from_text("Stacks stacks stacks queues queues Stacks");
        // "Stacks" shows up as both a topic and a keyword; only one survives.
        let all: Vec<_> = (0..pool.len()).map(|i| pool.concept_for(i).to_lowercase()).collect();
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
        assert_eq!(pool.concept_for(0), pool.concept_for(pool.len()));
    }

    #[test]
    fn others_excludes_the_subject_even_with_non_ascii_letters() {
        let pool = ConceptPool::from_text("Éclair pastry recipes Éclair pastry");
        let others: Vec<_> = pool.others("éclair").collect();
        assert!(!others.is_empty());
        assert!(others.iter().all(|other| other.to_lowercase() != "éclair"));
    }

    #[test]
    fn empty_pool_falls_back() {
        let pool = ConceptPool::from_text("");
        assert!(pool.is_empty());
        assert_eq!(pool.concept_for(3), FALLBACK_CONCEPT);
    }
}
