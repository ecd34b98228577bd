//! Keyword-based command classification

use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use swarm_application::{Classification, ClassifierError, CommandClassifier};
use swarm_domain::{Action, QueryKind, SubjectCatalog};

/// Checked in order; the first table with a hit wins.
const ACTION_PATTERNS: &[(Action, &[&str])] = &[
    (Action::Lookup, &["look up", "lookup", "find", "search", "get"]),
    (Action::Analyze, &["analyze", "analyse", "research", "investigate", "study"]),
    (Action::Compare, &["compare", "comparison", "versus", "vs"]),
    (Action::Track, &["track", "monitor", "watch", "follow"]),
];

const QUERY_PATTERNS: &[(QueryKind, &[&str])] = &[
    (QueryKind::Valuation, &["valuation", "valuations", "value", "worth", "market cap"]),
    (QueryKind::Overview, &["overview", "summary", "about", "description"]),
    (QueryKind::Team, &["team", "founders", "founder", "employees", "staff"]),
    (QueryKind::Funding, &["funding", "investment", "investors", "raised", "series"]),
    (QueryKind::Product, &["product", "products", "service", "offering", "technology"]),
];

static COUNT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(\d+)\s*(?:yc\s*)?compan(?:y|ies)",
        r"top\s*(\d+)",
        r"first\s*(\d+)",
        r"(\d+)\s*startups?",
        r"look\s*up\s*(\d+)",
        r"(\d+)\s+[a-z][a-z-]*\s+(?:compan(?:y|ies)|startups?)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("count pattern is valid"))
    .collect()
});

static FILTER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\bfrom\s+(?:the\s+)?([a-z0-9][a-z0-9 \-]*)$",
        r"\bin\s+(?:the\s+)?([a-z0-9][a-z0-9 \-]*?)\s+(?:sector|industry|space)\b",
        r"\d+\s+([a-z][a-z0-9\- ]*?)\s+(?:compan(?:y|ies)|startups?)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("filter pattern is valid"))
    .collect()
});

/// Words that never narrow the catalog on their own.
const FILTER_NOISE: &[&str] = &[
    "yc", "companies", "company", "startups", "startup", "batch", "top", "the", "of",
];

/// Classifier driven by fixed pattern tables. Subjects named in the command
/// are recognized against the catalog.
pub struct KeywordClassifier {
    catalog: Arc<SubjectCatalog>,
}

impl KeywordClassifier {
    pub fn new(catalog: Arc<SubjectCatalog>) -> Self {
        Self { catalog }
    }

    /// Synchronous core, shared with the LLM classifier's fallback path.
    pub fn classify_text(&self, command: &str) -> Classification {
        let lowered = command.to_lowercase();
        let lowered = lowered.trim_end_matches(['.', '!', '?']).trim();

        let action = first_match(ACTION_PATTERNS, lowered).unwrap_or_default();
        let query_kind = first_match(QUERY_PATTERNS, lowered).unwrap_or_default();
        let target_count = COUNT_PATTERNS
            .iter()
            .find_map(|re| re.captures(lowered))
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<usize>().ok());
        let specific_subjects = self
            .catalog
            .mentioned_in(command)
            .into_iter()
            .map(|s| s.name.clone())
            .collect();
        let filter = extract_filter(lowered);

        Classification {
            rationale: format!("keyword match: {} {}", action, query_kind),
            action,
            query_kind,
            target_count,
            specific_subjects,
            filter,
        }
    }
}

#[async_trait]
impl CommandClassifier for KeywordClassifier {
    async fn classify(&self, command: &str) -> Result<Classification, ClassifierError> {
        Ok(self.classify_text(command))
    }
}

fn contains_word(text: &str, pattern: &str) -> bool {
    text.match_indices(pattern).any(|(start, _)| {
        let end = start + pattern.len();
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn first_match<T: Copy>(table: &[(T, &[&str])], text: &str) -> Option<T> {
    table
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|p| contains_word(text, p)))
        .map(|(value, _)| *value)
}

fn extract_filter(text: &str) -> Option<String> {
    FILTER_PATTERNS.iter().find_map(|re| {
        let captured = re.captures(text)?.get(1)?.as_str();
        let kept: Vec<&str> = captured
            .split_whitespace()
            .filter(|w| !FILTER_NOISE.contains(w))
            .collect();
        (!kept.is_empty()).then(|| kept.join(" "))
    })
}
