//! Field extraction from agent answers.
//!
//! Agents answer in prose. These heuristics pull the handful of values each
//! query kind tabulates; anything not found is reported as [`UNAVAILABLE`].

use regex::Regex;
use std::sync::LazyLock;

use crate::core::string::{first_sentence, truncate};
use crate::task::value_objects::QueryKind;

/// Sentinel for a field with no data (failed subject or nothing extracted).
pub const UNAVAILABLE: &str = "unavailable";

const SUMMARY_MAX_LEN: usize = 120;

static MONEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$[\d,]+(?:\.\d+)?\s*(?:billion|million|[BMK]\b)?")
        .expect("money pattern is valid")
});

static VALUED_AT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:valued at|valuation of|worth)\s*\$?[\d,]+(?:\.\d+)?\s*(?:billion|million|[BMK]\b)?",
    )
    .expect("valuation pattern is valid")
});

static KNOWN_OUTLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(TechCrunch|Forbes|Bloomberg|Crunchbase|PitchBook|WSJ|Wall Street Journal|Reuters|CNBC)\b")
        .expect("outlet pattern is valid")
});

static ATTRIBUTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\baccording to|\bsource:|\bper)\s+([A-Za-z][A-Za-z\s]*?)(?:\.|,|\n|$)")
        .expect("attribution pattern is valid")
});

static RAISED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:raised|total funding of|funding of|total of)\s*(?:a total of\s*|over\s*|about\s*)?(\$[\d,]+(?:\.\d+)?\s*(?:billion|million|[BMK]\b)?)",
    )
    .expect("raised pattern is valid")
});

static ROUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(Series\s+[A-H]\+?|Pre-Seed|Seed|IPO)\b").expect("round pattern is valid")
});

static INVESTORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:led by|investors include|backed by)\s+([^.\n]+)")
        .expect("investors pattern is valid")
});

/// Column names (after "Subject") for a query kind.
pub fn columns_for(kind: QueryKind) -> &'static [&'static str] {
    match kind {
        QueryKind::Valuation => &["Valuation", "Source", "Confidence"],
        QueryKind::Funding => &["Total Raised", "Latest Round", "Investors"],
        QueryKind::Overview | QueryKind::Team | QueryKind::Product => &["Summary"],
    }
}

/// Sentinel values for every column of `kind`.
pub fn unavailable_fields(kind: QueryKind) -> Vec<(String, String)> {
    columns_for(kind)
        .iter()
        .map(|c| (c.to_string(), UNAVAILABLE.to_string()))
        .collect()
}

/// Extract the columns of `kind` from one agent answer.
pub fn extract_fields(kind: QueryKind, text: &str) -> Vec<(String, String)> {
    let values = match kind {
        QueryKind::Valuation => {
            let (valuation, source, confidence) = extract_valuation(text);
            vec![valuation, source, confidence]
        }
        QueryKind::Funding => extract_funding(text),
        QueryKind::Overview | QueryKind::Team | QueryKind::Product => {
            let summary = first_sentence(text);
            if summary.is_empty() {
                vec![UNAVAILABLE.to_string()]
            } else {
                vec![truncate(&summary, SUMMARY_MAX_LEN)]
            }
        }
    };

    columns_for(kind)
        .iter()
        .map(|c| c.to_string())
        .zip(values)
        .collect()
}

/// Valuation, source and a confidence grade (High when both valuation and
/// source were found, Medium with valuation only, Low otherwise).
fn extract_valuation(text: &str) -> (String, String, String) {
    let valuation = MONEY
        .find(text)
        .or_else(|| VALUED_AT.find(text))
        .map(|m| m.as_str().trim().to_string());

    let source = KNOWN_OUTLET
        .captures(text)
        .and_then(|c| c.get(1))
        .or_else(|| ATTRIBUTION.captures(text).and_then(|c| c.get(1)))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty());

    let confidence = match (&valuation, &source) {
        (Some(_), Some(_)) => "High",
        (Some(_), None) => "Medium",
        _ => "Low",
    };

    (
        valuation.unwrap_or_else(|| UNAVAILABLE.to_string()),
        source.unwrap_or_else(|| UNAVAILABLE.to_string()),
        confidence.to_string(),
    )
}

fn extract_funding(text: &str) -> Vec<String> {
    let capture = |re: &Regex| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| truncate(m.as_str().trim(), 60))
            .unwrap_or_else(|| UNAVAILABLE.to_string())
    };
    vec![capture(&RAISED), capture(&ROUND), capture(&INVESTORS)]
}
