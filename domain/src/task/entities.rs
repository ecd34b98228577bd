//! Subject catalog entities

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;

/// A known entity that agents can research.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Subject {
    /// A subject known only by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            website: None,
            batch: None,
            industry: None,
            location: None,
            team_size: None,
            tags: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn with_batch(mut self, batch: impl Into<String>) -> Self {
        self.batch = Some(batch.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Lowercased text that filters are matched against.
    fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = vec![&self.name];
        parts.extend(
            [&self.description, &self.batch, &self.industry, &self.location]
                .into_iter()
                .flatten()
                .map(String::as_str),
        );
        parts.extend(self.tags.iter().map(String::as_str));
        parts.join(" ").to_lowercase()
    }

    /// Every whitespace-separated token of `filter` must occur in the
    /// subject's searchable text (case-insensitive).
    pub fn matches_filter(&self, filter: &str) -> bool {
        let haystack = self.searchable_text();
        filter
            .split_whitespace()
            .all(|token| haystack.contains(&token.to_lowercase()))
    }
}

/// Catalog entries may be full records or bare names.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogEntry {
    Name(String),
    Record(Subject),
}

impl From<CatalogEntry> for Subject {
    fn from(entry: CatalogEntry) -> Self {
        match entry {
            CatalogEntry::Name(name) => Subject::named(name),
            CatalogEntry::Record(subject) => subject,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<CatalogEntry>),
    Wrapped { companies: Vec<CatalogEntry> },
}

/// Static, ordered collection of known subjects. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectCatalog {
    subjects: Vec<Subject>,
}

impl SubjectCatalog {
    pub fn new(subjects: Vec<Subject>) -> Self {
        Self { subjects }
    }

    /// Parse a catalog document: either a JSON list or `{"companies": [...]}`.
    ///
    /// Entries without a usable name are skipped.
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let document: CatalogDocument =
            serde_json::from_str(json).map_err(|e| DomainError::InvalidCatalog(e.to_string()))?;

        let entries = match document {
            CatalogDocument::List(entries) => entries,
            CatalogDocument::Wrapped { companies } => companies,
        };

        let subjects = entries
            .into_iter()
            .map(Subject::from)
            .filter(|s| !s.name.trim().is_empty())
            .collect();

        Ok(Self { subjects })
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.iter()
    }

    /// Case-insensitive lookup by exact name.
    pub fn find(&self, name: &str) -> Option<&Subject> {
        let wanted = name.trim().to_lowercase();
        self.subjects
            .iter()
            .find(|s| s.name.to_lowercase() == wanted)
    }

    /// Subjects whose name occurs inside `text` (case-insensitive), in
    /// catalog order.
    pub fn mentioned_in(&self, text: &str) -> Vec<&Subject> {
        let lowered = text.to_lowercase();
        self.subjects
            .iter()
            .filter(|s| lowered.contains(&s.name.to_lowercase()))
            .collect()
    }

    /// First `count` subjects in catalog order, optionally narrowed by a
    /// filter. Deterministic for an unchanged catalog.
    pub fn select(&self, count: usize, filter: Option<&str>) -> Vec<Subject> {
        self.subjects
            .iter()
            .filter(|s| filter.is_none_or(|f| s.matches_filter(f)))
            .take(count)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SubjectCatalog {
        SubjectCatalog::new(vec![
            Subject::named("Stripe").with_industry("Fintech"),
            Subject::named("Airbnb").with_industry("Travel"),
            Subject::named("Brex")
                .with_industry("Fintech")
                .with_tag("corporate cards"),
            Subject::named("Dropbox").with_industry("B2B Software"),
        ])
    }

    #[test]
    fn test_from_json_list() {
        let catalog = SubjectCatalog::from_json(
            r#"[{"name": "Stripe", "website": "https://stripe.com"}, "Airbnb"]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.find("stripe").unwrap().website.as_deref(),
            Some("https://stripe.com")
        );
        assert_eq!(catalog.find("AIRBNB").unwrap().name, "Airbnb");
    }

    #[test]
    fn test_from_json_wrapped() {
        let catalog = SubjectCatalog::from_json(
            r#"{"companies": [{"name": "Stripe", "team_size": 8000, "batch": "S09"}]}"#,
        )
        .unwrap();
        let stripe = catalog.find("Stripe").unwrap();
        assert_eq!(stripe.team_size, Some(8000));
        assert_eq!(stripe.batch.as_deref(), Some("S09"));
    }

    #[test]
    fn test_from_json_skips_blank_names() {
        let catalog = SubjectCatalog::from_json(r#"["", "  ", "Ramp"]"#).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = SubjectCatalog::from_json("{\"nope\": 1}").unwrap_err();
        assert!(matches!(err, DomainError::InvalidCatalog(_)));
    }

    #[test]
    fn test_select_in_catalog_order() {
        let names: Vec<_> = sample()
            .select(2, None)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Stripe", "Airbnb"]);
    }

    #[test]
    fn test_select_with_filter() {
        let names: Vec<_> = sample()
            .select(5, Some("fintech"))
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Stripe", "Brex"]);
    }

    #[test]
    fn test_filter_requires_every_token() {
        let catalog = sample();
        assert_eq!(catalog.select(5, Some("fintech cards")).len(), 1);
        assert!(catalog.select(5, Some("fintech travel")).is_empty());
    }

    #[test]
    fn test_select_more_than_available() {
        assert_eq!(sample().select(10, None).len(), 4);
    }

    #[test]
    fn test_mentioned_in() {
        let catalog = sample();
        let found: Vec<_> = catalog
            .mentioned_in("compare dropbox and stripe")
            .into_iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(found, vec!["Stripe", "Dropbox"]);
    }
}
