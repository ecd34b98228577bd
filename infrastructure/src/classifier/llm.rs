//! Reasoning-backend command classification

use super::keyword::KeywordClassifier;
use async_trait::async_trait;
use std::sync::Arc;
use swarm_application::{Classification, ClassifierError, CommandClassifier, ReasoningBackend};
use swarm_domain::{PromptTemplate, unfence};
use tracing::{debug, warn};

/// Classifier that asks the reasoning backend.
///
/// With a fallback configured, an unreachable backend or an unusable reply
/// degrades to keyword classification instead of failing the command.
pub struct LlmClassifier {
    backend: Arc<dyn ReasoningBackend>,
    max_count: usize,
    fallback: Option<KeywordClassifier>,
}

impl LlmClassifier {
    pub fn new(backend: Arc<dyn ReasoningBackend>, max_count: usize) -> Self {
        Self {
            backend,
            max_count: max_count.max(1),
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: KeywordClassifier) -> Self {
        self.fallback = Some(fallback);
        self
    }

    fn recover(&self, command: &str, error: ClassifierError) -> Result<Classification, ClassifierError> {
        match &self.fallback {
            Some(keywords) => {
                warn!("LLM classification failed, using keywords: {}", error);
                Ok(keywords.classify_text(command))
            }
            None => Err(error),
        }
    }
}

#[async_trait]
impl CommandClassifier for LlmClassifier {
    async fn classify(&self, command: &str) -> Result<Classification, ClassifierError> {
        let prompt = PromptTemplate::classification_prompt(command, self.max_count);
        let reply = match self
            .backend
            .complete(PromptTemplate::classification_system(), &prompt)
            .await
        {
            Ok(reply) => reply,
            Err(e) => return self.recover(command, e.into()),
        };

        debug!("Classifier reply: {}", reply);
        match parse_classification(&reply) {
            Ok(classification) => Ok(classification),
            Err(e) => self.recover(command, e),
        }
    }
}

/// Parse a classifier reply leniently: unknown enum values fall back to
/// defaults, and numbers may arrive as strings.
pub fn parse_classification(reply: &str) -> Result<Classification, ClassifierError> {
    let value: serde_json::Value = serde_json::from_str(unfence(reply))
        .map_err(|e| ClassifierError::InvalidResponse(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| ClassifierError::InvalidResponse("reply is not a JSON object".into()))?;

    let text = |key: &str| {
        object
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    let target_count = object.get("target_count").and_then(|v| {
        v.as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
    });

    let specific_subjects = object
        .get("specific_subjects")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Classification {
        action: text("action").and_then(|s| s.parse().ok()).unwrap_or_default(),
        query_kind: text("query_kind").and_then(|s| s.parse().ok()).unwrap_or_default(),
        target_count,
        specific_subjects,
        filter: text("filter").map(str::to_string),
        rationale: text("rationale").unwrap_or_default().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use swarm_application::ReasoningError;
    use swarm_domain::{Action, ConversationContext, QueryKind, Subject, SubjectCatalog};

    struct FixedBackend {
        reply: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl FixedBackend {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn down() -> Arc<Self> {
            Arc::new(Self {
                reply: Err("connection refused".to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ReasoningBackend for FixedBackend {
        async fn decide(&self, _context: &ConversationContext) -> Result<String, ReasoningError> {
            unreachable!("classifier never asks for decisions")
        }

        async fn complete(&self, _system: &str, prompt: &str) -> Result<String, ReasoningError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(ReasoningError::Unavailable)
        }
    }

    fn keywords() -> KeywordClassifier {
        KeywordClassifier::new(Arc::new(SubjectCatalog::new(vec![Subject::named("Stripe")])))
    }

    #[tokio::test]
    async fn test_fenced_reply_is_parsed() {
        let backend = FixedBackend::ok(
            "```json\n{\"action\": \"compare\", \"query_kind\": \"funding\", \"target_count\": 4, \"specific_subjects\": [], \"filter\": \"fintech\", \"rationale\": \"four fintechs\"}\n```",
        );
        let classifier = LlmClassifier::new(backend.clone(), 5);

        let c = classifier.classify("Compare funding for 4 fintech startups").await.unwrap();

        assert_eq!(c.action, Action::Compare);
        assert_eq!(c.query_kind, QueryKind::Funding);
        assert_eq!(c.target_count, Some(4));
        assert_eq!(c.filter.as_deref(), Some("fintech"));
        assert!(backend.prompts.lock().unwrap()[0].contains("number 1-5"));
    }

    #[test]
    fn test_lenient_fields() {
        let c = parse_classification(
            r#"{"action": "investigate", "query_kind": "team", "target_count": "3", "filter": null, "specific_subjects": ["Stripe", 7]}"#,
        )
        .unwrap();
        assert_eq!(c.action, Action::Lookup);
        assert_eq!(c.query_kind, QueryKind::Team);
        assert_eq!(c.target_count, Some(3));
        assert_eq!(c.filter, None);
        assert_eq!(c.specific_subjects, vec!["Stripe"]);
    }

    #[test]
    fn test_oversized_count_is_never_wrapped() {
        let c = parse_classification(r#"{"target_count": 18446744073709551615}"#).unwrap();
        // Either dropped (narrow usize) or kept whole; the interpreter clamps it.
        assert!(c.target_count.is_none_or(|n| n as u64 == u64::MAX));

        let c = parse_classification(r#"{"target_count": -2}"#).unwrap();
        assert_eq!(c.target_count, None);
    }

    #[test]
    fn test_non_object_is_invalid() {
        assert!(matches!(
            parse_classification("[1, 2]"),
            Err(ClassifierError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_classification("sure, here you go"),
            Err(ClassifierError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_backend_failure_without_fallback() {
        let classifier = LlmClassifier::new(FixedBackend::down(), 5);
        let err = classifier.classify("look up 3 companies").await.unwrap_err();
        assert!(matches!(err, ClassifierError::Backend(_)));
    }

    #[tokio::test]
    async fn test_fallback_to_keywords() {
        let classifier = LlmClassifier::new(FixedBackend::down(), 5).with_fallback(keywords());
        let c = classifier.classify("look up 3 companies").await.unwrap();
        assert_eq!(c.target_count, Some(3));

        let classifier = LlmClassifier::new(FixedBackend::ok("no idea"), 5).with_fallback(keywords());
        let c = classifier.classify("track Stripe").await.unwrap();
        assert_eq!(c.action, Action::Track);
        assert_eq!(c.specific_subjects, vec!["Stripe"]);
    }
}
