//! Classification provider trait and the timeout-guarded call.

use std::time::Duration;

use async_trait::async_trait;
use reelsift_core::{Classification, Error, ExtractedEntity, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// What an external classifier says about one text fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderVerdict {
    pub classification: Classification,
    pub confidence: f64,
    #[serde(default)]
    pub entities: Vec<ExtractedEntity>,
}

/// Trait for external classification backends.
#[async_trait]
pub trait ClassificationProvider: Send + Sync {
    /// Classify one text fragment.
    async fn classify(&self, text: &str) -> Result<ProviderVerdict>;

    /// Whether the backend can be called right now. An unavailable provider
    /// is not called and the heuristic result is discounted as if it failed.
    fn is_available(&self) -> bool {
        true
    }

    /// False only for the placeholder used when no backend is set up, which
    /// the pipeline treats as no provider at all.
    fn is_configured(&self) -> bool {
        true
    }

    fn name(&self) -> &str;
}

/// Placeholder provider that is never available.
pub struct NoopClassifier;

#[async_trait]
impl ClassificationProvider for NoopClassifier {
    async fn classify(&self, _text: &str) -> Result<ProviderVerdict> {
        Err(Error::Classifier("no classification provider configured".into()))
    }

    fn is_available(&self) -> bool {
        false
    }

    fn is_configured(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "noop"
    }
}

/// Call the provider, bounded by `timeout`. Out-of-range confidences are
/// clamped to [0, 1].
pub async fn classify_with_timeout(
    provider: &dyn ClassificationProvider,
    text: &str,
    timeout: Duration,
) -> Result<ProviderVerdict> {
    match tokio::time::timeout(timeout, provider.classify(text)).await {
        Ok(Ok(mut verdict)) => {
            verdict.confidence = verdict.confidence.clamp(0.0, 1.0);
            Ok(verdict)
        }
        Ok(Err(e)) => {
            warn!("Provider {} failed: {}", provider.name(), e);
            Err(e)
        }
        Err(_) => {
            let ms = timeout.as_millis() as u64;
            warn!("Provider {} timed out after {}ms", provider.name(), ms);
            Err(Error::Timeout(ms))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Slow;

    #[async_trait]
    impl ClassificationProvider for Slow {
        async fn classify(&self, _text: &str) -> Result<ProviderVerdict> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(ProviderVerdict {
                classification: Classification::Actionable,
                confidence: 1.0,
                entities: Vec::new(),
            })
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    struct Overconfident;

    #[async_trait]
    impl ClassificationProvider for Overconfident {
        async fn classify(&self, _text: &str) -> Result<ProviderVerdict> {
            Ok(ProviderVerdict {
                classification: Classification::Context,
                confidence: 3.0,
                entities: Vec::new(),
            })
        }

        fn name(&self) -> &str {
            "overconfident"
        }
    }

    #[tokio::test]
    async fn test_noop_is_unavailable_and_errors() {
        let noop = NoopClassifier;
        assert!(!noop.is_available());
        assert!(!noop.is_configured());
        assert!(noop.classify("anything").await.is_err());
    }

    #[tokio::test]
    async fn test_timeout() {
        let result = classify_with_timeout(&Slow, "text", Duration::from_millis(50)).await;
        assert!(matches!(result, Err(Error::Timeout(50))));
    }

    #[tokio::test]
    async fn test_confidence_clamped() {
        let verdict = classify_with_timeout(&Overconfident, "text", Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(verdict.confidence, 1.0);
        assert_eq!(verdict.classification, Classification::Context);
    }

    #[test]
    fn test_verdict_from_provider_json() {
        let verdict: ProviderVerdict =
            serde_json::from_str(r#"{"classification":"actionable","confidence":0.8}"#).unwrap();
        assert_eq!(verdict.classification, Classification::Actionable);
        assert!(verdict.entities.is_empty());

        let with_entities: ProviderVerdict = serde_json::from_str(
            r#"{"classification":"context","confidence":0.6,
                "entities":[{"type":"venue","value":"Nopa","raw":"at Nopa","confidence":0.9}]}"#,
        )
        .unwrap();
        assert_eq!(with_entities.entities[0].value, "Nopa");
    }
}
