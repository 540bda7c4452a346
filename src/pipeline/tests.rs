use super::*;
use crate::explain::ExplainerConfig;
use crate::model::{BundleConfig, Label, ModelBundle, ReviewMetadata};
use crate::storage::MemoryArtifactStore;
use crate::translate::{FailingTranslator, FixedTranslator, NoopTranslator};

fn engine_with(translator: Arc<dyn Translator>) -> InferenceEngine {
    let bundle = ModelBundle::load(&MemoryArtifactStore::new(), &BundleConfig::lexical())
        .expect("Should load bundle");
    InferenceEngine::new(Arc::new(bundle), translator, ExplainerConfig::default())
}

fn engine() -> InferenceEngine {
    engine_with(Arc::new(NoopTranslator))
}

mod score_tests {
    use super::*;

    #[tokio::test]
    async fn test_english_submission_is_scored_directly() {
        let submission = ReviewSubmission::new("great product").with_metadata(ReviewMetadata {
            verified: true,
            account_age_days: 365,
        });

        let scored = engine().score(&submission).await.expect("Should score");
        assert_eq!(scored.label, Label::Genuine);
        assert_eq!(scored.language, "en");
        assert!((0.0..=1.0).contains(&scored.trust_score));
        assert!((0.0..=1.0).contains(&scored.details.p_fake));
    }

    #[tokio::test]
    async fn test_spammy_submission_is_flagged() {
        let submission =
            ReviewSubmission::new("fake review buy now").with_metadata(ReviewMetadata {
                verified: false,
                account_age_days: 1,
            });

        let scored = engine().score(&submission).await.expect("Should score");
        assert_eq!(scored.label, Label::Fake);
        assert!((scored.trust_score - (1.0 - scored.details.p_fake)).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected() {
        let result = engine().score(&ReviewSubmission::new("   ")).await;
        assert!(matches!(result, Err(PipelineError::EmptyText)));
    }

    #[tokio::test]
    async fn test_explanation_attaches_by_default() {
        let scored = engine()
            .score(&ReviewSubmission::new("works as expected"))
            .await
            .expect("Should score");
        assert!(scored.details.shap.is_available());
    }
}

mod translation_tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_translation_scores_the_translated_text() {
        let translator = Arc::new(FixedTranslator::new("great product"));
        let engine = engine_with(translator);

        let submission = ReviewSubmission::new("produit genial")
            .with_language("fr")
            .with_metadata(ReviewMetadata {
                verified: true,
                account_age_days: 365,
            });

        let scored = engine.score(&submission).await.expect("Should score");
        assert_eq!(scored.language, "en", "resolved language echoes English");
        assert_eq!(scored.label, Label::Genuine);
    }

    #[tokio::test]
    async fn test_translation_failure_scores_the_original_text() {
        let engine = engine_with(Arc::new(FailingTranslator));

        let submission = ReviewSubmission::new("this text stays untranslated").with_language("kn");
        let scored = engine
            .score(&submission)
            .await
            .expect("translation failure must not fail the request");

        assert_eq!(scored.language, "kn", "submitted code echoes back");
        assert!((0.0..=1.0).contains(&scored.trust_score));
    }

    #[tokio::test]
    async fn test_unconfigured_translator_degrades_silently() {
        let engine = engine();
        let submission = ReviewSubmission::new("texto sin traducir").with_language("es");

        let scored = engine.score(&submission).await.expect("Should score");
        assert_eq!(scored.language, "es");
    }

    #[tokio::test]
    async fn test_english_never_hits_the_translator() {
        // A failing translator is irrelevant for English submissions.
        let engine = engine_with(Arc::new(FailingTranslator));
        let scored = engine
            .score(&ReviewSubmission::new("plain english text"))
            .await
            .expect("Should score");
        assert_eq!(scored.language, "en");
    }
}

mod explanation_tests {
    use super::*;

    fn engine_with_budget(sample_budget: usize) -> InferenceEngine {
        let bundle = ModelBundle::load(&MemoryArtifactStore::new(), &BundleConfig::lexical())
            .expect("Should load bundle");
        InferenceEngine::new(
            Arc::new(bundle),
            Arc::new(NoopTranslator),
            ExplainerConfig {
                sample_budget,
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_explainer_failure_degrades_to_placeholder() {
        // A zero budget makes the explainer reject the run; the response
        // must still carry label and trust score.
        let engine = engine_with_budget(0);
        let scored = engine
            .score(&ReviewSubmission::new("great product"))
            .await
            .expect("Should score despite explanation failure");

        assert!(!scored.details.shap.is_available());
        let json = serde_json::to_value(&scored).expect("Should serialize");
        let shap = json["details"]["shap"]
            .as_str()
            .expect("degraded shap serializes as a string");
        assert!(shap.contains("explanation generation failed"));
    }

    #[tokio::test]
    async fn test_available_explanation_serializes_as_object() {
        let engine = engine_with_budget(50);
        let scored = engine
            .score(&ReviewSubmission::new("legit purchase"))
            .await
            .expect("Should score");

        let json = serde_json::to_value(&scored).expect("Should serialize");
        assert!(json["details"]["shap"]["indices"].is_array());
        assert!(json["details"]["shap"]["values"].is_array());
        assert_eq!(
            json["details"]["shap"]["indices"].as_array().map(|a| a.len()),
            json["details"]["shap"]["values"].as_array().map(|a| a.len())
        );
    }

    #[tokio::test]
    async fn test_response_always_carries_p_fake() {
        let scored = engine()
            .score(&ReviewSubmission::new("whatever text"))
            .await
            .expect("Should score");
        let json = serde_json::to_value(&scored).expect("Should serialize");
        assert!(json["details"]["p_fake"].is_number());
    }
}

mod engine_tests {
    use super::*;

    #[tokio::test]
    async fn test_replace_bundle_swaps_the_shared_reference() {
        let engine = engine();
        let before = engine.bundle();

        let store = MemoryArtifactStore::new();
        let retrained = Arc::new(
            ModelBundle::load(&store, &BundleConfig::lexical()).expect("Should load"),
        );
        engine.replace_bundle(Arc::clone(&retrained));

        let after = engine.bundle();
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(Arc::ptr_eq(&retrained, &after));
    }

    #[tokio::test]
    async fn test_concurrent_scoring_shares_one_bundle() {
        let engine = Arc::new(engine());

        let mut handles = Vec::new();
        for i in 0..8 {
            let engine = Arc::clone(&engine);
            handles.push(tokio::spawn(async move {
                let submission = ReviewSubmission::new(format!("review number {i}"));
                engine.score(&submission).await.expect("Should score")
            }));
        }

        for handle in handles {
            let scored = handle.await.expect("task");
            assert!((0.0..=1.0).contains(&scored.trust_score));
        }
    }

    #[tokio::test]
    async fn test_score_identified_logs_and_scores() {
        let identity = Identity {
            id: "user-42".to_string(),
            display_name: Some("Reviewer".to_string()),
            role: "user".to_string(),
        };
        let scored = engine()
            .score_identified(&identity, &ReviewSubmission::new("great product"))
            .await
            .expect("Should score");
        assert_eq!(scored.language, "en");
    }

    #[tokio::test]
    async fn test_label_serializes_lowercase() {
        let scored = engine()
            .score(&ReviewSubmission::new("fake review buy now"))
            .await
            .expect("Should score");
        let json = serde_json::to_value(&scored).expect("Should serialize");
        assert!(matches!(json["label"].as_str(), Some("fake") | Some("genuine")));
    }
}

mod submission_tests {
    use super::*;

    #[test]
    fn test_language_defaults_to_english() {
        let submission: ReviewSubmission =
            serde_json::from_str(r#"{"text": "hello"}"#).expect("Should parse");
        assert_eq!(submission.language_code, "en");
        assert!(submission.metadata.is_none());
    }

    #[test]
    fn test_metadata_fields_default() {
        let submission: ReviewSubmission = serde_json::from_str(
            r#"{"text": "hello", "language_code": "de", "metadata": {}}"#,
        )
        .expect("Should parse");
        let metadata = submission.metadata.expect("Should have metadata");
        assert!(!metadata.verified);
        assert_eq!(metadata.account_age_days, 0);
    }

    #[test]
    fn test_builder_round_trip() {
        let submission = ReviewSubmission::new("text")
            .with_language("fr")
            .with_metadata(ReviewMetadata {
                verified: true,
                account_age_days: 10,
            });
        let json = serde_json::to_string(&submission).expect("Should serialize");
        let parsed: ReviewSubmission = serde_json::from_str(&json).expect("Should parse");
        assert_eq!(parsed.language_code, "fr");
        assert_eq!(parsed.metadata, submission.metadata);
    }
}
