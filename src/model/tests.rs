use super::*;
use crate::embedding::SemanticConfig;
use crate::storage::MemoryArtifactStore;

mod classifier_tests {
    use super::*;

    fn separable_data() -> (Vec<Vec<f32>>, Vec<bool>) {
        let features = vec![
            vec![0.0, 1.0],
            vec![1.0, 1.2],
            vec![2.0, 0.8],
            vec![10.0, 0.1],
            vec![11.0, 0.3],
            vec![12.0, 0.2],
        ];
        let labels = vec![false, false, false, true, true, true];
        (features, labels)
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (features, labels) = separable_data();
        let a = LogisticRegression::fit(&features, &labels, DEFAULT_LEARNING_RATE, DEFAULT_EPOCHS)
            .expect("Should fit");
        let b = LogisticRegression::fit(&features, &labels, DEFAULT_LEARNING_RATE, DEFAULT_EPOCHS)
            .expect("Should fit");
        assert_eq!(a, b);
    }

    #[test]
    fn test_learns_a_separable_boundary() {
        let (features, labels) = separable_data();
        let clf = LogisticRegression::fit(&features, &labels, DEFAULT_LEARNING_RATE, DEFAULT_EPOCHS)
            .expect("Should fit");

        let probs = clf.predict_proba(&features).expect("Should predict");
        for (p, &label) in probs.iter().zip(labels.iter()) {
            if label {
                assert!(*p > 0.5, "class-1 row should score above 0.5, got {p}");
            } else {
                assert!(*p < 0.5, "class-0 row should score below 0.5, got {p}");
            }
        }
    }

    #[test]
    fn test_probabilities_are_bounded() {
        let (features, labels) = separable_data();
        let clf = LogisticRegression::fit(&features, &labels, DEFAULT_LEARNING_RATE, DEFAULT_EPOCHS)
            .expect("Should fit");

        let probe = vec![vec![-100.0, 50.0], vec![100.0, -50.0], vec![5.0, 0.5]];
        for p in clf.predict_proba(&probe).expect("Should predict") {
            assert!((0.0..=1.0).contains(&p), "probability out of range: {p}");
        }
    }

    #[test]
    fn test_constant_columns_are_tolerated() {
        let features = vec![vec![1.0, 3.0], vec![1.0, 9.0], vec![1.0, 4.0], vec![1.0, 11.0]];
        let labels = vec![false, true, false, true];
        let clf = LogisticRegression::fit(&features, &labels, DEFAULT_LEARNING_RATE, DEFAULT_EPOCHS)
            .expect("Should fit despite a zero-variance column");
        let probs = clf.predict_proba(&features).expect("Should predict");
        assert!(probs[1] > probs[0]);
    }

    #[test]
    fn test_predict_dimension_mismatch() {
        let (features, labels) = separable_data();
        let clf = LogisticRegression::fit(&features, &labels, DEFAULT_LEARNING_RATE, DEFAULT_EPOCHS)
            .expect("Should fit");

        let result = clf.predict_proba(&[vec![1.0, 2.0, 3.0]]);
        assert!(matches!(
            result,
            Err(ModelError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_fit_rejects_bad_inputs() {
        assert!(matches!(
            LogisticRegression::fit(&[], &[], 0.5, 10),
            Err(ModelError::Training { .. })
        ));
        assert!(matches!(
            LogisticRegression::fit(&[vec![1.0]], &[true, false], 0.5, 10),
            Err(ModelError::Training { .. })
        ));
        assert!(matches!(
            LogisticRegression::fit(&[vec![]], &[true], 0.5, 10),
            Err(ModelError::Training { .. })
        ));
        assert!(matches!(
            LogisticRegression::fit(&[vec![1.0, 2.0], vec![1.0]], &[true, false], 0.5, 10),
            Err(ModelError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_serde_round_trip() {
        let (features, labels) = separable_data();
        let clf = LogisticRegression::fit(&features, &labels, DEFAULT_LEARNING_RATE, DEFAULT_EPOCHS)
            .expect("Should fit");

        let blob = serde_json::to_vec(&clf).expect("Should serialize");
        let restored: LogisticRegression = serde_json::from_slice(&blob).expect("Should parse");

        assert_eq!(restored, clf);
        assert_eq!(
            restored.predict_proba(&features).expect("predict"),
            clf.predict_proba(&features).expect("predict")
        );
    }
}

mod bootstrap_tests {
    use super::*;

    #[test]
    fn test_bootstrap_when_store_is_empty() {
        let store = MemoryArtifactStore::new();
        let bundle = ModelBundle::load(&store, &BundleConfig::lexical()).expect("Should load");

        assert_eq!(bundle.origin(), BundleOrigin::Bootstrapped);
        assert_eq!(store.len(), 2, "bootstrap must persist both artifacts");
    }

    #[test]
    fn test_second_load_restores_persisted_state() {
        let store = MemoryArtifactStore::new();
        let first = ModelBundle::load(&store, &BundleConfig::lexical()).expect("Should load");
        let second = ModelBundle::load(&store, &BundleConfig::lexical()).expect("Should load");

        assert_eq!(first.origin(), BundleOrigin::Bootstrapped);
        assert_eq!(second.origin(), BundleOrigin::Loaded);
        assert_eq!(second.classifier(), first.classifier());

        let text = "works as expected";
        assert_eq!(
            second.predict(text, None).expect("predict"),
            first.predict(text, None).expect("predict")
        );
    }

    #[test]
    fn test_bootstrap_is_deterministic_across_stores() {
        let a = ModelBundle::load(&MemoryArtifactStore::new(), &BundleConfig::lexical())
            .expect("Should load");
        let b = ModelBundle::load(&MemoryArtifactStore::new(), &BundleConfig::lexical())
            .expect("Should load");

        assert_eq!(a.classifier(), b.classifier());
        assert_eq!(a.feature_width(), b.feature_width());
    }

    #[test]
    fn test_feature_width_is_embedding_plus_behavioral() {
        use crate::constants::{BEHAVIORAL_WIDTH, TEMPORAL_WIDTH};

        let store = MemoryArtifactStore::new();
        let bundle = ModelBundle::load(&store, &BundleConfig::lexical()).expect("Should load");

        assert_eq!(
            bundle.feature_width(),
            bundle.embedder().embedding_dim() + BEHAVIORAL_WIDTH + TEMPORAL_WIDTH
        );
    }

    #[test]
    fn test_bootstrap_with_semantic_stub_backend() {
        use crate::constants::{BEHAVIORAL_WIDTH, DEFAULT_EMBEDDING_DIM};

        let store = MemoryArtifactStore::new();
        let config = BundleConfig::semantic(SemanticConfig::stub());
        let bundle = ModelBundle::load(&store, &config).expect("Should load");

        assert_eq!(
            bundle.feature_width(),
            DEFAULT_EMBEDDING_DIM + BEHAVIORAL_WIDTH
        );
        let prediction = bundle.predict("some review", None).expect("predict");
        assert!((0.0..=1.0).contains(&prediction.p_fake));
    }

    #[test]
    fn test_bootstrap_survives_missing_semantic_model() {
        use crate::embedding::EmbedderBackendKind;

        let store = MemoryArtifactStore::new();
        let config = BundleConfig::semantic(SemanticConfig::new("/nonexistent/model/dir"));
        let bundle = ModelBundle::load(&store, &config).expect("Should bootstrap via downgrade");

        assert_eq!(
            bundle.embedder().backend_kind(),
            EmbedderBackendKind::Lexical
        );
        bundle.predict("still produces predictions", None).expect("predict");

        // The persisted embedder artifact reflects the downgraded state.
        let reloaded = ModelBundle::load(&store, &config).expect("Should reload");
        assert_eq!(reloaded.origin(), BundleOrigin::Loaded);
        assert_eq!(
            reloaded.embedder().backend_kind(),
            EmbedderBackendKind::Lexical
        );
    }
}

mod predict_tests {
    use super::*;

    fn bundle() -> ModelBundle {
        ModelBundle::load(&MemoryArtifactStore::new(), &BundleConfig::lexical())
            .expect("Should load")
    }

    #[test]
    fn test_verified_seed_review_scores_genuine() {
        let metadata = ReviewMetadata {
            verified: true,
            account_age_days: 365,
        };
        let prediction = bundle()
            .predict("great product", Some(&metadata))
            .expect("Should predict");

        assert_eq!(prediction.label, Label::Genuine);
        assert!(prediction.p_fake < 0.5);
    }

    #[test]
    fn test_spammy_seed_review_scores_fake() {
        let metadata = ReviewMetadata {
            verified: false,
            account_age_days: 1,
        };
        let prediction = bundle()
            .predict("fake review buy now", Some(&metadata))
            .expect("Should predict");

        assert_eq!(prediction.label, Label::Fake);
        assert!(prediction.p_fake >= 0.5);
    }

    #[test]
    fn test_label_agrees_with_threshold_and_trust_rule() {
        let bundle = bundle();
        let texts = [
            "great product",
            "awful scam",
            "fake review buy now",
            "completely unrelated words",
            "",
        ];

        for text in texts {
            let p = bundle.predict(text, None).expect("Should predict");
            assert!((0.0..=1.0).contains(&p.trust_score));
            assert_eq!(p.label == Label::Fake, p.p_fake >= 0.5);
            match p.label {
                Label::Fake => assert!((p.trust_score - (1.0 - p.p_fake)).abs() < 1e-6),
                Label::Genuine => assert!((p.trust_score - p.p_fake).abs() < 1e-6),
            }
        }
    }

    #[test]
    fn test_missing_metadata_defaults_apply() {
        let bundle = bundle();
        let explicit = ReviewMetadata {
            verified: false,
            account_age_days: 0,
        };
        assert_eq!(
            bundle.predict("some text", None).expect("predict"),
            bundle.predict("some text", Some(&explicit)).expect("predict")
        );
    }

    #[test]
    fn test_feature_vector_matches_classifier_width() {
        let bundle = bundle();
        let row = bundle
            .feature_vector("any review text", None)
            .expect("Should assemble");
        assert_eq!(row.len(), bundle.feature_width());
    }

    #[test]
    fn test_markup_and_emoji_do_not_change_the_score() {
        let bundle = bundle();
        let plain = bundle.predict("great product", None).expect("predict");
        let noisy = bundle
            .predict("<p>great \u{1F600} product</p>", None)
            .expect("predict");
        assert_eq!(plain, noisy);
    }
}

mod train_tests {
    use super::*;

    fn corpus() -> Vec<TrainingExample> {
        vec![
            TrainingExample {
                text: "arrived on time and works perfectly".to_string(),
                fake: false,
                verified: true,
                account_age_days: 400,
            },
            TrainingExample {
                text: "best product ever buy now limited offer".to_string(),
                fake: true,
                verified: false,
                account_age_days: 3,
            },
            TrainingExample {
                text: "solid build quality for the price".to_string(),
                fake: false,
                verified: true,
                account_age_days: 150,
            },
            TrainingExample {
                text: "amazing deal click the link now".to_string(),
                fake: true,
                verified: false,
                account_age_days: 1,
            },
        ]
    }

    #[test]
    fn test_train_produces_a_persisted_bundle() {
        let store = MemoryArtifactStore::new();
        let bundle =
            ModelBundle::train(&store, &BundleConfig::lexical(), &corpus()).expect("Should train");

        assert_eq!(bundle.origin(), BundleOrigin::Trained);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_trained_bundle_separates_its_corpus() {
        let store = MemoryArtifactStore::new();
        let corpus = corpus();
        let bundle =
            ModelBundle::train(&store, &BundleConfig::lexical(), &corpus).expect("Should train");

        for example in &corpus {
            let metadata = ReviewMetadata {
                verified: example.verified,
                account_age_days: example.account_age_days,
            };
            let prediction = bundle
                .predict(&example.text, Some(&metadata))
                .expect("Should predict");
            assert_eq!(prediction.label.is_fake(), example.fake, "{}", example.text);
        }
    }

    #[test]
    fn test_load_after_train_restores_the_trained_model() {
        let store = MemoryArtifactStore::new();
        let trained =
            ModelBundle::train(&store, &BundleConfig::lexical(), &corpus()).expect("Should train");

        let loaded = ModelBundle::load(&store, &BundleConfig::lexical()).expect("Should load");
        assert_eq!(loaded.origin(), BundleOrigin::Loaded);
        assert_eq!(loaded.classifier(), trained.classifier());
    }

    #[test]
    fn test_duplicates_and_short_texts_are_discarded() {
        let mut corpus = corpus();
        corpus.push(corpus[0].clone()); // exact duplicate
        corpus.push(TrainingExample {
            text: "x".to_string(), // too short to keep
            fake: true,
            verified: false,
            account_age_days: 1,
        });

        let store = MemoryArtifactStore::new();
        ModelBundle::train(&store, &BundleConfig::lexical(), &corpus).expect("Should train");
    }

    #[test]
    fn test_unusable_corpus_is_an_error() {
        let corpus = vec![TrainingExample {
            text: "  ".to_string(),
            fake: false,
            verified: false,
            account_age_days: 0,
        }];
        let result = ModelBundle::train(&MemoryArtifactStore::new(), &BundleConfig::lexical(), &corpus);
        assert!(matches!(result, Err(ModelError::Training { .. })));
    }
}
