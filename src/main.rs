//! Credence CLI entrypoint: score one review and print the JSON response.

use std::sync::Arc;

use credence::config::Config;
use credence::model::{ModelBundle, ReviewMetadata};
use credence::pipeline::{InferenceEngine, ReviewSubmission};
use credence::storage::FsArtifactStore;
use credence::translate::{HttpTranslator, NoopTranslator, Translator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let submission = match parse_args(std::env::args().skip(1)) {
        Some(submission) => submission,
        None => {
            eprintln!(
                "usage: credence <text> [--lang CODE] [--verified] [--account-age DAYS]"
            );
            std::process::exit(2);
        }
    };

    let config = Config::from_env()?;
    config.validate()?;

    let store = FsArtifactStore::new(config.storage_path.clone());
    let bundle = ModelBundle::load(&store, &config.bundle_config())?;

    let translator: Arc<dyn Translator> = match &config.translate_url {
        Some(url) => Arc::new(HttpTranslator::new(url.clone())),
        None => Arc::new(NoopTranslator),
    };

    let engine = InferenceEngine::new(Arc::new(bundle), translator, config.explainer_config());

    let scored = engine.score(&submission).await?;
    println!("{}", serde_json::to_string_pretty(&scored)?);

    Ok(())
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Option<ReviewSubmission> {
    let text = args.next()?;
    let mut submission = ReviewSubmission::new(text);
    let mut metadata: Option<ReviewMetadata> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--lang" => {
                submission = submission.with_language(args.next()?);
            }
            "--verified" => {
                metadata.get_or_insert_with(ReviewMetadata::default).verified = true;
            }
            "--account-age" => {
                let days = args.next()?.parse().ok()?;
                metadata
                    .get_or_insert_with(ReviewMetadata::default)
                    .account_age_days = days;
            }
            _ => return None,
        }
    }

    if let Some(metadata) = metadata {
        submission = submission.with_metadata(metadata);
    }
    Some(submission)
}
