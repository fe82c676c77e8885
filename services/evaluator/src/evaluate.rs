use crate::infra::SnapshotOrganizations;
use clap::Args;
use futures::future::join_all;
use nvi_points::config::AppConfig;
use nvi_points::error::AppError;
use nvi_points::evaluation::{
    EvaluatedMessage, EvaluationError, NviEvaluator, OrganizationRetriever, PublicationDocument,
};
use nvi_points::telemetry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Organization registry snapshot (JSON with `organizations` and `nviInstitutions`)
    #[arg(long)]
    pub(crate) organizations: PathBuf,
    /// Publication documents to evaluate
    #[arg(required = true)]
    pub(crate) publications: Vec<PathBuf>,
    /// Pretty-print each evaluated message instead of one JSON line per document
    #[arg(long)]
    pub(crate) pretty: bool,
}

pub(crate) async fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let registry = SnapshotOrganizations::from_path(&args.organizations)?;
    let evaluator = NviEvaluator::new(config.evaluation.clone(), Arc::new(registry));

    let documents = args
        .publications
        .iter()
        .map(|path| load_document(path).map(|document| (bucket_uri(path), document)))
        .collect::<Result<Vec<_>, AppError>>()?;

    info!(
        ?config.environment,
        documents = documents.len(),
        "evaluating publications"
    );

    let outcomes = evaluate_all(&evaluator, &documents).await;

    let mut first_failure = None;
    for ((uri, _), outcome) in documents.iter().zip(outcomes) {
        match outcome {
            Ok(message) => {
                debug!(document = %uri, publication = %message.publication_id(), "evaluated");
                println!("{}", render(&message, args.pretty)?);
            }
            Err(err) => {
                error!(document = %uri, error = %err, "evaluation failed");
                first_failure.get_or_insert(err);
            }
        }
    }

    match first_failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Evaluates every document concurrently; results keep the input order.
pub(crate) async fn evaluate_all<O>(
    evaluator: &NviEvaluator<O>,
    documents: &[(String, PublicationDocument)],
) -> Vec<Result<EvaluatedMessage, EvaluationError>>
where
    O: OrganizationRetriever + ?Sized,
{
    join_all(
        documents
            .iter()
            .map(|(uri, document)| evaluator.evaluate(document, uri)),
    )
    .await
}

fn load_document(path: &Path) -> Result<PublicationDocument, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(PublicationDocument::from_json(&raw)?)
}

fn bucket_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

fn render(message: &EvaluatedMessage, pretty: bool) -> Result<String, AppError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(message)?
    } else {
        message.to_json()?
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nvi_points::evaluation::{EvaluationConfig, NonCandidateReason};
    use rust_decimal::Decimal;

    fn fixture(relative: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../fixtures")
            .join(relative)
    }

    fn documents(names: &[&str]) -> Vec<(String, PublicationDocument)> {
        names
            .iter()
            .map(|name| {
                let path = fixture(&format!("publications/{name}"));
                let document = load_document(&path).expect("fixture parses");
                (bucket_uri(&path), document)
            })
            .collect()
    }

    #[tokio::test]
    async fn evaluates_fixtures_in_input_order() {
        let registry = SnapshotOrganizations::from_path(fixture("organizations.json"))
            .expect("registry loads");
        let evaluator = NviEvaluator::new(EvaluationConfig::default(), Arc::new(registry));
        let documents = documents(&[
            "draft-monograph.json",
            "legacy-chapter.json",
            "article-two-institutions.json",
        ]);

        let outcomes: Vec<EvaluatedMessage> = evaluate_all(&evaluator, &documents)
            .await
            .into_iter()
            .collect::<Result<_, _>>()
            .expect("all fixtures evaluate");

        assert_eq!(outcomes.len(), 3);
        assert_eq!(
            outcomes[0].non_candidate_reason(),
            Some(&NonCandidateReason::NotPublished {
                status: "DRAFT".to_string(),
            })
        );
        assert_eq!(outcomes[1].total_points(), Some(Decimal::new(18384, 4)));
        assert_eq!(outcomes[2].total_points(), Some(Decimal::new(11548, 4)));

        let candidate = outcomes[2].as_candidate().expect("article is a candidate");
        assert!(candidate
            .publication_bucket_uri
            .ends_with("article-two-institutions.json"));
    }

    #[test]
    fn renders_one_line_per_message_unless_pretty() {
        let message = EvaluatedMessage::non_candidate(
            &nvi_points::evaluation::PublicationId("https://api.example.org/publication/9".into()),
            NonCandidateReason::NoNviInstitution,
        );

        let compact = render(&message, false).expect("renders");
        let pretty = render(&message, true).expect("renders");

        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&compact).expect("valid json"),
            serde_json::from_str::<serde_json::Value>(&pretty).expect("valid json")
        );
    }
}
