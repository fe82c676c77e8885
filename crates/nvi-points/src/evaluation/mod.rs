//! NVI candidate classification and point calculation.
//!
//! [`NviEvaluator`] runs one publication document through input normalization, creator
//! classification, the candidacy rules, organization resolution and the point calculator, and
//! assembles the resulting [`EvaluatedMessage`].

mod config;
pub(crate) mod creators;
pub mod document;
pub mod domain;
pub mod message;
pub(crate) mod normalizer;
pub mod organization;
pub mod points;
pub(crate) mod policy;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::{debug, info};

pub use config::{EvaluationConfig, DEFAULT_EARLIEST_PUBLICATION_YEAR};
pub use document::{MalformedInput, PublicationDocument};
pub use domain::{
    ChannelId, ChannelType, CreatorId, DeclaredChannel, InstanceType, NviCreator, OrganizationId,
    PublicationChannel, PublicationDate, PublicationDetails, PublicationId, PublicationStatus,
    ScientificValue, UnverifiedCreator, VerifiedCreator,
};
pub use message::{Candidate, EvaluatedCandidate, EvaluatedMessage, NonCandidate};
pub use organization::{
    Organization, OrganizationRetrievalError, OrganizationRetriever, ResolvedAffiliation,
    ResolvedCreator, ResolvedInstitution,
};
pub use points::{
    base_points, base_points_table, calculate_points, BasePointsEntry, CreatorAffiliationPoints,
    InstitutionPoints, PointCalculation, PointRequest, PointsError,
};
pub use policy::NonCandidateReason;

/// Fatal evaluation failures. A non-candidate outcome is never reported through this type.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error(transparent)]
    MalformedInput(#[from] MalformedInput),
    #[error(transparent)]
    Points(#[from] PointsError),
    #[error(transparent)]
    Retrieval(#[from] OrganizationRetrievalError),
}

/// Stateless evaluator applying the NVI rules to publication documents.
pub struct NviEvaluator<O: ?Sized> {
    config: EvaluationConfig,
    organizations: Arc<O>,
}

impl<O> NviEvaluator<O>
where
    O: OrganizationRetriever + ?Sized,
{
    pub fn new(config: EvaluationConfig, organizations: Arc<O>) -> Self {
        Self {
            config,
            organizations,
        }
    }

    /// Evaluate a raw document stored at `bucket_uri`.
    pub async fn evaluate(
        &self,
        document: &PublicationDocument,
        bucket_uri: &str,
    ) -> Result<EvaluatedMessage, EvaluationError> {
        let details = PublicationDetails::from_document(document, bucket_uri)?;
        self.evaluate_details(&details).await
    }

    /// Evaluate an already normalized publication snapshot.
    pub async fn evaluate_details(
        &self,
        details: &PublicationDetails,
    ) -> Result<EvaluatedMessage, EvaluationError> {
        let message = match self.classify(details).await? {
            Ok(calculation) => {
                info!(
                    publication = %details.id,
                    total_points = %calculation.total_points,
                    institutions = calculation.institution_points.len(),
                    "publication is an nvi candidate"
                );
                EvaluatedMessage::candidate(details, calculation)
            }
            Err(reason) => {
                info!(
                    publication = %details.id,
                    reason = %reason.summary(),
                    "publication is not an nvi candidate"
                );
                EvaluatedMessage::non_candidate(&details.id, reason)
            }
        };
        Ok(message)
    }

    // Outer error aborts the evaluation; inner error is the business-rule outcome.
    async fn classify(
        &self,
        details: &PublicationDetails,
    ) -> Result<Result<PointCalculation, NonCandidateReason>, EvaluationError> {
        if let Err(reason) = policy::screen_publication(details, &self.config) {
            return Ok(Err(reason));
        }

        let organizations = self.organizations.as_ref();
        let resolved =
            organization::resolve_creators(organizations, details.verified_creators()).await?;
        if let Err(reason) = policy::require_affiliated_creator(&resolved) {
            return Ok(Err(reason));
        }

        let channel = match policy::effective_channel(details)? {
            Ok(channel) => channel,
            Err(reason) => return Ok(Err(reason)),
        };

        let nvi_institutions = organization::nvi_institutions(organizations, &resolved).await?;
        if let Err(reason) = policy::require_nvi_institution(&resolved, &nvi_institutions) {
            return Ok(Err(reason));
        }

        let is_international_collaboration = policy::is_international_collaboration(&resolved);
        let creator_share_count = policy::creator_share_count(details, &self.config);
        debug!(
            publication = %details.id,
            is_international_collaboration,
            creator_share_count,
            "calculating points"
        );

        let calculation = calculate_points(&PointRequest {
            instance_type: &details.instance_type,
            channel: &channel,
            is_international_collaboration,
            creator_share_count,
            creators: &resolved,
        })?;
        Ok(Ok(calculation))
    }
}
