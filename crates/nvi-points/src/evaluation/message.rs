use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{InstanceType, NviCreator, PublicationDate, PublicationDetails, PublicationId};
use super::points::PointCalculation;
use super::policy::NonCandidateReason;

/// Envelope handed to the outbound queue; exactly one per evaluated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatedMessage {
    pub candidate: EvaluatedCandidate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "candidateType")]
pub enum EvaluatedCandidate {
    Candidate(Candidate),
    NonCandidate(NonCandidate),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub publication_id: PublicationId,
    pub publication_bucket_uri: String,
    pub instance_type: InstanceType,
    pub publication_date: PublicationDate,
    pub creator_share_count: u32,
    pub point_calculation: PointCalculation,
    pub creators: Vec<NviCreator>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonCandidate {
    pub publication_id: PublicationId,
    pub reason: NonCandidateReason,
}

impl EvaluatedMessage {
    pub fn candidate(details: &PublicationDetails, point_calculation: PointCalculation) -> Self {
        Self {
            candidate: EvaluatedCandidate::Candidate(Candidate {
                publication_id: details.id.clone(),
                publication_bucket_uri: details.bucket_uri.clone(),
                instance_type: details.instance_type.clone(),
                publication_date: details.publication_date.clone(),
                creator_share_count: point_calculation.creator_share_count,
                point_calculation,
                creators: details.creators.clone(),
            }),
        }
    }

    pub fn non_candidate(publication_id: &PublicationId, reason: NonCandidateReason) -> Self {
        Self {
            candidate: EvaluatedCandidate::NonCandidate(NonCandidate {
                publication_id: publication_id.clone(),
                reason,
            }),
        }
    }

    pub fn publication_id(&self) -> &PublicationId {
        match &self.candidate {
            EvaluatedCandidate::Candidate(candidate) => &candidate.publication_id,
            EvaluatedCandidate::NonCandidate(non_candidate) => &non_candidate.publication_id,
        }
    }

    pub fn as_candidate(&self) -> Option<&Candidate> {
        match &self.candidate {
            EvaluatedCandidate::Candidate(candidate) => Some(candidate),
            EvaluatedCandidate::NonCandidate(_) => None,
        }
    }

    pub fn non_candidate_reason(&self) -> Option<&NonCandidateReason> {
        match &self.candidate {
            EvaluatedCandidate::Candidate(_) => None,
            EvaluatedCandidate::NonCandidate(non_candidate) => Some(&non_candidate.reason),
        }
    }

    pub fn total_points(&self) -> Option<Decimal> {
        self.as_candidate()
            .map(|candidate| candidate.point_calculation.total_points)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
