use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::EvaluationConfig;
use super::document::MalformedInput;
use super::domain::{
    ChannelType, InstanceType, OrganizationId, PublicationChannel, PublicationDetails,
    PublicationStatus,
};
use super::organization::ResolvedCreator;

/// Why a publication did not qualify. Non-candidacy is a regular outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "camelCase")]
pub enum NonCandidateReason {
    NotPublished {
        status: String,
    },
    #[serde(rename_all = "camelCase")]
    PublishedBeforeEarliestYear {
        year: i32,
        earliest_year: i32,
    },
    #[serde(rename_all = "camelCase")]
    UnsupportedInstanceType {
        instance_type: String,
    },
    NoVerifiedAffiliatedCreator,
    ChannelWithoutScientificValue,
    NoNviInstitution,
}

impl NonCandidateReason {
    pub fn summary(&self) -> String {
        match self {
            NonCandidateReason::NotPublished { status } => {
                format!("publication status {status} is not PUBLISHED")
            }
            NonCandidateReason::PublishedBeforeEarliestYear {
                year,
                earliest_year,
            } => format!("published {year}, before {earliest_year}"),
            NonCandidateReason::UnsupportedInstanceType { instance_type } => {
                format!("instance type {instance_type} is not an NVI category")
            }
            NonCandidateReason::NoVerifiedAffiliatedCreator => {
                "no verified creator with a resolvable institution".to_string()
            }
            NonCandidateReason::ChannelWithoutScientificValue => {
                "publication channel has no scientific value".to_string()
            }
            NonCandidateReason::NoNviInstitution => {
                "no creator is affiliated with an NVI institution".to_string()
            }
        }
    }
}

/// Rules 1-3: status, publication year and instance type. These need no lookups.
pub(crate) fn screen_publication(
    details: &PublicationDetails,
    config: &EvaluationConfig,
) -> Result<(), NonCandidateReason> {
    if let PublicationStatus::Other(status) = &details.status {
        return Err(NonCandidateReason::NotPublished {
            status: status.clone(),
        });
    }

    let year = details.publication_date.year;
    if year < config.earliest_publication_year {
        return Err(NonCandidateReason::PublishedBeforeEarliestYear {
            year,
            earliest_year: config.earliest_publication_year,
        });
    }

    if !config.accepts(&details.instance_type) {
        return Err(NonCandidateReason::UnsupportedInstanceType {
            instance_type: details.instance_type.label().to_string(),
        });
    }

    debug!(publication = %details.id, "publication passed status, year and type screening");
    Ok(())
}

/// Rule 4: at least one verified creator must reach a top-level institution.
pub(crate) fn require_affiliated_creator(
    creators: &[ResolvedCreator],
) -> Result<(), NonCandidateReason> {
    if creators
        .iter()
        .any(|creator| !creator.affiliations.is_empty())
    {
        Ok(())
    } else {
        Err(NonCandidateReason::NoVerifiedAffiliatedCreator)
    }
}

/// Rule 5: the channel the points are computed from.
///
/// Chapters in an unleveled (or missing) series fall back to the publisher of the book. A channel
/// spelling outside the known vocabulary only fails the evaluation here, once rules 1 to 4 passed.
pub(crate) fn effective_channel(
    details: &PublicationDetails,
) -> Result<Result<PublicationChannel, NonCandidateReason>, MalformedInput> {
    if let Some(declared) = &details.channel {
        let channel = declared.recognized("publicationChannel")?;
        if channel.scientific_value.is_assigned() {
            return Ok(Ok(channel.clone()));
        }
    }

    if details.instance_type == InstanceType::AcademicChapter {
        if let Some(declared) = &details.publisher {
            let publisher = declared.recognized("publisher")?;
            if publisher.scientific_value.is_assigned() {
                debug!(publication = %details.id, "chapter falls back to publisher level");
                return Ok(Ok(PublicationChannel {
                    channel_type: ChannelType::Publisher,
                    ..publisher.clone()
                }));
            }
        }
    }

    Ok(Err(NonCandidateReason::ChannelWithoutScientificValue))
}

/// Rule 6: at least one resolved institution must report to NVI.
pub(crate) fn require_nvi_institution(
    creators: &[ResolvedCreator],
    nvi_institutions: &HashMap<OrganizationId, bool>,
) -> Result<(), NonCandidateReason> {
    let found = creators
        .iter()
        .flat_map(ResolvedCreator::institutions)
        .any(|institution| nvi_institutions.get(institution).copied().unwrap_or(false));

    if found {
        Ok(())
    } else {
        Err(NonCandidateReason::NoNviInstitution)
    }
}

/// Publications are international collaborations when institutions span several countries.
pub(crate) fn is_international_collaboration(creators: &[ResolvedCreator]) -> bool {
    let countries: BTreeSet<&str> = creators
        .iter()
        .flat_map(|creator| &creator.affiliations)
        .filter_map(|affiliation| affiliation.institution.country_code.as_deref())
        .collect();
    countries.len() > 1
}

/// One share per verified creator, affiliated or not, plus unverified creators when configured.
pub(crate) fn creator_share_count(details: &PublicationDetails, config: &EvaluationConfig) -> u32 {
    let verified = details.verified_creators().count();
    let unverified = if config.count_unverified_creator_shares {
        details.unverified_creator_count()
    } else {
        0
    };
    u32::try_from(verified + unverified).unwrap_or(u32::MAX)
}
