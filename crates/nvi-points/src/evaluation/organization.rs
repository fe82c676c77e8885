use std::collections::HashMap;

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{CreatorId, OrganizationId, VerifiedCreator};

/// Organization node as returned by the organization registry.
///
/// A sub-unit points upwards through `part_of`; the node without a parent is the institution
/// points are aggregated on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(default)]
    pub id: Option<OrganizationId>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub part_of: Vec<Organization>,
    #[serde(default)]
    pub has_part: Vec<Organization>,
}

impl Organization {
    /// Follows the first parent link until reaching a node without parents.
    pub fn top_level(&self) -> &Organization {
        let mut current = self;
        while let Some(parent) = current.part_of.first() {
            current = parent;
        }
        current
    }

    /// Country of the top-most node on the parent chain that declares one, normally the
    /// institution itself.
    pub fn institution_country_code(&self) -> Option<&str> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(parent) = current.part_of.first() {
            chain.push(parent);
            current = parent;
        }
        chain
            .into_iter()
            .rev()
            .find_map(|node| node.country_code.as_deref())
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

/// Boundary to the organization registry.
///
/// Implementations are typically network-bound. Returning `Ok(None)` means the registry does
/// not know the affiliation; errors abort the evaluation.
#[async_trait]
pub trait OrganizationRetriever: Send + Sync {
    async fn fetch_organization(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<Organization>, OrganizationRetrievalError>;

    async fn is_nvi_institution(
        &self,
        institution_id: &OrganizationId,
    ) -> Result<bool, OrganizationRetrievalError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrganizationRetrievalError {
    #[error("organization registry unavailable: {0}")]
    Unavailable(String),
    #[error("organization registry returned status {status} for {id}")]
    UpstreamStatus { id: OrganizationId, status: u16 },
    #[error("organization registry returned an unreadable body for {id}: {detail}")]
    InvalidResponse { id: OrganizationId, detail: String },
}

/// Top-level institution an affiliation rolls up to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedInstitution {
    pub id: OrganizationId,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAffiliation {
    pub affiliation_id: OrganizationId,
    pub institution: ResolvedInstitution,
}

/// Verified creator with every affiliation resolved to its institution.
///
/// Affiliations the registry does not know, or whose top-level node has no id, are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCreator {
    pub id: CreatorId,
    pub affiliations: Vec<ResolvedAffiliation>,
}

impl ResolvedCreator {
    /// Distinct institutions in order of first appearance.
    pub fn institutions(&self) -> Vec<&OrganizationId> {
        let mut institutions: Vec<&OrganizationId> = Vec::new();
        for affiliation in &self.affiliations {
            if !institutions.contains(&&affiliation.institution.id) {
                institutions.push(&affiliation.institution.id);
            }
        }
        institutions
    }

    pub fn affiliations_in<'a>(
        &'a self,
        institution: &'a OrganizationId,
    ) -> impl Iterator<Item = &'a OrganizationId> + 'a {
        self.affiliations
            .iter()
            .filter(move |affiliation| &affiliation.institution.id == institution)
            .map(|affiliation| &affiliation.affiliation_id)
    }
}

pub(crate) async fn resolve_top_level<R>(
    retriever: &R,
    affiliation_id: &OrganizationId,
) -> Result<Option<ResolvedInstitution>, OrganizationRetrievalError>
where
    R: OrganizationRetriever + ?Sized,
{
    let Some(organization) = retriever.fetch_organization(affiliation_id).await? else {
        warn!(affiliation = %affiliation_id, "affiliation unknown to organization registry");
        return Ok(None);
    };

    let top_level = organization.top_level();
    let Some(id) = top_level.id.clone() else {
        warn!(affiliation = %affiliation_id, "top-level organization has no id");
        return Ok(None);
    };

    Ok(Some(ResolvedInstitution {
        id,
        country_code: organization.institution_country_code().map(str::to_string),
    }))
}

/// Resolves every distinct affiliation of the verified creators concurrently, then maps the
/// results back onto the creators in their original order.
pub(crate) async fn resolve_creators<'a, R, I>(
    retriever: &R,
    creators: I,
) -> Result<Vec<ResolvedCreator>, OrganizationRetrievalError>
where
    R: OrganizationRetriever + ?Sized,
    I: IntoIterator<Item = &'a VerifiedCreator>,
{
    let creators: Vec<&VerifiedCreator> = creators.into_iter().collect();

    let mut distinct: Vec<&OrganizationId> = Vec::new();
    for affiliation in creators
        .iter()
        .copied()
        .flat_map(|creator| creator.affiliations.iter())
    {
        if !distinct.contains(&affiliation) {
            distinct.push(affiliation);
        }
    }

    let lookups = distinct.iter().map(|affiliation| async move {
        let institution = resolve_top_level(retriever, affiliation).await?;
        Ok::<_, OrganizationRetrievalError>((*affiliation, institution))
    });
    let resolved: HashMap<&OrganizationId, Option<ResolvedInstitution>> =
        try_join_all(lookups).await?.into_iter().collect();
    debug!(affiliations = resolved.len(), "resolved creator affiliations");

    Ok(creators
        .into_iter()
        .map(|creator| ResolvedCreator {
            id: creator.id.clone(),
            affiliations: creator
                .affiliations
                .iter()
                .filter_map(|affiliation| {
                    resolved
                        .get(affiliation)
                        .cloned()
                        .flatten()
                        .map(|institution| ResolvedAffiliation {
                            affiliation_id: affiliation.clone(),
                            institution,
                        })
                })
                .collect(),
        })
        .collect())
}

/// Looks up NVI membership for each distinct institution concurrently.
pub(crate) async fn nvi_institutions<R>(
    retriever: &R,
    creators: &[ResolvedCreator],
) -> Result<HashMap<OrganizationId, bool>, OrganizationRetrievalError>
where
    R: OrganizationRetriever + ?Sized,
{
    let mut distinct: Vec<&OrganizationId> = Vec::new();
    for institution in creators.iter().flat_map(ResolvedCreator::institutions) {
        if !distinct.contains(&institution) {
            distinct.push(institution);
        }
    }

    let lookups = distinct.into_iter().map(|institution| async move {
        let member = retriever.is_nvi_institution(institution).await?;
        Ok::<_, OrganizationRetrievalError>((institution.clone(), member))
    });
    Ok(try_join_all(lookups).await?.into_iter().collect())
}
