use async_trait::async_trait;
use nvi_points::error::AppError;
use nvi_points::evaluation::{
    Organization, OrganizationId, OrganizationRetrievalError, OrganizationRetriever,
};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Registry export: organization trees with `partOf` chains and the NVI reporting institutions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegistrySnapshot {
    #[serde(default)]
    pub(crate) organizations: Vec<Organization>,
    #[serde(default)]
    pub(crate) nvi_institutions: Vec<OrganizationId>,
}

/// Organization retriever answering from a registry snapshot loaded into memory.
#[derive(Debug)]
pub(crate) struct SnapshotOrganizations {
    nodes: HashMap<OrganizationId, Organization>,
    nvi_institutions: HashSet<OrganizationId>,
}

impl SnapshotOrganizations {
    pub(crate) fn from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let snapshot: RegistrySnapshot = serde_json::from_str(&raw)?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub(crate) fn from_snapshot(snapshot: RegistrySnapshot) -> Self {
        let mut registry = Self {
            nodes: HashMap::new(),
            nvi_institutions: snapshot.nvi_institutions.into_iter().collect(),
        };
        for organization in &snapshot.organizations {
            registry.index(organization);
        }
        debug!(
            organizations = registry.nodes.len(),
            nvi_institutions = registry.nvi_institutions.len(),
            "loaded organization registry snapshot"
        );
        registry
    }

    // Every node on a partOf chain is addressable; the first occurrence of an id wins.
    fn index(&mut self, organization: &Organization) {
        if let Some(id) = &organization.id {
            self.nodes
                .entry(id.clone())
                .or_insert_with(|| organization.clone());
        }
        for parent in &organization.part_of {
            self.index(parent);
        }
    }
}

#[async_trait]
impl OrganizationRetriever for SnapshotOrganizations {
    async fn fetch_organization(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<Organization>, OrganizationRetrievalError> {
        Ok(self.nodes.get(id).cloned())
    }

    async fn is_nvi_institution(
        &self,
        institution_id: &OrganizationId,
    ) -> Result<bool, OrganizationRetrievalError> {
        Ok(self.nvi_institutions.contains(institution_id))
    }
}
