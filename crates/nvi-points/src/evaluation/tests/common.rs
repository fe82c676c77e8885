use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::evaluation::{
    EvaluationConfig, NviEvaluator, Organization, OrganizationId, OrganizationRetrievalError,
    OrganizationRetriever, PublicationDocument,
};

pub(super) const NTNU: &str = "https://api.cristin.no/v2/organizations/194.0.0.0";
pub(super) const NTNU_CHEMISTRY: &str = "https://api.cristin.no/v2/organizations/194.63.10.0";
pub(super) const NTNU_PHYSICS: &str = "https://api.cristin.no/v2/organizations/194.63.15.0";
pub(super) const UIO: &str = "https://api.cristin.no/v2/organizations/185.0.0.0";
pub(super) const UIO_LAW: &str = "https://api.cristin.no/v2/organizations/185.90.0.0";
pub(super) const LUND: &str = "https://api.cristin.no/v2/organizations/7428.0.0.0";
pub(super) const LUND_MEDICINE: &str = "https://api.cristin.no/v2/organizations/7428.4.0.0";
pub(super) const UNKNOWN_UNIT: &str = "https://api.cristin.no/v2/organizations/0.0.0.404";

/// Organization registry backed by a map, recording every lookup.
#[derive(Default)]
pub(super) struct MemoryOrganizations {
    organizations: HashMap<OrganizationId, Organization>,
    nvi_institutions: HashSet<OrganizationId>,
    unavailable: HashSet<OrganizationId>,
    lookups: Mutex<Vec<OrganizationId>>,
}

impl MemoryOrganizations {
    pub(super) fn with_unit(mut self, unit: &str, institution: &str, country: &str) -> Self {
        let parent = top_level(institution, country);
        self.organizations.insert(
            OrganizationId(unit.to_string()),
            Organization {
                id: Some(OrganizationId(unit.to_string())),
                country_code: None,
                part_of: vec![parent],
                has_part: Vec::new(),
            },
        );
        self.with_institution(institution, country)
    }

    pub(super) fn with_institution(mut self, institution: &str, country: &str) -> Self {
        self.organizations.insert(
            OrganizationId(institution.to_string()),
            top_level(institution, country),
        );
        self
    }

    pub(super) fn with_anonymous_parent(mut self, unit: &str) -> Self {
        self.organizations.insert(
            OrganizationId(unit.to_string()),
            Organization {
                id: Some(OrganizationId(unit.to_string())),
                country_code: None,
                part_of: vec![Organization::default()],
                has_part: Vec::new(),
            },
        );
        self
    }

    pub(super) fn nvi(mut self, institution: &str) -> Self {
        self.nvi_institutions
            .insert(OrganizationId(institution.to_string()));
        self
    }

    pub(super) fn unavailable(mut self, unit: &str) -> Self {
        self.unavailable.insert(OrganizationId(unit.to_string()));
        self
    }

    pub(super) fn lookups(&self) -> Vec<OrganizationId> {
        self.lookups.lock().expect("lookup mutex poisoned").clone()
    }
}

fn top_level(institution: &str, country: &str) -> Organization {
    Organization {
        id: Some(OrganizationId(institution.to_string())),
        country_code: Some(country.to_string()),
        part_of: Vec::new(),
        has_part: Vec::new(),
    }
}

#[async_trait]
impl OrganizationRetriever for MemoryOrganizations {
    async fn fetch_organization(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<Organization>, OrganizationRetrievalError> {
        self.lookups
            .lock()
            .expect("lookup mutex poisoned")
            .push(id.clone());
        if self.unavailable.contains(id) {
            return Err(OrganizationRetrievalError::UpstreamStatus {
                id: id.clone(),
                status: 502,
            });
        }
        Ok(self.organizations.get(id).cloned())
    }

    async fn is_nvi_institution(
        &self,
        institution_id: &OrganizationId,
    ) -> Result<bool, OrganizationRetrievalError> {
        Ok(self.nvi_institutions.contains(institution_id))
    }
}

/// Two Norwegian NVI institutions with sub-units, one Swedish institution.
pub(super) fn registry() -> MemoryOrganizations {
    MemoryOrganizations::default()
        .with_unit(NTNU_CHEMISTRY, NTNU, "NO")
        .with_unit(NTNU_PHYSICS, NTNU, "NO")
        .with_unit(UIO_LAW, UIO, "NO")
        .with_unit(LUND_MEDICINE, LUND, "SE")
        .nvi(NTNU)
        .nvi(UIO)
}

pub(super) fn evaluator(
    organizations: MemoryOrganizations,
) -> (NviEvaluator<MemoryOrganizations>, Arc<MemoryOrganizations>) {
    evaluator_with_config(organizations, EvaluationConfig::default())
}

pub(super) fn evaluator_with_config(
    organizations: MemoryOrganizations,
    config: EvaluationConfig,
) -> (NviEvaluator<MemoryOrganizations>, Arc<MemoryOrganizations>) {
    let organizations = Arc::new(organizations);
    (NviEvaluator::new(config, organizations.clone()), organizations)
}

pub(super) fn verified(index: usize, affiliations: &[&str]) -> Value {
    json!({
        "id": format!("https://api.cristin.no/v2/persons/{index}"),
        "name": format!("Verified Creator {index}"),
        "verificationStatus": "Verified",
        "role": { "type": "Creator" },
        "affiliations": affiliations
            .iter()
            .map(|id| json!({ "type": "Organization", "id": id }))
            .collect::<Vec<_>>(),
    })
}

pub(super) fn unverified(name: &str, affiliations: &[&str]) -> Value {
    json!({
        "name": name,
        "verificationStatus": "NotVerified",
        "role": { "type": "Creator" },
        "affiliations": affiliations
            .iter()
            .map(|id| json!({ "type": "Organization", "id": id }))
            .collect::<Vec<_>>(),
    })
}

pub(super) fn journal_article(year: &str, level: &str, contributors: Vec<Value>) -> Value {
    json!({
        "id": "https://api.example.org/publication/01890a3c6ef4-article",
        "status": "PUBLISHED",
        "publicationDate": { "year": year, "month": "4", "day": "17" },
        "instanceType": "AcademicArticle",
        "contributors": contributors,
        "publicationChannel": {
            "id": "https://api.example.org/publication-channels/journal/490845",
            "type": "Journal",
            "scientificValue": level
        }
    })
}

pub(super) fn monograph(level: &str, contributors: Vec<Value>) -> Value {
    json!({
        "id": "https://api.example.org/publication/01890a3c6ef4-monograph",
        "status": "PUBLISHED",
        "publicationDate": { "year": "2023" },
        "instanceType": "AcademicMonograph",
        "contributors": contributors,
        "publicationChannel": {
            "id": "https://api.example.org/publication-channels/series/495196",
            "type": "Series",
            "scientificValue": level
        }
    })
}

pub(super) fn chapter(series_level: &str, publisher_level: &str, contributors: Vec<Value>) -> Value {
    json!({
        "id": "https://api.example.org/publication/01890a3c6ef4-chapter",
        "status": "PUBLISHED",
        "publicationDate": { "year": "2024" },
        "instanceType": "AcademicChapter",
        "contributors": contributors,
        "publicationChannel": {
            "id": "https://api.example.org/publication-channels/series/495196",
            "type": "Series",
            "scientificValue": series_level
        },
        "publisher": {
            "id": "https://api.example.org/publication-channels/publisher/24310",
            "scientificValue": publisher_level
        }
    })
}

pub(super) fn document(raw: Value) -> PublicationDocument {
    serde_json::from_value(raw).expect("document deserializes")
}

pub(super) fn dec(raw: &str) -> Decimal {
    raw.parse().expect("valid decimal literal")
}

pub(super) fn org(id: &str) -> OrganizationId {
    OrganizationId(id.to_string())
}

pub(super) const BUCKET_URI: &str = "s3://expanded-resources/01890a3c6ef4.gz";
