use super::document::RawContributor;
use super::domain::{CreatorId, NviCreator, OrganizationId, UnverifiedCreator, VerifiedCreator};
use super::normalizer::normalize_token;

const CREATOR_ROLE: &str = "creator";
const VERIFIED_STATUS: &str = "verified";

/// Partitions contributors into verified and unverified creators, preserving input order.
///
/// Contributors with any other role are dropped. Affiliations without an id are dropped and
/// repeated affiliation ids collapse to their first occurrence.
pub(crate) fn classify_creators(contributors: &[RawContributor]) -> Vec<NviCreator> {
    contributors
        .iter()
        .filter(|contributor| is_creator(contributor))
        .map(classify)
        .collect()
}

fn is_creator(contributor: &RawContributor) -> bool {
    contributor
        .role
        .as_ref()
        .map(|role| normalize_token(role.kind()) == CREATOR_ROLE)
        .unwrap_or(false)
}

fn classify(contributor: &RawContributor) -> NviCreator {
    let affiliations = affiliation_ids(contributor);
    let verified = contributor
        .verification_status
        .as_deref()
        .map(|status| normalize_token(status) == VERIFIED_STATUS)
        .unwrap_or(false);

    match (&contributor.id, verified) {
        (Some(id), true) => NviCreator::Verified(VerifiedCreator {
            id: CreatorId(id.trim().to_string()),
            affiliations,
        }),
        _ => NviCreator::Unverified(UnverifiedCreator {
            name: contributor
                .name
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            affiliations,
        }),
    }
}

fn affiliation_ids(contributor: &RawContributor) -> Vec<OrganizationId> {
    let mut ids: Vec<OrganizationId> = Vec::with_capacity(contributor.affiliations.len());
    for id in contributor
        .affiliations
        .iter()
        .filter_map(|affiliation| affiliation.id())
    {
        if !ids.iter().any(|existing| existing.0 == id) {
            ids.push(OrganizationId(id.to_string()));
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::document::{RawAffiliation, RawRole};

    fn contributor(
        id: Option<&str>,
        status: &str,
        role: &str,
        affiliations: Vec<RawAffiliation>,
    ) -> RawContributor {
        RawContributor {
            id: id.map(str::to_string),
            name: Some("Ada Lovelace".to_string()),
            verification_status: Some(status.to_string()),
            role: Some(RawRole::Typed {
                kind: role.to_string(),
            }),
            affiliations,
        }
    }

    fn uri(value: &str) -> RawAffiliation {
        RawAffiliation::Uri(value.to_string())
    }

    #[test]
    fn verified_requires_status_and_id() {
        let creators = classify_creators(&[
            contributor(Some("https://cristin/person/1"), "Verified", "Creator", vec![]),
            contributor(None, "Verified", "Creator", vec![]),
            contributor(Some("https://cristin/person/3"), "NotVerified", "Creator", vec![]),
        ]);

        assert!(matches!(creators[0], NviCreator::Verified(_)));
        assert!(matches!(creators[1], NviCreator::Unverified(_)));
        assert!(matches!(creators[2], NviCreator::Unverified(_)));
    }

    #[test]
    fn non_creator_roles_are_excluded() {
        let creators = classify_creators(&[
            contributor(Some("https://cristin/person/1"), "Verified", "Editor", vec![]),
            contributor(Some("https://cristin/person/2"), "Verified", "Creator", vec![]),
        ]);

        assert_eq!(creators.len(), 1);
        let verified = creators[0].as_verified().expect("verified creator");
        assert_eq!(verified.id, CreatorId("https://cristin/person/2".to_string()));
    }

    #[test]
    fn affiliations_without_id_are_dropped_and_duplicates_collapse() {
        let creators = classify_creators(&[contributor(
            Some("https://cristin/person/1"),
            "Verified",
            "Creator",
            vec![
                uri("https://cristin/organization/194.63.10.0"),
                RawAffiliation::Organization { id: None },
                uri("https://cristin/organization/194.63.10.0"),
                uri("https://cristin/organization/194.64.0.0"),
            ],
        )]);

        assert_eq!(
            creators[0].affiliations(),
            &[
                OrganizationId("https://cristin/organization/194.63.10.0".to_string()),
                OrganizationId("https://cristin/organization/194.64.0.0".to_string()),
            ]
        );
    }

    #[test]
    fn plain_string_roles_are_accepted() {
        let mut plain = contributor(Some("https://cristin/person/1"), "Verified", "Creator", vec![]);
        plain.role = Some(RawRole::Plain("Creator".to_string()));

        assert_eq!(classify_creators(&[plain]).len(), 1);
    }
}
