//! Point calculation for NVI candidates.
//!
//! Each creator carries one creator share, split evenly over the distinct institutions they are
//! affiliated with. An institution receives
//! `basePoints * collaborationFactor * sqrt(institutionShares / creatorShareCount)`, and the
//! total is the sum of the rounded institution points. Intermediate values keep full decimal
//! precision; only published values are rounded (scale 4, half up).

mod table;

pub use table::{base_points, base_points_table, BasePointsEntry};

use std::collections::HashMap;

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::domain::{
    ChannelType, CreatorId, InstanceType, OrganizationId, PublicationChannel, ScientificValue,
};
use super::organization::ResolvedCreator;

pub const RESULT_SCALE: u32 = 4;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PointsError {
    #[error("no base points configured for {instance_type} in a {channel_type:?} at {level:?}")]
    UnmappedBasePoints {
        instance_type: InstanceType,
        channel_type: ChannelType,
        level: ScientificValue,
    },
    #[error("point calculation invariant violated: {0}")]
    InvariantViolation(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorAffiliationPoints {
    pub creator_id: CreatorId,
    pub affiliation_id: OrganizationId,
    pub points: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionPoints {
    pub institution_id: OrganizationId,
    pub institution_points: Decimal,
    pub creator_affiliation_points: Vec<CreatorAffiliationPoints>,
}

impl InstitutionPoints {
    pub fn allocated_points(&self) -> Decimal {
        self.creator_affiliation_points
            .iter()
            .map(|allocation| allocation.points)
            .sum()
    }
}

/// Audit snapshot of a single calculation. A re-evaluation produces a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointCalculation {
    pub instance_type: InstanceType,
    pub channel: PublicationChannel,
    pub is_international_collaboration: bool,
    pub collaboration_factor: Decimal,
    pub base_points: Decimal,
    pub creator_share_count: u32,
    pub institution_points: Vec<InstitutionPoints>,
    pub total_points: Decimal,
}

impl PointCalculation {
    pub fn points_for(&self, institution_id: &OrganizationId) -> Option<Decimal> {
        self.institution_points
            .iter()
            .find(|points| &points.institution_id == institution_id)
            .map(|points| points.institution_points)
    }
}

/// Inputs to [`calculate_points`], all decided by the candidacy rules beforehand.
#[derive(Debug, Clone, Copy)]
pub struct PointRequest<'a> {
    pub instance_type: &'a InstanceType,
    pub channel: &'a PublicationChannel,
    pub is_international_collaboration: bool,
    pub creator_share_count: u32,
    pub creators: &'a [ResolvedCreator],
}

pub fn collaboration_factor(is_international_collaboration: bool) -> Decimal {
    if is_international_collaboration {
        Decimal::new(13, 1)
    } else {
        Decimal::new(10, 1)
    }
}

pub fn calculate_points(request: &PointRequest<'_>) -> Result<PointCalculation, PointsError> {
    let base = base_points(
        request.instance_type,
        request.channel.channel_type,
        request.channel.scientific_value,
    )?;
    if request.creator_share_count == 0 {
        return Err(PointsError::InvariantViolation(
            "candidate has no creator shares",
        ));
    }

    let factor = collaboration_factor(request.is_international_collaboration);
    let weighted_base = base * factor;
    let creator_shares = Decimal::from(request.creator_share_count);

    let institution_points = institution_shares(request.creators)
        .into_iter()
        .map(|shares| shares.into_points(weighted_base, creator_shares))
        .collect::<Result<Vec<_>, _>>()?;
    let total_points = round(
        institution_points
            .iter()
            .map(|points| points.institution_points)
            .sum(),
    );

    Ok(PointCalculation {
        instance_type: request.instance_type.clone(),
        channel: request.channel.clone(),
        is_international_collaboration: request.is_international_collaboration,
        collaboration_factor: factor,
        base_points: base,
        creator_share_count: request.creator_share_count,
        institution_points,
        total_points,
    })
}

/// Rounds a published value to four decimals, half up, keeping trailing zeros.
pub fn round(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(RESULT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(RESULT_SCALE);
    rounded
}

struct CreatorShare<'a> {
    creator_id: &'a CreatorId,
    share: Decimal,
    affiliations: Vec<&'a OrganizationId>,
}

struct InstitutionShares<'a> {
    institution_id: &'a OrganizationId,
    shares: Decimal,
    creators: Vec<CreatorShare<'a>>,
}

// Institutions appear in order of first mention so output stays deterministic.
fn institution_shares(creators: &[ResolvedCreator]) -> Vec<InstitutionShares<'_>> {
    let mut positions: HashMap<&OrganizationId, usize> = HashMap::new();
    let mut institutions: Vec<InstitutionShares<'_>> = Vec::new();

    for creator in creators {
        let creator_institutions = creator.institutions();
        if creator_institutions.is_empty() {
            continue;
        }
        let share = Decimal::ONE / Decimal::from(creator_institutions.len());

        for institution_id in creator_institutions {
            let position = *positions.entry(institution_id).or_insert_with(|| {
                institutions.push(InstitutionShares {
                    institution_id,
                    shares: Decimal::ZERO,
                    creators: Vec::new(),
                });
                institutions.len() - 1
            });

            let entry = &mut institutions[position];
            entry.shares += share;
            entry.creators.push(CreatorShare {
                creator_id: &creator.id,
                share,
                affiliations: creator.affiliations_in(institution_id).collect(),
            });
        }
    }

    institutions
}

impl InstitutionShares<'_> {
    fn into_points(
        self,
        weighted_base: Decimal,
        creator_shares: Decimal,
    ) -> Result<InstitutionPoints, PointsError> {
        let fraction = self.shares / creator_shares;
        let root = fraction
            .sqrt()
            .ok_or(PointsError::InvariantViolation("negative institution share"))?;
        let points = weighted_base * root;
        let institution_points = round(points);

        let mut allocations = Vec::new();
        for creator in &self.creators {
            if creator.affiliations.is_empty() {
                return Err(PointsError::InvariantViolation(
                    "creator counted for an institution without an affiliation in it",
                ));
            }
            let creator_points = points * creator.share / self.shares;
            // Each part is rounded on its own, so parts may miss the institution total by rounding.
            let per_affiliation = creator_points / Decimal::from(creator.affiliations.len());
            for affiliation in &creator.affiliations {
                allocations.push(CreatorAffiliationPoints {
                    creator_id: creator.creator_id.clone(),
                    affiliation_id: (*affiliation).clone(),
                    points: round(per_affiliation),
                });
            }
        }

        Ok(InstitutionPoints {
            institution_id: self.institution_id.clone(),
            institution_points,
            creator_affiliation_points: allocations,
        })
    }
}
