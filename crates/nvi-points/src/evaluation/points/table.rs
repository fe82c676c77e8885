use rust_decimal::Decimal;
use serde::Serialize;

use super::PointsError;
use crate::evaluation::domain::{ChannelType, InstanceType, ScientificValue};

/// One row of the base points table, used for listings and audits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasePointsEntry {
    pub instance_type: InstanceType,
    pub channel_type: ChannelType,
    pub scientific_value: ScientificValue,
    pub points: Decimal,
}

/// Fixed base points for an (instance type, channel type, level) combination.
///
/// Combinations outside the table are configuration errors; there is no default value.
pub fn base_points(
    instance_type: &InstanceType,
    channel_type: ChannelType,
    level: ScientificValue,
) -> Result<Decimal, PointsError> {
    use ChannelType::{Journal, Publisher, Series};
    use InstanceType::{
        AcademicArticle, AcademicChapter, AcademicCommentary, AcademicLiteratureReview,
        AcademicMonograph,
    };
    use ScientificValue::{LevelOne, LevelTwo};

    let points = match (instance_type, channel_type, level) {
        (AcademicMonograph | AcademicCommentary, Series | Publisher, LevelOne) => {
            Some(Decimal::new(5, 0))
        }
        (AcademicMonograph | AcademicCommentary, Series | Publisher, LevelTwo) => {
            Some(Decimal::new(8, 0))
        }
        (AcademicChapter, Series, LevelOne) => Some(Decimal::new(1, 0)),
        (AcademicChapter, Series, LevelTwo) => Some(Decimal::new(3, 0)),
        (AcademicChapter, Publisher, LevelOne) => Some(Decimal::new(7, 1)),
        (AcademicChapter, Publisher, LevelTwo) => Some(Decimal::new(1, 0)),
        (AcademicArticle | AcademicLiteratureReview, Journal, LevelOne) => {
            Some(Decimal::new(1, 0))
        }
        (AcademicArticle | AcademicLiteratureReview, Journal, LevelTwo) => {
            Some(Decimal::new(3, 0))
        }
        _ => None,
    };

    points.ok_or_else(|| PointsError::UnmappedBasePoints {
        instance_type: instance_type.clone(),
        channel_type,
        level,
    })
}

/// Every mapped combination, in a stable order.
pub fn base_points_table() -> Vec<BasePointsEntry> {
    const INSTANCE_TYPES: [InstanceType; 5] = [
        InstanceType::AcademicArticle,
        InstanceType::AcademicLiteratureReview,
        InstanceType::AcademicMonograph,
        InstanceType::AcademicCommentary,
        InstanceType::AcademicChapter,
    ];
    const CHANNEL_TYPES: [ChannelType; 3] =
        [ChannelType::Journal, ChannelType::Series, ChannelType::Publisher];
    const LEVELS: [ScientificValue; 2] = [ScientificValue::LevelOne, ScientificValue::LevelTwo];

    let mut entries = Vec::new();
    for instance_type in INSTANCE_TYPES {
        for channel_type in CHANNEL_TYPES {
            for scientific_value in LEVELS {
                if let Ok(points) = base_points(&instance_type, channel_type, scientific_value) {
                    entries.push(BasePointsEntry {
                        instance_type: instance_type.clone(),
                        channel_type,
                        scientific_value,
                        points,
                    });
                }
            }
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_points_depend_on_channel_type() {
        assert_eq!(
            base_points(
                &InstanceType::AcademicChapter,
                ChannelType::Series,
                ScientificValue::LevelOne
            ),
            Ok(Decimal::new(1, 0))
        );
        assert_eq!(
            base_points(
                &InstanceType::AcademicChapter,
                ChannelType::Publisher,
                ScientificValue::LevelOne
            ),
            Ok(Decimal::new(7, 1))
        );
        assert_eq!(
            base_points(
                &InstanceType::AcademicChapter,
                ChannelType::Publisher,
                ScientificValue::LevelTwo
            ),
            Ok(Decimal::ONE)
        );
    }

    #[test]
    fn unassigned_level_is_never_mapped() {
        for instance_type in [
            InstanceType::AcademicArticle,
            InstanceType::AcademicMonograph,
            InstanceType::AcademicChapter,
        ] {
            for channel_type in [ChannelType::Journal, ChannelType::Series, ChannelType::Publisher] {
                assert!(matches!(
                    base_points(&instance_type, channel_type, ScientificValue::Unassigned),
                    Err(PointsError::UnmappedBasePoints { .. })
                ));
            }
        }
    }

    #[test]
    fn articles_outside_journals_are_configuration_errors() {
        let error = base_points(
            &InstanceType::AcademicArticle,
            ChannelType::Series,
            ScientificValue::LevelOne,
        )
        .expect_err("article in a series is not mapped");

        assert!(error.to_string().contains("AcademicArticle"));
    }

    #[test]
    fn table_lists_every_mapped_combination() {
        let table = base_points_table();

        assert_eq!(table.len(), 16);
        assert!(table.iter().all(|entry| entry.points > Decimal::ZERO));
    }
}
