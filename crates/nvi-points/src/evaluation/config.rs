use serde::{Deserialize, Serialize};

use super::domain::InstanceType;

pub const DEFAULT_EARLIEST_PUBLICATION_YEAR: i32 = 2022;

/// Rule configuration handed to the evaluator at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub earliest_publication_year: i32,
    /// Count unverified creators towards the creator share total (they never receive points).
    pub count_unverified_creator_shares: bool,
    pub accept_academic_commentary: bool,
}

impl EvaluationConfig {
    pub fn accepts(&self, instance_type: &InstanceType) -> bool {
        match instance_type {
            InstanceType::AcademicArticle
            | InstanceType::AcademicLiteratureReview
            | InstanceType::AcademicMonograph
            | InstanceType::AcademicChapter => true,
            InstanceType::AcademicCommentary => self.accept_academic_commentary,
            InstanceType::Other(_) => false,
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            earliest_publication_year: DEFAULT_EARLIEST_PUBLICATION_YEAR,
            count_unverified_creator_shares: false,
            accept_academic_commentary: false,
        }
    }
}
