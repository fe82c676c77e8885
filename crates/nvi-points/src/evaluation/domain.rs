use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for publications (the publication URI).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicationId(pub String);

/// Identifier wrapper for organizations, both sub-units and top-level institutions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(pub String);

/// Identifier wrapper for verified creators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreatorId(pub String);

/// Identifier wrapper for publication channels (journal, series or publisher).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub String);

macro_rules! display_ids {
    ($($name:ident),*) => {
        $(
            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )*
    };
}

display_ids!(PublicationId, OrganizationId, CreatorId, ChannelId);

/// Canonical instance types after legacy spellings have been normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstanceType {
    AcademicArticle,
    AcademicLiteratureReview,
    AcademicMonograph,
    AcademicChapter,
    AcademicCommentary,
    /// Any instance type the indicator does not recognize.
    Other(String),
}

impl InstanceType {
    pub fn label(&self) -> &str {
        match self {
            InstanceType::AcademicArticle => "AcademicArticle",
            InstanceType::AcademicLiteratureReview => "AcademicLiteratureReview",
            InstanceType::AcademicMonograph => "AcademicMonograph",
            InstanceType::AcademicChapter => "AcademicChapter",
            InstanceType::AcademicCommentary => "AcademicCommentary",
            InstanceType::Other(raw) => raw,
        }
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelType {
    Journal,
    Series,
    Publisher,
}

impl ChannelType {
    pub fn label(self) -> &'static str {
        match self {
            ChannelType::Journal => "Journal",
            ChannelType::Series => "Series",
            ChannelType::Publisher => "Publisher",
        }
    }
}

/// Scientific value (level) assigned to a publication channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScientificValue {
    Unassigned,
    LevelOne,
    LevelTwo,
}

impl ScientificValue {
    pub const fn is_assigned(self) -> bool {
        !matches!(self, ScientificValue::Unassigned)
    }

    pub fn label(self) -> &'static str {
        match self {
            ScientificValue::Unassigned => "Unassigned",
            ScientificValue::LevelOne => "LevelOne",
            ScientificValue::LevelTwo => "LevelTwo",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationChannel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ChannelId>,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    pub scientific_value: ScientificValue,
}

/// Channel as declared on the document.
///
/// Spellings outside the known vocabulary are kept verbatim; they only fail the evaluation once
/// the channel rule has to read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeclaredChannel {
    Recognized(PublicationChannel),
    Unrecognized { value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublicationStatus {
    Published,
    /// Drafts, unpublished and deleted records, kept verbatim.
    Other(String),
}

impl PublicationStatus {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim() {
            "PUBLISHED" => PublicationStatus::Published,
            other => PublicationStatus::Other(other.to_string()),
        }
    }
}

/// Publication date as recorded on the publication; only the year is mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationDate {
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
}

/// A verified creator, known to the national person registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedCreator {
    pub id: CreatorId,
    pub affiliations: Vec<OrganizationId>,
}

/// A creator that could not be verified and is tracked by display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnverifiedCreator {
    pub name: String,
    pub affiliations: Vec<OrganizationId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NviCreator {
    Verified(VerifiedCreator),
    Unverified(UnverifiedCreator),
}

impl NviCreator {
    pub fn affiliations(&self) -> &[OrganizationId] {
        match self {
            NviCreator::Verified(creator) => &creator.affiliations,
            NviCreator::Unverified(creator) => &creator.affiliations,
        }
    }

    pub fn as_verified(&self) -> Option<&VerifiedCreator> {
        match self {
            NviCreator::Verified(creator) => Some(creator),
            NviCreator::Unverified(_) => None,
        }
    }
}

/// The validated, normalized publication snapshot every rule and calculation reads from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationDetails {
    pub id: PublicationId,
    pub bucket_uri: String,
    pub status: PublicationStatus,
    pub instance_type: InstanceType,
    pub publication_date: PublicationDate,
    pub channel: Option<DeclaredChannel>,
    pub publisher: Option<DeclaredChannel>,
    pub creators: Vec<NviCreator>,
}

impl PublicationDetails {
    pub fn verified_creators(&self) -> impl Iterator<Item = &VerifiedCreator> {
        self.creators.iter().filter_map(NviCreator::as_verified)
    }

    pub fn unverified_creator_count(&self) -> usize {
        self.creators
            .iter()
            .filter(|creator| matches!(creator, NviCreator::Unverified(_)))
            .count()
    }
}
