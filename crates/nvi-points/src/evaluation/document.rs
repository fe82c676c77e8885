//! Input adaptation for parsed publication documents.
//!
//! Everything that knows about legacy field names and loose JSON shapes lives here; the rest of
//! the engine only sees the canonical [`PublicationDetails`].

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::creators::classify_creators;
use super::domain::{
    ChannelId, ChannelType, DeclaredChannel, PublicationChannel, PublicationDate,
    PublicationDetails, PublicationId, PublicationStatus, ScientificValue,
};
use super::normalizer;

/// Publication document as handed over by the storage boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationDocument {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub publication_date: Option<RawPublicationDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub instance_type: Option<String>,
    /// Legacy documents put the academic flavour here, e.g. `JournalArticle` + `AcademicArticle`.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub contributors: Vec<RawContributor>,
    #[serde(default)]
    pub publication_channel: Option<RawChannel>,
    /// Publisher of the containing book, used as level fallback for chapters.
    #[serde(default)]
    pub publisher: Option<RawChannel>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPublicationDate {
    #[serde(default)]
    pub year: Option<NumberOrText>,
    #[serde(default)]
    pub month: Option<NumberOrText>,
    #[serde(default)]
    pub day: Option<NumberOrText>,
}

/// Date parts and legacy levels arrive as strings in current documents and as numbers in older
/// exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(i64),
    Text(String),
}

impl NumberOrText {
    fn parse(&self) -> Option<i64> {
        match self {
            NumberOrText::Number(value) => Some(*value),
            NumberOrText::Text(raw) => raw.trim().parse().ok(),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, NumberOrText::Text(raw) if raw.trim().is_empty())
    }

    fn raw(&self) -> String {
        match self {
            NumberOrText::Number(value) => value.to_string(),
            NumberOrText::Text(raw) => raw.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContributor {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub verification_status: Option<String>,
    #[serde(default)]
    pub role: Option<RawRole>,
    #[serde(default)]
    pub affiliations: Vec<RawAffiliation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRole {
    Plain(String),
    Typed {
        #[serde(rename = "type")]
        kind: String,
    },
}

impl RawRole {
    pub fn kind(&self) -> &str {
        match self {
            RawRole::Plain(kind) => kind,
            RawRole::Typed { kind } => kind,
        }
    }
}

/// Affiliations are either bare URIs or organization objects, which may lack an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAffiliation {
    Uri(String),
    Organization {
        #[serde(default)]
        id: Option<String>,
    },
}

impl RawAffiliation {
    pub fn id(&self) -> Option<&str> {
        let id = match self {
            RawAffiliation::Uri(uri) => Some(uri.as_str()),
            RawAffiliation::Organization { id } => id.as_deref(),
        };
        id.map(str::trim).filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawChannel {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub scientific_value: Option<String>,
    /// Legacy level field (`LEVEL_1`, `1`, ...).
    #[serde(default)]
    pub level: Option<NumberOrText>,
}

/// Validation failures for documents that cannot be evaluated at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedInput {
    #[error("publication document is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("publication document field `{field}` has invalid value '{value}'")]
    InvalidValue { field: &'static str, value: String },
}

impl PublicationDocument {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl PublicationDetails {
    /// Validates and normalizes a raw document into the immutable evaluation snapshot.
    pub fn from_document(
        document: &PublicationDocument,
        bucket_uri: &str,
    ) -> Result<Self, MalformedInput> {
        let id = document
            .id
            .clone()
            .ok_or(MalformedInput::MissingField("id"))?;
        let status = document
            .status
            .as_deref()
            .map(PublicationStatus::from_raw)
            .ok_or(MalformedInput::MissingField("status"))?;
        let raw_instance_type = document
            .instance_type
            .as_deref()
            .ok_or(MalformedInput::MissingField("instanceType"))?;
        let instance_type =
            normalizer::instance_type(raw_instance_type, document.content_type.as_deref());
        let publication_date = publication_date(document.publication_date.as_ref())?;

        let publication_channel = document
            .publication_channel
            .as_ref()
            .map(|raw| declared_channel(raw, None));
        let publisher = document
            .publisher
            .as_ref()
            .map(|raw| declared_channel(raw, Some(ChannelType::Publisher)));

        Ok(Self {
            id: PublicationId(id),
            bucket_uri: bucket_uri.to_string(),
            status,
            instance_type,
            publication_date,
            channel: publication_channel,
            publisher,
            creators: classify_creators(&document.contributors),
        })
    }
}

fn publication_date(raw: Option<&RawPublicationDate>) -> Result<PublicationDate, MalformedInput> {
    let raw = raw.ok_or(MalformedInput::MissingField("publicationDate"))?;
    let year_component = raw
        .year
        .as_ref()
        .filter(|year| !year.is_blank())
        .ok_or(MalformedInput::MissingField("publicationDate.year"))?;
    let year = year_component
        .parse()
        .and_then(|year| i32::try_from(year).ok())
        .ok_or_else(|| MalformedInput::InvalidValue {
            field: "publicationDate.year",
            value: year_component.raw(),
        })?;

    let month = optional_date_part(raw.month.as_ref(), "publicationDate.month")?;
    let day = optional_date_part(raw.day.as_ref(), "publicationDate.day")?;

    if let Some(month) = month {
        let valid = match day {
            Some(day) => NaiveDate::from_ymd_opt(year, month, day).is_some(),
            None => NaiveDate::from_ymd_opt(year, month, 1).is_some(),
        };
        if !valid {
            return Err(MalformedInput::InvalidValue {
                field: "publicationDate",
                value: format!("{year}-{month}-{}", day.unwrap_or(1)),
            });
        }
    } else if let Some(day) = day {
        if !(1..=31).contains(&day) {
            return Err(MalformedInput::InvalidValue {
                field: "publicationDate.day",
                value: day.to_string(),
            });
        }
    }

    Ok(PublicationDate { year, month, day })
}

fn optional_date_part(
    component: Option<&NumberOrText>,
    field: &'static str,
) -> Result<Option<u32>, MalformedInput> {
    match component.filter(|part| !part.is_blank()) {
        None => Ok(None),
        Some(part) => part
            .parse()
            .and_then(|value| u32::try_from(value).ok())
            .map(Some)
            .ok_or_else(|| MalformedInput::InvalidValue {
                field,
                value: part.raw(),
            }),
    }
}

impl DeclaredChannel {
    /// The normalized channel, or the spelling that could not be normalized as `field`.
    pub fn recognized(&self, field: &'static str) -> Result<&PublicationChannel, MalformedInput> {
        match self {
            DeclaredChannel::Recognized(channel) => Ok(channel),
            DeclaredChannel::Unrecognized { value } if value.is_empty() => {
                Err(MalformedInput::MissingField(field))
            }
            DeclaredChannel::Unrecognized { value } => Err(MalformedInput::InvalidValue {
                field,
                value: value.clone(),
            }),
        }
    }
}

fn declared_channel(raw: &RawChannel, implied_type: Option<ChannelType>) -> DeclaredChannel {
    match normalize_channel(raw, implied_type) {
        Ok(channel) => DeclaredChannel::Recognized(channel),
        Err(value) => DeclaredChannel::Unrecognized { value },
    }
}

// The error carries the offending spelling; empty when no channel type was given.
fn normalize_channel(
    raw: &RawChannel,
    implied_type: Option<ChannelType>,
) -> Result<PublicationChannel, String> {
    let (channel_type, confirmed) = match raw.kind.as_deref() {
        Some(kind) => normalizer::channel_type(kind).ok_or_else(|| kind.to_string())?,
        None => implied_type
            .map(|channel_type| (channel_type, true))
            .ok_or_else(String::new)?,
    };

    let declared = match (&raw.scientific_value, &raw.level) {
        (Some(value), _) => Some(value.clone()),
        (None, Some(level)) => Some(level.raw()),
        (None, None) => None,
    };
    let scientific_value = match declared {
        Some(value) => normalizer::scientific_value(&value).ok_or(value)?,
        None => ScientificValue::Unassigned,
    };

    Ok(PublicationChannel {
        id: raw.id.clone().map(ChannelId),
        channel_type,
        // Unconfirmed channels are not in the channel registry and never carry a level.
        scientific_value: if confirmed {
            scientific_value
        } else {
            ScientificValue::Unassigned
        },
    })
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
