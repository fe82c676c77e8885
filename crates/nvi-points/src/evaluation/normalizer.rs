use super::domain::{ChannelType, InstanceType, ScientificValue};
use std::collections::HashMap;
use std::sync::OnceLock;

static LEVEL_MAP: OnceLock<HashMap<&'static str, ScientificValue>> = OnceLock::new();

/// Lowercases and strips separators so `LEVEL_ONE`, `Level One` and `levelOne` compare equal.
pub(crate) fn normalize_token(value: &str) -> String {
    value
        .replace(['\u{feff}', '\u{200b}'], "")
        .chars()
        .filter(|ch| !matches!(ch, '_' | '-' | ' ' | '\t'))
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Maps both the current `scientificValue` and the legacy `level` spellings.
pub(crate) fn scientific_value(raw: &str) -> Option<ScientificValue> {
    level_map().get(normalize_token(raw).as_str()).copied()
}

fn level_map() -> &'static HashMap<&'static str, ScientificValue> {
    LEVEL_MAP.get_or_init(|| {
        const SPELLINGS: &[(&str, ScientificValue)] = &[
            // scientificValue
            ("unassigned", ScientificValue::Unassigned),
            ("levelone", ScientificValue::LevelOne),
            ("leveltwo", ScientificValue::LevelTwo),
            // legacy level
            ("", ScientificValue::Unassigned),
            ("0", ScientificValue::Unassigned),
            ("level0", ScientificValue::Unassigned),
            ("nolevel", ScientificValue::Unassigned),
            ("1", ScientificValue::LevelOne),
            ("level1", ScientificValue::LevelOne),
            ("2", ScientificValue::LevelTwo),
            ("level2", ScientificValue::LevelTwo),
        ];
        SPELLINGS.iter().copied().collect()
    })
}

/// Returns the channel type and whether the channel is confirmed in the channel registry.
pub(crate) fn channel_type(raw: &str) -> Option<(ChannelType, bool)> {
    match normalize_token(raw).as_str() {
        "journal" => Some((ChannelType::Journal, true)),
        "series" => Some((ChannelType::Series, true)),
        "publisher" => Some((ChannelType::Publisher, true)),
        "unconfirmedjournal" => Some((ChannelType::Journal, false)),
        "unconfirmedseries" => Some((ChannelType::Series, false)),
        "unconfirmedpublisher" => Some((ChannelType::Publisher, false)),
        _ => None,
    }
}

pub(crate) fn instance_type(raw: &str, content_type: Option<&str>) -> InstanceType {
    let key = normalize_token(raw);
    if let Some(canonical) = canonical_instance_type(&key) {
        return canonical;
    }

    let legacy = content_type
        .map(normalize_token)
        .and_then(|content| canonical_instance_type(&content))
        .filter(|canonical| legacy_container_accepts(&key, canonical));

    legacy.unwrap_or_else(|| InstanceType::Other(raw.trim().to_string()))
}

fn canonical_instance_type(key: &str) -> Option<InstanceType> {
    match key {
        "academicarticle" => Some(InstanceType::AcademicArticle),
        "academicliteraturereview" => Some(InstanceType::AcademicLiteratureReview),
        "academicmonograph" => Some(InstanceType::AcademicMonograph),
        "academicchapter" => Some(InstanceType::AcademicChapter),
        "academiccommentary" => Some(InstanceType::AcademicCommentary),
        _ => None,
    }
}

// Legacy records carry the academic flavour in `contentType` under a generic container type.
fn legacy_container_accepts(container: &str, canonical: &InstanceType) -> bool {
    matches!(
        (container, canonical),
        (
            "journalarticle",
            InstanceType::AcademicArticle | InstanceType::AcademicLiteratureReview
        ) | (
            "bookmonograph",
            InstanceType::AcademicMonograph | InstanceType::AcademicCommentary
        ) | ("chapterarticle", InstanceType::AcademicChapter)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_and_current_levels_normalize_to_the_same_value() {
        assert_eq!(scientific_value("LevelOne"), Some(ScientificValue::LevelOne));
        assert_eq!(scientific_value("LEVEL_1"), Some(ScientificValue::LevelOne));
        assert_eq!(scientific_value("LEVEL_TWO"), Some(ScientificValue::LevelTwo));
        assert_eq!(scientific_value("2"), Some(ScientificValue::LevelTwo));
        assert_eq!(scientific_value("Unassigned"), Some(ScientificValue::Unassigned));
        assert_eq!(scientific_value("NO_LEVEL"), Some(ScientificValue::Unassigned));
        assert_eq!(scientific_value("LEVEL_3"), None);
    }

    #[test]
    fn legacy_instance_types_use_content_type() {
        assert_eq!(
            instance_type("JournalArticle", Some("AcademicArticle")),
            InstanceType::AcademicArticle
        );
        assert_eq!(
            instance_type("ChapterArticle", Some("Academic Chapter")),
            InstanceType::AcademicChapter
        );
        assert_eq!(
            instance_type("BookMonograph", Some("AcademicMonograph")),
            InstanceType::AcademicMonograph
        );
    }

    #[test]
    fn mismatched_legacy_content_type_is_not_promoted() {
        assert_eq!(
            instance_type("JournalArticle", Some("AcademicMonograph")),
            InstanceType::Other("JournalArticle".to_string())
        );
        assert_eq!(
            instance_type("JournalLeader", None),
            InstanceType::Other("JournalLeader".to_string())
        );
    }

    #[test]
    fn unconfirmed_channels_are_flagged() {
        assert_eq!(channel_type("Journal"), Some((ChannelType::Journal, true)));
        assert_eq!(
            channel_type("UnconfirmedSeries"),
            Some((ChannelType::Series, false))
        );
        assert_eq!(channel_type("Conference"), None);
    }
}
