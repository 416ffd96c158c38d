//! Service sign-in content records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of edit being published.
///
/// Known values get their own variant; anything else is kept verbatim so the
/// rendered document carries exactly the string it was given.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UpdateType {
    /// Significant change; the public timestamp moves to "now".
    Major,
    /// Small change; the public timestamp is kept.
    Minor,
    /// Re-send of existing content.
    Republish,
    /// Any other value.
    Other(String),
}

impl UpdateType {
    /// The wire representation of the update type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Republish => "republish",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for UpdateType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "major" => Self::Major,
            "minor" => Self::Minor,
            "republish" => Self::Republish,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for UpdateType {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<UpdateType> for String {
    fn from(value: UpdateType) -> Self {
        match value {
            UpdateType::Other(value) => value,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service sign-in content as authored.
///
/// Keys not listed here (page copy, options, etc.) are accepted and ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Locale of the page (e.g. "en").
    pub locale: String,
    /// Kind of edit being published.
    pub update_type: UpdateType,
    /// Public change note, if any.
    #[serde(default)]
    pub change_note: Option<String>,
    /// Slug of the start page the sign-in page belongs to.
    pub start_page_slug: String,
}

/// Error returned when a content record can't be read.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// Content is not valid YAML/JSON or lacks a required field.
    #[error("invalid content record: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl ContentRecord {
    /// Parse a content record from YAML (or JSON, which YAML accepts).
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Parse`] if the content is malformed or a
    /// required field (`locale`, `update_type`, `start_page_slug`) is missing.
    pub fn from_yaml(content: &str) -> Result<Self, ContentError> {
        Ok(serde_yaml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_update_type_known_values() {
        assert_eq!(UpdateType::from("major"), UpdateType::Major);
        assert_eq!(UpdateType::from("minor"), UpdateType::Minor);
        assert_eq!(UpdateType::from("republish"), UpdateType::Republish);
    }

    #[test]
    fn test_update_type_other_is_verbatim() {
        let update_type = UpdateType::from("Major");

        assert_eq!(update_type, UpdateType::Other("Major".to_owned()));
        assert_eq!(update_type.as_str(), "Major");
        assert_eq!(String::from(update_type), "Major");
    }

    #[test]
    fn test_update_type_display() {
        assert_eq!(UpdateType::Minor.to_string(), "minor");
    }

    #[test]
    fn test_from_yaml_full_record() {
        let yaml = "\
locale: en
update_type: major
change_note: First published
start_page_slug: apply-for-a-passport
title: Prove your identity
";
        let content = ContentRecord::from_yaml(yaml).unwrap();

        assert_eq!(
            content,
            ContentRecord {
                locale: "en".to_owned(),
                update_type: UpdateType::Major,
                change_note: Some("First published".to_owned()),
                start_page_slug: "apply-for-a-passport".to_owned(),
            }
        );
    }

    #[test]
    fn test_from_yaml_null_and_missing_change_note() {
        let explicit = ContentRecord::from_yaml(
            "locale: cy\nupdate_type: minor\nchange_note: ~\nstart_page_slug: a\n",
        )
        .unwrap();
        let missing =
            ContentRecord::from_yaml("locale: cy\nupdate_type: minor\nstart_page_slug: a\n").unwrap();

        assert_eq!(explicit.change_note, None);
        assert_eq!(missing.change_note, None);
    }

    #[test]
    fn test_from_yaml_accepts_json() {
        let json = r#"{"locale": "en", "update_type": "minor", "change_note": null, "start_page_slug": "a/b"}"#;

        let content = ContentRecord::from_yaml(json).unwrap();

        assert_eq!(content.start_page_slug, "a/b");
        assert_eq!(content.update_type, UpdateType::Minor);
    }

    #[test]
    fn test_from_yaml_missing_slug() {
        let err = ContentRecord::from_yaml("locale: en\nupdate_type: major\n").unwrap_err();

        assert!(err.to_string().contains("start_page_slug"));
    }

    #[test]
    fn test_from_yaml_malformed() {
        assert!(ContentRecord::from_yaml("locale: [en").is_err());
    }
}
