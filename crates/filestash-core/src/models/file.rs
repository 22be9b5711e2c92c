use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Files are keyed by a random v4 UUID assigned when they are created.
pub type FileId = Uuid;

/// A stored binary object together with its descriptive metadata.
///
/// On the wire `contents` is standard base64 and the MIME type is carried
/// in the `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct File {
    #[serde(default)]
    #[validate(length(min = 1), custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(required)]
    pub source_application_id: Option<i64>,

    #[validate(required, custom(function = "validate_not_blank"))]
    pub source_application_instance_id: Option<String>,

    #[serde(
        rename = "type",
        alias = "mediaType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub media_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,

    #[serde(default, with = "base64_contents")]
    #[validate(length(min = 1))]
    pub contents: Vec<u8>,
}

impl File {
    /// Size of the contents in bytes.
    pub fn size(&self) -> usize {
        self.contents.len()
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

mod base64_contents {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.trim())
            .map_err(serde::de::Error::custom)
    }
}

/// Record of one object removed by the retention sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedFile {
    /// Object key in the durable store.
    pub name: String,
    /// Last-modified time of the object when it was swept.
    pub deleted_at: DateTime<Utc>,
}
