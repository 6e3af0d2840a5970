use chrono::{DateTime, Utc};
use mongodb::bson::{spec::BinarySubtype, Binary};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// MIME types accepted for leaf images.
pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

/// A labeled leaf image as persisted in the `uploads` collection.
///
/// Records are written once and never updated; the image bytes are stored
/// inline as BSON binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub filename: String,
    pub category: String,
    pub content_type: String,
    pub content: Binary,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub upload_date: DateTime<Utc>,
}

impl UploadRecord {
    pub fn new(filename: String, category: String, content_type: String, bytes: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            filename,
            category,
            content_type,
            content: Binary {
                subtype: BinarySubtype::Generic,
                bytes,
            },
            upload_date: Utc::now(),
        }
    }

    pub fn size(&self) -> usize {
        self.content.bytes.len()
    }
}

pub fn is_allowed_content_type(content_type: &str) -> bool {
    ALLOWED_CONTENT_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(content_type))
}
