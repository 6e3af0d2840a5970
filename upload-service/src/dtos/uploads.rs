use crate::error::ApiError;
use crate::models::UploadRecord;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Public view of a record. Binary content is base64-encoded.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub filename: String,
    pub category: String,
    pub content_type: String,
    pub content: String,
    pub upload_date: String,
}

impl From<UploadRecord> for UploadResponse {
    fn from(record: UploadRecord) -> Self {
        Self {
            id: record.id,
            filename: record.filename,
            category: record.category,
            content_type: record.content_type,
            content: STANDARD.encode(&record.content.bytes),
            upload_date: record.upload_date.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadAcceptedResponse {
    pub message: String,
    pub filename: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryFilterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
}

/// Raw pagination query. Values stay textual so that malformed input maps to
/// a domain error instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_LIMIT: u64 = 4;

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

impl TryFrom<PaginationParams> for PageRequest {
    type Error = ApiError;

    fn try_from(params: PaginationParams) -> Result<Self, Self::Error> {
        let page = parse_positive(params.page.as_deref(), Self::DEFAULT_PAGE)
            .ok_or(ApiError::InvalidPaginationParams)?;
        let limit = parse_positive(params.limit.as_deref(), Self::DEFAULT_LIMIT)
            .ok_or(ApiError::InvalidPaginationParams)?;
        Ok(Self { page, limit })
    }
}

fn parse_positive(raw: Option<&str>, default: u64) -> Option<u64> {
    match raw {
        None => Some(default),
        Some(value) => value.trim().parse::<u64>().ok().filter(|n| *n > 0),
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedUploadsResponse {
    pub message: String,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub data: Vec<UploadResponse>,
}
