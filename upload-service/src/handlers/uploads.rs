use crate::dtos::{
    CategoryFilterRequest, PageRequest, PaginatedUploadsResponse, PaginationParams,
    UploadAcceptedResponse, UploadResponse,
};
use crate::error::ApiError;
use crate::models::{is_allowed_content_type, UploadRecord};
use crate::services::record_upload;
use crate::startup::AppState;
use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        rejection::{JsonRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use validator::Validate;

const IMAGE_FIELD: &str = "image";
const CATEGORY_FIELD: &str = "category";
const UNTITLED: &str = "Untitled";
const PAGINATED_CONTEXT: &str = "Failed to retrieve paginated uploads";

/// The image part as read from the multipart stream.
enum ImagePart {
    Accepted {
        filename: String,
        content_type: String,
        bytes: Vec<u8>,
    },
    Rejected(ApiError),
}

pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let max_file_size = state.config.limits.max_file_size;
    let mut multipart =
        multipart.map_err(|e| ApiError::MalformedMultipart(e.body_text()))?;

    let mut category: Option<String> = None;
    let mut image: Option<ImagePart> = None;
    let mut truncated = false;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => match ApiError::from_multipart(e, max_file_size) {
                // Body limit hit while draining: keep what was already parsed.
                err @ ApiError::PayloadTooLarge { .. } => {
                    truncated = true;
                    if image.is_none() {
                        image = Some(ImagePart::Rejected(err));
                    }
                    break;
                }
                err => return Err(err),
            },
        };

        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            CATEGORY_FIELD => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::from_multipart(e, max_file_size))?;
                category = Some(value);
            }
            IMAGE_FIELD if image.is_none() => {
                image = Some(read_image(field, max_file_size).await?);
            }
            _ => {}
        }
    }

    // Validation order: category, file type, file size, file presence.
    let category = match category {
        Some(category) if state.config.labels.contains(&category) => category,
        None if truncated => return Err(ApiError::PayloadTooLarge { limit: max_file_size }),
        _ => return Err(ApiError::InvalidUploadCategory),
    };

    let (filename, content_type, bytes) = match image {
        Some(ImagePart::Accepted {
            filename,
            content_type,
            bytes,
        }) => (filename, content_type, bytes),
        Some(ImagePart::Rejected(err)) => return Err(err),
        None => return Err(ApiError::MissingFile),
    };

    let record = UploadRecord::new(filename, category, content_type, bytes);

    state
        .store
        .insert(&record)
        .await
        .map_err(ApiError::storage("Upload failed"))?;

    record_upload(&record.category);
    tracing::info!(
        upload_id = %record.id,
        filename = %record.filename,
        category = %record.category,
        size = record.size(),
        "File uploaded"
    );

    Ok(Json(UploadAcceptedResponse {
        message: "File uploaded successfully".to_string(),
        filename: record.filename,
    }))
}

/// Checks the declared MIME type before touching the body, then buffers the
/// file up to `max_file_size`.
async fn read_image(mut field: Field<'_>, max_file_size: usize) -> Result<ImagePart, ApiError> {
    let content_type = field.content_type().unwrap_or_default().to_string();
    if !is_allowed_content_type(&content_type) {
        return Ok(ImagePart::Rejected(ApiError::InvalidFileType));
    }

    let filename = field
        .file_name()
        .filter(|name| !name.is_empty())
        .unwrap_or(UNTITLED)
        .to_string();

    let mut bytes = Vec::new();
    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => return Ok(ImagePart::Rejected(ApiError::from_multipart(e, max_file_size))),
        };

        if bytes.len() + chunk.len() > max_file_size {
            tracing::warn!(
                filename = %filename,
                max_file_size = max_file_size,
                "File size limit exceeded, aborting upload"
            );
            return Ok(ImagePart::Rejected(ApiError::PayloadTooLarge {
                limit: max_file_size,
            }));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(ImagePart::Accepted {
        filename,
        content_type,
        bytes,
    })
}

pub async fn list_uploads(
    State(state): State<AppState>,
) -> Result<Json<Vec<UploadResponse>>, ApiError> {
    let records = state
        .store
        .find_all()
        .await
        .map_err(ApiError::storage("Failed to retrieve uploads"))?;

    Ok(Json(records.into_iter().map(UploadResponse::from).collect()))
}

pub async fn list_uploads_paginated(
    State(state): State<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<PaginatedUploadsResponse>, ApiError> {
    let Query(params) = params.map_err(|_| ApiError::InvalidPaginationParams)?;
    let request = PageRequest::try_from(params)?;

    let total = state
        .store
        .count()
        .await
        .map_err(ApiError::storage(PAGINATED_CONTEXT))?;
    let total_pages = request.total_pages(total);

    if request.page > total_pages {
        return Err(ApiError::PageOutOfRange {
            page: request.page,
            total,
            total_pages,
        });
    }

    let records = state
        .store
        .find_page(request.skip(), request.limit)
        .await
        .map_err(ApiError::storage(PAGINATED_CONTEXT))?;

    if records.is_empty() {
        return Err(ApiError::NoItemsForPage {
            page: request.page,
            limit: request.limit,
        });
    }

    Ok(Json(PaginatedUploadsResponse {
        message: "Uploads retrieved successfully".to_string(),
        total,
        page: request.page,
        limit: request.limit,
        total_pages,
        data: records.into_iter().map(UploadResponse::from).collect(),
    }))
}

pub async fn list_uploads_by_category(
    State(state): State<AppState>,
    payload: Result<Json<CategoryFilterRequest>, JsonRejection>,
) -> Result<Json<Vec<UploadResponse>>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::debug!(error = %e, "Rejected category filter body");
        ApiError::InvalidCategory
    })?;
    request.validate().map_err(|_| ApiError::InvalidCategory)?;

    if !state.config.labels.contains(&request.category) {
        return Err(ApiError::InvalidCategory);
    }

    let category =
        urlencoding::decode(&request.category).map_err(|_| ApiError::InvalidCategory)?;

    let records = state
        .store
        .find_by_category(&category)
        .await
        .map_err(ApiError::storage("Failed to retrieve uploads by category"))?;

    Ok(Json(records.into_iter().map(UploadResponse::from).collect()))
}

pub async fn get_upload(
    State(state): State<AppState>,
    Path(upload_id): Path<String>,
) -> Result<Json<UploadResponse>, ApiError> {
    let record = state
        .store
        .find_by_id(&upload_id)
        .await
        .map_err(ApiError::storage("Failed to retrieve upload"))?
        .ok_or(ApiError::RecordNotFound(upload_id))?;

    Ok(Json(UploadResponse::from(record)))
}

pub async fn get_upload_content(
    State(state): State<AppState>,
    Path(upload_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .store
        .find_by_id(&upload_id)
        .await
        .map_err(ApiError::storage("Failed to retrieve upload"))?
        .ok_or(ApiError::RecordNotFound(upload_id))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, record.content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", sanitize_filename(&record.filename)),
            ),
        ],
        record.content.bytes,
    ))
}

fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| if c == '"' || c.is_control() || !c.is_ascii() { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_filename_keeps_header_safe() {
        assert_eq!(sanitize_filename("leaf.jpg"), "leaf.jpg");
        assert_eq!(sanitize_filename("a\"b\n.png"), "a_b_.png");
        assert_eq!(sanitize_filename("feuille-é.jpg"), "feuille-_.jpg");
    }
}
