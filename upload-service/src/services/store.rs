use crate::models::UploadRecord;
use async_trait::async_trait;
use service_core::error::AppError;

/// Persistence seam for upload records.
///
/// Implementations own all record storage. Reads return records in the
/// store's native order; there is no update or delete.
#[async_trait]
pub trait UploadStore: Send + Sync {
    async fn insert(&self, record: &UploadRecord) -> Result<(), AppError>;
    async fn find_all(&self) -> Result<Vec<UploadRecord>, AppError>;
    async fn find_page(&self, skip: u64, limit: u64) -> Result<Vec<UploadRecord>, AppError>;
    async fn find_by_category(&self, category: &str) -> Result<Vec<UploadRecord>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<UploadRecord>, AppError>;
    async fn count(&self) -> Result<u64, AppError>;
    async fn health_check(&self) -> Result<(), AppError>;

    /// Releases connections. Called once after the server has drained.
    async fn close(&self) {}
}
