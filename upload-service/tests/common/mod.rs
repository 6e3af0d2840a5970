#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::multipart;
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::sync::{Arc, Mutex};
use upload_service::config::{
    CorsConfig, MongoConfig, UploadConfig, UploadLimits, DEFAULT_MAX_FILE_SIZE,
};
use upload_service::models::{LabelSet, UploadRecord};
use upload_service::services::UploadStore;
use upload_service::startup::Application;

pub const HEALTHY_TOMATO: &str = "Tomato - Healthy";
pub const EARLY_BLIGHT: &str = "Potato - Early Blight";

/// Vec-backed store; preserves insertion order like the document store.
#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<Vec<UploadRecord>>,
}

impl InMemoryStore {
    pub fn seed(&self, filename: &str, category: &str) -> UploadRecord {
        let record = UploadRecord::new(
            filename.to_string(),
            category.to_string(),
            "image/png".to_string(),
            filename.as_bytes().to_vec(),
        );
        self.records.lock().unwrap().push(record.clone());
        record
    }

    pub fn records(&self) -> Vec<UploadRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl UploadStore for InMemoryStore {
    async fn insert(&self, record: &UploadRecord) -> Result<(), AppError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<UploadRecord>, AppError> {
        Ok(self.records())
    }

    async fn find_page(&self, skip: u64, limit: u64) -> Result<Vec<UploadRecord>, AppError> {
        Ok(self
            .records()
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<UploadRecord>, AppError> {
        Ok(self
            .records()
            .into_iter()
            .filter(|r| r.category == category)
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UploadRecord>, AppError> {
        Ok(self.records().into_iter().find(|r| r.id == id))
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.len() as u64)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Reports `extra` more records from `count()` than it can return, like a
/// collection that shrinks between the count and the page query.
#[derive(Default)]
pub struct OvercountingStore {
    pub inner: InMemoryStore,
    extra: u64,
}

impl OvercountingStore {
    pub fn new(extra: u64) -> Self {
        Self {
            inner: InMemoryStore::default(),
            extra,
        }
    }
}

#[async_trait]
impl UploadStore for OvercountingStore {
    async fn insert(&self, record: &UploadRecord) -> Result<(), AppError> {
        self.inner.insert(record).await
    }

    async fn find_all(&self) -> Result<Vec<UploadRecord>, AppError> {
        self.inner.find_all().await
    }

    async fn find_page(&self, skip: u64, limit: u64) -> Result<Vec<UploadRecord>, AppError> {
        self.inner.find_page(skip, limit).await
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<UploadRecord>, AppError> {
        self.inner.find_by_category(category).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UploadRecord>, AppError> {
        self.inner.find_by_id(id).await
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.inner.count().await? + self.extra)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Every call fails the way an unreachable database does.
pub struct FailingStore;

fn unreachable_db() -> AppError {
    AppError::DatabaseError(anyhow::anyhow!("connection refused"))
}

#[async_trait]
impl UploadStore for FailingStore {
    async fn insert(&self, _record: &UploadRecord) -> Result<(), AppError> {
        Err(unreachable_db())
    }

    async fn find_all(&self) -> Result<Vec<UploadRecord>, AppError> {
        Err(unreachable_db())
    }

    async fn find_page(&self, _skip: u64, _limit: u64) -> Result<Vec<UploadRecord>, AppError> {
        Err(unreachable_db())
    }

    async fn find_by_category(&self, _category: &str) -> Result<Vec<UploadRecord>, AppError> {
        Err(unreachable_db())
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<UploadRecord>, AppError> {
        Err(unreachable_db())
    }

    async fn count(&self) -> Result<u64, AppError> {
        Err(unreachable_db())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Err(unreachable_db())
    }
}

/// Panics on listing, to exercise the fallback error handler.
pub struct PanickingStore;

#[async_trait]
impl UploadStore for PanickingStore {
    async fn insert(&self, _record: &UploadRecord) -> Result<(), AppError> {
        Err(unreachable_db())
    }

    async fn find_all(&self) -> Result<Vec<UploadRecord>, AppError> {
        panic!("cursor exhausted unexpectedly")
    }

    async fn find_page(&self, _skip: u64, _limit: u64) -> Result<Vec<UploadRecord>, AppError> {
        Err(unreachable_db())
    }

    async fn find_by_category(&self, _category: &str) -> Result<Vec<UploadRecord>, AppError> {
        Err(unreachable_db())
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<UploadRecord>, AppError> {
        Err(unreachable_db())
    }

    async fn count(&self) -> Result<u64, AppError> {
        Err(unreachable_db())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub fn test_config() -> UploadConfig {
    UploadConfig {
        common: CoreConfig { port: 0 }, // Random port for testing
        log_level: "info".to_string(),
        otlp_endpoint: None,
        mongodb: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "unused".to_string(),
        },
        labels: LabelSet::default(),
        cors: CorsConfig {
            allowed_origins: vec!["*".to_string()],
        },
        limits: UploadLimits {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        },
    }
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn(store: Arc<dyn UploadStore>) -> Self {
        Self::spawn_with_config(test_config(), store).await
    }

    pub async fn spawn_with_config(config: UploadConfig, store: Arc<dyn UploadStore>) -> Self {
        let app = Application::build_with_store(config, store)
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp {
            address,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn upload(&self, form: multipart::Form) -> reqwest::Response {
        self.client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn filter_by_category(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url("/uploads/category"))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

pub fn image_form(category: &str, filename: &str, mime: &str, bytes: Vec<u8>) -> multipart::Form {
    multipart::Form::new()
        .text("category", category.to_string())
        .part(
            "image",
            multipart::Part::bytes(bytes)
                .file_name(filename.to_string())
                .mime_str(mime)
                .unwrap(),
        )
}
