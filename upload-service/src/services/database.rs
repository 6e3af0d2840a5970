use crate::models::UploadRecord;
use crate::services::store::UploadStore;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{FindOptions, IndexOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

const UPLOADS_COLLECTION: &str = "uploads";

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for upload-service");

        let category_index = IndexModel::builder()
            .keys(doc! { "category": 1 })
            .options(
                IndexOptions::builder()
                    .name("category_lookup".to_string())
                    .build(),
            )
            .build();

        self.uploads()
            .create_index(category_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create category index on uploads collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on uploads.category");

        Ok(())
    }

    pub fn uploads(&self) -> Collection<UploadRecord> {
        self.db.collection(UPLOADS_COLLECTION)
    }

    async fn find_many(
        &self,
        filter: Document,
        options: impl Into<Option<FindOptions>>,
    ) -> Result<Vec<UploadRecord>, AppError> {
        let cursor = self
            .uploads()
            .find(filter, options)
            .await
            .map_err(AppError::from)?;
        cursor.try_collect::<Vec<_>>().await.map_err(AppError::from)
    }
}

#[async_trait]
impl UploadStore for MongoDb {
    async fn insert(&self, record: &UploadRecord) -> Result<(), AppError> {
        self.uploads().insert_one(record, None).await.map_err(|e| {
            tracing::error!(upload_id = %record.id, "Failed to insert upload: {}", e);
            AppError::from(e)
        })?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<UploadRecord>, AppError> {
        self.find_many(doc! {}, None).await
    }

    async fn find_page(&self, skip: u64, limit: u64) -> Result<Vec<UploadRecord>, AppError> {
        let options = FindOptions::builder()
            .skip(skip)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();
        self.find_many(doc! {}, options).await
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<UploadRecord>, AppError> {
        self.find_many(doc! { "category": category }, None).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UploadRecord>, AppError> {
        self.uploads()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(AppError::from)
    }

    async fn count(&self) -> Result<u64, AppError> {
        self.uploads()
            .count_documents(doc! {}, None)
            .await
            .map_err(AppError::from)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    async fn close(&self) {
        tracing::info!("Closing MongoDB client");
        self.client.clone().shutdown().await;
    }
}
