use crate::models::LabelSet;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub const SERVICE_NAME: &str = "upload-service";

/// Default cap for a single uploaded image: 5 MiB.
pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub common: core_config::Config,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub mongodb: MongoConfig,
    pub labels: LabelSet,
    pub cors: CorsConfig,
    pub limits: UploadLimits,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UploadLimits {
    pub max_file_size: usize,
}

impl UploadConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env, APP__ prefix and PORT)
        let common = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let labels = match env::var("UPLOAD_CATEGORIES") {
            Ok(raw) => {
                let labels = LabelSet::parse(&raw);
                if labels.is_empty() {
                    return Err(AppError::ConfigError(anyhow::anyhow!(
                        "UPLOAD_CATEGORIES is set but contains no labels"
                    )));
                }
                labels
            }
            Err(_) => LabelSet::default(),
        };

        Ok(UploadConfig {
            common,
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", None, is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("leaf_uploads"), is_prod)?,
            },
            labels,
            cors: CorsConfig {
                allowed_origins: parse_origins(&get_env(
                    "CORS_ALLOWED_ORIGINS",
                    Some("*"),
                    false,
                )?),
            },
            limits: UploadLimits {
                max_file_size: parse_file_size(&get_env(
                    "UPLOAD_MAX_FILE_SIZE",
                    Some(&DEFAULT_MAX_FILE_SIZE.to_string()),
                    false,
                )?)?,
            },
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_file_size(raw: &str) -> Result<usize, AppError> {
    match raw.trim().parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(AppError::ConfigError(anyhow::anyhow!(
            "UPLOAD_MAX_FILE_SIZE must be a positive number of bytes, got '{}'",
            raw
        ))),
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
