//! Configuration module
//!
//! Settings are read from the environment (optionally seeded from a `.env`
//! file) into `Config`, which wraps the service configuration behind getters.

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_RETENTION_DAYS, MAX_RETENTION_DAYS, SWEEP_INITIAL_DELAY, SWEEP_INTERVAL,
};
use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8080;
const MAX_BODY_SIZE_MB: usize = 50;
const CACHE_MAX_ENTRIES: usize = 10_000;
const CACHE_TTL_SECS: u64 = 24 * 60 * 60;
const AZURE_CONTAINER: &str = "files";

/// Settings shared by every HTTP service
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub max_body_size_bytes: usize,
    pub environment: String,
}

/// Schedule and threshold for the retention sweep
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetentionConfig {
    /// Files last modified more than this many days ago are swept.
    pub retention_days: i64,
    pub initial_delay: Duration,
    pub interval: Duration,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_RETENTION_DAYS,
            initial_delay: SWEEP_INITIAL_DELAY,
            interval: SWEEP_INTERVAL,
        }
    }
}

/// File service configuration
#[derive(Clone, Debug)]
pub struct FileServiceConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    pub azure_account: Option<String>,
    pub azure_access_key: Option<String>,
    pub azure_container: String,
    pub local_storage_path: Option<String>,
    // Cache configuration
    pub cache_max_entries: usize,
    pub cache_ttl: Duration,
    // Retention sweep
    pub retention: RetentionConfig,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<FileServiceConfig>);

impl Config {
    fn inner(&self) -> &FileServiceConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = FileServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_environment(&self.inner().base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn max_body_size_bytes(&self) -> usize {
        self.inner().base.max_body_size_bytes
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn azure_account(&self) -> Option<&str> {
        self.inner().azure_account.as_deref()
    }

    pub fn azure_access_key(&self) -> Option<&str> {
        self.inner().azure_access_key.as_deref()
    }

    pub fn azure_container(&self) -> &str {
        &self.inner().azure_container
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn cache_max_entries(&self) -> usize {
        self.inner().cache_max_entries
    }

    pub fn cache_ttl(&self) -> Duration {
        self.inner().cache_ttl
    }

    pub fn retention(&self) -> &RetentionConfig {
        &self.inner().retention
    }

    pub fn retention_days(&self) -> i64 {
        self.inner().retention.retention_days
    }
}

fn is_production_environment(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

impl FileServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_environment(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            max_body_size_bytes: env::var("MAX_BODY_SIZE_MB")
                .unwrap_or_else(|_| MAX_BODY_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_BODY_SIZE_MB)
                * 1024
                * 1024,
            environment,
        };

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => Some(value.parse::<StorageBackend>()?),
            Err(_) => None,
        };

        let retention = RetentionConfig {
            retention_days: env::var("FILE_RETENTION_DAYS")
                .unwrap_or_else(|_| DEFAULT_RETENTION_DAYS.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("FILE_RETENTION_DAYS must be a whole number"))?,
            ..RetentionConfig::default()
        };

        let config = FileServiceConfig {
            base,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            azure_account: env::var("AZURE_STORAGE_ACCOUNT").ok(),
            azure_access_key: env::var("AZURE_STORAGE_ACCESS_KEY").ok(),
            azure_container: env::var("AZURE_STORAGE_CONTAINER")
                .unwrap_or_else(|_| AZURE_CONTAINER.to_string()),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .unwrap_or_else(|_| CACHE_MAX_ENTRIES.to_string())
                .parse()
                .unwrap_or(CACHE_MAX_ENTRIES),
            cache_ttl: Duration::from_secs(
                env::var("CACHE_TTL_SECS")
                    .unwrap_or_else(|_| CACHE_TTL_SECS.to_string())
                    .parse()
                    .unwrap_or(CACHE_TTL_SECS),
            ),
            retention,
        };

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(0..=MAX_RETENTION_DAYS).contains(&self.retention.retention_days) {
            return Err(anyhow::anyhow!(
                "FILE_RETENTION_DAYS must be between 0 and {}",
                MAX_RETENTION_DAYS
            ));
        }

        if self.cache_max_entries == 0 {
            return Err(anyhow::anyhow!("CACHE_MAX_ENTRIES must be at least 1"));
        }

        let backend = self.storage_backend.unwrap_or(StorageBackend::Memory);
        match backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Azure => {
                if self.azure_account.is_none() {
                    return Err(anyhow::anyhow!(
                        "AZURE_STORAGE_ACCOUNT must be set when using Azure storage backend"
                    ));
                }
                if self.azure_container.trim().is_empty() {
                    return Err(anyhow::anyhow!(
                        "AZURE_STORAGE_CONTAINER must not be empty"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
            StorageBackend::Memory => {
                if is_production_environment(&self.base.environment) {
                    return Err(anyhow::anyhow!(
                        "STORAGE_BACKEND must be set to a durable backend in production"
                    ));
                }
            }
        }

        Ok(())
    }
}
