//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Region};
use tracing::Level;

use crate::upload_storage::{StorageError, StorageLocation, StorageResult};

/// Bucket DNC lists are written to unless `S3_BUCKET_NAME` overrides it
const DEFAULT_BUCKET_NAME: &str = "dnc-lists";

/// Region `LocalStack` is addressed with when none is configured
const DEFAULT_DEVELOPMENT_REGION: &str = "us-east-1";

/// Upload URLs stay valid for 5 days
const DEFAULT_PRESIGNED_URL_EXPIRY_SECS: u64 = 5 * 24 * 60 * 60;

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development {
        /// Optional override for presigned URL expiry in seconds
        presign_expiry_override: Option<u64>,
    },
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => {
                let presign_expiry_override = env::var("PRESIGNED_URL_EXPIRY_SECS")
                    .ok()
                    .and_then(|val| val.parse::<u64>().ok());

                Self::Development {
                    presign_expiry_override,
                }
            }
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the S3 bucket name DNC lists are stored in
    #[must_use]
    pub fn s3_bucket(&self) -> String {
        env::var("S3_BUCKET_NAME").unwrap_or_else(|_| DEFAULT_BUCKET_NAME.to_string())
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development { .. } | Self::Staging)
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            // LocalStack endpoint for development
            Self::Development { .. } => Some("http://localhost:4566"),
        }
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let has_region = sdk_config.region().is_some();

        let mut config_builder = sdk_config
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        // LocalStack accepts any region, but signing still needs one
        if !has_region && matches!(self, Self::Development { .. }) {
            config_builder = config_builder.region(Region::new(DEFAULT_DEVELOPMENT_REGION));
        }

        config_builder.build()
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Override "force path style" to true for compatibility with LocalStack
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if matches!(self, Self::Development { .. }) {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }

    /// Resolves the fixed storage location from the S3 client configuration
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidLocation` if no region is configured or the
    /// endpoint override is not a valid base URL
    pub fn storage_location(&self, s3_config: &aws_sdk_s3::Config) -> StorageResult<StorageLocation> {
        let region = s3_config.region().ok_or_else(|| {
            StorageError::InvalidLocation("AWS region is not configured".to_string())
        })?;

        StorageLocation::new(
            self.s3_bucket(),
            region.as_ref(),
            self.override_aws_endpoint_url(),
        )
    }

    /// Presigned URL expiry time in seconds
    #[must_use]
    pub fn presigned_url_expiry_secs(&self) -> u64 {
        match self {
            Self::Production | Self::Staging => DEFAULT_PRESIGNED_URL_EXPIRY_SECS,
            Self::Development {
                presign_expiry_override,
            } => presign_expiry_override.unwrap_or(DEFAULT_PRESIGNED_URL_EXPIRY_SECS),
        }
    }

    /// Default log level when `RUST_LOG` does not set one
    #[must_use]
    pub fn tracing_level(&self) -> Level {
        env::var("TRACING_LEVEL")
            .ok()
            .and_then(|val| val.parse::<Level>().ok())
            .unwrap_or(match self {
                Self::Production | Self::Staging => Level::INFO,
                Self::Development { .. } => Level::DEBUG,
            })
    }
}
