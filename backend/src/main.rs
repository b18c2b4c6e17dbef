use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use backend::{server, types::Environment, upload_storage::UploadStorage};
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(environment.tracing_level()).into())
        .from_env_lossy();

    // Configure logging format based on environment
    // Use JSON format for staging/production, regular format for development
    match environment {
        Environment::Production | Environment::Staging => {
            fmt().json().with_env_filter(env_filter).init();
        }
        Environment::Development { .. } => {
            fmt().with_env_filter(env_filter).init();
        }
    }

    let s3_config = environment.s3_client_config().await;
    let location = environment.storage_location(&s3_config)?;
    let s3_client = Arc::new(S3Client::from_conf(s3_config));
    let upload_storage = Arc::new(UploadStorage::new(
        s3_client,
        location,
        environment.presigned_url_expiry_secs(),
    ));

    server::start(environment, upload_storage).await
}
