//! DNC list upload-URL issuer

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// HTTP routes
pub mod routes;

/// Server bootstrap
pub mod server;

/// Environment, error and extractor types
pub mod types;

/// Presigned S3 uploads for DNC list files
pub mod upload_storage;
