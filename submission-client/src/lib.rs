//! DNC list submission client

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

pub mod airtable;
pub mod client;
pub mod config;
pub mod error;
pub mod form;
mod http;
pub mod issuer_api;
pub mod object_upload;
pub mod submission;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use client::{SubmissionClient, SubmissionReceipt, SubmissionStage};
pub use config::{AirtableConfig, ClientConfig};
pub use error::{SubmissionError, ValidationError};
pub use form::{FormStatus, SubmissionForm, SUCCESS_MESSAGE};
pub use submission::{FormDraft, InputMode, LocalFile, Submission};
