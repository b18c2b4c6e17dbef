//! Error types for DNC list submissions

use thiserror::Error;

/// A draft that cannot be submitted, caught before any network call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The login email is empty
    #[error("email is required")]
    MissingEmail,

    /// The login email is not an email address
    #[error("email is not a valid address: {0}")]
    InvalidEmail(String),

    /// File upload mode without a selected file
    #[error("a list file is required")]
    MissingFile,

    /// File URL mode without a URL
    #[error("a list file URL is required")]
    MissingFileUrl,

    /// File URL that is not an absolute http(s) URL
    #[error("file URL must be an absolute http(s) URL: {0}")]
    InvalidFileUrl(String),

    /// File mode without confirming the list contents
    #[error("confirm that the list contains only emails or domains")]
    MissingConfirmation,

    /// Single entry mode without an entry
    #[error("an email or domain to add is required")]
    MissingEntry,

    /// Single entry that is neither an email address nor a domain
    #[error("entry must be an email address or a domain: {0}")]
    InvalidEntry(String),
}

/// Errors that abort a submission
///
/// None of them is retried; the draft stays as it was so the user can resubmit.
#[derive(Error, Debug)]
pub enum SubmissionError {
    /// The draft failed validation
    #[error("invalid submission: {0}")]
    Validation(#[from] ValidationError),

    /// The issuer could not produce an upload URL
    #[error("upload authorization failed: {0}")]
    Authorization(String),

    /// The storage write returned a non-success status
    #[error("file upload failed with status {status}: {body}")]
    Upload {
        /// HTTP status returned by storage
        status: u16,
        /// Response body, usually an S3 XML error document
        body: String,
    },

    /// The record creation returned a non-success status
    #[error("record creation failed with status {status}: {body}")]
    Record {
        /// HTTP status returned by Airtable
        status: u16,
        /// Response body
        body: String,
    },

    /// The request never produced a response or its body could not be read
    #[error("transport error: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    /// Another submission on the same form has not finished yet
    #[error("a submission is already in progress")]
    InProgress,

    /// Client configuration is unusable
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for SubmissionError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(reqwest_middleware::Error::Reqwest(error))
    }
}
