//! Form drafts and the validated submissions built from them

use std::path::Path;
use std::sync::LazyLock;

use common_types::UploadType;
use regex::Regex;
use url::Url;
use validator::ValidateEmail;

use crate::airtable::RecordFields;
use crate::error::ValidationError;

/// Declared type for files whose extension maps to no known type
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

static DOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$")
        .expect("domain regex is valid")
});

/// A list file selected for upload
#[derive(Clone, PartialEq, Eq)]
pub struct LocalFile {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl LocalFile {
    /// Creates a file from its name, declared content type and contents
    #[must_use]
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, declaring its type from the extension
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read or the path has no file name
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("{} has no file name", path.display()),
                )
            })?;

        let content_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or(FALLBACK_CONTENT_TYPE);

        let bytes = tokio::fs::read(path).await?;

        Ok(Self::new(name, content_type, bytes))
    }

    /// File name, used as the object name in storage
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared content type, sent with the upload
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Raw file contents
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for LocalFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Input modes of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Upload a list file
    FileUpload,
    /// Reference a list file already hosted elsewhere
    FileUrl,
    /// Add one email address or domain
    SingleEntry,
}

/// Mode-specific input of a draft, only the fields of the selected mode exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftInput {
    /// Upload mode, with the selected file if any
    FileUpload(Option<LocalFile>),
    /// URL mode, with the typed URL
    FileUrl(String),
    /// Single entry mode, with the typed entry
    SingleEntry(String),
}

impl DraftInput {
    const fn empty(mode: InputMode) -> Self {
        match mode {
            InputMode::FileUpload => Self::FileUpload(None),
            InputMode::FileUrl => Self::FileUrl(String::new()),
            InputMode::SingleEntry => Self::SingleEntry(String::new()),
        }
    }

    /// Mode this input belongs to
    #[must_use]
    pub const fn mode(&self) -> InputMode {
        match self {
            Self::FileUpload(_) => InputMode::FileUpload,
            Self::FileUrl(_) => InputMode::FileUrl,
            Self::SingleEntry(_) => InputMode::SingleEntry,
        }
    }
}

/// Editable state of the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDraft {
    /// Login email of the person submitting
    pub email: String,
    /// Input of the selected mode
    pub input: DraftInput,
    /// "The list contains only emails or domains" acknowledgement
    pub confirmed: bool,
}

impl Default for FormDraft {
    fn default() -> Self {
        Self {
            email: String::new(),
            input: DraftInput::FileUpload(None),
            confirmed: false,
        }
    }
}

impl FormDraft {
    /// Switches the input mode, discarding the input of the previous mode
    ///
    /// Selecting the current mode again also clears its input.
    pub fn select_mode(&mut self, mode: InputMode) {
        self.input = DraftInput::empty(mode);
    }

    /// Selects `file`, switching to upload mode
    pub fn set_file(&mut self, file: LocalFile) {
        self.input = DraftInput::FileUpload(Some(file));
    }

    /// Sets the hosted list URL, switching to URL mode
    pub fn set_file_url(&mut self, url: impl Into<String>) {
        self.input = DraftInput::FileUrl(url.into());
    }

    /// Sets the single entry, switching to single entry mode
    pub fn set_single_entry(&mut self, entry: impl Into<String>) {
        self.input = DraftInput::SingleEntry(entry.into());
    }

    /// Mode tag stored with the record
    #[must_use]
    pub const fn upload_type(&self) -> UploadType {
        match self.input {
            DraftInput::FileUpload(_) | DraftInput::FileUrl(_) => UploadType::File,
            DraftInput::SingleEntry(_) => UploadType::Single,
        }
    }
}

/// Where the list file of a file submission comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Bytes uploaded through an issued URL
    Upload(LocalFile),
    /// A list already hosted at this URL
    ExternalUrl(Url),
}

/// A confirmed list file submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSubmission {
    /// Login email of the person submitting
    pub email: String,
    /// The list file
    pub source: FileSource,
}

/// A single email address or domain submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleEntrySubmission {
    /// Login email of the person submitting
    pub email: String,
    /// Email address or domain to stop contacting
    pub entry: String,
}

/// A validated submission, exactly one of the two paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// A list file, confirmed by the submitter
    File(FileSubmission),
    /// One entry
    SingleEntry(SingleEntrySubmission),
}

impl Submission {
    /// Mode tag stored with the record
    #[must_use]
    pub const fn upload_type(&self) -> UploadType {
        match self {
            Self::File(_) => UploadType::File,
            Self::SingleEntry(_) => UploadType::Single,
        }
    }

    /// Login email of the person submitting
    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            Self::File(file) => &file.email,
            Self::SingleEntry(single) => &single.email,
        }
    }

    /// File to upload before the record is created, if any
    #[must_use]
    pub const fn file_to_upload(&self) -> Option<&LocalFile> {
        match self {
            Self::File(FileSubmission {
                source: FileSource::Upload(file),
                ..
            }) => Some(file),
            _ => None,
        }
    }

    /// Record columns for this submission
    ///
    /// `uploaded_file_url` is the object URL returned by the issuer for uploaded files.
    #[must_use]
    pub fn record_fields(&self, uploaded_file_url: Option<&str>) -> RecordFields {
        match self {
            Self::File(file) => {
                let external_url = match &file.source {
                    FileSource::ExternalUrl(url) => Some(url.to_string()),
                    FileSource::Upload(_) => None,
                };
                RecordFields {
                    email: file.email.clone(),
                    upload_type: UploadType::File,
                    file: uploaded_file_url.map(str::to_owned),
                    file_url: external_url,
                    dnc_mail: None,
                    confirmed: true,
                }
            }
            Self::SingleEntry(single) => RecordFields {
                email: single.email.clone(),
                upload_type: UploadType::Single,
                file: None,
                file_url: None,
                dnc_mail: Some(single.entry.clone()),
                confirmed: false,
            },
        }
    }
}

impl TryFrom<&FormDraft> for Submission {
    type Error = ValidationError;

    fn try_from(draft: &FormDraft) -> Result<Self, Self::Error> {
        let email = validate_email(&draft.email)?;

        match &draft.input {
            DraftInput::FileUpload(file) => {
                let file = file.clone().ok_or(ValidationError::MissingFile)?;
                require_confirmation(draft.confirmed)?;
                Ok(Self::File(FileSubmission {
                    email,
                    source: FileSource::Upload(file),
                }))
            }
            DraftInput::FileUrl(url) => {
                let url = validate_file_url(url)?;
                require_confirmation(draft.confirmed)?;
                Ok(Self::File(FileSubmission {
                    email,
                    source: FileSource::ExternalUrl(url),
                }))
            }
            DraftInput::SingleEntry(entry) => Ok(Self::SingleEntry(SingleEntrySubmission {
                email,
                entry: validate_entry(entry)?,
            })),
        }
    }
}

fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if !email.validate_email() {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(email.to_string())
}

fn validate_file_url(url: &str) -> Result<Url, ValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ValidationError::MissingFileUrl);
    }
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {
            Ok(parsed)
        }
        _ => Err(ValidationError::InvalidFileUrl(url.to_string())),
    }
}

fn validate_entry(entry: &str) -> Result<String, ValidationError> {
    let entry = entry.trim();
    if entry.is_empty() {
        return Err(ValidationError::MissingEntry);
    }
    if entry.validate_email() || DOMAIN_REGEX.is_match(entry) {
        Ok(entry.to_string())
    } else {
        Err(ValidationError::InvalidEntry(entry.to_string()))
    }
}

const fn require_confirmation(confirmed: bool) -> Result<(), ValidationError> {
    if confirmed {
        Ok(())
    } else {
        Err(ValidationError::MissingConfirmation)
    }
}
