//! Submission form state machine
//!
//! `Idle → Uploading → Recording → Succeeded | Failed`. File uploads pass through
//! `Uploading`; single entries and hosted files go straight to `Recording`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

use crate::{
    client::{SubmissionClient, SubmissionReceipt, SubmissionStage},
    error::SubmissionError,
    submission::{FormDraft, InputMode, Submission},
};

/// Message shown after a successful submission
pub const SUCCESS_MESSAGE: &str = "Successfully Uploaded to Your Do-Not-Contact List.";

/// Where the form is in its submission cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    /// Nothing submitted yet
    Idle,
    /// Requesting an upload URL and writing the list file
    Uploading,
    /// Creating the record
    Recording,
    /// Last submission completed, the draft was reset
    Succeeded,
    /// Last submission failed, the draft is unchanged
    Failed(String),
}

impl FormStatus {
    /// Whether a submission is running
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Uploading | Self::Recording)
    }
}

impl From<SubmissionStage> for FormStatus {
    fn from(stage: SubmissionStage) -> Self {
        match stage {
            SubmissionStage::Uploading => Self::Uploading,
            SubmissionStage::Recording => Self::Recording,
        }
    }
}

/// Releases the in-flight flag when the submission ends, however it ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One form instance: a draft, its submission status and the client submitting it
pub struct SubmissionForm {
    client: SubmissionClient,
    draft: Mutex<FormDraft>,
    in_flight: AtomicBool,
    status: watch::Sender<FormStatus>,
    success_message: Mutex<Option<String>>,
}

impl SubmissionForm {
    /// Creates an idle form with an empty draft
    #[must_use]
    pub fn new(client: SubmissionClient) -> Self {
        let (status, _) = watch::channel(FormStatus::Idle);
        Self {
            client,
            draft: Mutex::new(FormDraft::default()),
            in_flight: AtomicBool::new(false),
            status,
            success_message: Mutex::new(None),
        }
    }

    /// Applies `edit` to the draft
    pub fn edit<R>(&self, edit: impl FnOnce(&mut FormDraft) -> R) -> R {
        let mut draft = self.draft.lock().unwrap_or_else(PoisonError::into_inner);
        edit(&mut draft)
    }

    /// Switches the input mode, clearing the previous mode's input
    pub fn select_mode(&self, mode: InputMode) {
        self.edit(|draft| draft.select_mode(mode));
    }

    /// Snapshot of the draft
    #[must_use]
    pub fn draft(&self) -> FormDraft {
        self.edit(|draft| draft.clone())
    }

    /// Current status
    #[must_use]
    pub fn status(&self) -> FormStatus {
        self.status.borrow().clone()
    }

    /// Receiver observing every status change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FormStatus> {
        self.status.subscribe()
    }

    /// Whether a submission is running
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Message of the last successful submission, cleared when a new one starts
    #[must_use]
    pub fn success_message(&self) -> Option<String> {
        self.success_message
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Validates and submits the current draft
    ///
    /// On success the draft is reset, unless it was edited while the submission ran,
    /// and the success message set. On failure the draft is left as it was. A call made while another one is running returns
    /// `SubmissionError::InProgress` without touching the network.
    ///
    /// # Errors
    ///
    /// Returns the validation, authorization, upload, record or transport error that
    /// stopped the submission
    pub async fn submit(&self) -> Result<SubmissionReceipt, SubmissionError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::warn!("submit ignored, a submission is already in progress");
            return Err(SubmissionError::InProgress);
        };

        self.set_success_message(None);

        let submitted = self.draft();
        let result = self.run(&submitted).await;

        match &result {
            Ok(receipt) => {
                tracing::info!(record_id = %receipt.record_id, "DNC submission recorded");
                self.edit(|draft| {
                    if *draft == submitted {
                        *draft = FormDraft::default();
                    }
                });
                self.set_success_message(Some(SUCCESS_MESSAGE.to_string()));
                self.set_status(FormStatus::Succeeded);
            }
            Err(e) => {
                tracing::error!("DNC submission failed: {e}");
                self.set_status(FormStatus::Failed(e.to_string()));
            }
        }

        result
    }

    async fn run(&self, draft: &FormDraft) -> Result<SubmissionReceipt, SubmissionError> {
        let submission = Submission::try_from(draft)?;

        self.client
            .submit_with_progress(&submission, |stage| self.set_status(stage.into()))
            .await
    }

    fn set_status(&self, status: FormStatus) {
        tracing::debug!(?status, "form status changed");
        self.status.send_replace(status);
    }

    fn set_success_message(&self, message: Option<String>) {
        *self
            .success_message
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = message;
    }
}
