//! Alert submission form.
//!
//! Holds the four free-text fields plus a dismissible feedback banner.
//! Fields are cleared if and only if the insert succeeded; an empty
//! field blocks the submission before any network call is made.

use thiserror::Error;

use crate::client::http::{BackendClient, ClientError};
use crate::models::{Alert, AlertDraft};

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Please fill in all fields.")]
    EmptyFields,
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] ClientError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Danger,
}

/// Dismissible banner shown above the form.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub text: String,
}

/// The patient alert form.
#[derive(Debug, Default)]
pub struct AlertForm {
    pub name: String,
    pub bed_number: String,
    pub room_number: String,
    pub message: String,
    feedback: Option<Feedback>,
}

impl AlertForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn dismiss_feedback(&mut self) {
        self.feedback = None;
    }

    /// Check the fields exactly as supplied — no trimming, so a
    /// whitespace-only value passes, as in the original form.
    pub fn validate(&self) -> Result<AlertDraft, ValidationError> {
        if self.name.is_empty()
            || self.bed_number.is_empty()
            || self.room_number.is_empty()
            || self.message.is_empty()
        {
            return Err(ValidationError::EmptyFields);
        }
        Ok(AlertDraft {
            name: self.name.clone(),
            bed_number: self.bed_number.clone(),
            room_number: self.room_number.clone(),
            message: self.message.clone(),
        })
    }

    /// Submit the form: exactly one insert call per invocation, no
    /// dedup of repeated identical submissions.
    pub async fn submit(&mut self, client: &BackendClient) -> Result<Alert, SubmitError> {
        let draft = match self.validate() {
            Ok(draft) => draft,
            Err(e) => {
                self.feedback = Some(Feedback {
                    kind: FeedbackKind::Danger,
                    text: "Please fill in all fields.".into(),
                });
                return Err(e.into());
            }
        };

        match client.submit_alert(&draft).await {
            Ok(alert) => {
                self.clear_fields();
                self.feedback = Some(Feedback {
                    kind: FeedbackKind::Success,
                    text: "Alert sent successfully!".into(),
                });
                Ok(alert)
            }
            Err(e) => {
                // Keep the fields so the patient can retry
                self.feedback = Some(Feedback {
                    kind: FeedbackKind::Danger,
                    text: "Failed to send alert.".into(),
                });
                Err(e.into())
            }
        }
    }

    fn clear_fields(&mut self) {
        self.name.clear();
        self.bed_number.clear();
        self.room_number.clear();
        self.message.clear();
    }
}
