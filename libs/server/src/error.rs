use folio_store::StoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MailError {
    #[error("mail relay request failed: {0}")]
    Transport(String),

    #[error("mail relay rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// A single rejected contact form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("contact form is invalid")]
    Invalid(Vec<FieldError>),

    #[error("failed to store contact message: {0}")]
    Store(#[from] StoreError),

    #[error("failed to relay contact message: {0}")]
    Mail(#[from] MailError),
}
