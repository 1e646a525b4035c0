//! Errors raised while building or submitting a registration.
//!
//! - [`FieldError`] is a validation failure attached to one form field. Its
//!   `Display` is the message shown next to the field.
//! - [`ImageError`] is raised when a photo cannot be read from disk.
//! - [`ClientError`] covers everything that can go wrong talking to the
//!   registration endpoint.
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Validation failure of a single field.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FieldError {
    #[error("Firm name is required")]
    FirmNameRequired,
    #[error("Brand name is required")]
    BrandNameRequired,
    #[error("Email is required")]
    EmailRequired,
    #[error("Please enter a valid email")]
    EmailInvalid,
    #[error("Name is required")]
    RepresentativeNameRequired,
    #[error("Image is required")]
    ImageRequired,
    #[error("File size should be less than 5MB")]
    ImageTooLarge { size: u64 },
}

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("cannot read image {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not a file")]
    NotAFile(String),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid base_url: {0}")]
    InvalidBaseUrl(String),
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid payload part {field}: {message}")]
    Payload { field: String, message: String },
    #[error("{status}: {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },
}

impl ClientError {
    /// Message supplied by the server, when the error body carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref().filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }
}
