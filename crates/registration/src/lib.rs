//! Participant ID card registration.
//!
//! The crate holds everything a front end needs to collect and submit a
//! registration: the form state and its reducer, the validator, the multipart
//! payload, the submission coordinator and the HTTP client. Front ends (the
//! terminal form, the headless submitter) only translate input events into
//! [`Action`]s and render [`Form`] and [`Notification`]s.

pub use client::RegistrationClient;
pub use error::{ClientError, FieldError, ImageError};
pub use form::{
    Action, FirmField, FirmInfo, Form, FormState, Representative, Representatives, reduce,
};
pub use image::ImageFile;
pub use payload::{PartValue, RegistrationPayload};
pub use submission::{
    Begin, Completion, Coordinator, Notification, NotificationLevel, Route, SubmissionState,
    Transport,
};
pub use validation::{ErrorReport, FirmErrors, MAX_IMAGE_BYTES, RepresentativeErrors, validate};

pub use api_types::registration::{RegistrationAccepted, RegistrationRejected};
pub use reqwest::StatusCode;

mod client;
mod error;
mod form;
mod image;
mod payload;
mod submission;
mod validation;
