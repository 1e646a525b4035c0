//! Submission coordinator.
//!
//! The coordinator owns the [`SubmissionState`] and is the only thing allowed
//! to start a request. A submit intent is validated first; an invalid form
//! never reaches the network. While a request is pending further intents are
//! turned away, so at most one registration is in flight.
use std::future::Future;

use api_types::registration::RegistrationAccepted;
use serde::Serialize;

use crate::{
    error::ClientError,
    form::{Form, FormState},
    payload::RegistrationPayload,
    validation::{ErrorReport, validate},
};

pub const DEFAULT_SUCCESS_MESSAGE: &str = "ID Card created successfully";
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong";

/// Sends a finished payload to the registration endpoint.
pub trait Transport {
    fn send(
        &self,
        payload: RegistrationPayload,
    ) -> impl Future<Output = Result<RegistrationAccepted, ClientError>> + Send;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Route {
    Register,
    ThankYou,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Register => "/",
            Self::ThankYou => "/thankyou",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: "Success".to_string(),
            description: description.into(),
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: "Error".to_string(),
            description: description.into(),
        }
    }
}

/// Outcome of [`Coordinator::begin`].
#[derive(Debug)]
pub enum Begin {
    /// A request is still in flight; nothing happened.
    Busy,
    /// The form failed validation. The report replaces the form's errors.
    Invalid(ErrorReport),
    /// The form is valid: send `payload` exactly once, then call
    /// [`Coordinator::finish`]. `errors` is the (clean) report to show.
    Dispatch {
        errors: ErrorReport,
        payload: RegistrationPayload,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub notification: Notification,
    pub navigate: Option<Route>,
}

#[derive(Debug, Default)]
pub struct Coordinator {
    state: SubmissionState,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == SubmissionState::Pending
    }

    pub fn begin(&mut self, form: &FormState) -> Begin {
        if self.is_pending() {
            tracing::debug!("submit ignored: registration already pending");
            return Begin::Busy;
        }

        let (errors, valid) = validate(&form.firm, &form.representatives);
        if !valid {
            tracing::debug!(
                "registration form invalid ({} errors)",
                errors.entries().len()
            );
            return Begin::Invalid(errors);
        }

        let payload = RegistrationPayload::from_state(form);
        tracing::info!(
            "dispatching registration for {:?} with {} representatives",
            form.firm.name,
            payload.representative_count()
        );
        self.state = SubmissionState::Pending;
        Begin::Dispatch { errors, payload }
    }

    pub fn finish(&mut self, result: Result<RegistrationAccepted, ClientError>) -> Completion {
        match result {
            Ok(accepted) => {
                let message = accepted
                    .msg
                    .filter(|msg| !msg.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());
                tracing::info!("registration accepted: {message}");
                self.state = SubmissionState::Succeeded;
                Completion {
                    notification: Notification::success(message),
                    navigate: Some(Route::ThankYou),
                }
            }
            Err(err) => {
                tracing::error!("registration failed: {err}");
                let message = err
                    .server_message()
                    .unwrap_or(DEFAULT_ERROR_MESSAGE)
                    .to_string();
                self.state = SubmissionState::Failed(message.clone());
                Completion {
                    notification: Notification::error(message),
                    navigate: None,
                }
            }
        }
    }

    /// Validates `form`, sends it once through `transport` and maps the
    /// outcome. Returns `None` when nothing was sent.
    pub async fn submit<T: Transport>(
        &mut self,
        form: &mut Form,
        transport: &T,
    ) -> Option<Completion> {
        let payload = match self.begin(&form.state) {
            Begin::Busy => return None,
            Begin::Invalid(errors) => {
                form.errors = errors;
                return None;
            }
            Begin::Dispatch { errors, payload } => {
                form.errors = errors;
                payload
            }
        };

        let result = transport.send(payload).await;
        Some(self.finish(result))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use reqwest::StatusCode;

    use super::*;
    use crate::{
        error::FieldError,
        form::{Action, FirmField},
        image::ImageFile,
    };

    enum Reply {
        Accept(Option<String>),
        Reject(Option<String>),
    }

    struct FakeTransport {
        reply: Reply,
        sent: Mutex<Vec<RegistrationPayload>>,
    }

    impl FakeTransport {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    impl Transport for FakeTransport {
        fn send(
            &self,
            payload: RegistrationPayload,
        ) -> impl Future<Output = Result<RegistrationAccepted, ClientError>> + Send {
            self.sent.lock().unwrap().push(payload);
            let result = match &self.reply {
                Reply::Accept(msg) => Ok(RegistrationAccepted { msg: msg.clone() }),
                Reply::Reject(message) => Err(ClientError::Rejected {
                    status: StatusCode::UNPROCESSABLE_ENTITY,
                    message: message.clone(),
                }),
            };
            async move { result }
        }
    }

    fn valid_form() -> Form {
        let mut form = Form::new();
        form.dispatch(Action::SetFirmField(FirmField::Name, "Acme".to_string()));
        form.dispatch(Action::SetFirmField(
            FirmField::BrandName,
            "AcmeBrand".to_string(),
        ));
        form.dispatch(Action::SetFirmField(FirmField::Email, "a@b.com".to_string()));
        form.dispatch(Action::SetRepresentativeName(0, "Jane".to_string()));
        form.dispatch(Action::SetRepresentativeImage(
            0,
            ImageFile::from_bytes("jane.jpg", vec![0; 120_000]),
        ));
        form
    }

    #[tokio::test]
    async fn invalid_form_sends_nothing() {
        let transport = FakeTransport::new(Reply::Accept(None));
        let mut coordinator = Coordinator::new();
        let mut form = Form::new();

        let completion = coordinator.submit(&mut form, &transport).await;

        assert!(completion.is_none());
        assert_eq!(transport.sent(), 0);
        assert_eq!(coordinator.state(), &SubmissionState::Idle);
        assert_eq!(form.errors.firm.name, Some(FieldError::FirmNameRequired));
    }

    #[tokio::test]
    async fn success_navigates_to_thank_you() {
        let transport = FakeTransport::new(Reply::Accept(Some("ok".to_string())));
        let mut coordinator = Coordinator::new();
        let mut form = valid_form();

        let completion = coordinator.submit(&mut form, &transport).await.unwrap();

        assert_eq!(transport.sent(), 1);
        assert_eq!(coordinator.state(), &SubmissionState::Succeeded);
        assert_eq!(completion.navigate, Some(Route::ThankYou));
        assert_eq!(completion.notification, Notification::success("ok"));
        assert!(form.errors.is_clean());
    }

    #[tokio::test]
    async fn success_without_msg_uses_default() {
        let transport = FakeTransport::new(Reply::Accept(None));
        let mut coordinator = Coordinator::new();

        let completion = coordinator
            .submit(&mut valid_form(), &transport)
            .await
            .unwrap();

        assert_eq!(completion.notification.description, DEFAULT_SUCCESS_MESSAGE);
    }

    #[tokio::test]
    async fn rejection_surfaces_server_message() {
        let transport =
            FakeTransport::new(Reply::Reject(Some("Email already registered".to_string())));
        let mut coordinator = Coordinator::new();

        let completion = coordinator
            .submit(&mut valid_form(), &transport)
            .await
            .unwrap();

        assert_eq!(completion.navigate, None);
        assert_eq!(completion.notification.level, NotificationLevel::Error);
        assert_eq!(
            coordinator.state(),
            &SubmissionState::Failed("Email already registered".to_string())
        );
    }

    #[tokio::test]
    async fn rejection_without_message_uses_default() {
        let transport = FakeTransport::new(Reply::Reject(None));
        let mut coordinator = Coordinator::new();

        coordinator.submit(&mut valid_form(), &transport).await;

        assert_eq!(
            coordinator.state(),
            &SubmissionState::Failed(DEFAULT_ERROR_MESSAGE.to_string())
        );
    }

    #[test]
    fn pending_turns_away_second_submit() {
        let mut coordinator = Coordinator::new();
        let form = valid_form();

        assert!(matches!(coordinator.begin(&form.state), Begin::Dispatch { .. }));
        assert!(coordinator.is_pending());
        assert!(matches!(coordinator.begin(&form.state), Begin::Busy));

        coordinator.finish(Ok(RegistrationAccepted::default()));
        assert!(!coordinator.is_pending());
    }

    #[test]
    fn failed_submission_can_be_retried_by_user() {
        let mut coordinator = Coordinator::new();
        let form = valid_form();

        let _ = coordinator.begin(&form.state);
        coordinator.finish(Err(ClientError::InvalidBaseUrl("x".to_string())));
        assert!(matches!(coordinator.state(), SubmissionState::Failed(_)));

        assert!(matches!(coordinator.begin(&form.state), Begin::Dispatch { .. }));
    }

    #[test]
    fn thank_you_route_path() {
        assert_eq!(Route::ThankYou.path(), "/thankyou");
    }
}
