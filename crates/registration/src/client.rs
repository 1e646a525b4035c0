use std::future::Future;

use api_types::{
    INSERT_PARTICIPANT_IDCARD,
    registration::{RegistrationAccepted, RegistrationRejected},
};
use reqwest::{
    Url,
    multipart::{Form, Part},
};

use crate::{
    error::ClientError,
    payload::{PartValue, RegistrationPayload},
    submission::Transport,
};

/// HTTP client for the registration endpoint.
#[derive(Debug, Clone)]
pub struct RegistrationClient {
    base_url: String,
    http: reqwest::Client,
}

impl RegistrationClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        Url::parse(base_url).map_err(|err| ClientError::InvalidBaseUrl(err.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url, INSERT_PARTICIPANT_IDCARD)
    }

    /// Posts the payload as `multipart/form-data`. One attempt, no retry.
    pub async fn register(
        &self,
        payload: RegistrationPayload,
    ) -> Result<RegistrationAccepted, ClientError> {
        let form = multipart(payload)?;
        let endpoint = self.endpoint();
        tracing::debug!("POST {endpoint}");

        let res = self.http.post(&endpoint).multipart(form).send().await?;
        let status = res.status();

        if status.is_success() {
            // A 2xx without a readable body still counts as accepted.
            let body = res.json::<RegistrationAccepted>().await.unwrap_or_else(|err| {
                tracing::warn!("unreadable success body from {endpoint}: {err}");
                RegistrationAccepted::default()
            });
            return Ok(body);
        }

        let message = res
            .json::<RegistrationRejected>()
            .await
            .ok()
            .and_then(|body| body.message);
        tracing::warn!("registration rejected with {status}");
        Err(ClientError::Rejected { status, message })
    }
}

impl Transport for RegistrationClient {
    fn send(
        &self,
        payload: RegistrationPayload,
    ) -> impl Future<Output = Result<RegistrationAccepted, ClientError>> + Send {
        self.register(payload)
    }
}

fn multipart(payload: RegistrationPayload) -> Result<Form, ClientError> {
    // Field names carry brackets; send them verbatim.
    let mut form = Form::new().percent_encode_noop();

    for (name, value) in payload.into_parts() {
        form = match value {
            PartValue::Text(text) => form.text(name, text),
            PartValue::File(image) => {
                let part = Part::bytes(image.bytes)
                    .file_name(image.file_name)
                    .mime_str(&image.content_type)
                    .map_err(|err| ClientError::Payload {
                        field: name.clone(),
                        message: err.to_string(),
                    })?;
                form.part(name, part)
            }
        };
    }

    Ok(form)
}
