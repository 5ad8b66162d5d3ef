use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use serde::Deserialize;
use url::Url;

use admissions_core::model::{
    AcademicField, ApplicationId, FieldKind, FieldValue, FormSchema, WizardState,
};

use crate::error::{SubmissionConfigError, SubmitError, TransportError};
use crate::wizard::{NETWORK_ERROR_MESSAGE, SERVER_ERROR_MESSAGE};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/apply/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENDPOINT_ENV: &str = "ADMISSIONS_SUBMIT_URL";
pub const TIMEOUT_ENV: &str = "ADMISSIONS_SUBMIT_TIMEOUT_SECS";

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionConfig {
    pub endpoint: Url,
    pub timeout: Duration,
}

impl SubmissionConfig {
    /// # Errors
    ///
    /// Returns `SubmissionConfigError` if `endpoint` is not an http(s) URL.
    pub fn new(endpoint: &str) -> Result<Self, SubmissionConfigError> {
        let endpoint = Url::parse(endpoint.trim())?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(SubmissionConfigError::UnsupportedScheme(
                endpoint.scheme().to_string(),
            ));
        }
        Ok(Self {
            endpoint,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve a `redirect` from the response against the endpoint.
    #[must_use]
    pub fn resolve_redirect(&self, redirect: &str) -> Option<Url> {
        self.endpoint.join(redirect.trim()).ok()
    }

    /// Read `ADMISSIONS_SUBMIT_URL` and `ADMISSIONS_SUBMIT_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionConfigError` for a malformed URL or timeout.
    pub fn from_env() -> Result<Self, SubmissionConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionConfigError` for a malformed URL or timeout.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SubmissionConfigError> {
        let endpoint = lookup(ENDPOINT_ENV)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let config = Self::new(&endpoint)?;
        match lookup(TIMEOUT_ENV) {
            None => Ok(config),
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or(SubmissionConfigError::InvalidTimeout(raw))?;
                Ok(config.with_timeout(Duration::from_secs(secs)))
            }
        }
    }
}

//
// ─── PAYLOAD ───────────────────────────────────────────────────────────────────
//

/// A picked file, posted as its own multipart part under `field`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub field: String,
    pub path: PathBuf,
}

/// Multipart body mirroring what the browser form posts: text parts in field
/// order, then one file part per attachment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionPayload {
    pairs: Vec<(String, String)>,
    attachments: Vec<Attachment>,
}

impl SubmissionPayload {
    /// Scalars as `name=value`, lists repeated, checked boxes as `on` (unchecked
    /// omitted), then each academic entry as `educationLevel[]`, `institution[]`...
    /// File fields become attachments; an empty picker sends nothing.
    #[must_use]
    pub fn build(schema: &FormSchema, state: &WizardState) -> Self {
        let mut pairs = Vec::new();
        let mut attachments = Vec::new();
        for spec in schema.fields() {
            let name = spec.name.as_str();
            let value = state.field(&spec.name);
            if let FieldKind::File { .. } = spec.kind {
                let paths = value.map(FieldValue::entries).unwrap_or_default();
                attachments.extend(paths.into_iter().map(|path| Attachment {
                    field: name.to_string(),
                    path: PathBuf::from(path),
                }));
                continue;
            }
            match (value, &spec.kind) {
                (Some(FieldValue::Flag(true)), _) => {
                    pairs.push((name.to_string(), "on".to_string()));
                }
                (Some(FieldValue::Flag(false)), _) | (None, FieldKind::Checkbox) => {}
                (Some(FieldValue::Text(text)), _) => {
                    pairs.push((name.to_string(), text.clone()));
                }
                (Some(FieldValue::List(items)), _) => {
                    pairs.extend(items.iter().map(|item| (name.to_string(), item.clone())));
                }
                (None, _) => pairs.push((name.to_string(), String::new())),
            }
        }
        for entry in state.academic().entries() {
            for field in AcademicField::ALL {
                pairs.push((field.form_key().to_string(), entry.get(field).to_string()));
            }
        }
        Self { pairs, attachments }
    }

    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Every value posted under `key`, in order.
    #[must_use]
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

//
// ─── RESPONSE ──────────────────────────────────────────────────────────────────
//

/// JSON body returned by the admissions endpoint, whatever the HTTP status.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default)]
    pub redirect: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Accepted application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub application_id: ApplicationId,
    pub message: Option<String>,
    pub redirect: Option<String>,
}

impl SubmissionResponse {
    /// Interpret the body as an acceptance or a rejection.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Rejected` for `success: false`, and
    /// `SubmitError::Transport` when an acceptance carries no application id.
    pub fn into_receipt(self) -> Result<SubmissionReceipt, SubmitError> {
        if !self.success {
            let field_errors = self
                .errors
                .unwrap_or_default()
                .into_iter()
                .flat_map(|(field, messages)| {
                    messages.into_iter().map(move |message| (field.clone(), message))
                })
                .collect();
            let message = self
                .error
                .filter(|error| !error.trim().is_empty())
                .unwrap_or_else(|| SERVER_ERROR_MESSAGE.to_string());
            return Err(SubmitError::Rejected {
                message,
                field_errors,
            });
        }
        let application_id = ApplicationId::new(self.application_id.unwrap_or_default())
            .map_err(|err| TransportError::InvalidResponse(err.to_string()))?;
        Ok(SubmissionReceipt {
            application_id,
            message: self.message,
            redirect: self.redirect,
        })
    }
}

impl SubmitError {
    /// Banner text for a failed submission.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Transport(TransportError::Network(_)) => NETWORK_ERROR_MESSAGE.to_string(),
            SubmitError::Transport(TransportError::Attachment { path, .. }) => {
                format!("Could not read {path}. Please attach the file again.")
            }
            SubmitError::Transport(_) => SERVER_ERROR_MESSAGE.to_string(),
            SubmitError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

//
// ─── TRANSPORT ─────────────────────────────────────────────────────────────────
//

/// Sends a payload to the admissions endpoint.
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    /// # Errors
    ///
    /// Returns `TransportError` if the request fails or the body is not JSON.
    async fn send(&self, payload: &SubmissionPayload)
    -> Result<SubmissionResponse, TransportError>;
}

/// `reqwest` transport posting `multipart/form-data`.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn new(config: &SubmissionConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-requested-with",
            HeaderValue::from_static("XMLHttpRequest"),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl SubmissionTransport for HttpTransport {
    async fn send(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionResponse, TransportError> {
        let mut form = Form::new();
        for (name, value) in payload.pairs() {
            form = form.text(name.clone(), value.clone());
        }
        for attachment in payload.attachments() {
            form = form
                .file(attachment.field.clone(), &attachment.path)
                .await
                .map_err(|err| TransportError::Attachment {
                    path: attachment.path.display().to_string(),
                    reason: err.to_string(),
                })?;
        }
        tracing::debug!(
            fields = payload.pairs().len(),
            attachments = payload.attachments().len(),
            "posting application"
        );
        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%status, bytes = body.len(), "submission response received");
        serde_json::from_str(&body).map_err(|err| TransportError::InvalidResponse(err.to_string()))
    }
}

//
// ─── CLIENT ────────────────────────────────────────────────────────────────────
//

/// Submission lifecycle. `Submitted` is terminal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle { last_error: Option<String> },
    Submitting,
    Submitted(ApplicationId),
}

impl Default for SubmitPhase {
    fn default() -> Self {
        Self::Idle { last_error: None }
    }
}

impl SubmitPhase {
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmitPhase::Submitting)
    }

    #[must_use]
    pub fn button_label(&self) -> &'static str {
        if self.is_submitting() {
            "Submitting..."
        } else {
            "Submit Application"
        }
    }
}

#[derive(Clone)]
pub struct SubmissionClient {
    transport: Arc<dyn SubmissionTransport>,
}

impl SubmissionClient {
    #[must_use]
    pub fn new(transport: Arc<dyn SubmissionTransport>) -> Self {
        Self { transport }
    }

    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn http(config: &SubmissionConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    /// Send `payload` and interpret the response.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Transport` or `SubmitError::Rejected`.
    pub async fn deliver(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let response = self.transport.send(payload).await?;
        response.into_receipt()
    }
}
