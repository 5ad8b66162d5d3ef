use std::sync::Arc;

use admissions_core::model::FormSchema;
use storage::repository::Storage;

use crate::Clock;
use crate::draft_store::DraftStore;
use crate::error::AppServicesError;
use crate::submission::{SubmissionClient, SubmissionConfig, SubmissionTransport};
use crate::wizard::ApplicationWorkflow;

/// Assembles app-facing services for the admissions wizard.
#[derive(Clone)]
pub struct AppServices {
    workflow: Arc<ApplicationWorkflow>,
    drafts: Arc<DraftStore>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP submission endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the HTTP
    /// client cannot be built.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: &SubmissionConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let submitter = SubmissionClient::http(config)
            .map_err(|err| AppServicesError::HttpClient(err.to_string()))?;
        tracing::info!(endpoint = %config.endpoint, "submission endpoint configured");
        Ok(Self::assemble(&storage, clock, submitter))
    }

    /// Build services over in-memory storage with a caller-supplied transport.
    #[must_use]
    pub fn in_memory(clock: Clock, transport: Arc<dyn SubmissionTransport>) -> Self {
        Self::assemble(&Storage::in_memory(), clock, SubmissionClient::new(transport))
    }

    /// Build services over existing storage.
    #[must_use]
    pub fn assemble(storage: &Storage, clock: Clock, submitter: SubmissionClient) -> Self {
        let drafts = DraftStore::new(clock, Arc::clone(&storage.drafts));
        let workflow = Arc::new(ApplicationWorkflow::new(
            FormSchema::admissions(),
            drafts.clone(),
            submitter,
        ));
        Self {
            workflow,
            drafts: Arc::new(drafts),
        }
    }

    #[must_use]
    pub fn workflow(&self) -> Arc<ApplicationWorkflow> {
        Arc::clone(&self.workflow)
    }

    #[must_use]
    pub fn drafts(&self) -> Arc<DraftStore> {
        Arc::clone(&self.drafts)
    }
}
