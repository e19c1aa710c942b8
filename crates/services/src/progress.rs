use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use quiz_core::runner::AnswerOutcome;

use crate::error::ProgressSinkError;

/// One submitted answer, as sent to the progress sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub user_id: String,
    pub user_name: String,
    pub question_id: String,
    pub category: String,
    pub grade: String,
    pub subject: String,
    pub selected_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ProgressRecord {
    #[must_use]
    pub fn from_outcome(
        outcome: &AnswerOutcome,
        user_id: &str,
        user_name: &str,
        timestamp: i64,
    ) -> Self {
        Self {
            user_id: user_id.to_owned(),
            user_name: user_name.to_owned(),
            question_id: outcome.question_id.to_string(),
            category: outcome.category.clone(),
            grade: outcome.grade.clone(),
            subject: outcome.subject.clone(),
            selected_answer: outcome.selected.clone(),
            correct_answer: outcome.correct_answer.clone(),
            is_correct: outcome.is_correct,
            timestamp,
        }
    }
}

/// Receives per-answer progress records.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn record(&self, record: &ProgressRecord) -> Result<(), ProgressSinkError>;
}

//
// ─── HTTP SINK ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct SinkResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

/// POSTs each record as JSON to a web endpoint.
#[derive(Clone, Debug)]
pub struct HttpProgressSink {
    client: Client,
    url: String,
}

impl HttpProgressSink {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ProgressSink for HttpProgressSink {
    async fn record(&self, record: &ProgressRecord) -> Result<(), ProgressSinkError> {
        let response = self.client.post(&self.url).json(record).send().await?;

        if !response.status().is_success() {
            return Err(ProgressSinkError::HttpStatus(response.status()));
        }

        let body: SinkResponse = response.json().await?;
        if body.status != "success" {
            return Err(ProgressSinkError::Rejected(
                body.message.unwrap_or(body.status),
            ));
        }

        info!(
            question_id = %record.question_id,
            message = body.message.as_deref().unwrap_or_default(),
            "progress recorded"
        );
        Ok(())
    }
}

//
// ─── LOG SINK ──────────────────────────────────────────────────────────────────
//

/// Used when no endpoint is configured: the record is only written to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgressSink;

#[async_trait]
impl ProgressSink for LogProgressSink {
    async fn record(&self, record: &ProgressRecord) -> Result<(), ProgressSinkError> {
        info!(
            user_id = %record.user_id,
            user_name = %record.user_name,
            question_id = %record.question_id,
            category = %record.category,
            grade = %record.grade,
            subject = %record.subject,
            selected = %record.selected_answer,
            correct = %record.correct_answer,
            is_correct = record.is_correct,
            timestamp = record.timestamp,
            "progress endpoint not configured; record not sent"
        );
        Ok(())
    }
}

//
// ─── DISPATCH ──────────────────────────────────────────────────────────────────
//

/// Fire-and-forget delivery of progress records.
///
/// Failures are logged and dropped; nothing is retried and delivery order is
/// not guaranteed.
#[derive(Clone)]
pub struct ProgressReporter {
    sink: Arc<dyn ProgressSink>,
}

impl ProgressReporter {
    #[must_use]
    pub fn new(sink: Arc<dyn ProgressSink>) -> Self {
        Self { sink }
    }

    /// Pick the HTTP sink when a URL is configured, the log sink otherwise.
    #[must_use]
    pub fn from_url(url: Option<&str>) -> Self {
        match url {
            Some(url) => Self::new(Arc::new(HttpProgressSink::new(url))),
            None => Self::new(Arc::new(LogProgressSink)),
        }
    }

    /// Send `record` in the background on the current tokio runtime.
    ///
    /// Returns the spawned task, or `None` when no runtime is available and
    /// the record was dropped.
    pub fn report(&self, record: ProgressRecord) -> Option<JoinHandle<()>> {
        let Ok(handle) = Handle::try_current() else {
            warn!(
                question_id = %record.question_id,
                "no async runtime, progress record dropped"
            );
            return None;
        };

        let sink = Arc::clone(&self.sink);
        Some(handle.spawn(async move {
            match sink.record(&record).await {
                Ok(()) => debug!(question_id = %record.question_id, "progress delivered"),
                Err(err) => warn!(
                    question_id = %record.question_id,
                    error = %err,
                    "failed to deliver progress record"
                ),
            }
        }))
    }
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter").finish_non_exhaustive()
    }
}
