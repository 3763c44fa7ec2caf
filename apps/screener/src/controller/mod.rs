//! Owns the submission state machine.
//!
//! ```text
//! Idle ──submit──▶ Validating ──ok──▶ Submitting ──▶ Success | Failed
//!                       └──invalid──▶ Failed
//! Success | Failed ──submit──▶ Validating (prior result cleared)
//! ```
//!
//! At most one Analyzer call is in flight per controller. A second `submit`
//! (or an input change) while one is outstanding is rejected, never queued.

pub mod cancellation;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analyzer::Analyzer;
use crate::errors::{ControllerError, SubmitError, ValidationError};
use crate::models::{AnalysisRequest, AnalysisResult, ResumeFile};
use crate::projection::{ResultsProjector, ViewModel};

pub use cancellation::{CancellationSource, CancellationToken};

/// Identity of one submission attempt, used to correlate log lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
}

impl Attempt {
    fn start() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }
}

/// Exactly one of these is active at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState {
    Idle,
    Validating,
    Submitting(Attempt),
    Success(Box<ViewModel>),
    Failed(SubmitError),
}

impl RequestState {
    pub fn name(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Validating => "validating",
            RequestState::Submitting(_) => "submitting",
            RequestState::Success(_) => "success",
            RequestState::Failed(_) => "failed",
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, RequestState::Submitting(_))
    }

    pub fn view_model(&self) -> Option<&ViewModel> {
        match self {
            RequestState::Success(view) => Some(view),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SubmitError> {
        match self {
            RequestState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

struct Inner {
    file: Option<ResumeFile>,
    job_description: String,
    state: RequestState,
}

pub struct RequestController {
    analyzer: Arc<dyn Analyzer>,
    projector: ResultsProjector,
    deadline: Duration,
    inner: Mutex<Inner>,
}

impl RequestController {
    /// `deadline` bounds a single Analyzer call; a hung call fails as `TimedOut`.
    pub fn new(analyzer: Arc<dyn Analyzer>, projector: ResultsProjector, deadline: Duration) -> Self {
        Self {
            analyzer,
            projector,
            deadline,
            inner: Mutex::new(Inner {
                file: None,
                job_description: String::new(),
                state: RequestState::Idle,
            }),
        }
    }

    // The lock is never held across an await, so a poisoned guard only means a
    // panicking test thread; the data itself is still consistent.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_file(&self, file: Option<ResumeFile>) -> Result<(), ControllerError> {
        let mut inner = self.lock();
        if inner.state.is_in_flight() {
            return Err(ControllerError::SubmissionInFlight);
        }
        inner.file = file;
        Ok(())
    }

    pub fn set_job_description(&self, text: impl Into<String>) -> Result<(), ControllerError> {
        let mut inner = self.lock();
        if inner.state.is_in_flight() {
            return Err(ControllerError::SubmissionInFlight);
        }
        inner.job_description = text.into();
        Ok(())
    }

    pub fn state(&self) -> RequestState {
        self.lock().state.clone()
    }

    /// False while a call is in flight or while either input is missing.
    pub fn can_submit(&self) -> bool {
        let inner = self.lock();
        !inner.state.is_in_flight()
            && inner.file.is_some()
            && !inner.job_description.trim().is_empty()
    }

    /// Runs one submission attempt to completion and returns the resulting state.
    ///
    /// Returns `Err` only when the attempt was refused because another one is
    /// outstanding; every other outcome is reported through the returned state.
    pub async fn submit(
        &self,
        cancel: &CancellationToken,
    ) -> Result<RequestState, ControllerError> {
        let (attempt, request) = match self.begin()? {
            Ok(started) => started,
            Err(failed) => return Ok(failed),
        };
        let guard = InFlightGuard::new(self, attempt.id);

        let outcome = self.call_analyzer(&attempt, &request, cancel).await;

        let next = match outcome {
            Ok(result) => {
                let view = self.projector.project(&result);
                info!(
                    attempt = %attempt.id,
                    label = view.overall.label,
                    "Analysis succeeded"
                );
                RequestState::Success(Box::new(view))
            }
            Err(err) => {
                warn!(
                    attempt = %attempt.id,
                    code = err.code(),
                    error = %err,
                    "Analysis failed"
                );
                RequestState::Failed(err)
            }
        };

        Ok(self.transition(next, guard))
    }

    /// Clears the previous outcome, validates, and either fails immediately or
    /// moves to `Submitting` with the request to send.
    fn begin(&self) -> Result<Result<(Attempt, AnalysisRequest), RequestState>, ControllerError> {
        let mut inner = self.lock();
        if inner.state.is_in_flight() {
            debug!("Rejected submit while a request is in flight");
            return Err(ControllerError::SubmissionInFlight);
        }

        inner.state = RequestState::Validating;
        debug!("State -> validating");

        let request = match validate(inner.file.as_ref(), &inner.job_description) {
            Ok(request) => request,
            Err(err) => {
                info!(error = %err, "Submission failed validation");
                inner.state = RequestState::Failed(SubmitError::Validation(err));
                return Ok(Err(inner.state.clone()));
            }
        };

        let attempt = Attempt::start();
        info!(
            attempt = %attempt.id,
            started_at = %attempt.started_at,
            file_name = %request.resume.file_name,
            "State -> submitting"
        );
        inner.state = RequestState::Submitting(attempt.clone());
        Ok(Ok((attempt, request)))
    }

    async fn call_analyzer(
        &self,
        attempt: &Attempt,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
    ) -> Result<AnalysisResult, SubmitError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(attempt = %attempt.id, "Analyzer call cancelled");
                Err(SubmitError::Cancelled)
            }
            result = tokio::time::timeout(self.deadline, self.analyzer.analyze(request)) => {
                match result {
                    Ok(Ok(result)) => Ok(result),
                    Ok(Err(err)) => Err(SubmitError::from(err)),
                    Err(_) => Err(SubmitError::TimedOut {
                        after_secs: self.deadline.as_secs(),
                    }),
                }
            }
        }
    }

    fn transition(&self, next: RequestState, guard: InFlightGuard<'_>) -> RequestState {
        guard.disarm();
        let mut inner = self.lock();
        debug!(from = inner.state.name(), to = next.name(), "State transition");
        inner.state = next;
        inner.state.clone()
    }
}

/// Leaves `Submitting` as `Failed(Cancelled)` when `submit` is dropped
/// mid-call, so an abandoned attempt never blocks the next one.
struct InFlightGuard<'a> {
    controller: &'a RequestController,
    attempt_id: Uuid,
    armed: bool,
}

impl<'a> InFlightGuard<'a> {
    fn new(controller: &'a RequestController, attempt_id: Uuid) -> Self {
        Self {
            controller,
            attempt_id,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.controller.lock();
        if matches!(&inner.state, RequestState::Submitting(a) if a.id == self.attempt_id) {
            warn!(attempt = %self.attempt_id, "Submission dropped mid-call");
            inner.state = RequestState::Failed(SubmitError::Cancelled);
        }
    }
}

/// Fails closed: a missing file, a non-PDF or empty file, or a blank job
/// description never reaches the Analyzer.
fn validate(
    file: Option<&ResumeFile>,
    job_description: &str,
) -> Result<AnalysisRequest, ValidationError> {
    let file = file.ok_or(ValidationError::MissingFile)?;

    if job_description.trim().is_empty() {
        return Err(ValidationError::EmptyJobDescription);
    }
    if !file.is_pdf() {
        return Err(ValidationError::UnsupportedFileType {
            file_name: file.file_name.clone(),
        });
    }
    if file.is_empty() {
        return Err(ValidationError::EmptyFile {
            file_name: file.file_name.clone(),
        });
    }

    Ok(AnalysisRequest {
        resume: file.clone(),
        job_description: job_description.to_string(),
    })
}
