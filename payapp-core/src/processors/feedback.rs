//! FeedbackProcessor.
//!
//! The FeedbackProcessor is responsible for:
//! - Checking the credentials embedded in a feedback delivery
//! - Skipping deliveries whose dedup key was already recorded
//! - Classifying `pay_state` into a [`FeedbackEvent`]
//! - Awaiting the single handler registered for that event
//! - Recording the dedup key once the handler has succeeded
//!
//! Nothing escapes: every failure is handed to the `on_error` callback and
//! turned into [`FeedbackOutcome::Error`]. The HTTP layer answers 200 either
//! way because PayApp redelivers on any other status.
//!
//! The duplicate check and the final insert are separate store calls, so two
//! concurrent deliveries of the same event can both be dispatched.

use std::convert::Infallible;

use kanau::processor::Processor;
use payapp_sdk::codes::FeedbackEvent;
use payapp_sdk::objects::Feedback;
use payapp_sdk::{Credentials, FormRecord, PayAppError};
use tracing::{debug, info, warn};

use super::handlers::FeedbackHandlers;
use crate::dedup::{DedupStore, MemoryDedupStore};

/// The plaintext answer PayApp expects from the feedback endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackOutcome {
    Success,
    Error,
}

impl FeedbackOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackOutcome::Success => "SUCCESS",
            FeedbackOutcome::Error => "ERROR",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FeedbackOutcome::Success)
    }
}

impl std::fmt::Display for FeedbackOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to a delivery that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Dispatched(FeedbackEvent),
    Skipped(FeedbackEvent),
    Duplicate,
}

/// Validates and dispatches feedback deliveries.
pub struct FeedbackProcessor<S = MemoryDedupStore> {
    credentials: Credentials,
    store: S,
    handlers: FeedbackHandlers,
}

impl FeedbackProcessor<MemoryDedupStore> {
    /// Processor backed by an in-memory dedup store.
    pub fn in_memory(credentials: Credentials) -> Self {
        Self::new(credentials, MemoryDedupStore::new())
    }
}

impl<S: DedupStore> FeedbackProcessor<S> {
    pub fn new(credentials: Credentials, store: S) -> Self {
        Self {
            credentials,
            store,
            handlers: FeedbackHandlers::default(),
        }
    }

    /// Handlers used by the [`Processor`] implementations.
    pub fn with_handlers(mut self, handlers: FeedbackHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn handlers(&self) -> &FeedbackHandlers {
        &self.handlers
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Process one delivery with an explicit handler set.
    pub async fn process_with(
        &self,
        feedback: Feedback,
        handlers: &FeedbackHandlers,
    ) -> FeedbackOutcome {
        match self.dispatch(&feedback, handlers).await {
            Ok(disposition) => {
                debug!(mul_no = %feedback.mul_no, ?disposition, "Feedback processed");
                FeedbackOutcome::Success
            }
            Err(err) => {
                warn!(
                    mul_no = %feedback.mul_no,
                    pay_state = feedback.pay_state,
                    error = %err,
                    "Feedback processing failed"
                );
                handlers.report_error(err, Some(feedback)).await;
                FeedbackOutcome::Error
            }
        }
    }

    /// Parse a decoded form body, then process it. A body that does not
    /// parse is reported like any other validation failure.
    pub async fn process_record(
        &self,
        record: FormRecord,
        handlers: &FeedbackHandlers,
    ) -> FeedbackOutcome {
        match Feedback::from_record(record) {
            Ok(feedback) => self.process_with(feedback, handlers).await,
            Err(err) => {
                warn!(error = %err, "Rejected unparseable feedback");
                handlers.report_error(err, None).await;
                FeedbackOutcome::Error
            }
        }
    }

    /// Report a delivery that never reached parsing, such as an unreadable
    /// body, through the stored `on_error` handler.
    pub async fn reject(&self, err: PayAppError) -> FeedbackOutcome {
        warn!(error = %err, "Rejected feedback delivery");
        self.handlers.report_error(err, None).await;
        FeedbackOutcome::Error
    }

    async fn dispatch(
        &self,
        feedback: &Feedback,
        handlers: &FeedbackHandlers,
    ) -> Result<Disposition, PayAppError> {
        if !self
            .credentials
            .matches(&feedback.userid, &feedback.linkkey, &feedback.linkval)
        {
            return Err(PayAppError::Validation(format!(
                "credential mismatch for mul_no {}",
                feedback.mul_no
            )));
        }

        let key = feedback.dedup_key();
        if self.store.contains(&key).await.map_err(store_error)? {
            info!(mul_no = %feedback.mul_no, pay_state = feedback.pay_state, "Duplicate feedback skipped");
            return Ok(Disposition::Duplicate);
        }

        let event = feedback.event();
        let disposition = match handlers.handler_for(event) {
            Some(handler) => {
                handler(feedback.clone()).await.map_err(|e| {
                    PayAppError::Unknown(format!("{event} handler failed: {e:#}"))
                })?;
                Disposition::Dispatched(event)
            }
            None if event == FeedbackEvent::Unknown => {
                warn!(
                    mul_no = %feedback.mul_no,
                    pay_state = feedback.pay_state,
                    "Unrecognised pay_state, no handler dispatched"
                );
                Disposition::Skipped(event)
            }
            None => {
                debug!(mul_no = %feedback.mul_no, %event, "No handler registered");
                Disposition::Skipped(event)
            }
        };

        self.store.insert(key).await.map_err(store_error)?;
        Ok(disposition)
    }
}

fn store_error(err: anyhow::Error) -> PayAppError {
    PayAppError::Unknown(format!("dedup store failure: {err:#}"))
}

impl<S: DedupStore> Processor<Feedback> for FeedbackProcessor<S> {
    type Output = FeedbackOutcome;
    type Error = Infallible;

    async fn process(&self, feedback: Feedback) -> Result<FeedbackOutcome, Infallible> {
        Ok(self.process_with(feedback, &self.handlers).await)
    }
}

impl<S: DedupStore> Processor<FormRecord> for FeedbackProcessor<S> {
    type Output = FeedbackOutcome;
    type Error = Infallible;

    async fn process(&self, record: FormRecord) -> Result<FeedbackOutcome, Infallible> {
        Ok(self.process_record(record, &self.handlers).await)
    }
}
