//! Payment log records produced from feedback deliveries.
//!
//! The default server wires [`log_handlers`] so that every classified event
//! ends up as one structured [`PaymentLog`] entry. Applications that keep
//! their own ledger implement [`PaymentLogWriter`] instead of [`TracingLogWriter`].

use std::sync::Arc;

use async_trait::async_trait;
use payapp_sdk::codes::FeedbackEvent;
use payapp_sdk::objects::Feedback;
use serde::Serialize;

use crate::processors::FeedbackHandlers;

/// A single payment event as recorded by the host.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentLog {
    pub mul_no: String,
    pub event: FeedbackEvent,
    pub pay_state: i64,
    pub price: String,
    pub feedback: Feedback,
    /// Unix seconds at which the entry was created.
    pub timestamp: i64,
}

impl PaymentLog {
    pub fn from_feedback(event: FeedbackEvent, feedback: Feedback) -> Self {
        Self {
            mul_no: feedback.mul_no.clone(),
            event,
            pay_state: feedback.pay_state,
            price: feedback.price.clone(),
            feedback,
            timestamp: time::OffsetDateTime::now_utc().unix_timestamp(),
        }
    }
}

#[async_trait]
pub trait PaymentLogWriter: Send + Sync {
    async fn write(&self, entry: PaymentLog) -> anyhow::Result<()>;
}

/// Writes payment logs as `tracing` events on the `payapp::payment` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogWriter;

#[async_trait]
impl PaymentLogWriter for TracingLogWriter {
    async fn write(&self, entry: PaymentLog) -> anyhow::Result<()> {
        let feedback = serde_json::to_string(&entry.feedback)?;
        tracing::info!(
            target: "payapp::payment",
            mul_no = %entry.mul_no,
            event = %entry.event,
            pay_state = entry.pay_state,
            state_label = entry.feedback.pay_state_label(),
            price = %entry.price,
            timestamp = entry.timestamp,
            feedback = %feedback,
            "Payment event recorded"
        );
        Ok(())
    }
}

/// Handlers that forward every recognised event to `writer`.
///
/// A failing write fails the delivery, so PayApp retries it later.
pub fn log_handlers(writer: Arc<dyn PaymentLogWriter>) -> FeedbackHandlers {
    let on = |event: FeedbackEvent| {
        let writer = Arc::clone(&writer);
        move |feedback: Feedback| {
            let writer = Arc::clone(&writer);
            async move { writer.write(PaymentLog::from_feedback(event, feedback)).await }
        }
    };

    FeedbackHandlers::new()
        .on_requested(on(FeedbackEvent::Requested))
        .on_completed(on(FeedbackEvent::Completed))
        .on_cancelled(on(FeedbackEvent::Cancelled))
        .on_waiting(on(FeedbackEvent::Waiting))
        .on_error(|err, feedback| async move {
            match feedback {
                Some(feedback) => tracing::warn!(
                    mul_no = %feedback.mul_no,
                    pay_state = feedback.pay_state,
                    error = %err,
                    "Feedback rejected"
                ),
                None => tracing::warn!(error = %err, "Feedback rejected before parsing"),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::{FeedbackOutcome, FeedbackProcessor};
    use payapp_sdk::Credentials;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingWriter {
        entries: Mutex<Vec<PaymentLog>>,
    }

    #[async_trait]
    impl PaymentLogWriter for RecordingWriter {
        async fn write(&self, entry: PaymentLog) -> anyhow::Result<()> {
            self.entries.lock().await.push(entry);
            Ok(())
        }
    }

    struct BrokenWriter;

    #[async_trait]
    impl PaymentLogWriter for BrokenWriter {
        async fn write(&self, _entry: PaymentLog) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    fn body(pay_state: i64) -> String {
        format!(
            "userid=shop&linkkey=key&linkval=val&mul_no=777&pay_state={pay_state}&price=15000&var1=order-9"
        )
    }

    #[tokio::test]
    async fn test_events_become_log_entries() {
        let writer = Arc::new(RecordingWriter::default());
        let processor = FeedbackProcessor::in_memory(Credentials::new("shop", "key", "val"));
        let handlers = log_handlers(writer.clone());

        for state in [1, 4, 9] {
            let feedback = Feedback::parse(&body(state)).unwrap();
            assert_eq!(
                processor.process_with(feedback, &handlers).await,
                FeedbackOutcome::Success
            );
        }

        let entries = writer.entries.lock().await;
        let events: Vec<_> = entries.iter().map(|e| e.event).collect();
        assert_eq!(
            events,
            vec![
                FeedbackEvent::Requested,
                FeedbackEvent::Completed,
                FeedbackEvent::Cancelled
            ]
        );
        assert!(entries.iter().all(|e| e.mul_no == "777" && e.price == "15000"));
        assert!(entries[0].timestamp > 0);
    }

    #[tokio::test]
    async fn test_write_failure_fails_delivery() {
        let processor = FeedbackProcessor::in_memory(Credentials::new("shop", "key", "val"));
        let handlers = log_handlers(Arc::new(BrokenWriter));

        let feedback = Feedback::parse(&body(4)).unwrap();
        assert_eq!(
            processor.process_with(feedback, &handlers).await,
            FeedbackOutcome::Error
        );
        assert!(processor.store().is_empty().await);
    }

    #[tokio::test]
    async fn test_tracing_writer_accepts_entries() {
        let feedback = Feedback::parse(&body(4)).unwrap();
        let entry = PaymentLog::from_feedback(FeedbackEvent::Completed, feedback);
        TracingLogWriter.write(entry).await.unwrap();
    }

    #[test]
    fn test_log_serialization_hides_secrets() {
        let feedback = Feedback::parse(&body(4)).unwrap();
        let entry = PaymentLog::from_feedback(FeedbackEvent::Completed, feedback);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"], "completed");
        assert_eq!(json["mul_no"], "777");
        assert!(json["feedback"].get("linkkey").is_none());
        assert!(json["feedback"].get("linkval").is_none());
    }
}
