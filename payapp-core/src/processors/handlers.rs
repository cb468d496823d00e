//! User-supplied callbacks for classified feedback events.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use payapp_sdk::PayAppError;
use payapp_sdk::codes::FeedbackEvent;
use payapp_sdk::objects::Feedback;

/// Boxed future returned by an event handler.
pub type HandlerFuture = BoxFuture<'static, anyhow::Result<()>>;

type EventHandler = Arc<dyn Fn(Feedback) -> HandlerFuture + Send + Sync>;
type ErrorHandler = Arc<dyn Fn(PayAppError, Option<Feedback>) -> BoxFuture<'static, ()> + Send + Sync>;

/// One optional handler per event category plus an error callback.
///
/// At most one handler runs per delivery. There is no slot for
/// [`FeedbackEvent::Unknown`]: unrecognised states are logged and skipped.
#[derive(Clone, Default)]
pub struct FeedbackHandlers {
    on_requested: Option<EventHandler>,
    on_completed: Option<EventHandler>,
    on_cancelled: Option<EventHandler>,
    on_waiting: Option<EventHandler>,
    on_error: Option<ErrorHandler>,
}

fn boxed<F, Fut>(f: F) -> EventHandler
where
    F: Fn(Feedback) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |feedback: Feedback| Box::pin(f(feedback)) as HandlerFuture)
}

impl FeedbackHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// `pay_state` 1.
    pub fn on_requested<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Feedback) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_requested = Some(boxed(f));
        self
    }

    /// `pay_state` 4.
    pub fn on_completed<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Feedback) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_completed = Some(boxed(f));
        self
    }

    /// `pay_state` 8, 9, 32, 64, 70, 71.
    pub fn on_cancelled<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Feedback) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_cancelled = Some(boxed(f));
        self
    }

    /// `pay_state` 10.
    pub fn on_waiting<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Feedback) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_waiting = Some(boxed(f));
        self
    }

    /// Called with every error the processor contains. The feedback is
    /// `None` when the body could not be parsed.
    pub fn on_error<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(PayAppError, Option<Feedback>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_error = Some(Arc::new(move |err: PayAppError, feedback: Option<Feedback>| {
            Box::pin(f(err, feedback)) as BoxFuture<'static, ()>
        }));
        self
    }

    pub fn is_registered(&self, event: FeedbackEvent) -> bool {
        self.handler_for(event).is_some()
    }

    pub(crate) fn handler_for(&self, event: FeedbackEvent) -> Option<&EventHandler> {
        match event {
            FeedbackEvent::Requested => self.on_requested.as_ref(),
            FeedbackEvent::Completed => self.on_completed.as_ref(),
            FeedbackEvent::Cancelled => self.on_cancelled.as_ref(),
            FeedbackEvent::Waiting => self.on_waiting.as_ref(),
            FeedbackEvent::Unknown => None,
        }
    }

    pub(crate) async fn report_error(&self, err: PayAppError, feedback: Option<Feedback>) {
        if let Some(on_error) = &self.on_error {
            on_error(err, feedback).await;
        }
    }
}

impl std::fmt::Debug for FeedbackHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackHandlers")
            .field("on_requested", &self.on_requested.is_some())
            .field("on_completed", &self.on_completed.is_some())
            .field("on_cancelled", &self.on_cancelled.is_some())
            .field("on_waiting", &self.on_waiting.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
