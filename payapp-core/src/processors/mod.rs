//! Processors for inbound PayApp traffic.
//!
//! - `FeedbackProcessor`: validates, deduplicates, classifies, and
//!   dispatches feedback deliveries to `FeedbackHandlers`.

pub mod feedback;
pub mod handlers;

pub use feedback::{FeedbackOutcome, FeedbackProcessor};
pub use handlers::{FeedbackHandlers, HandlerFuture};
