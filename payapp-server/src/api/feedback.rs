//! PayApp feedback callback.
//!
//! PayApp retries a delivery until it sees a 2xx answer, so every form
//! delivery is answered 200 and the processing outcome is reported in the
//! plaintext body instead. An unreadable body is answered `ERROR`.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use kanau::processor::Processor;

use crate::api::extractors::FormBody;
use crate::state::AppState;

/// Receive one feedback delivery.
pub async fn receive_feedback(
    State(state): State<AppState>,
    FormBody(body): FormBody,
) -> impl IntoResponse {
    let outcome = match body {
        Ok(record) => {
            let Ok(outcome) = state.processor.process(record).await;
            outcome
        }
        Err(err) => state.processor.reject(err).await,
    };
    (StatusCode::OK, outcome.as_str())
}
