//! HTTP handlers.
//!
//! # Endpoints
//!
//! - `POST <webhook_path>` – PayApp feedback callback, answers `SUCCESS` or `ERROR`

pub mod extractors;
pub mod feedback;
