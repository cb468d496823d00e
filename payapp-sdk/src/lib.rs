//! Typed building blocks for integrating with PayApp.
//!
//! - [`form`]: the URL-encoded form codec used on every wire exchange.
//! - [`objects`]: command parameters, typed responses, and the inbound
//!   feedback record.
//! - [`codes`]: lookup tables for provider state and payment-type codes.
//! - [`client`]: the HTTP client and stateful action handles (feature
//!   `client`).
//! - [`browser`]: the hosted browser SDK, expressed as injected
//!   capabilities.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod browser;
#[cfg(feature = "client")]
pub mod client;
pub mod codes;
pub mod config;
pub mod error;
pub mod form;
pub mod objects;

pub use config::Credentials;
pub use error::PayAppError;
pub use form::FormRecord;
