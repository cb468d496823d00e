//! Configuration types shared by the client and the feedback processor.
//!
//! Loading is the host's concern; the server crate reads these from a TOML
//! file and environment overrides.

mod credentials;

pub use credentials::Credentials;

/// PayApp REST endpoint used by [`crate::client::PayAppClient`] by default.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.payapp.kr/oapi/apiLoad.html";

/// Hosted browser script loaded by [`crate::browser::BrowserSdk`].
pub const DEFAULT_SCRIPT_URL: &str = "https://lite.payapp.kr/public/api/v2/payapp-lite.js";
