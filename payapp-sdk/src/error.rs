//! Error taxonomy shared by every PayApp integration surface.

/// Code used when a failure carries no provider-assigned code.
pub const UNKNOWN_CODE: &str = "UNKNOWN";

/// Code used when the provider reports `state=0` without an `errno`.
pub const PROVIDER_ERROR_CODE: &str = "PROVIDER_ERROR";

/// Errors produced by the PayApp client, webhook verification, and the
/// browser SDK bindings.
///
/// The type is `Clone` so that action handles can publish the last error
/// through a watch channel while still returning it to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayAppError {
    /// The transport failed or the provider reported a failure state.
    #[error("provider error [{code}]: {message}")]
    Provider { code: String, message: String },

    /// An inbound feedback did not carry the expected credentials or was
    /// missing required fields.
    #[error("validation error: {0}")]
    Validation(String),

    /// The browser SDK global was used before the hosted script loaded.
    #[error("PayApp SDK is not loaded; call load() and wait for the script first")]
    SdkNotLoaded,

    /// A response could not be interpreted as a success or failure record.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Catch-all wrapper for failures without structured information.
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl PayAppError {
    /// Build a [`PayAppError::Provider`] from its parts.
    pub fn provider(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The provider error code, if this is a [`PayAppError::Provider`].
    pub fn code(&self) -> Option<&str> {
        match self {
            PayAppError::Provider { code, .. } => Some(code),
            _ => None,
        }
    }
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for PayAppError {
    fn from(err: reqwest::Error) -> Self {
        Self::provider(UNKNOWN_CODE, err.to_string())
    }
}
