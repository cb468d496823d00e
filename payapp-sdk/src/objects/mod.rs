//! Request and response types for the PayApp REST API.
//!
//! Every operation is a [`Command`]: a typed parameter struct with a fixed
//! `cmd` tag that flattens into a [`FormRecord`]. Responses are validated
//! through [`ResponseRecord::from_record`] before any typed field is read,
//! so a body without a recognisable `state` flag is reported as
//! [`PayAppError::MalformedResponse`] instead of being trusted.

pub mod bill;
pub mod cash_receipt;
pub mod feedback;
pub mod payment;
pub mod rebill;

pub use bill::{BillPayment, BillRegistration, DeleteBill, PayWithBill, RegisterBill};
pub use cash_receipt::{CancelCashReceipt, CashReceipt, CashReceiptPurpose, IssueCashReceipt};
pub use feedback::{DedupKey, Feedback};
pub use payment::{CancelPayment, PaymentRequest, PaymentRequestResponse, RequestCancelPayment};
pub use rebill::{
    CancelRebill, RebillCycle, RebillRegistration, RegisterRebill, StartRebill, StopRebill,
};

use crate::error::{PROVIDER_ERROR_CODE, PayAppError};
use crate::form::{self, FormRecord};

/// Response field carrying the success flag.
pub const STATE_FIELD: &str = "state";
const STATE_SUCCESS: &str = "1";
const STATE_FAILURE: &str = "0";

/// A PayApp API operation.
pub trait Command {
    /// Value of the `cmd` form field.
    const CMD: &'static str;

    /// Typed view of a successful response.
    type Response: FromResponse;

    /// Flatten the command's own fields. `cmd` and credentials are added
    /// by the client.
    fn into_form(self) -> FormRecord;
}

/// Conversion from a validated success record.
pub trait FromResponse: Sized {
    fn from_response(record: ResponseRecord) -> Result<Self, PayAppError>;
}

/// A response record whose `state` flag has been checked and is `"1"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRecord {
    record: FormRecord,
}

impl ResponseRecord {
    /// Decode a raw response body and validate it.
    pub fn parse(body: &str) -> Result<Self, PayAppError> {
        Self::from_record(form::decode(body))
    }

    /// Validate a decoded record.
    ///
    /// `state=0` becomes [`PayAppError::Provider`] with the provider's
    /// `errno` (or [`PROVIDER_ERROR_CODE`]) and `errorMessage`. Any other
    /// value, or no `state` at all, is a malformed response.
    pub fn from_record(record: FormRecord) -> Result<Self, PayAppError> {
        match record.get(STATE_FIELD) {
            Some(STATE_SUCCESS) => Ok(Self { record }),
            Some(STATE_FAILURE) => {
                let code = record
                    .get_non_empty("errno")
                    .unwrap_or(PROVIDER_ERROR_CODE)
                    .to_owned();
                let message = record
                    .get_non_empty("errorMessage")
                    .unwrap_or("request failed")
                    .to_owned();
                Err(PayAppError::Provider { code, message })
            }
            Some(other) => Err(PayAppError::MalformedResponse(format!(
                "unexpected state value {other:?}"
            ))),
            None => Err(PayAppError::MalformedResponse(
                "missing state field".to_owned(),
            )),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.record.get_non_empty(key)
    }

    /// Read a field the typed response cannot do without.
    pub fn require(&self, key: &str) -> Result<&str, PayAppError> {
        self.get(key)
            .ok_or_else(|| PayAppError::MalformedResponse(format!("missing field {key}")))
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn into_record(self) -> FormRecord {
        self.record
    }
}

/// Commands that return nothing beyond success expose the raw record.
impl FromResponse for ResponseRecord {
    fn from_response(record: ResponseRecord) -> Result<Self, PayAppError> {
        Ok(record)
    }
}

/// `y`/`n` flags used by several commands.
pub(crate) fn yes_no(flag: bool) -> &'static str {
    if flag { "y" } else { "n" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_record() {
        let record = ResponseRecord::parse("state=1&mul_no=12345&payurl=https%3A%2F%2Fpayapp.kr%2FL%2Fx").unwrap();
        assert_eq!(record.require("mul_no").unwrap(), "12345");
        assert_eq!(record.get("qrurl"), None);
    }

    #[test]
    fn test_failure_record_maps_to_provider_error() {
        let err = ResponseRecord::parse("state=0&errorMessage=%EC%9E%98%EB%AA%BB%EB%90%9C+%EC%9A%94%EC%B2%AD&errno=70010")
            .unwrap_err();
        assert_eq!(err, PayAppError::provider("70010", "잘못된 요청"));

        let err = ResponseRecord::parse("state=0").unwrap_err();
        assert_eq!(err, PayAppError::provider(PROVIDER_ERROR_CODE, "request failed"));
    }

    #[test]
    fn test_unrecognised_state_is_malformed() {
        assert!(matches!(
            ResponseRecord::parse("<html>oops</html>"),
            Err(PayAppError::MalformedResponse(_))
        ));
        assert!(matches!(
            ResponseRecord::parse("state=2"),
            Err(PayAppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_require_reports_missing_field() {
        let record = ResponseRecord::parse("state=1&encBill=").unwrap();
        assert_eq!(
            record.require("encBill"),
            Err(PayAppError::MalformedResponse("missing field encBill".to_owned()))
        );
    }
}
