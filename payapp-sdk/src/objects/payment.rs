//! One-off payment requests and cancellations.

use super::{Command, FromResponse, ResponseRecord, yes_no};
use crate::error::PayAppError;
use crate::form::FormRecord;

/// `cmd=payrequest`: create a payment request and receive a payment URL.
///
/// The buyer is notified by SMS (unless `sms` is `false`) and completes the
/// payment on PayApp's hosted page. State changes arrive as feedback
/// callbacks at `feedback_url`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentRequest {
    pub goodname: String,
    pub price: u64,
    pub recvphone: String,
    pub memo: Option<String>,
    /// Ask the buyer for a delivery address.
    pub request_address: Option<bool>,
    pub feedback_url: Option<String>,
    pub return_url: Option<String>,
    /// Opaque correlation fields echoed back in feedback.
    pub var1: Option<String>,
    pub var2: Option<String>,
    pub sms: Option<bool>,
    /// Comma-separated list of payment types offered to the buyer.
    pub open_pay_type: Option<String>,
    pub check_retry: Option<bool>,
    pub amount_taxable: Option<u64>,
    pub amount_taxfree: Option<u64>,
    pub amount_vat: Option<u64>,
}

impl PaymentRequest {
    pub fn new(goodname: impl Into<String>, price: u64, recvphone: impl Into<String>) -> Self {
        Self {
            goodname: goodname.into(),
            price,
            recvphone: recvphone.into(),
            ..Default::default()
        }
    }
}

impl Command for PaymentRequest {
    const CMD: &'static str = "payrequest";
    type Response = PaymentRequestResponse;

    fn into_form(self) -> FormRecord {
        FormRecord::new()
            .with("goodname", self.goodname)
            .with("price", self.price)
            .with("recvphone", self.recvphone)
            .with_opt("memo", self.memo)
            .with_opt("reqaddr", self.request_address.map(u8::from))
            .with_opt("feedbackurl", self.feedback_url)
            .with_opt("returnurl", self.return_url)
            .with_opt("var1", self.var1)
            .with_opt("var2", self.var2)
            .with_opt("smsuse", self.sms.map(yes_no))
            .with_opt("openpaytype", self.open_pay_type)
            .with_opt("checkretry", self.check_retry.map(yes_no))
            .with_opt("amount_taxable", self.amount_taxable)
            .with_opt("amount_taxfree", self.amount_taxfree)
            .with_opt("amount_vat", self.amount_vat)
    }
}

/// Successful `payrequest` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequestResponse {
    pub mul_no: String,
    pub payurl: String,
    pub qrurl: Option<String>,
}

impl FromResponse for PaymentRequestResponse {
    fn from_response(record: ResponseRecord) -> Result<Self, PayAppError> {
        Ok(Self {
            mul_no: record.require("mul_no")?.to_owned(),
            payurl: record.require("payurl")?.to_owned(),
            qrurl: record.get("qrurl").map(str::to_owned),
        })
    }
}

/// `cmd=paycancel`: cancel a payment, fully or partially.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CancelPayment {
    pub mul_no: String,
    pub cancel_memo: String,
    /// Amount to cancel; `None` cancels the whole payment.
    pub partial_price: Option<u64>,
}

impl CancelPayment {
    pub fn new(mul_no: impl Into<String>, cancel_memo: impl Into<String>) -> Self {
        Self {
            mul_no: mul_no.into(),
            cancel_memo: cancel_memo.into(),
            partial_price: None,
        }
    }

    pub fn partial(mut self, price: u64) -> Self {
        self.partial_price = Some(price);
        self
    }
}

fn cancel_form(mul_no: String, cancel_memo: String, partial_price: Option<u64>) -> FormRecord {
    FormRecord::new()
        .with("mul_no", mul_no)
        .with("cancelmemo", cancel_memo)
        .with("partcancel", u8::from(partial_price.is_some()))
        .with_opt("cancelprice", partial_price)
}

impl Command for CancelPayment {
    const CMD: &'static str = "paycancel";
    type Response = ResponseRecord;

    fn into_form(self) -> FormRecord {
        cancel_form(self.mul_no, self.cancel_memo, self.partial_price)
    }
}

/// `cmd=paycancelreq`: request cancellation of a payment that can no
/// longer be cancelled directly (e.g. after settlement).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCancelPayment {
    pub mul_no: String,
    pub cancel_memo: String,
    pub partial_price: Option<u64>,
}

impl Command for RequestCancelPayment {
    const CMD: &'static str = "paycancelreq";
    type Response = ResponseRecord;

    fn into_form(self) -> FormRecord {
        cancel_form(self.mul_no, self.cancel_memo, self.partial_price)
    }
}
