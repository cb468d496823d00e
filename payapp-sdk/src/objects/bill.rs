//! Stored card ("bill") registration and charging.
//!
//! Registering a card returns an encrypted token (`encBill`) that later
//! charges reference instead of the card details.

use super::{Command, FromResponse, ResponseRecord, yes_no};
use crate::error::PayAppError;
use crate::form::FormRecord;

/// `cmd=billRegist`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegisterBill {
    pub card_no: String,
    /// Two digits, `01`-`12`.
    pub exp_month: String,
    /// Two digits.
    pub exp_year: String,
    /// Birth date (`YYMMDD`) or business registration number.
    pub buyer_auth_no: String,
    /// First two digits of the card password.
    pub card_pw: String,
    pub buyer_phone: String,
    pub buyer_name: String,
}

impl std::fmt::Debug for RegisterBill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterBill")
            .field("card_no", &"<redacted>")
            .field("buyer_phone", &self.buyer_phone)
            .field("buyer_name", &self.buyer_name)
            .finish_non_exhaustive()
    }
}

impl Command for RegisterBill {
    const CMD: &'static str = "billRegist";
    type Response = BillRegistration;

    fn into_form(self) -> FormRecord {
        FormRecord::new()
            .with("cardNo", self.card_no)
            .with("expMonth", self.exp_month)
            .with("expYear", self.exp_year)
            .with("buyerAuthNo", self.buyer_auth_no)
            .with("cardPw", self.card_pw)
            .with("buyerPhone", self.buyer_phone)
            .with("buyerName", self.buyer_name)
    }
}

/// Successful `billRegist` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillRegistration {
    pub enc_bill: String,
    pub bill_auth_no: Option<String>,
    /// Masked card number.
    pub card_no: Option<String>,
    pub card_name: Option<String>,
}

impl FromResponse for BillRegistration {
    fn from_response(record: ResponseRecord) -> Result<Self, PayAppError> {
        Ok(Self {
            enc_bill: record.require("encBill")?.to_owned(),
            bill_auth_no: record.get("billAuthNo").map(str::to_owned),
            card_no: record.get("cardno").map(str::to_owned),
            card_name: record.get("cardname").map(str::to_owned),
        })
    }
}

/// `cmd=billDelete`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteBill {
    pub enc_bill: String,
}

impl Command for DeleteBill {
    const CMD: &'static str = "billDelete";
    type Response = ResponseRecord;

    fn into_form(self) -> FormRecord {
        FormRecord::new().with("encBill", self.enc_bill)
    }
}

/// `cmd=billPay`: charge a registered card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayWithBill {
    pub enc_bill: String,
    pub goodname: String,
    pub price: u64,
    pub recvphone: String,
    pub memo: Option<String>,
    pub feedback_url: Option<String>,
    pub var1: Option<String>,
    pub var2: Option<String>,
    pub sms: Option<bool>,
    /// Installment months; `None` or `0` for lump sum.
    pub installment: Option<u8>,
}

impl PayWithBill {
    pub fn new(
        enc_bill: impl Into<String>,
        goodname: impl Into<String>,
        price: u64,
        recvphone: impl Into<String>,
    ) -> Self {
        Self {
            enc_bill: enc_bill.into(),
            goodname: goodname.into(),
            price,
            recvphone: recvphone.into(),
            ..Default::default()
        }
    }
}

impl Command for PayWithBill {
    const CMD: &'static str = "billPay";
    type Response = BillPayment;

    fn into_form(self) -> FormRecord {
        FormRecord::new()
            .with("encBill", self.enc_bill)
            .with("goodname", self.goodname)
            .with("price", self.price)
            .with("recvphone", self.recvphone)
            .with_opt("memo", self.memo)
            .with_opt("feedbackurl", self.feedback_url)
            .with_opt("var1", self.var1)
            .with_opt("var2", self.var2)
            .with_opt("smsuse", self.sms.map(yes_no))
            .with_opt("cardinst", self.installment)
    }
}

/// Successful `billPay` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillPayment {
    pub mul_no: String,
    pub payurl: Option<String>,
    pub pay_date: Option<String>,
}

impl FromResponse for BillPayment {
    fn from_response(record: ResponseRecord) -> Result<Self, PayAppError> {
        Ok(Self {
            mul_no: record.require("mul_no")?.to_owned(),
            payurl: record.get("payurl").map(str::to_owned),
            pay_date: record.get("pay_date").map(str::to_owned),
        })
    }
}
