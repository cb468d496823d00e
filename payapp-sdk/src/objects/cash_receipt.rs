//! Cash receipt issuance.

use super::{Command, FromResponse, ResponseRecord};
use crate::error::PayAppError;
use crate::form::FormRecord;

/// Purpose code (`tr_code`) of a cash receipt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CashReceiptPurpose {
    /// Income deduction for individuals.
    #[default]
    IncomeDeduction,
    /// Expense proof for businesses.
    ExpenseProof,
}

impl CashReceiptPurpose {
    fn code(self) -> u8 {
        match self {
            CashReceiptPurpose::IncomeDeduction => 0,
            CashReceiptPurpose::ExpenseProof => 1,
        }
    }
}

/// `cmd=cashStRegist`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueCashReceipt {
    pub good_name: String,
    pub buyer_name: String,
    /// Phone number, card number, or business registration number.
    pub id_info: String,
    pub purpose: CashReceiptPurpose,
    pub amount_total: u64,
    pub amount_supply: u64,
    pub amount_service: u64,
    pub amount_tax: u64,
    /// Transaction time, `YYYYMMDDhhmmss`; defaults to now on the provider.
    pub trade_time: Option<String>,
}

impl Command for IssueCashReceipt {
    const CMD: &'static str = "cashStRegist";
    type Response = CashReceipt;

    fn into_form(self) -> FormRecord {
        FormRecord::new()
            .with("good_name", self.good_name)
            .with("buyr_name", self.buyer_name)
            .with("id_info", self.id_info)
            .with("tr_code", self.purpose.code())
            .with("amt_tot", self.amount_total)
            .with("amt_sup", self.amount_supply)
            .with("amt_svc", self.amount_service)
            .with("amt_tax", self.amount_tax)
            .with_opt("trad_time", self.trade_time)
    }
}

/// Successful `cashStRegist` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashReceipt {
    pub cashstno: String,
    pub receipt_url: Option<String>,
    pub approved_at: Option<String>,
}

impl FromResponse for CashReceipt {
    fn from_response(record: ResponseRecord) -> Result<Self, PayAppError> {
        Ok(Self {
            cashstno: record.require("cashstno")?.to_owned(),
            receipt_url: record.get("cashsturl").map(str::to_owned),
            approved_at: record.get("appr_time").map(str::to_owned),
        })
    }
}

/// `cmd=cashStCancel`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CancelCashReceipt {
    pub cashstno: String,
}

impl Command for CancelCashReceipt {
    const CMD: &'static str = "cashStCancel";
    type Response = ResponseRecord;

    fn into_form(self) -> FormRecord {
        FormRecord::new().with("cashstno", self.cashstno)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_form_uses_purpose_code() {
        let form = IssueCashReceipt {
            good_name: "Book".to_owned(),
            buyer_name: "Kim".to_owned(),
            id_info: "01012345678".to_owned(),
            purpose: CashReceiptPurpose::ExpenseProof,
            amount_total: 11000,
            amount_supply: 10000,
            amount_service: 0,
            amount_tax: 1000,
            trade_time: None,
        }
        .into_form();

        assert_eq!(form.get("tr_code"), Some("1"));
        assert_eq!(form.get("amt_tot"), Some("11000"));
        assert!(!form.contains_key("trad_time"));
    }

    #[test]
    fn test_receipt_requires_number() {
        let record = ResponseRecord::parse("state=1&cashsturl=x").unwrap();
        assert!(CashReceipt::from_response(record).is_err());
    }
}
