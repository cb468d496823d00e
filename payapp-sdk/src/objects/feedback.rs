//! Inbound feedback (webhook) records.
//!
//! PayApp posts a form body to the merchant's `feedbackurl` on every
//! payment state transition, possibly more than once for the same
//! transition. The body embeds the merchant's `userid`, `linkkey`, and
//! `linkval`, which is the only authenticity signal the provider offers.

use serde::Serialize;

use crate::codes::{FeedbackEvent, pay_state_label, pay_type_label};
use crate::error::PayAppError;
use crate::form::{self, FormRecord};

/// Fields lifted into [`Feedback`]'s typed members; everything else stays
/// in [`Feedback::extra`].
const TYPED_FIELDS: &[&str] = &[
    "userid",
    "linkkey",
    "linkval",
    "mul_no",
    "pay_state",
    "pay_type",
    "price",
    "goodname",
    "recvphone",
    "var1",
    "var2",
    "pay_date",
    "reqdate",
    "csturl",
    "rebill_no",
    "card_name",
    "card_quota",
    "payauthcode",
    "vbank",
    "vbankno",
];

/// Card details included when the buyer paid by card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardDetails {
    pub card_name: Option<String>,
    pub quota: Option<String>,
    pub auth_code: Option<String>,
}

/// Virtual account details included for bank-deposit payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VirtualAccount {
    pub bank: Option<String>,
    pub account_no: Option<String>,
}

/// A parsed feedback delivery.
///
/// `linkkey` and `linkval` are kept for verification but never serialized
/// or printed.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub userid: String,
    #[serde(skip)]
    pub linkkey: String,
    #[serde(skip)]
    pub linkval: String,
    pub mul_no: String,
    pub pay_state: i64,
    pub pay_type: Option<i64>,
    /// Amount exactly as the provider sent it.
    pub price: String,
    pub goodname: Option<String>,
    pub recvphone: Option<String>,
    /// Caller-supplied correlation fields; empty when absent.
    pub var1: String,
    pub var2: String,
    pub pay_date: Option<String>,
    pub reqdate: Option<String>,
    /// Receipt page for the buyer.
    pub csturl: Option<String>,
    pub rebill_no: Option<String>,
    pub card: Option<CardDetails>,
    pub virtual_account: Option<VirtualAccount>,
    /// Every field without a typed member, in arrival order.
    pub extra: FormRecord,
}

impl Feedback {
    /// Decode a raw form body and parse it.
    pub fn parse(body: &str) -> Result<Self, PayAppError> {
        Self::from_record(form::decode(body))
    }

    /// Parse a decoded record.
    ///
    /// Credentials, `mul_no`, and an integer `pay_state` are required.
    /// Missing or malformed required fields are validation errors.
    pub fn from_record(record: FormRecord) -> Result<Self, PayAppError> {
        let required = |key: &str| -> Result<String, PayAppError> {
            record
                .get_non_empty(key)
                .map(str::to_owned)
                .ok_or_else(|| PayAppError::Validation(format!("missing field {key}")))
        };
        let optional = |key: &str| record.get_non_empty(key).map(str::to_owned);

        let userid = required("userid")?;
        let linkkey = required("linkkey")?;
        let linkval = required("linkval")?;
        let mul_no = required("mul_no")?;
        let pay_state = parse_code("pay_state", &required("pay_state")?)?;
        let pay_type = optional("pay_type")
            .map(|raw| parse_code("pay_type", &raw))
            .transpose()?;

        let card = match (
            optional("card_name"),
            optional("card_quota"),
            optional("payauthcode"),
        ) {
            (None, None, None) => None,
            (card_name, quota, auth_code) => Some(CardDetails {
                card_name,
                quota,
                auth_code,
            }),
        };
        let virtual_account = match (optional("vbank"), optional("vbankno")) {
            (None, None) => None,
            (bank, account_no) => Some(VirtualAccount { bank, account_no }),
        };

        let feedback = Self {
            price: optional("price").unwrap_or_default(),
            goodname: optional("goodname"),
            recvphone: optional("recvphone"),
            var1: optional("var1").unwrap_or_default(),
            var2: optional("var2").unwrap_or_default(),
            pay_date: optional("pay_date"),
            reqdate: optional("reqdate"),
            csturl: optional("csturl"),
            rebill_no: optional("rebill_no"),
            card,
            virtual_account,
            extra: FormRecord::default(),
            userid,
            linkkey,
            linkval,
            mul_no,
            pay_state,
            pay_type,
        };

        let extra = record
            .into_iter()
            .filter(|(k, _)| !TYPED_FIELDS.contains(&k.as_str()))
            .collect();

        Ok(Self { extra, ..feedback })
    }

    /// Event category for this delivery.
    pub fn event(&self) -> FeedbackEvent {
        FeedbackEvent::from_pay_state(self.pay_state)
    }

    pub fn pay_state_label(&self) -> &'static str {
        pay_state_label(self.pay_state)
    }

    pub fn pay_type_label(&self) -> Option<&'static str> {
        self.pay_type.map(pay_type_label)
    }

    /// Key identifying this logical event across redeliveries.
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::derive(&self.mul_no, self.pay_state, &self.var1, &self.var2)
    }
}

impl std::fmt::Debug for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Feedback")
            .field("userid", &self.userid)
            .field("mul_no", &self.mul_no)
            .field("pay_state", &self.pay_state)
            .field("pay_type", &self.pay_type)
            .field("price", &self.price)
            .field("var1", &self.var1)
            .field("var2", &self.var2)
            .finish_non_exhaustive()
    }
}

fn parse_code(key: &str, raw: &str) -> Result<i64, PayAppError> {
    raw.trim()
        .parse()
        .map_err(|_| PayAppError::Validation(format!("field {key} is not an integer: {raw:?}")))
}

/// Deduplication key for a feedback delivery.
///
/// Derived from `(mul_no, pay_state, var1, var2)`: each component is
/// percent-encoded (so the `:` separator cannot occur inside one), joined,
/// and hashed with SHA-256. The base64 digest has a fixed length that suits
/// external key-value stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DedupKey(String);

impl DedupKey {
    pub fn derive(mul_no: &str, pay_state: i64, var1: &str, var2: &str) -> Self {
        let material = format!(
            "{}:{}:{}:{}",
            urlencoding::encode(mul_no),
            pay_state,
            urlencoding::encode(var1),
            urlencoding::encode(var2),
        );
        let digest = ring::digest::digest(&ring::digest::SHA256, material.as_bytes());
        Self(fast32::base64::RFC4648_NOPAD.encode(digest.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DedupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "userid=shop&linkkey=k&linkval=v&mul_no=12345&pay_state=4&pay_type=1\
        &price=9900&goodname=T-shirt&var1=order-1&card_name=VISA&payauthcode=0001&noinf=0";

    #[test]
    fn test_parse_typed_and_extra_fields() {
        let feedback = Feedback::parse(BODY).unwrap();
        assert_eq!(feedback.mul_no, "12345");
        assert_eq!(feedback.pay_state, 4);
        assert_eq!(feedback.pay_type, Some(1));
        assert_eq!(feedback.price, "9900");
        assert_eq!(feedback.var1, "order-1");
        assert_eq!(feedback.var2, "");
        assert_eq!(feedback.event(), FeedbackEvent::Completed);
        assert_eq!(feedback.pay_type_label(), Some("credit card"));
        assert_eq!(
            feedback.card.as_ref().and_then(|c| c.auth_code.as_deref()),
            Some("0001")
        );
        assert_eq!(feedback.virtual_account, None);
        assert_eq!(feedback.extra.get("noinf"), Some("0"));
        assert!(!feedback.extra.contains_key("linkkey"));
    }

    #[test]
    fn test_missing_or_bad_state_is_validation_error() {
        let err = Feedback::parse("userid=a&linkkey=b&linkval=c&mul_no=1").unwrap_err();
        assert_eq!(err, PayAppError::Validation("missing field pay_state".to_owned()));

        let err = Feedback::parse("userid=a&linkkey=b&linkval=c&mul_no=1&pay_state=four").unwrap_err();
        assert!(matches!(err, PayAppError::Validation(_)));
    }

    #[test]
    fn test_serialization_omits_secrets() {
        let feedback = Feedback::parse(BODY).unwrap();
        let json = serde_json::to_string(&feedback).unwrap();
        assert!(json.contains("\"mul_no\":\"12345\""));
        assert!(!json.contains("linkkey"));
        assert!(!json.contains("linkval"));
        assert!(!format!("{feedback:?}").contains("linkval"));
    }

    #[test]
    fn test_dedup_key_is_deterministic() {
        let a = Feedback::parse(BODY).unwrap().dedup_key();
        let b = Feedback::parse(BODY).unwrap().dedup_key();
        assert_eq!(a, b);
        assert_eq!(a, DedupKey::derive("12345", 4, "order-1", ""));
    }

    #[test]
    fn test_dedup_key_separates_events() {
        let base = DedupKey::derive("12345", 4, "a", "b");
        assert_ne!(base, DedupKey::derive("12345", 9, "a", "b"));
        assert_ne!(base, DedupKey::derive("12346", 4, "a", "b"));
        assert_ne!(base, DedupKey::derive("12345", 4, "b", "a"));
        // The separator cannot be smuggled through a component.
        assert_ne!(
            DedupKey::derive("1", 4, "a:b", ""),
            DedupKey::derive("1", 4, "a", "b")
        );
    }
}
