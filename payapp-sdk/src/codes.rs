//! Lookup tables for PayApp numeric codes.
//!
//! Every function here is total: an unmapped code yields [`UNKNOWN_LABEL`]
//! or [`FeedbackEvent::Unknown`] instead of failing, so display and logging
//! code never breaks on a code the provider introduces later.

use serde::{Deserialize, Serialize};

/// Label returned for any code without a table entry.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Human-readable description of a `pay_state` code.
pub fn pay_state_label(code: i64) -> &'static str {
    match code {
        1 => "payment requested",
        4 => "payment completed",
        8 | 32 => "request cancelled",
        9 | 64 => "approval cancelled",
        10 => "awaiting payment",
        70 | 71 => "partially cancelled",
        _ => UNKNOWN_LABEL,
    }
}

/// Human-readable description of a `pay_type` code.
pub fn pay_type_label(code: i64) -> &'static str {
    match code {
        1 => "credit card",
        2 => "mobile phone",
        4 => "in-person payment",
        6 => "bank transfer",
        7 => "virtual account",
        15 => "KakaoPay",
        16 => "NaverPay",
        17 => "registered payment",
        21 => "SmilePay",
        22 => "WeChat Pay",
        23 => "Apple Pay",
        24 => "account payment",
        25 => "TossPay",
        _ => UNKNOWN_LABEL,
    }
}

/// The event category a feedback delivery is dispatched under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackEvent {
    Requested,
    Completed,
    Cancelled,
    Waiting,
    Unknown,
}

impl FeedbackEvent {
    /// Classify a `pay_state` code.
    pub fn from_pay_state(code: i64) -> Self {
        match code {
            1 => FeedbackEvent::Requested,
            4 => FeedbackEvent::Completed,
            8 | 9 | 32 | 64 | 70 | 71 => FeedbackEvent::Cancelled,
            10 => FeedbackEvent::Waiting,
            _ => FeedbackEvent::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackEvent::Requested => "requested",
            FeedbackEvent::Completed => "completed",
            FeedbackEvent::Cancelled => "cancelled",
            FeedbackEvent::Waiting => "waiting",
            FeedbackEvent::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FeedbackEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_codes() {
        for code in [8, 9, 32, 64, 70, 71] {
            assert_eq!(FeedbackEvent::from_pay_state(code), FeedbackEvent::Cancelled);
        }
    }

    #[test]
    fn test_classification_is_total() {
        assert_eq!(FeedbackEvent::from_pay_state(1), FeedbackEvent::Requested);
        assert_eq!(FeedbackEvent::from_pay_state(4), FeedbackEvent::Completed);
        assert_eq!(FeedbackEvent::from_pay_state(10), FeedbackEvent::Waiting);
        for code in [-1, 0, 2, 3, 5, 11, 99, i64::MAX, i64::MIN] {
            assert_eq!(FeedbackEvent::from_pay_state(code), FeedbackEvent::Unknown);
        }
    }

    #[test]
    fn test_labels_default_to_unknown() {
        assert_eq!(pay_state_label(4), "payment completed");
        assert_eq!(pay_state_label(12345), UNKNOWN_LABEL);
        assert_eq!(pay_type_label(1), "credit card");
        assert_eq!(pay_type_label(-7), UNKNOWN_LABEL);
    }

    #[test]
    fn test_event_serializes_lowercase() {
        let json = serde_json::to_string(&FeedbackEvent::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
        assert_eq!(FeedbackEvent::Waiting.to_string(), "waiting");
    }
}
