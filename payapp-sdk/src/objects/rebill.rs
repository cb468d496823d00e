//! Recurring payments ("rebill").

use super::{Command, FromResponse, ResponseRecord, yes_no};
use crate::error::PayAppError;
use crate::form::FormRecord;

/// Billing cycle of a recurring payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebillCycle {
    /// Charge monthly on the given day (`1`-`31`, `90` for the last day).
    Month(u8),
    /// Charge weekly on the given weekday (`1` Monday .. `7` Sunday).
    Week(u8),
    /// Charge every day.
    Day,
}

impl RebillCycle {
    fn apply(self, form: FormRecord) -> FormRecord {
        match self {
            RebillCycle::Month(day) => form
                .with("rebillCycleType", "Month")
                .with("rebillCycleMonth", day),
            RebillCycle::Week(weekday) => form
                .with("rebillCycleType", "Week")
                .with("rebillCycleWeek", weekday),
            RebillCycle::Day => form.with("rebillCycleType", "Day"),
        }
    }
}

/// `cmd=rebillRegist`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRebill {
    pub goodname: String,
    pub goodprice: u64,
    pub recvphone: String,
    pub cycle: RebillCycle,
    /// Last billing date, `YYYY-MM-DD`.
    pub expire: String,
    pub feedback_url: Option<String>,
    pub return_url: Option<String>,
    pub var1: Option<String>,
    pub var2: Option<String>,
    pub sms: Option<bool>,
    pub open_pay_type: Option<String>,
}

impl RegisterRebill {
    pub fn new(
        goodname: impl Into<String>,
        goodprice: u64,
        recvphone: impl Into<String>,
        cycle: RebillCycle,
        expire: impl Into<String>,
    ) -> Self {
        Self {
            goodname: goodname.into(),
            goodprice,
            recvphone: recvphone.into(),
            cycle,
            expire: expire.into(),
            feedback_url: None,
            return_url: None,
            var1: None,
            var2: None,
            sms: None,
            open_pay_type: None,
        }
    }
}

impl Command for RegisterRebill {
    const CMD: &'static str = "rebillRegist";
    type Response = RebillRegistration;

    fn into_form(self) -> FormRecord {
        let form = FormRecord::new()
            .with("goodname", self.goodname)
            .with("goodprice", self.goodprice)
            .with("recvphone", self.recvphone);
        self.cycle
            .apply(form)
            .with("rebillExpire", self.expire)
            .with_opt("feedbackurl", self.feedback_url)
            .with_opt("returnurl", self.return_url)
            .with_opt("var1", self.var1)
            .with_opt("var2", self.var2)
            .with_opt("smsuse", self.sms.map(yes_no))
            .with_opt("openpaytype", self.open_pay_type)
    }
}

/// Successful `rebillRegist` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebillRegistration {
    pub rebill_no: String,
    pub payurl: Option<String>,
}

impl FromResponse for RebillRegistration {
    fn from_response(record: ResponseRecord) -> Result<Self, PayAppError> {
        Ok(Self {
            rebill_no: record.require("rebill_no")?.to_owned(),
            payurl: record.get("payurl").map(str::to_owned),
        })
    }
}

macro_rules! rebill_command {
    ($(#[$meta:meta])* $name:ident, $cmd:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            pub rebill_no: String,
        }

        impl $name {
            pub fn new(rebill_no: impl Into<String>) -> Self {
                Self {
                    rebill_no: rebill_no.into(),
                }
            }
        }

        impl Command for $name {
            const CMD: &'static str = $cmd;
            type Response = ResponseRecord;

            fn into_form(self) -> FormRecord {
                FormRecord::new().with("rebill_no", self.rebill_no)
            }
        }
    };
}

rebill_command!(
    /// `cmd=rebillCancel`: terminate a recurring payment.
    CancelRebill,
    "rebillCancel"
);
rebill_command!(
    /// `cmd=rebillStop`: pause a recurring payment.
    StopRebill,
    "rebillStop"
);
rebill_command!(
    /// `cmd=rebillStart`: resume a paused recurring payment.
    StartRebill,
    "rebillStart"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_cycle_fields() {
        let form = RegisterRebill::new("Membership", 9900, "01012345678", RebillCycle::Month(90), "2027-12-31")
            .into_form();
        assert_eq!(form.get("rebillCycleType"), Some("Month"));
        assert_eq!(form.get("rebillCycleMonth"), Some("90"));
        assert_eq!(form.get("rebillCycleWeek"), None);
        assert_eq!(form.get("rebillExpire"), Some("2027-12-31"));
    }

    #[test]
    fn test_daily_cycle_has_no_day_field() {
        let form = RegisterRebill::new("Daily", 100, "010", RebillCycle::Day, "2027-01-01").into_form();
        assert_eq!(form.get("rebillCycleType"), Some("Day"));
        assert!(!form.contains_key("rebillCycleMonth"));
    }

    #[test]
    fn test_lifecycle_commands_share_shape() {
        assert_eq!(StopRebill::CMD, "rebillStop");
        assert_eq!(StartRebill::new("77").into_form().get("rebill_no"), Some("77"));
        assert_eq!(CancelRebill::CMD, "rebillCancel");
    }
}
