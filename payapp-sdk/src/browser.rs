//! Client-side payment initiation through PayApp's hosted script.
//!
//! The hosted script installs a global `PayApp` object exposing
//! `setDefault`, `setParam`, `payrequest`, and `rebill`. Instead of reaching
//! for that global, this module takes it as an injected capability:
//! [`ScriptHost`] abstracts the page (script tags and the global lookup) and
//! [`PayAppJs`] abstracts the global object. A wasm front end implements
//! both over `web_sys`; tests implement them in memory.

use std::sync::Arc;

use crate::config::DEFAULT_SCRIPT_URL;
use crate::error::PayAppError;
use crate::form::FormRecord;
use crate::objects::{Command, PaymentRequest, RegisterRebill};

/// The hosted SDK's global object.
pub trait PayAppJs: Send + Sync {
    /// `PayApp.setDefault(key, value)`.
    fn set_default(&self, key: &str, value: &str);

    /// `PayApp.setParam(key, value)`.
    fn set_param(&self, key: &str, value: &str);

    /// `PayApp.payrequest()`.
    fn pay_request(&self) -> Result<(), String>;

    /// `PayApp.rebill()`.
    fn rebill(&self) -> Result<(), String>;
}

/// The page the SDK is loaded into.
pub trait ScriptHost {
    /// The global SDK object, once the script has run.
    fn payapp(&self) -> Option<Arc<dyn PayAppJs>>;

    /// Whether a `<script>` tag with this `src` already exists.
    fn has_script(&self, src: &str) -> bool;

    /// Append a `<script>` tag with this `src`.
    fn inject_script(&self, src: &str) -> Result<(), String>;
}

/// Outcome of [`BrowserSdk::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The global object is already available.
    AlreadyLoaded,
    /// A script tag exists but has not finished loading.
    AlreadyInjected,
    /// A new script tag was added.
    Injected,
}

/// Browser-side entry point.
pub struct BrowserSdk<H> {
    host: H,
    userid: String,
    shopname: Option<String>,
    script_url: String,
}

impl<H: ScriptHost> BrowserSdk<H> {
    pub fn new(host: H, userid: impl Into<String>) -> Self {
        Self {
            host,
            userid: userid.into(),
            shopname: None,
            script_url: DEFAULT_SCRIPT_URL.to_owned(),
        }
    }

    /// Shop name shown on PayApp's payment page.
    pub fn with_shopname(mut self, shopname: impl Into<String>) -> Self {
        self.shopname = Some(shopname.into());
        self
    }

    pub fn with_script_url(mut self, url: impl Into<String>) -> Self {
        self.script_url = url.into();
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn is_loaded(&self) -> bool {
        self.host.payapp().is_some()
    }

    /// Load the hosted script. Safe to call repeatedly: nothing is injected
    /// if the global exists or a tag for the script is already present.
    pub fn load(&self) -> Result<LoadStatus, PayAppError> {
        if self.is_loaded() {
            return Ok(LoadStatus::AlreadyLoaded);
        }
        if self.host.has_script(&self.script_url) {
            return Ok(LoadStatus::AlreadyInjected);
        }
        self.host
            .inject_script(&self.script_url)
            .map_err(|e| PayAppError::Unknown(format!("failed to inject PayApp script: {e}")))?;
        tracing::debug!(src = %self.script_url, "Injected PayApp script");
        Ok(LoadStatus::Injected)
    }

    /// Open PayApp's payment window for a one-off payment.
    pub fn request_payment(&self, params: PaymentRequest) -> Result<(), PayAppError> {
        let sdk = self.prepare(params.into_form())?;
        sdk.pay_request().map_err(sdk_call_error)
    }

    /// Open PayApp's window for registering a recurring payment.
    pub fn request_rebill(&self, params: RegisterRebill) -> Result<(), PayAppError> {
        let sdk = self.prepare(params.into_form())?;
        sdk.rebill().map_err(sdk_call_error)
    }

    fn prepare(&self, params: FormRecord) -> Result<Arc<dyn PayAppJs>, PayAppError> {
        let sdk = self.host.payapp().ok_or(PayAppError::SdkNotLoaded)?;
        sdk.set_default("userid", &self.userid);
        if let Some(shopname) = &self.shopname {
            sdk.set_default("shopname", shopname);
        }
        for (key, value) in params.iter() {
            sdk.set_param(key, value);
        }
        Ok(sdk)
    }
}

fn sdk_call_error(message: String) -> PayAppError {
    PayAppError::Unknown(format!("PayApp SDK call failed: {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::RebillCycle;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSdk {
        calls: Mutex<Vec<String>>,
    }

    impl PayAppJs for RecordingSdk {
        fn set_default(&self, key: &str, value: &str) {
            self.calls.lock().unwrap().push(format!("default:{key}={value}"));
        }
        fn set_param(&self, key: &str, value: &str) {
            self.calls.lock().unwrap().push(format!("param:{key}={value}"));
        }
        fn pay_request(&self) -> Result<(), String> {
            self.calls.lock().unwrap().push("payrequest".to_owned());
            Ok(())
        }
        fn rebill(&self) -> Result<(), String> {
            Err("popup blocked".to_owned())
        }
    }

    #[derive(Default)]
    struct FakePage {
        scripts: Mutex<Vec<String>>,
        sdk: Mutex<Option<Arc<RecordingSdk>>>,
    }

    impl FakePage {
        fn finish_loading(&self) -> Arc<RecordingSdk> {
            let sdk = Arc::new(RecordingSdk::default());
            *self.sdk.lock().unwrap() = Some(Arc::clone(&sdk));
            sdk
        }
    }

    impl ScriptHost for &FakePage {
        fn payapp(&self) -> Option<Arc<dyn PayAppJs>> {
            self.sdk
                .lock()
                .unwrap()
                .clone()
                .map(|sdk| sdk as Arc<dyn PayAppJs>)
        }
        fn has_script(&self, src: &str) -> bool {
            self.scripts.lock().unwrap().iter().any(|s| s == src)
        }
        fn inject_script(&self, src: &str) -> Result<(), String> {
            self.scripts.lock().unwrap().push(src.to_owned());
            Ok(())
        }
    }

    #[test]
    fn test_load_is_idempotent() {
        let page = FakePage::default();
        let sdk = BrowserSdk::new(&page, "shop");

        assert_eq!(sdk.load().unwrap(), LoadStatus::Injected);
        assert_eq!(sdk.load().unwrap(), LoadStatus::AlreadyInjected);
        page.finish_loading();
        assert_eq!(sdk.load().unwrap(), LoadStatus::AlreadyLoaded);
        assert_eq!(page.scripts.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_request_before_load_fails_fast() {
        let page = FakePage::default();
        let sdk = BrowserSdk::new(&page, "shop");
        let err = sdk
            .request_payment(PaymentRequest::new("Item", 1000, "010"))
            .unwrap_err();
        assert_eq!(err, PayAppError::SdkNotLoaded);
    }

    #[test]
    fn test_request_payment_passes_defaults_and_params() {
        let page = FakePage::default();
        let recorder = page.finish_loading();
        let sdk = BrowserSdk::new(&page, "shop").with_shopname("My Shop");

        sdk.request_payment(PaymentRequest::new("Item", 1000, "010")).unwrap();

        let calls = recorder.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                "default:userid=shop",
                "default:shopname=My Shop",
                "param:goodname=Item",
                "param:price=1000",
                "param:recvphone=010",
                "payrequest",
            ]
        );
    }

    #[test]
    fn test_sdk_call_failure_is_reported() {
        let page = FakePage::default();
        page.finish_loading();
        let sdk = BrowserSdk::new(&page, "shop");
        let err = sdk
            .request_rebill(RegisterRebill::new("Plan", 100, "010", RebillCycle::Day, "2027-01-01"))
            .unwrap_err();
        assert!(matches!(err, PayAppError::Unknown(msg) if msg.contains("popup blocked")));
    }
}
