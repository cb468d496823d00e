//! Merchant credentials.

use subtle::ConstantTimeEq;

/// The shared-secret triple PayApp issues to a merchant.
///
/// `userid` identifies the merchant on every API call. `linkkey` is sent
/// with API calls and echoed back inside feedback callbacks together with
/// `linkval`; both are compared on receipt to authenticate the callback.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    userid: String,
    linkkey: String,
    linkval: String,
}

impl Credentials {
    pub fn new(
        userid: impl Into<String>,
        linkkey: impl Into<String>,
        linkval: impl Into<String>,
    ) -> Self {
        Self {
            userid: userid.into(),
            linkkey: linkkey.into(),
            linkval: linkval.into(),
        }
    }

    pub fn userid(&self) -> &str {
        &self.userid
    }

    pub fn linkkey(&self) -> &str {
        &self.linkkey
    }

    pub fn linkval(&self) -> &str {
        &self.linkval
    }

    /// Compare an embedded triple against these credentials.
    ///
    /// All three components are compared in constant time and the results
    /// combined without short-circuiting.
    pub fn matches(&self, userid: &str, linkkey: &str, linkval: &str) -> bool {
        let ok = self.userid.as_bytes().ct_eq(userid.as_bytes())
            & self.linkkey.as_bytes().ct_eq(linkkey.as_bytes())
            & self.linkval.as_bytes().ct_eq(linkval.as_bytes());
        ok.into()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("userid", &self.userid)
            .field("linkkey", &"<redacted>")
            .field("linkval", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_requires_all_three() {
        let creds = Credentials::new("shop", "key", "val");
        assert!(creds.matches("shop", "key", "val"));
        assert!(!creds.matches("shop", "key", "other"));
        assert!(!creds.matches("shop", "ke", "val"));
        assert!(!creds.matches("Shop", "key", "val"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::new("shop", "super-secret-key", "super-secret-val");
        let debug = format!("{creds:?}");
        assert!(debug.contains("shop"));
        assert!(!debug.contains("super-secret"));
    }
}
