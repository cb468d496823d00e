//! HTTP client for the PayApp REST API.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types and feedback parsing do not pull in `reqwest`.

pub mod hooks;

pub use hooks::{Action, ActionSnapshot, PayAppHooks};

use reqwest::Client;
use url::Url;

use crate::config::{Credentials, DEFAULT_API_ENDPOINT};
use crate::error::PayAppError;
use crate::form::{FORM_CONTENT_TYPE, FormRecord};
use crate::objects::{
    BillPayment, BillRegistration, CancelCashReceipt, CancelPayment, CancelRebill, CashReceipt,
    Command, DeleteBill, FromResponse, IssueCashReceipt, PayWithBill, PaymentRequest,
    PaymentRequestResponse, RebillRegistration, RegisterBill, RegisterRebill,
    RequestCancelPayment, ResponseRecord, StartRebill, StopRebill,
};

/// Typed HTTP client for the PayApp API.
///
/// Every operation is a single `POST` of a form body to the API endpoint,
/// carrying `cmd`, the merchant's `userid` and `linkkey`, and the command's
/// own fields. There is no retry and no timeout beyond what the injected
/// `reqwest::Client` is configured with.
#[derive(Debug, Clone)]
pub struct PayAppClient {
    http: Client,
    endpoint: Url,
    credentials: Credentials,
}

impl PayAppClient {
    /// Create a client against the public PayApp endpoint.
    pub fn new(credentials: Credentials) -> Result<Self, PayAppError> {
        let endpoint = Url::parse(DEFAULT_API_ENDPOINT)
            .map_err(|e| PayAppError::Unknown(format!("invalid default endpoint: {e}")))?;
        Ok(Self::with_endpoint(credentials, endpoint))
    }

    /// Create a client against a custom endpoint (e.g. a test double).
    pub fn with_endpoint(credentials: Credentials, endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            credentials,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Run any [`Command`] and convert its success record.
    pub async fn execute<C: Command>(&self, command: C) -> Result<C::Response, PayAppError> {
        let record = self.call(C::CMD, command.into_form()).await?;
        C::Response::from_response(record)
    }

    /// Low-level call: post `cmd` plus `params`, merged over the stored
    /// credentials, and validate the response's `state` flag.
    pub async fn call(&self, cmd: &str, params: FormRecord) -> Result<ResponseRecord, PayAppError> {
        let mut form = FormRecord::new()
            .with("cmd", cmd)
            .with("userid", self.credentials.userid())
            .with("linkkey", self.credentials.linkkey());
        form.merge(params);

        tracing::debug!(cmd, endpoint = %self.endpoint, "Sending PayApp request");

        let resp = self
            .http
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(form.encode())
            .send()
            .await?;

        parse_response(cmd, resp).await
    }

    /// `payrequest` – create a payment request.
    pub async fn request_payment(
        &self,
        params: PaymentRequest,
    ) -> Result<PaymentRequestResponse, PayAppError> {
        self.execute(params).await
    }

    /// `paycancel` – cancel a payment.
    pub async fn cancel_payment(&self, params: CancelPayment) -> Result<ResponseRecord, PayAppError> {
        self.execute(params).await
    }

    /// `paycancelreq` – request cancellation of a settled payment.
    pub async fn request_cancel_payment(
        &self,
        params: RequestCancelPayment,
    ) -> Result<ResponseRecord, PayAppError> {
        self.execute(params).await
    }

    /// `billRegist` – register a card for later charges.
    pub async fn register_bill(&self, params: RegisterBill) -> Result<BillRegistration, PayAppError> {
        self.execute(params).await
    }

    /// `billDelete` – delete a registered card.
    pub async fn delete_bill(&self, params: DeleteBill) -> Result<ResponseRecord, PayAppError> {
        self.execute(params).await
    }

    /// `billPay` – charge a registered card.
    pub async fn pay_with_bill(&self, params: PayWithBill) -> Result<BillPayment, PayAppError> {
        self.execute(params).await
    }

    /// `rebillRegist` – register a recurring payment.
    pub async fn register_rebill(
        &self,
        params: RegisterRebill,
    ) -> Result<RebillRegistration, PayAppError> {
        self.execute(params).await
    }

    /// `rebillCancel` – terminate a recurring payment.
    pub async fn cancel_rebill(&self, params: CancelRebill) -> Result<ResponseRecord, PayAppError> {
        self.execute(params).await
    }

    /// `rebillStop` – pause a recurring payment.
    pub async fn stop_rebill(&self, params: StopRebill) -> Result<ResponseRecord, PayAppError> {
        self.execute(params).await
    }

    /// `rebillStart` – resume a recurring payment.
    pub async fn start_rebill(&self, params: StartRebill) -> Result<ResponseRecord, PayAppError> {
        self.execute(params).await
    }

    /// `cashStRegist` – issue a cash receipt.
    pub async fn issue_cash_receipt(
        &self,
        params: IssueCashReceipt,
    ) -> Result<CashReceipt, PayAppError> {
        self.execute(params).await
    }

    /// `cashStCancel` – cancel a cash receipt.
    pub async fn cancel_cash_receipt(
        &self,
        params: CancelCashReceipt,
    ) -> Result<ResponseRecord, PayAppError> {
        self.execute(params).await
    }
}

async fn parse_response(cmd: &str, resp: reqwest::Response) -> Result<ResponseRecord, PayAppError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(cmd, status = %status, "PayApp request failed at HTTP level");
        let message = if body.is_empty() {
            status.to_string()
        } else {
            body
        };
        return Err(PayAppError::provider(status.as_u16().to_string(), message));
    }

    let body = resp.text().await?;
    ResponseRecord::parse(&body).inspect_err(|e| {
        tracing::warn!(cmd, error = %e, "PayApp reported failure");
    })
}
