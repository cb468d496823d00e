//! Stateful action handles for UI code.
//!
//! A [`PayAppHooks`] owns one [`PayAppClient`] for as long as the component
//! using it lives and hands out an [`Action`] per operation. Each action
//! tracks a loading flag and the last error, published through a
//! `tokio::sync::watch` channel so reactive views can subscribe, while
//! [`Action::call`] still returns the error to imperative callers.
//!
//! Concurrent calls on one action share the same state; the last call to
//! finish decides what subscribers see.

use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::watch;

use super::PayAppClient;
use crate::error::PayAppError;
use crate::objects::{
    CancelCashReceipt, CancelPayment, CancelRebill, Command, DeleteBill, IssueCashReceipt,
    PayWithBill, PaymentRequest, RegisterBill, RegisterRebill, RequestCancelPayment, StartRebill,
    StopRebill,
};

/// Observable state of an [`Action`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSnapshot {
    pub loading: bool,
    pub error: Option<PayAppError>,
}

/// One API operation bound to a shared client and its own state cell.
pub struct Action<C: Command> {
    client: Arc<PayAppClient>,
    state: Arc<watch::Sender<ActionSnapshot>>,
    _command: PhantomData<fn(C)>,
}

impl<C: Command> Clone for Action<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            state: Arc::clone(&self.state),
            _command: PhantomData,
        }
    }
}

impl<C: Command> Action<C> {
    fn new(client: Arc<PayAppClient>) -> Self {
        let (state, _) = watch::channel(ActionSnapshot::default());
        Self {
            client,
            state: Arc::new(state),
            _command: PhantomData,
        }
    }

    /// Run the operation.
    ///
    /// Marks the action as loading and clears the previous error, then
    /// records the outcome. Errors are stored and also returned.
    pub async fn call(&self, params: C) -> Result<C::Response, PayAppError> {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = self.client.execute(params).await;

        self.state.send_modify(|s| {
            s.loading = false;
            s.error = result.as_ref().err().cloned();
        });
        if let Err(e) = &result {
            tracing::debug!(cmd = C::CMD, error = %e, "Action failed");
        }
        result
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<PayAppError> {
        self.state.borrow().error.clone()
    }

    pub fn snapshot(&self) -> ActionSnapshot {
        self.state.borrow().clone()
    }

    /// Receive every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<ActionSnapshot> {
        self.state.subscribe()
    }

    /// Clear the recorded error.
    pub fn reset(&self) {
        self.state.send_modify(|s| s.error = None);
    }
}

/// Factory for [`Action`]s sharing one client.
#[derive(Debug, Clone)]
pub struct PayAppHooks {
    client: Arc<PayAppClient>,
}

impl PayAppHooks {
    pub fn new(client: PayAppClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn client(&self) -> &PayAppClient {
        &self.client
    }

    /// Action for any command type.
    pub fn action<C: Command>(&self) -> Action<C> {
        Action::new(Arc::clone(&self.client))
    }

    pub fn use_request_payment(&self) -> Action<PaymentRequest> {
        self.action()
    }

    pub fn use_cancel_payment(&self) -> Action<CancelPayment> {
        self.action()
    }

    pub fn use_request_cancel_payment(&self) -> Action<RequestCancelPayment> {
        self.action()
    }

    pub fn use_register_bill(&self) -> Action<RegisterBill> {
        self.action()
    }

    pub fn use_delete_bill(&self) -> Action<DeleteBill> {
        self.action()
    }

    pub fn use_pay_with_bill(&self) -> Action<PayWithBill> {
        self.action()
    }

    pub fn use_register_rebill(&self) -> Action<RegisterRebill> {
        self.action()
    }

    pub fn use_cancel_rebill(&self) -> Action<CancelRebill> {
        self.action()
    }

    pub fn use_stop_rebill(&self) -> Action<StopRebill> {
        self.action()
    }

    pub fn use_start_rebill(&self) -> Action<StartRebill> {
        self.action()
    }

    pub fn use_issue_cash_receipt(&self) -> Action<IssueCashReceipt> {
        self.action()
    }

    pub fn use_cancel_cash_receipt(&self) -> Action<CancelCashReceipt> {
        self.action()
    }
}
