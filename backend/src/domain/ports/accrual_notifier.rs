//! Port for telling the accrual system about newly accepted orders.
//!
//! Notification is fire-and-forget: a failure here never undoes an accepted
//! order. The accrual system later reports back through
//! [`super::SettlementCommand`].

use async_trait::async_trait;

use crate::domain::OrderNumber;

use super::define_port_error;

define_port_error! {
    /// Errors raised by accrual notifier adapters.
    pub enum AccrualNotifierError {
        /// The request could not be sent.
        Transport { message: String } => "accrual notification failed: {message}",
        /// The accrual system did not answer in time.
        Timeout => "accrual notification timed out",
        /// The accrual system answered with a non-success status.
        Rejected { status: u16 } => "accrual system rejected notification with status {status}",
    }
}

/// Outbound notification to the external accrual system.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccrualNotifier: Send + Sync {
    /// Announce that `number` was accepted and awaits settlement.
    async fn notify(&self, number: &OrderNumber) -> Result<(), AccrualNotifierError>;
}

/// No-op notifier used when no accrual system is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccrualNotifier;

#[async_trait]
impl AccrualNotifier for FixtureAccrualNotifier {
    async fn notify(&self, _number: &OrderNumber) -> Result<(), AccrualNotifierError> {
        Ok(())
    }
}
