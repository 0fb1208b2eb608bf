//! Driving port used by the accrual system to report order settlement.

use async_trait::async_trait;

use crate::domain::{Error, OrderNumber, Settlement, SettlementOutcome};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettlementCommand: Send + Sync {
    /// Move `number` to the reported state unless it is already terminal.
    ///
    /// Fails with `NotFound` for unknown orders.
    async fn apply_settlement(
        &self,
        number: &OrderNumber,
        settlement: Settlement,
    ) -> Result<SettlementOutcome, Error>;
}
