//! In-process ledger store used when no database is configured.
//!
//! A single lock guards users, orders, and withdrawals, so every operation
//! (including the withdrawal balance check and insert) is one critical
//! section. State is lost when the process exits.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{
    LedgerRepository, LedgerRepositoryError, OrderRepository, OrderRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::{
    Balance, Login, Order, OrderNumber, Settlement, SettlementOutcome, UserAccount, UserId,
    Withdrawal,
};

#[derive(Debug, Default)]
struct LedgerState {
    users: HashMap<Login, UserAccount>,
    orders: HashMap<OrderNumber, Order>,
    withdrawals: Vec<Withdrawal>,
}

impl LedgerState {
    fn is_registered(&self, user: &UserId) -> bool {
        self.users.values().any(|account| account.user.id == *user)
    }

    fn balance(&self, user: &UserId) -> Result<Balance, LedgerRepositoryError> {
        Balance::accumulate(
            self.orders.values().filter(|order| order.is_owned_by(user)),
            self.withdrawals
                .iter()
                .filter(|withdrawal| withdrawal.owner == *user),
        )
        .map_err(|err| LedgerRepositoryError::query(err.to_string()))
    }
}

/// Memory-backed implementation of the order, ledger, and user ports.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    state: Mutex<LedgerState>,
}

impl InMemoryLedgerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryLedgerStore {
    async fn find_by_number(
        &self,
        number: &OrderNumber,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        Ok(self.state.lock().await.orders.get(number).cloned())
    }

    async fn create(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        let mut state = self.state.lock().await;
        if !state.is_registered(&order.owner) {
            return Err(OrderRepositoryError::unknown_owner(order.owner.to_string()));
        }
        if state.orders.contains_key(&order.number) {
            return Err(OrderRepositoryError::conflict(order.number.as_str()));
        }
        state.orders.insert(order.number.clone(), order.clone());
        Ok(())
    }

    async fn update_settlement(
        &self,
        number: &OrderNumber,
        settlement: &Settlement,
    ) -> Result<SettlementOutcome, OrderRepositoryError> {
        let mut state = self.state.lock().await;
        let order = state
            .orders
            .get_mut(number)
            .ok_or_else(|| OrderRepositoryError::not_found(number.as_str()))?;
        Ok(order.apply(settlement))
    }

    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Order>, OrderRepositoryError> {
        let state = self.state.lock().await;
        let mut orders: Vec<Order> = state
            .orders
            .values()
            .filter(|order| order.is_owned_by(user))
            .cloned()
            .collect();
        orders.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| b.number.as_str().cmp(a.number.as_str()))
        });
        Ok(orders)
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerStore {
    async fn balance(&self, user: &UserId) -> Result<Balance, LedgerRepositoryError> {
        self.state.lock().await.balance(user)
    }

    async fn record_withdrawal(
        &self,
        withdrawal: &Withdrawal,
    ) -> Result<(), LedgerRepositoryError> {
        let mut state = self.state.lock().await;
        if !state.is_registered(&withdrawal.owner) {
            return Err(LedgerRepositoryError::unknown_user(
                withdrawal.owner.to_string(),
            ));
        }
        let balance = state.balance(&withdrawal.owner)?;
        if !balance.admits(withdrawal.sum) {
            return Err(LedgerRepositoryError::insufficient_funds(balance.current));
        }
        state.withdrawals.push(withdrawal.clone());
        Ok(())
    }

    async fn list_withdrawals(
        &self,
        user: &UserId,
    ) -> Result<Vec<Withdrawal>, LedgerRepositoryError> {
        let state = self.state.lock().await;
        // Reverse insertion order first so timestamp ties stay newest first.
        let mut withdrawals: Vec<Withdrawal> = state
            .withdrawals
            .iter()
            .rev()
            .filter(|withdrawal| withdrawal.owner == *user)
            .cloned()
            .collect();
        withdrawals.sort_by(|a, b| b.processed_at.cmp(&a.processed_at));
        Ok(withdrawals)
    }
}

#[async_trait]
impl UserRepository for InMemoryLedgerStore {
    async fn create(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        let mut state = self.state.lock().await;
        if state.users.contains_key(&account.user.login) {
            return Err(UserRepositoryError::duplicate_login(
                account.user.login.as_str(),
            ));
        }
        state
            .users
            .insert(account.user.login.clone(), account.clone());
        Ok(())
    }

    async fn find_by_login(
        &self,
        login: &Login,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        Ok(self.state.lock().await.users.get(login).cloned())
    }
}
