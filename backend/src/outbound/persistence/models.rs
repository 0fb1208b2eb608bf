//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::Numeric;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{
    Login, Order, OrderNumber, OrderReference, OrderStatus, Points, User, UserAccount, UserId,
    Withdrawal,
};

use super::schema::{orders, users, withdrawals};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub login: String,
    pub password_hash: String,
}

impl UserRow {
    pub(crate) fn into_account(self) -> Result<UserAccount, String> {
        let login = Login::new(&self.login).map_err(|err| format!("stored login: {err}"))?;
        Ok(UserAccount {
            user: User {
                id: UserId::from_uuid(self.id),
                login,
            },
            password_hash: self.password_hash,
        })
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub login: &'a str,
    pub password_hash: &'a str,
}

impl<'a> From<&'a UserAccount> for NewUserRow<'a> {
    fn from(account: &'a UserAccount) -> Self {
        Self {
            id: *account.user.id.as_uuid(),
            login: account.user.login.as_str(),
            password_hash: account.password_hash.as_str(),
        }
    }
}

/// Row struct for reading from the orders table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub number: String,
    pub user_id: Uuid,
    pub status: String,
    pub accrual: Option<Decimal>,
    pub uploaded_at: DateTime<Utc>,
}

impl OrderRow {
    pub(crate) fn into_order(self) -> Result<Order, String> {
        let number =
            OrderNumber::parse(&self.number).map_err(|err| format!("stored order number: {err}"))?;
        let status = self
            .status
            .parse::<OrderStatus>()
            .map_err(|err| err.to_string())?;
        let accrual = self
            .accrual
            .map(Points::new)
            .transpose()
            .map_err(|err| format!("stored accrual: {err}"))?;
        Ok(Order {
            number,
            owner: UserId::from_uuid(self.user_id),
            status,
            accrual,
            uploaded_at: self.uploaded_at,
        })
    }
}

/// Insertable struct for new orders; status and accrual take column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow<'a> {
    pub number: &'a str,
    pub user_id: Uuid,
    pub status: &'static str,
    pub uploaded_at: DateTime<Utc>,
}

impl<'a> From<&'a Order> for NewOrderRow<'a> {
    fn from(order: &'a Order) -> Self {
        Self {
            number: order.number.as_str(),
            user_id: *order.owner.as_uuid(),
            status: order.status.as_str(),
            uploaded_at: order.uploaded_at,
        }
    }
}

/// Row struct for reading from the withdrawals table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = withdrawals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WithdrawalRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_ref: String,
    pub amount: Decimal,
    pub processed_at: DateTime<Utc>,
}

impl WithdrawalRow {
    pub(crate) fn into_withdrawal(self) -> Result<Withdrawal, String> {
        let order_ref = OrderReference::new(&self.order_ref)
            .map_err(|err| format!("stored order reference: {err}"))?;
        let sum = Points::new(self.amount).map_err(|err| format!("stored sum: {err}"))?;
        Ok(Withdrawal {
            id: self.id,
            owner: UserId::from_uuid(self.user_id),
            order_ref,
            sum,
            processed_at: self.processed_at,
        })
    }
}

/// Insertable struct for appending to the withdrawal ledger.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = withdrawals)]
pub(crate) struct NewWithdrawalRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_ref: &'a str,
    pub amount: Decimal,
    pub processed_at: DateTime<Utc>,
}

impl<'a> From<&'a Withdrawal> for NewWithdrawalRow<'a> {
    fn from(withdrawal: &'a Withdrawal) -> Self {
        Self {
            id: withdrawal.id,
            user_id: *withdrawal.owner.as_uuid(),
            order_ref: withdrawal.order_ref.as_str(),
            amount: withdrawal.sum.as_decimal(),
            processed_at: withdrawal.processed_at,
        }
    }
}

/// Aggregate totals produced by the balance query.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct LedgerTotalsRow {
    #[diesel(sql_type = Numeric)]
    pub accrued: Decimal,
    #[diesel(sql_type = Numeric)]
    pub withdrawn: Decimal,
}
