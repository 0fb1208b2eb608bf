//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the order ledger and balance accounting rules without
//! reference to HTTP, SQL, or any other transport. Inbound adapters call the
//! driving ports in [`ports`]; services implement them over driven ports
//! supplied by outbound adapters.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `OrderNumber`: Luhn-validated order identifier.
//! - `Points` / `Balance`: fixed-point amounts and the derived balance.
//! - `Order`, `Settlement`, `Withdrawal`: ledger entries.
//! - `OrderIntakeService`, `LedgerService`, `SettlementService`,
//!   `AccountService`: use-case implementations.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod ledger;
pub mod ledger_service;
pub mod operation_timeout;
pub mod order;
pub mod order_intake_service;
pub mod order_number;
pub mod points;
pub mod ports;
pub mod settlement_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{Credentials, CredentialsValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ledger::{
    Balance, LedgerError, ORDER_REFERENCE_MAX_LEN, OrderReference, OrderReferenceError,
    Withdrawal, WithdrawalRequest,
};
pub use self::ledger_service::LedgerService;
pub use self::operation_timeout::OperationTimeout;
pub use self::order::{
    Order, OrderStatus, Settlement, SettlementError, SettlementOutcome, UnknownOrderStatus,
};
pub use self::order_intake_service::OrderIntakeService;
pub use self::order_number::{
    ORDER_NUMBER_MAX_LEN, OrderNumber, OrderNumberError, is_valid_order_number,
    luhn_check_digit,
};
pub use self::points::{POINTS_MAX, POINTS_SCALE, Points, PointsError};
pub use self::settlement_service::SettlementService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{LOGIN_MAX_LEN, Login, User, UserAccount, UserId, UserValidationError};
