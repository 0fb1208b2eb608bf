//! Adapters that tell the external accrual system about accepted orders.

mod http_notifier;

pub use http_notifier::HttpAccrualNotifier;
