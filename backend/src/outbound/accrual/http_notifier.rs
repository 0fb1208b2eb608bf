//! Reqwest-backed accrual notifier.
//!
//! Posts each accepted order number as a `text/plain` body to
//! `{base}/api/orders/`. Any 2xx answer counts as delivered.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::domain::OrderNumber;
use crate::domain::ports::{AccrualNotifier, AccrualNotifierError};

const ORDERS_PATH: &str = "api/orders/";

/// Accrual notifier that performs one HTTP POST per accepted order.
#[derive(Debug, Clone)]
pub struct HttpAccrualNotifier {
    client: Client,
    endpoint: Url,
}

impl HttpAccrualNotifier {
    /// Build a notifier for the accrual system rooted at `base`.
    ///
    /// # Errors
    ///
    /// Returns an error when `base` is not a valid URL or the reqwest client
    /// cannot be constructed.
    pub fn new(base: &str, timeout: Duration) -> Result<Self, AccrualNotifierError> {
        let endpoint = orders_endpoint(base)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AccrualNotifierError::transport(err.to_string()))?;
        Ok(Self { client, endpoint })
    }

    /// Fully resolved notification URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn orders_endpoint(base: &str) -> Result<Url, AccrualNotifierError> {
    let trimmed = base.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("http://{trimmed}")
    };
    let mut root = Url::parse(&with_scheme).map_err(|err| {
        AccrualNotifierError::transport(format!("invalid accrual address {trimmed}: {err}"))
    })?;
    if !root.path().ends_with('/') {
        let path = format!("{}/", root.path());
        root.set_path(&path);
    }
    root.join(ORDERS_PATH)
        .map_err(|err| AccrualNotifierError::transport(err.to_string()))
}

fn map_transport_error(error: reqwest::Error) -> AccrualNotifierError {
    if error.is_timeout() {
        AccrualNotifierError::timeout()
    } else {
        AccrualNotifierError::transport(error.to_string())
    }
}

fn map_status(status: StatusCode) -> Result<(), AccrualNotifierError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(AccrualNotifierError::rejected(status.as_u16()))
    }
}

#[async_trait]
impl AccrualNotifier for HttpAccrualNotifier {
    async fn notify(&self, number: &OrderNumber) -> Result<(), AccrualNotifierError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(number.as_str().to_owned())
            .send()
            .await
            .map_err(map_transport_error)?;
        map_status(response.status())
    }
}
