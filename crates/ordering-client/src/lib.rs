use std::time::Duration;

use anyhow::Context;
use ordering_types::domain::cart::{Cart, CartId};
use ordering_types::domain::order::{NewOrderRequest, Order, OrderId, OrderPatch};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

/// Failures seen by callers of [`OrdersClient`]. Non-2xx answers from the
/// service keep the message from its error body.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct OrdersClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
}

#[derive(Clone)]
pub struct OrdersClient {
    base: Url,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl OrdersClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<OrdersClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(OrdersClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
        })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("{path}: {e}")))
    }

    async fn read<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
        let res = Self::check(res).await?;
        Ok(res.json().await?)
    }

    async fn check(res: Response) -> Result<Response, ClientError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let raw = res.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .map(|b| b.error)
            .unwrap_or(raw);
        tracing::debug!(%status, %message, "orders service rejected request");
        Err(match status {
            StatusCode::BAD_REQUEST => ClientError::BadRequest(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::CONFLICT => ClientError::Conflict(message),
            other => ClientError::Server {
                status: other.as_u16(),
                message,
            },
        })
    }

    pub async fn create_order(&self, req: &NewOrderRequest) -> Result<Order, ClientError> {
        let res = self.client.post(self.url("orders")?).json(req).send().await?;
        Self::read(res).await
    }

    pub async fn get_order(&self, id: OrderId) -> Result<Order, ClientError> {
        let res = self
            .client
            .get(self.url(&format!("orders/{id}"))?)
            .send()
            .await?;
        Self::read(res).await
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, ClientError> {
        let res = self.client.get(self.url("orders")?).send().await?;
        Self::read(res).await
    }

    pub async fn update_order(&self, id: OrderId, patch: &OrderPatch) -> Result<Order, ClientError> {
        let res = self
            .client
            .put(self.url(&format!("orders/{id}"))?)
            .json(patch)
            .send()
            .await?;
        Self::read(res).await
    }

    /// Moves the order to its next status.
    pub async fn advance_status(&self, id: OrderId) -> Result<Order, ClientError> {
        let res = self
            .client
            .patch(self.url(&format!("orders/{id}/status"))?)
            .send()
            .await?;
        Self::read(res).await
    }

    pub async fn delete_order(&self, id: OrderId) -> Result<(), ClientError> {
        let res = self
            .client
            .delete(self.url(&format!("orders/{id}"))?)
            .send()
            .await?;
        Self::check(res).await?;
        Ok(())
    }

    pub async fn open_cart(&self) -> Result<Cart, ClientError> {
        let res = self.client.post(self.url("carts")?).send().await?;
        Self::read(res).await
    }

    pub async fn get_cart(&self, id: CartId) -> Result<Cart, ClientError> {
        let res = self
            .client
            .get(self.url(&format!("carts/{id}"))?)
            .send()
            .await?;
        Self::read(res).await
    }
}

impl OrdersClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn build(self) -> anyhow::Result<OrdersClient> {
        let mut builder = reqwest::Client::builder().default_headers(self.headers);
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        Ok(OrdersClient {
            base: self.base,
            client: builder.build()?,
        })
    }
}
