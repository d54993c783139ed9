//! Remote collaborator for the menu collection.
//!
//! `FoodsApi` is the seam the controller talks to; `HttpFoodsApi` implements it
//! over the `/foods` REST+JSON resource.

use crate::model::{ClientConfig, FoodId, FoodItem, NewFoodItem};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use thiserror::Error;
use tracing::debug;
use url::Url;

const FOODS_PATH: &str = "foods";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid base url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: Method,
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("could not decode response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// The four verbs the remote menu store understands.
#[async_trait]
pub trait FoodsApi: Send + Sync {
    async fn list(&self) -> ApiResult<Vec<FoodItem>>;
    async fn create(&self, item: &NewFoodItem) -> ApiResult<FoodItem>;
    async fn update(&self, item: &FoodItem) -> ApiResult<FoodItem>;
    async fn delete(&self, id: FoodId) -> ApiResult<()>;
}

pub struct HttpFoodsApi {
    http: Client,
    base_url: Url,
}

impl HttpFoodsApi {
    pub fn new(cfg: &ClientConfig) -> ApiResult<Self> {
        let base_url = Url::parse(&cfg.base_url).map_err(|e| ApiError::InvalidUrl {
            url: cfg.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: cfg.base_url.clone(),
                reason: "url cannot carry a path".into(),
            });
        }
        let http = Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.request_timeout)
            .build()?;
        Ok(Self { http, base_url })
    }

    /// Append path segments to the base url, keeping any base path intact.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn foods_url(&self) -> Url {
        self.endpoint(&[FOODS_PATH])
    }

    fn food_url(&self, id: FoodId) -> Url {
        self.endpoint(&[FOODS_PATH, &id.to_string()])
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder + Send,
    ) -> ApiResult<Response> {
        debug!(%method, %url, "sending request");
        let resp = build(self.http.request(method.clone(), url.clone()))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                method,
                url: url.to_string(),
                status,
                body,
            });
        }
        debug!(%method, %url, %status, "request completed");
        Ok(resp)
    }

    async fn decode<T: serde::de::DeserializeOwned>(resp: Response) -> ApiResult<T> {
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl FoodsApi for HttpFoodsApi {
    async fn list(&self) -> ApiResult<Vec<FoodItem>> {
        let resp = self.send(Method::GET, self.foods_url(), |r| r).await?;
        Self::decode(resp).await
    }

    async fn create(&self, item: &NewFoodItem) -> ApiResult<FoodItem> {
        let resp = self
            .send(Method::POST, self.foods_url(), |r| r.json(item))
            .await?;
        Self::decode(resp).await
    }

    async fn update(&self, item: &FoodItem) -> ApiResult<FoodItem> {
        let resp = self
            .send(Method::PUT, self.food_url(item.id), |r| r.json(item))
            .await?;
        Self::decode(resp).await
    }

    async fn delete(&self, id: FoodId) -> ApiResult<()> {
        self.send(Method::DELETE, self.food_url(id), |r| r).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
