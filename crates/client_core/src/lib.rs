use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::ProductId,
    error::ApiError,
    protocol::{
        AckResponse, Envelope, ProductListResponse, ProductRecord, SigninRequest, SigninResponse,
    },
};
use tracing::{debug, info, warn};
use url::Url;

pub mod error;
pub mod session;

pub use error::CatalogError;
pub use session::{
    CookieFileStore, MemorySessionStore, SessionCookie, SessionError, SessionStore, TokenSupplier,
};

/// Route table for one catalog backend: `api_base` is the server root and
/// `api_path` the shop namespace under `/api/`.
#[derive(Debug, Clone)]
pub struct CatalogEndpoints {
    base: Url,
    api_path: String,
}

impl CatalogEndpoints {
    pub fn new(api_base: &str, api_path: &str) -> Result<Self, CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidBase {
            base: api_base.to_string(),
            reason,
        };
        let base = Url::parse(api_base.trim()).map_err(|err| invalid(err.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(invalid("expected an http(s) url".to_string()));
        }
        let api_path = api_path.trim().trim_matches('/').to_string();
        if api_path.is_empty() {
            return Err(invalid("api path must not be empty".to_string()));
        }
        Ok(Self { base, api_path })
    }

    fn join(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn signin(&self) -> Url {
        self.join(&["admin", "signin"])
    }

    pub fn user_check(&self) -> Url {
        self.join(&["api", "user", "check"])
    }

    pub fn products(&self) -> Url {
        self.join(&["api", &self.api_path, "admin", "products"])
    }

    pub fn product(&self) -> Url {
        self.join(&["api", &self.api_path, "admin", "product"])
    }

    pub fn product_item(&self, id: &ProductId) -> Url {
        self.join(&["api", &self.api_path, "admin", "product", id.as_str()])
    }
}

/// Catalog operations the console needs from the backend.
#[async_trait]
pub trait CatalogHandle: Send + Sync {
    async fn signin(&self, username: &str, password: &str)
        -> Result<SigninResponse, CatalogError>;
    async fn check_session(&self) -> Result<(), CatalogError>;
    async fn list(&self) -> Result<Vec<ProductRecord>, CatalogError>;
    async fn create(&self, payload: &Envelope<ProductRecord>) -> Result<AckResponse, CatalogError>;
    async fn update(
        &self,
        id: &ProductId,
        payload: &Envelope<ProductRecord>,
    ) -> Result<AckResponse, CatalogError>;
    async fn delete(&self, id: &ProductId) -> Result<AckResponse, CatalogError>;
}

/// HTTP client for the product admin API.
///
/// Every request after sign-in carries the token from `tokens` verbatim in
/// the `Authorization` header. Calls are single-shot; nothing is retried.
pub struct CatalogClient {
    http: Client,
    endpoints: CatalogEndpoints,
    tokens: Arc<dyn TokenSupplier>,
}

impl CatalogClient {
    pub fn new(endpoints: CatalogEndpoints, tokens: Arc<dyn TokenSupplier>) -> Self {
        Self::with_http_client(Client::new(), endpoints, tokens)
    }

    pub fn with_http_client(
        http: Client,
        endpoints: CatalogEndpoints,
        tokens: Arc<dyn TokenSupplier>,
    ) -> Self {
        Self {
            http,
            endpoints,
            tokens,
        }
    }

    pub fn endpoints(&self) -> &CatalogEndpoints {
        &self.endpoints
    }

    fn authorized(&self, method: Method, url: Url) -> Result<RequestBuilder, CatalogError> {
        let token = self
            .tokens
            .current_token()
            .ok_or(CatalogError::MissingSession)?;
        Ok(self
            .http
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, token))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<String, CatalogError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let source = ApiError::from_response(status.as_u16(), &body);
            warn!(status = status.as_u16(), message = %source.message, "catalog request rejected");
            return Err(CatalogError::Status {
                status: status.as_u16(),
                source,
            });
        }
        Ok(body)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, CatalogError> {
        let body = self.execute(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Like [`Self::send`], but an empty success body counts as a plain ack.
    async fn send_ack(&self, request: RequestBuilder) -> Result<AckResponse, CatalogError> {
        let body = self.execute(request).await?;
        if body.trim().is_empty() {
            return Ok(AckResponse::default());
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl CatalogHandle for CatalogClient {
    async fn signin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SigninResponse, CatalogError> {
        let request = self.http.post(self.endpoints.signin()).json(&SigninRequest {
            username: username.to_string(),
            password: password.to_string(),
        });
        let response: SigninResponse = self.send(request).await?;
        info!(uid = %response.uid, expired = response.expired, "signed in");
        Ok(response)
    }

    async fn check_session(&self) -> Result<(), CatalogError> {
        let request = self.authorized(Method::POST, self.endpoints.user_check())?;
        self.send_ack(request).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        let request = self.authorized(Method::GET, self.endpoints.products())?;
        let response: ProductListResponse = self.send(request).await?;
        debug!(count = response.products.len(), "listed products");
        Ok(response.products)
    }

    async fn create(&self, payload: &Envelope<ProductRecord>) -> Result<AckResponse, CatalogError> {
        let request = self
            .authorized(Method::POST, self.endpoints.product())?
            .json(payload);
        let ack = self.send_ack(request).await?;
        info!(title = %payload.data.title, "created product");
        Ok(ack)
    }

    async fn update(
        &self,
        id: &ProductId,
        payload: &Envelope<ProductRecord>,
    ) -> Result<AckResponse, CatalogError> {
        let request = self
            .authorized(Method::PUT, self.endpoints.product_item(id))?
            .json(payload);
        let ack = self.send_ack(request).await?;
        info!(product_id = %id, "updated product");
        Ok(ack)
    }

    async fn delete(&self, id: &ProductId) -> Result<AckResponse, CatalogError> {
        let request = self.authorized(Method::DELETE, self.endpoints.product_item(id))?;
        let ack = self.send_ack(request).await?;
        info!(product_id = %id, "deleted product");
        Ok(ack)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
