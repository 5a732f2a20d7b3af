//! # API Client
//!
//! `reqwest` client for the invoicing REST API.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         One API Call                                    │
//! │                                                                         │
//! │  endpoint method ──► build request ──► + Authorization: Bearer <jwt>   │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                                         send (timeout)                  │
//! │                          ┌───────────────────┼──────────────────┐       │
//! │                          ▼                   ▼                  ▼       │
//! │                    network error        non-2xx            2xx / 204    │
//! │                    ApiError::Network    ApiError::Status   decode body  │
//! │                          │                   │                          │
//! │                          └──► Notifier::error (exactly once) ◄──┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A 2xx body is decoded only when the response says it is JSON. Anything
//! else (`204`, an empty body, `text/plain`) decodes as `null`, so callers
//! expecting `Option<_>` or `()` still succeed.
//!
//! ## Error Message Extraction
//! For a non-2xx JSON body, the message is the first non-empty of: the body
//! itself when it is a string, then `message`, `error`, `title`. Otherwise
//! the status reason phrase, then `HTTP <code>`.
//!
//! No call is retried.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use serde_json::{json, Value};
use tally_core::listing::InvoiceFilter;
use tally_core::types::{
    Invoice, InvoiceId, InvoicePayload, InvoiceSummary, Item, ItemCategory, ItemId, ItemPayload,
    LoginRequest, LoginResponse, SignupRequest,
};
use tally_core::validation::require_text;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::notify::Notifier;
use crate::session::{AuthToken, Session};

/// Client for the invoicing API. Cheap to clone; clones share the HTTP
/// connection pool and the session.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        session: Session,
        notifier: Arc<dyn Notifier>,
    ) -> ApiResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("tally/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(ApiClient {
            http,
            base_url: config.api_root().to_string(),
            session,
            notifier,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Logs in and stores the returned token in the session.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.send_json(Method::POST, "/auth/login", &body).await?;

        self.session.set(AuthToken::new(response.token.clone())).await;
        info!(user_id = response.user_id, company_id = response.company_id, "Logged in");
        Ok(response)
    }

    pub async fn logout(&self) {
        self.session.clear().await;
    }

    /// Creates an account and its company. Sent as a multipart form.
    ///
    /// The session is left alone; the new account logs in separately.
    pub async fn signup(&self, request: &SignupRequest) -> ApiResult<Option<LoginResponse>> {
        request.validate()?;

        let form = request
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));
        let builder = self.http.post(self.url("/auth/signup")).multipart(form);

        let body: Option<Value> = self.call(Method::POST, "/auth/signup", builder).await?;
        let response = body.and_then(|value| serde_json::from_value::<LoginResponse>(value).ok());
        info!(created = response.is_some(), "Signed up");
        Ok(response)
    }

    // =========================================================================
    // Items
    // =========================================================================

    pub async fn list_items(&self) -> ApiResult<Vec<Item>> {
        self.get("/Item/GetList", &[]).await
    }

    pub async fn get_item(&self, id: ItemId) -> ApiResult<Item> {
        self.get(&format!("/Item/{}", id), &[]).await
    }

    /// `PUT /Item` when the payload names an item, `POST /Item` otherwise.
    pub async fn save_item(&self, payload: &ItemPayload) -> ApiResult<Item> {
        payload.validate()?;
        let method = if payload.is_update() { Method::PUT } else { Method::POST };
        self.send_json(method, "/Item", payload).await
    }

    pub async fn delete_item(&self, id: ItemId) -> ApiResult<()> {
        self.delete(&format!("/Item/{}", id)).await
    }

    // =========================================================================
    // Item Categories
    // =========================================================================

    pub async fn list_categories(&self) -> ApiResult<Vec<ItemCategory>> {
        self.get("/itemcategories", &[]).await
    }

    pub async fn create_category(&self, name: &str) -> ApiResult<ItemCategory> {
        let name = require_text("categoryName", name)?;
        self.send_json(Method::POST, "/itemcategories", &json!({ "categoryName": name }))
            .await
    }

    pub async fn update_category(&self, id: i64, name: &str) -> ApiResult<ItemCategory> {
        let name = require_text("categoryName", name)?;
        self.send_json(
            Method::PUT,
            &format!("/itemcategories/{}", id),
            &json!({ "categoryName": name }),
        )
        .await
    }

    pub async fn delete_category(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/itemcategories/{}", id)).await
    }

    // =========================================================================
    // Invoices
    // =========================================================================

    pub async fn list_invoices(&self, filter: &InvoiceFilter) -> ApiResult<Vec<InvoiceSummary>> {
        self.get("/Invoice/GetList", &filter.query_pairs()).await
    }

    pub async fn get_invoice(&self, id: InvoiceId) -> ApiResult<Invoice> {
        self.get(&format!("/Invoice/{}", id), &[]).await
    }

    /// `PUT /Invoice` when the payload carries a positive id, `POST` otherwise.
    ///
    /// Returns the persisted invoice when the server echoes one back.
    pub async fn save_invoice(&self, payload: &InvoicePayload) -> ApiResult<Option<Invoice>> {
        let method = if payload.is_update() { Method::PUT } else { Method::POST };
        debug!(
            %method,
            invoice_id = ?payload.invoice_id,
            lines = payload.lines.len(),
            "Saving invoice"
        );

        let body: Option<Value> = self.send_json(method, "/Invoice", payload).await?;
        Ok(body.and_then(|value| match serde_json::from_value::<Invoice>(value) {
            Ok(invoice) => Some(invoice),
            Err(e) => {
                debug!(error = %e, "Save response is not an invoice");
                None
            }
        }))
    }

    pub async fn delete_invoice(&self, id: InvoiceId) -> ApiResult<()> {
        self.delete(&format!("/Invoice/{}", id)).await
    }

    // =========================================================================
    // Request Plumbing
    // =========================================================================

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let request = self.http.get(self.url(path)).query(query);
        self.call(Method::GET, path, request).await
    }

    async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.http.request(method.clone(), self.url(path)).json(body);
        self.call(method, path, request).await
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        let request = self.http.delete(self.url(path));
        let _: Option<IgnoredAny> = self.call(Method::DELETE, path, request).await?;
        Ok(())
    }

    /// Runs one request and reports a failure exactly once.
    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        match self.execute(request).await {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(%method, path, error = %err, "API call failed");
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }

    async fn execute<T: DeserializeOwned>(&self, mut request: RequestBuilder) -> ApiResult<T> {
        if let Some(bearer) = self.session.bearer().await {
            request = request.header(AUTHORIZATION, bearer);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(serde_json::from_value(Value::Null)?);
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("json"));
        let text = response.text().await?;

        if !status.is_success() {
            let body = if is_json {
                serde_json::from_str::<Value>(&text).ok()
            } else {
                None
            };
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(status, body.as_ref()),
            });
        }

        if !is_json || text.trim().is_empty() {
            if !text.trim().is_empty() {
                debug!(status = status.as_u16(), "Ignoring non-JSON success body");
            }
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Human-readable message for a failed response.
pub fn error_message(status: StatusCode, body: Option<&Value>) -> String {
    let non_empty = |v: &Value| {
        v.as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let from_body = body.and_then(|data| match data {
        Value::String(_) => non_empty(data),
        Value::Object(map) => ["message", "error", "title"]
            .iter()
            .find_map(|key| map.get(*key).and_then(non_empty)),
        _ => None,
    });

    from_body
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
