//! Postman API client.
//!
//! Uses the public Postman REST API. The credential travels in the
//! `X-Api-Key` header on every request.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument};

use super::ResourceClient;
use crate::error::{Error, Result};
use crate::model::{Document, RemoteResource, ResourceKind};

/// Default Postman API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.getpostman.com";

/// Asynchronous Postman API client.
#[derive(Clone)]
pub struct PostmanClient {
    http: reqwest::Client,
    api_url: String,
}

impl PostmanClient {
    /// Create a client for `api_url` authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid header value or the HTTP
    /// client cannot be built.
    pub fn new(api_url: impl Into<String>, api_key: &str) -> Result<Self> {
        let api_url = api_url.into().trim_end_matches('/').to_string();

        let mut key = HeaderValue::from_str(api_key.trim())
            .map_err(|_| Error::Config("API key contains invalid characters".into()))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("X-Api-Key", key);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("postmgn/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::Client::builder().default_headers(headers).build()?;
        debug!(api_url = %api_url, "Created Postman client");

        Ok(Self { http, api_url })
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn collection_url(&self, kind: ResourceKind) -> String {
        format!("{}{}", self.api_url, kind.api_path())
    }

    fn item_url(&self, kind: ResourceKind, uid: &str) -> String {
        format!("{}{}/{}", self.api_url, kind.api_path(), uid)
    }
}

/// Turn a non-success response into [`Error::Api`], or hand back the JSON body.
async fn read_body(kind: ResourceKind, operation: &'static str, resp: Response) -> Result<Value> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let text = resp.text().await.unwrap_or_default();
    Err(Error::Api {
        kind,
        operation,
        status: status.as_u16(),
        message: error_message(status, &text),
    })
}

/// Pull a readable message out of a Postman error body.
///
/// Postman answers errors with `{"error": {"name": ..., "message": ...}}`;
/// anything else is passed through verbatim.
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));

    match error {
        Some(err) => {
            let name = err.get("name").and_then(Value::as_str);
            let message = err.get("message").and_then(Value::as_str);
            match (name, message) {
                (Some(n), Some(m)) => format!("{n}: {m}"),
                (Some(s), None) | (None, Some(s)) => s.to_string(),
                (None, None) => err.to_string(),
            }
        }
        None if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string(),
        None => body.trim().to_string(),
    }
}

/// Extract the resource listing from a list response.
fn parse_listing(kind: ResourceKind, body: Value) -> Result<Vec<RemoteResource>> {
    let Value::Object(mut map) = body else {
        return Err(Error::MalformedResponse {
            kind,
            operation: "list",
            message: "response is not a JSON object".into(),
        });
    };
    let items = map
        .remove(kind.plural())
        .ok_or_else(|| Error::MalformedResponse {
            kind,
            operation: "list",
            message: format!("missing `{}` array", kind.plural()),
        })?;

    serde_json::from_value(items).map_err(|e| Error::MalformedResponse {
        kind,
        operation: "list",
        message: e.to_string(),
    })
}

impl ResourceClient for PostmanClient {
    #[instrument(skip(self))]
    async fn list(&self, kind: ResourceKind) -> Result<Vec<RemoteResource>> {
        let resp = self.http.get(self.collection_url(kind)).send().await?;
        let body = read_body(kind, "list", resp).await?;
        let resources = parse_listing(kind, body)?;
        debug!(count = resources.len(), "Listed remote resources");
        Ok(resources)
    }

    #[instrument(skip(self))]
    async fn get(&self, kind: ResourceKind, uid: &str) -> Result<Document> {
        let resp = self.http.get(self.item_url(kind, uid)).send().await?;
        let body = read_body(kind, "get", resp).await?;
        Ok(Document::new(body))
    }

    #[instrument(skip(self, doc))]
    async fn create(&self, kind: ResourceKind, doc: &Document) -> Result<Document> {
        let resp = self
            .http
            .post(self.collection_url(kind))
            .json(doc)
            .send()
            .await?;
        let body = read_body(kind, "create", resp).await?;
        Ok(Document::new(body))
    }

    #[instrument(skip(self, doc))]
    async fn update(&self, kind: ResourceKind, uid: &str, doc: &Document) -> Result<Document> {
        let resp = self
            .http
            .put(self.item_url(kind, uid))
            .json(doc)
            .send()
            .await?;
        let body = read_body(kind, "update", resp).await?;
        Ok(Document::new(body))
    }
}
