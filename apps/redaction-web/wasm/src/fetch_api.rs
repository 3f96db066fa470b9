//! `fetch`-based implementation of the documents API

use crate::js_error_text;
use async_trait::async_trait;
use redaction_core::api::routes;
use redaction_core::{RestrictionApi, RestrictionError, Result};
use redaction_types::{
    ApiEnvelope, CreateRestrictionBody, DocumentRecord, RestrictionRecord, SchemaError,
};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

pub struct FetchRestrictionApi {
    base_url: String,
    api_token: Option<String>,
}

impl FetchRestrictionApi {
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and return the status code and raw body
    async fn send(&self, method: &str, url: &str, body: Option<String>) -> Result<(u16, String)> {
        let window = web_sys::window()
            .ok_or_else(|| RestrictionError::Network("No window object available".into()))?;

        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        if let Some(body) = &body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(url, &opts).map_err(network)?;
        let headers = request.headers();
        headers.set("Accept", "application/json").map_err(network)?;
        if body.is_some() {
            headers
                .set("Content-Type", "application/json")
                .map_err(network)?;
        }
        if let Some(token) = &self.api_token {
            headers
                .set("Authorization", &format!("Bearer {}", token))
                .map_err(network)?;
        }

        let response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(network)?;
        let response: Response = response.dyn_into().map_err(network)?;
        let status = response.status();

        let text = JsFuture::from(response.text().map_err(network)?)
            .await
            .map_err(network)?
            .as_string()
            .unwrap_or_default();

        Ok((status, text))
    }

    /// Send a request and unwrap the `{success, data, message}` envelope.
    ///
    /// `not_found` is returned when the server reports the resource missing.
    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        url: &str,
        body: Option<String>,
        not_found: RestrictionError,
    ) -> Result<Option<T>> {
        let (status, text) = self.send(method, url, body).await?;
        interpret(status, &text, method, url, not_found)
    }
}

/// Map a response status and body onto the envelope payload
fn interpret<T: DeserializeOwned>(
    status: u16,
    text: &str,
    method: &str,
    url: &str,
    not_found: RestrictionError,
) -> Result<Option<T>> {
    if status == 404 {
        return Err(not_found);
    }
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(text)
            .ok()
            .and_then(|env| env.message)
            .unwrap_or_else(|| format!("{} {} failed", method, url));
        return Err(RestrictionError::Server { status, message });
    }
    if text.trim().is_empty() {
        return Ok(None);
    }

    let envelope: ApiEnvelope<T> =
        serde_json::from_str(text).map_err(|e| RestrictionError::Decode(e.to_string()))?;
    envelope.into_result().map_err(|rejection| {
        if rejection.is_not_found() {
            not_found
        } else {
            RestrictionError::Rejected(
                rejection
                    .message
                    .unwrap_or_else(|| "The request was rejected".to_string()),
            )
        }
    })
}

fn network(err: JsValue) -> RestrictionError {
    RestrictionError::Network(js_error_text(&err))
}

fn missing_document(document_id: &str) -> RestrictionError {
    RestrictionError::DocumentNotFound(document_id.to_string())
}

#[async_trait(?Send)]
impl RestrictionApi for FetchRestrictionApi {
    async fn list_restrictions(&self, document_id: &str) -> Result<Vec<RestrictionRecord>> {
        let url = routes::restrictions(&self.base_url, document_id);
        let records = self
            .request::<Vec<RestrictionRecord>>("GET", &url, None, missing_document(document_id))
            .await?;
        Ok(records.unwrap_or_default())
    }

    async fn create_restriction(
        &self,
        document_id: &str,
        body: &CreateRestrictionBody,
    ) -> Result<()> {
        let url = routes::create_restriction(&self.base_url, document_id);
        let body =
            serde_json::to_string(body).map_err(|e| RestrictionError::Decode(e.to_string()))?;
        self.request::<serde_json::Value>("POST", &url, Some(body), missing_document(document_id))
            .await?;
        Ok(())
    }

    async fn delete_restriction(&self, document_id: &str, restriction_id: &str) -> Result<()> {
        let url = routes::restriction(&self.base_url, document_id, restriction_id);
        let gone = RestrictionError::NotFound(restriction_id.to_string());
        self.request::<serde_json::Value>("DELETE", &url, None, gone)
            .await?;
        Ok(())
    }

    async fn fetch_document(&self, document_id: &str) -> Result<DocumentRecord> {
        let url = routes::document(&self.base_url, document_id);
        self.request::<DocumentRecord>("GET", &url, None, missing_document(document_id))
            .await?
            .ok_or_else(|| SchemaError::MissingData.into())
    }
}
