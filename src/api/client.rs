//! Typed API client
//!
//! Builds resource paths from `Resource::PATH`, sends requests through a
//! `Transport`, unwraps the response envelopes and classifies error
//! envelopes into `LedgerError`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::envelope::{codes, ApiError, ErrorEnvelope, ItemEnvelope, ListEnvelope, Page};
use super::query::ListQuery;
use super::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::{LedgerError, LedgerResult};
use crate::models::Resource;

pub struct ApiClient {
    transport: Box<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    pub fn list<R: Resource>(&self, query: &ListQuery) -> LedgerResult<Page<R>> {
        let request = ApiRequest::new(Method::Get, collection_path::<R>()).query(query.to_pairs());
        let body = self.send::<R>(&request, None)?;
        let page: ListEnvelope<R> = serde_json::from_value(body)?;
        Ok(page)
    }

    pub fn get<R: Resource>(&self, id: R::Id) -> LedgerResult<R> {
        let request = ApiRequest::new(Method::Get, item_path::<R>(&id));
        self.item::<R, R>(&request, &id.to_string())
    }

    pub fn create<R: Resource>(&self, input: &R::Input) -> LedgerResult<R> {
        let request =
            ApiRequest::new(Method::Post, collection_path::<R>()).body(serde_json::to_value(input)?);
        self.item::<R, R>(&request, "")
    }

    pub fn update<R: Resource>(&self, id: R::Id, input: &R::Input) -> LedgerResult<R> {
        let request =
            ApiRequest::new(Method::Put, item_path::<R>(&id)).body(serde_json::to_value(input)?);
        self.item::<R, R>(&request, &id.to_string())
    }

    /// Delete an entity; soft-deleted resources come back deactivated
    pub fn delete<R: Resource>(&self, id: R::Id) -> LedgerResult<Option<R>> {
        let request = ApiRequest::new(Method::Delete, item_path::<R>(&id));
        let body = self.send::<R>(&request, Some(&id.to_string()))?;
        let envelope: ItemEnvelope<Option<R>> = serde_json::from_value(body)?;
        Ok(envelope.data)
    }

    /// Call an action endpoint such as `close` or `reopen`
    pub fn action<R: Resource>(&self, id: R::Id, action: &str) -> LedgerResult<R> {
        let request = ApiRequest::new(
            Method::Post,
            format!("{}/{}", item_path::<R>(&id), action),
        );
        self.item::<R, R>(&request, &id.to_string())
    }

    fn item<R: Resource, T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        identifier: &str,
    ) -> LedgerResult<T> {
        let body = self.send::<R>(request, Some(identifier))?;
        let envelope: ItemEnvelope<T> = serde_json::from_value(body)?;
        if let Some(message) = envelope.message {
            log::info!("{}", message);
        }
        Ok(envelope.data)
    }

    fn send<R: Resource>(
        &self,
        request: &ApiRequest,
        identifier: Option<&str>,
    ) -> LedgerResult<Value> {
        let response = self.transport.execute(request)?;
        if response.is_success() {
            return Ok(response.body);
        }
        Err(classify(R::LABEL, identifier.unwrap_or_default(), response))
    }
}

fn collection_path<R: Resource>() -> String {
    format!("/api/{}", R::PATH)
}

fn item_path<R: Resource>(id: &R::Id) -> String {
    format!("/api/{}/{}", R::PATH, id)
}

/// Map a failed response onto the error taxonomy
fn classify(entity_type: &'static str, identifier: &str, response: ApiResponse) -> LedgerError {
    let status = response.status;
    let mut error = match serde_json::from_value::<ErrorEnvelope>(response.body) {
        Ok(envelope) => envelope.error,
        Err(_) => ApiError::new(
            status,
            &format!("HTTP_{}", status),
            format!("Request failed with status {}", status),
        ),
    };
    error.status = status;

    if let Some(fields) = error.details.take().filter(|d| !d.is_empty()) {
        return LedgerError::Validation {
            message: error.message,
            fields,
        };
    }
    if status == 404 || error.code == codes::NOT_FOUND {
        return LedgerError::NotFound {
            entity_type,
            identifier: identifier.to_string(),
        };
    }
    if let Some(rule) = error.rule.take() {
        return LedgerError::BusinessRule {
            rule,
            message: error.message,
        };
    }
    if error.code == codes::VALIDATION {
        return LedgerError::validation(error.message);
    }
    LedgerError::Api(error)
}
