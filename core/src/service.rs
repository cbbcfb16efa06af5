//! The REST capability effects call into.
//!
//! The store never performs I/O itself. Effects receive an [`ApiService`]
//! implementation and build resource paths from action payloads and state,
//! encoding every dynamic segment with [`encode_resource_id`].

use crate::error::HttpError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;

/// Per-request headers and query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    headers: BTreeMap<String, String>,
    params: Vec<(String, String)>,
}

impl RequestOptions {
    /// Empty options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a request header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Request headers
    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Query parameters, in insertion order
    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Request/response exchange with the storefront REST backend.
///
/// Implementations report non-2xx responses and transport failures as
/// [`HttpError`]; a transport failure has status `0`. Timeouts are the
/// implementation's concern.
pub trait ApiService: Clone + Send + Sync + 'static {
    /// `GET path`
    fn get<T>(&self, path: &str, options: RequestOptions) -> impl Future<Output = Result<T, HttpError>> + Send
    where
        T: DeserializeOwned + Send;

    /// `POST path` with a JSON body
    fn post<T, B>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> impl Future<Output = Result<T, HttpError>> + Send
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync + ?Sized;

    /// `PUT path` with a JSON body
    fn put<T, B>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> impl Future<Output = Result<T, HttpError>> + Send
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync + ?Sized;

    /// `PATCH path` with a JSON body
    fn patch<T, B>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> impl Future<Output = Result<T, HttpError>> + Send
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync + ?Sized;

    /// `DELETE path`
    fn delete<T>(&self, path: &str, options: RequestOptions) -> impl Future<Output = Result<T, HttpError>> + Send
    where
        T: DeserializeOwned + Send;

    /// `GET path`, also returning the value of response header `header`.
    ///
    /// Transports that cannot see response headers keep this default and
    /// report no header.
    fn get_with_header<T>(
        &self,
        path: &str,
        options: RequestOptions,
        header: &'static str,
    ) -> impl Future<Output = Result<(T, Option<String>), HttpError>> + Send
    where
        T: DeserializeOwned + Send,
    {
        let _ = header;
        let response = self.get::<T>(path, options);
        async move { response.await.map(|value| (value, None)) }
    }
}

/// URL-segment encode an id for use inside a resource path
#[must_use]
pub fn encode_resource_id(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

/// Responses wrapped in a `data` member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Payload
    pub data: T,
}

impl<T> Envelope<T> {
    /// Unwrap the payload
    pub fn into_inner(self) -> T {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_resource_id() {
        assert_eq!(encode_resource_id("plain-id_1"), "plain-id_1");
        assert_eq!(encode_resource_id("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn test_request_options_builder() {
        let options = RequestOptions::new()
            .with_header("Accept", "application/json")
            .with_param("page", "1")
            .with_param("page", "2");

        assert_eq!(options.headers().get("Accept").map(String::as_str), Some("application/json"));
        assert_eq!(options.params().len(), 2);
    }

    #[test]
    fn test_envelope_unwraps_data() {
        let envelope: Result<Envelope<Vec<u32>>, _> = serde_json::from_str(r#"{"data":[1,2]}"#);
        assert_eq!(envelope.map(Envelope::into_inner).unwrap_or_default(), vec![1, 2]);
    }
}
