//! reqwest-backed [`ApiService`].

use crate::config::{ConfigError, StorefrontConfig};
use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use storefront_core::error::HttpError;
use storefront_core::service::{ApiService, RequestOptions};

/// REST client for the storefront backend.
///
/// - joins the configured base URL and the resource path
/// - sends `Accept: application/json` unless the caller overrides it
/// - maps non-2xx responses to [`HttpError`] with the body as message
/// - maps transport and decoding failures to status `0`
/// - decodes an empty body as JSON `null`
#[derive(Clone)]
pub struct RestApiService {
    client: Client,
    base_url: String,
    locale: Option<String>,
}

impl std::fmt::Debug for RestApiService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestApiService")
            .field("base_url", &self.base_url)
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

impl RestApiService {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an invalid configuration or when the
    /// HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.rest_url.trim_end_matches('/').to_string(),
            locale: config.locale.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Result<Value, serde_json::Error>>,
        options: RequestOptions,
    ) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.exchange(method, path, body, options, None)
            .await
            .map(|(value, _)| value)
    }

    /// Send a request and decode the body, returning response header
    /// `capture` alongside it when asked for.
    #[tracing::instrument(skip_all, name = "rest_request", fields(method = %method, path = %path))]
    async fn exchange<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Result<Value, serde_json::Error>>,
        options: RequestOptions,
        capture: Option<&'static str>,
    ) -> Result<(T, Option<String>), HttpError>
    where
        T: DeserializeOwned,
    {
        let mut request = self.client.request(method, self.url(path));

        let overrides_accept = options
            .headers()
            .keys()
            .any(|name| name.eq_ignore_ascii_case("accept"));
        if !overrides_accept {
            request = request.header("Accept", "application/json");
        }
        if let Some(locale) = &self.locale {
            request = request.header("Accept-Language", locale);
        }
        for (name, value) in options.headers() {
            request = request.header(name, value);
        }
        if !options.params().is_empty() {
            request = request.query(options.params());
        }
        if let Some(body) = body {
            let body = body.map_err(|e| HttpError::transport(format!("Request body not serializable: {e}")))?;
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Request failed");
            HttpError::transport(e.to_string())
        })?;

        if !response.status().is_success() {
            let error = error_from(response).await;
            tracing::debug!(status = error.status, "Request rejected");
            return Err(error);
        }

        let captured = capture
            .and_then(|name| response.headers().get(name))
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| HttpError::transport(e.to_string()))?;
        let payload = if bytes.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_value(Value::Null)
        } else {
            serde_json::from_slice(&bytes)
        };
        payload
            .map(|value| (value, captured))
            .map_err(|e| HttpError::transport(format!("Response not decodable: {e}")))
    }
}

async fn error_from(response: Response) -> HttpError {
    let status = response.status().as_u16();
    let headers: BTreeMap<String, String> = response
        .headers()
        .iter()
        .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
        .collect();
    let body = response.text().await.unwrap_or_default();

    HttpError {
        status,
        message: (!body.is_empty()).then_some(body),
        headers: (!headers.is_empty()).then_some(headers),
    }
}

impl ApiService for RestApiService {
    fn get<T>(&self, path: &str, options: RequestOptions) -> impl Future<Output = Result<T, HttpError>> + Send
    where
        T: DeserializeOwned + Send,
    {
        self.send(Method::GET, path, None, options)
    }

    fn post<T, B>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> impl Future<Output = Result<T, HttpError>> + Send
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync + ?Sized,
    {
        self.send(Method::POST, path, Some(serde_json::to_value(body)), options)
    }

    fn put<T, B>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> impl Future<Output = Result<T, HttpError>> + Send
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync + ?Sized,
    {
        self.send(Method::PUT, path, Some(serde_json::to_value(body)), options)
    }

    fn patch<T, B>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> impl Future<Output = Result<T, HttpError>> + Send
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync + ?Sized,
    {
        self.send(Method::PATCH, path, Some(serde_json::to_value(body)), options)
    }

    fn delete<T>(&self, path: &str, options: RequestOptions) -> impl Future<Output = Result<T, HttpError>> + Send
    where
        T: DeserializeOwned + Send,
    {
        self.send(Method::DELETE, path, None, options)
    }

    fn get_with_header<T>(
        &self,
        path: &str,
        options: RequestOptions,
        header: &'static str,
    ) -> impl Future<Output = Result<(T, Option<String>), HttpError>> + Send
    where
        T: DeserializeOwned + Send,
    {
        self.exchange(Method::GET, path, None, options, Some(header))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_url_joining() {
        let config = StorefrontConfig::new("https://shop.example.com/rest/-/");
        let api = RestApiService::new(&config).unwrap();

        assert_eq!(api.url("customers/-"), "https://shop.example.com/rest/-/customers/-");
        assert_eq!(api.url("/baskets/current"), "https://shop.example.com/rest/-/baskets/current");
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = StorefrontConfig::new("not a url");
        assert!(matches!(RestApiService::new(&config), Err(ConfigError::InvalidRestUrl(_))));
    }
}
