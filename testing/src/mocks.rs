//! In-memory [`ApiService`] for effect tests.
//!
//! Responses are scripted per method and path. Each route holds a queue of
//! responses: they are served in order and the last one repeats. Every call
//! is logged with its start and finish instants so tests can assert on
//! sequencing and cancellation.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use storefront_core::error::HttpError;
use storefront_core::service::{ApiService, RequestOptions};

/// HTTP method of a scripted route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// One call observed by the mock
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// HTTP method
    pub method: Method,
    /// Resource path as passed by the caller
    pub path: String,
    /// JSON body, for methods that send one
    pub body: Option<Value>,
    /// Request headers
    pub headers: BTreeMap<String, String>,
    /// Query parameters
    pub params: Vec<(String, String)>,
    /// When the call started
    pub started: Instant,
    /// When the call produced its response; `None` if it was cancelled
    pub finished: Option<Instant>,
}

#[derive(Clone)]
struct Scripted {
    response: Result<Value, HttpError>,
    headers: BTreeMap<String, String>,
    delay: Duration,
}

#[derive(Default)]
struct MockState {
    routes: HashMap<(Method, String), VecDeque<Scripted>>,
    calls: Vec<RecordedCall>,
}

/// Scripted [`ApiService`] implementation
///
/// Clones share the same script and call log.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use storefront_testing::{Method, MockApiService};
///
/// let api = MockApiService::new();
/// api.respond(Method::Get, "customers/-", json!({ "customerNo": "OilCorp" }));
/// assert!(api.calls().is_empty());
/// ```
#[derive(Clone, Default)]
pub struct MockApiService {
    state: Arc<Mutex<MockState>>,
}

impl fmt::Debug for MockApiService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockApiService")
            .field("calls", &self.lock().calls.len())
            .finish_non_exhaustive()
    }
}

impl MockApiService {
    /// Create a mock with no scripted routes
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful response
    pub fn respond(&self, method: Method, path: impl Into<String>, body: Value) {
        self.script(method, path.into(), Ok(body), Duration::ZERO);
    }

    /// Script a successful response carrying response headers
    pub fn respond_with_headers<'a>(
        &self,
        method: Method,
        path: impl Into<String>,
        body: Value,
        headers: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
            .collect();
        self.push(method, path.into(), Scripted {
            response: Ok(body),
            headers,
            delay: Duration::ZERO,
        });
    }

    /// Script a successful response that arrives after `delay`
    pub fn respond_after(&self, method: Method, path: impl Into<String>, body: Value, delay: Duration) {
        self.script(method, path.into(), Ok(body), delay);
    }

    /// Script a failed response
    pub fn fail(&self, method: Method, path: impl Into<String>, error: HttpError) {
        self.script(method, path.into(), Err(error), Duration::ZERO);
    }

    /// Script a failed response that arrives after `delay`
    pub fn fail_after(&self, method: Method, path: impl Into<String>, error: HttpError, delay: Duration) {
        self.script(method, path.into(), Err(error), delay);
    }

    /// Every call observed so far, in start order
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Calls to one route
    #[must_use]
    pub fn calls_to(&self, method: Method, path: &str) -> Vec<RecordedCall> {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.method == method && call.path == path)
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn script(&self, method: Method, path: String, response: Result<Value, HttpError>, delay: Duration) {
        self.push(method, path, Scripted {
            response,
            headers: BTreeMap::new(),
            delay,
        });
    }

    fn push(&self, method: Method, path: String, scripted: Scripted) {
        self.lock().routes.entry((method, path)).or_default().push_back(scripted);
    }

    fn next_response(&self, method: Method, path: &str) -> Scripted {
        let mut state = self.lock();
        let scripted = state
            .routes
            .get_mut(&(method, path.to_string()))
            .and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            });

        scripted.unwrap_or_else(|| Scripted {
            response: Err(HttpError::new(404).with_message(format!("no mock response for {method} {path}"))),
            headers: BTreeMap::new(),
            delay: Duration::ZERO,
        })
    }

    fn exchange<T>(
        &self,
        method: Method,
        path: &str,
        body: Result<Option<Value>, HttpError>,
        options: RequestOptions,
    ) -> impl Future<Output = Result<T, HttpError>> + Send
    where
        T: DeserializeOwned + Send,
    {
        let response = self.exchange_with_headers(method, path, body, options);
        async move { response.await.map(|(value, _)| value) }
    }

    fn exchange_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Result<Option<Value>, HttpError>,
        options: RequestOptions,
    ) -> impl Future<Output = Result<(T, BTreeMap<String, String>), HttpError>> + Send
    where
        T: DeserializeOwned + Send,
    {
        let this = self.clone();
        let path = path.to_string();

        async move {
            let body = body?;
            let index = {
                let mut state = this.lock();
                state.calls.push(RecordedCall {
                    method,
                    path: path.clone(),
                    body,
                    headers: options.headers().clone(),
                    params: options.params().to_vec(),
                    started: Instant::now(),
                    finished: None,
                });
                state.calls.len() - 1
            };

            let scripted = this.next_response(method, &path);
            if !scripted.delay.is_zero() {
                tokio::time::sleep(scripted.delay).await;
            }

            if let Some(call) = this.lock().calls.get_mut(index) {
                call.finished = Some(Instant::now());
            }

            let value = scripted.response?;
            let decoded = serde_json::from_value(value).map_err(|error| {
                HttpError::transport(format!("invalid response body for {method} {path}: {error}"))
            })?;
            Ok((decoded, scripted.headers))
        }
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Option<Value>, HttpError> {
    serde_json::to_value(body)
        .map(Some)
        .map_err(|error| HttpError::transport(format!("invalid request body: {error}")))
}

impl ApiService for MockApiService {
    fn get<T>(&self, path: &str, options: RequestOptions) -> impl Future<Output = Result<T, HttpError>> + Send
    where
        T: DeserializeOwned + Send,
    {
        self.exchange(Method::Get, path, Ok(None), options)
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
        self.exchange(Method::Post, path, encode_body(body), options)
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
        self.exchange(Method::Put, path, encode_body(body), options)
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
        self.exchange(Method::Patch, path, encode_body(body), options)
    }

    fn delete<T>(&self, path: &str, options: RequestOptions) -> impl Future<Output = Result<T, HttpError>> + Send
    where
        T: DeserializeOwned + Send,
    {
        self.exchange(Method::Delete, path, Ok(None), options)
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
        let response = self.exchange_with_headers(Method::Get, path, Ok(None), options);
        async move {
            let (value, mut headers) = response.await?;
            Ok((value, headers.remove(&header.to_ascii_lowercase())))
        }
    }
}
