// SPDX-License-Identifier: PMPL-1.0-or-later

use super::error::ApiError;
use super::interceptor::{
    BearerAuth, NoopRequest, NoopResponse, RequestInterceptor, ResponseInterceptor, StatusNotices,
};
use super::notice::Notifier;
use crate::config::ClientConfig;
use crate::storage::KeyValueStore;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Forwards request paths with a given prefix to another origin.
///
/// Only the development profile carries one: it plays the part of the dev
/// server forwarding `/api` calls to the local backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRule {
    pub prefix: String,
    pub target: Url,
}

impl ProxyRule {
    pub fn new(prefix: impl Into<String>, target: Url) -> Self {
        Self {
            prefix: prefix.into(),
            target,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// HTTP client bound to one base address, with one request hook and one
/// response hook.
pub struct ApiClient {
    inner: reqwest::Client,
    base_url: Url,
    proxy: Option<ProxyRule>,
    request_hook: Box<dyn RequestInterceptor>,
    response_hook: Box<dyn ResponseInterceptor>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("proxy", &self.proxy)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn builder(base_url: Url) -> ApiClientBuilder {
        ApiClientBuilder::new(base_url)
    }

    /// The standard wiring: bearer token from `store`, notices to `notifier`.
    pub fn from_config<S, N>(config: &ClientConfig, store: S, notifier: N) -> Result<Self, ApiError>
    where
        S: KeyValueStore + 'static,
        N: Notifier + 'static,
    {
        let mut builder = ApiClient::builder(config.base_url.clone())
            .request_interceptor(BearerAuth::new(store))
            .response_interceptor(StatusNotices::new(notifier));
        if let Some(rule) = &config.proxy {
            builder = builder.proxy(rule.clone());
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn proxy(&self) -> Option<&ProxyRule> {
        self.proxy.as_ref()
    }

    /// Absolute URL for a request path.
    ///
    /// Absolute `http(s)://` URLs are used as given. Otherwise the path is
    /// appended to the proxy target when the proxy rule matches, else to the
    /// base address.
    pub fn url_for(&self, path: &str) -> Result<Url, ApiError> {
        if let Ok(url) = Url::parse(path) {
            if matches!(url.scheme(), "http" | "https") {
                return Ok(url);
            }
        }
        let base = match &self.proxy {
            Some(rule) if rule.matches(path) => &rule.target,
            _ => &self.base_url,
        };
        let joined = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|err| ApiError::InvalidPath {
            path: path.to_string(),
            reason: err.to_string(),
        })
    }

    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.request(method, self.url_for(path)?))
    }

    /// Sends a request through both hooks.
    ///
    /// Any status outside 2xx becomes [`ApiError::Status`]. The response hook
    /// has already run by then, so 401/403 notices precede the error.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let mut request = builder.build().map_err(ApiError::Request)?;
        self.request_hook.on_request(&mut request);

        let method = request.method().clone();
        let url = request.url().to_string();
        debug!(%method, %url, "sending request");

        let response = self
            .inner
            .execute(request)
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        self.response_hook.on_response(status, response.url());
        debug!(%method, %url, %status, "response received");

        if status.is_success() {
            return Ok(response);
        }
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                debug!(%url, %status, error = %err, "could not read error response body");
                String::new()
            }
        };
        Err(ApiError::Status { status, url, body })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path)?;
        decode(self.send(builder).await?).await
    }

    pub async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path)?.query(query);
        decode(self.send(builder).await?).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path)?.json(body);
        decode(self.send(builder).await?).await
    }

    /// POST without a body, discarding whatever the server returns.
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, path)?;
        self.send(builder).await.map(|_| ())
    }

    /// Sends a JSON body and discards the response, for endpoints that
    /// answer with a plain-text acknowledgement.
    pub async fn send_json<B>(&self, method: Method, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request(method, path)?.json(body);
        self.send(builder).await.map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, path)?;
        self.send(builder).await.map(|_| ())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let url = response.url().to_string();
    let bytes = response
        .bytes()
        .await
        .map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;
    serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode { url, source })
}

/// Collects the client's parts. Each hook has a single slot; setting it
/// again replaces the previous hook rather than stacking a second one.
pub struct ApiClientBuilder {
    base_url: Url,
    proxy: Option<ProxyRule>,
    timeout: Option<Duration>,
    request_hook: Box<dyn RequestInterceptor>,
    response_hook: Box<dyn ResponseInterceptor>,
}

impl ApiClientBuilder {
    fn new(base_url: Url) -> Self {
        Self {
            base_url,
            proxy: None,
            timeout: None,
            request_hook: Box::new(NoopRequest),
            response_hook: Box::new(NoopResponse),
        }
    }

    pub fn proxy(mut self, rule: ProxyRule) -> Self {
        self.proxy = Some(rule);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn request_interceptor(mut self, hook: impl RequestInterceptor + 'static) -> Self {
        self.request_hook = Box::new(hook);
        self
    }

    pub fn response_interceptor(mut self, hook: impl ResponseInterceptor + 'static) -> Self {
        self.response_hook = Box::new(hook);
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let mut inner = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            inner = inner.timeout(timeout);
        }
        Ok(ApiClient {
            inner: inner.build().map_err(ApiError::Build)?,
            base_url: self.base_url,
            proxy: self.proxy,
            request_hook: self.request_hook,
            response_hook: self.response_hook,
        })
    }
}
