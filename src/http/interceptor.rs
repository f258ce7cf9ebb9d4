// SPDX-License-Identifier: PMPL-1.0-or-later

//! Request and response hooks.
//!
//! The client runs exactly one request hook before sending and exactly one
//! response hook after a response arrives. Neither hook can fail the call.

use super::notice::{Notice, Notifier};
use crate::storage::{session_token, KeyValueStore};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Request, StatusCode, Url};
use tracing::{debug, warn};

const TOKEN_PREFIX_CHARS: usize = 6;

/// Runs on every outgoing request before it is sent.
pub trait RequestInterceptor: Send + Sync {
    fn on_request(&self, request: &mut Request);
}

/// Runs on every response, success or error, before the caller sees it.
pub trait ResponseInterceptor: Send + Sync {
    fn on_response(&self, status: StatusCode, url: &Url);
}

/// Leaves requests untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRequest;

impl RequestInterceptor for NoopRequest {
    fn on_request(&self, _request: &mut Request) {}
}

/// Ignores responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResponse;

impl ResponseInterceptor for NoopResponse {
    fn on_response(&self, _status: StatusCode, _url: &Url) {}
}

/// Attaches `Authorization: Bearer <token>` when local storage holds a token.
#[derive(Debug, Clone)]
pub struct BearerAuth<S> {
    store: S,
}

impl<S: KeyValueStore> BearerAuth<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> RequestInterceptor for BearerAuth<S> {
    fn on_request(&self, request: &mut Request) {
        let Some(token) = session_token(&self.store) else {
            debug!(url = %request.url(), "no session token, sending unauthenticated");
            return;
        };

        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                debug!(
                    url = %request.url(),
                    token_prefix = %token_prefix(&token),
                    "attaching bearer token"
                );
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            // The request still goes out, just without credentials.
            Err(_) => warn!("session token is not a valid header value, sending unauthenticated"),
        }
    }
}

/// Maps 401 and 403 responses to user notices.
#[derive(Debug, Clone)]
pub struct StatusNotices<N> {
    notifier: N,
}

impl<N: Notifier> StatusNotices<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }
}

impl<N: Notifier> ResponseInterceptor for StatusNotices<N> {
    fn on_response(&self, status: StatusCode, url: &Url) {
        if let Some(notice) = Notice::for_status(status) {
            debug!(%status, %url, ?notice, "raising notice");
            self.notifier.notify(notice);
        }
    }
}

fn token_prefix(token: &str) -> String {
    token.chars().take(TOKEN_PREFIX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::notice::CollectingNotifier;
    use crate::storage::{MemoryStore, TOKEN_KEY};
    use reqwest::{Client, Method};
    use std::sync::Arc;

    fn request() -> Request {
        Client::new()
            .request(Method::GET, "http://localhost:8080/api/articles")
            .build()
            .unwrap()
    }

    #[test]
    fn token_is_attached_as_bearer() {
        let hook = BearerAuth::new(MemoryStore::new().with(TOKEN_KEY, "eyJhbGciOi.x.y"));
        let mut req = request();
        hook.on_request(&mut req);
        assert_eq!(
            req.headers().get(AUTHORIZATION).unwrap(),
            "Bearer eyJhbGciOi.x.y"
        );
    }

    #[test]
    fn absent_token_leaves_request_untouched() {
        let hook = BearerAuth::new(MemoryStore::new());
        let mut req = request();
        hook.on_request(&mut req);
        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn token_with_newline_is_not_sent() {
        let hook = BearerAuth::new(MemoryStore::new().with(TOKEN_KEY, "bad\ntoken"));
        let mut req = request();
        hook.on_request(&mut req);
        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn status_hook_notifies_once_per_response() {
        let notifier = Arc::new(CollectingNotifier::new());
        let hook = StatusNotices::new(notifier.clone());
        let url = Url::parse("http://localhost:8080/api/projects/1/like").unwrap();

        hook.on_response(StatusCode::UNAUTHORIZED, &url);
        hook.on_response(StatusCode::FORBIDDEN, &url);
        hook.on_response(StatusCode::INTERNAL_SERVER_ERROR, &url);
        hook.on_response(StatusCode::OK, &url);

        assert_eq!(
            notifier.notices(),
            vec![Notice::LoginRequired, Notice::InsufficientPermission]
        );
    }

    #[test]
    fn token_prefix_is_short() {
        assert_eq!(token_prefix("abcdefghijkl"), "abcdef");
        assert_eq!(token_prefix("ab"), "ab");
    }
}
