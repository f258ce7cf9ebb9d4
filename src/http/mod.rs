// SPDX-License-Identifier: PMPL-1.0-or-later

//! Authenticated HTTP client for the portfolio backend.
//!
//! [`ApiClient`] owns one `reqwest` client bound to a base address and two
//! hooks:
//!
//! - a request hook ([`BearerAuth`]) that reads the session token from local
//!   storage and sets `Authorization: Bearer <token>` when one is present;
//! - a response hook ([`StatusNotices`]) that raises a "please log in" notice
//!   on 401 and an "insufficient permission" notice on 403.
//!
//! Errors are returned to the caller unchanged after the notice. There is no
//! retry, token refresh, or redirect. Concurrent 401s each raise their own
//! notice; nothing deduplicates them.

mod client;
mod error;
mod interceptor;
mod notice;

pub use client::{ApiClient, ApiClientBuilder, ProxyRule};
pub use error::ApiError;
pub use interceptor::{
    BearerAuth, NoopRequest, NoopResponse, RequestInterceptor, ResponseInterceptor, StatusNotices,
};
pub use notice::{CollectingNotifier, ConsoleNotifier, Notice, Notifier};
