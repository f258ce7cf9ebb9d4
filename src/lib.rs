// SPDX-License-Identifier: PMPL-1.0-or-later

//! portfolio-client: the client side of a personal portfolio site.
//!
//! The crate holds three things the site's pages rely on:
//!
//! 1. **Router**: the route table mapping URL paths to page views.
//! 2. **i18n**: static translation tables for `zh`, `en` and `ja`, with
//!    English as the fallback.
//! 3. **HTTP**: an API client that injects the stored bearer token into
//!    every request and raises a notice on 401/403 responses.
//!
//! Configuration, local storage, typed backend calls and the `doctor`
//! self-check sit around those.

pub mod api;
pub mod config;
pub mod diagnostics;
pub mod http;
pub mod i18n;
pub mod router;
pub mod storage;
pub mod types;
