// SPDX-License-Identifier: PMPL-1.0-or-later

//! Internationalisation for the portfolio site.
//!
//! ## Supported locales
//!
//! | Code | Language | Native name |
//! |------|----------|-------------|
//! | zh   | Chinese  | 中文        |
//! | en   | English  | English     |
//! | ja   | Japanese | 日本語      |
//!
//! ## Design
//!
//! Translation keys use dotted namespaces: `"nav.home"`, `"notice.login_required"`.
//! Lookups fall back to English when a key is missing in the active locale.
//! If the key is missing in English too, [`t`] returns `""` and [`t_or_key`]
//! returns the key itself.
//!
//! The active locale comes from the `site_lang` entry of local storage and
//! defaults to Chinese when nothing is stored. A stored code with no table
//! resolves every key through English.

mod catalog;

pub use catalog::{t, t_or_key, Locale, Translator};
