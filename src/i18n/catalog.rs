// SPDX-License-Identifier: PMPL-1.0-or-later

//! Translation catalog for the portfolio site.
//!
//! All strings are embedded as compile-time static tables, one per locale.
//! Lookup is a linear scan; the tables are small and lookups happen once per
//! printed label.
//!
//! ## Adding a new key
//!
//! 1. Add the English entry to `EN`
//! 2. Add translations to ZH and JA (missing keys fall back to English)
//!
//! The `doctor.*` namespace is English-only on purpose: diagnostics output
//! is meant to be pasted into bug reports.

use crate::storage::{KeyValueStore, LOCALE_KEY};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Locales the site ships translations for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
    Ja,
}

impl Locale {
    /// The fallback locale for keys missing from the active table.
    pub const FALLBACK: Locale = Locale::En;

    /// ISO 639-1 two-letter code, as stored under `site_lang`.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Zh => "zh",
            Locale::En => "en",
            Locale::Ja => "ja",
        }
    }

    /// Parse a stored locale code. Case-sensitive, like the stored value.
    pub fn from_code(code: &str) -> Option<Locale> {
        match code {
            "zh" => Some(Locale::Zh),
            "en" => Some(Locale::En),
            "ja" => Some(Locale::Ja),
            _ => None,
        }
    }

    /// All supported locales, in the order the language switcher shows them.
    pub fn all() -> &'static [Locale] {
        &[Locale::Zh, Locale::En, Locale::Ja]
    }

    pub fn native_name(&self) -> &'static str {
        match self {
            Locale::Zh => "中文",
            Locale::En => "English",
            Locale::Ja => "日本語",
        }
    }

    /// Reads the `site_lang` preference.
    ///
    /// An absent or blank value resolves to the default locale (`zh`). A code
    /// we have no table for still counts as a choice, so every key resolves
    /// through the fallback locale.
    pub fn from_store<S: KeyValueStore + ?Sized>(store: &S) -> Locale {
        let Some(code) = store.get(LOCALE_KEY).filter(|code| !code.trim().is_empty()) else {
            return Locale::default();
        };
        Locale::from_code(code.trim()).unwrap_or_else(|| {
            warn!(code = %code, "unsupported site_lang in local storage, using fallback");
            Locale::FALLBACK
        })
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ─── Translation Lookup ─────────────────────────────────────────────

/// Look up a translation key in the given locale.
///
/// Falls back to English if the key is not found in the requested locale.
/// Returns `""` if English does not have it either.
///
/// # Examples
///
/// ```
/// use portfolio_client::i18n::{t, Locale};
/// assert_eq!(t(Locale::Zh, "nav.home"), "主页");
/// assert_eq!(t(Locale::En, "nav.home"), "Home");
/// assert_eq!(t(Locale::Ja, "nav.home"), "ホーム");
/// ```
pub fn t(locale: Locale, key: &str) -> &'static str {
    if let Some(value) = lookup(catalog_for(locale), key) {
        return value;
    }
    if locale != Locale::FALLBACK {
        if let Some(value) = lookup(catalog_for(Locale::FALLBACK), key) {
            return value;
        }
    }
    ""
}

/// Like [`t`], but returns the key itself when no locale has it.
pub fn t_or_key<'a>(locale: Locale, key: &'a str) -> &'a str {
    let result = t(locale, key);
    if result.is_empty() {
        key
    } else {
        result
    }
}

/// A locale bound once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Translator {
    locale: Locale,
}

impl Translator {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn from_store<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self::new(Locale::from_store(store))
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        t_or_key(self.locale, key)
    }
}

fn lookup(catalog: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    catalog
        .iter()
        .find(|(k, _)| *k == key)
        .map(|&(_, v)| v)
}

fn catalog_for(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::Zh => ZH,
        Locale::En => EN,
        Locale::Ja => JA,
    }
}

// ─── English (fallback — all keys defined here) ─────────────────────

const EN: &[(&str, &str)] = &[
    // Navigation bar
    ("nav.home", "Home"),
    ("nav.career", "Career"),
    ("nav.articles", "Life"),
    ("nav.projects", "Projects"),
    ("nav.login", "LOGIN"),
    // Notices raised by the API client
    ("notice.login_required", "Please log in first"),
    ("notice.insufficient_permission", "Insufficient permission"),
    // Page titles
    ("route.home", "Home"),
    ("route.career", "Career"),
    ("route.moments", "Moments"),
    ("route.editor", "Editor"),
    ("route.articles", "Articles"),
    ("route.article_detail", "Article"),
    ("route.login", "Log in"),
    ("route.projects", "Projects"),
    ("route.project_upload", "Upload Project"),
    ("route.project_detail", "Project"),
    // CLI labels
    ("cli.routes", "Routes"),
    ("cli.no_route", "No route matches"),
    ("cli.view", "View"),
    ("cli.params", "Parameters"),
    ("cli.scroll_top", "scrolls to top"),
    ("cli.empty", "nothing to show"),
    ("cli.views", "views"),
    ("cli.likes", "likes"),
    ("cli.current", "present"),
    ("cli.comments", "Comments"),
    ("cli.request_failed", "Request failed"),
    ("cli.done", "Done"),
    // Self-diagnostics
    ("doctor.title", "portfolio-client self-diagnostics"),
    ("doctor.failed", "self-diagnostics reported issues"),
];

// ─── Chinese ────────────────────────────────────────────────────────

const ZH: &[(&str, &str)] = &[
    ("nav.home", "主页"),
    ("nav.career", "生涯"),
    ("nav.articles", "生活"),
    ("nav.projects", "作品"),
    ("nav.login", "登录"),
    ("notice.login_required", "请先登录"),
    ("notice.insufficient_permission", "权限不足"),
    ("route.home", "主页"),
    ("route.career", "生涯"),
    ("route.moments", "动态"),
    ("route.editor", "编辑器"),
    ("route.articles", "文章"),
    ("route.article_detail", "文章详情"),
    ("route.login", "登录"),
    ("route.projects", "作品"),
    ("route.project_upload", "上传作品"),
    ("route.project_detail", "作品详情"),
    ("cli.routes", "路由"),
    ("cli.no_route", "没有匹配的路由"),
    ("cli.view", "视图"),
    ("cli.params", "参数"),
    ("cli.scroll_top", "滚动到顶部"),
    ("cli.empty", "暂无内容"),
    ("cli.views", "浏览"),
    ("cli.likes", "点赞"),
    ("cli.current", "至今"),
    ("cli.comments", "评论"),
    ("cli.request_failed", "请求失败"),
    ("cli.done", "完成"),
];

// ─── Japanese ───────────────────────────────────────────────────────

const JA: &[(&str, &str)] = &[
    ("nav.home", "ホーム"),
    ("nav.career", "キャリア"),
    ("nav.articles", "ライフ"),
    ("nav.projects", "作品"),
    ("nav.login", "ログイン"),
    ("notice.login_required", "先にログインしてください"),
    ("notice.insufficient_permission", "権限が不足しています"),
    ("route.home", "ホーム"),
    ("route.career", "キャリア"),
    ("route.moments", "モーメント"),
    ("route.editor", "エディター"),
    ("route.articles", "記事"),
    ("route.article_detail", "記事詳細"),
    ("route.login", "ログイン"),
    ("route.projects", "作品"),
    ("route.project_upload", "作品アップロード"),
    ("route.project_detail", "作品詳細"),
    ("cli.routes", "ルート"),
    ("cli.no_route", "一致するルートがありません"),
    ("cli.view", "ビュー"),
    ("cli.params", "パラメータ"),
    ("cli.scroll_top", "先頭へスクロール"),
    ("cli.empty", "表示する項目がありません"),
    ("cli.views", "閲覧"),
    ("cli.likes", "いいね"),
    ("cli.current", "現在"),
    ("cli.comments", "コメント"),
    ("cli.request_failed", "リクエストに失敗しました"),
    ("cli.done", "完了"),
];
