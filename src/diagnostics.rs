// SPDX-License-Identifier: PMPL-1.0-or-later

//! `portfolio doctor`: checks the local setup without touching the network.

use crate::config::{self, ClientConfig, Profile};
use crate::i18n::{t, Locale};
use crate::router::ROUTES;
use crate::storage::{FileStore, LOCALE_KEY, TOKEN_KEY};
use anyhow::{anyhow, Result};
use colored::*;
use std::path::Path;

/// `config_file` is the file the settings were read from, `None` when
/// running on defaults.
pub fn run_self_diagnostics(config: &ClientConfig, config_file: Option<&Path>) -> Result<()> {
    println!("{}", t(Locale::En, "doctor.title").bold());

    let checks = collect(config, config_file);

    println!();
    for entry in &checks {
        entry.print();
    }

    if checks.iter().any(|entry| entry.level == Level::Error) {
        Err(anyhow!(t(Locale::En, "doctor.failed")))
    } else {
        Ok(())
    }
}

pub(crate) fn collect(config: &ClientConfig, config_file: Option<&Path>) -> Vec<Diagnostic> {
    let store = FileStore::new(&config.storage_path);
    let mut checks = vec![
        Diagnostic::ok(
            "version",
            format!("portfolio-client {}", env!("CARGO_PKG_VERSION")),
        ),
        check_config_file(config_file),
        check_endpoint(config),
    ];
    checks.extend(check_storage(&store));
    checks.push(Diagnostic::ok(
        "routes",
        format!("{} routes registered", ROUTES.len()),
    ));
    checks
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Level {
    Ok,
    Warn,
    Error,
}

impl Level {
    fn tag(&self) -> ColoredString {
        match self {
            Level::Ok => "OK".green(),
            Level::Warn => "WARN".yellow(),
            Level::Error => "ERR".red(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Diagnostic {
    pub(crate) label: &'static str,
    pub(crate) level: Level,
    pub(crate) detail: String,
}

impl Diagnostic {
    fn new(label: &'static str, level: Level, detail: String) -> Self {
        Self {
            label,
            level,
            detail,
        }
    }

    fn ok(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Ok, detail)
    }

    fn warning(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Warn, detail)
    }

    fn error(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Error, detail)
    }

    fn print(&self) {
        println!("  [{}] {:16} {}", self.level.tag(), self.label, self.detail);
    }
}

fn check_config_file(config_file: Option<&Path>) -> Diagnostic {
    if let Some(path) = config_file {
        return Diagnostic::ok("config file", format!("{}", path.display()));
    }
    match config::default_config_path() {
        Some(path) => Diagnostic::ok(
            "config file",
            format!("{} not present, using defaults", path.display()),
        ),
        None => Diagnostic::warning(
            "config file",
            "no config directory on this platform".to_string(),
        ),
    }
}

fn check_endpoint(config: &ClientConfig) -> Diagnostic {
    let mut detail = format!("{} ({})", config.base_url, config.profile.name());
    if let Some(rule) = &config.proxy {
        detail.push_str(&format!(", {} -> {}", rule.prefix, rule.target));
    }
    if config.profile == Profile::Production && config.base_url.host_str() == Some("localhost") {
        Diagnostic::warning("api endpoint", format!("{detail}; production points at localhost"))
    } else {
        Diagnostic::ok("api endpoint", detail)
    }
}

fn check_storage(store: &FileStore) -> Vec<Diagnostic> {
    let path = store.path().display().to_string();
    let entries = match store.entries() {
        Ok(entries) => entries,
        Err(err) => return vec![Diagnostic::error("local storage", format!("{err:#}"))],
    };

    let mut checks = Vec::new();
    if store.path().exists() {
        checks.push(Diagnostic::ok(
            "local storage",
            format!("{path} ({} keys)", entries.len()),
        ));
    } else {
        checks.push(Diagnostic::warning(
            "local storage",
            format!("{path} missing (log in to create it)"),
        ));
    }

    match entries.get(TOKEN_KEY).and_then(|v| v.as_str()) {
        Some(token) if !token.trim().is_empty() => checks.push(Diagnostic::ok(
            "session token",
            "present (requests are authenticated)".to_string(),
        )),
        _ => checks.push(Diagnostic::warning(
            "session token",
            "absent (requests go out unauthenticated)".to_string(),
        )),
    }

    let stored_locale = entries
        .get(LOCALE_KEY)
        .and_then(|v| v.as_str())
        .filter(|code| !code.trim().is_empty());
    match stored_locale {
        None => checks.push(Diagnostic::ok(
            "locale",
            format!("not set, using {}", Locale::default()),
        )),
        Some(code) => match Locale::from_code(code.trim()) {
            Some(locale) => checks.push(Diagnostic::ok(
                "locale",
                format!("{} ({})", locale, locale.native_name()),
            )),
            None => checks.push(Diagnostic::warning(
                "locale",
                format!("unsupported {code:?}, using {}", Locale::FALLBACK),
            )),
        },
    }

    checks
}
