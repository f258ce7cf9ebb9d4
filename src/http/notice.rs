// SPDX-License-Identifier: PMPL-1.0-or-later

//! User-facing notices raised by the response hook.

use crate::i18n::Translator;
use colored::*;
use reqwest::StatusCode;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    /// 401: the caller has no valid session.
    LoginRequired,
    /// 403: the session lacks the role the endpoint needs.
    InsufficientPermission,
}

impl Notice {
    /// The notice a response status calls for. Only 401 and 403 have one.
    pub fn for_status(status: StatusCode) -> Option<Notice> {
        match status {
            StatusCode::UNAUTHORIZED => Some(Notice::LoginRequired),
            StatusCode::FORBIDDEN => Some(Notice::InsufficientPermission),
            _ => None,
        }
    }

    pub fn message_key(&self) -> &'static str {
        match self {
            Notice::LoginRequired => "notice.login_required",
            Notice::InsufficientPermission => "notice.insufficient_permission",
        }
    }
}

/// Presents notices to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

/// Prints a localized notice line to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier {
    translator: Translator,
}

impl ConsoleNotifier {
    pub fn new(translator: Translator) -> Self {
        Self { translator }
    }

    pub fn message(&self, notice: Notice) -> &'static str {
        self.translator.t(notice.message_key())
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("{} {}", "[!]".bold().red(), self.message(notice).yellow());
    }
}

/// Records every notice in arrival order.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    seen: Mutex<Vec<Notice>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, notice: Notice) -> usize {
        self.notices().iter().filter(|n| **n == notice).count()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notice: Notice) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}
