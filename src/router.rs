// SPDX-License-Identifier: PMPL-1.0-or-later

//! Route table for the site's pages.
//!
//! Paths are matched segment by segment in declaration order; a `:name`
//! segment captures one path segment, percent-decoded. Static routes that
//! would otherwise be shadowed by a parameter route (`/projects/upload` vs
//! `/projects/:id`) are declared first.

use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::collections::BTreeMap;

/// Page views the site can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    Home,
    Career,
    Moments,
    Editor,
    Articles,
    ArticleDetail,
    Login,
    Projects,
    ProjectUpload,
    ProjectDetail,
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::Career => "career",
            View::Moments => "moments",
            View::Editor => "editor",
            View::Articles => "articles",
            View::ArticleDetail => "article-detail",
            View::Login => "login",
            View::Projects => "projects",
            View::ProjectUpload => "project-upload",
            View::ProjectDetail => "project-detail",
        }
    }

    /// Translation key of the page title.
    pub fn title_key(&self) -> &'static str {
        match self {
            View::Home => "route.home",
            View::Career => "route.career",
            View::Moments => "route.moments",
            View::Editor => "route.editor",
            View::Articles => "route.articles",
            View::ArticleDetail => "route.article_detail",
            View::Login => "route.login",
            View::Projects => "route.projects",
            View::ProjectUpload => "route.project_upload",
            View::ProjectDetail => "route.project_detail",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub view: View,
}

pub const ROUTES: &[Route] = &[
    Route {
        path: "/",
        view: View::Home,
    },
    Route {
        path: "/career",
        view: View::Career,
    },
    Route {
        path: "/moments",
        view: View::Moments,
    },
    Route {
        path: "/editor",
        view: View::Editor,
    },
    Route {
        path: "/articles",
        view: View::Articles,
    },
    Route {
        path: "/article/:id",
        view: View::ArticleDetail,
    },
    Route {
        path: "/login",
        view: View::Login,
    },
    Route {
        path: "/projects",
        view: View::Projects,
    },
    Route {
        path: "/projects/upload",
        view: View::ProjectUpload,
    },
    Route {
        path: "/projects/:id",
        view: View::ProjectDetail,
    },
];

impl Route {
    /// Names of the `:param` segments, in order.
    pub fn param_names(&self) -> Vec<&'static str> {
        segments(self.path)
            .filter_map(|segment| segment.strip_prefix(':'))
            .collect()
    }

    /// Matches an absolute path without query or fragment, returning the
    /// captured parameters. One trailing slash is tolerated; empty segments
    /// (`//`) are not.
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let pattern: Vec<&str> = segments(self.path).collect();
        let actual = path_segments(path)?;
        if pattern.len() != actual.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (expected, got) in pattern.iter().zip(&actual) {
            match expected.strip_prefix(':') {
                Some(name) => {
                    params.insert(name.to_string(), decode_segment(got));
                }
                None if expected == got => {}
                None => return None,
            }
        }
        Some(params)
    }

    /// Fills the route's parameters, or `None` if one is missing.
    pub fn href(&self, params: &[(&str, &str)]) -> Option<String> {
        let mut parts = Vec::new();
        for segment in segments(self.path) {
            match segment.strip_prefix(':') {
                Some(name) => {
                    let (_, value) = params.iter().find(|(k, _)| *k == name)?;
                    parts.push(*value);
                }
                None => parts.push(segment),
            }
        }
        Some(format!("/{}", parts.join("/")))
    }
}

/// Where the viewport lands after a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollPosition {
    #[default]
    Top,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: &'static Route,
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    pub fn view(&self) -> View {
        self.route.view
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub target: RouteMatch,
    pub scroll: ScrollPosition,
}

/// Resolves a URL path (query string and fragment ignored) to its route.
pub fn resolve(path: &str) -> Option<RouteMatch> {
    let path = strip_query(path);
    ROUTES.iter().find_map(|route| {
        route
            .matches(path)
            .map(|params| RouteMatch { route, params })
    })
}

/// Resolves a navigation target. Every page change scrolls to the top.
pub fn navigate(path: &str) -> Option<Navigation> {
    resolve(path).map(|target| Navigation {
        target,
        scroll: ScrollPosition::Top,
    })
}

fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn path_segments(path: &str) -> Option<Vec<&str>> {
    let path = path.strip_suffix('/').unwrap_or(path);
    if path.is_empty() {
        return Some(Vec::new());
    }
    let parts: Vec<&str> = path.strip_prefix('/')?.split('/').collect();
    if parts.iter().any(|segment| segment.is_empty()) {
        return None;
    }
    Some(parts)
}

// Invalid UTF-8 after decoding keeps the raw segment.
fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}
