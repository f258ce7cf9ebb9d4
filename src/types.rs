// SPDX-License-Identifier: PMPL-1.0-or-later

//! Resources served by the portfolio backend.
//!
//! Field names follow the backend's camelCase JSON. Counters the backend may
//! send as `null` read as zero.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// A blog post on the "life" page. `content` is Markdown source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default, deserialize_with = "count")]
    pub view_count: i64,
    #[serde(default, deserialize_with = "count")]
    pub like_count: i64,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaType {
    Video,
    Audio,
    #[serde(other)]
    Other,
}

/// A showcased work: a video, a track, or an attachment download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub attachment_url: Option<String>,
    #[serde(default, deserialize_with = "count")]
    pub view_count: i64,
    #[serde(default, deserialize_with = "count")]
    pub like_count: i64,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Result of toggling a like on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    pub like_count: i64,
    pub is_liked: bool,
}

/// Sort orders accepted by the project list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectSort {
    #[default]
    Newest,
    MostLiked,
}

impl ProjectSort {
    /// Value of the `sort` query parameter, `None` for the server default.
    pub fn query_value(&self) -> Option<&'static str> {
        match self {
            ProjectSort::Newest => None,
            ProjectSort::MostLiked => Some("likes"),
        }
    }
}

/// One entry on the career timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Career {
    pub id: i64,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_current: Option<bool>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
}

impl Career {
    /// Tags are stored as one comma-separated string.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split([',', '，'])
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .collect()
    }

    /// `period` if the backend sent one, else `start – end` (or `start – present`).
    pub fn display_period(&self, present: &str) -> String {
        if let Some(period) = self.period.as_deref().filter(|p| !p.trim().is_empty()) {
            return period.to_string();
        }
        let start = self.start_date.as_deref().unwrap_or("?");
        let end = if self.is_current.unwrap_or(false) {
            present
        } else {
            self.end_date.as_deref().unwrap_or("?")
        };
        format!("{start} - {end}")
    }
}

/// A comment on an article.
///
/// The comments endpoint returns rows from a native query, so both camelCase
/// and snake_case column names are accepted, and timestamps stay as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub content: String,
    #[serde(default, alias = "article_id")]
    pub article_id: Option<i64>,
    #[serde(default, alias = "user_id")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, alias = "parent_id")]
    pub parent_id: Option<i64>,
    #[serde(default, alias = "parent_username")]
    pub parent_username: Option<String>,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<String>,
}

impl Comment {
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// A new comment, or a reply when `parent_id` is set. The backend fills in
/// the author from the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub article_id: i64,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

impl NewComment {
    pub fn new(article_id: i64, content: impl Into<String>) -> Self {
        Self {
            article_id,
            content: content.into(),
            parent_id: None,
        }
    }

    pub fn reply_to(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Article fields the editor submits. Without an `id` the backend creates a
/// new article; with one it overwrites that article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_current: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    pub company: String,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Comma-separated, as [`Career::tag_list`] reads them back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

/// Project fields sent by the upload page.
///
/// On update the backend keeps the stored cover and media when the
/// corresponding URL is left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

fn count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(0))
}
