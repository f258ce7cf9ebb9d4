// SPDX-License-Identifier: PMPL-1.0-or-later

//! Typed calls against the portfolio backend.
//!
//! Every call goes through [`ApiClient::send`], so the bearer token and the
//! 401/403 notices apply uniformly.
//!
//! Writes need a session. Posting a comment is open to any logged-in user;
//! saving or deleting articles, careers and projects is admin-only, and the
//! backend answers 403 to everyone else.

use crate::http::{ApiClient, ApiError};
use crate::types::{
    Article, ArticleDraft, Career, CareerDraft, Comment, LikeToggle, NewComment, Project,
    ProjectDraft, ProjectSort,
};
use reqwest::Method;

pub async fn list_articles(client: &ApiClient) -> Result<Vec<Article>, ApiError> {
    client.get_json("/api/articles").await
}

pub async fn get_article(client: &ApiClient, id: i64) -> Result<Article, ApiError> {
    client.get_json(&format!("/api/articles/{id}")).await
}

pub async fn like_article(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client.post_empty(&format!("/api/articles/{id}/like")).await
}

/// Creates or overwrites an article and returns it as stored.
pub async fn save_article(client: &ApiClient, draft: &ArticleDraft) -> Result<Article, ApiError> {
    client.post_json("/api/articles", draft).await
}

/// Deletes an article. The backend also removes images it uploaded for it.
pub async fn delete_article(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client.delete(&format!("/api/articles/{id}")).await
}

pub async fn list_projects(client: &ApiClient, sort: ProjectSort) -> Result<Vec<Project>, ApiError> {
    match sort.query_value() {
        Some(value) => {
            client
                .get_json_with_query("/api/projects", &[("sort", value)])
                .await
        }
        None => client.get_json("/api/projects").await,
    }
}

pub async fn search_projects(client: &ApiClient, keyword: &str) -> Result<Vec<Project>, ApiError> {
    client
        .get_json_with_query("/api/projects/search", &[("keyword", keyword)])
        .await
}

/// Fetches one project. The backend counts this as a view.
pub async fn get_project(client: &ApiClient, id: i64) -> Result<Project, ApiError> {
    client.get_json(&format!("/api/projects/{id}")).await
}

/// Likes or un-likes a project for the logged-in user. Needs a session.
pub async fn toggle_project_like(client: &ApiClient, id: i64) -> Result<LikeToggle, ApiError> {
    client
        .post_json(&format!("/api/projects/{id}/like"), &serde_json::json!({}))
        .await
}

pub async fn save_project(client: &ApiClient, draft: &ProjectDraft) -> Result<Project, ApiError> {
    client.post_json("/api/projects/save", draft).await
}

/// Updates title, description and category. Empty cover and media URLs keep
/// the stored files.
pub async fn update_project(
    client: &ApiClient,
    id: i64,
    draft: &ProjectDraft,
) -> Result<(), ApiError> {
    client
        .send_json(Method::PUT, &format!("/api/projects/{id}"), draft)
        .await
}

pub async fn delete_project(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client.delete(&format!("/api/projects/{id}")).await
}

/// Whether the current session has liked the project; `false` when anonymous.
pub async fn project_like_status(client: &ApiClient, id: i64) -> Result<bool, ApiError> {
    client
        .get_json(&format!("/api/projects/{id}/like-status"))
        .await
}

pub async fn list_careers(client: &ApiClient) -> Result<Vec<Career>, ApiError> {
    client.get_json("/api/career/list").await
}

/// Creates a timeline entry, or replaces the one with the draft's `id`.
pub async fn save_career(client: &ApiClient, draft: &CareerDraft) -> Result<Career, ApiError> {
    client.post_json("/api/career/save", draft).await
}

pub async fn delete_career(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client.delete(&format!("/api/career/delete/{id}")).await
}

pub async fn list_comments(client: &ApiClient, article_id: i64) -> Result<Vec<Comment>, ApiError> {
    client
        .get_json(&format!("/api/comments/article/{article_id}"))
        .await
}

/// Posts a comment as the logged-in user.
pub async fn post_comment(client: &ApiClient, comment: &NewComment) -> Result<(), ApiError> {
    client
        .send_json(Method::POST, "/api/comments/save", comment)
        .await
}

/// Deletes a comment. Allowed for its author and for admins.
pub async fn delete_comment(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client.delete(&format!("/api/comments/{id}")).await
}
