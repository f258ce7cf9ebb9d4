// SPDX-License-Identifier: PMPL-1.0-or-later

//! Typed backend calls against a mock portfolio backend

use portfolio_client::api;
use portfolio_client::http::{
    ApiClient, ApiError, BearerAuth, CollectingNotifier, Notice, StatusNotices,
};
use portfolio_client::storage::{MemoryStore, TOKEN_KEY};
use portfolio_client::types::{
    ArticleDraft, CareerDraft, MediaType, NewComment, ProjectDraft, ProjectSort,
};
use reqwest::Url;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, token: Option<&str>) -> (ApiClient, Arc<CollectingNotifier>) {
    let store = match token {
        Some(token) => MemoryStore::new().with(TOKEN_KEY, token),
        None => MemoryStore::new(),
    };
    let notifier = Arc::new(CollectingNotifier::new());
    let client = ApiClient::builder(Url::parse(&server.uri()).unwrap())
        .request_interceptor(BearerAuth::new(store))
        .response_interceptor(StatusNotices::new(notifier.clone()))
        .build()
        .unwrap();
    (client, notifier)
}

#[tokio::test]
async fn test_list_articles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "First", "viewCount": 3, "likeCount": 1,
             "createdAt": "2026-01-02T03:04:05"},
            {"id": 2, "title": "Second", "viewCount": null}
        ])))
        .mount(&server)
        .await;

    let (client, _) = client_for(&server, None);
    let articles = api::list_articles(&client).await.unwrap();

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].title.as_deref(), Some("First"));
    assert_eq!(articles[0].like_count, 1);
    assert_eq!(articles[1].view_count, 0);
}

#[tokio::test]
async fn test_list_projects_by_likes_sends_sort() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .and(query_param("sort", "likes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "title": "Theme", "mediaType": "VIDEO", "likeCount": 40}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server, None);
    let projects = api::list_projects(&client, ProjectSort::MostLiked)
        .await
        .unwrap();

    assert_eq!(projects[0].media_type, Some(MediaType::Video));
    assert_eq!(projects[0].like_count, 40);
}

#[tokio::test]
async fn test_newest_projects_send_no_sort() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let (client, _) = client_for(&server, None);
    api::list_projects(&client, ProjectSort::Newest).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_search_projects_encodes_keyword() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/search"))
        .and(query_param("keyword", "原创 音乐"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server, None);
    let found = api::search_projects(&client, "原创 音乐").await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_toggle_like_with_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/projects/5/like"))
        .and(header("authorization", "Bearer jwt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"likeCount": 41, "isLiked": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, notifier) = client_for(&server, Some("jwt"));
    let toggle = api::toggle_project_like(&client, 5).await.unwrap();

    assert!(toggle.is_liked);
    assert_eq!(toggle.like_count, 41);
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_toggle_like_without_session_asks_for_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/projects/5/like"))
        .respond_with(ResponseTemplate::new(401).set_body_string("请先登录"))
        .mount(&server)
        .await;

    let (client, notifier) = client_for(&server, None);
    let err = api::toggle_project_like(&client, 5).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(notifier.count(Notice::LoginRequired), 1);
}

#[tokio::test]
async fn test_like_status_and_article_like() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/2/like-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(false)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/articles/3/like"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server, None);
    assert!(!api::project_like_status(&client, 2).await.unwrap());
    api::like_article(&client, 3).await.unwrap();
}

#[tokio::test]
async fn test_careers_and_comments() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/career/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "company": "Studio", "position": "Editor",
             "startDate": "2024-04", "isCurrent": true, "tags": "Premiere,AE"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/comments/article/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "content": "great", "username": "mio"},
            {"id": 2, "content": "thanks", "username": "kaede",
             "parentId": 1, "parentUsername": "mio"}
        ])))
        .mount(&server)
        .await;

    let (client, _) = client_for(&server, None);
    let careers = api::list_careers(&client).await.unwrap();
    assert_eq!(careers[0].tag_list(), vec!["Premiere", "AE"]);

    let comments = api::list_comments(&client, 3).await.unwrap();
    assert_eq!(comments.len(), 2);
    assert!(!comments[0].is_reply());
    assert_eq!(comments[1].parent_username.as_deref(), Some("mio"));
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let (client, notifier) = client_for(&server, None);
    let err = api::get_article(&client, 1).await.unwrap_err();

    assert!(matches!(err, ApiError::Decode { .. }));
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_non_admin_delete_raises_permission_notice() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/articles/4"))
        .and(header("authorization", "Bearer reader"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let (client, notifier) = client_for(&server, Some("reader"));
    let err = api::delete_article(&client, 4).await.unwrap_err();

    assert!(err.is_forbidden());
    assert_eq!(notifier.notices(), vec![Notice::InsufficientPermission]);
}

#[tokio::test]
async fn test_save_article_as_admin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/articles"))
        .and(header("authorization", "Bearer admin"))
        .and(body_json(json!({"title": "Kyoto", "content": "# Day one"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"id": 12, "title": "Kyoto", "content": "# Day one", "viewCount": 0}
        )))
        .expect(1)
        .mount(&server)
        .await;

    let (client, notifier) = client_for(&server, Some("admin"));
    let draft = ArticleDraft {
        title: "Kyoto".to_string(),
        content: "# Day one".to_string(),
        ..ArticleDraft::default()
    };
    let saved = api::save_article(&client, &draft).await.unwrap();

    assert_eq!(saved.id, 12);
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_post_reply_comment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/comments/save"))
        .and(header("authorization", "Bearer jwt"))
        .and(body_json(json!({"articleId": 3, "content": "thanks", "parentId": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_string("评论成功"))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server, Some("jwt"));
    let reply = NewComment::new(3, "thanks").reply_to(1);
    api::post_comment(&client, &reply).await.unwrap();
}

#[tokio::test]
async fn test_comment_without_session_asks_for_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/comments/save"))
        .respond_with(ResponseTemplate::new(401).set_body_string("请先登录再发表评论"))
        .mount(&server)
        .await;

    let (client, notifier) = client_for(&server, None);
    let err = api::post_comment(&client, &NewComment::new(3, "hi"))
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(notifier.notices(), vec![Notice::LoginRequired]);
}

#[tokio::test]
async fn test_career_save_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/career/save"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"id": 8, "company": "Studio", "position": "Editor", "tags": "AE"}
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/career/delete/8"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server, Some("admin"));
    let draft = CareerDraft {
        company: "Studio".to_string(),
        position: "Editor".to_string(),
        tags: Some("AE".to_string()),
        ..CareerDraft::default()
    };
    let saved = api::save_career(&client, &draft).await.unwrap();
    assert_eq!(saved.id, 8);
    api::delete_career(&client, saved.id).await.unwrap();
}

#[tokio::test]
async fn test_project_update_is_a_put() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/projects/5"))
        .and(body_json(json!({"title": "Theme v2"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("作品更新成功"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/projects/5"))
        .respond_with(ResponseTemplate::new(200).set_body_string("作品已删除"))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server, Some("admin"));
    let draft = ProjectDraft {
        title: "Theme v2".to_string(),
        ..ProjectDraft::default()
    };
    api::update_project(&client, 5, &draft).await.unwrap();
    api::delete_project(&client, 5).await.unwrap();
}
