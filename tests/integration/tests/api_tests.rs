//! API end-to-end tests
//!
//! Each test spawns the real router on an ephemeral port, backed by the
//! in-memory store, and drives it over HTTP.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{assert_json, assert_status, fixtures::*, TestServer};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn server() -> TestServer {
    TestServer::start().await.expect("Failed to start server")
}

async fn publish(server: &TestServer, token: &str, title: &str, tags: &[&str]) -> Value {
    let body = json!({
        "title": title,
        "description": "desc",
        "body": "body",
        "tagList": tags,
        "isDraft": false,
    });
    let response = server.post_auth("/api/articles", token, &body).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = server().await;
    let response = server.get("/health").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready() {
    let server = server().await;
    let response = server.get("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = server().await;
    let response = server.get("/health").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_user() {
    let server = server().await;
    let request = RegisterBody::unique();

    let response = server.post("/api/users", &request).await.unwrap();
    let body: Value = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Registration successful");
    assert_eq!(body["result"]["user"]["username"], request.username.as_str());
    assert!(body["result"]["user"].get("createdAt").is_some());
    assert!(!body["result"]["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let server = server().await;
    let request = RegisterBody::unique();
    server.register(&request).await.unwrap();

    let mut duplicate = RegisterBody::unique();
    duplicate.username = request.username.clone();
    let response = server.post("/api/users", &duplicate).await.unwrap();
    let body: Value = assert_json(response, StatusCode::CONFLICT).await.unwrap();

    assert_eq!(body["error"]["message"], "Username already exists");
}

#[tokio::test]
async fn test_register_validation_error_has_details() {
    let server = server().await;
    let body = json!({
        "username": "ok",
        "email": "not-an-email",
        "password": "x",
    });

    let response = server.post("/api/users", &body).await.unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["email"].is_array());
    assert!(body["error"]["details"]["password"].is_array());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let server = server().await;
    let response = server
        .client
        .post(format!("{}/api/users", server.base_url()))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_login() {
    let server = server().await;
    let request = RegisterBody::unique();
    server.register(&request).await.unwrap();

    let response = server
        .post("/api/login", &LoginBody::from_register(&request))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["result"]["user"]["email"], request.email.as_str());
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = server().await;
    let login = LoginBody {
        username: "nobody".to_string(),
        password: "wrongpass".to_string(),
    };

    let response = server.post("/api/login", &login).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Current User Tests
// ============================================================================

#[tokio::test]
async fn test_current_user_requires_auth() {
    let server = server().await;
    let response = server.get("/api/user").await.unwrap();
    let body: Value = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body["error"]["code"], "MISSING_AUTHORIZATION");
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let server = server().await;
    let response = server.get_auth("/api/user", "not-a-jwt").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_get_and_update_current_user() {
    let server = server().await;
    let request = RegisterBody::unique();
    let token = server.register(&request).await.unwrap();

    let response = server.get_auth("/api/user", &token).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["message"], "User retrieved successfully");
    assert_eq!(body["result"]["username"], request.username.as_str());

    let update = json!({ "bio": "I like to skateboard" });
    let response = server.put_auth("/api/user", &token, &update).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["message"], "User updated successfully");
    assert_eq!(body["result"]["bio"], "I like to skateboard");
}

#[tokio::test]
async fn test_password_update_without_confirmation_is_bad_request() {
    let server = server().await;
    let token = server.register(&RegisterBody::unique()).await.unwrap();

    let update = json!({ "password": "brandnew1" });
    let response = server.put_auth("/api/user", &token, &update).await.unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(
        body["error"]["message"],
        "Password confirmation is required when updating password"
    );
}

// ============================================================================
// Profile Tests
// ============================================================================

#[tokio::test]
async fn test_follow_and_unfollow_profile() {
    let server = server().await;
    let reader = server.register(&RegisterBody::unique()).await.unwrap();
    let writer = RegisterBody::unique();
    server.register(&writer).await.unwrap();
    let path = format!("/api/profiles/{}/follow", writer.username);

    let response = server.post_auth(&path, &reader, &json!({})).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["profile"]["following"], true);

    let response = server
        .get_auth(&format!("/api/profiles/{}", writer.username), &reader)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["profile"]["following"], true);

    let response = server.delete_auth(&path, &reader).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["profile"]["following"], false);

    let response = server.delete_auth(&path, &reader).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_follow_self_is_forbidden() {
    let server = server().await;
    let me = RegisterBody::unique();
    let token = server.register(&me).await.unwrap();

    let path = format!("/api/profiles/{}/follow", me.username);
    let response = server.post_auth(&path, &token, &json!({})).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_unknown_profile_is_not_found() {
    let server = server().await;
    let response = server.get("/api/profiles/ghost").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Article Tests
// ============================================================================

#[tokio::test]
async fn test_create_article_and_duplicate_title() {
    let server = server().await;
    let token = server.register(&RegisterBody::unique()).await.unwrap();

    let created = publish(&server, &token, "Hello World", &["dragons"]).await;
    assert_eq!(created["article"]["slug"], "hello-world");
    assert_eq!(created["article"]["tagList"], json!(["dragons"]));
    assert_eq!(created["article"]["favoritesCount"], 0);
    assert_eq!(created["article"]["isDraft"], false);

    let body = json!({ "title": "Hello World", "body": "again" });
    let response = server.post_auth("/api/articles", &token, &body).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(server.store.slugs(), vec!["hello-world".to_string()]);
}

#[tokio::test]
async fn test_create_article_requires_auth() {
    let server = server().await;
    let body = json!({ "title": "Anonymous", "body": "body" });
    let response = server.post("/api/articles", &body).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_get_article_as_anonymous_and_with_bad_token() {
    let server = server().await;
    let token = server.register(&RegisterBody::unique()).await.unwrap();
    publish(&server, &token, "Open Article", &[]).await;

    let response = server.get("/api/articles/open-article").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["article"]["favorited"], false);
    assert_eq!(body["article"]["author"]["following"], false);

    // A present but invalid header is rejected even on public routes
    let response = server
        .get_auth("/api/articles/open-article", "garbage")
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_draft_is_hidden_from_others() {
    let server = server().await;
    let author = server.register(&RegisterBody::unique()).await.unwrap();
    let other = server.register(&RegisterBody::unique()).await.unwrap();

    let body = json!({ "title": "Work In Progress", "body": "wip" });
    let response = server.post_auth("/api/articles", &author, &body).await.unwrap();
    let created: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(created["article"]["isDraft"], true);

    let path = "/api/articles/work-in-progress";
    assert_status(server.get_auth(path, &author).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_status(server.get_auth(path, &other).await.unwrap(), StatusCode::NOT_FOUND)
        .await
        .unwrap();
    assert_status(server.get(path).await.unwrap(), StatusCode::NOT_FOUND)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_list_articles_with_filters_and_pagination() {
    let server = server().await;
    let token = server.register(&RegisterBody::unique()).await.unwrap();
    for i in 0..3 {
        publish(&server, &token, &format!("Listed {i}"), &["rust"]).await;
    }
    publish(&server, &token, "Other", &["go"]).await;

    let response = server.get("/api/articles?tag=rust&limit=2").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["articlesCount"], 3);
    assert_eq!(body["articles"].as_array().unwrap().len(), 2);

    let response = server.get("/api/articles?offset=-1").await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server.get("/api/articles?limit=abc").await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_feed_requires_auth_and_lists_followed_authors() {
    let server = server().await;
    let reader = server.register(&RegisterBody::unique()).await.unwrap();
    let writer = RegisterBody::unique();
    let writer_token = server.register(&writer).await.unwrap();
    let stranger = server.register(&RegisterBody::unique()).await.unwrap();

    publish(&server, &writer_token, "Followed Post", &[]).await;
    publish(&server, &stranger, "Stranger Post", &[]).await;

    assert_status(server.get("/api/articles/feed").await.unwrap(), StatusCode::UNAUTHORIZED)
        .await
        .unwrap();

    let follow = format!("/api/profiles/{}/follow", writer.username);
    server.post_auth(&follow, &reader, &json!({})).await.unwrap();

    let response = server.get_auth("/api/articles/feed", &reader).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    let articles = body["articles"].as_array().unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0]["slug"], "followed-post");
    assert_eq!(articles[0]["author"]["following"], true);
}

#[tokio::test]
async fn test_update_article() {
    let server = server().await;
    let token = server.register(&RegisterBody::unique()).await.unwrap();
    publish(&server, &token, "Before", &["old"]).await;

    let at = server.clock.millis();
    let update = json!({ "title": "After", "tagList": ["new"] });
    let response = server
        .put_auth("/api/articles/before", &token, &update)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["article"]["slug"], format!("after-{at}"));
    assert_eq!(body["article"]["tagList"], json!(["new"]));
}

#[tokio::test]
async fn test_update_by_other_user_is_forbidden() {
    let server = server().await;
    let author = server.register(&RegisterBody::unique()).await.unwrap();
    let other = server.register(&RegisterBody::unique()).await.unwrap();
    publish(&server, &author, "Mine", &[]).await;

    let update = json!({ "body": "hijacked" });
    let response = server.put_auth("/api/articles/mine", &other, &update).await.unwrap();
    let body: Value = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body["error"]["message"], "You can only update your own articles");
}

#[tokio::test]
async fn test_favorite_and_unfavorite() {
    let server = server().await;
    let author = server.register(&RegisterBody::unique()).await.unwrap();
    let fan = server.register(&RegisterBody::unique()).await.unwrap();
    publish(&server, &author, "Popular", &[]).await;
    let path = "/api/articles/popular/favorite";

    let response = server.post_auth(path, &fan, &json!({})).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["article"]["favorited"], true);
    assert_eq!(body["article"]["favoritesCount"], 1);

    let response = server.post_auth(path, &fan, &json!({})).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();

    let response = server.delete_auth(path, &fan).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["article"]["favorited"], false);
    assert_eq!(body["article"]["favoritesCount"], 0);
}

#[tokio::test]
async fn test_delete_article() {
    let server = server().await;
    let token = server.register(&RegisterBody::unique()).await.unwrap();
    publish(&server, &token, "Short Lived", &["tmp"]).await;

    let response = server
        .delete_auth("/api/articles/short-lived", &token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["message"], "Article deleted successfully");

    let response = server.get("/api/articles/short-lived").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Comment Tests
// ============================================================================

#[tokio::test]
async fn test_comment_lifecycle() {
    let server = server().await;
    let author = server.register(&RegisterBody::unique()).await.unwrap();
    let commenter = server.register(&RegisterBody::unique()).await.unwrap();
    publish(&server, &author, "Commented", &[]).await;
    let path = "/api/articles/commented/comments";

    let response = server
        .post_auth(path, &commenter, &json!({ "body": "Nice post" }))
        .await
        .unwrap();
    let created: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(created["comment"]["body"], "Nice post");
    let id = created["comment"]["id"].as_i64().unwrap();

    let response = server.get(path).await.unwrap();
    let listed: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(listed["comments"].as_array().unwrap().len(), 1);

    let comment_path = format!("{path}/{id}");
    let response = server.delete_auth(&comment_path, &author).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server.delete_auth(&comment_path, &commenter).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["message"], "Comment deleted successfully");
}

#[tokio::test]
async fn test_comment_on_missing_article_is_not_found() {
    let server = server().await;
    let token = server.register(&RegisterBody::unique()).await.unwrap();

    let response = server
        .post_auth("/api/articles/missing/comments", &token, &json!({ "body": "hi" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_non_numeric_comment_id_is_bad_request() {
    let server = server().await;
    let token = server.register(&RegisterBody::unique()).await.unwrap();
    publish(&server, &token, "Numbers", &[]).await;

    let response = server
        .delete_auth("/api/articles/numbers/comments/abc", &token)
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}
