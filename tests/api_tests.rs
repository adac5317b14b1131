mod common;

use common::{InMemoryRepository, post_fixture, test_state};
use health_blog::{
    create_router,
    models::{BlogPost, NewsletterSubscriber, PostDetail, PostStatus},
};
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct TestApp {
    pub address: String,
    pub repo: Arc<InMemoryRepository>,
}

async fn spawn_app() -> TestApp {
    let repo = Arc::new(InMemoryRepository::new());
    let mut state = test_state(repo.clone());
    state.config.site_url = "https://factfit.test".to_string();
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address, repo }
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let response = reqwest::get(format!("{}/health", app.address))
        .await
        .expect("req fail");
    assert!(response.status().is_success());
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_sitemap_lists_published_posts_and_categories() {
    let app = spawn_app().await;
    app.repo
        .insert_post(post_fixture("Sleep hygiene", "sleep-hygiene", PostStatus::Published));
    app.repo
        .insert_post(post_fixture("Unfinished", "unfinished", PostStatus::Draft));
    app.repo.insert_category("Nutrition", "nutrition");

    let response = reqwest::get(format!("{}/sitemap.xml", app.address))
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/xml");
    assert_eq!(response.headers()["cache-control"], "public, max-age=3600");

    let xml = response.text().await.unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<loc>https://factfit.test/</loc>"));
    assert!(xml.contains("<loc>https://factfit.test/blog/sleep-hygiene</loc>"));
    assert!(xml.contains("<loc>https://factfit.test/category/nutrition</loc>"));
    assert!(!xml.contains("unfinished"));
    assert!(xml.ends_with("</urlset>"));
}

#[tokio::test]
async fn test_robots_points_at_sitemap() {
    let app = spawn_app().await;

    let response = reqwest::get(format!(
        "{}/robots.txt?site_url=https://other.example",
        app.address
    ))
    .await
    .unwrap();

    assert_eq!(response.headers()["cache-control"], "public, max-age=86400");
    let body = response.text().await.unwrap();
    assert!(body.contains("Sitemap: https://other.example/sitemap.xml"));
    assert!(body.contains("Disallow: /admin"));
}

#[tokio::test]
async fn test_public_post_listing_and_detail() {
    let app = spawn_app().await;
    let visible = app
        .repo
        .insert_post(post_fixture("Protein", "protein", PostStatus::Published));
    app.repo
        .insert_post(post_fixture("In review", "in-review", PostStatus::EditorReview));
    let client = reqwest::Client::new();

    let posts: Vec<BlogPost> = client
        .get(format!("{}/posts", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, visible.id);

    let detail: PostDetail = client
        .get(format!("{}/posts/protein", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail.post.slug, "protein");
    assert!(detail.disclaimer.is_none());

    let missing = client
        .get(format!("{}/posts/in-review", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
    let error: serde_json::Value = missing.json().await.unwrap();
    assert_eq!(error["error"], "Not found");
}

#[tokio::test]
async fn test_newsletter_subscribe_over_http() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/newsletter/subscribe", app.address))
        .json(&serde_json::json!({ "email": "Fan@Example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let subscriber: NewsletterSubscriber = response.json().await.unwrap();
    assert_eq!(subscriber.email, "fan@example.com");

    let invalid = client
        .post(format!("{}/newsletter/subscribe", app.address))
        .json(&serde_json::json!({ "email": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = spawn_app().await;

    let doc: serde_json::Value = reqwest::get(format!("{}/api-docs/openapi.json", app.address))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(doc["paths"]["/sitemap.xml"].is_object());
    assert!(doc["paths"]["/admin/publish-scheduled"].is_object());
}
