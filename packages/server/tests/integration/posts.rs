use crate::common::{TestApp, routes};

#[tokio::test]
async fn content_only_post_has_no_media() {
    let app = TestApp::spawn().await;

    let res = app.create_post("Hello", "", "Just some text").await;
    assert_eq!(res.status, 303);
    assert_eq!(res.location.as_deref(), Some("/"));

    let res = app.get(routes::HOME).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["total"], 1);

    let post = &res.body["data"][0];
    assert_eq!(post["title"], "Hello");
    assert_eq!(post["topic"], "general");
    assert!(post["media_type"].is_null());
    assert!(post["media_filename"].is_null());
}

#[tokio::test]
async fn blank_topic_falls_back_to_default() {
    let app = TestApp::spawn().await;

    let res = app.create_post("Untagged", "   ", "body").await;
    assert_eq!(res.status, 303);

    let res = app.get(routes::HOME).await;
    assert_eq!(res.body["data"][0]["topic"], "general");
}

#[tokio::test]
async fn explicit_topic_is_preserved() {
    let app = TestApp::spawn().await;

    let res = app.create_post("Gardening", "plants", "soil notes").await;
    assert_eq!(res.status, 303);

    let res = app.get(routes::HOME).await;
    assert_eq!(res.body["data"][0]["topic"], "plants");
}

#[tokio::test]
async fn missing_title_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app.create_post("   ", "", "some content").await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");

    let res = app.get(routes::HOME).await;
    assert_eq!(res.body["total"], 0);
}

#[tokio::test]
async fn overlong_title_is_rejected() {
    let app = TestApp::spawn().await;

    let title = "x".repeat(101);
    let res = app.create_post(&title, "", "content").await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn title_at_limit_is_accepted() {
    let app = TestApp::spawn().await;

    let title = "x".repeat(100);
    let res = app.create_post(&title, "", "content").await;
    assert_eq!(res.status, 303);
}

#[tokio::test]
async fn overlong_topic_is_rejected() {
    let app = TestApp::spawn().await;

    let topic = "t".repeat(51);
    let res = app.create_post("Title", &topic, "content").await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn post_without_content_or_media_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app.create_post("Empty", "", "").await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");

    let res = app.get(routes::HOME).await;
    assert_eq!(res.body["total"], 0);
}

#[tokio::test]
async fn posts_are_listed_newest_first() {
    let app = TestApp::spawn().await;

    for title in ["First", "Second", "Third"] {
        let res = app.create_post(title, "", "content").await;
        assert_eq!(res.status, 303);
    }

    let res = app.get(routes::HOME).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["total"], 3);

    let titles: Vec<&str> = res.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|post| post["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn listing_is_idempotent() {
    let app = TestApp::spawn().await;

    app.create_post("Stable", "", "content").await;

    let first = app.get(routes::HOME).await;
    let second = app.get(routes::HOME).await;
    assert_eq!(first.status, 200);
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn detail_renders_markdown() {
    let app = TestApp::spawn().await;

    let res = app.create_post("Hello", "", "**World**").await;
    assert_eq!(res.status, 303);

    let list = app.get(routes::HOME).await;
    let id = list.body["data"][0]["id"].as_i64().unwrap();

    let res = app.get(&routes::post(id)).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["post"]["title"], "Hello");
    assert_eq!(res.body["post"]["content_markdown"], "**World**");
    let html = res.body["content_html"].as_str().unwrap();
    assert!(html.contains("<strong>World</strong>"), "got: {html}");
}

#[tokio::test]
async fn detail_of_unknown_post_is_404() {
    let app = TestApp::spawn().await;

    let res = app.get(&routes::post(9999)).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn new_post_form_reports_constraints() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::NEW).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["default_topic"], "general");
    assert_eq!(res.body["title_max_chars"], 100);
    assert_eq!(res.body["topic_max_chars"], 50);
    assert_eq!(
        res.body["max_upload_bytes"].as_u64().unwrap(),
        crate::common::TEST_MAX_UPLOAD_BYTES
    );
    assert!(
        res.body["image_extensions"]
            .as_array()
            .unwrap()
            .iter()
            .any(|ext| ext == "png")
    );
}
