mod common;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{local_targets, spawn, FakeStats};

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn post(title: &str, published: bool, created_at: &str) -> String {
    format!(
        "+++\ntitle = \"{title}\"\npublished = {published}\ncreated_at = \"{created_at}\"\n+++\n\nSome words about {title}.\n"
    )
}

#[tokio::test]
async fn lists_published_blogs_newest_first() {
    let content = tempfile::tempdir().unwrap();
    write(content.path(), "blog/first.md", &post("first", true, "2022-02-01T09:00:00Z"));
    write(content.path(), "blog/second.md", &post("second", false, "2022-09-01T09:00:00Z"));
    write(content.path(), "blog/third.md", &post("third", true, "2022-05-01T09:00:00Z"));

    let server = spawn(Arc::new(FakeStats::default()), local_targets(), content.path()).await;
    let res = server.client.get(server.url("/api/blogs")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    let blogs = body.as_array().unwrap();
    let titles: Vec<_> = blogs.iter().map(|b| b["title"].clone()).collect();
    assert_eq!(titles, vec![json!("third"), json!("first")]);

    assert_eq!(blogs[0]["_path"], json!("/blog/third"));
    assert_eq!(blogs[0]["created_at"], json!("2022-05-01T09:00:00Z"));
    assert_eq!(blogs[0]["body"], json!("Some words about third.\n"));
}

#[tokio::test]
async fn mixes_markdown_and_json_documents() {
    let content = tempfile::tempdir().unwrap();
    write(content.path(), "blog/old.md", &post("old", true, "2021-01-01"));
    write(
        content.path(),
        "blog/new.json",
        r#"{"title":"new","published":true,"created_at":"2023-01-01T00:00:00Z"}"#,
    );

    let server = spawn(Arc::new(FakeStats::default()), local_targets(), content.path()).await;
    let body: Value = server
        .client
        .get(server.url("/api/blogs"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let titles: Vec<_> = body.as_array().unwrap().iter().map(|b| b["title"].clone()).collect();
    assert_eq!(titles, vec![json!("new"), json!("old")]);
}

#[tokio::test]
async fn reads_yaml_front_matter_posts() {
    let content = tempfile::tempdir().unwrap();
    write(
        content.path(),
        "blog/launch.md",
        "---\ntitle: Launch\npublished: true\ncreated_at: 2022-03-17\n---\n\nWe shipped.\n",
    );
    write(
        content.path(),
        "blog/draft.md",
        "---\ntitle: Draft\npublished: false\ncreated_at: 2022-04-01\n---\n",
    );
    write(content.path(), "blog/older.md", &post("older", true, "2021-11-30T12:00:00Z"));

    let server = spawn(Arc::new(FakeStats::default()), local_targets(), content.path()).await;
    let res = server.client.get(server.url("/api/blogs")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    let blogs = body.as_array().unwrap();
    let titles: Vec<_> = blogs.iter().map(|b| b["title"].clone()).collect();
    assert_eq!(titles, vec![json!("Launch"), json!("older")]);
    assert_eq!(blogs[0]["created_at"], json!("2022-03-17"));
    assert_eq!(blogs[0]["body"], json!("We shipped.\n"));
}

#[tokio::test]
async fn empty_content_returns_empty_array() {
    let content = tempfile::tempdir().unwrap();
    let server = spawn(Arc::new(FakeStats::default()), local_targets(), content.path()).await;

    let res = server.client.get(server.url("/api/blogs")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), json!([]));
}

#[tokio::test]
async fn content_failure_returns_500_with_empty_object() {
    let content = tempfile::tempdir().unwrap();
    write(content.path(), "blog/ok.md", &post("ok", true, "2022-01-01"));
    write(content.path(), "blog/broken.md", "+++\ntitle = \"never closed\"\n");

    let server = spawn(Arc::new(FakeStats::default()), local_targets(), content.path()).await;
    let res = server.client.get(server.url("/api/blogs")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({}));
}

#[tokio::test]
async fn missing_content_dir_returns_500_with_empty_object() {
    let content = tempfile::tempdir().unwrap();
    let missing = content.path().join("does-not-exist");

    let server = spawn(Arc::new(FakeStats::default()), local_targets(), &missing).await;
    let res = server.client.get(server.url("/api/blogs")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({}));
}
