//! End-to-end tests against a real `terraform` binary.
//!
//! Every test returns early when no `terraform` executable is on `PATH`, so
//! the suite stays green on machines without the tool.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use tf_lcm_api::{build_app, AppConfig, HandleCache, Terraform};

/// One router per working directory, built on first use
static ROUTERS: Lazy<HandleCache<PathBuf, Router>> = Lazy::new(HandleCache::new);

fn terraform_available() -> bool {
    let available = std::process::Command::new("terraform")
        .arg("version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false);
    if !available {
        eprintln!("terraform not found on PATH, skipping");
    }
    available
}

/// Copy a fixture into a fresh directory so tests never modify the checked-in files
fn fixture(name: &str) -> TempDir {
    let source = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let dir = tempfile::tempdir().unwrap();
    for entry in std::fs::read_dir(&source).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), dir.path().join(entry.file_name())).unwrap();
    }
    dir
}

fn router_for(dir: &Path) -> Arc<Router> {
    ROUTERS
        .get_or_try_insert_with(&dir.to_path_buf(), || {
            let terraform = Terraform::new(dir, "terraform")?;
            build_app(Arc::new(terraform), &AppConfig::default())
        })
        .unwrap()
}

async fn call(dir: &Path, method: Method, uri: &str) -> (StatusCode, Value) {
    let router = router_for(dir);
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.as_ref().clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_hello_world_lifecycle() {
    if !terraform_available() {
        return;
    }
    let dir = fixture("hello-world");
    let path = dir.path();

    let (status, body) = call(path, Method::POST, "/init").await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (status, body) = call(path, Method::POST, "/validate").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["valid"], true);
    assert_eq!(body["data"]["error_count"], 0);

    let (status, body) = call(path, Method::POST, "/apply").await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (status, body) = call(path, Method::POST, "/plan").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"], json!({ "formatted": false }));

    // nothing left to change
    let (status, _) = call(path, Method::POST, "/apply").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(path, Method::GET, "/output").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["output"]["hello"]["value"], "world");

    let (status, body) = call(path, Method::GET, "/version").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body["data"]["version"].is_string());
}

#[tokio::test]
async fn test_workspaces() {
    if !terraform_available() {
        return;
    }
    let dir = fixture("hello-world");
    let path = dir.path();

    let (status, _) = call(path, Method::POST, "/init").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(path, Method::POST, "/workspace/new?name=staging").await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (_, body) = call(path, Method::GET, "/workspace/show").await;
    assert_eq!(body["data"]["formatted"], "staging");

    let (status, _) = call(path, Method::POST, "/workspace/select?name=default").await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(path, Method::GET, "/workspace/list").await;
    assert_eq!(body["data"]["current"], "default");
    let list = body["data"]["list"].as_array().unwrap();
    assert!(list.contains(&json!("staging")));

    let (status, body) = call(path, Method::DELETE, "/workspace/delete?name=staging").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
}

#[tokio::test]
async fn test_fmt_rewrites_once() {
    if !terraform_available() {
        return;
    }
    let dir = fixture("unformatted");
    let path = dir.path();

    let (status, body) = call(path, Method::POST, "/fmt").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "config files got formatted");
    assert_eq!(body["data"]["changed_files"], json!(["main.tf"]));

    let (status, body) = call(path, Method::POST, "/fmt").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "config files are already formatted!");
    assert_eq!(body["data"]["changed_files"], json!([]));

    let rewritten = std::fs::read_to_string(path.join("main.tf")).unwrap();
    assert!(rewritten.contains("value = \"world\""));
}

#[tokio::test]
async fn test_uninitialized_directory_needs_init_on_every_route() {
    if !terraform_available() {
        return;
    }
    let dir = fixture("needs-provider");

    let routes = [
        (Method::POST, "/validate"),
        (Method::POST, "/plan"),
        (Method::POST, "/apply"),
        (Method::POST, "/destroy"),
        (Method::POST, "/graph"),
        (Method::POST, "/import?address=null_resource.example&id=abc"),
        (Method::GET, "/providers/schema"),
    ];
    for (method, uri) in routes {
        let (status, body) = call(dir.path(), method, uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{} {}", uri, body);
        let message = body["message"].as_str().unwrap();
        assert!(
            message.starts_with("Terraform folder is not initialized"),
            "{}: {}",
            uri,
            message
        );
        assert!(
            !message.contains('\u{1b}'),
            "{} leaked color codes: {:?}",
            uri,
            message
        );
    }
}
