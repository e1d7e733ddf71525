//! End-to-end tests for the echo route.

mod common;

use common::{client, spawn_server, test_config};

#[tokio::test]
async fn test_query_parameters_are_escaped() {
    let root = tempfile::tempdir().unwrap();
    let server = spawn_server(test_config(root.path())).await;

    let response = client()
        .get(server.url("/submit?name=%3Cscript%3Ealert(1)%3C%2Fscript%3E&x=1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();

    assert!(body.contains("<title>Submit</title>"));
    assert!(body.contains("REQUEST_METHOD: GET<br>"));
    assert!(body.contains("name=&lt;script&gt;alert(1)&lt;/script&gt;<br>"));
    assert!(body.contains("x=1<br>"));
    assert!(!body.contains("<script>"));
}

#[tokio::test]
async fn test_posted_form_fields_are_listed() {
    let root = tempfile::tempdir().unwrap();
    let server = spawn_server(test_config(root.path())).await;

    let response = client()
        .post(server.url("/submit"))
        .form(&[("name1", "value 1"), ("name2", "a&b")])
        .send()
        .await
        .unwrap();
    let body = response.text().await.unwrap();

    assert!(body.contains("REQUEST_METHOD: POST<br>"));
    assert!(body.contains("SERVER_PROTOCOL: HTTP/1.1<br>"));
    assert!(body.contains("name1=value 1<br>"));
    assert!(body.contains("name2=a&amp;b<br>"));
}

#[tokio::test]
async fn test_path_below_route_is_reported() {
    let root = tempfile::tempdir().unwrap();
    let server = spawn_server(test_config(root.path())).await;

    let body = client()
        .get(server.url("/submit/extra/path?q=1"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("REQUEST_URI: /submit/extra/path?q=1<br>"));
    assert!(body.contains("PATH_INFO: /extra/path<br>"));
    assert!(body.contains("QUERY_STRING: q=1<br>"));
    assert!(body.contains("SCRIPT_NAME: /submit<br>"));
    assert!(body.contains("REQUEST_PATH: /submit/extra/path<br>"));
}

#[tokio::test]
async fn test_other_methods_list_no_parameters() {
    let root = tempfile::tempdir().unwrap();
    let server = spawn_server(test_config(root.path())).await;

    let body = client()
        .put(server.url("/submit?hidden=1"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("REQUEST_METHOD: PUT<br>\n<hr>"));
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let root = tempfile::tempdir().unwrap();
    let server = spawn_server(test_config(root.path())).await;

    let response = client()
        .get(server.url("/submit"))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "trace-me");
}

#[tokio::test]
async fn test_trailing_slash_reports_root_path_info() {
    let root = tempfile::tempdir().unwrap();
    let server = spawn_server(test_config(root.path())).await;

    let response = client().get(server.url("/submit/")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();

    assert!(body.contains("PATH_INFO: /<br>"));
    assert!(body.contains("REQUEST_PATH: /submit/<br>"));
}

#[tokio::test]
async fn test_undecodable_path_info_still_renders() {
    let root = tempfile::tempdir().unwrap();
    let server = spawn_server(test_config(root.path())).await;

    let response = client().get(server.url("/submit/%FF")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();

    assert!(body.contains("REQUEST_URI: /submit/%FF<br>"));
    assert!(body.contains("PATH_INFO: /\u{FFFD}<br>"));
}
