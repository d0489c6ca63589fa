//! Integration tests for the download module.
//!
//! These tests verify the full download flow with mock HTTP servers.

#![allow(clippy::unwrap_used)]

mod support;
use support::socket_guard::start_mock_server_or_skip;

use std::time::Duration;

use harvest_core::download::{DownloadError, DownloadOutcome, HttpClient};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn pdf_response(body: &[u8]) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "application/pdf")
        .set_body_bytes(body.to_vec())
}

#[tokio::test]
async fn test_download_full_flow_preserves_content() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let content = b"%PDF-1.7\nthe complete document body\n%%EOF";
    Mock::given(method("GET"))
        .and(path("/docs/spec_sheet.pdf"))
        .respond_with(pdf_response(content))
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().unwrap();

    let client = HttpClient::with_default_timeout().unwrap();
    let url = format!("{}/docs/spec_sheet.pdf", mock_server.uri());
    let outcome = client.download_pdf(&url, temp_dir.path()).await.unwrap();

    let expected_path = temp_dir.path().join("spec_sheet.pdf");
    assert_eq!(
        outcome,
        DownloadOutcome::Downloaded {
            path: expected_path.clone(),
            bytes: content.len() as u64,
        }
    );
    assert_eq!(std::fs::read(&expected_path).unwrap(), content);
}

#[tokio::test]
async fn test_download_sanitizes_encoded_name() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/My%20Manual-rev.3.pdf"))
        .respond_with(pdf_response(b"%PDF"))
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().unwrap();

    let client = HttpClient::with_default_timeout().unwrap();
    let url = format!("{}/My%20Manual-rev.3.pdf", mock_server.uri());
    let outcome = client.download_pdf(&url, temp_dir.path()).await.unwrap();

    assert_eq!(outcome.path(), temp_dir.path().join("my_20manual_rev_3.pdf"));
    assert!(outcome.path().exists());
}

#[tokio::test]
async fn test_download_second_call_makes_no_request() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/guide.pdf"))
        .respond_with(pdf_response(b"%PDF-once"))
        .expect(1)
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().unwrap();

    let client = HttpClient::with_default_timeout().unwrap();
    let url = format!("{}/guide.pdf", mock_server.uri());
    let first = client.download_pdf(&url, temp_dir.path()).await.unwrap();
    let second = client.download_pdf(&url, temp_dir.path()).await.unwrap();

    assert!(matches!(first, DownloadOutcome::Downloaded { .. }));
    assert!(matches!(second, DownloadOutcome::AlreadyExists { .. }));
    assert_eq!(std::fs::read(second.path()).unwrap(), b"%PDF-once");
}

#[tokio::test]
async fn test_download_html_error_page_leaves_no_file() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/moved.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html>moved</html>", "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().unwrap();

    let client = HttpClient::with_default_timeout().unwrap();
    let url = format!("{}/moved.pdf", mock_server.uri());
    let err = client
        .download_pdf(&url, temp_dir.path())
        .await
        .unwrap_err();

    match err {
        DownloadError::InvalidContentType { content_type, .. } => {
            assert_eq!(content_type, "text/html; charset=utf-8");
        }
        other => panic!("expected InvalidContentType, got {other:?}"),
    }
    assert!(!temp_dir.path().join("moved.pdf").exists());
}

#[tokio::test]
async fn test_download_server_error_reports_status() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/broken.pdf"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().unwrap();

    let client = HttpClient::with_default_timeout().unwrap();
    let url = format!("{}/broken.pdf", mock_server.uri());
    let err = client
        .download_pdf(&url, temp_dir.path())
        .await
        .unwrap_err();

    match err {
        DownloadError::HttpStatus { status, .. } => assert_eq!(status, 500),
        other => panic!("expected HttpStatus, got {other:?}"),
    }
    assert!(!temp_dir.path().join("broken.pdf").exists());
}

#[tokio::test]
async fn test_download_slow_server_times_out() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/slow.pdf"))
        .respond_with(pdf_response(b"%PDF").set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().unwrap();

    let client = HttpClient::new(Duration::from_millis(200)).unwrap();
    let url = format!("{}/slow.pdf", mock_server.uri());
    let err = client
        .download_pdf(&url, temp_dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Timeout { .. }), "got {err:?}");
    assert!(!temp_dir.path().join("slow.pdf").exists());
}

#[tokio::test]
async fn test_download_connection_refused_is_network_error() {
    let temp_dir = TempDir::new().unwrap();
    let client = HttpClient::new(Duration::from_secs(5)).unwrap();

    // Port 9 (discard) is not expected to accept HTTP connections on localhost.
    let err = client
        .download_pdf("http://127.0.0.1:9/file.pdf", temp_dir.path())
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            DownloadError::Network { .. } | DownloadError::Timeout { .. }
        ),
        "got {err:?}"
    );
}
