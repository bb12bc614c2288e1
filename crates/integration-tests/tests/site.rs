//! Marketing site, preferences and PWA endpoints.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use naqlah_integration_tests::test_server;

// =============================================================================
// Health and pages
// =============================================================================

#[tokio::test]
async fn test_health() {
    let server = test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("ok");
}

#[tokio::test]
async fn test_home_defaults_to_arabic_rtl() {
    let server = test_server();
    let response = server.get("/").await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains(r#"lang="ar""#));
    assert!(html.contains(r#"dir="rtl""#));
    assert!(html.contains(r#"rel="manifest""#));
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let server = test_server();
    let response = server.get("/no-such-page").await;
    response.assert_status_not_found();

    let html = response.text();
    assert!(html.contains("الصفحة غير موجودة"));
    assert!(html.contains("جميع الحقوق محفوظة"));
}

#[tokio::test]
async fn test_security_headers_on_pages() {
    let server = test_server();
    let response = server.get("/").await;
    assert_eq!(response.header("x-frame-options"), "DENY");
    assert!(!response.header("content-security-policy").is_empty());
}

// =============================================================================
// Preferences
// =============================================================================

#[tokio::test]
async fn test_locale_switch_persists() {
    let server = test_server();

    let response = server
        .post("/preferences/locale")
        .form(&[("locale", "en"), ("next", "/company/register")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/company/register");

    let html = server.get("/").await.text();
    assert!(html.contains(r#"lang="en""#));
    assert!(html.contains(r#"dir="ltr""#));
}

#[tokio::test]
async fn test_locale_switch_ignores_offsite_next() {
    let server = test_server();
    let response = server
        .post("/preferences/locale")
        .form(&[("locale", "en"), ("next", "https://evil.example/")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");
}

#[tokio::test]
async fn test_unknown_locale_is_rejected() {
    let server = test_server();
    server
        .post("/preferences/locale")
        .form(&[("locale", "fr")])
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_install_prompt_dismissal() {
    let server = test_server();
    assert!(server.get("/").await.text().contains(r#"id="install-prompt""#));

    server
        .post("/preferences/install")
        .form(&[("next", "/")])
        .await
        .assert_status(StatusCode::SEE_OTHER);

    assert!(!server.get("/").await.text().contains(r#"id="install-prompt""#));
}

// =============================================================================
// PWA
// =============================================================================

#[tokio::test]
async fn test_manifest() {
    let server = test_server();
    let response = server.get("/manifest.json").await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/manifest+json");

    let manifest: serde_json::Value = response.json();
    assert_eq!(manifest["short_name"], "Naqlah");
    assert_eq!(manifest["display"], "standalone");
    assert_eq!(manifest["dir"], "rtl");
    assert_eq!(manifest["icons"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_service_worker_is_revalidated() {
    let server = test_server();
    let response = server.get("/sw.js").await;
    response.assert_status_ok();
    assert_eq!(response.header("cache-control"), "no-cache");
    assert_eq!(response.header("service-worker-allowed"), "/");
    assert!(response.text().contains("CLEAR_CACHE"));
}

#[tokio::test]
async fn test_offline_page_and_static_assets() {
    let server = test_server();
    server.get("/offline").await.assert_status_ok();

    let css = server.get("/static/css/main.css").await;
    css.assert_status_ok();
    assert_eq!(css.header("cache-control"), "public, max-age=604800");

    server
        .get("/static/images/icons/icon-192x192.png")
        .await
        .assert_status_ok();
}

// =============================================================================
// Contact and newsletter
// =============================================================================

#[tokio::test]
async fn test_contact_form_validation() {
    let server = test_server();
    server
        .post("/contact")
        .form(&[("name", ""), ("email", "not-an-email"), ("message", "")])
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_newsletter_signup() {
    let server = test_server();
    server
        .post("/newsletter")
        .form(&[("email", "reader@example.com")])
        .await
        .assert_status_ok();
    server
        .post("/newsletter")
        .form(&[("email", "reader")])
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}
