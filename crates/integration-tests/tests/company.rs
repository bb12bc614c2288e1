//! Company onboarding.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use naqlah_integration_tests::test_server;

const PASSWORD: &str = "Str0ng!pass";

fn registration() -> MultipartForm {
    MultipartForm::new()
        .add_text("company_name", "نقل الخليج")
        .add_text("covenant", "")
        .add_text("city", "jeddah")
        .add_text("email", "ops@gulf-moving.sa")
        .add_text("password", PASSWORD)
        .add_text("confirm_password", PASSWORD)
        .add_text("secret_code", "")
        .add_text("services", "moving")
        .add_text("services", "packing")
        .add_text("about", "نقل أثاث داخل جدة منذ ٢٠١٠")
        .add_text("agree_terms", "on")
}

#[tokio::test]
async fn test_register_page_renders() {
    let server = test_server();
    let response = server.get("/register-company").await;
    response.assert_status_ok();
    assert!(response.text().contains(r#"enctype="multipart/form-data""#));
}

#[tokio::test]
async fn test_valid_registration_is_confirmed() {
    let server = test_server();
    let logo = Part::bytes(vec![0_u8; 128])
        .file_name("logo.png")
        .mime_type("image/png");

    let response = server
        .post("/register-company")
        .multipart(registration().add_part("logo", logo))
        .await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("نقل الخليج"));
    assert!(html.contains("ops@gulf-moving.sa"));
}

#[tokio::test]
async fn test_invalid_registration_keeps_input_but_not_passwords() {
    let server = test_server();
    let form = MultipartForm::new()
        .add_text("company_name", "نقل الخليج")
        .add_text("city", "paris")
        .add_text("email", "ops@gulf-moving.sa")
        .add_text("password", PASSWORD)
        .add_text("confirm_password", "different");

    let response = server.post("/register-company").multipart(form).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let html = response.text();
    assert!(html.contains("نقل الخليج"));
    assert!(!html.contains(PASSWORD));
}

#[tokio::test]
async fn test_logo_must_be_an_image() {
    let server = test_server();
    let logo = Part::bytes(b"not an image".to_vec())
        .file_name("logo.txt")
        .mime_type("text/plain");

    server
        .post("/register-company")
        .multipart(registration().add_part("logo", logo))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}
