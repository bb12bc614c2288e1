//! The booking wizard end to end, for both flows.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use naqlah_core::Locale;
use naqlah_integration_tests::{EXISTING_PHONE, log_in, test_server};
use naqlah_web::i18n;

fn step(number: u8, fields: &[(&str, &str)]) -> MultipartForm {
    fields
        .iter()
        .fold(MultipartForm::new().add_text("step", number.to_string()), |form, (name, value)| {
            form.add_text(*name, *value)
        })
}

async fn post_step(server: &TestServer, base: &str, form: MultipartForm) -> StatusCode {
    server.post(base).multipart(form).await.status_code()
}

/// Current step number, read from the hidden field of the rendered form.
async fn current_step(server: &TestServer, base: &str) -> String {
    let html = server.get(base).await.text();
    let marker = r#"name="step" value=""#;
    let rest = html.split(marker).nth(1).unwrap();
    rest.chars().take_while(char::is_ascii_digit).collect()
}

fn pickup() -> MultipartForm {
    step(1, &[("address", "حي النرجس"), ("city", "الرياض")])
}

fn place_details() -> [(&'static str, &'static str); 4] {
    [
        ("city", "الرياض"),
        ("full_address", "شارع أنس بن مالك"),
        ("floor", "2"),
        ("has_elevator", "no"),
    ]
}

/// Fill steps 1 to 7 with valid data.
async fn fill_all_steps(server: &TestServer, base: &str) {
    let see_other = StatusCode::SEE_OTHER;
    assert_eq!(post_step(server, base, pickup()).await, see_other);
    assert_eq!(post_step(server, base, step(2, &place_details())).await, see_other);
    assert_eq!(
        post_step(
            server,
            base,
            step(
                3,
                &[
                    ("lat", "21.5433"),
                    ("lng", "39.1728"),
                    ("address", "حي الحمراء"),
                    ("city", "جدة"),
                ],
            ),
        )
        .await,
        see_other
    );
    assert_eq!(post_step(server, base, step(4, &place_details())).await, see_other);
    assert_eq!(
        post_step(
            server,
            base,
            step(5, &[("rooms_count", "3"), ("qty_bed", "2"), ("qty_sofa", "1")]),
        )
        .await,
        see_other
    );
    assert_eq!(
        post_step(server, base, step(6, &[("packaging", "yes"), ("insurance", "no")])).await,
        see_other
    );
    assert_eq!(
        post_step(
            server,
            base,
            step(
                7,
                &[("date", "2099-01-15"), ("hour", "10"), ("minute", "30"), ("period", "AM")],
            ),
        )
        .await,
        see_other
    );
}

// =============================================================================
// Request-move
// =============================================================================

#[tokio::test]
async fn test_starts_on_pickup_location() {
    let server = test_server();
    let response = server.get("/request-move").await;
    response.assert_status_ok();
    assert_eq!(current_step(&server, "/request-move").await, "1");
}

#[tokio::test]
async fn test_incomplete_step_rerenders_with_422() {
    let server = test_server();
    let response = server
        .post("/request-move")
        .multipart(step(1, &[("address", ""), ("city", "")]))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(current_step(&server, "/request-move").await, "1");
}

#[tokio::test]
async fn test_enter_in_location_form_continues() {
    let server = test_server();
    let html = server.get("/request-move").await.text();

    let form = html.split(r#"id="location-form""#).nth(1).unwrap();
    let first_button = form.split("<button").nth(1).unwrap();
    let first_button = first_button.split('>').next().unwrap();
    assert!(first_button.contains(r#"type="submit""#));
    assert!(!first_button.contains(r#"name="action""#));
}

#[tokio::test]
async fn test_pickup_prefills_details() {
    let server = test_server();
    assert_eq!(post_step(&server, "/request-move", pickup()).await, StatusCode::SEE_OTHER);

    let html = server.get("/request-move").await.text();
    assert!(html.contains(r#"name="full_address" value="حي النرجس""#));
    assert!(html.contains(r#"name="city" value="الرياض""#));
}

#[tokio::test]
async fn test_back_keeps_entered_data() {
    let server = test_server();
    post_step(&server, "/request-move", pickup()).await;
    assert_eq!(current_step(&server, "/request-move").await, "2");

    server
        .post("/request-move/back")
        .await
        .assert_status(StatusCode::SEE_OTHER);
    assert_eq!(current_step(&server, "/request-move").await, "1");
    assert!(server.get("/request-move").await.text().contains("حي النرجس"));

    // Back on the first step goes nowhere
    server.post("/request-move/back").await;
    assert_eq!(current_step(&server, "/request-move").await, "1");
}

#[tokio::test]
async fn test_stale_step_post_is_ignored() {
    let server = test_server();
    let status = post_step(&server, "/request-move", step(4, &place_details())).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(current_step(&server, "/request-move").await, "1");
}

#[tokio::test]
async fn test_bad_quantity_and_non_image_photo_are_rejected() {
    let server = test_server();
    let base = "/request-move";
    reach_furniture_step(&server, base).await;

    let status = post_step(&server, base, step(5, &[("rooms_count", "2"), ("qty_bed", "lots")])).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let pdf = Part::bytes(b"%PDF-1.4".to_vec())
        .file_name("inventory.pdf")
        .mime_type("application/pdf");
    let status = post_step(&server, base, step(5, &[("rooms_count", "2")]).add_part("photos", pdf)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let photo = Part::bytes(vec![0_u8; 64])
        .file_name("living-room.jpg")
        .mime_type("image/jpeg");
    let status = post_step(&server, base, step(5, &[("rooms_count", "2")]).add_part("photos", photo)).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(current_step(&server, base).await, "6");
}

/// Post valid steps 1 to 4, leaving the wizard on the furniture step.
async fn reach_furniture_step(server: &TestServer, base: &str) {
    post_step(server, base, pickup()).await;
    post_step(server, base, step(2, &place_details())).await;
    post_step(server, base, step(3, &[("address", "حي الحمراء"), ("city", "جدة")])).await;
    post_step(server, base, step(4, &place_details())).await;
    assert_eq!(current_step(server, base).await, "5");
}

#[tokio::test]
async fn test_malformed_quantity_keeps_posted_values() {
    let server = test_server();
    let base = "/request-move";
    reach_furniture_step(&server, base).await;

    let response = server
        .post(base)
        .multipart(step(
            5,
            &[("rooms_count", "4"), ("qty_sofa", "3"), ("qty_bed", "lots")],
        ))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let html = response.text();
    assert!(html.contains(r#"<option value="4" selected>"#));
    assert!(html.contains(r#"name="qty_sofa" value="3""#));
    assert!(html.contains("field-error"));
}

#[tokio::test]
async fn test_progress_bar_tracks_later_steps() {
    let server = test_server();
    let base = "/request-move";
    post_step(&server, base, pickup()).await;
    post_step(&server, base, step(2, &place_details())).await;

    let html = server.get(base).await.text();
    assert!(html.contains(r#"<progress class="progress" value="42""#));

    post_step(&server, base, step(3, &[("address", "حي الحمراء"), ("city", "جدة")])).await;
    post_step(&server, base, step(4, &place_details())).await;
    let html = server.get(base).await.text();
    assert!(html.contains(r#"<progress class="progress" value="71""#));

    let server = test_server();
    fill_all_steps(&server, base).await;
    let html = server.get(base).await.text();
    assert!(html.contains(r#"<progress class="progress" value="100""#));
}

#[tokio::test]
async fn test_past_date_is_rejected() {
    let server = test_server();
    let base = "/request-move";
    fill_all_steps(&server, base).await;
    server.post(&format!("{base}/edit/7")).await;

    let status = post_step(
        &server,
        base,
        step(7, &[("date", "2001-01-01"), ("hour", "10"), ("minute", "30")]),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_review_edit_and_submit() {
    let server = test_server();
    let base = "/request-move";
    fill_all_steps(&server, base).await;

    // Review page with an estimated route (the router is unreachable)
    let review = server.get(base).await;
    review.assert_status_ok();
    let html = review.text();
    assert!(html.contains(i18n::t(Locale::Ar, "review.route_estimate")));
    assert!(html.contains("10:30"));
    assert!(html.contains("حي الحمراء"));

    // Edit jumps back, and the following steps stay filled
    server
        .post(&format!("{base}/edit/6"))
        .await
        .assert_status(StatusCode::SEE_OTHER);
    assert_eq!(current_step(&server, base).await, "6");
    post_step(&server, base, step(6, &[("cleaning_after", "yes")])).await;
    assert_eq!(current_step(&server, base).await, "7");

    server.post(&format!("{base}/edit/99")).await;
    assert_eq!(current_step(&server, base).await, "7");

    post_step(
        &server,
        base,
        step(7, &[("date", "2099-01-15"), ("hour", "10"), ("minute", "30")]),
    )
    .await;

    let submitted = server.post(&format!("{base}/submit")).await;
    submitted.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(submitted.header("location"), base);

    let processing = server.get(base).await.text();
    assert!(processing.contains(i18n::t(Locale::Ar, "processing.title")));
    assert!(processing.contains(r#"href="/dashboard""#));

    // Nothing to go back to once submitted
    server.post(&format!("{base}/back")).await;
    assert!(server.get(base).await.text().contains(i18n::t(Locale::Ar, "processing.title")));

    server
        .post(&format!("{base}/restart"))
        .await
        .assert_status(StatusCode::SEE_OTHER);
    assert_eq!(current_step(&server, base).await, "1");
}

#[tokio::test]
async fn test_submit_before_review_is_ignored() {
    let server = test_server();
    post_step(&server, "/request-move", pickup()).await;

    let response = server.post("/request-move/submit").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(current_step(&server, "/request-move").await, "2");
}

// =============================================================================
// Order-move
// =============================================================================

#[tokio::test]
async fn test_order_move_requires_login() {
    let server = test_server();
    let response = server.get("/order-move").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");

    let posted = server.post("/order-move").multipart(pickup()).await;
    posted.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(posted.header("location"), "/");
}

#[tokio::test]
async fn test_flows_keep_separate_drafts() {
    let server = test_server();
    log_in(&server, EXISTING_PHONE).await;

    post_step(&server, "/request-move", pickup()).await;
    assert_eq!(current_step(&server, "/request-move").await, "2");
    assert_eq!(current_step(&server, "/order-move").await, "1");
}

#[tokio::test]
async fn test_order_move_submit_returns_to_dashboard() {
    let server = test_server();
    log_in(&server, EXISTING_PHONE).await;
    fill_all_steps(&server, "/order-move").await;

    let submitted = server.post("/order-move/submit").await;
    submitted.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(submitted.header("location"), "/dashboard?submitted=1");

    let dashboard = server.get("/dashboard").add_query_param("submitted", "1").await;
    dashboard.assert_status_ok();
    assert!(dashboard.text().contains(i18n::t(Locale::Ar, "dashboard.submitted")));

    // The draft is gone
    assert_eq!(current_step(&server, "/order-move").await, "1");
}
