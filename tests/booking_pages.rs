mod common;

use axum::http::StatusCode;

use common::*;

fn booking() -> axum::Router {
    router(&[("SERVICE", "booking")])
}

#[tokio::test]
async fn home_page_renders_without_flash() {
    let response = send(booking(), get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Fyyur"));
    assert!(!html.contains("class=\"flash\""));
}

#[tokio::test]
async fn venue_form_has_address_and_genres() {
    let response = send(booking(), get("/venues/create")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("action=\"/venues/create\""));
    assert!(html.contains("name=\"address\""));
    assert!(html.contains("name=\"seeking_talent\""));
    assert!(html.contains("<option value=\"Jazz\">Jazz</option>"));
}

#[tokio::test]
async fn artist_form_has_no_address() {
    let html = body_text(send(booking(), get("/artists/create")).await).await;
    assert!(html.contains("action=\"/artists/create\""));
    assert!(!html.contains("name=\"address\""));
    assert!(html.contains("name=\"seeking_venue\""));
}

#[tokio::test]
async fn show_form_renders() {
    let html = body_text(send(booking(), get("/shows/create")).await).await;
    assert!(html.contains("name=\"artist_id\""));
    assert!(html.contains("name=\"venue_id\""));
    assert!(html.contains("name=\"start_time\""));
}

#[tokio::test]
async fn invalid_submissions_flash_an_error() {
    let response = send(booking(), form_request("/venues/create", "city=San+Francisco&state=CA")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("An error occurred. Venue"));
    assert!(html.contains("could not be listed."));

    let html = body_text(
        send(booking(), form_request("/artists/create", "name=&genres=Jazz")).await,
    )
    .await;
    assert!(html.contains("An error occurred. Artist"));

    let html = body_text(
        send(booking(), form_request("/shows/create", "artist_id=4&venue_id=1&start_time=tomorrow")).await,
    )
    .await;
    assert!(html.contains("An error occurred. Show could not be listed."));
}

#[tokio::test]
async fn unknown_pages_and_methods_render_html_errors() {
    let response = send(booking(), get("/concerts")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_text(response).await;
    assert!(html.contains("<h1>404</h1>"));

    let response = send(booking(), form_request("/venues", "")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(body_text(response).await.contains("405"));
}

#[tokio::test]
async fn non_numeric_ids_render_the_not_found_page() {
    for uri in ["/venues/abc", "/artists/abc/edit"] {
        let response = send(booking(), get(uri)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        assert!(body_text(response).await.contains("<h1>404</h1>"));
    }

    let response = send(booking(), form_request("/venues/abc/edit", "name=Hop")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
