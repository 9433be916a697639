use axum::body::Body;
use axum::http::{self, StatusCode, header};
use tower::ServiceExt;

use crate::tests::common::{MockChat, MockStore, body_json, body_text, get, test_app};

fn app() -> axum::Router {
    test_app(MockChat::replying(""), MockStore::returning_id("x"))
}

fn language_form(uri: &str, body: &'static str) -> http::Request<Body> {
    http::Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_language_switch_on_any_page_path() {
    for uri in ["/", "/gallery?page=2", "/generator"] {
        let response = app().oneshot(language_form(uri, "language=fr")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "uri {}", uri);
        assert_eq!(response.headers()[header::LOCATION], uri);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("locale=fr;"));
        assert!(cookie.contains("Max-Age=31536000"));
    }
}

#[tokio::test]
async fn test_index_renders_cookie_locale() {
    let request = http::Request::get("/")
        .header(header::COOKIE, "locale=fr")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_LANGUAGE], "fr");
    let html = body_text(response).await;
    assert!(html.contains("Bienvenue sur le générateur SVG"));
}

#[tokio::test]
async fn test_i18n_table_from_accept_language() {
    let request = http::Request::get("/i18n")
        .header(header::ACCEPT_LANGUAGE, "fr-FR,fr;q=0.9")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    let body = body_json(response).await;
    assert_eq!(body["lang"], "fr");
    assert_eq!(body["ui"]["nav"]["gallery"], "Galerie");
    assert_eq!(body["languages"][0]["code"], "en");
    assert_eq!(body["languages"][1]["name"], "French");
}

#[tokio::test]
async fn test_invalid_cookie_never_wins() {
    let request = http::Request::get("/i18n")
        .header(header::COOKIE, "locale=es")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(body_json(response).await["lang"], "en");
}

#[tokio::test]
async fn test_unknown_page_is_not_found() {
    let response = app().oneshot(get("/nowhere")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let response = app().oneshot(get("/api-docs/openapi.json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert!(doc["paths"]["/api/generateSVGFormatted"]["post"].is_object());
    assert!(doc["paths"]["/api/saveSVG"]["post"].is_object());
}
