use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{
    AppState,
    boxoffice::{
        BoxOfficeClient,
        tests::{STUB_KEY, spawn_stub_provider},
    },
    config::Config,
    db::test_db,
    router,
    store::Store,
};

const TOKEN: &str = "test-token";

async fn test_app(provider: Option<SocketAddr>) -> (tempfile::TempDir, Router) {
    let (dir, db) = test_db().await;

    let config = Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        database_url: String::new(),
        boxoffice_url: provider.map(|addr| format!("http://{addr}")),
        boxoffice_api_key: provider.map(|_| STUB_KEY.to_string()),
        boxoffice_timeout: Duration::from_millis(500),
        auth_token: Some(TOKEN.to_string()),
    };
    let boxoffice = BoxOfficeClient::new(
        reqwest::Client::new(),
        config.boxoffice_url.clone(),
        config.boxoffice_api_key.clone(),
        config.boxoffice_timeout,
    );

    let state = Arc::new(AppState {
        config: Arc::new(config),
        store: Store::new(db),
        boxoffice: Arc::new(boxoffice),
    });
    (dir, router(state))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

fn create_request(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/movies/")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn rate_request(title: &str, rater: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(format!("/movies/title/{title}/ratings"))
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(rater) = rater {
        builder = builder.header("X-Rater-Id", rater);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn dune() -> Value {
    json!({ "title": "Dune", "releaseDate": "2021-10-22", "genre": "Sci-Fi" })
}

#[tokio::test]
async fn test_dune_end_to_end() {
    let provider = spawn_stub_provider().await;
    let (_dir, app) = test_app(Some(provider)).await;

    let (status, created) = send(&app, create_request(dune())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["distributor"], "WB");
    assert_eq!(created["budget"], 1_000_000);
    assert_eq!(created["boxOffice"]["currency"], "USD");
    assert_eq!(created["boxOffice"]["source"], "BoxOfficeAPI");
    assert_eq!(created["boxOffice"]["revenue"]["worldwide"], 402_000_000);

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send(&app, get(&format!("/movies/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = send(&app, rate_request("Dune", Some("r1"), r#"{"rating":4.5}"#)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "movieTitle": "Dune", "raterId": "r1", "rating": 4.5 }));

    let (status, body) = send(&app, rate_request("Dune", Some("r1"), r#"{"rating":3.0}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], 3.0);

    let (status, body) = send(&app, rate_request("Dune", Some("r1"), r#"{"rating":2.3}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Invalid rating value");

    let (status, body) = send(&app, get("/movies/title/Dune/rating")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "average": 3.0, "count": 1 }));
}

#[tokio::test]
async fn test_create_without_provider_has_null_box_office() {
    let (_dir, app) = test_app(None).await;

    let mut input = dune();
    input["distributor"] = json!("Legendary");
    let (status, created) = send(&app, create_request(input)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["distributor"], "Legendary");
    assert!(created["boxOffice"].is_null());
    assert!(created.get("budget").is_none());
}

#[tokio::test]
async fn test_create_requires_bearer_token() {
    let (_dir, app) = test_app(None).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/movies")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, "Bearer wrong")
        .body(Body::from(dune().to_string()))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, listed) = send(&app, get("/movies/")).await;
    assert_eq!(listed, json!({ "items": [] }));
}

#[tokio::test]
async fn test_create_rejects_malformed_bodies() {
    let (_dir, app) = test_app(None).await;

    let missing_title = json!({ "releaseDate": "2021-10-22", "genre": "Sci-Fi" });
    let (status, body) = send(&app, create_request(missing_title)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let blank_title = json!({ "title": "", "releaseDate": "2021-10-22", "genre": "Sci-Fi" });
    let (status, _) = send(&app, create_request(blank_title)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let bad_date = json!({ "title": "Dune", "releaseDate": "soon", "genre": "Sci-Fi" });
    let (status, _) = send(&app, create_request(bad_date)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = send(&app, get("/movies")).await;
    assert_eq!(listed, json!({ "items": [] }));
}

#[tokio::test]
async fn test_duplicate_title_conflicts() {
    let (_dir, app) = test_app(None).await;

    let (status, _) = send(&app, create_request(dune())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, create_request(dune())).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_movies_with_filters() {
    let (_dir, app) = test_app(None).await;

    send(&app, create_request(dune())).await;
    send(
        &app,
        create_request(json!({
            "title": "Arrival",
            "releaseDate": "2016-11-11",
            "genre": "Drama",
            "budget": 47_000_000
        })),
    )
    .await;

    let (status, body) =
        send(&app, get("/movies/?q=arr&year=2016&genre=Drama&budget=50000000")).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Arrival");

    let (_, body) = send(&app, get("/movies?year=&q=")).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, get("/movies?limit=1")).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, get("/movies?year=twenty")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_unknown_movie() {
    let (_dir, app) = test_app(None).await;

    let (status, body) = send(&app, get("/movies/does-not-exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Movie not found");
}

#[tokio::test]
async fn test_rating_preconditions() {
    let (_dir, app) = test_app(None).await;
    send(&app, create_request(dune())).await;

    let (status, body) = send(&app, rate_request("Dune", None, r#"{"rating":4.0}"#)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing X-Rater-Id header");

    let (status, _) = send(&app, rate_request("Arrival", Some("r1"), r#"{"rating":4.0}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, rate_request("Dune", Some("r1"), r#"{"score":4.0}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, rate_request("Dune", Some("r1"), r#"{"rating":5.5}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&app, get("/movies/title/Dune/rating")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "average": 0.0, "count": 0 }));

    let (status, _) = send(&app, get("/movies/title/Arrival/rating")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rating_titles_are_path_decoded() {
    let (_dir, app) = test_app(None).await;
    send(
        &app,
        create_request(json!({ "title": "Blade Runner", "releaseDate": "1982-06-25", "genre": "Sci-Fi" })),
    )
    .await;

    let (status, body) =
        send(&app, rate_request("Blade%20Runner", Some("r1"), r#"{"rating":5}"#)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["movieTitle"], "Blade Runner");
}

#[tokio::test]
async fn test_healthz() {
    let (_dir, app) = test_app(None).await;

    let (status, body) = send(&app, get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}
