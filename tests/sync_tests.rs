use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    routing::get,
};
use http_body_util::BodyExt;
use showsync::config::Config;
use showsync::services::SyncError;
use showsync::state::SharedState;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const API_KEY: &str = "sync-test-key";

const CATALOG: &str = r#"[
    {
        "id": 1,
        "name": "Under the Dome",
        "language": "English",
        "genres": ["Drama", "Science-Fiction", "Thriller"],
        "rating": {"average": 6.5},
        "network": {
            "id": 2,
            "name": "CBS",
            "country": {"name": "United States", "code": "US", "timezone": "America/New_York"}
        },
        "externals": {"tvrage": 25988, "thetvdb": 264492, "imdb": "tt1553656"}
    },
    {
        "id": 2,
        "name": "Person of Interest",
        "language": "English",
        "genres": ["Action", "Crime", "Science-Fiction"],
        "rating": {"average": 8.8},
        "network": {
            "id": 2,
            "name": "CBS",
            "country": {"name": "United States", "code": "US", "timezone": "America/New_York"}
        },
        "externals": {"tvrage": 28376, "thetvdb": 248742, "imdb": "tt1839578"}
    },
    {
        "id": 3,
        "name": "Bitten",
        "language": "English",
        "genres": ["Drama", "Horror", "Romance"],
        "rating": {"average": null},
        "network": {
            "id": 7,
            "name": "Space",
            "country": {"name": "Canada", "code": "CA", "timezone": "America/Halifax"}
        },
        "externals": null
    },
    {
        "id": 4,
        "name": "Web Only",
        "language": null,
        "genres": [],
        "network": null
    }
]"#;

#[derive(Clone)]
struct FakeCatalog {
    status: Arc<Mutex<StatusCode>>,
    body: Arc<Mutex<String>>,
}

impl FakeCatalog {
    fn set(&self, status: StatusCode, body: &str) {
        *self.status.lock().unwrap() = status;
        *self.body.lock().unwrap() = body.to_string();
    }
}

async fn serve_shows(State(catalog): State<FakeCatalog>) -> (StatusCode, String) {
    let status = *catalog.status.lock().unwrap();
    let body = catalog.body.lock().unwrap().clone();
    (status, body)
}

/// Binds a stand-in for the upstream catalog on an ephemeral port.
async fn spawn_catalog(status: StatusCode, body: &str) -> (FakeCatalog, String) {
    let catalog = FakeCatalog {
        status: Arc::new(Mutex::new(status)),
        body: Arc::new(Mutex::new(body.to_string())),
    };

    let app = Router::new()
        .route("/shows", get(serve_shows))
        .with_state(catalog.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (catalog, format!("http://{addr}/shows"))
}

fn test_config(shows_url: String) -> Config {
    let db_path = std::env::temp_dir().join(format!("showsync-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.catalog.shows_url = shows_url;
    config.catalog.request_timeout_seconds = 5;
    config.job.api_key = API_KEY.to_string();
    config
}

async fn spawn_app(config: Config) -> Router {
    let state = showsync::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    showsync::api::router(state).await
}

async fn run_job(app: &Router) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/job/run")
                .header("x-api-key", API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_job_mirrors_catalog() {
    let (_catalog, url) = spawn_catalog(StatusCode::OK, CATALOG).await;
    let app = spawn_app(test_config(url)).await;

    let (status, json) = run_job(&app).await;
    assert_eq!(status, StatusCode::OK);
    let report = &json["data"];
    assert_eq!(report["fetched"], 4);
    assert_eq!(report["inserted"], 4);
    assert_eq!(report["skipped"], 0);
    // Drama, Science-Fiction, Thriller, Action, Crime, Horror, Romance
    assert_eq!(report["genres_created"], 7);
    assert_eq!(report["networks_created"], 2);
    assert_eq!(report["countries_created"], 2);

    let (status, json) = get_json(&app, "/api/shows").await;
    assert_eq!(status, StatusCode::OK);
    let shows = json["data"].as_array().unwrap();
    let ids: Vec<i64> = shows.iter().map(|s| s["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);

    let (_, json) = get_json(&app, "/api/shows/1").await;
    let dome = &json["data"];
    assert_eq!(dome["name"], "Under the Dome");
    assert_eq!(dome["network"]["name"], "CBS");
    assert_eq!(dome["network"]["country"]["timezone"], "America/New_York");
    assert_eq!(dome["rating"]["average"], 6.5);
    assert_eq!(dome["externals"]["imdb"], "tt1553656");
    let mut genres: Vec<&str> = dome["genres"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g.as_str().unwrap())
        .collect();
    genres.sort_unstable();
    assert_eq!(genres, vec!["Drama", "Science-Fiction", "Thriller"]);

    let (_, json) = get_json(&app, "/api/shows/3").await;
    assert!(json["data"]["rating"]["average"].is_null());
    assert!(json["data"].get("externals").is_none());

    let (_, json) = get_json(&app, "/api/shows/4").await;
    assert!(json["data"]["language"].is_null());
    assert!(json["data"].get("network").is_none());
    assert!(json["data"].get("rating").is_none());
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let (_catalog, url) = spawn_catalog(StatusCode::OK, CATALOG).await;
    let app = spawn_app(test_config(url)).await;

    let (_, first) = run_job(&app).await;
    assert_eq!(first["data"]["inserted"], 4);

    let (status, second) = run_job(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["data"]["inserted"], 0);
    assert_eq!(second["data"]["skipped"], 4);
    assert_eq!(second["data"]["genres_created"], 0);
    assert_eq!(second["data"]["networks_created"], 0);
    assert_eq!(second["data"]["countries_created"], 0);

    let (_, json) = get_json(&app, "/api/shows").await;
    assert_eq!(json["data"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_existing_show_is_not_overwritten() {
    let (catalog, url) = spawn_catalog(StatusCode::OK, CATALOG).await;
    let app = spawn_app(test_config(url)).await;

    run_job(&app).await;

    let renamed = CATALOG.replace("Under the Dome", "Over the Dome");
    catalog.set(StatusCode::OK, &renamed);
    let (_, json) = run_job(&app).await;
    assert_eq!(json["data"]["skipped"], 4);

    let (_, json) = get_json(&app, "/api/shows/1").await;
    assert_eq!(json["data"]["name"], "Under the Dome");
}

#[tokio::test]
async fn test_new_shows_reuse_stored_reference_rows() {
    let (catalog, url) = spawn_catalog(
        StatusCode::OK,
        r#"[{"id": 1, "name": "First", "genres": ["Drama"],
             "network": {"id": 2, "name": "CBS", "country": {"code": "US", "name": "United States", "timezone": "America/New_York"}}}]"#,
    )
    .await;
    let app = spawn_app(test_config(url)).await;

    let (_, json) = run_job(&app).await;
    assert_eq!(json["data"]["genres_created"], 1);

    catalog.set(
        StatusCode::OK,
        r#"[{"id": 5, "name": "Later", "genres": ["Drama", "Comedy"],
             "network": {"id": 2, "name": "CBS", "country": {"code": "US", "name": "United States", "timezone": "America/New_York"}}}]"#,
    );
    let (_, json) = run_job(&app).await;
    assert_eq!(json["data"]["inserted"], 1);
    assert_eq!(json["data"]["genres_created"], 1);
    assert_eq!(json["data"]["networks_created"], 0);
    assert_eq!(json["data"]["countries_created"], 0);

    let (_, json) = get_json(&app, "/api/shows/5").await;
    assert_eq!(json["data"]["network"]["id"], 2);
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let (_catalog, url) = spawn_catalog(StatusCode::SERVICE_UNAVAILABLE, "maintenance").await;
    let app = spawn_app(test_config(url)).await;

    let (status, json) = run_job(&app).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["success"], false);

    let (_, json) = get_json(&app, "/api/shows").await;
    assert_eq!(json["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_field_names_match_case_insensitively() {
    let (_catalog, url) = spawn_catalog(
        StatusCode::OK,
        r#"[{"ID": 9, "Name": "Shouting", "LANGUAGE": "English", "Genres": ["Comedy"],
             "Rating": {"Average": 7.1}}]"#,
    )
    .await;
    let app = spawn_app(test_config(url)).await;

    let (status, _) = run_job(&app).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = get_json(&app, "/api/shows/9").await;
    assert_eq!(json["data"]["name"], "Shouting");
    assert_eq!(json["data"]["genres"], serde_json::json!(["Comedy"]));
    assert_eq!(json["data"]["rating"]["average"], 7.1);
}

#[tokio::test]
async fn test_synchronizer_against_file_database() {
    let (_catalog, url) = spawn_catalog(StatusCode::OK, CATALOG).await;
    let shared = SharedState::new(test_config(url)).await.unwrap();

    let report = shared.synchronizer.synchronize().await.unwrap();
    assert_eq!(report.inserted, 4);
    assert!(report.finished_at >= report.started_at);

    let drama = shared.store.get_genre_by_name("Drama").await.unwrap().unwrap();
    let dome = shared.store.get_show(1).await.unwrap().unwrap();
    let bitten = shared.store.get_show(3).await.unwrap().unwrap();
    assert!(dome.genres.contains(&drama));
    assert!(bitten.genres.contains(&drama));

    let network = shared.store.get_network(2).await.unwrap().unwrap();
    assert_eq!(network.country_code.as_deref(), Some("US"));
}

#[tokio::test]
async fn test_undecodable_payload_is_reported() {
    let (_catalog, url) = spawn_catalog(StatusCode::OK, r#"{"not": "a list"}"#).await;
    let shared = SharedState::new(test_config(url)).await.unwrap();

    let err = shared.synchronizer.synchronize().await.unwrap_err();
    assert!(matches!(err, SyncError::Decode(_)));
    assert!(shared.store.list_shows().await.unwrap().is_empty());
}
