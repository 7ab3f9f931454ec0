#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use weekly_listens::listenbrainz::{AdditionalInfo, Listen, TrackMetadata};

pub fn listen(listened_at: i64, track_id: &str, artist: &str, name: &str) -> Listen {
    Listen {
        listened_at,
        track_metadata: Some(TrackMetadata {
            artist_name: Some(artist.to_string()),
            release_name: Some("A Whole Bunch Of Days Wonder".to_string()),
            track_name: Some(name.to_string()),
            additional_info: Some(AdditionalInfo {
                spotify_id: Some(track_id.to_string()),
            }),
        }),
    }
}

/// Bind a router to an ephemeral loopback port and serve it in the background.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub struct FakeListenBrainz {
    pub base_url: String,
    pub requests: Arc<AtomicUsize>,
}

/// A fake listens endpoint: newest-first dataset, answering "at most `count`
/// listens at or before `max_ts`" exactly like the real one.
pub async fn spawn_listenbrainz(listens: Vec<Listen>) -> FakeListenBrainz {
    #[derive(Clone)]
    struct ServerState {
        listens: Arc<Vec<Listen>>,
        requests: Arc<AtomicUsize>,
    }

    #[derive(Deserialize)]
    struct ListenQuery {
        max_ts: i64,
        count: usize,
    }

    async fn listens_handler(
        State(state): State<ServerState>,
        Query(query): Query<ListenQuery>,
    ) -> Json<Value> {
        state.requests.fetch_add(1, Ordering::SeqCst);
        let page: Vec<&Listen> = state
            .listens
            .iter()
            .filter(|listen| listen.listened_at <= query.max_ts)
            .take(query.count)
            .collect();
        Json(json!({ "payload": { "listens": page } }))
    }

    let requests = Arc::new(AtomicUsize::new(0));
    let state = ServerState {
        listens: Arc::new(listens),
        requests: requests.clone(),
    };
    let router = Router::new()
        .route("/1/user/{username}/listens", get(listens_handler))
        .with_state(state);
    let base_url = serve(router).await;

    FakeListenBrainz { base_url, requests }
}

pub struct FakeMicropub {
    pub endpoint: String,
    pub posts: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

pub async fn spawn_micropub() -> FakeMicropub {
    type Posts = Arc<Mutex<Vec<HashMap<String, String>>>>;

    async fn micropub_handler(
        State(posts): State<Posts>,
        Form(form): Form<HashMap<String, String>>,
    ) -> Json<Value> {
        posts.lock().unwrap().push(form);
        Json(json!({}))
    }

    let posts: Posts = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route("/micropub", post(micropub_handler))
        .with_state(posts.clone());
    let base_url = serve(router).await;

    FakeMicropub {
        endpoint: format!("{base_url}/micropub"),
        posts,
    }
}

/// A Micropub endpoint that rejects everything.
pub async fn spawn_failing_micropub() -> String {
    let router = Router::new().route(
        "/micropub",
        post(|| async { (StatusCode::FORBIDDEN, "insufficient scope") }),
    );
    let base_url = serve(router).await;
    format!("{base_url}/micropub")
}

/// A Songwhip-style converter that rewrites any url into
/// `https://songwhip.example/<url>`.
pub async fn spawn_songwhip() -> String {
    async fn songwhip_handler(Json(body): Json<Value>) -> Json<Value> {
        let url = body["url"].as_str().unwrap_or_default();
        Json(json!({ "url": format!("https://songwhip.example/{url}") }))
    }

    serve(Router::new().route("/", post(songwhip_handler))).await
}

/// A Songwhip-style converter that always fails.
pub async fn spawn_failing_songwhip() -> String {
    serve(Router::new().route(
        "/",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    ))
    .await
}
