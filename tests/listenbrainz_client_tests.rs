mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use common::{listen, serve, spawn_listenbrainz};
use weekly_listens::config::ListenBrainzSettings;
use weekly_listens::listenbrainz::{FetchError, Listen, ListenBrainzClient};

fn settings(base_url: &str) -> ListenBrainzSettings {
    ListenBrainzSettings {
        base_url: base_url.to_string(),
        username: "listener".to_string(),
        page_size: 100,
        page_delay: Duration::ZERO,
    }
}

fn newest_listen_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2011, 1, 30, 12, 0, 0).unwrap()
}

/// 1000 listens, newest first, 5 minutes apart, newest at [`newest_listen_time`].
fn fixture_listens() -> Vec<Listen> {
    let newest = newest_listen_time().timestamp();
    (0..1000)
        .map(|i| {
            listen(
                newest - i * 300,
                &format!("track-{i}"),
                "Ohmme",
                &format!("Song {i}"),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_small_window_needs_a_single_request() {
    let all = fixture_listens();
    let server = spawn_listenbrainz(all.clone()).await;
    let client = ListenBrainzClient::new(settings(&server.base_url));

    let end = newest_listen_time();
    let fetched = client
        .fetch_listens(end - chrono::Duration::minutes(15), end)
        .await
        .unwrap();

    assert_eq!(fetched, all[..4].to_vec());
    assert_eq!(server.requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_wide_window_pages_until_short() {
    let all = fixture_listens();
    let server = spawn_listenbrainz(all.clone()).await;
    let client = ListenBrainzClient::new(settings(&server.base_url));

    // 745 minutes covers the 150 newest listens: a full page of 100,
    // then a page trimmed to 50 by the window start.
    let end = newest_listen_time();
    let fetched = client
        .fetch_listens(end - chrono::Duration::minutes(745), end)
        .await
        .unwrap();

    assert_eq!(fetched.len(), 150);
    assert_eq!(fetched, all[..150].to_vec());
    assert_eq!(server.requests.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_window_ending_on_a_page_boundary() {
    let all = fixture_listens();
    let server = spawn_listenbrainz(all.clone()).await;
    let client = ListenBrainzClient::new(settings(&server.base_url));

    // Exactly 100 listens in the window; the client cannot tell the page was
    // the last one and must ask once more, coming back empty.
    let end = newest_listen_time();
    let start = end - chrono::Duration::seconds(99 * 300);
    let fetched = client.fetch_listens(start, end).await.unwrap();

    assert_eq!(fetched, all[..100].to_vec());
    assert_eq!(server.requests.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_duplicate_timestamps_are_fatal() {
    let newest = newest_listen_time().timestamp();
    let mut listens = fixture_listens();
    listens[3].listened_at = newest - 300;

    let server = spawn_listenbrainz(listens).await;
    let client = ListenBrainzClient::new(settings(&server.base_url));

    let end = newest_listen_time();
    let err = client
        .fetch_listens(end - chrono::Duration::minutes(30), end)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FetchError::DuplicateTimestamp { timestamp } if timestamp == newest - 300
    ));
}

#[tokio::test]
async fn test_inverted_window_is_rejected_without_a_request() {
    let server = spawn_listenbrainz(fixture_listens()).await;
    let client = ListenBrainzClient::new(settings(&server.base_url));

    let end = newest_listen_time();
    let err = client
        .fetch_listens(end, end - chrono::Duration::minutes(15))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::InvalidWindow { .. }));

    let err = client.fetch_listens(end, end).await.unwrap_err();
    assert!(matches!(err, FetchError::InvalidWindow { .. }));

    assert_eq!(server.requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upstream_error_status_surfaces() {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;

    let router = Router::new().route(
        "/1/user/{username}/listens",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "upstream busy") }),
    );
    let base_url = serve(router).await;
    let client = ListenBrainzClient::new(settings(&base_url));

    let end = newest_listen_time();
    let err = client
        .fetch_listens(end - chrono::Duration::minutes(15), end)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FetchError::Api { status: 503, ref message } if message == "upstream busy"
    ));
}
