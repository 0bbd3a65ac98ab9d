use std::sync::Arc;

use redditminer_core::{
    config::RedditConfig,
    models::{OrderingMode, RecencyWindow},
    traits::WorkUnit,
    SchedulerError,
};
use redditminer_infrastructure::RedditListingScraper;
use redditminer_testing_utils::RecordingStatisticsStore;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_scraper(server: &MockServer, store: &RecordingStatisticsStore) -> RedditListingScraper {
    let config = RedditConfig {
        base_url: server.uri(),
        user_agent: "redditminer-test".to_string(),
        request_timeout_seconds: 5,
        listing_limit: 25,
    };
    RedditListingScraper::new(&config, Arc::new(store.clone())).unwrap()
}

#[tokio::test]
async fn test_listing_is_summarized_and_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/rust/top.json"))
        .and(query_param("t", "week"))
        .and(query_param("limit", "25"))
        .and(header("user-agent", "redditminer-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "Listing",
            "data": {
                "children": [
                    { "kind": "t3", "data": { "score": 120, "num_comments": 14 } },
                    { "kind": "t3", "data": { "score": 30, "num_comments": 2 } }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = RecordingStatisticsStore::new();
    let scraper = create_scraper(&server, &store);

    let outcome = scraper
        .run("rust", RecencyWindow::Week, OrderingMode::Top)
        .await
        .unwrap();
    assert_eq!(outcome.items_collected, 2);

    let snapshots = store.snapshots();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].source_id, "rust");
    assert_eq!(snapshots[0].post_count, 2);
    assert_eq!(snapshots[0].total_score, 150);
    assert_eq!(snapshots[0].total_comments, 16);
}

#[tokio::test]
async fn test_server_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let store = RecordingStatisticsStore::new();
    let scraper = create_scraper(&server, &store);

    let err = scraper
        .run("rust", RecencyWindow::Day, OrderingMode::Hot)
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulerError::WorkUnit(_)));
    assert!(err.to_string().contains("503"));
    assert!(store.snapshots().is_empty());
}

#[tokio::test]
async fn test_malformed_listing_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/rust/new.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let store = RecordingStatisticsStore::new();
    let scraper = create_scraper(&server, &store);

    let err = scraper
        .run("rust", RecencyWindow::All, OrderingMode::New)
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulerError::Serialization(_)));
    assert!(store.snapshots().is_empty());
}

#[tokio::test]
async fn test_invalid_source_id_never_hits_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = RecordingStatisticsStore::new();
    let scraper = create_scraper(&server, &store);

    let err = scraper
        .run("../admin", RecencyWindow::Day, OrderingMode::Top)
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidTaskParams(_)));
}
