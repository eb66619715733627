use std::time::Duration;

use repo_downloader_lib::{GitHubClient, SearchError, Settings};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, token: Option<&str>) -> GitHubClient {
    GitHubClient::new(&Settings {
        api_url: server.uri(),
        token: token.map(str::to_string),
        timeout: Duration::from_secs(2),
        ..Settings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn decodes_items_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "react native"))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 2,
            "incomplete_results": false,
            "items": [
                {
                    "id": 1,
                    "name": "react-native",
                    "full_name": "facebook/react-native",
                    "description": "A framework for building native applications using React",
                    "language": "C++",
                    "stargazers_count": 118000,
                    "updated_at": "2026-10-15T08:00:00Z"
                },
                { "id": 2, "name": "react-native-paper", "description": null }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = client_for(&server, None)
        .search_repositories("react native")
        .await
        .expect("search ok");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "react-native");
    assert_eq!(items[0].stars, Some(118000));
    assert_eq!(items[1].name, "react-native-paper");
    assert_eq!(items[1].description, None);
}

#[tokio::test]
async fn missing_items_mean_empty_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_count": 0 })))
        .mount(&server)
        .await;

    let items = client_for(&server, None)
        .search_repositories("nothing")
        .await
        .expect("search ok");
    assert!(items.is_empty());
}

#[tokio::test]
async fn sends_bearer_token_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server, Some("secret"))
        .search_repositories("x")
        .await
        .expect("search ok");
}

#[tokio::test]
async fn rate_limited_response_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("X-RateLimit-Remaining", "0")
                .insert_header("X-RateLimit-Limit", "10")
                .set_body_json(json!({ "message": "API rate limit exceeded" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .search_repositories("x")
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Status(status) if status.as_u16() == 403));
    assert!(err.is_transient());
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .search_repositories("x")
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Decode(_)));
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(json!({ "items": [] })),
        )
        .mount(&server)
        .await;

    let client = GitHubClient::new(&Settings {
        api_url: server.uri(),
        timeout: Duration::from_millis(50),
        ..Settings::default()
    })
    .expect("client");

    let err = client.search_repositories("x").await.unwrap_err();
    assert!(matches!(err, SearchError::Request(ref e) if e.is_timeout()));
}
