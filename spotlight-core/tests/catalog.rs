//! Integration tests for the artist catalog client.
//!
//! These tests verify that the CatalogClient correctly:
//! - Presents the bearer token on catalog calls
//! - Short-circuits when no token can be obtained or the query is empty
//! - Preserves the provider's result ordering
//! - Treats the provider's "no results" shape as an empty outcome

use async_trait::async_trait;
use url::Url;

use spotlight_core::{ApiError, ArtistId, AuthError, CatalogClient, Secret, TokenSource};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

/// Token source with a canned token and no I/O.
struct StaticTokens;

#[async_trait]
impl TokenSource for StaticTokens {
    async fn get_token(&self) -> Result<Secret, AuthError> {
        Ok(Secret::new("test-token"))
    }
}

/// Token source that always refuses.
struct RefusingTokens;

#[async_trait]
impl TokenSource for RefusingTokens {
    async fn get_token(&self) -> Result<Secret, AuthError> {
        Err(AuthError::MissingCredentials)
    }
}

fn catalog_for(server_uri: &str) -> CatalogClient<StaticTokens> {
    CatalogClient::new(StaticTokens).with_base_url(Url::parse(server_uri).unwrap())
}

#[tokio::test]
async fn test_get_artist_returns_parsed_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/artists/4Z8W4fKeB5YxbusRsdQVPb"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "4Z8W4fKeB5YxbusRsdQVPb",
            "name": "Radiohead",
            "genres": ["art rock", "melancholia"],
            "followers": { "total": 10549955 },
            "popularity": 79
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let catalog = catalog_for(&mock_server.uri());
    let artist = catalog
        .get_artist(&ArtistId::new("4Z8W4fKeB5YxbusRsdQVPb"))
        .await
        .unwrap();

    assert_eq!(artist.id.as_str(), "4Z8W4fKeB5YxbusRsdQVPb");
    assert_eq!(artist.name, "Radiohead");
    assert_eq!(artist.raw["popularity"], 79);
    assert_eq!(artist.raw["followers"]["total"], 10549955);
}

#[tokio::test]
async fn test_get_artist_failure_carries_the_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/artists/does-not-exist"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": { "status": 404, "message": "non existing id" }
        })))
        .mount(&mock_server)
        .await;

    let catalog = catalog_for(&mock_server.uri());
    let result = catalog.get_artist(&ArtistId::new("does-not-exist")).await;

    match result {
        Err(ApiError::RequestFailed { target, .. }) => assert_eq!(target, "does-not-exist"),
        other => panic!("expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_artist_without_token_issues_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let catalog = CatalogClient::new(RefusingTokens)
        .with_base_url(Url::parse(&mock_server.uri()).unwrap());

    let result = catalog.get_artist(&ArtistId::new("abc")).await;
    assert!(matches!(result, Err(ApiError::Unauthenticated(_))));
}

#[tokio::test]
async fn test_search_sends_expected_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("q", "nina simone"))
        .and(query_param("type", "artist"))
        .and(query_param("limit", "10"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "artists": { "items": [] }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let catalog = catalog_for(&mock_server.uri());
    let results = catalog.search_artists("nina simone").await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_search_preserves_provider_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "artists": {
                "items": [
                    { "id": "first-id", "name": "First Match" },
                    { "id": "second-id", "name": "Second Match" }
                ]
            }
        })))
        .mount(&mock_server)
        .await;

    let catalog = catalog_for(&mock_server.uri());
    let results = catalog.search_artists("match").await.unwrap();

    let names: Vec<&str> = results.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["First Match", "Second Match"]);
}

#[tokio::test]
async fn test_search_missing_items_path_is_empty_not_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let catalog = catalog_for(&mock_server.uri());
    let results = catalog.search_artists("anything").await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_search_empty_query_issues_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let catalog = catalog_for(&mock_server.uri());

    assert!(catalog.search_artists("").await.unwrap().is_empty());
    assert!(catalog.search_artists("   ").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_failure_carries_the_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let catalog = catalog_for(&mock_server.uri());
    let result = catalog.search_artists("nina").await;

    match result {
        Err(ApiError::RequestFailed { target, .. }) => assert_eq!(target, "nina"),
        other => panic!("expected RequestFailed, got {:?}", other),
    }
}
