//! Wire-level tests for the OpenAI-compatible embedding client.

use docvec_embeddings::{Embedder, EmbedderConfig, EmbeddingError, OpenAiEmbedder};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer, dimension: usize) -> OpenAiEmbedder {
    OpenAiEmbedder::new(
        EmbedderConfig::new("text-embedding-3-small")
            .with_api_key("sk-test")
            .with_base_url(format!("{}/v1", server.uri()))
            .with_dimension(dimension),
    )
}

#[tokio::test]
async fn embed_sends_model_and_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({
            "input": "a movie about sports",
            "model": "text-embedding-3-small",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "embedding": [0.1, 0.2, 0.3], "index": 0 }],
            "model": "text-embedding-3-small",
            "usage": { "prompt_tokens": 5, "total_tokens": 5 },
        })))
        .expect(1)
        .mount(&server)
        .await;

    let embedder = test_client(&server, 3);
    let vector = embedder.embed("a movie about sports").await.unwrap();

    assert_eq!(vector, vec![0.1, 0.2, 0.3]);
}

#[tokio::test]
async fn embed_maps_rate_limit_with_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let embedder = test_client(&server, 3);
    let err = embedder.embed("text").await.unwrap_err();

    match err {
        EmbeddingError::RateLimited { retry_after_secs } => assert_eq!(retry_after_secs, 7),
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn embed_rejects_empty_vector() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "embedding": [], "index": 0 }],
            "model": "text-embedding-3-small",
        })))
        .mount(&server)
        .await;

    let embedder = test_client(&server, 3);
    let err = embedder.embed("text").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::EmptyEmbedding));
}

#[tokio::test]
async fn embed_rejects_wrong_dimension() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "embedding": [0.1, 0.2], "index": 0 }],
            "model": "text-embedding-3-small",
        })))
        .mount(&server)
        .await;

    let embedder = test_client(&server, 3);
    let err = embedder.embed("text").await.unwrap_err();
    assert!(matches!(
        err,
        EmbeddingError::DimensionMismatch {
            expected: 3,
            actual: 2
        }
    ));
}

#[tokio::test]
async fn embed_surfaces_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let embedder = test_client(&server, 3);
    let err = embedder.embed("text").await.unwrap_err();

    match err {
        EmbeddingError::Api(message) => assert!(message.contains("upstream exploded")),
        other => panic!("expected Api, got {other:?}"),
    }
}
