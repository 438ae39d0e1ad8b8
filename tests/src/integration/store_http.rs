//! # Blob Store HTTP Tests
//!
//! Boots the store service on an ephemeral port and drives it over real
//! HTTP, with the production client for the typed paths and a raw reqwest
//! client for the paths the typed client cannot produce (malformed digests,
//! raw status codes).

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use verity_crypto::{content_hash, digest_hex};
    use verity_store::{BlobSource, BlobStoreClient, BlobStoreService, StoreConfig, StoreError};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Boot a store on an ephemeral port and build a client pointed at it.
    async fn running_store() -> (BlobStoreService, SocketAddr, BlobStoreClient) {
        let mut service = BlobStoreService::new(StoreConfig::for_testing());
        let addr = service.start().await.expect("store should bind");
        let client = BlobStoreClient::new(format!("http://{addr}")).expect("client should build");
        (service, addr, client)
    }

    // =============================================================================
    // ROUND TRIPS THROUGH THE PRODUCTION CLIENT
    // =============================================================================

    #[tokio::test]
    async fn upload_then_fetch_round_trips() {
        let (mut service, _addr, client) = running_store().await;

        let blob = b"hello-da".to_vec();
        let uploaded = client.upload(blob.clone()).await.expect("upload");
        assert_eq!(uploaded, content_hash(&blob));

        let fetched = client.fetch(&uploaded).await.expect("fetch");
        assert_eq!(fetched, blob);

        service.shutdown();
    }

    #[tokio::test]
    async fn fetching_an_unknown_hash_reports_not_found() {
        let (mut service, _addr, client) = running_store().await;

        let missing = content_hash(b"never uploaded");
        let err = client.fetch(&missing).await.expect_err("fetch should miss");
        assert!(matches!(err, StoreError::NotFound { content_hash } if content_hash == missing));

        service.shutdown();
    }

    #[tokio::test]
    async fn health_reports_ok_while_running() {
        let (mut service, _addr, client) = running_store().await;

        assert!(client.health().await.expect("health"));

        service.shutdown();
    }

    // =============================================================================
    // REJECTION PATHS
    // =============================================================================

    #[tokio::test]
    async fn empty_uploads_are_rejected() {
        let (mut service, _addr, client) = running_store().await;

        let err = client.upload(Vec::new()).await.expect_err("empty upload");
        match err {
            StoreError::Transport { reason } => assert!(reason.contains("400")),
            other => panic!("expected a transport error, got {other:?}"),
        }

        service.shutdown();
    }

    #[tokio::test]
    async fn oversize_uploads_are_rejected() {
        let mut service = BlobStoreService::new(StoreConfig {
            port: 0,
            max_blob_bytes: 16,
        });
        let addr = service.start().await.expect("store should bind");
        let client = BlobStoreClient::new(format!("http://{addr}")).expect("client should build");

        let err = client.upload(vec![0u8; 64]).await.expect_err("oversize upload");
        match err {
            StoreError::Transport { reason } => assert!(reason.contains("413")),
            other => panic!("expected a transport error, got {other:?}"),
        }

        service.shutdown();
    }

    // =============================================================================
    // RAW WIRE BEHAVIOUR
    // =============================================================================

    #[tokio::test]
    async fn malformed_digest_paths_return_not_found() {
        let (mut service, addr, _client) = running_store().await;

        let response = reqwest::get(format!("http://{addr}/blob/not-hex"))
            .await
            .expect("request");
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

        service.shutdown();
    }

    #[tokio::test]
    async fn blobs_are_served_as_raw_bytes() {
        let (mut service, addr, client) = running_store().await;

        let blob = b"raw body".to_vec();
        let uploaded = client.upload(blob.clone()).await.expect("upload");

        let response = reqwest::get(format!("http://{addr}/blob/{}", digest_hex(&uploaded)))
            .await
            .expect("request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.bytes().await.expect("body").as_ref(), &blob[..]);

        service.shutdown();
    }

    #[tokio::test]
    async fn health_endpoint_speaks_json() {
        let (mut service, addr, _client) = running_store().await;

        let body: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
            .await
            .expect("request")
            .json()
            .await
            .expect("json body");
        assert_eq!(body, serde_json::json!({ "ok": true }));

        service.shutdown();
    }
}
