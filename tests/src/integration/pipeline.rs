//! # Post Pipeline Flows
//!
//! The full data-availability path, wired the way the node runtime wires it:
//!
//! 1. **Upload**: a blob lands in the store service over HTTP
//! 2. **Anchor**: the dev ledger emits a post-created notification
//! 3. **Listen**: the ledger listener republishes it on the bus
//! 4. **Verify**: the post handler fetches the blob and checks its hash
//! 5. **Attest**: the handler requests a signature and polls for the proof

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::timeout;

    use verity_bus::{
        AttestationOutcome, DaEvent, EventFilter, EventPublisher, EventTopic, InMemoryEventBus,
        Subscription,
    };
    use verity_crypto::content_hash;
    use verity_ledger::{AdapterApi, DevLedger, RegistryApi};
    use verity_store::{BlobSource, BlobStoreClient, BlobStoreService, StoreConfig, StoreError};
    use verity_types::{Address, Commitment, ContentHash};
    use verity_worker::{
        AttestationClient, Feature, InMemoryRelay, LedgerListener, PostCreatedHandler, RelayApi,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn operators(n: u64) -> Vec<Address> {
        (1..=n).map(Address::from_low_u64_be).collect()
    }

    fn creator() -> Address {
        Address::from_low_u64_be(0xAA)
    }

    async fn next_event(sub: &mut Subscription) -> DaEvent {
        timeout(Duration::from_secs(1), sub.recv())
            .await
            .expect("timed out waiting for an event")
            .expect("bus closed")
    }

    /// Republish ledger notifications onto the bus, as the runtime does.
    async fn spawn_listener(ledger: &Arc<DevLedger>, bus: &Arc<InMemoryEventBus>) {
        let listener = LedgerListener::subscribe(
            Arc::clone(ledger) as Arc<dyn RegistryApi>,
            Arc::clone(ledger) as Arc<dyn AdapterApi>,
            Arc::clone(bus) as Arc<dyn EventPublisher>,
        )
        .await
        .expect("ledger subscriptions should open");
        tokio::spawn(listener.run());
    }

    /// A source that serves bytes other than what the post anchored.
    struct TamperedSource;

    #[async_trait]
    impl BlobSource for TamperedSource {
        async fn fetch(&self, _content_hash: &ContentHash) -> Result<Vec<u8>, StoreError> {
            Ok(b"tampered".to_vec())
        }
    }

    // =============================================================================
    // HAPPY PATH
    // =============================================================================

    #[tokio::test]
    async fn anchored_blob_flows_from_upload_to_attestation() {
        let mut service = BlobStoreService::new(StoreConfig::for_testing());
        let addr = service.start().await.expect("store should bind");
        let store =
            Arc::new(BlobStoreClient::new(format!("http://{addr}")).expect("client should build"));

        let blob = b"hello-da".to_vec();
        let anchored_hash = store.upload(blob.clone()).await.expect("upload");

        let bus = Arc::new(InMemoryEventBus::new());
        let ledger = Arc::new(DevLedger::new(operators(1)));
        spawn_listener(&ledger, &bus).await;

        let relay = Arc::new(InMemoryRelay::new());
        let attestation =
            AttestationClient::new(Arc::clone(&relay) as Arc<dyn RelayApi>, 7, Some(3));
        let handler = PostCreatedHandler::new(
            bus.subscribe(EventFilter::topics(vec![EventTopic::Registry])),
            Arc::clone(&store) as Arc<dyn BlobSource>,
            Feature::Enabled(attestation),
            Arc::clone(&bus) as Arc<dyn EventPublisher>,
        );
        tokio::spawn(handler.run());

        let mut outcomes = bus.subscribe(EventFilter::topics(vec![
            EventTopic::Verification,
            EventTopic::Attestation,
        ]));

        let post = ledger.create_post(anchored_hash, Commitment::zero(), creator());

        match next_event(&mut outcomes).await {
            DaEvent::BlobVerified {
                post_id, matched, ..
            } => {
                assert_eq!(post_id, post.id);
                assert!(matched);
            }
            other => panic!("expected a verification event, got {other:?}"),
        }

        match next_event(&mut outcomes).await {
            DaEvent::AttestationSettled { post_id, outcome } => {
                assert_eq!(post_id, post.id);
                match outcome {
                    AttestationOutcome::ProofObtained { epoch, .. } => assert_eq!(epoch, 3),
                    other => panic!("expected a proof, got {other:?}"),
                }
            }
            other => panic!("expected attestation to settle, got {other:?}"),
        }

        service.shutdown();
    }

    // =============================================================================
    // TAMPERED CONTENT
    // =============================================================================

    #[tokio::test]
    async fn tampered_blobs_are_flagged_and_never_attested() {
        let bus = Arc::new(InMemoryEventBus::new());
        let ledger = Arc::new(DevLedger::new(operators(1)));
        spawn_listener(&ledger, &bus).await;

        let relay = Arc::new(InMemoryRelay::new());
        let attestation =
            AttestationClient::new(Arc::clone(&relay) as Arc<dyn RelayApi>, 7, None);
        let handler = PostCreatedHandler::new(
            bus.subscribe(EventFilter::topics(vec![EventTopic::Registry])),
            Arc::new(TamperedSource) as Arc<dyn BlobSource>,
            Feature::Enabled(attestation),
            Arc::clone(&bus) as Arc<dyn EventPublisher>,
        );
        tokio::spawn(handler.run());

        let mut outcomes = bus.subscribe(EventFilter::topics(vec![
            EventTopic::Verification,
            EventTopic::Attestation,
        ]));

        let first = ledger.create_post(content_hash(b"original"), Commitment::zero(), creator());
        let second = ledger.create_post(content_hash(b"another"), Commitment::zero(), creator());

        // Two mismatch reports back to back: the second proves the handler
        // kept going, and that nothing was attested in between.
        for expected in [first.id, second.id] {
            match next_event(&mut outcomes).await {
                DaEvent::BlobVerified {
                    post_id, matched, ..
                } => {
                    assert_eq!(post_id, expected);
                    assert!(!matched);
                }
                other => panic!("expected a verification event, got {other:?}"),
            }
        }
        assert_eq!(relay.request_count(), 0);
    }
}
