//! # Attestation Flows
//!
//! Relay polling behaviour observed through the full wiring: ledger
//! notification in, bus events out, with the in-memory relay counting
//! every poll the worker makes.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
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
    use verity_store::{BlobSource, StoreError};
    use verity_types::{Address, Commitment, ContentHash};
    use verity_worker::{
        AttestationClient, Feature, InMemoryRelay, LedgerListener, PostCreatedHandler, RelayApi,
        RetryPolicy,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// In-process source serving exactly the given blobs.
    struct ServedBlobs {
        blobs: HashMap<ContentHash, Vec<u8>>,
    }

    impl ServedBlobs {
        fn serving(entries: Vec<(ContentHash, Vec<u8>)>) -> Arc<Self> {
            Arc::new(Self {
                blobs: entries.into_iter().collect(),
            })
        }
    }

    #[async_trait]
    impl BlobSource for ServedBlobs {
        async fn fetch(&self, content_hash: &ContentHash) -> Result<Vec<u8>, StoreError> {
            self.blobs
                .get(content_hash)
                .cloned()
                .ok_or(StoreError::NotFound {
                    content_hash: *content_hash,
                })
        }
    }

    fn creator() -> Address {
        Address::from_low_u64_be(0xAA)
    }

    /// A policy that retries immediately, so tests never sleep.
    fn immediate(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            interval: Duration::ZERO,
        }
    }

    async fn next_event(sub: &mut Subscription) -> DaEvent {
        timeout(Duration::from_secs(1), sub.recv())
            .await
            .expect("timed out waiting for an event")
            .expect("bus closed")
    }

    /// Wire the listener and the post handler onto one bus.
    async fn spawn_pipeline(
        ledger: &Arc<DevLedger>,
        bus: &Arc<InMemoryEventBus>,
        store: Arc<ServedBlobs>,
        attestation: Feature<AttestationClient>,
    ) {
        let listener = LedgerListener::subscribe(
            Arc::clone(ledger) as Arc<dyn RegistryApi>,
            Arc::clone(ledger) as Arc<dyn AdapterApi>,
            Arc::clone(bus) as Arc<dyn EventPublisher>,
        )
        .await
        .expect("ledger subscriptions should open");
        tokio::spawn(listener.run());

        let handler = PostCreatedHandler::new(
            bus.subscribe(EventFilter::topics(vec![EventTopic::Registry])),
            store as Arc<dyn BlobSource>,
            attestation,
            Arc::clone(bus) as Arc<dyn EventPublisher>,
        );
        tokio::spawn(handler.run());
    }

    /// Skip past the verification event and return the settled outcome.
    async fn settled_outcome(sub: &mut Subscription) -> AttestationOutcome {
        match next_event(sub).await {
            DaEvent::BlobVerified { matched, .. } => assert!(matched),
            other => panic!("expected a verification event, got {other:?}"),
        }
        match next_event(sub).await {
            DaEvent::AttestationSettled { outcome, .. } => outcome,
            other => panic!("expected attestation to settle, got {other:?}"),
        }
    }

    // =============================================================================
    // POLL BUDGETS
    // =============================================================================

    #[tokio::test]
    async fn a_spent_poll_budget_leaves_the_request_pending() {
        let blob = b"slow proof".to_vec();
        let anchored_hash = content_hash(&blob);
        let store = ServedBlobs::serving(vec![(anchored_hash, blob)]);

        let bus = Arc::new(InMemoryEventBus::new());
        let ledger = Arc::new(DevLedger::new(vec![creator()]));
        let relay = Arc::new(InMemoryRelay::ready_after(10));
        let client = AttestationClient::with_policy(
            Arc::clone(&relay) as Arc<dyn RelayApi>,
            7,
            None,
            immediate(3),
        );
        spawn_pipeline(&ledger, &bus, store, Feature::Enabled(client)).await;

        let mut outcomes = bus.subscribe(EventFilter::topics(vec![
            EventTopic::Verification,
            EventTopic::Attestation,
        ]));
        ledger.create_post(anchored_hash, Commitment::zero(), creator());

        match settled_outcome(&mut outcomes).await {
            AttestationOutcome::ProofPending { request_id, epoch } => {
                assert_eq!(epoch, 1);
                assert_eq!(relay.poll_count(&request_id), 3);
            }
            other => panic!("expected a pending request, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn a_proof_arriving_mid_poll_stops_the_polling() {
        let blob = b"quick proof".to_vec();
        let anchored_hash = content_hash(&blob);
        let store = ServedBlobs::serving(vec![(anchored_hash, blob)]);

        let bus = Arc::new(InMemoryEventBus::new());
        let ledger = Arc::new(DevLedger::new(vec![creator()]));
        let relay = Arc::new(InMemoryRelay::ready_after(1));
        let client = AttestationClient::with_policy(
            Arc::clone(&relay) as Arc<dyn RelayApi>,
            7,
            None,
            immediate(4),
        );
        spawn_pipeline(&ledger, &bus, store, Feature::Enabled(client)).await;

        let mut outcomes = bus.subscribe(EventFilter::topics(vec![
            EventTopic::Verification,
            EventTopic::Attestation,
        ]));
        ledger.create_post(anchored_hash, Commitment::zero(), creator());

        match settled_outcome(&mut outcomes).await {
            AttestationOutcome::ProofObtained { request_id, .. } => {
                assert_eq!(relay.poll_count(&request_id), 2);
            }
            other => panic!("expected a proof, got {other:?}"),
        }
    }

    // =============================================================================
    // DEGRADED RELAYS
    // =============================================================================

    #[tokio::test]
    async fn an_offline_relay_settles_as_failed() {
        let blob = b"unreachable".to_vec();
        let anchored_hash = content_hash(&blob);
        let store = ServedBlobs::serving(vec![(anchored_hash, blob)]);

        let bus = Arc::new(InMemoryEventBus::new());
        let ledger = Arc::new(DevLedger::new(vec![creator()]));
        let relay = Arc::new(InMemoryRelay::failing());
        let client = AttestationClient::new(Arc::clone(&relay) as Arc<dyn RelayApi>, 7, None);
        spawn_pipeline(&ledger, &bus, store, Feature::Enabled(client)).await;

        let mut outcomes = bus.subscribe(EventFilter::topics(vec![
            EventTopic::Verification,
            EventTopic::Attestation,
        ]));
        ledger.create_post(anchored_hash, Commitment::zero(), creator());

        match settled_outcome(&mut outcomes).await {
            AttestationOutcome::Failed { reason } => assert!(reason.contains("relay offline")),
            other => panic!("expected a failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn disabled_attestation_stops_at_verification() {
        let first_blob = b"first".to_vec();
        let second_blob = b"second".to_vec();
        let first_hash = content_hash(&first_blob);
        let second_hash = content_hash(&second_blob);
        let store = ServedBlobs::serving(vec![
            (first_hash, first_blob),
            (second_hash, second_blob),
        ]);

        let bus = Arc::new(InMemoryEventBus::new());
        let ledger = Arc::new(DevLedger::new(vec![creator()]));
        spawn_pipeline(&ledger, &bus, store, Feature::Disabled).await;

        let mut outcomes = bus.subscribe(EventFilter::topics(vec![
            EventTopic::Verification,
            EventTopic::Attestation,
        ]));
        let first = ledger.create_post(first_hash, Commitment::zero(), creator());
        let second = ledger.create_post(second_hash, Commitment::zero(), creator());

        // Two verifications back to back: had either post been attested, its
        // settlement would have landed between them.
        for expected in [first.id, second.id] {
            match next_event(&mut outcomes).await {
                DaEvent::BlobVerified {
                    post_id, matched, ..
                } => {
                    assert_eq!(post_id, expected);
                    assert!(matched);
                }
                other => panic!("expected a verification event, got {other:?}"),
            }
        }
    }
}
