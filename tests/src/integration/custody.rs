//! # Custody Challenge Flows
//!
//! Challenge rounds end to end: the dev ledger opens a round, the listener
//! republishes one challenge per operator, and the custody handler either
//! answers with a signed proof or reports the skip.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::timeout;

    use verity_bus::{
        DaEvent, EventFilter, EventPublisher, EventTopic, InMemoryEventBus, Subscription,
    };
    use verity_crypto::{content_hash, SigningIdentity};
    use verity_ledger::{AdapterApi, DevLedger, RegistryApi};
    use verity_types::{Address, Commitment};
    use verity_worker::{CustodyChallengeHandler, Feature, LedgerListener};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn operators(n: u64) -> Vec<Address> {
        (1..=n).map(Address::from_low_u64_be).collect()
    }

    async fn next_event(sub: &mut Subscription) -> DaEvent {
        timeout(Duration::from_secs(1), sub.recv())
            .await
            .expect("timed out waiting for an event")
            .expect("bus closed")
    }

    /// Wire the listener and the custody handler onto one bus.
    async fn spawn_responder(
        ledger: &Arc<DevLedger>,
        bus: &Arc<InMemoryEventBus>,
        identity: Feature<SigningIdentity>,
    ) {
        let listener = LedgerListener::subscribe(
            Arc::clone(ledger) as Arc<dyn RegistryApi>,
            Arc::clone(ledger) as Arc<dyn AdapterApi>,
            Arc::clone(bus) as Arc<dyn EventPublisher>,
        )
        .await
        .expect("ledger subscriptions should open");
        tokio::spawn(listener.run());

        let handler = CustodyChallengeHandler::new(
            bus.subscribe(EventFilter::topics(vec![EventTopic::Adapter])),
            Arc::clone(ledger) as Arc<dyn AdapterApi>,
            identity,
            Arc::clone(bus) as Arc<dyn EventPublisher>,
        );
        tokio::spawn(handler.run());
    }

    // =============================================================================
    // SIGNED RESPONSES
    // =============================================================================

    #[tokio::test]
    async fn every_challenge_gets_one_signed_proof() {
        let ledger = Arc::new(DevLedger::new(operators(2)));
        let bus = Arc::new(InMemoryEventBus::new());
        spawn_responder(&ledger, &bus, Feature::Enabled(SigningIdentity::generate())).await;
        let mut custody = bus.subscribe(EventFilter::topics(vec![EventTopic::Custody]));

        let post = ledger.create_post(
            content_hash(b"held blob"),
            Commitment::zero(),
            Address::from_low_u64_be(9),
        );
        ledger
            .start_custody_challenges(post.id)
            .await
            .expect("round should open");

        // Challenges arrive in index order within the stream.
        for expected_index in 0..2u64 {
            match next_event(&mut custody).await {
                DaEvent::CustodyProofSubmitted {
                    post_id,
                    operator,
                    challenge_index,
                } => {
                    assert_eq!(post_id, post.id);
                    assert_eq!(challenge_index, expected_index);
                    assert_eq!(operator, ledger.operators()[expected_index as usize]);
                }
                other => panic!("expected a submitted proof, got {other:?}"),
            }
        }

        let proofs = ledger.submitted_proofs();
        assert_eq!(proofs.len(), 2);
        for (index, proof) in proofs.iter().enumerate() {
            assert_eq!(proof.post_id, post.id);
            assert_eq!(proof.operator, ledger.operators()[index]);
            assert_eq!(proof.chunk_index, 0);
        }
    }

    // =============================================================================
    // SKIPPED RESPONSES
    // =============================================================================

    #[tokio::test]
    async fn without_an_identity_challenges_are_skipped() {
        let ledger = Arc::new(DevLedger::new(operators(2)));
        let bus = Arc::new(InMemoryEventBus::new());
        spawn_responder(&ledger, &bus, Feature::Disabled).await;
        let mut custody = bus.subscribe(EventFilter::topics(vec![EventTopic::Custody]));

        let post = ledger.create_post(
            content_hash(b"held blob"),
            Commitment::zero(),
            Address::from_low_u64_be(9),
        );
        ledger
            .start_custody_challenges(post.id)
            .await
            .expect("round should open");

        for expected_index in 0..2u64 {
            match next_event(&mut custody).await {
                DaEvent::CustodySkipped {
                    post_id,
                    challenge_index,
                    reason,
                    ..
                } => {
                    assert_eq!(post_id, post.id);
                    assert_eq!(challenge_index, expected_index);
                    assert!(reason.contains("no signing identity"));
                }
                other => panic!("expected a skip, got {other:?}"),
            }
        }
        assert!(ledger.submitted_proofs().is_empty());
    }
}
