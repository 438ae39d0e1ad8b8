//! Ledger listener.
//!
//! Bridges the two ledger subscription streams onto the worker bus. Events
//! are republished verbatim; ordering holds within each stream but not
//! across them.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};
use verity_bus::{DaEvent, EventPublisher};
use verity_ledger::{
    AdapterApi, ChallengeStartedNotification, LedgerError, PostCreatedNotification, RegistryApi,
};

/// Republishes ledger observations onto the worker bus.
pub struct LedgerListener {
    posts: broadcast::Receiver<PostCreatedNotification>,
    challenges: broadcast::Receiver<ChallengeStartedNotification>,
    publisher: Arc<dyn EventPublisher>,
}

impl LedgerListener {
    /// Opens both ledger subscriptions.
    ///
    /// A failure here is the one startup error the worker treats as fatal.
    pub async fn subscribe(
        registry: Arc<dyn RegistryApi>,
        adapter: Arc<dyn AdapterApi>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Result<Self, LedgerError> {
        let posts = registry.subscribe_posts().await?;
        let challenges = adapter.subscribe_challenges().await?;
        info!("[listener] Subscribed to post and challenge streams");

        Ok(Self {
            posts,
            challenges,
            publisher,
        })
    }

    /// Pumps both streams until they close.
    pub async fn run(mut self) {
        info!("[listener] Ledger listener started");

        let mut posts_open = true;
        let mut challenges_open = true;

        while posts_open || challenges_open {
            tokio::select! {
                event = self.posts.recv(), if posts_open => match event {
                    Ok(notification) => {
                        self.publisher
                            .publish(DaEvent::PostCreated {
                                post_id: notification.post_id,
                                content_hash: notification.content_hash,
                                commitment: notification.commitment,
                                creator: notification.creator,
                            })
                            .await;
                    }
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        warn!("[listener] Post stream lagged by {} events", count);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        info!("[listener] Post stream closed");
                        posts_open = false;
                    }
                },
                event = self.challenges.recv(), if challenges_open => match event {
                    Ok(notification) => {
                        self.publisher
                            .publish(DaEvent::CustodyChallengeStarted {
                                post_id: notification.post_id,
                                operator: notification.operator,
                                challenge_index: notification.challenge_index,
                            })
                            .await;
                    }
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        warn!("[listener] Challenge stream lagged by {} events", count);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        info!("[listener] Challenge stream closed");
                        challenges_open = false;
                    }
                },
            }
        }

        info!("[listener] Both streams closed, exiting");
    }
}
