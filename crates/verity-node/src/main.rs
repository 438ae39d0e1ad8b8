//! # Verity Node - Attestation Worker Runtime
//!
//! The entry point wiring the worker together: configuration, the event
//! bus, the ledger bridge, the blob store client and the handler tasks.
//!
//! ## Event Flow
//!
//! ```text
//! Ledger bridge ──posts / challenges──→ Listener
//!                                          │ publish
//!                                          ▼
//!                                     Event Bus
//!                                     │        │
//!                            subscribe│        │subscribe
//!                                     ▼        ▼
//!                              [da] handler  [custody] handler
//!                              fetch, verify  sign and submit
//!                              and attest     possession proofs
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Evaluate optional features (ledger, attestation relay, signing key)
//! 3. Connect the ledger bridge and open both subscriptions
//! 4. Start the handler tasks
//! 5. Run until Ctrl+C
//!
//! With no ledger configured the node stays up idle; a content hash on the
//! command line instead runs a one-shot fetch-and-verify and exits.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use verity_bus::{EventFilter, EventPublisher, EventTopic, InMemoryEventBus};
use verity_crypto::{digest_hex, parse_digest, verify_blob};
use verity_ledger::{AdapterApi, LedgerBridge, RegistryApi};
use verity_store::{BlobSource, BlobStoreClient};
use verity_types::Address;
use verity_worker::{
    evaluate_attestation, evaluate_ledger, evaluate_signing_key, AttestationClient,
    CustodyChallengeHandler, Feature, HttpRelayClient, LedgerListener, PostCreatedHandler,
    WorkerConfig,
};

/// The worker runtime orchestrating the bus, the listener and the handlers.
pub struct WorkerRuntime {
    /// Shared event bus.
    bus: Arc<InMemoryEventBus>,
    /// Shutdown signal sender.
    shutdown_tx: tokio::sync::watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
}

impl WorkerRuntime {
    /// Create the runtime shell: the bus and the shutdown channel.
    #[must_use]
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

        Self {
            bus: Arc::new(InMemoryEventBus::new()),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Start the worker.
    ///
    /// ## Startup Sequence
    ///
    /// 1. Build the blob store client
    /// 2. Build the attestation client, when the relay is configured
    /// 3. Connect the ledger bridge and open both subscriptions
    /// 4. Spawn the listener and the handler tasks
    ///
    /// A failed bridge connection or subscription aborts startup. Every
    /// failure after this point degrades per event instead.
    pub async fn start(&self, config: WorkerConfig) -> Result<()> {
        info!("===========================================");
        info!("  Verity Attestation Worker v0.1.0");
        info!("===========================================");

        let store = Arc::new(
            BlobStoreClient::new(&config.store_url)
                .context("failed to build the blob store client")?,
        );
        info!("Blob store at {}", config.store_url);

        let attestation = match config.attestation {
            Feature::Enabled(params) => match HttpRelayClient::new(&params.endpoint) {
                Ok(relay) => {
                    info!(
                        "Attestation relay at {} (key tag {})",
                        params.endpoint, params.key_tag
                    );
                    Feature::Enabled(AttestationClient::new(
                        Arc::new(relay),
                        params.key_tag,
                        params.required_epoch,
                    ))
                }
                Err(e) => {
                    warn!("Attestation relay client failed to build: {}", e);
                    Feature::Disabled
                }
            },
            Feature::Disabled => {
                info!("Attestation relay not configured, worker verifies only");
                Feature::Disabled
            }
        };

        let Feature::Enabled(ledger) = config.ledger else {
            info!("Ledger endpoint not configured, listener disabled; worker runs idle");
            return Ok(());
        };

        let bridge = Arc::new(
            LedgerBridge::connect(
                &ledger.endpoint,
                ledger.registry_address,
                ledger.adapter_address,
            )
            .await
            .context("failed to connect to the ledger bridge")?,
        );

        let listener = LedgerListener::subscribe(
            Arc::clone(&bridge) as Arc<dyn RegistryApi>,
            Arc::clone(&bridge) as Arc<dyn AdapterApi>,
            Arc::clone(&self.bus) as Arc<dyn EventPublisher>,
        )
        .await
        .context("failed to open the ledger subscriptions")?;

        let mut listener_shutdown = self.shutdown_rx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = listener.run() => {}
                _ = listener_shutdown.changed() => {
                    info!("[listener] Shutdown signal received");
                }
            }
        });

        let post_handler = PostCreatedHandler::new(
            self.bus
                .subscribe(EventFilter::topics(vec![EventTopic::Registry])),
            store,
            attestation,
            Arc::clone(&self.bus) as Arc<dyn EventPublisher>,
        );
        let mut post_shutdown = self.shutdown_rx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = post_handler.run() => {}
                _ = post_shutdown.changed() => {
                    info!("[da] Shutdown signal received");
                }
            }
        });

        if let Feature::Enabled(identity) = &config.identity {
            info!("Custody responder signing as {:#x}", identity.address());
        } else {
            info!("No signing identity configured, custody challenges will be skipped");
        }
        let custody_handler = CustodyChallengeHandler::new(
            self.bus
                .subscribe(EventFilter::topics(vec![EventTopic::Adapter])),
            Arc::clone(&bridge) as Arc<dyn AdapterApi>,
            config.identity,
            Arc::clone(&self.bus) as Arc<dyn EventPublisher>,
        );
        let mut custody_shutdown = self.shutdown_rx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = custody_handler.run() => {}
                _ = custody_shutdown.changed() => {
                    info!("[custody] Shutdown signal received");
                }
            }
        });

        info!("All worker tasks started");
        Ok(())
    }

    /// Shut the worker down gracefully.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        // Give handlers time to finish the event in flight.
        tokio::time::sleep(Duration::from_secs(2)).await;

        info!("Shutdown complete");
    }
}

impl Default for WorkerRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration from the environment.
fn load_config() -> WorkerConfig {
    let mut config = WorkerConfig::default();

    if let Some(url) = env_string("VERITY_STORE_URL") {
        config.store_url = url;
    }

    config.ledger = evaluate_ledger(
        env_string("VERITY_LEDGER_RPC_URL"),
        env_address("VERITY_REGISTRY_ADDRESS"),
        env_address("VERITY_ADAPTER_ADDRESS"),
        env_address("VERITY_VERIFIER_ADDRESS"),
    );

    config.attestation = evaluate_attestation(
        env_string("VERITY_RELAY_ENDPOINT"),
        env_parsed("VERITY_RELAY_KEY_TAG"),
        env_parsed("VERITY_RELAY_REQUIRED_EPOCH"),
    );

    config.identity = evaluate_signing_key(env_string("VERITY_SIGNING_KEY").as_deref());

    config
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn env_address(name: &str) -> Option<Address> {
    let raw = env_string(name)?;
    let parsed = parse_address(&raw);
    if parsed.is_none() {
        warn!("{} is not a valid address, ignoring", name);
    }
    parsed
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env_string(name)?;
    let parsed = raw.parse().ok();
    if parsed.is_none() {
        warn!("{} is not a valid number, ignoring", name);
    }
    parsed
}

/// Parses a 20-byte address from hex, with or without a `0x` prefix.
fn parse_address(raw: &str) -> Option<Address> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let bytes = hex::decode(body).ok()?;
    if bytes.len() != 20 {
        return None;
    }
    Some(Address::from_slice(&bytes))
}

/// Fetch one blob by its claimed content hash and verify it.
async fn run_single_check(store_url: &str, claimed: &str) -> Result<()> {
    let digest = parse_digest(claimed).context("content hash must be 32 bytes of hex")?;
    let claimed = digest_hex(&digest);

    let store = BlobStoreClient::new(store_url)?;
    let bytes = store.fetch(&digest).await?;

    if verify_blob(&claimed, &bytes) {
        info!("✓ Blob {} verified ({} bytes)", claimed, bytes.len());
        Ok(())
    } else {
        error!("❌ Blob {} does not match its content hash", claimed);
        anyhow::bail!("integrity check failed for {claimed}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config();

    // One-shot mode: a content hash on the command line checks a single
    // blob against the store and exits.
    if let Some(claimed) = std::env::args().nth(1) {
        return run_single_check(&config.store_url, &claimed).await;
    }

    let runtime = WorkerRuntime::new();
    runtime.start(config).await?;

    info!("Worker is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await;

    Ok(())
}
