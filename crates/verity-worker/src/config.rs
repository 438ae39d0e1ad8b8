//! Worker configuration and feature evaluation.
//!
//! Optional subsystems are evaluated exactly once, at startup, into
//! [`Feature`] variants. Everything downstream matches on the variant; no
//! component re-reads raw settings while the worker runs.

use tracing::warn;
use verity_crypto::SigningIdentity;
use verity_types::Address;

/// Default blob store endpoint for local runs.
pub const DEFAULT_STORE_URL: &str = "http://127.0.0.1:4000";

/// An optional subsystem, settled at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feature<T> {
    /// The subsystem is configured and carries its settings.
    Enabled(T),
    /// The subsystem stays off for this run.
    Disabled,
}

impl<T> Feature<T> {
    /// Whether the subsystem is on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    /// The settings, when the subsystem is on.
    #[must_use]
    pub fn as_enabled(&self) -> Option<&T> {
        match self {
            Self::Enabled(value) => Some(value),
            Self::Disabled => None,
        }
    }

    /// Lifts an already-validated optional value.
    #[must_use]
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Enabled(value),
            None => Self::Disabled,
        }
    }
}

/// Connection settings for the ledger bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerParams {
    /// WebSocket endpoint of the ledger bridge.
    pub endpoint: String,
    /// Address of the post registry contract.
    pub registry_address: Address,
    /// Address of the custody adapter contract.
    pub adapter_address: Address,
    /// Address of the custody verifier contract, when deployed.
    pub verifier_address: Option<Address>,
}

/// Settings for the attestation relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationParams {
    /// Base URL of the relay HTTP API.
    pub endpoint: String,
    /// Key tag the operator set signs under.
    pub key_tag: u32,
    /// Epoch the proof must cover, when pinned.
    pub required_epoch: Option<u64>,
}

/// Complete worker configuration.
///
/// Built once at startup and handed to constructors whole.
#[derive(Debug)]
pub struct WorkerConfig {
    /// Blob store base URL.
    pub store_url: String,
    /// Ledger bridge connection.
    pub ledger: Feature<LedgerParams>,
    /// Attestation relay.
    pub attestation: Feature<AttestationParams>,
    /// Custody signing identity.
    pub identity: Feature<SigningIdentity>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            store_url: DEFAULT_STORE_URL.to_string(),
            ledger: Feature::Disabled,
            attestation: Feature::Disabled,
            identity: Feature::Disabled,
        }
    }
}

/// Evaluates the ledger connection from its raw settings.
///
/// The endpoint and both contract addresses must all be present. A partial
/// set is reported and the connection stays off.
#[must_use]
pub fn evaluate_ledger(
    endpoint: Option<String>,
    registry_address: Option<Address>,
    adapter_address: Option<Address>,
    verifier_address: Option<Address>,
) -> Feature<LedgerParams> {
    match (endpoint, registry_address, adapter_address) {
        (Some(endpoint), Some(registry_address), Some(adapter_address)) => {
            Feature::Enabled(LedgerParams {
                endpoint,
                registry_address,
                adapter_address,
                verifier_address,
            })
        }
        (None, None, None) => Feature::Disabled,
        _ => {
            warn!("Ledger connection settings are only partially set, listener stays off");
            Feature::Disabled
        }
    }
}

/// Evaluates the attestation relay from its raw settings.
///
/// Both the endpoint and the key tag must be present. A lone endpoint or a
/// lone key tag is reported and the relay stays off.
#[must_use]
pub fn evaluate_attestation(
    endpoint: Option<String>,
    key_tag: Option<u32>,
    required_epoch: Option<u64>,
) -> Feature<AttestationParams> {
    match (endpoint, key_tag) {
        (Some(endpoint), Some(key_tag)) => Feature::Enabled(AttestationParams {
            endpoint,
            key_tag,
            required_epoch,
        }),
        (None, None) => Feature::Disabled,
        (Some(_), None) => {
            warn!("Attestation endpoint set without a key tag, attestation stays off");
            Feature::Disabled
        }
        (None, Some(_)) => {
            warn!("Attestation key tag set without an endpoint, attestation stays off");
            Feature::Disabled
        }
    }
}

/// Evaluates the custody signing identity from a raw hex key.
///
/// A malformed key is reported and the responder stays off.
#[must_use]
pub fn evaluate_signing_key(signing_key: Option<&str>) -> Feature<SigningIdentity> {
    let Some(raw) = signing_key else {
        return Feature::Disabled;
    };
    match SigningIdentity::from_hex(raw) {
        Ok(identity) => Feature::Enabled(identity),
        Err(e) => {
            warn!(error = %e, "Ignoring malformed custody signing key");
            Feature::Disabled
        }
    }
}
