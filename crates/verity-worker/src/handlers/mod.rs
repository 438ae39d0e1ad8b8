//! Event handlers for the worker bus.
//!
//! One handler per pipeline: [`PostCreatedHandler`] runs fetch, verify and
//! attest; [`CustodyChallengeHandler`] answers custody challenges. Each
//! owns its bus subscription and runs as its own task.

pub mod custody;
pub mod post_created;

pub use custody::CustodyChallengeHandler;
pub use post_created::PostCreatedHandler;
