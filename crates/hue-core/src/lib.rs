// hue-core: Stateful layer between hue-api and consumers (the CLI).
//
// Owns the persisted bridge connection record, the pairing/discovery
// state machine, and the staleness-driven resource cache.

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{CachedResourceSet, CollectionKind, RefreshFlags, ResourceCache, ResourceCategory};
pub use config::{BridgeConnection, ConfigStore, default_data_dir};
pub use error::CoreError;
pub use session::{Bridge, BridgeOptions, SessionFailure, SessionState};

pub use model::{LightUpdate, Resource, ServiceRef, XyColor};
