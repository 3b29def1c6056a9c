// hue-api: Async Rust client for the Hue bridge CLIP v2 API.

pub mod clip;
pub mod discovery;
pub mod error;
pub mod mirror;
pub mod pairing;
pub mod transport;

pub use clip::{ClipClient, ClipError, ClipResult};
pub use discovery::DiscoveredBridge;
pub use error::Error;
pub use mirror::TrafficMirror;
pub use pairing::PairingCredential;
pub use transport::{TlsMode, TransportConfig};
