// ── Core error types ──
//
// User-facing errors from hue-core. Consumers never see reqwest errors
// or JSON parse failures directly -- the `From<hue_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.

use std::path::PathBuf;

use thiserror::Error;

use hue_api::ClipError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Persistence ──────────────────────────────────────────────────
    /// A persisted record exists but cannot be parsed. Fatal: there is
    /// no auto-repair, the user must fix or delete the file.
    #[error("Persisted record at {path} is corrupt: {source}")]
    ConfigCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ── Discovery / session ──────────────────────────────────────────
    /// Cloud discovery answered non-200 or returned no candidates.
    /// The session continues unauthenticated.
    #[error("Bridge discovery unavailable")]
    DiscoveryUnavailable,

    /// No bridge address is known -- discovery failed or was never run,
    /// and no explicit address was supplied.
    #[error("No bridge address configured")]
    NoBridgeAddress,

    // ── Pairing ──────────────────────────────────────────────────────
    /// The bridge's link button has not been pressed. Terminal for this
    /// invocation; the user must press the button and retry.
    #[error("Link button not pressed")]
    LinkButtonRequired,

    /// The bridge rejected the pairing handshake for any other reason.
    #[error("Pairing rejected: {message}")]
    PairingRejected { message: String },

    // ── Requests ─────────────────────────────────────────────────────
    /// A mutating request was issued without a payload (caller error;
    /// the request was never sent).
    #[error("Method '{method}' requires a request body")]
    MissingBody { method: String },

    /// The bridge reported a non-empty `errors` array. The raw error
    /// payload is preserved for the caller.
    #[error("Bridge request failed ({context}): {}", summarize(.errors))]
    RequestFailed {
        context: String,
        errors: Vec<ClipError>,
    },

    // ── Lookups / operations ─────────────────────────────────────────
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    /// Operations the v2 API does not support for local clients.
    #[error("Operation not supported by the bridge API: {operation}")]
    Unsupported { operation: &'static str },

    // ── Transport ────────────────────────────────────────────────────
    /// The bridge could not be reached at the network level.
    #[error("Cannot reach the bridge: {detail}")]
    Connection { detail: String },

    // ── Wrapped API errors ───────────────────────────────────────────
    #[error("Bridge API error: {message}")]
    Api { message: String },
}

fn summarize(errors: &[ClipError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<hue_api::Error> for CoreError {
    fn from(err: hue_api::Error) -> Self {
        match err {
            hue_api::Error::LinkButtonNotPressed => CoreError::LinkButtonRequired,
            hue_api::Error::PairingRejected {
                type_code,
                description,
            } => CoreError::PairingRejected {
                message: format!("type {type_code}: {description}"),
            },
            hue_api::Error::Discovery { .. } => CoreError::DiscoveryUnavailable,
            hue_api::Error::MissingBody { method } => CoreError::MissingBody { method },
            hue_api::Error::MissingApplicationKey => CoreError::Api {
                message: "no application key -- pair with the bridge first".into(),
            },
            hue_api::Error::Transport(e) => CoreError::Connection {
                detail: e.to_string(),
            },
            hue_api::Error::Tls(detail) => CoreError::Connection { detail },
            other => CoreError::Api {
                message: other.to_string(),
            },
        }
    }
}
