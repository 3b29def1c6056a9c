//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use hue_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const PAIRING: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Pairing ──────────────────────────────────────────────────────
    #[error("The bridge's link button has not been pressed")]
    #[diagnostic(
        code(huectl::link_button),
        help(
            "Press the round link button on top of the bridge,\n\
             then run: huectl pair"
        )
    )]
    LinkButtonRequired,

    #[error("The bridge rejected the pairing request: {message}")]
    #[diagnostic(code(huectl::pairing_rejected))]
    PairingRejected { message: String },

    // ── Discovery / connection ───────────────────────────────────────
    #[error("No bridge could be found")]
    #[diagnostic(
        code(huectl::no_bridge),
        help(
            "Cloud discovery only sees bridges on your public IP.\n\
             Pass the address explicitly: huectl --bridge <ADDRESS> ..."
        )
    )]
    NoBridge,

    #[error("Could not reach the bridge")]
    #[diagnostic(
        code(huectl::connection_failed),
        help("Check the bridge address and that it is powered on.\nDetail: {detail}")
    )]
    ConnectionFailed { detail: String },

    // ── Persistence ──────────────────────────────────────────────────
    #[error("Persisted state at {path} is corrupt")]
    #[diagnostic(
        code(huectl::corrupt_state),
        help(
            "Fix or delete the file and run huectl again.\n\
             Deleting api_config.json requires re-pairing with the bridge.\n\
             Detail: {detail}"
        )
    )]
    CorruptState { path: String, detail: String },

    // ── Bridge API ───────────────────────────────────────────────────
    #[error("The bridge reported an error ({context}): {summary}")]
    #[diagnostic(code(huectl::bridge_error))]
    BridgeRejected { context: String, summary: String },

    #[error("{kind} '{name}' not found")]
    #[diagnostic(code(huectl::not_found), help("Run: huectl {kind} list"))]
    NotFound { kind: String, name: String },

    #[error("Operation '{operation}' is not supported by the bridge's local API")]
    #[diagnostic(
        code(huectl::unsupported),
        help("Renaming and similar management operations require the vendor app.")
    )]
    Unsupported { operation: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(huectl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(huectl::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(huectl::json))]
    Json(#[from] serde_json::Error),

    // ── Fallback ─────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(huectl::api))]
    Api { message: String },
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::LinkButtonRequired | Self::PairingRejected { .. } => exit_code::PAIRING,
            Self::NoBridge | Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LinkButtonRequired => CliError::LinkButtonRequired,

            CoreError::PairingRejected { message } => CliError::PairingRejected { message },

            CoreError::DiscoveryUnavailable | CoreError::NoBridgeAddress => CliError::NoBridge,

            CoreError::ConfigCorrupt { path, source } => CliError::CorruptState {
                path: path.display().to_string(),
                detail: source.to_string(),
            },

            CoreError::RequestFailed { context, errors } => CliError::BridgeRejected {
                context,
                summary: errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            },

            CoreError::NotFound { kind, name } => CliError::NotFound {
                kind: kind.into(),
                name,
            },

            CoreError::Unsupported { operation } => CliError::Unsupported {
                operation: operation.into(),
            },

            CoreError::MissingBody { method } => CliError::Validation {
                field: "request".into(),
                reason: format!("method '{method}' requires a body"),
            },

            CoreError::Io(e) => CliError::Io(e),

            CoreError::Connection { detail } => CliError::ConnectionFailed { detail },

            CoreError::Api { message } => CliError::Api { message },
        }
    }
}
