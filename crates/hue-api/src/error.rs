use thiserror::Error;

/// Top-level error type for the `hue-api` crate.
///
/// Covers transport failures and the bridge's protocol-level rejections
/// (pairing, discovery). CLIP soft failures -- a non-empty `errors` array
/// with HTTP 200 -- are *not* errors at this layer; they are carried in
/// [`crate::ClipResult`] so callers can inspect the raw payload.
/// `hue-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Discovery ───────────────────────────────────────────────────
    /// The cloud discovery endpoint answered with a non-200 status.
    #[error("Bridge discovery failed (HTTP {status})")]
    Discovery { status: u16 },

    // ── Pairing ─────────────────────────────────────────────────────
    /// Pairing error type 101: the physical link button has not been
    /// pressed. Terminal for the current invocation.
    #[error("Link button not pressed")]
    LinkButtonNotPressed,

    /// Any other error envelope from the pairing endpoint.
    #[error("Pairing rejected by bridge (type {type_code}): {description}")]
    PairingRejected { type_code: u16, description: String },

    // ── Caller errors ───────────────────────────────────────────────
    /// A mutating CLIP request was issued without a body. Reported
    /// before any network call is made.
    #[error("Method '{method}' requires a request body")]
    MissingBody { method: String },

    /// An authenticated request was attempted without a paired username.
    #[error("No application key available -- pair with the bridge first")]
    MissingApplicationKey,

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if re-running the pairing handshake after pressing
    /// the bridge's link button might resolve this error.
    pub fn needs_link_button(&self) -> bool {
        matches!(self, Self::LinkButtonNotPressed)
    }
}
