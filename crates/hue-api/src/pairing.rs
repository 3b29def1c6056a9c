// Pairing handshake
//
// One-time exchange against the bridge's plaintext control endpoint:
// physical proof-of-presence (the link button) is traded for a long-lived
// username + client key. The response is a single-element array holding
// either a `success` or an `error` object.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// Error type the bridge reports when the link button has not been pressed.
const LINK_BUTTON_NOT_PRESSED: u16 = 101;

/// Long-lived credentials obtained from a successful pairing handshake.
///
/// The `username` authenticates every CLIP resource request (as the
/// application-key header); the `client_key` is the entertainment-stream
/// encryption key and is only persisted, never sent on resource calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingCredential {
    pub username: String,
    pub client_key: String,
}

#[derive(Deserialize)]
struct PairReply {
    success: Option<PairSuccess>,
    error: Option<PairError>,
}

#[derive(Deserialize)]
struct PairSuccess {
    username: String,
    clientkey: String,
}

#[derive(Deserialize)]
struct PairError {
    #[serde(rename = "type")]
    type_code: u16,
    #[serde(default)]
    description: Option<String>,
}

/// Issue the pairing handshake request to the bridge's control URL.
///
/// `device_type` identifies this application to the bridge (shown in the
/// vendor app's connected-apps list). Error type 101 maps to
/// [`Error::LinkButtonNotPressed`]; any other error envelope maps to
/// [`Error::PairingRejected`]. No retry is performed -- the caller must
/// press the button and re-run the handshake.
pub async fn pair(
    http: &reqwest::Client,
    control_url: &Url,
    device_type: &str,
) -> Result<PairingCredential, Error> {
    debug!("POST {control_url} (pairing handshake)");

    let body = json!({
        "devicetype": device_type,
        "generateclientkey": true,
    });

    let resp = http
        .post(control_url.clone())
        .json(&body)
        .send()
        .await
        .map_err(Error::Transport)?;

    let text = resp.text().await.map_err(Error::Transport)?;
    let replies: Vec<PairReply> =
        serde_json::from_str(&text).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: text,
        })?;

    let Some(reply) = replies.into_iter().next() else {
        return Err(Error::Deserialization {
            message: "empty pairing response".into(),
            body: String::new(),
        });
    };

    if let Some(err) = reply.error {
        if err.type_code == LINK_BUTTON_NOT_PRESSED {
            return Err(Error::LinkButtonNotPressed);
        }
        return Err(Error::PairingRejected {
            type_code: err.type_code,
            description: err.description.unwrap_or_default(),
        });
    }

    let Some(success) = reply.success else {
        return Err(Error::Deserialization {
            message: "pairing response has neither success nor error".into(),
            body: String::new(),
        });
    };

    debug!("pairing successful");
    Ok(PairingCredential {
        username: success.username,
        client_key: success.clientkey,
    })
}
