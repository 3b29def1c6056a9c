// Cloud bridge discovery
//
// The vendor's N-UPnP endpoint returns the bridges registered from the
// caller's public IP. Local mDNS discovery is not implemented; users on
// isolated networks pass the bridge address explicitly instead.

use serde::Deserialize;
use tracing::debug;

use crate::error::Error;

/// The vendor's cloud discovery endpoint.
pub const DISCOVERY_ENDPOINT: &str = "https://discovery.meethue.com";

/// One bridge candidate from the discovery response.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveredBridge {
    /// Bridge serial-derived identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// LAN address of the bridge.
    #[serde(rename = "internalipaddress")]
    pub internal_ip_address: String,
}

/// Query the cloud discovery endpoint for bridges on this network.
///
/// Returns the candidate list in the order the endpoint reports it;
/// callers take the first entry. A non-200 response is an
/// [`Error::Discovery`] -- the caller decides whether that is fatal.
pub async fn discover(http: &reqwest::Client) -> Result<Vec<DiscoveredBridge>, Error> {
    discover_at(http, DISCOVERY_ENDPOINT).await
}

/// Same as [`discover`], against an explicit endpoint URL (test seam).
pub async fn discover_at(
    http: &reqwest::Client,
    endpoint: &str,
) -> Result<Vec<DiscoveredBridge>, Error> {
    debug!("GET {endpoint}");

    let resp = http.get(endpoint).send().await.map_err(Error::Transport)?;

    let status = resp.status();
    if status != reqwest::StatusCode::OK {
        return Err(Error::Discovery {
            status: status.as_u16(),
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;
    let bridges: Vec<DiscoveredBridge> =
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })?;

    debug!("discovery returned {} candidate(s)", bridges.len());
    Ok(bridges)
}
