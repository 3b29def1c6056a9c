// CLIP v2 HTTP client
//
// Wraps `reqwest::Client` with bridge-specific URL construction,
// application-key injection, and error-envelope extraction. The bridge
// reports soft failures as a non-empty top-level `errors` array with
// HTTP 200, so protocol failure is carried in [`ClipResult`] as data
// rather than raised as an error -- HTTP-layer success does not imply
// protocol-layer success.

use std::fmt;
use std::time::Instant;

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::mirror::{Exchange, RequestRecord, ResponseRecord, TrafficMirror};
use crate::transport::TransportConfig;

/// Header carrying the paired username on authenticated resource requests.
///
/// This is the *username* from pairing, not the client key -- the client
/// key only encrypts the entertainment stream.
pub const APPLICATION_KEY_HEADER: &str = "hue-application-key";

/// One error object from the bridge's `errors` array.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClipError {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub detail: serde_json::Map<String, Value>,
}

impl fmt::Display for ClipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description.as_deref() {
            Some(d) => f.write_str(d),
            None => f.write_str("(no description)"),
        }
    }
}

#[derive(Deserialize)]
struct ErrorsEnvelope {
    #[serde(default)]
    errors: Vec<ClipError>,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

/// Outcome of one CLIP request: raw body, HTTP status, and the extracted
/// `errors` array. Transient -- constructed per request, never persisted.
#[derive(Debug)]
pub struct ClipResult {
    pub status: u16,
    pub body: String,
    pub errors: Vec<ClipError>,
}

impl ClipResult {
    /// Protocol-level failure: any entry in the `errors` array marks the
    /// call as failed, independent of the HTTP status code.
    pub fn failed(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Deserialize the `data` array from the response body.
    pub fn data<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error> {
        let envelope: DataEnvelope<T> =
            serde_json::from_str(&self.body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: self.body.clone(),
            })?;
        Ok(envelope.data)
    }

    /// Human-readable summary of the error payload.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// HTTP client for the bridge's TLS resource endpoint.
#[derive(Debug)]
pub struct ClipClient {
    http: reqwest::Client,
    base_url: Url,
    application_key: Option<String>,
    mirror: Option<TrafficMirror>,
}

impl ClipClient {
    /// Create a client from a `TransportConfig`. The `base_url` is the
    /// bridge's CLIP root (e.g. `https://192.168.1.5/clip/v2`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            application_key: None,
            mirror: None,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            application_key: None,
            mirror: None,
        }
    }

    /// Set the paired username used for the application-key header.
    pub fn set_application_key(&mut self, username: impl Into<String>) {
        self.application_key = Some(username.into());
    }

    /// Enable the diagnostic traffic mirror (default off).
    pub fn set_mirror(&mut self, mirror: TrafficMirror) {
        self.mirror = Some(mirror);
    }

    /// The bridge CLIP base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Authenticated GET against a resource path.
    pub async fn get(&self, path: &str) -> Result<ClipResult, Error> {
        self.request(Method::GET, path, None, HeaderMap::new(), true)
            .await
    }

    /// Authenticated PUT with a JSON body.
    pub async fn put(&self, path: &str, body: Value) -> Result<ClipResult, Error> {
        self.request(Method::PUT, path, Some(body), HeaderMap::new(), true)
            .await
    }

    /// Issue one CLIP request.
    ///
    /// A non-GET method without a body is a caller programming error and
    /// is reported as [`Error::MissingBody`] before any network call.
    /// When `require_app_key` is set the paired username is injected as
    /// the `hue-application-key` header.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        mut headers: HeaderMap,
        require_app_key: bool,
    ) -> Result<ClipResult, Error> {
        if body.is_none() && method != Method::GET {
            return Err(Error::MissingBody {
                method: method.to_string(),
            });
        }

        if require_app_key {
            let username = self
                .application_key
                .as_deref()
                .ok_or(Error::MissingApplicationKey)?;
            let value = HeaderValue::from_str(username).map_err(|_| {
                Error::Deserialization {
                    message: "application key is not a valid header value".into(),
                    body: String::new(),
                }
            })?;
            headers.insert(APPLICATION_KEY_HEADER, value);
        }

        let url = self.resource_url(path)?;
        debug!("{method} {url}");

        let mut builder = self.http.request(method.clone(), url.clone()).headers(headers.clone());
        if let Some(ref json) = body {
            builder = builder.json(json);
        }

        let started = Instant::now();
        let resp = builder.send().await.map_err(Error::Transport)?;

        let status = resp.status().as_u16();
        let response_headers = format!("{:?}", resp.headers());
        let cookies: Vec<String> = resp
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(ToOwned::to_owned))
            .collect();
        let final_url = resp.url().to_string();
        let text = resp.text().await.map_err(Error::Transport)?;
        let elapsed = started.elapsed();

        // A body that is not JSON at all yields an empty errors array;
        // callers still see the raw body and status.
        let errors = serde_json::from_str::<ErrorsEnvelope>(&text)
            .map(|e| e.errors)
            .unwrap_or_default();

        if !errors.is_empty() {
            trace!("CLIP errors: {}", text);
        }

        if let Some(ref mirror) = self.mirror {
            mirror.record(&Exchange {
                req: RequestRecord {
                    method: method.to_string(),
                    url: url.to_string(),
                    headers: format!("{headers:?}"),
                    body,
                },
                res: ResponseRecord {
                    status_code: status,
                    url: final_url,
                    headers: response_headers,
                    cookies,
                    history: Vec::new(),
                    body: text.clone(),
                    elapsed_ms: elapsed.as_millis(),
                },
            });
        }

        Ok(ClipResult {
            status,
            body: text,
            errors,
        })
    }

    /// Build the full URL for a resource path (e.g. `/resource/light`).
    fn resource_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}{path}");
        Url::parse(&full).map_err(Error::InvalidUrl)
    }
}
