// Diagnostic traffic mirror
//
// When enabled, every CLIP exchange is written to two files in the data
// directory: `response_log.json` (structured request + response record)
// and `raw_response.json` (the response body alone, only when it is valid
// JSON). Strictly best-effort: I/O and serialization failures are logged
// and swallowed, never surfaced to the request path.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// One recorded request/response exchange.
#[derive(Debug, Serialize)]
pub struct Exchange {
    pub req: RequestRecord,
    pub res: ResponseRecord,
}

#[derive(Debug, Serialize)]
pub struct RequestRecord {
    pub method: String,
    pub url: String,
    pub headers: String,
    pub body: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ResponseRecord {
    pub status_code: u16,
    pub url: String,
    pub headers: String,
    /// `set-cookie` values from the response. The bridge normally sets
    /// none, but they are recorded when present.
    pub cookies: Vec<String>,
    /// Redirect chain. Always empty: the HTTP client exposes no
    /// redirect history, and the bridge does not redirect.
    pub history: Vec<String>,
    pub body: String,
    pub elapsed_ms: u128,
}

/// File sink for mirrored CLIP traffic.
#[derive(Debug, Clone)]
pub struct TrafficMirror {
    dir: PathBuf,
}

impl TrafficMirror {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Record one exchange. Each call overwrites the previous record --
    /// the mirror captures the *last* exchange, matching its use as an
    /// interactive debugging aid rather than a log.
    pub fn record(&self, exchange: &Exchange) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            debug!("traffic mirror: cannot create {}: {e}", self.dir.display());
            return;
        }

        match serde_json::to_string_pretty(exchange) {
            Ok(json) => {
                let path = self.dir.join("response_log.json");
                if let Err(e) = std::fs::write(&path, json) {
                    debug!("traffic mirror: write {} failed: {e}", path.display());
                }
            }
            Err(e) => debug!("traffic mirror: serialize failed: {e}"),
        }

        // Raw body mirror: only when the body is valid JSON. Non-JSON
        // bodies are silently skipped.
        if let Ok(value) = serde_json::from_str::<Value>(&exchange.res.body) {
            let path = self.dir.join("raw_response.json");
            if let Err(e) = std::fs::write(&path, value.to_string()) {
                debug!("traffic mirror: write {} failed: {e}", path.display());
            }
        }
    }
}
