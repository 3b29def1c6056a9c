// ── Bridge session and pairing state machine ──
//
// One `Bridge` is one session against one physical bridge: it owns the
// persisted connection record, the discovery/pairing state machine, the
// authenticated CLIP client, and the resource cache. Consumers hold a
// `Bridge` instead of process-wide globals, so multiple independent
// sessions can coexist in one process (and in tests).

use std::path::PathBuf;

use tracing::{debug, info, warn};

use hue_api::{
    ClipClient, PairingCredential, TrafficMirror, TransportConfig, discovery, pairing,
};

use crate::cache::{CollectionKind, REQUEST_PACING, RefreshFlags, ResourceCache};
use crate::config::{BridgeConnection, ConfigStore};
use crate::error::CoreError;
use crate::model::{LightUpdate, Resource};

/// Application identifier sent in the pairing handshake; shown in the
/// vendor app's connected-apps list.
pub const DEVICE_TYPE: &str = "huectl#rust";

/// Terminal failure reasons for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFailure {
    /// Cloud discovery answered non-200 or returned no candidates.
    DiscoveryUnavailable,
    /// Pairing attempted before the physical link button was pressed.
    LinkButtonRequired,
    /// The bridge rejected the pairing handshake for any other reason.
    PairingRejected,
}

/// Pairing/discovery state. The shortcut transitions are deliberate and
/// observable: a fully persisted connection starts directly in `Paired`,
/// and an explicit address skips discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unconfigured,
    Discovering,
    AddressKnown,
    Pairing,
    Paired,
    Idle,
    Failed(SessionFailure),
}

/// How to construct a [`Bridge`]. Built by the CLI; core never reads
/// flag or settings files.
#[derive(Debug, Clone)]
pub struct BridgeOptions {
    /// Directory holding `api_config.json` and `cache.json`.
    pub data_dir: PathBuf,
    /// Explicit bridge address (IP or host[:port]); skips discovery.
    pub address: Option<String>,
    pub transport: TransportConfig,
    /// Application identifier for the pairing handshake.
    pub device_type: String,
    /// Cloud discovery endpoint (overridable test seam).
    pub discovery_endpoint: String,
    /// Drive the pairing handshake during construction when credentials
    /// are absent. When false the session parks in `Idle`.
    pub auto_connect: bool,
    /// Mirror every CLIP exchange to diagnostic files (default off).
    pub mirror_traffic: bool,
}

impl BridgeOptions {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            address: None,
            transport: TransportConfig::default(),
            device_type: DEVICE_TYPE.into(),
            discovery_endpoint: discovery::DISCOVERY_ENDPOINT.into(),
            auto_connect: true,
            mirror_traffic: false,
        }
    }
}

/// Step the state machine, leaving a trace of every transition.
fn transition(state: &mut SessionState, next: SessionState) {
    debug!("session state: {state:?} -> {next:?}");
    *state = next;
}

/// A session against one bridge.
#[derive(Debug)]
pub struct Bridge {
    store: ConfigStore,
    connection: BridgeConnection,
    state: SessionState,
    http: reqwest::Client,
    clip: Option<ClipClient>,
    cache: ResourceCache,
    device_type: String,
}

impl Bridge {
    /// Load persisted state and establish the session.
    ///
    /// A complete persisted record (URLs + credentials) skips discovery
    /// and pairing entirely. Discovery failure is reported and leaves
    /// the session unauthenticated rather than failing construction;
    /// pairing failure during auto-connect *is* an error (terminal for
    /// this invocation).
    pub async fn connect(opts: BridgeOptions) -> Result<Self, CoreError> {
        let store = ConfigStore::in_dir(&opts.data_dir);
        let cache = ResourceCache::in_dir(&opts.data_dir)?;
        let http = opts.transport.build_client()?;

        let mut connection = store.load()?.unwrap_or_default();
        let mut state = SessionState::Unconfigured;

        if connection.is_complete() {
            debug!("bridge connection fully persisted, skipping discovery and pairing");
            transition(&mut state, SessionState::Paired);
        } else if connection.has_address() {
            transition(&mut state, SessionState::AddressKnown);
        } else if let Some(ref address) = opts.address {
            transition(&mut state, SessionState::Discovering);
            connection = BridgeConnection::from_address(address)?;
            store.save(&connection)?;
            transition(&mut state, SessionState::AddressKnown);
        } else {
            transition(&mut state, SessionState::Discovering);
            match discovery::discover_at(&http, &opts.discovery_endpoint).await {
                Ok(bridges) if !bridges.is_empty() => {
                    connection =
                        BridgeConnection::from_address(&bridges[0].internal_ip_address)?;
                    store.save(&connection)?;
                    transition(&mut state, SessionState::AddressKnown);
                }
                Ok(_) => {
                    warn!("bridge discovery returned no candidates");
                    transition(
                        &mut state,
                        SessionState::Failed(SessionFailure::DiscoveryUnavailable),
                    );
                }
                Err(e) => {
                    warn!("bridge discovery failed: {e}");
                    transition(
                        &mut state,
                        SessionState::Failed(SessionFailure::DiscoveryUnavailable),
                    );
                }
            }
        }

        let clip = match connection.bridge_clip_url {
            Some(ref url) => {
                let mut client = ClipClient::new(url.clone(), &opts.transport)?;
                if let Some(ref username) = connection.api_username {
                    client.set_application_key(username.clone());
                }
                if opts.mirror_traffic {
                    client.set_mirror(TrafficMirror::new(opts.data_dir.clone()));
                }
                Some(client)
            }
            None => None,
        };

        let mut bridge = Self {
            store,
            connection,
            state,
            http,
            clip,
            cache,
            device_type: opts.device_type,
        };

        if bridge.state == SessionState::AddressKnown {
            if opts.auto_connect {
                bridge.ensure_credentials(false).await?;
            } else {
                transition(&mut bridge.state, SessionState::Idle);
            }
        }

        Ok(bridge)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn connection(&self) -> &BridgeConnection {
        &self.connection
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    // ── Credentials ──────────────────────────────────────────────────

    /// Return the stored pairing credential, driving the handshake when
    /// absent or when `force` is set.
    ///
    /// A "link button not pressed" rejection transitions to
    /// `Failed(LinkButtonRequired)` without persisting anything and is
    /// terminal for this invocation -- there is no internal retry loop.
    pub async fn ensure_credentials(
        &mut self,
        force: bool,
    ) -> Result<PairingCredential, CoreError> {
        if !force {
            if let Some(cred) = self.connection.credentials() {
                return Ok(cred);
            }
        }

        let Some(control_url) = self.connection.bridge_api_url.clone() else {
            return Err(CoreError::NoBridgeAddress);
        };

        transition(&mut self.state, SessionState::Pairing);
        match pairing::pair(&self.http, &control_url, &self.device_type).await {
            Ok(cred) => {
                self.connection.set_credentials(&cred);
                self.store.save(&self.connection)?;
                if let Some(ref mut clip) = self.clip {
                    clip.set_application_key(cred.username.clone());
                }
                transition(&mut self.state, SessionState::Paired);
                info!("successfully paired with the bridge");
                Ok(cred)
            }
            Err(e @ hue_api::Error::LinkButtonNotPressed) => {
                transition(
                    &mut self.state,
                    SessionState::Failed(SessionFailure::LinkButtonRequired),
                );
                Err(e.into())
            }
            Err(e) => {
                transition(
                    &mut self.state,
                    SessionState::Failed(SessionFailure::PairingRejected),
                );
                Err(e.into())
            }
        }
    }

    // ── Resource reads (cache-backed) ────────────────────────────────

    pub async fn lights(&mut self, use_cache: bool) -> Result<Vec<Resource>, CoreError> {
        self.ensure_credentials(false).await?;
        let clip = self.clip.as_ref().ok_or(CoreError::NoBridgeAddress)?;
        Ok(self
            .cache
            .collection(clip, CollectionKind::Lights, use_cache)
            .await)
    }

    pub async fn rooms(&mut self, use_cache: bool) -> Result<Vec<Resource>, CoreError> {
        self.ensure_credentials(false).await?;
        let clip = self.clip.as_ref().ok_or(CoreError::NoBridgeAddress)?;
        Ok(self
            .cache
            .collection(clip, CollectionKind::Rooms, use_cache)
            .await)
    }

    pub async fn scenes(&mut self, use_cache: bool) -> Result<Vec<Resource>, CoreError> {
        self.ensure_credentials(false).await?;
        let clip = self.clip.as_ref().ok_or(CoreError::NoBridgeAddress)?;
        Ok(self
            .cache
            .collection(clip, CollectionKind::Scenes, use_cache)
            .await)
    }

    pub async fn device(&mut self, use_cache: bool) -> Result<Option<Resource>, CoreError> {
        self.ensure_credentials(false).await?;
        let clip = self.clip.as_ref().ok_or(CoreError::NoBridgeAddress)?;
        Ok(self.cache.device(clip, use_cache).await)
    }

    /// Case-insensitive light lookup over the cached collection.
    pub async fn light_by_name(&mut self, name: &str) -> Result<Resource, CoreError> {
        let lights = self.lights(true).await?;
        lights
            .into_iter()
            .find(|l| l.name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .ok_or_else(|| CoreError::NotFound {
                kind: "light",
                name: name.to_owned(),
            })
    }

    /// Case-insensitive room lookup over the cached collection.
    pub async fn room_by_name(&mut self, name: &str) -> Result<Resource, CoreError> {
        let rooms = self.rooms(true).await?;
        rooms
            .into_iter()
            .find(|r| r.name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .ok_or_else(|| CoreError::NotFound {
                kind: "room",
                name: name.to_owned(),
            })
    }

    // ── Cache refresh ────────────────────────────────────────────────

    pub async fn refresh_cache(
        &mut self,
        flags: RefreshFlags,
        wipe: bool,
        scheduled: bool,
    ) -> Result<(), CoreError> {
        self.ensure_credentials(false).await?;
        let clip = self.clip.as_ref().ok_or(CoreError::NoBridgeAddress)?;
        self.cache.refresh(clip, flags, wipe, scheduled).await
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Apply a state update to a single light.
    pub async fn set_light_state(
        &mut self,
        light_id: &str,
        update: &LightUpdate,
    ) -> Result<(), CoreError> {
        self.ensure_credentials(false).await?;
        let clip = self.clip.as_ref().ok_or(CoreError::NoBridgeAddress)?;

        let payload = serde_json::to_value(update).map_err(|e| CoreError::Api {
            message: format!("cannot serialize light update: {e}"),
        })?;
        let result = clip
            .put(&format!("/resource/light/{light_id}"), payload)
            .await?;
        if result.failed() {
            return Err(CoreError::RequestFailed {
                context: format!("set light {light_id}"),
                errors: result.errors,
            });
        }
        Ok(())
    }

    /// Apply a state update to every light service of a room, pacing
    /// successive calls to avoid bursting the bridge.
    pub async fn set_room_state(
        &mut self,
        room_id: &str,
        update: &LightUpdate,
    ) -> Result<(), CoreError> {
        self.ensure_credentials(false).await?;

        let room = {
            let clip = self.clip.as_ref().ok_or(CoreError::NoBridgeAddress)?;
            let result = clip.get(&format!("/resource/room/{room_id}")).await?;
            if result.failed() {
                return Err(CoreError::RequestFailed {
                    context: format!("get room {room_id}"),
                    errors: result.errors,
                });
            }
            let rooms: Vec<Resource> = result.data()?;
            rooms.into_iter().next().ok_or_else(|| CoreError::NotFound {
                kind: "room",
                name: room_id.to_owned(),
            })?
        };

        let light_ids: Vec<String> = room
            .services
            .iter()
            .filter(|s| s.rtype == "light")
            .map(|s| s.rid.clone())
            .collect();

        debug!("room {room_id}: updating {} light(s)", light_ids.len());
        for rid in &light_ids {
            self.set_light_state(rid, update).await?;
            tokio::time::sleep(REQUEST_PACING).await;
        }
        Ok(())
    }

    /// Renaming lights/rooms is rejected by the v2 API for local
    /// clients; modeled as an unsupported operation rather than a
    /// guessed protocol.
    #[allow(clippy::unused_self)]
    pub fn rename_resource(&self, _id: &str, _new_name: &str) -> Result<(), CoreError> {
        Err(CoreError::Unsupported {
            operation: "rename",
        })
    }
}
