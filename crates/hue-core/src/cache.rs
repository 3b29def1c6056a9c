// ── Staleness-driven resource cache ──
//
// One JSON file (`cache.json`) snapshots the bridge's device, light,
// room, and scene collections so repeated invocations don't re-query the
// bridge. Refresh is throttled by a single global staleness window keyed
// on `last_updated` -- deliberately not per-category, so a wipe that
// repopulates only some categories leaves the rest empty until the
// window elapses again.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use hue_api::ClipClient;

use crate::error::CoreError;
use crate::model::Resource;

/// File name of the persisted cache record.
pub const CACHE_FILE: &str = "cache.json";

/// Age (seconds) after which a scheduled refresh is considered due.
pub const STALENESS_WINDOW_SECS: i64 = 7200;

/// Fixed delay between successive fetches within one refresh, to avoid
/// bursting the bridge. Politeness only, not a correctness requirement.
pub const REQUEST_PACING: Duration = Duration::from_millis(200);

/// One of the bridge's queryable resource categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceCategory {
    Device,
    Lights,
    Rooms,
    Scenes,
}

impl ResourceCategory {
    /// CLIP resource path for this category.
    pub fn resource_path(self) -> &'static str {
        match self {
            Self::Device => "/resource/device",
            Self::Lights => "/resource/light",
            Self::Rooms => "/resource/room",
            Self::Scenes => "/resource/scene",
        }
    }
}

/// A cached collection slot. Device is deliberately absent: the device
/// endpoint returns a combined collection handled by
/// [`ResourceCache::device`] and its split, so no collection read can
/// reach the device slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Lights,
    Rooms,
    Scenes,
}

impl CollectionKind {
    fn category(self) -> ResourceCategory {
        match self {
            Self::Lights => ResourceCategory::Lights,
            Self::Rooms => ResourceCategory::Rooms,
            Self::Scenes => ResourceCategory::Scenes,
        }
    }
}

/// Which categories a refresh should fetch.
///
/// `device` implicitly covers lights: the device endpoint returns one
/// combined collection whose first element is the bridge record and
/// whose remainder are the lights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshFlags {
    pub device: bool,
    pub rooms: bool,
    pub scenes: bool,
}

impl RefreshFlags {
    pub fn all() -> Self {
        Self {
            device: true,
            rooms: true,
            scenes: true,
        }
    }

    pub fn any(self) -> bool {
        self.device || self.rooms || self.scenes
    }
}

/// The persisted snapshot. Each collection is either empty (never
/// queried) or holds the full set from the last successful query for
/// that category -- never a partial merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResourceSet {
    /// Epoch seconds of the last refresh; -1 when never refreshed.
    /// Monotonically non-decreasing across successful refreshes.
    #[serde(default = "never_updated")]
    pub last_updated: i64,
    #[serde(default)]
    pub device: Option<Resource>,
    #[serde(default)]
    pub lights: Vec<Resource>,
    #[serde(default)]
    pub rooms: Vec<Resource>,
    #[serde(default)]
    pub scenes: Vec<Resource>,
}

fn never_updated() -> i64 {
    -1
}

impl Default for CachedResourceSet {
    fn default() -> Self {
        Self {
            last_updated: never_updated(),
            device: None,
            lights: Vec::new(),
            rooms: Vec::new(),
            scenes: Vec::new(),
        }
    }
}

/// Local snapshot of bridge resources with staleness-driven refresh.
#[derive(Debug)]
pub struct ResourceCache {
    path: PathBuf,
    snapshot: CachedResourceSet,
}

impl ResourceCache {
    /// Open the cache backed by `cache.json` in the given data directory.
    /// A missing file yields empty defaults; a malformed one is fatal.
    pub fn in_dir(dir: &Path) -> Result<Self, CoreError> {
        let path = dir.join(CACHE_FILE);
        let snapshot = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| {
                CoreError::ConfigCorrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CachedResourceSet::default(),
            Err(e) => return Err(CoreError::Io(e)),
        };
        Ok(Self { path, snapshot })
    }

    pub fn snapshot(&self) -> &CachedResourceSet {
        &self.snapshot
    }

    pub fn last_updated(&self) -> i64 {
        self.snapshot.last_updated
    }

    // ── Selective reads ──────────────────────────────────────────────

    /// Return a collection, from the snapshot when possible.
    ///
    /// A cache hit (non-empty slot with `use_cache`) issues no network
    /// call. On a miss the full returned collection replaces the slot
    /// wholesale. A failed fetch is reported and yields an empty result;
    /// it never overwrites the slot and never propagates past this
    /// boundary.
    pub async fn collection(
        &mut self,
        clip: &ClipClient,
        kind: CollectionKind,
        use_cache: bool,
    ) -> Vec<Resource> {
        if use_cache {
            let slot = self.slot(kind);
            if !slot.is_empty() {
                debug!("cache hit for {kind:?}");
                return slot.to_vec();
            }
        }

        match fetch_category(clip, kind.category()).await {
            Ok(items) => {
                *self.slot_mut(kind) = items.clone();
                items
            }
            Err(e) => {
                warn!("failed to fetch {kind:?}: {e}");
                Vec::new()
            }
        }
    }

    /// Return the bridge device record, from the snapshot when possible.
    ///
    /// On a miss this applies the device/lights split: the endpoint
    /// returns one combined collection where element 0 is the bridge
    /// record and the rest are lights.
    pub async fn device(&mut self, clip: &ClipClient, use_cache: bool) -> Option<Resource> {
        if use_cache {
            if let Some(ref device) = self.snapshot.device {
                debug!("cache hit for device");
                return Some(device.clone());
            }
        }

        match fetch_category(clip, ResourceCategory::Device).await {
            Ok(all) => {
                self.store_device_split(all);
                self.snapshot.device.clone()
            }
            Err(e) => {
                warn!("failed to fetch device info: {e}");
                None
            }
        }
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Refresh the snapshot per the flags, then persist it.
    ///
    /// `wipe` deletes the on-disk snapshot first and starts from empty
    /// defaults. When `scheduled` is set and the snapshot is younger
    /// than the staleness window, the whole call is a no-op -- a global
    /// throttle, regardless of the individual flags. Categories are
    /// fetched in fixed order (device, rooms, scenes) with a short delay
    /// between calls; a failed category leaves its slot untouched, and
    /// whatever succeeded is still persisted.
    pub async fn refresh(
        &mut self,
        clip: &ClipClient,
        flags: RefreshFlags,
        wipe: bool,
        scheduled: bool,
    ) -> Result<(), CoreError> {
        if wipe {
            debug!("wiping cache at {}", self.path.display());
            match std::fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(CoreError::Io(e)),
            }
            self.snapshot = CachedResourceSet::default();
        }

        let now = Utc::now().timestamp();
        if scheduled && now - self.snapshot.last_updated < STALENESS_WINDOW_SECS {
            debug!("cache is fresh, scheduled refresh suppressed");
            return Ok(());
        }

        self.snapshot.last_updated = now;

        if flags.device {
            debug!("collecting device and light infos");
            match fetch_category(clip, ResourceCategory::Device).await {
                Ok(all) => self.store_device_split(all),
                Err(e) => warn!("device refresh failed: {e}"),
            }
            tokio::time::sleep(REQUEST_PACING).await;
        }

        if flags.rooms {
            debug!("collecting room infos");
            match fetch_category(clip, ResourceCategory::Rooms).await {
                Ok(rooms) => self.snapshot.rooms = rooms,
                Err(e) => warn!("room refresh failed: {e}"),
            }
            tokio::time::sleep(REQUEST_PACING).await;
        }

        if flags.scenes {
            debug!("collecting scene infos");
            match fetch_category(clip, ResourceCategory::Scenes).await {
                Ok(scenes) => self.snapshot.scenes = scenes,
                Err(e) => warn!("scene refresh failed: {e}"),
            }
            tokio::time::sleep(REQUEST_PACING).await;
        }

        self.persist()
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Split the combined device collection: element 0 is the bridge
    /// device record, the remainder are light records.
    fn store_device_split(&mut self, all: Vec<Resource>) {
        let mut iter = all.into_iter();
        self.snapshot.device = iter.next();
        self.snapshot.lights = iter.collect();
    }

    fn slot(&self, kind: CollectionKind) -> &[Resource] {
        match kind {
            CollectionKind::Lights => &self.snapshot.lights,
            CollectionKind::Rooms => &self.snapshot.rooms,
            CollectionKind::Scenes => &self.snapshot.scenes,
        }
    }

    fn slot_mut(&mut self, kind: CollectionKind) -> &mut Vec<Resource> {
        match kind {
            CollectionKind::Lights => &mut self.snapshot.lights,
            CollectionKind::Rooms => &mut self.snapshot.rooms,
            CollectionKind::Scenes => &mut self.snapshot.scenes,
        }
    }

    fn persist(&self) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&self.snapshot).map_err(|source| {
            CoreError::ConfigCorrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, json)?;
        debug!("persisted cache to {}", self.path.display());
        Ok(())
    }
}

/// Fetch one category's full collection from the bridge.
async fn fetch_category(
    clip: &ClipClient,
    category: ResourceCategory,
) -> Result<Vec<Resource>, CoreError> {
    let result = clip.get(category.resource_path()).await?;
    if result.failed() {
        return Err(CoreError::RequestFailed {
            context: category.resource_path().to_owned(),
            errors: result.errors,
        });
    }
    Ok(result.data()?)
}
