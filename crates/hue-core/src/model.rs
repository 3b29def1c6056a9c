// ── Resource model ──
//
// Bridge resources (device, light, room, scene) are kept as thin typed
// wrappers: the CLI needs `id`, the metadata name, and a room's service
// links; every other field round-trips untouched through the flattened
// map so the cache stores exactly what the bridge returned.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One bridge resource record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Owned services (rooms reference their lights here).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ServiceRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource {
    /// The user-visible name, if the bridge reports one.
    pub fn name(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.name.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reference to a service owned by another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRef {
    pub rid: String,
    pub rtype: String,
}

// ── Light mutation payload ──────────────────────────────────────────

/// CIE xy chromaticity coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XyColor {
    pub x: f64,
    pub y: f64,
}

/// `PUT /resource/light/{id}` payload: on/off, chromaticity, and an
/// optional brightness. Color arrives pre-converted -- RGB-to-xy math
/// lives with the CLI, not here.
#[derive(Debug, Clone, Serialize)]
pub struct LightUpdate {
    pub on: OnState,
    pub color: ColorUpdate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimming: Option<Dimming>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OnState {
    pub on: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorUpdate {
    pub xy: XyColor,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dimming {
    pub brightness: f64,
}

impl LightUpdate {
    pub fn new(xy: XyColor, on: bool, brightness: Option<f64>) -> Self {
        Self {
            on: OnState { on },
            color: ColorUpdate { xy },
            dimming: brightness.map(|b| Dimming { brightness: b }),
        }
    }
}
