//! Shared helpers for command handlers.

use hue_core::Resource;

use crate::error::CliError;

/// Validate a brightness percentage from the command line.
pub fn validate_brightness(value: Option<f64>) -> Result<Option<f64>, CliError> {
    match value {
        Some(b) if !(0.0..=100.0).contains(&b) => Err(CliError::Validation {
            field: "brightness".into(),
            reason: format!("{b} is outside 0-100"),
        }),
        other => Ok(other),
    }
}

/// Whether a light resource reports itself as on.
pub fn on_state(resource: &Resource) -> Option<bool> {
    resource.extra.get("on")?.get("on")?.as_bool()
}

/// A light resource's reported brightness, if it dims.
pub fn brightness_of(resource: &Resource) -> Option<f64> {
    resource.extra.get("dimming")?.get("brightness")?.as_f64()
}

/// Display name with the id as fallback.
pub fn display_name(resource: &Resource) -> String {
    resource
        .name()
        .map_or_else(|| resource.id.clone(), ToOwned::to_owned)
}
