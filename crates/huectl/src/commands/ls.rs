//! Overview command: bridge device, lights, rooms, and scenes at a glance.

use owo_colors::OwoColorize;
use serde_json::json;

use hue_core::Bridge;

use crate::ViewOpts;
use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(bridge: &mut Bridge, view: &ViewOpts) -> Result<(), CliError> {
    let device = bridge.device(view.use_cache).await?;
    let lights = bridge.lights(view.use_cache).await?;
    let rooms = bridge.rooms(view.use_cache).await?;
    let scenes = bridge.scenes(view.use_cache).await?;

    let out = match view.format {
        OutputFormat::Json | OutputFormat::JsonCompact => {
            let value = json!({
                "device": device,
                "lights": lights,
                "rooms": rooms,
                "scenes": scenes,
                "cache_last_updated": bridge.cache().last_updated(),
            });
            if matches!(view.format, OutputFormat::Json) {
                output::render_json_pretty(&value)
            } else {
                output::render_json_compact(&value)
            }
        }

        OutputFormat::Table | OutputFormat::Plain => {
            let color = output::should_color(view.color);
            let header = |text: &str| {
                if color {
                    text.bold().to_string()
                } else {
                    text.to_owned()
                }
            };

            let mut lines = Vec::new();

            lines.push(header("Bridge"));
            match device {
                Some(ref d) => lines.push(format!("  {} ({})", util::display_name(d), d.id)),
                None => lines.push("  (unknown)".into()),
            }

            lines.push(header(&format!("Lights ({})", lights.len())));
            for light in &lights {
                lines.push(format!("  {}", util::display_name(light)));
            }

            lines.push(header(&format!("Rooms ({})", rooms.len())));
            for room in &rooms {
                lines.push(format!("  {}", util::display_name(room)));
            }

            lines.push(header(&format!("Scenes ({})", scenes.len())));
            for scene in &scenes {
                lines.push(format!("  {}", util::display_name(scene)));
            }

            lines.join("\n")
        }
    };

    output::print_output(&out, view.quiet);
    Ok(())
}
