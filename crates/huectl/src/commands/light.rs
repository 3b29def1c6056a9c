//! Light command handlers.

use tabled::Tabled;

use hue_core::{Bridge, LightUpdate, Resource};

use crate::ViewOpts;
use crate::cli::{LightArgs, LightCommand};
use crate::color;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct LightRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "On")]
    on: String,
    #[tabled(rename = "Brightness")]
    brightness: String,
}

impl From<&Resource> for LightRow {
    fn from(light: &Resource) -> Self {
        Self {
            name: util::display_name(light),
            id: light.id.clone(),
            on: match util::on_state(light) {
                Some(true) => "yes".into(),
                Some(false) => "no".into(),
                None => "-".into(),
            },
            brightness: util::brightness_of(light)
                .map_or_else(|| "-".into(), |b| format!("{b:.0}%")),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    bridge: &mut Bridge,
    args: LightArgs,
    view: &ViewOpts,
) -> Result<(), CliError> {
    match args.command {
        LightCommand::List => {
            let lights = bridge.lights(view.use_cache).await?;
            let out = output::render_list(
                view.format,
                &lights,
                |r| LightRow::from(r),
                util::display_name,
            );
            output::print_output(&out, view.quiet);
            Ok(())
        }

        LightCommand::Set {
            name,
            color,
            brightness,
        } => {
            let (r, g, b) = color::parse_hex(&color)?;
            let brightness = util::validate_brightness(brightness)?;
            let update = LightUpdate::new(color::rgb_to_xy(r, g, b), true, brightness);

            let light = bridge.light_by_name(&name).await?;
            bridge.set_light_state(&light.id, &update).await?;

            output::print_output(&format!("{}: updated", util::display_name(&light)), view.quiet);
            Ok(())
        }

        LightCommand::Off { name } => {
            let update = LightUpdate::new(color::rgb_to_xy(255, 255, 255), false, None);

            let light = bridge.light_by_name(&name).await?;
            bridge.set_light_state(&light.id, &update).await?;

            output::print_output(&format!("{}: off", util::display_name(&light)), view.quiet);
            Ok(())
        }
    }
}
