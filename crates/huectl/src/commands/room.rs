//! Room command handlers.

use tabled::Tabled;

use hue_core::{Bridge, LightUpdate, Resource};

use crate::ViewOpts;
use crate::cli::{RoomArgs, RoomCommand};
use crate::color;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RoomRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Lights")]
    lights: usize,
}

impl From<&Resource> for RoomRow {
    fn from(room: &Resource) -> Self {
        Self {
            name: util::display_name(room),
            id: room.id.clone(),
            lights: room.services.iter().filter(|s| s.rtype == "light").count(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(bridge: &mut Bridge, args: RoomArgs, view: &ViewOpts) -> Result<(), CliError> {
    match args.command {
        RoomCommand::List => {
            let rooms = bridge.rooms(view.use_cache).await?;
            let out = output::render_list(view.format, &rooms, |r| RoomRow::from(r), util::display_name);
            output::print_output(&out, view.quiet);
            Ok(())
        }

        RoomCommand::Set {
            name,
            color,
            brightness,
        } => {
            let (r, g, b) = color::parse_hex(&color)?;
            let brightness = util::validate_brightness(brightness)?;
            let update = LightUpdate::new(color::rgb_to_xy(r, g, b), true, brightness);

            let room = bridge.room_by_name(&name).await?;
            bridge.set_room_state(&room.id, &update).await?;

            output::print_output(&format!("{}: updated", util::display_name(&room)), view.quiet);
            Ok(())
        }

        RoomCommand::Off { name } => {
            let update = LightUpdate::new(color::rgb_to_xy(255, 255, 255), false, None);

            let room = bridge.room_by_name(&name).await?;
            bridge.set_room_state(&room.id, &update).await?;

            output::print_output(&format!("{}: off", util::display_name(&room)), view.quiet);
            Ok(())
        }
    }
}
