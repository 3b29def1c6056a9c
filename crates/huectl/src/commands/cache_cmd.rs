//! `refresh-cache` handler.

use hue_core::{Bridge, RefreshFlags};

use crate::ViewOpts;
use crate::cli::RefreshCacheArgs;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    bridge: &mut Bridge,
    args: RefreshCacheArgs,
    view: &ViewOpts,
) -> Result<(), CliError> {
    // No category flags means everything.
    let flags = RefreshFlags {
        device: args.device,
        rooms: args.rooms,
        scenes: args.scenes,
    };
    let flags = if flags.any() { flags } else { RefreshFlags::all() };

    bridge.refresh_cache(flags, args.wipe, false).await?;

    let snap = bridge.cache().snapshot();
    output::print_output(
        &format!(
            "cache refreshed: {} light(s), {} room(s), {} scene(s)",
            snap.lights.len(),
            snap.rooms.len(),
            snap.scenes.len()
        ),
        view.quiet,
    );
    Ok(())
}
