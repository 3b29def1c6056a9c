//! `rename` handler.

use hue_core::Bridge;

use crate::cli::RenameArgs;
use crate::error::CliError;

pub fn handle(bridge: &mut Bridge, args: &RenameArgs) -> Result<(), CliError> {
    bridge
        .rename_resource(&args.id, &args.name)
        .map_err(Into::into)
}
