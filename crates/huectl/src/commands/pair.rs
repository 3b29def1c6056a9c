//! `pair` handler.
//!
//! Pairing normally happens implicitly on first contact; this command
//! exists to re-run the handshake explicitly (e.g. after wiping the
//! connection record, or with `--force` to rotate credentials).

use hue_core::Bridge;

use crate::ViewOpts;
use crate::cli::PairArgs;
use crate::error::CliError;
use crate::output;

pub async fn handle(bridge: &mut Bridge, args: PairArgs, view: &ViewOpts) -> Result<(), CliError> {
    bridge.ensure_credentials(args.force).await?;
    output::print_output("paired with the bridge", view.quiet);
    Ok(())
}
