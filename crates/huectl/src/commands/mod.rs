//! Command dispatch: bridges CLI args -> bridge operations -> output.

pub mod cache_cmd;
pub mod light;
pub mod ls;
pub mod pair;
pub mod rename;
pub mod room;
pub mod util;

use hue_core::Bridge;

use crate::ViewOpts;
use crate::cli::Command;
use crate::error::CliError;

/// Dispatch a bridge-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, bridge: &mut Bridge, view: &ViewOpts) -> Result<(), CliError> {
    match cmd {
        Command::Light(args) => light::handle(bridge, args, view).await,
        Command::Room(args) => room::handle(bridge, args, view).await,
        Command::Ls => ls::handle(bridge, view).await,
        Command::RefreshCache(args) => cache_cmd::handle(bridge, args, view).await,
        Command::Pair(args) => pair::handle(bridge, args, view).await,
        Command::Rename(args) => rename::handle(bridge, &args),
        // Completions are handled before dispatch
        Command::Completions(_) => unreachable!(),
    }
}
