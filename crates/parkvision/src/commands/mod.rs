//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod lots;
pub mod spots;
pub mod stats;
pub mod users;
pub mod util;

use parkvision_core::Dashboard;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    dashboard: &Dashboard,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Lots(args) => lots::handle(dashboard, args, global).await,
        Command::Spots(args) => spots::handle(dashboard, args, global).await,
        Command::Users(args) => users::handle(dashboard, args, global).await,
        Command::Stats(args) => stats::handle(dashboard, args, global).await,
        // Handled before a dashboard is built
        Command::Login(_) | Command::Logout | Command::Config(_) | Command::Completions(_) => {
            unreachable!()
        }
    }
}
