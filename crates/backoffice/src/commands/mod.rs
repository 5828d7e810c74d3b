//! Command dispatch: bridges CLI args -> core intents -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod dashboard;
pub mod profile;
pub mod records;
pub mod util;

use backoffice_core::Screen;

use crate::cli::Command;
use crate::config::Context;
use crate::error::CliError;

/// Dispatch a profile-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Users(args) => records::handle(ctx, Screen::Users, args).await,
        Command::Products(args) => records::handle(ctx, Screen::Products, args).await,
        Command::Dashboard => dashboard::handle(ctx).await,
        Command::Login(args) => auth::login(ctx, args),
        Command::Logout => auth::logout(ctx),
        Command::Status => auth::status(ctx),
        Command::Profile(args) => profile::handle(ctx, args),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::State(
            "config and completions do not need a profile".into(),
        )),
    }
}
