//! `profile show` / `profile update`: the locally saved profile page.

use backoffice_config::{ProfileData, load_profile_data, profile_data_path, save_profile_data};
use backoffice_core::Screen;

use crate::cli::{ProfileArgs, ProfileCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::messages::{self, Message};
use crate::output;

use super::util;

pub fn handle(ctx: &Context, args: ProfileArgs) -> Result<(), CliError> {
    ctx.require(Screen::Profile)?;
    let path = profile_data_path();
    let mut data = load_profile_data(&path)?;

    match args.command {
        ProfileCommand::Show => {}
        ProfileCommand::Update { set } => {
            for (field, value) in util::parse_assignments(&set)? {
                data.set(&field, &value)?;
            }
            save_profile_data(&path, &data)?;
            tracing::debug!(path = %path.display(), "profile saved");
            ctx.notice(messages::text(ctx.language, Message::ProfileSaved));
        }
    }

    let rendered = output::render_single(ctx.format, &data, detail, |d| d.username.clone())?;
    output::print_output(&rendered, ctx.quiet);
    Ok(())
}

fn detail(data: &ProfileData) -> String {
    output::key_values([
        ("Username", data.username.clone()),
        ("Email", data.email.clone()),
        ("Bio", data.bio.clone()),
        ("Avatar", data.avatar().to_owned()),
    ])
}
