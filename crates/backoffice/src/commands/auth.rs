//! `login`, `logout` and `status`.
//!
//! Signing in only writes a session marker; nothing is sent to the backend.

use std::io::IsTerminal;

use serde::Serialize;

use backoffice_config::{MarkerStore, SessionMarker};
use backoffice_core::SessionContext;

use crate::cli::LoginArgs;
use crate::config::Context;
use crate::error::CliError;
use crate::messages::{self, Message};
use crate::output;

pub fn login(ctx: &Context, args: LoginArgs) -> Result<(), CliError> {
    let user = match args.user {
        Some(user) => user,
        None => prompt_user()?,
    };
    let user = user.trim().to_owned();
    if user.is_empty() {
        return Err(CliError::Validation {
            field: "user".into(),
            reason: "must not be empty".into(),
        });
    }

    let marker = SessionMarker::issue(&user);
    ctx.session.write(&marker)?;
    tracing::info!(profile = %ctx.profile_name, %user, "signed in");
    ctx.notice(&format!(
        "{} ({user}@{})",
        messages::text(ctx.language, Message::SignedIn),
        ctx.profile_name
    ));
    Ok(())
}

fn prompt_user() -> Result<String, CliError> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractive {
            action: "login".into(),
            hint: "Pass the user name with --user or BACKOFFICE_USER.".into(),
        });
    }
    dialoguer::Input::<String>::new()
        .with_prompt("User name")
        .interact_text()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

pub fn logout(ctx: &Context) -> Result<(), CliError> {
    let had_session = ctx.session.clear()?;
    let msg = if had_session {
        Message::SignedOut
    } else {
        Message::NotSignedIn
    };
    ctx.notice(messages::text(ctx.language, msg));
    Ok(())
}

#[derive(Debug, Serialize)]
struct SessionStatus {
    profile: String,
    backend: String,
    signed_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    issued_at: Option<String>,
}

/// Report whether the profile has a session.
pub fn status(ctx: &Context) -> Result<(), CliError> {
    let signed_in = ctx.session.is_authenticated();
    // A marker that fails to parse still counts as signed in.
    let marker = ctx.session.read().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "unreadable session marker");
        None
    });

    let status = SessionStatus {
        profile: ctx.profile_name.clone(),
        backend: ctx.console.backend_url.to_string(),
        signed_in,
        user: marker.as_ref().map(|m| m.user.clone()),
        issued_at: marker.as_ref().map(|m| {
            m.issued_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        }),
    };

    let color = ctx.color;
    let lang = ctx.language;
    let rendered = output::render_single(
        ctx.format,
        &status,
        |s| {
            let state = if s.signed_in {
                output::success(messages::text(lang, Message::SignedIn), color)
            } else {
                output::dimmed(messages::text(lang, Message::NotSignedIn), color)
            };
            output::key_values([
                ("Profile", s.profile.clone()),
                ("Backend", s.backend.clone()),
                ("Session", state),
                ("User", s.user.clone().unwrap_or_default()),
                ("Since", s.issued_at.clone().unwrap_or_default()),
            ])
        },
        |s| s.signed_in.to_string(),
    )?;
    output::print_output(&rendered, ctx.quiet);
    Ok(())
}
