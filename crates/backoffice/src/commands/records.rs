//! `users` and `products` command handlers.
//!
//! Each invocation is one screen visit: pass the auth gate, load the
//! collection, then drive the resource manager through intents.

use serde_json::Value;

use backoffice_core::{
    CollectionBackend, Console, CoreError, Intent, IntentResult, RecordId, ResourceManager, Screen,
    SortDirection, SortSpec, SubmitOutcome,
};

use crate::cli::{FieldArgs, ListArgs, RecordsArgs, RecordsCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::messages::{self, Message};
use crate::output;

use super::util;

pub async fn handle(ctx: &Context, screen: Screen, args: RecordsArgs) -> Result<(), CliError> {
    ctx.require(screen)?;
    let console = Console::connect(&ctx.console, &ctx.session)?;
    let manager = util::with_spinner(
        ctx,
        &format!("Loading {screen}"),
        console.open_collection(screen),
    )
    .await
    .map_err(|e| ctx.auth_error(e))?;
    let list_command = format!("{screen} list");

    let result = match args.command {
        RecordsCommand::List(list) => list_page(ctx, manager, list).await,
        RecordsCommand::Get { id } => show(ctx, manager, &id),
        RecordsCommand::Add(fields) => submit_form(ctx, manager, None, &fields).await,
        RecordsCommand::Edit { id, fields } => edit(ctx, manager, &id, &fields).await,
        RecordsCommand::Delete { id } => delete(ctx, manager, &id).await,
    };
    result.map_err(|e| e.with_list_command(&list_command))
}

// ── List ─────────────────────────────────────────────────────────────

async fn list_page<B: CollectionBackend>(
    ctx: &Context,
    manager: &ResourceManager<B>,
    args: ListArgs,
) -> Result<(), CliError> {
    if let Some(size) = args.page_size {
        manager.dispatch(Intent::SetPageSize(size)).await?;
    }
    if let Some(text) = args.filter {
        manager.dispatch(Intent::SetFilter(text)).await?;
    }
    if let Some(sort) = sort_spec(manager, args.sort, args.desc) {
        manager.dispatch(Intent::SetSort(Some(sort))).await?;
    }
    manager.dispatch(Intent::SetPage(args.page)).await?;

    let view = manager.view();
    let rendered = output::render_page(ctx.format, manager.schema(), &view, ctx.color)?;
    output::print_output(&rendered, ctx.quiet);
    Ok(())
}

/// `--sort KEY` picks the column; `--desc` alone reverses the default.
fn sort_spec<B: CollectionBackend>(
    manager: &ResourceManager<B>,
    key: Option<String>,
    desc: bool,
) -> Option<SortSpec> {
    let direction = if desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    match key {
        Some(key) => Some(SortSpec { key, direction }),
        None if desc => {
            let key = manager
                .schema()
                .default_sort
                .as_ref()
                .map_or_else(|| "id".to_owned(), |s| s.key.clone());
            Some(SortSpec { key, direction })
        }
        None => None,
    }
}

// ── Get ──────────────────────────────────────────────────────────────

fn show<B: CollectionBackend>(
    ctx: &Context,
    manager: &ResourceManager<B>,
    id: &str,
) -> Result<(), CliError> {
    let record = manager
        .store()
        .find_by_display(id)
        .ok_or_else(|| not_loaded(manager, id))?;
    let rendered = output::render_record(ctx.format, manager.schema(), &record)?;
    output::print_output(&rendered, ctx.quiet);
    Ok(())
}

// ── Add / Edit ───────────────────────────────────────────────────────

async fn edit<B: CollectionBackend>(
    ctx: &Context,
    manager: &ResourceManager<B>,
    id: &str,
    fields: &FieldArgs,
) -> Result<(), CliError> {
    let id = resolve(manager, id)?;
    submit_form(ctx, manager, Some(id), fields).await
}

/// Open the form (create when `target` is `None`), fill it, submit it.
async fn submit_form<B: CollectionBackend>(
    ctx: &Context,
    manager: &ResourceManager<B>,
    target: Option<RecordId>,
    fields: &FieldArgs,
) -> Result<(), CliError> {
    let done = match target {
        Some(id) => {
            manager.dispatch(Intent::OpenForEdit { id }).await?;
            Message::Updated
        }
        None => {
            manager.dispatch(Intent::OpenForCreate).await?;
            Message::Added
        }
    };
    for (name, value) in field_values(fields)? {
        manager.dispatch(Intent::UpdateField { name, value }).await?;
    }

    let outcome = match manager.dispatch(Intent::Submit).await? {
        IntentResult::Submitted(outcome) => outcome,
        other => {
            return Err(CliError::State(format!("unexpected submit result: {other:?}")));
        }
    };

    match outcome {
        SubmitOutcome::Committed(record) => {
            let id = record.id.as_ref().map(ToString::to_string).unwrap_or_default();
            let resource = &manager.schema().resource;
            ctx.notice(&messages::record(ctx.language, done, resource, &id));
            let rendered = output::render_record(ctx.format, manager.schema(), &record)?;
            output::print_output(&rendered, ctx.quiet);
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => Err(CoreError::Validation { errors }.into()),
        SubmitOutcome::Ignored => Err(CliError::State("the form was not open".into())),
    }
}

fn field_values(fields: &FieldArgs) -> Result<Vec<(String, Value)>, CliError> {
    if let Some(ref path) = fields.from_file {
        return Ok(util::read_json_object(path)?
            .into_iter()
            .filter(|(name, _)| name != "id")
            .collect());
    }
    Ok(util::parse_assignments(&fields.set)?
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect())
}

// ── Delete ───────────────────────────────────────────────────────────

async fn delete<B: CollectionBackend>(
    ctx: &Context,
    manager: &ResourceManager<B>,
    id: &str,
) -> Result<(), CliError> {
    let id = resolve(manager, id)?;

    let resource = manager.schema().resource.clone();
    let prompt = messages::record(ctx.language, Message::ConfirmDelete, &resource, &id.to_string());
    if !util::confirm(&prompt, ctx.yes)? {
        return Ok(());
    }

    let label = id.to_string();
    if let IntentResult::Removed(record) = manager.dispatch(Intent::Remove { id }).await? {
        tracing::debug!(id = ?record.id, "removed");
    }
    ctx.notice(&messages::record(ctx.language, Message::Deleted, &resource, &label));
    Ok(())
}

/// Map an id typed on the command line to the id of a loaded record.
fn resolve<B: CollectionBackend>(manager: &ResourceManager<B>, raw: &str) -> Result<RecordId, CliError> {
    manager
        .store()
        .find_by_display(raw)
        .and_then(|record| record.id.clone())
        .ok_or_else(|| not_loaded(manager, raw))
}

fn not_loaded<B: CollectionBackend>(manager: &ResourceManager<B>, id: &str) -> CliError {
    CliError::NotFound {
        message: format!("{} '{id}' not found", manager.schema().singular),
        hint: None,
    }
}
