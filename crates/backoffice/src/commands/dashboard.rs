//! `dashboard`: headline totals for both collections.

use backoffice_core::{Console, DashboardSummary, Screen};

use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(ctx: &Context) -> Result<(), CliError> {
    ctx.require(Screen::Dashboard)?;
    let console = Console::connect(&ctx.console, &ctx.session)?;
    let summary = util::with_spinner(ctx, "Loading dashboard", console.dashboard())
        .await
        .map_err(|e| ctx.auth_error(e))?;

    let rendered = output::render_single(ctx.format, &summary, detail, |s| {
        format!("{}\n{}", s.users, s.products)
    })?;
    output::print_output(&rendered, ctx.quiet);
    Ok(())
}

fn detail(summary: &DashboardSummary) -> String {
    output::key_values([
        ("Users", summary.users.to_string()),
        ("Products", summary.products.to_string()),
        ("Catalog value", format!("{:.2}", summary.catalog_value)),
    ])
}
