mod cli;
mod commands;
mod config;
mod error;
mod messages;
mod output;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::config::Context;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let Cli { global, command } = Cli::parse();
    init_tracing(global.verbose);

    if let Err(err) = run(&global, command).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// `-v` steps warn → info → debug → trace. `RUST_LOG` overrides it.
fn init_tracing(verbosity: u8) {
    let level = ["warn", "info", "debug", "trace"][usize::from(verbosity.min(3))];
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(global: &GlobalOpts, command: Command) -> Result<(), CliError> {
    match command {
        // No profile needed: these must work before `config init`.
        Command::Config(args) => commands::config_cmd::handle(args, global),
        Command::Completions(args) => {
            print_completions(args.shell);
            Ok(())
        }
        command => {
            let ctx = Context::resolve(global)?;
            tracing::debug!(?command, profile = %ctx.profile_name, "dispatch");
            commands::dispatch(command, &ctx).await
        }
    }
}

fn print_completions(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "backoffice", &mut std::io::stdout());
}
