//! CLI-side configuration: merges the config file, the selected profile
//! and global flags into one `Context` for the command handlers.
//!
//! Core never sees these types -- it receives a pre-built `ConsoleConfig`.

use clap::ValueEnum;

use backoffice_config::{Config, Language, Profile, SessionStore};
use backoffice_core::{AuthGate, ConsoleConfig, CoreError, Screen};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Everything a command handler needs, resolved once per invocation.
#[derive(Debug)]
pub struct Context {
    pub profile_name: String,
    pub console: ConsoleConfig,
    pub session: SessionStore,
    pub language: Language,
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub yes: bool,
}

impl Context {
    /// Load the config file and apply flag overrides.
    pub fn resolve(global: &GlobalOpts) -> Result<Self, CliError> {
        let config = backoffice_config::load_config()?;
        Self::from_config(config, global)
    }

    pub fn from_config(config: Config, global: &GlobalOpts) -> Result<Self, CliError> {
        let (profile_name, mut profile) = config.resolve_profile(global.profile.as_deref())?;
        apply_overrides(&mut profile, global);

        let console = backoffice_config::profile_to_console_config(&profile, &config.defaults)?;
        let session = SessionStore::for_profile(profile.session_store, &profile_name);

        let format = global
            .output
            .or_else(|| OutputFormat::from_str(&config.defaults.output, true).ok())
            .unwrap_or(OutputFormat::Table);
        let color_mode = global
            .color
            .or_else(|| ColorMode::from_str(&config.defaults.color, true).ok())
            .unwrap_or(ColorMode::Auto);

        tracing::debug!(
            profile = %profile_name,
            backend = %console.backend_url,
            store = %profile.session_store,
            "resolved configuration"
        );

        Ok(Self {
            language: config.defaults.language,
            profile_name,
            console,
            session,
            format,
            color: output::should_color(color_mode),
            quiet: global.quiet,
            yes: global.yes,
        })
    }

    /// Fail with a sign-in hint unless `screen` may be entered.
    pub fn require(&self, screen: Screen) -> Result<(), CliError> {
        AuthGate::new(&self.session)
            .require(screen)
            .map_err(|err| self.auth_error(err))
    }

    /// Like `CliError::from`, but names this profile in sign-in hints.
    pub fn auth_error(&self, err: CoreError) -> CliError {
        match err {
            CoreError::Unauthenticated { .. } => CliError::NotSignedIn {
                profile: self.profile_name.clone(),
            },
            other => other.into(),
        }
    }

    /// Print a status line to stderr unless `--quiet`.
    pub fn notice(&self, line: &str) {
        if !self.quiet {
            eprintln!("{}", output::success(line, self.color));
        }
    }
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref backend) = global.backend {
        profile.backend.clone_from(backend);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}
