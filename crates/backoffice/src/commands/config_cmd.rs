//! Config subcommand handlers.

use dialoguer::{Input, Select};
use strum::IntoEnumIterator;

use backoffice_config::{self as config, Config, Language, Profile, SessionStoreKind};

use crate::cli::{ColorMode, ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::messages::{self, Message};
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let format = global.output.unwrap_or(OutputFormat::Table);
            let out = output::render_single(
                format,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("{c:#?}\n# {e}")),
                |c| {
                    let mut names: Vec<&str> = c.profiles.keys().map(String::as_str).collect();
                    names.sort_unstable();
                    names.join("\n")
                },
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Language { code } => language(code.as_deref(), global),
    }
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = config::config_path();
    let mut cfg = config::load_config_or_default();
    eprintln!("backoffice configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    // 1. Profile name
    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(global.profile.clone().unwrap_or_else(|| config::DEFAULT_PROFILE.into()))
        .interact_text()
        .map_err(prompt_err)?;

    // 2. Backend URL
    let backend: String = Input::new()
        .with_prompt("Backend URL")
        .default(
            global
                .backend
                .clone()
                .unwrap_or_else(|| Profile::default().backend),
        )
        .validate_with(|input: &String| -> Result<(), String> {
            url::Url::parse(input).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_err)?;

    // 3. Where sessions live
    let store_choices = &["Session file in the data directory", "System keyring"];
    let session_store = match Select::new()
        .with_prompt("Where to keep the sign-in session?")
        .items(store_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?
    {
        0 => SessionStoreKind::File,
        _ => SessionStoreKind::Keyring,
    };

    // 4. Language
    let languages: Vec<Language> = Language::iter().collect();
    let names: Vec<&str> = languages.iter().map(|l| l.native_name()).collect();
    let current = languages
        .iter()
        .position(|l| *l == cfg.defaults.language)
        .unwrap_or_default();
    let picked = Select::new()
        .with_prompt("Language")
        .items(&names)
        .default(current)
        .interact()
        .map_err(prompt_err)?;
    if let Some(lang) = languages.get(picked) {
        cfg.defaults.language = *lang;
    }

    // 5. Build profile and config
    let profile = Profile {
        backend,
        insecure: global.insecure.then_some(true),
        session_store,
        ..Profile::default()
    };
    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());

    let path = config::save_config(&cfg)?;

    eprintln!("\nConfiguration written to {}", path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Next: backoffice login");
    Ok(())
}

// ── Language ────────────────────────────────────────────────────────

fn language(code: Option<&str>, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg: Config = config::load_config()?;

    let Some(code) = code else {
        let lang = cfg.defaults.language;
        output::print_output(&format!("{lang} ({})", lang.native_name()), global.quiet);
        return Ok(());
    };

    let lang: Language = code.parse().map_err(|_| CliError::Validation {
        field: "language".into(),
        reason: format!(
            "unsupported language '{code}'; expected one of {}",
            Language::iter().map(|l| l.to_string()).collect::<Vec<_>>().join(", ")
        ),
    })?;
    cfg.defaults.language = lang;
    config::save_config(&cfg)?;

    if !global.quiet {
        let color = output::should_color(global.color.unwrap_or(ColorMode::Auto));
        eprintln!("{}", output::success(messages::text(lang, Message::LanguageSet), color));
    }
    Ok(())
}
