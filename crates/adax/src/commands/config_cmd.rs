//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Password, Select};
use secrecy::ExposeSecret;

use adax_config::{ConfigError, SecretSource};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_secret() -> Result<String, CliError> {
    let secret = Password::new()
        .with_prompt("API secret")
        .interact()
        .map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: "secret".into(),
            reason: "API secret cannot be empty".into(),
        });
    }
    Ok(secret)
}

/// Offer to store the secret in the system keyring.
///
/// Returns `Some(secret)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_secret_storage(client_id: &str, secret: String) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the API secret?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        adax_config::store_secret(client_id, &secret)?;
        eprintln!("   ✓ secret stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret))
    }
}

fn render_config(cfg: &Config, source: &SecretSource) -> Result<String, CliError> {
    let body = toml::to_string_pretty(&cfg.redacted()).map_err(ConfigError::from)?;
    Ok(format!("{body}\n# secret source: {source}"))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let path = config::config_path(global);
            eprintln!("Adax bridge configuration");
            eprintln!("   Config path: {}\n", path.display());

            let mut cfg = Config::default();

            cfg.dummy_mode = Confirm::new()
                .with_prompt("Use built-in dummy rooms instead of the Adax cloud?")
                .default(false)
                .interact()
                .map_err(prompt_err)?;

            if !cfg.dummy_mode {
                let client_id: String = Input::new()
                    .with_prompt("Account id (Adax app > Account > Remote API)")
                    .interact_text()
                    .map_err(prompt_err)?;
                let client_id = client_id.trim().to_owned();
                if client_id.is_empty() {
                    return Err(CliError::Validation {
                        field: "client_id".into(),
                        reason: "account id cannot be empty".into(),
                    });
                }

                let secret = prompt_secret()?;
                cfg.secret = prompt_secret_storage(&client_id, secret)?;
                cfg.client_id = Some(client_id);
            }

            cfg.max_poll_interval = Input::new()
                .with_prompt("Maximum poll interval (seconds)")
                .default(cfg.max_poll_interval)
                .interact_text()
                .map_err(prompt_err)?;

            cfg.remove_stale_accessories = Confirm::new()
                .with_prompt("Remove accessories when their room disappears?")
                .default(true)
                .interact()
                .map_err(prompt_err)?;

            config::save_config(&cfg, &path)?;

            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("\n  Test it: adax rooms");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let source = adax_config::resolve_credentials(&cfg).source;
            let detail = render_config(&cfg, &source)?;
            let redacted = cfg.redacted();
            let out = output::render_single(
                &global.output,
                &redacted,
                |_| detail.clone(),
                |_| config::config_path(global).display().to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path(global).display());
            Ok(())
        }

        // ── Set-secret ──────────────────────────────────────────────
        ConfigCommand::SetSecret { from_env } => {
            let cfg = config::load(global)?;
            let client_id = cfg.client_id.filter(|id| !id.is_empty()).ok_or_else(|| {
                CliError::Validation {
                    field: "client_id".into(),
                    reason: "set client_id first (adax config init)".into(),
                }
            })?;

            let secret = match from_env {
                Some(var) => std::env::var(&var).map_err(|_| CliError::Validation {
                    field: "from-env".into(),
                    reason: format!("environment variable {var} is not set"),
                })?,
                None => prompt_secret()?,
            };

            adax_config::store_secret(&client_id, &secret)?;
            let stored = adax_config::resolve_credentials(&Config {
                secret: None,
                secret_env: None,
                client_id: Some(client_id.clone()),
                ..Config::default()
            });
            if !global.quiet {
                if stored.source == SecretSource::Keyring
                    && stored.secret.expose_secret() == secret
                {
                    eprintln!("✓ secret stored in system keyring for {client_id}");
                } else {
                    eprintln!("secret written, but the keyring did not return it on read-back");
                }
            }
            Ok(())
        }
    }
}
