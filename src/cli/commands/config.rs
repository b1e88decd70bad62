use std::process::Command;

use crate::cli::parser::Commands;
use crate::config::Config;
use crate::context::AppContext;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{error, success, warning};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        edit_config,
        editor,
        set,
    } = cmd
    {
        let path = ctx.config_path();

        if !set.is_empty() {
            // The file, not the effective config: overrides must not be persisted.
            let mut cfg = Config::read_file(path)?;
            for pair in set {
                let (key, value) = pair.split_once('=').ok_or_else(|| {
                    AppError::Config(format!("expected KEY=VALUE, got '{pair}'"))
                })?;
                cfg.set_value(key.trim(), value.trim())?;
                success(format!("{} updated", key.trim()));
            }
            cfg.save(path)?;
        }

        if *print_config {
            let cfg = if set.is_empty() {
                ctx.config()
            } else {
                Config::load(path)?
            };
            println!("📄 Current configuration ({}):\n", path.display());
            println!("{}", serde_yaml::to_string(&cfg.redacted())?);
        }

        if *edit_config {
            let default_editor = std::env::var("EDITOR")
                .or_else(|_| std::env::var("VISUAL"))
                .unwrap_or_else(|_| {
                    if cfg!(target_os = "windows") {
                        "notepad".to_string()
                    } else {
                        "nano".to_string()
                    }
                });
            let editor_to_use = editor.clone().unwrap_or_else(|| default_editor.clone());

            match Command::new(&editor_to_use).arg(path).status() {
                Ok(s) if s.success() => {
                    success(format!(
                        "Configuration file edited successfully using '{editor_to_use}'"
                    ));
                }
                Ok(_) | Err(_) => {
                    warning(format!(
                        "Editor '{editor_to_use}' not available, falling back to '{default_editor}'"
                    ));
                    match Command::new(&default_editor).arg(path).status() {
                        Ok(s) if s.success() => success(format!(
                            "Configuration file edited successfully using fallback '{default_editor}'"
                        )),
                        Ok(_) | Err(_) => error(format!(
                            "Failed to edit configuration file using fallback '{default_editor}'"
                        )),
                    }
                }
            }
        }
    }

    Ok(())
}
