use crate::common::{GlobalOpts, EXIT_USAGE};
use crate::logger;
use clap::Subcommand;
use colored::*;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the effective settings as TOML
    Show,
    /// Print the path of the config file in use
    Path,
}

/// Handle `config` subcommands; returns the process exit status
pub fn handle_config(action: ConfigAction, opts: &GlobalOpts) -> i32 {
    match action {
        ConfigAction::Show => {
            let rendered = opts
                .load_settings()
                .and_then(|settings| settings.to_toml_string());
            match rendered {
                Ok(toml) => {
                    if opts.verbosity_level() > 0 {
                        if let Some(path) = opts.config_path() {
                            logger::debug(&format!("Reading config from: {}", path.display()));
                        }
                    }
                    print!("{}", toml);
                    0
                }
                Err(e) => {
                    logger::error(&format!("Failed to load config: {}", e));
                    EXIT_USAGE
                }
            }
        }
        ConfigAction::Path => match opts.config_path() {
            Some(path) => {
                println!("{}", path.display());
                if !path.exists() {
                    eprintln!("{}", "(file not present, built-in defaults apply)".yellow());
                }
                0
            }
            None => {
                logger::error("Could not determine the config file location");
                EXIT_USAGE
            }
        },
    }
}
