//! Common types and utilities shared across commands

use clap::Parser;
use kubeless_config::{ConfigError, Settings};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

/// Exit status for a failed conversion or check
pub const EXIT_FAILURE: i32 = 1;
/// Exit status for unusable arguments or configuration
pub const EXIT_USAGE: i32 = 2;

static JAVA_IDENTIFIER: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$"));

const RESERVED_WORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "true", "false", "null", "_",
];

/// Global CLI options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    #[arg(short, long, global = true, help = "Decrease verbosity")]
    pub quiet: bool,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity (-v for debug, -vv for trace)")]
    pub verbose: u8,

    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "Read settings from FILE instead of the default config location"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Emit diagnostics as JSON lines on stderr")]
    pub log_json: bool,
}

impl GlobalOpts {
    /// Get the effective verbosity level
    /// - 0: quiet/warn only
    /// - 1: debug (-v)
    /// - 2: trace (-vv)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Config file that applies: `--config`, then the environment, then the
    /// platform default
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Settings::path)
    }

    /// Settings from `--config` (which must exist) or the default lookup
    pub fn load_settings(&self) -> Result<Settings, ConfigError> {
        match &self.config {
            Some(path) => Settings::load_from_path(path),
            None => Settings::load(),
        }
    }
}

/// Clap value parser accepting a plain Java class name
pub fn parse_class_name(value: &str) -> Result<String, String> {
    let valid = match JAVA_IDENTIFIER.as_ref() {
        Ok(pattern) => pattern.is_match(value),
        Err(e) => return Err(format!("identifier pattern failed to compile: {}", e)),
    };
    if !valid {
        return Err(format!("'{}' is not a valid Java class name", value));
    }
    if RESERVED_WORDS.contains(&value) {
        return Err(format!("'{}' is a reserved Java keyword", value));
    }
    Ok(value.to_string())
}
