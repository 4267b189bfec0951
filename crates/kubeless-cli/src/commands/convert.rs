use clap::Args;
use colored::Colorize;
use kubeless_config::Settings;
use serde::Serialize;
use std::path::PathBuf;

use crate::common::{parse_class_name, EXIT_FAILURE};
use crate::errors::{ConvertError, ErrorKind};
use crate::logger;
use crate::pipeline::{ConversionReport, ConversionRequest, Converter};

#[derive(Args, Debug, Clone)]
pub struct ConvertCommand {
    /// Handler class to convert, e.g. AppFunction
    #[arg(long = "class", value_name = "NAME", value_parser = parse_class_name)]
    pub class_name: String,

    /// Name of the generated class (defaults to the input class name)
    #[arg(long, value_name = "NAME", value_parser = parse_class_name)]
    pub output_name: Option<String>,

    /// Project base directory holding pom.xml
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub base_dir: PathBuf,

    /// Output directory (defaults to <base-dir>/target/generated-sources/kubeless)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Do not add event and context imports to the generated class
    #[arg(long)]
    pub no_imports: bool,

    /// Print the conversion report (or the failure) as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl ConvertCommand {
    pub fn request(&self) -> ConversionRequest {
        let mut request = ConversionRequest::new(&self.base_dir, &self.class_name);
        if let Some(name) = &self.output_name {
            request = request.with_output_name(name);
        }
        if let Some(dir) = &self.output_dir {
            request = request.with_output_dir(dir);
        }
        request
    }
}

#[derive(Serialize)]
struct FailureReport<'a> {
    class_name: &'a str,
    kind: ErrorKind,
    message: String,
}

/// Run the conversion; returns the process exit status
pub fn handle_convert(cmd: &ConvertCommand, settings: &Settings) -> i32 {
    let mut settings = settings.clone();
    if cmd.no_imports {
        settings.source.inject_imports = false;
    }

    match run(cmd, &settings) {
        Ok(report) => {
            if cmd.json {
                print_json(&report);
            } else {
                print_summary(&report);
            }
            0
        }
        Err(e) => {
            if cmd.json {
                print_json(&FailureReport {
                    class_name: &cmd.class_name,
                    kind: e.kind(),
                    message: e.detailed(),
                });
            }
            logger::error(&format!("[{}] {}", e.kind(), e.detailed()));
            EXIT_FAILURE
        }
    }
}

fn run(cmd: &ConvertCommand, settings: &Settings) -> Result<ConversionReport, ConvertError> {
    let converter = Converter::new(settings)?;
    logger::spinner_start(&format!("Converting {}", cmd.class_name));
    let result = converter.convert(&cmd.request());
    match &result {
        Ok(report) => logger::spinner_success(&format!(
            "Converted {} to {}",
            report.class_name, report.output_name
        )),
        Err(_) => logger::spinner_stop(),
    }
    result
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => logger::error(&format!("Failed to serialize report: {}", e)),
    }
}

fn print_summary(report: &ConversionReport) {
    if logger::get_no_stdout() {
        return;
    }
    println!("{} {}", "Handler:".bold(), report.handler.cyan());
    println!("{} {}", "Class:".bold(), report.class_file.display());
    println!("{} {}", "Pom:".bold(), report.manifest_file.display());
    if report.dependencies.is_empty() {
        println!("{} {}", "Dependencies:".bold(), "(template only)".yellow());
    } else {
        println!("{}", "Dependencies:".bold());
        for dependency in &report.dependencies {
            println!("  {}", dependency);
        }
    }
    if report.dependencies_skipped > 0 {
        println!(
            "{} {}",
            "Skipped:".bold(),
            format!("{} test-scoped or excluded", report.dependencies_skipped).dimmed()
        );
    }
}
