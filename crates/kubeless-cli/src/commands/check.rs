use clap::Args;
use colored::Colorize;
use kubeless_config::{ProjectLayout, Settings};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::debug;
use walkdir::WalkDir;

use crate::common::{parse_class_name, EXIT_FAILURE};
use crate::errors::ConvertError;
use crate::logger;
use crate::pipeline::Converter;

#[derive(Args, Debug, Clone)]
pub struct CheckCommand {
    /// Check only this class; every handler source is checked when omitted
    #[arg(long = "class", value_name = "NAME", value_parser = parse_class_name)]
    pub class_name: Option<String>,

    /// Project base directory holding pom.xml
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub base_dir: PathBuf,
}

/// Result of checking one class
#[derive(Debug)]
pub struct CheckOutcome {
    pub class_name: String,
    pub result: Result<String, ConvertError>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Check the requested classes; returns the process exit status
pub fn handle_check(cmd: &CheckCommand, settings: &Settings) -> i32 {
    let converter = match Converter::new(settings) {
        Ok(converter) => converter,
        Err(e) => {
            logger::error(&format!("[{}] {}", e.kind(), e.detailed()));
            return EXIT_FAILURE;
        }
    };
    let layout = converter.layout(&cmd.base_dir);

    let classes = match &cmd.class_name {
        Some(name) => vec![name.clone()],
        None => discover_classes(&layout),
    };
    if classes.is_empty() {
        logger::warn(&format!(
            "No handler sources found in {}",
            layout.source_dir().display()
        ));
        return EXIT_FAILURE;
    }

    let outcomes = check_classes(&converter, &layout, &classes);
    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    for outcome in &outcomes {
        print_outcome(outcome);
    }

    logger::info(&format!(
        "Checked {} classes, {} failed",
        outcomes.len(),
        failed
    ));
    if failed == 0 {
        0
    } else {
        EXIT_FAILURE
    }
}

/// Run the input checks for every class in parallel, keeping input order
pub fn check_classes(
    converter: &Converter<'_>,
    layout: &ProjectLayout,
    classes: &[String],
) -> Vec<CheckOutcome> {
    classes
        .par_iter()
        .map(|class_name| CheckOutcome {
            class_name: class_name.clone(),
            result: converter
                .check(layout, class_name)
                .map(|inputs| inputs.handler.describe()),
        })
        .collect()
}

/// Class names of the source files directly inside the handler directory,
/// sorted
pub fn discover_classes(layout: &ProjectLayout) -> Vec<String> {
    let mut classes: Vec<String> = WalkDir::new(layout.source_dir())
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| layout.class_name_of(entry.path()))
        .filter(|name| parse_class_name(name).is_ok())
        .collect();
    classes.sort();
    debug!(
        "Found {} handler candidates in {:?}",
        classes.len(),
        layout.source_dir()
    );
    classes
}

fn print_outcome(outcome: &CheckOutcome) {
    match &outcome.result {
        Ok(handler) => {
            if !logger::get_no_stdout() {
                println!(
                    "{} {}: {}",
                    "\u{2714}".green().bold(),
                    outcome.class_name.bold(),
                    handler
                );
            }
        }
        Err(e) => println!(
            "{} {}: [{}] {}",
            "\u{2718}".red().bold(),
            outcome.class_name.bold(),
            e.kind(),
            e.detailed()
        ),
    }
}
