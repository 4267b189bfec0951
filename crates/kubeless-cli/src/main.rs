use clap::{Parser, Subcommand};
use kubeless_convert::{
    commands::{
        check::{self, CheckCommand},
        config::{self, ConfigAction},
        convert::{self, ConvertCommand},
    },
    common::EXIT_USAGE,
    logger, GlobalOpts,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "kubeless-convert")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Convert Kubeless Java handlers into deployable function sources",
    long_about = "kubeless-convert validates a Kubeless Java handler class, writes a renamed copy \
                  with the runtime imports, and generates a pom.xml from the project's dependencies."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a handler class and generate its pom
    Convert(ConvertCommand),
    /// Validate handler classes without writing anything
    Check(CheckCommand),
    /// Inspect kubeless-convert configuration
    #[command(subcommand_required = true, arg_required_else_help = true)]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

fn init_tracing(opts: &GlobalOpts) {
    let default_level = match opts.verbosity_level() {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into());
    let registry = tracing_subscriber::registry().with(filter);

    if opts.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn main() {
    let cli = Cli::parse();

    init_tracing(&cli.global);

    // Quiet also silences success lines on the console
    if let Err(e) = logger::init_with_verbosity(cli.global.verbosity_level(), cli.global.quiet) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    let code = match cli.command {
        Commands::Config { action } => config::handle_config(action, &cli.global),
        Commands::Convert(cmd) => match cli.global.load_settings() {
            Ok(settings) => convert::handle_convert(&cmd, &settings),
            Err(e) => {
                logger::error(&format!("Failed to load config: {}", e));
                EXIT_USAGE
            }
        },
        Commands::Check(cmd) => match cli.global.load_settings() {
            Ok(settings) => check::handle_check(&cmd, &settings),
            Err(e) => {
                logger::error(&format!("Failed to load config: {}", e));
                EXIT_USAGE
            }
        },
    };

    std::process::exit(code);
}
