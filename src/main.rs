use clap::Parser;
use labscheck::config::{Config, ConfigError, Settings};
use labscheck::{output, run, HttpTransport, LabsClient};
use std::path::{Path, PathBuf};
use std::process::exit;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_FILE: &str = "labscheck.toml";

#[derive(Parser, Debug)]
#[command(name = "labscheck", version, about, long_about = None)]
struct Cli {
    /// Hostname to check (repeatable)
    #[arg(short = 'H', long = "host", value_name = "HOST", num_args = 1..)]
    hosts: Vec<String>,

    /// Path to a TOML configuration file [default: labscheck.toml if present]
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format: text, json or summary
    #[arg(short, long)]
    output: Option<String>,

    /// Total attempts per API request
    #[arg(short, long, value_name = "N")]
    retry_attempts: Option<u32>,

    /// Base URL of the assessment API
    #[arg(long, value_name = "URL")]
    api_base: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Exit code to use when a certificate is reported invalid
    #[arg(long, value_name = "N")]
    exit_code: Option<i32>,

    /// Print an example configuration file and exit
    #[arg(long)]
    generate_config: bool,

    /// Log request details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_settings(cli: Cli) -> Result<Settings, ConfigError> {
    let file_config = match &cli.config {
        Some(path) => Some(Config::from_file(path)?),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            Some(Config::from_file(DEFAULT_CONFIG_FILE)?)
        }
        None => None,
    };

    let hosts = if cli.hosts.is_empty() {
        None
    } else {
        Some(cli.hosts)
    };
    let cli_config = Config::from_cli_args(
        hosts,
        cli.retry_attempts,
        cli.api_base,
        cli.timeout,
        cli.output,
        cli.exit_code,
    );

    let mut config = Config::default();
    if let Some(file_config) = file_config {
        config = config.merge_with(file_config);
    }
    Settings::try_from(config.merge_with(cli_config))
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.generate_config {
        print!("{}", Config::example_toml());
        exit(0);
    }

    let settings = match load_settings(cli) {
        Ok(settings) => settings,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };
    debug!(?settings, "resolved settings");

    let transport = match HttpTransport::new(settings.timeout) {
        Ok(transport) => transport,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };
    let client = LabsClient::new(transport, &settings.api_base, settings.retry_attempts);

    let summary = run(&settings.hosts, &client);

    match output::render(&summary.reports, settings.output) {
        Ok(rendered) => print!("{}", rendered),
        Err(e) => {
            error!("Failed to render {} output: {}", settings.output, e);
            exit(1);
        }
    }

    if !summary.all_succeeded() {
        error!(
            failed = summary.failures.len(),
            checked = settings.hosts.len(),
            "some hosts could not be checked"
        );
        exit(1);
    }
    if summary.invalid_count() > 0 {
        exit(settings.exit_code);
    }

    exit(0);
}
