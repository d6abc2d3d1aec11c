pub mod cart_file;
pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use quotecraft_core::config::{AppConfig, LoadOptions, LogFormat};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "quotecraft",
    about = "Quotecraft pricing CLI",
    long_about = "Price carts against the product catalog, inspect configuration, and render quote documents.",
    after_help = "Examples:\n  quotecraft catalog\n  quotecraft quote --cart demo.toml --json\n  quotecraft render --cart demo.toml --out quote.html"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a quotecraft.toml config file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List catalog products and their tier schedules")]
    Catalog,
    #[command(about = "Price a cart file and print the breakdown with recommendations")]
    Quote {
        #[arg(long, help = "Cart file (TOML)")]
        cart: PathBuf,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
        #[arg(
            long,
            value_parser = parse_date,
            help = "Reference date (YYYY-MM-DD) for seasonal pricing, defaults to today"
        )]
        date: Option<NaiveDate>,
    },
    #[command(about = "Render a cart as an HTML quote document")]
    Render {
        #[arg(long, help = "Cart file (TOML)")]
        cart: PathBuf,
        #[arg(long, help = "Output HTML path")]
        out: PathBuf,
        #[arg(
            long,
            value_parser = parse_date,
            help = "Reference date (YYYY-MM-DD) for seasonal pricing, defaults to today"
        )]
        date: Option<NaiveDate>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("`{value}` is not a YYYY-MM-DD date"))
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(LoadOptions {
        config_path: cli.config.clone(),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("config error: {error}");
            return ExitCode::from(2);
        }
    };
    init_tracing(&config);

    let result = match cli.command {
        Command::Catalog => commands::catalog::run(),
        Command::Quote { cart, json, date } => commands::quote::run(&config, &cart, json, date),
        Command::Render { cart, out, date } => commands::render::run(&config, &cart, &out, date),
        Command::Config => commands::config::run(cli.config.as_deref()),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.logging.format {
        LogFormat::Compact => builder.compact().try_init().ok(),
        LogFormat::Pretty => builder.pretty().try_init().ok(),
        LogFormat::Json => builder.json().try_init().ok(),
    };
}
