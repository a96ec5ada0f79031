mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quill")]
#[command(version, about = "Quill CLI - blog admin core: markdown, validation, stores", long_about = None)]
struct Cli {
    /// Config file (default: ./quill.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown file to sanitized HTML
    Render {
        /// Markdown source file
        file: PathBuf,

        /// Write HTML here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Word count, reading time and excerpt of a markdown file
    Stats {
        file: PathBuf,
    },

    /// Turn a title into a URL slug
    Slug {
        title: String,
    },

    /// Check a value against a validation rule
    Validate {
        #[arg(value_enum)]
        rule: RuleArg,

        value: String,

        /// Length bound for min-length / max-length
        #[arg(short, long, default_value = "0")]
        length: usize,
    },

    /// Print the effective configuration as TOML
    Config,

    /// Run a scripted admin session against in-memory services
    Demo {
        /// Persist the signed-in profile with the configured storage
        #[arg(long)]
        persist: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum RuleArg {
    Required,
    Email,
    Url,
    MinLength,
    MaxLength,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn load_config(path: Option<PathBuf>) -> Result<quill_store::Config> {
    match path {
        Some(path) => {
            let mut config = quill_store::Config::load(path)?;
            config.apply_env();
            Ok(config)
        }
        None => quill_store::Config::load_or_default(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Render { file, out } => {
            commands::render::execute(&file, out.as_deref())?;
        }
        Commands::Stats { file } => {
            commands::render::stats(&file, &config)?;
        }
        Commands::Slug { title } => {
            println!("{}", quill_kit::slugify(&title));
        }
        Commands::Validate { rule, value, length } => {
            commands::validate::execute(rule, &value, length)?;
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
        Commands::Demo { persist } => {
            commands::demo::execute(&config, persist).await?;
        }
    }

    Ok(())
}
