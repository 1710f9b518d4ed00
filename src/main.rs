use std::fmt;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::info;

use proxypool::{GetterRegistry, JsonFileStore, ProxyPool, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One share link per line
    Links,
    /// A Clash `proxies:` document
    Clash,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Links => f.write_str("links"),
            OutputFormat::Clash => f.write_str("clash"),
        }
    }
}

/// Collect proxy nodes from every configured source into one deduplicated list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (.yaml, .yml or .toml)
    #[arg(short, long, value_name = "FILE")]
    config: String,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Links)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize the logger
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args = Args::parse();

    let settings = Settings::load_from_file(&args.config)
        .with_context(|| format!("failed to load config {}", args.config))?;
    let registry = GetterRegistry::with_builtins();
    let pipeline = settings
        .pipeline(&registry)
        .context("invalid source configuration")?;

    let mut pool = match &settings.store_path {
        Some(path) => ProxyPool::open(Box::new(JsonFileStore::new(path))),
        None => ProxyPool::in_memory(),
    };

    info!(
        "Collecting from {} sources, deadline {}s",
        settings.sources.len(),
        settings.deadline
    );
    pool.replace(pipeline.collect().await);

    let rendered = match args.format {
        OutputFormat::Links => pool.proxies().to_links(),
        OutputFormat::Clash => pool.proxies().to_clash_yaml(),
    };

    match &args.output {
        Some(output_file) => {
            std::fs::write(output_file, rendered)
                .with_context(|| format!("failed to write {}", output_file))?;
            info!(
                "Successfully wrote {} proxies to {}",
                pool.proxies().len(),
                output_file
            );
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
