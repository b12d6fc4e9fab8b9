use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};

use edge_redirect::config::{load_config, RedirectConfig};
use edge_redirect::edge::test_function;
use edge_redirect::engine::{QueryString, RedirectEngine};

#[derive(Parser)]
#[command(name = "redirect-cli")]
#[command(about = "Inspect and exercise redirect rules", long_about = None)]
struct Cli {
    /// Rule file (TOML). Without it the canonical table for --domain is used.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Domain for the canonical table.
    #[arg(short, long, global = true, default_value = "example.com")]
    domain: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the redirect for one host and URI
    Decide {
        #[arg(long)]
        host: String,
        /// Path, optionally followed by `?query`
        #[arg(long, default_value = "/")]
        uri: String,
    },
    /// Run a viewer-request event file through the handler
    Invoke {
        event: PathBuf,
    },
    /// Load and validate a rule file
    Check {
        file: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decide { host, uri } => {
            let config = resolve_config(cli.config.as_deref(), &cli.domain)?;
            let engine = RedirectEngine::from_config(&config)?;
            let (path, query) = match uri.split_once('?') {
                Some((path, raw)) => (path, QueryString::parse_raw(raw)),
                None => (uri.as_str(), QueryString::new()),
            };
            let redirect = engine.decide(&host, path, &query)?;
            println!("{}", redirect.status);
            println!("Location: {}", redirect.location);
        }
        Commands::Invoke { event } => {
            let config = resolve_config(cli.config.as_deref(), &cli.domain)?;
            let engine = RedirectEngine::from_config(&config)?;
            let payload = std::fs::read(&event)?;
            let budget = Duration::from_micros(config.edge.compute_budget_micros);
            let result = test_function(&engine, &payload, budget)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Check { file } => {
            let config = load_config(&file)?;
            println!(
                "OK: version {}, {} rule(s), canonical domain {}",
                config.version,
                config.rules.len(),
                config.canonical_domain
            );
            for rule in &config.rules {
                println!(
                    "  {} -> https://{}/{} ({}), exceptions: [{}]",
                    rule.host,
                    rule.target_domain.as_deref().unwrap_or(&config.canonical_domain),
                    rule.default_segment,
                    rule.status.code(),
                    rule.prefix_exceptions.join(", ")
                );
            }
        }
    }

    Ok(())
}

fn resolve_config(
    path: Option<&Path>,
    domain: &str,
) -> Result<RedirectConfig, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => load_config(path)?,
        None => RedirectConfig::canonical(domain),
    })
}
