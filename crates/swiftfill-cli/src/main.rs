mod autofill;
mod lookup;
mod settings;

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::settings::SettingsCommands;

const DEFAULT_PROVIDER_URL: &str = "https://api.swiftcomplete.com/";

#[derive(Debug, Parser)]
#[command(name = "swiftfill-cli")]
#[command(about = "Swiftfill address autocomplete command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Inspect and change per-shop settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Query the provider directly and print normalized suggestions
    Lookup {
        /// Free-text address query
        text: String,
        /// Provider API key
        #[arg(long, env = "SWIFTFILL_API_KEY", hide_env_values = true)]
        api_key: String,
        /// Comma-separated ISO country codes to restrict results to
        #[arg(long)]
        countries: Option<String>,
        /// Maximum number of suggestions to request
        #[arg(long, default_value = "5")]
        max_results: u32,
        /// Provider base URL
        #[arg(long, env = "SWIFTFILL_PROVIDER_BASE_URL", default_value = DEFAULT_PROVIDER_URL)]
        base_url: String,
    },
    /// Normalize a saved provider response (file, or stdin when omitted)
    Normalize {
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Fill a JSON form description from a saved search response
    Autofill {
        /// Search response body (`{"results": [...]}`)
        #[arg(long)]
        results: PathBuf,
        /// Form description (`{"fields": [...]}`)
        #[arg(long)]
        form: PathBuf,
        /// Index of the suggestion to apply
        #[arg(long, default_value = "0")]
        pick: usize,
        /// Name of the input the suggestion was picked from
        #[arg(long)]
        origin: Option<String>,
    },
    /// Print the country name for a code, or the whole directory
    Countries { code: Option<String> },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    Ping,
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // stdout is reserved for command output.
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Db { command }) => {
            let pool = connect().await?;
            match command {
                DbCommands::Ping => {
                    swiftfill_db::ping(&pool).await?;
                    println!("database reachable");
                }
                DbCommands::Migrate => {
                    let applied = swiftfill_db::run_migrations(&pool).await?;
                    println!("applied {applied} migration(s)");
                }
            }
        }
        Some(Commands::Settings { command }) => {
            let pool = connect().await?;
            settings::run(&pool, command).await?;
        }
        Some(Commands::Lookup {
            text,
            api_key,
            countries,
            max_results,
            base_url,
        }) => {
            lookup::run_lookup(
                &base_url,
                &api_key,
                &text,
                countries.as_deref(),
                max_results,
            )
            .await?;
        }
        Some(Commands::Normalize { input }) => {
            let body = read_input(input.as_deref())?;
            let addresses = lookup::normalize_document(&body)?;
            println!("{}", serde_json::to_string_pretty(&addresses)?);
        }
        Some(Commands::Autofill {
            results,
            form,
            pick,
            origin,
        }) => {
            let results = read_input(Some(results.as_path()))?;
            let form = read_input(Some(form.as_path()))?;
            let output = autofill::autofill_document(&results, &form, pick, origin.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Some(Commands::Countries { code }) => autofill::run_countries(code.as_deref())?,
        None => println!("swiftfill-cli ready; see --help"),
    }

    Ok(())
}

async fn connect() -> anyhow::Result<sqlx::PgPool> {
    let config = swiftfill_core::load_app_config()?;
    let pool_config = swiftfill_db::PoolConfig::from_app_config(&config);
    let pool = swiftfill_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

/// Reads `path`, or stdin when `path` is `None` or `-`.
fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
