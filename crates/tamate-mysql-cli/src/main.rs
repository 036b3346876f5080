//! tamate-mysql CLI - inspect and rewrite MySQL tables through the tamate driver.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tamate_mysql::{Conn, DriverConfig, DriverError, MysqlConn, MysqlDriver, Schema, Value};
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "tamate-mysql")]
#[command(about = "Inspect and rewrite MySQL tables")]
#[command(version)]
struct Cli {
    /// Connection string, e.g. root:example@tcp(localhost:3306)/tamatest
    #[arg(long)]
    dsn: Option<String>,

    /// Path to YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the schema of a table as JSON
    Schema {
        /// Table name
        table: String,
    },

    /// Print every row of a table as JSON
    Rows {
        /// Table name
        table: String,
    },

    /// Drop and recreate a table from a YAML schema file
    SetSchema {
        /// Table name
        table: String,

        /// YAML file describing the schema
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Test the database connection
    HealthCheck,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), DriverError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    let config = match &cli.config {
        Some(path) => {
            let config = DriverConfig::load(path)?;
            info!("Loaded configuration from {:?}", path);
            config
        }
        None => DriverConfig::default(),
    };

    // Read the schema file before touching the database
    let schema_file = match &cli.command {
        Commands::SetSchema { file, .. } => Some(Schema::load(file)?),
        _ => None,
    };

    let dsn = cli
        .dsn
        .clone()
        .or_else(|| config.dsn.clone())
        .ok_or_else(|| {
            DriverError::Config("no connection string: pass --dsn or set dsn in --config".into())
        })?;

    let mut conn = MysqlDriver::with_config(config)?.connection();
    let started = Instant::now();
    conn.open(&dsn).await?;

    let result = execute(&mut conn, cli.command, schema_file, started).await;
    let closed = conn.close().await;

    result?;
    closed
}

async fn execute(
    conn: &mut MysqlConn,
    command: Commands,
    schema_file: Option<Schema>,
    started: Instant,
) -> Result<(), DriverError> {
    match command {
        Commands::Schema { table } => {
            let schema = conn.get_schema(&table).await?;
            print_json(serde_json::to_string_pretty(&schema))?;
        }

        Commands::Rows { table } => {
            let rows = conn.get_rows(&table).await?;
            let plain: Vec<BTreeMap<&str, &Value>> = rows
                .iter()
                .map(|row| {
                    row.values()
                        .iter()
                        .map(|(name, cv)| (name.as_str(), &cv.value))
                        .collect()
                })
                .collect();
            print_json(serde_json::to_string_pretty(&plain))?;
        }

        Commands::SetSchema { table, .. } => {
            let schema = schema_file.ok_or_else(|| {
                DriverError::Config("set-schema requires a schema file".into())
            })?;
            conn.set_schema(&table, &schema).await?;
            println!("Created table {} ({} columns)", table, schema.columns.len());
        }

        Commands::HealthCheck => {
            conn.ping().await?;
            let latency_ms = started.elapsed().as_millis() as u64;
            let report = serde_json::json!({
                "healthy": true,
                "latency_ms": latency_ms,
            });
            print_json(serde_json::to_string_pretty(&report))?;
        }
    }

    Ok(())
}

fn print_json(rendered: serde_json::Result<String>) -> Result<(), DriverError> {
    let json = rendered.map_err(std::io::Error::from)?;
    println!("{}", json);
    Ok(())
}

/// Install the tracing subscriber. Logs go to stderr so stdout stays JSON.
fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
