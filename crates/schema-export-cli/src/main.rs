//! schema-export CLI - Export relational schema snapshots as DDL or JSON.

use clap::{Parser, Subcommand};
use schema_export::export::fetch_tables;
use schema_export::resolver::cyclic_tables;
use schema_export::{
    resolve, DdlExporter, DialectCatalog, ExportConfig, ExportError, ExportRequest, MemoryReader,
    StructuredExporter,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "schema-export")]
#[command(about = "Export relational schema metadata as DDL or JSON")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "export.yaml")]
    config: PathBuf,

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
    /// Render a DDL script
    Ddl {
        /// Tables to export, in order (overrides export.tables)
        #[arg(long = "table")]
        tables: Vec<String>,

        /// Render for this engine instead of the source engine
        #[arg(long)]
        engine: Option<String>,

        /// Add every foreign key with ALTER TABLE after all tables
        #[arg(long)]
        defer_foreign_keys: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render the structured JSON document
    Json {
        /// Tables to export, in order (overrides export.tables)
        #[arg(long = "table")]
        tables: Vec<String>,

        /// Pretty-print the document
        #[arg(long)]
        pretty: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the table creation order
    Order {
        /// Tables to order (overrides export.tables)
        #[arg(long = "table")]
        tables: Vec<String>,

        /// Print the drop order instead
        #[arg(long)]
        drop: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<(), ExportError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(ExportError::Config)?;

    let config = ExportConfig::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    let reader = MemoryReader::from_json_file(&config.source.engine, &config.source.snapshot)?;

    match cli.command {
        Commands::Ddl {
            tables,
            engine,
            defer_foreign_keys,
            output,
        } => {
            let request = build_request(&config, &reader, tables)?;
            let mut options = config.ddl_options();
            options.defer_foreign_keys |= defer_foreign_keys;

            let exporter = match engine {
                Some(engine) => {
                    let dialect = DialectCatalog::global().require(&engine)?;
                    DdlExporter::with_dialect(&reader, dialect)
                }
                None => DdlExporter::new(&reader)?,
            };
            let script = exporter.with_options(options).export(&request)?;
            write_output(output.as_deref(), &script.render())?;
        }

        Commands::Json {
            tables,
            pretty,
            output,
        } => {
            let request = build_request(&config, &reader, tables)?;
            let mut json = StructuredExporter::new(&reader)
                .to_json(&request, pretty || config.export.pretty)?;
            json.push('\n');
            write_output(output.as_deref(), &json)?;
        }

        Commands::Order {
            tables,
            drop,
            output,
        } => {
            let request = build_request(&config, &reader, tables)?;
            let fetched = fetch_tables(&reader, &request)?;
            let resolution = resolve(&fetched)?;
            let order = if drop {
                resolution.drop_order()
            } else {
                resolution.creation_order.clone()
            };

            let mut text = String::new();
            for name in order {
                text.push_str(&name);
                text.push('\n');
            }
            if resolution.has_cycles() {
                eprintln!("cycles among: {}", cyclic_tables(&fetched).join(", "));
            }
            for deferred in &resolution.deferred {
                eprintln!(
                    "deferred: {} foreign key #{} -> {} ({})",
                    deferred.table, deferred.position, deferred.referenced_table, deferred.reason
                );
            }
            write_output(output.as_deref(), &text)?;
        }
    }

    Ok(())
}

/// Command-line tables win over the config; with neither, export everything.
fn build_request(
    config: &ExportConfig,
    reader: &MemoryReader,
    tables: Vec<String>,
) -> Result<ExportRequest, ExportError> {
    if !tables.is_empty() {
        return Ok(ExportRequest::new(tables));
    }
    match config.request() {
        Some(request) => Ok(request),
        None => ExportRequest::all_tables(reader),
    }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), ExportError> {
    match path {
        Some(path) => {
            std::fs::write(path, content)?;
            info!("Wrote {} bytes to {:?}", content.len(), path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = if format == "json" {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    result.map_err(|e| e.to_string())
}
