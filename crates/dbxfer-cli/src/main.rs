//! dbxfer CLI - Inspect data-transfer pipeline definitions.

use clap::{Parser, Subcommand};
use dbxfer::core::NamespaceDialect;
use dbxfer::{ConfigPicker, DataTransferSettings, DialectImpl, PipelineDefinition, XferError};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

/// Exit code of `check` when the pipeline has unready pipes.
/// Distinct from the configuration error code (2).
const EXIT_INCOMPLETE: u8 = 6;

#[derive(Parser)]
#[command(name = "dbxfer")]
#[command(about = "Inspect data-transfer pipeline definitions")]
#[command(version)]
struct Cli {
    /// Path to YAML pipeline definition
    #[arg(short, long, default_value = "pipeline.yaml")]
    config: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "warn")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the definition and report which pipes are ready
    Check,

    /// Print the file filter patterns derived from the processor properties
    Extensions,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<u8, XferError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(XferError::Config)?;

    let def = PipelineDefinition::load(&cli.config)?;
    info!("Loaded pipeline definition from {:?}", cli.config);
    let settings = def.build_settings(&ConfigPicker::new())?;

    match cli.command {
        Commands::Check => check(&def, &settings, cli.output_json),
        Commands::Extensions => {
            let patterns = settings.file_patterns();
            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&patterns)?);
            } else {
                for pattern in patterns {
                    println!("{}", pattern);
                }
            }
            Ok(0)
        }
    }
}

fn check(def: &PipelineDefinition, settings: &DataTransferSettings, output_json: bool) -> Result<u8, XferError> {
    let dialect = def
        .connection
        .as_ref()
        .map(|c| DialectImpl::from_db_type(&c.db_type))
        .transpose()?;
    let complete = settings.is_complete();

    if output_json {
        let pipes: Vec<_> = settings
            .pipes()
            .iter()
            .enumerate()
            .map(|(index, pipe)| {
                json!({
                    "index": index,
                    "source": pipe.producer_label(),
                    "target": pipe.consumer_label(),
                    "ready": pipe.is_ready(),
                })
            })
            .collect();
        let connection = def.connection.as_ref().zip(dialect.as_ref()).map(|(c, d)| {
            json!({
                "label": c.label,
                "dialect": d.name(),
                "schema_change": d.supports_schema_change(),
                "catalog_change": d.supports_catalog_change(),
            })
        });
        let result = json!({
            "processor": settings.processor_id(),
            "hash": def.hash(),
            "complete": complete,
            "connection": connection,
            "pipes": pipes,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Pipeline {} ({} pipes, hash {})",
            settings.processor_id().unwrap_or("<no processor>"),
            settings.len(),
            &def.hash()[..12]
        );
        if let (Some(connection), Some(dialect)) = (&def.connection, &dialect) {
            println!(
                "Connection {} ({}): schema change {}, catalog change {}",
                connection.label,
                dialect.name(),
                yes_no(dialect.supports_schema_change()),
                yes_no(dialect.supports_catalog_change())
            );
        }
        for (index, pipe) in settings.pipes().iter().enumerate() {
            println!(
                "  #{:<3} {} -> {}  {}",
                index + 1,
                pipe.producer_label(),
                pipe.consumer_label(),
                if pipe.is_ready() { "ready" } else { "not ready" }
            );
        }
        if complete {
            println!("Pipeline is complete");
        } else {
            let unready: Vec<String> = settings
                .unready_pipes()
                .iter()
                .map(|i| format!("#{}", i + 1))
                .collect();
            println!("Pipeline is not complete: {} not ready", unready.join(", "));
        }
    }

    Ok(if complete { 0 } else { EXIT_INCOMPLETE })
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => return Err(format!("unknown verbosity '{}'", other)),
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

    Ok(())
}
