//! OLI CLI - Validate Open Labels Initiative attestations
//!
//! # Main Commands
//!
//! ```bash
//! oli serve                          # Start HTTP server (port 3000)
//! oli validate-csv labels.csv        # Parse + validate a CSV upload
//! oli validate rows.json             # Validate a JSON array of rows
//! ```
//!
//! # Lookup Commands
//!
//! ```bash
//! oli chains                         # Known chains
//! oli categories                     # Usage and paymaster categories
//! oli convert-chain "base mainnet"   # Alias to CAIP-2 + suggestions
//! oli checksum 0x5aaeb6...           # EIP-55 checksum an address
//! ```
//!
//! Reports are JSON on stdout, progress goes to stderr. The exit code is 2 when
//! the input has validation errors.

use clap::{Parser, Subcommand};
use oli::{
    api::logs::LOG_BROADCASTER, convert_chain_id, projects::decode_projects, suggest_chains,
    to_checksum_address, validate_bulk_async, validate_csv_file, write_csv, AttestationRow,
    ConfigError, ModeProfile, ProjectSource, SdkConfig, SdkResult, ValidationOptions,
    ValidationStatus, CATEGORIES, CHAINS, FORM_FIELDS, PAYMASTER_CATEGORIES,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "oli")]
#[command(about = "Validate and normalize Open Labels Initiative attestations", long_about = None)]
struct Cli {
    /// Do not echo progress logs to stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the validation commands.
#[derive(clap::Args)]
struct SourceArgs {
    /// Mode profile: simple or advanced (default: OLI_MODE or simple)
    #[arg(short, long)]
    mode: Option<String>,

    /// Project registry JSON file instead of the remote registry
    #[arg(short, long)]
    projects: Option<PathBuf>,

    /// Skip the owner_project check entirely
    #[arg(long, conflicts_with = "projects")]
    offline: bool,

    /// Maximum number of valid rows per batch
    #[arg(long)]
    max_rows: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a CSV file
    ValidateCsv {
        /// Input CSV file
        input: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        /// Output file for the JSON report (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the normalized valid rows as CSV
        #[arg(long)]
        csv_output: Option<PathBuf>,
    },

    /// Validate a JSON array of attestation rows
    Validate {
        /// Input JSON file (array of rows)
        input: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List known chains
    Chains,

    /// List usage and paymaster categories
    Categories,

    /// Convert a chain alias to its CAIP-2 id
    ConvertChain {
        /// Chain name, alias or CAIP-2 id
        value: String,
    },

    /// EIP-55 checksum an EVM address
    Checksum {
        address: String,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on (default: OLI_PORT or 3000)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if cli.quiet {
        LOG_BROADCASTER.set_echo(false);
    }

    let result = run(cli.command).await;

    match result {
        Ok(ValidationStatus::Error) => std::process::exit(2),
        Ok(_) => {}
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(command: Commands) -> SdkResult<ValidationStatus> {
    let config = SdkConfig::from_env()?;

    match command {
        Commands::ValidateCsv {
            input,
            source,
            output,
            csv_output,
        } => cmd_validate_csv(&config, &input, &source, output.as_deref(), csv_output.as_deref()).await,

        Commands::Validate { input, source, output } => {
            cmd_validate(&config, &input, &source, output.as_deref()).await
        }

        Commands::Chains => print_json(&json!({ "chains": CHAINS })),

        Commands::Categories => print_json(&json!({
            "categories": CATEGORIES,
            "paymasterCategories": PAYMASTER_CATEGORIES,
        })),

        Commands::ConvertChain { value } => cmd_convert_chain(&value),

        Commands::Checksum { address } => cmd_checksum(&address),

        Commands::Serve { port } => {
            let mut config = config;
            if let Some(port) = port {
                config.port = port;
            }
            oli::server::start_server(config).await?;
            Ok(ValidationStatus::Ready)
        }
    }
}

async fn cmd_validate_csv(
    config: &SdkConfig,
    input: &Path,
    args: &SourceArgs,
    output: Option<&Path>,
    csv_output: Option<&Path>,
) -> SdkResult<ValidationStatus> {
    eprintln!("📄 Validating: {}", input.display());

    let options = options_from_args(config, args)?;
    let source = source_from_args(config, args)?;
    let report = validate_csv_file(input, &options, &source).await?;

    eprintln!("   Encoding: {}", report.csv_info.encoding);
    eprintln!("   Delimiter: '{}'", report.csv_info.delimiter);
    eprintln!("   Rows: {}", report.csv_info.row_count);
    eprintln!("   Columns: {}", report.csv_info.columns.join(", "));
    print_summary(report.valid_rows.len(), report.invalid_rows.len(), report.status);

    if let Some(path) = csv_output {
        let columns = output_columns(&report.valid_rows);
        fs::write(path, write_csv(&report.valid_rows, &columns)?)?;
        eprintln!("   💾 Valid rows written to: {}", path.display());
    }

    write_output(&serde_json::to_string_pretty(&report)?, output)?;
    Ok(report.status)
}

async fn cmd_validate(
    config: &SdkConfig,
    input: &Path,
    args: &SourceArgs,
    output: Option<&Path>,
) -> SdkResult<ValidationStatus> {
    eprintln!("✔️  Validating: {}", input.display());

    let content = fs::read_to_string(input)?;
    let rows: Vec<AttestationRow> = serde_json::from_str(&content)?;

    let options = options_from_args(config, args)?;
    let source = source_from_args(config, args)?;
    let result = validate_bulk_async(&rows, &options, &source).await?;

    let status = ValidationStatus::from_diagnostics(&result.diagnostics);
    print_summary(result.valid_rows.len(), result.invalid_rows.len(), status);

    write_output(&serde_json::to_string_pretty(&result)?, output)?;
    Ok(status)
}

fn cmd_convert_chain(value: &str) -> SdkResult<ValidationStatus> {
    let converted = convert_chain_id(value);
    let known = CHAINS.iter().any(|c| c.caip2 == converted);
    let suggestions = if known { Vec::new() } else { suggest_chains(value) };

    print_json(&json!({
        "input": value,
        "chainId": converted,
        "known": known,
        "suggestions": suggestions,
    }))?;
    Ok(if known { ValidationStatus::Ready } else { ValidationStatus::Error })
}

fn cmd_checksum(address: &str) -> SdkResult<ValidationStatus> {
    match to_checksum_address(address) {
        Some(checksummed) => {
            print_json(&json!({ "input": address, "address": checksummed, "valid": true }))
        }
        None => {
            print_json(&json!({ "input": address, "valid": false }))?;
            Ok(ValidationStatus::Error)
        }
    }
}

fn options_from_args(config: &SdkConfig, args: &SourceArgs) -> SdkResult<ValidationOptions> {
    let mut options = config.validation_options();
    if let Some(name) = &args.mode {
        let mode = ModeProfile::by_name(name).ok_or_else(|| ConfigError::UnknownMode(name.clone()))?;
        options = options.with_mode(mode);
    }
    if let Some(max_rows) = args.max_rows {
        options = options.with_max_rows(max_rows);
    }
    options.check()?;
    Ok(options)
}

fn source_from_args(config: &SdkConfig, args: &SourceArgs) -> SdkResult<ProjectSource> {
    if args.offline {
        return Ok(ProjectSource::None);
    }
    match &args.projects {
        Some(path) => {
            let body: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
            let projects = decode_projects(&body)?;
            eprintln!("   Projects: {} from {}", projects.len(), path.display());
            Ok(ProjectSource::List(projects))
        }
        None => Ok(ProjectSource::Remote(config.project_client())),
    }
}

/// Known fields in form order, then any other field in name order.
fn output_columns(rows: &[AttestationRow]) -> Vec<String> {
    let present = |field: &str| rows.iter().any(|row| row.has_value(field));

    let mut columns: Vec<String> = FORM_FIELDS
        .iter()
        .map(|f| f.id)
        .filter(|id| present(*id))
        .map(str::to_string)
        .collect();

    let mut extra: Vec<String> = rows
        .iter()
        .flat_map(|row| row.fields().cloned())
        .filter(|field| !columns.contains(field) && present(field.as_str()))
        .collect();
    extra.sort();
    extra.dedup();

    columns.extend(extra);
    columns
}

fn print_summary(valid: usize, invalid: usize, status: ValidationStatus) {
    match status {
        ValidationStatus::Ready => eprintln!("\n✅ All {} rows ready", valid),
        ValidationStatus::Warning => eprintln!("\n⚠️  {} rows ready, with warnings", valid),
        ValidationStatus::Error => eprintln!("\n❌ {} valid, {} invalid", valid, invalid),
    }
}

fn print_json<T: Serialize>(value: &T) -> SdkResult<ValidationStatus> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(ValidationStatus::Ready)
}

fn write_output(content: &str, path: Option<&Path>) -> SdkResult<()> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
