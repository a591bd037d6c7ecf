use crate::config::ScanConfig;
use crate::index::Type;
use crate::openapi_builder::{OpenApiBuilder, OpenApiDocument};
use crate::parser::DescriptorParser;
use crate::scanner::FileScanner;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// OpenAPI Schema Scanner - Generate OpenAPI component schemas from class descriptors
#[derive(Parser, Debug)]
#[command(name = "openapi-schema-scanner")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Directory (or single file) holding the class descriptors
    #[arg(value_name = "INDEX_PATH")]
    pub index_path: PathBuf,

    /// Root type to scan, as a type signature (repeatable)
    #[arg(short = 'r', long = "root", value_name = "TYPE", required = true)]
    pub roots: Vec<String>,

    /// Scan configuration file (YAML or JSON)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.index_path.exists() {
        anyhow::bail!("Index path does not exist: {}", args.index_path.display());
    }

    if let Some(config) = &args.config_path {
        if !config.is_file() {
            anyhow::bail!("Configuration file does not exist: {}", config.display());
        }
    }

    info!("Index path: {}", args.index_path.display());
    info!("Roots: {}", args.roots.join(", "));
    info!("Output format: {:?}", args.output_format);
    match &args.output_path {
        Some(output) => info!("Output file: {}", output.display()),
        None => info!("Output: stdout"),
    }

    Ok(args)
}

/// Loads the index and configuration, then scans every root into one document
pub fn generate(args: &CliArgs) -> Result<OpenApiDocument> {
    info!("Scanning descriptor files...");
    let scan_result = FileScanner::new(args.index_path.clone()).scan()?;
    for warning in &scan_result.warnings {
        warn!("{}", warning);
    }
    info!("Found {} descriptor files", scan_result.descriptor_files.len());

    if scan_result.descriptor_files.is_empty() {
        anyhow::bail!("No class descriptors found in {}", args.index_path.display());
    }

    let parse_results = DescriptorParser::parse_files(&scan_result.descriptor_files);
    let index = DescriptorParser::build_index(parse_results);

    let config = match &args.config_path {
        Some(path) => ScanConfig::load(path)
            .with_context(|| format!("Failed to load configuration: {}", path.display()))?,
        None => ScanConfig::default(),
    };
    debug!("Scan configuration: {:?}", config);

    let roots = args
        .roots
        .iter()
        .map(|root| Type::parse(root).with_context(|| format!("Invalid root type: {}", root)))
        .collect::<Result<Vec<_>>>()?;

    for root in &roots {
        if !index.contains(root) {
            warn!("Root type {} is not in the index", root);
        }
    }

    info!("Generating schemas for {} roots...", roots.len());
    let mut builder = OpenApiBuilder::new();
    builder
        .scan(&index, &config, &roots)
        .context("Schema generation failed")?;

    Ok(builder.build())
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    let document = generate(&args)?;

    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&document)?,
        OutputFormat::Json => serialize_json(&document)?,
    };

    match &args.output_path {
        Some(output_path) => {
            write_to_file(&content, output_path)?;
            info!("Successfully wrote OpenAPI document to {}", output_path.display());
        }
        None => println!("{}", content),
    }

    info!("Summary:");
    info!("  - Roots scanned: {}", document.roots.len());
    info!(
        "  - Component schemas: {}",
        document.components.as_ref().map_or(0, |c| c.schemas.len())
    );

    Ok(())
}
