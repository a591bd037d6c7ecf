//! OpenAPI Schema Scanner - Command-line tool for generating OpenAPI component schemas.
//!
//! Loads class descriptors (YAML or JSON) from a directory, scans the requested root
//! types and prints an OpenAPI document holding their `components.schemas`.
//!
//! # Usage
//!
//! ```bash
//! openapi-schema-scanner [OPTIONS] --root <TYPE> <INDEX_PATH>
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! openapi-schema-scanner ./classes -r com.acme.Pet -o openapi.yaml
//! ```
//!
//! Generate JSON with a scan configuration:
//! ```bash
//! openapi-schema-scanner ./classes -r com.acme.Pet -c scan.yaml -f json
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_schema_scanner::cli;

fn main() -> Result<()> {
    // Parse once to read the verbose flag before the logger exists
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("OpenAPI Schema Scanner starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("OpenAPI document generation completed successfully");

    Ok(())
}
