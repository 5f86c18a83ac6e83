//! UCAC4 catalog converter CLI
//!
//! Loads UCAC4 zone files (fixed-column ASCII, 78-byte binary records, or
//! the zone_stats index) into SQLite or PostgreSQL, one zone per table.

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use std::path::Path;
use ucac4_convert::convert::{BatchReport, Converter, Source, Target};
use ucac4_convert::sink::PgParams;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    println!("--- UCAC4 converter ---");
    println!("source : {}", cli.source);
    println!("target : {}", cli.target);

    let converter = Converter {
        source: Source::parse(&cli.source)?,
        target: Target::parse(&cli.target)?,
        pg: PgParams {
            host: cli.host,
            port: cli.port,
            user: cli.user,
            password: cli.password,
            database: cli.database,
        },
        remove_database: cli.remove_database,
    };

    if Path::new(&converter.source.location).is_dir() {
        let batch = converter.convert_directory()?;
        print_batch_summary(&batch)
    } else {
        let report = converter
            .convert()
            .with_context(|| format!("converting {}", cli.source))?;
        println!("imported {} records", report.processed);
        if report.duplicates > 0 {
            println!("skipped {} duplicates", report.duplicates);
        }
        Ok(())
    }
}

fn print_batch_summary(batch: &BatchReport) -> anyhow::Result<()> {
    println!();
    println!("=== Summary ===");
    println!("Files converted: {}", batch.converted.len());
    println!("Records imported: {}", batch.total_processed());
    if !batch.failed.is_empty() {
        println!("Failed files: {}", batch.failed.len());
        for (path, error) in &batch.failed {
            println!("  {}: {}", path.display(), error);
        }
    }
    if batch.converted.is_empty() {
        anyhow::bail!("all files failed to convert");
    }
    Ok(())
}
