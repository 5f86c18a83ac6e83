//! CLI argument definitions for ucac4-convert

use clap::Parser;

#[derive(Parser)]
#[command(name = "ucac4-convert")]
#[command(about = "Convert UCAC4 star catalog zone files into a relational store")]
#[command(version)]
pub struct Cli {
    /// Source as format:location. Format is 'ascii', 'ascii_zonestats' or
    /// 'binary'; location is a zone file, or a directory of zone files for
    /// batch mode
    #[arg(long, default_value = "binary:z001")]
    pub source: String,

    /// Target as format:location. Format is 'sqlite' (location: database
    /// file path) or 'postgres' (location: database.table)
    #[arg(long, default_value = "sqlite:UCAC4_sample.sqlite3")]
    pub target: String,

    /// Database host (postgres targets)
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Database port (postgres targets)
    #[arg(long, default_value = "5432")]
    pub port: u16,

    /// Database user (postgres targets)
    #[arg(long, default_value = "postgres")]
    pub user: String,

    /// Database password (postgres targets)
    #[arg(long, default_value = "postgres")]
    pub password: String,

    /// Administrative database to connect to when creating the target
    /// database (postgres targets)
    #[arg(long, default_value = "postgres")]
    pub database: String,

    /// First remove an existing database file (sqlite only)
    #[arg(long)]
    pub remove_database: bool,
}
