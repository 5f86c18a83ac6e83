//! Conversion orchestration.
//!
//! Sources and targets are addressed as `format:location` strings, parsed
//! once into [`Source`] and [`Target`] before any record is read. The
//! [`Converter`] drives the decode→insert loop for one file, and
//! [`Converter::convert_directory`] runs a whole directory of zone files
//! with per-file failure isolation: each file owns a disjoint target table
//! and connection, so one bad file never halts the batch.

use crate::decode::ascii;
use crate::decode::binary::BinaryZoneReader;
use crate::decode::zonestats;
use crate::error::{ConvertError, Result};
use crate::record::StarRecord;
use crate::schema;
use crate::sink::{InsertOutcome, PgParams, PostgresSink, Sink, SqliteSink};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

/// Number of coarse progress updates per file, regardless of record count.
const PROGRESS_TICKS: u64 = 100;

/// Source encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Fixed-column text dump, one star per line.
    Ascii,
    /// Fixed-column per-zone statistics index file.
    AsciiZoneStats,
    /// Binary zone file of fixed 78-byte records.
    Binary,
}

impl FromStr for SourceKind {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ascii" => Ok(SourceKind::Ascii),
            "ascii_zonestats" => Ok(SourceKind::AsciiZoneStats),
            "binary" => Ok(SourceKind::Binary),
            _ => Err(ConvertError::UnknownFormat {
                token: s.to_string(),
            }),
        }
    }
}

/// Storage backends a conversion can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Sqlite,
    Postgres,
}

impl FromStr for TargetKind {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sqlite" => Ok(TargetKind::Sqlite),
            "postgres" => Ok(TargetKind::Postgres),
            _ => Err(ConvertError::UnknownFormat {
                token: s.to_string(),
            }),
        }
    }
}

/// A parsed `format:location` source endpoint.
#[derive(Debug, Clone)]
pub struct Source {
    pub kind: SourceKind,
    /// Path to a zone file, or to a directory of them in batch mode.
    pub location: String,
}

impl Source {
    pub fn parse(spec: &str) -> Result<Self> {
        let (format, location) = split_spec(spec)?;
        Ok(Self {
            kind: format.parse()?,
            location: location.to_string(),
        })
    }
}

/// A parsed `format:location` target endpoint.
#[derive(Debug, Clone)]
pub struct Target {
    pub kind: TargetKind,
    /// SQLite: database file path. Postgres: `database.table` reference
    /// (bare database name for the zone-stats table).
    pub location: String,
}

impl Target {
    pub fn parse(spec: &str) -> Result<Self> {
        let (format, location) = split_spec(spec)?;
        Ok(Self {
            kind: format.parse()?,
            location: location.to_string(),
        })
    }
}

fn split_spec(spec: &str) -> Result<(&str, &str)> {
    match spec.split_once(':') {
        Some((format, location)) if !format.is_empty() && !location.is_empty() => {
            Ok((format, location))
        }
        _ => Err(ConvertError::MissingLocation {
            endpoint: spec.to_string(),
        }),
    }
}

/// Counters for one converted file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConvertReport {
    /// Records decoded, including duplicates.
    pub processed: u64,
    pub inserted: u64,
    pub duplicates: u64,
}

/// Outcome of a directory batch: per-file reports and per-file failures.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<(PathBuf, ConvertReport)>,
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn total_processed(&self) -> u64 {
        self.converted.iter().map(|(_, r)| r.processed).sum()
    }
}

/// One conversion run: a source, a target, and backend parameters.
pub struct Converter {
    pub source: Source,
    pub target: Target,
    /// Administrative connection parameters for postgres targets.
    pub pg: PgParams,
    /// Delete an existing database file before loading (sqlite only).
    pub remove_database: bool,
}

impl Converter {
    pub fn new(source: Source, target: Target) -> Self {
        Self {
            source,
            target,
            pg: PgParams::default(),
            remove_database: false,
        }
    }

    /// Convert a single source file into its target table.
    pub fn convert(&self) -> Result<ConvertReport> {
        let path = Path::new(&self.source.location);
        match self.source.kind {
            SourceKind::Binary => self.convert_binary(path),
            SourceKind::Ascii => self.convert_ascii(path),
            SourceKind::AsciiZoneStats => self.convert_zone_stats(path),
        }
    }

    /// Convert every zone file in the source directory, independently.
    ///
    /// Files may be processed in parallel: each owns a disjoint target
    /// table and connection. A failure is recorded with the offending path
    /// and the rest of the batch carries on.
    pub fn convert_directory(&self) -> Result<BatchReport> {
        if self.source.kind == SourceKind::AsciiZoneStats {
            return Err(ConvertError::BadBatchSource);
        }
        let dir = Path::new(&self.source.location);
        let files = collect_zone_files(dir)?;
        if files.is_empty() {
            return Err(ConvertError::EmptyBatch {
                path: dir.to_path_buf(),
            });
        }
        if self.target.kind == TargetKind::Sqlite {
            fs::create_dir_all(&self.target.location)?;
        }

        let converted = Mutex::new(Vec::new());
        let failed = Mutex::new(Vec::new());
        files.par_iter().for_each(|file| match self.convert_zone_file(file) {
            Ok(report) => {
                if let Ok(mut converted) = converted.lock() {
                    converted.push((file.clone(), report));
                }
            }
            Err(e) => {
                eprintln!("warning: {}: {}", file.display(), e);
                if let Ok(mut failed) = failed.lock() {
                    failed.push((file.clone(), e.to_string()));
                }
            }
        });

        let mut report = BatchReport {
            converted: converted.into_inner().unwrap_or_default(),
            failed: failed.into_inner().unwrap_or_default(),
        };
        report.converted.sort_by(|a, b| a.0.cmp(&b.0));
        report.failed.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(report)
    }

    fn convert_zone_file(&self, file: &Path) -> Result<ConvertReport> {
        let per_file = Converter {
            source: Source {
                kind: self.source.kind,
                location: file.display().to_string(),
            },
            target: self.target_for_zone_file(file)?,
            pg: self.pg.clone(),
            remove_database: self.remove_database,
        };
        per_file.convert()
    }

    /// Derive a per-file target from the batch target: a `<stem>.sqlite3`
    /// file inside the target directory, or a `<database>.<stem>` table.
    fn target_for_zone_file(&self, file: &Path) -> Result<Target> {
        let stem = file
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConvertError::BadZoneName {
                name: file.display().to_string(),
            })?;
        let location = match self.target.kind {
            TargetKind::Sqlite => Path::new(&self.target.location)
                .join(format!("{stem}.sqlite3"))
                .display()
                .to_string(),
            TargetKind::Postgres => format!("{}.{}", self.target.location, stem),
        };
        Ok(Target {
            kind: self.target.kind,
            location,
        })
    }

    fn convert_binary(&self, path: &Path) -> Result<ConvertReport> {
        let zone = schema::zone_number(path)?;
        let reader = BinaryZoneReader::open(path, zone)?;
        let progress = Progress::new(reader.record_count());
        let (mut sink, table) = self.open_star_sink()?;

        let mut report = ConvertReport::default();
        for decoded in reader {
            let star = decoded?;
            insert_star(&mut sink, &table, &star, &progress, &mut report)?;
            progress.tick(report.processed);
        }
        progress.finish();
        sink.close()?;
        Ok(report)
    }

    fn convert_ascii(&self, path: &Path) -> Result<ConvertReport> {
        // First line is a header; everything after it is one star per line
        let total = count_lines(path)?.saturating_sub(1);
        let progress = Progress::new(total);
        let (mut sink, table) = self.open_star_sink()?;

        let mut report = ConvertReport::default();
        let reader = BufReader::new(File::open(path)?);
        for line in reader.lines().skip(1) {
            let line = line?;
            let decoded = ascii::decode_star_line(&line)?;
            insert_star(&mut sink, &table, &decoded.star, &progress, &mut report)?;
            progress.tick(report.processed);
        }
        progress.finish();
        sink.close()?;
        Ok(report)
    }

    fn convert_zone_stats(&self, path: &Path) -> Result<ConvertReport> {
        let mut sink = self.open_zone_sink()?;

        let mut report = ConvertReport::default();
        let reader = BufReader::new(File::open(path)?);
        for line in reader.lines().skip(zonestats::HEADER_LINES) {
            let line = line?;
            if zonestats::is_separator(&line) || line.trim().is_empty() {
                continue;
            }
            let stat = zonestats::decode_zone_line(&line)?;
            match sink.insert_zone_stat(&stat)? {
                InsertOutcome::Inserted => report.inserted += 1,
                InsertOutcome::Duplicate => {
                    println!("zone {} already exists, skipping", stat.zone);
                    report.duplicates += 1;
                }
            }
            report.processed += 1;
        }
        sink.close()?;
        Ok(report)
    }

    /// Connect the star sink and ensure the zone table exists. Resolved
    /// once per file, before the record loop.
    fn open_star_sink(&self) -> Result<(Sink, String)> {
        match self.target.kind {
            TargetKind::Sqlite => {
                let table = schema::star_table_name(&self.target.location)?;
                let mut sink = Sink::Sqlite(SqliteSink::open(
                    Path::new(&self.target.location),
                    self.remove_database,
                )?);
                sink.ensure_schema(&schema::star_table_ddl(&table))?;
                Ok((sink, table))
            }
            TargetKind::Postgres => {
                let (database, table) = schema::split_postgres_target(&self.target.location)?;
                let mut sink = Sink::Postgres(PostgresSink::create(&self.pg, &database)?);
                sink.ensure_schema(&schema::star_table_ddl(&table))?;
                Ok((sink, table))
            }
        }
    }

    fn open_zone_sink(&self) -> Result<Sink> {
        let mut sink = match self.target.kind {
            TargetKind::Sqlite => Sink::Sqlite(SqliteSink::open(
                Path::new(&self.target.location),
                self.remove_database,
            )?),
            TargetKind::Postgres => {
                Sink::Postgres(PostgresSink::create(&self.pg, &self.target.location)?)
            }
        };
        sink.ensure_schema(schema::ZONE_STATS_DDL)?;
        Ok(sink)
    }
}

fn insert_star(
    sink: &mut Sink,
    table: &str,
    star: &StarRecord,
    progress: &Progress,
    report: &mut ConvertReport,
) -> Result<()> {
    match sink.insert_star(table, star)? {
        InsertOutcome::Inserted => report.inserted += 1,
        InsertOutcome::Duplicate => {
            progress.println(&format!("{} already exists, skipping", star.mpos1));
            report.duplicates += 1;
        }
    }
    report.processed += 1;
    Ok(())
}

fn collect_zone_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && schema::zone_number(&path).is_ok() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn count_lines(path: &Path) -> Result<u64> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut buf = String::new();
    let mut count = 0;
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            break;
        }
        count += 1;
    }
    Ok(count)
}

/// Coarse progress reporting: the bar position moves every `total/100`
/// records, never per record, so output volume stays bounded for zones
/// with hundreds of thousands of stars.
struct Progress {
    bar: ProgressBar,
    step: u64,
}

impl Progress {
    fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .unwrap()
                .progress_chars("#>-"),
        );
        Self {
            bar,
            step: (total / PROGRESS_TICKS).max(1),
        }
    }

    fn tick(&self, processed: u64) {
        if processed % self.step == 0 {
            self.bar.set_position(processed);
        }
    }

    fn println(&self, message: &str) {
        self.bar.println(message);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_endpoints() {
        let source = Source::parse("binary:data/z001").unwrap();
        assert_eq!(source.kind, SourceKind::Binary);
        assert_eq!(source.location, "data/z001");

        assert_eq!(
            Source::parse("ascii:dump.txt").unwrap().kind,
            SourceKind::Ascii
        );
        assert_eq!(
            Source::parse("ascii_zonestats:zone_stats").unwrap().kind,
            SourceKind::AsciiZoneStats
        );
    }

    #[test]
    fn test_parse_target_endpoints() {
        let target = Target::parse("sqlite:out/z001.sqlite3").unwrap();
        assert_eq!(target.kind, TargetKind::Sqlite);

        let target = Target::parse("postgres:ucac4.z001").unwrap();
        assert_eq!(target.kind, TargetKind::Postgres);
        assert_eq!(target.location, "ucac4.z001");
    }

    #[test]
    fn test_unknown_format_names_the_token() {
        let err = Source::parse("csv:data/z001").unwrap_err();
        assert!(matches!(err, ConvertError::UnknownFormat { ref token } if token == "csv"));
        assert!(err.to_string().contains("csv"));

        let err = Target::parse("mysql:ucac4.z001").unwrap_err();
        assert!(matches!(err, ConvertError::UnknownFormat { ref token } if token == "mysql"));
    }

    #[test]
    fn test_missing_location_rejected() {
        assert!(matches!(
            Source::parse("binary"),
            Err(ConvertError::MissingLocation { .. })
        ));
        assert!(matches!(
            Source::parse("binary:"),
            Err(ConvertError::MissingLocation { .. })
        ));
    }

    #[test]
    fn test_target_derivation_for_batch_files() {
        let converter = Converter::new(
            Source::parse("binary:zones").unwrap(),
            Target::parse("sqlite:out").unwrap(),
        );
        let target = converter
            .target_for_zone_file(Path::new("zones/z042"))
            .unwrap();
        assert_eq!(target.location, Path::new("out/z042.sqlite3").display().to_string());

        let converter = Converter::new(
            Source::parse("binary:zones").unwrap(),
            Target::parse("postgres:ucac4").unwrap(),
        );
        let target = converter
            .target_for_zone_file(Path::new("zones/z042"))
            .unwrap();
        assert_eq!(target.location, "ucac4.z042");
    }

    #[test]
    fn test_zone_stats_batch_rejected() {
        let converter = Converter::new(
            Source::parse("ascii_zonestats:zones").unwrap(),
            Target::parse("sqlite:out").unwrap(),
        );
        assert!(matches!(
            converter.convert_directory(),
            Err(ConvertError::BadBatchSource)
        ));
    }

    #[test]
    fn test_collect_zone_files_filters_and_sorts() {
        let dir = tempfile::TempDir::new().unwrap();
        for name in ["z002", "z001", "readme.txt", "z120"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let files = collect_zone_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["z001", "z002", "z120"]);
    }

    #[test]
    fn test_progress_step_never_zero() {
        let progress = Progress::new(5);
        assert_eq!(progress.step, 1);
        let progress = Progress::new(250_000);
        assert_eq!(progress.step, 2_500);
    }
}
