//! Storage backends.
//!
//! The two backends live behind one [`Sink`] enum, resolved once when a
//! conversion starts; the record loop never re-checks the target format.
//! Parameter-placeholder syntax (`?N` vs `$N`) is a backend concern and
//! stays inside each variant.

mod postgres;
mod sqlite;

pub use postgres::{PgParams, PostgresSink};
pub use sqlite::SqliteSink;

use crate::error::Result;
use crate::record::{StarRecord, ZoneStat};

/// Outcome of a single row insert.
///
/// A primary-key conflict is an outcome, not an error: the batch reports
/// the duplicate by its `mpos1` and continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}

/// A connected storage backend.
pub enum Sink {
    Sqlite(SqliteSink),
    Postgres(PostgresSink),
}

impl Sink {
    /// Apply a DDL statement. Idempotent: the schema templates use
    /// `IF NOT EXISTS`, so an already-present table is a no-op.
    pub fn ensure_schema(&mut self, ddl: &str) -> Result<()> {
        match self {
            Sink::Sqlite(sink) => sink.ensure_schema(ddl),
            Sink::Postgres(sink) => sink.ensure_schema(ddl),
        }
    }

    /// Insert one star into `table`, detecting primary-key conflicts.
    pub fn insert_star(&mut self, table: &str, star: &StarRecord) -> Result<InsertOutcome> {
        match self {
            Sink::Sqlite(sink) => sink.insert_star(table, star),
            Sink::Postgres(sink) => sink.insert_star(table, star),
        }
    }

    /// Insert one per-zone aggregate into the `zones` table.
    pub fn insert_zone_stat(&mut self, stat: &ZoneStat) -> Result<InsertOutcome> {
        match self {
            Sink::Sqlite(sink) => sink.insert_zone_stat(stat),
            Sink::Postgres(sink) => sink.insert_zone_stat(stat),
        }
    }

    /// Release the connection. Dropping a sink closes it too, so the
    /// mid-batch failure path needs no special handling.
    pub fn close(self) -> Result<()> {
        match self {
            Sink::Sqlite(sink) => sink.close(),
            Sink::Postgres(sink) => sink.close(),
        }
    }
}
