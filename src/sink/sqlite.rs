//! Embedded SQLite backend.

use crate::error::Result;
use crate::record::{StarRecord, ZoneStat};
use crate::sink::InsertOutcome;
use rusqlite::{params, Connection, ErrorCode};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Open (creating if absent) the database file at `path`. With
    /// `remove_existing`, an already-present file is deleted first; a
    /// missing file is not an error.
    pub fn open(path: &Path, remove_existing: bool) -> Result<Self> {
        if remove_existing {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn ensure_schema(&mut self, ddl: &str) -> Result<()> {
        self.conn.execute_batch(ddl)?;
        Ok(())
    }

    pub fn insert_star(&mut self, table: &str, star: &StarRecord) -> Result<InsertOutcome> {
        let sql = format!(
            "INSERT INTO {table} \
             (zone, mpos1, ucac2, ot, ra, dec, j_mag, h_mag, k_mag, b_mag, v_mag, g_mag, r_mag, i_mag) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let result = stmt.execute(params![
            star.zone,
            star.mpos1,
            star.ucac2,
            star.ot as i32,
            star.ra,
            star.dec,
            star.j_mag,
            star.h_mag,
            star.k_mag,
            star.b_mag,
            star.v_mag,
            star.g_mag,
            star.r_mag,
            star.i_mag,
        ]);
        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if is_constraint_violation(&e) => Ok(InsertOutcome::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    pub fn insert_zone_stat(&mut self, stat: &ZoneStat) -> Result<InsertOutcome> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO zones (zone, nr_of_stars, accumulated_sum, max_dec) \
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        let result = stmt.execute(params![
            stat.zone,
            stat.star_count,
            stat.cumulative,
            stat.max_dec
        ]);
        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if is_constraint_violation(&e) => Ok(InsertOutcome::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        Ok(())
    }
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use tempfile::TempDir;

    fn sample_star(mpos1: i64) -> StarRecord {
        StarRecord {
            zone: 1,
            mpos1,
            ucac4_id: None,
            ucac2: Some("001-000010".to_string()),
            ot: 0,
            ra: 1.1438403,
            dec: -89.9186194,
            j_mag: Some(11_968),
            h_mag: None,
            k_mag: Some(11_323),
            b_mag: None,
            v_mag: Some(13_774),
            g_mag: None,
            r_mag: None,
            i_mag: None,
        }
    }

    fn open_with_schema(dir: &TempDir) -> SqliteSink {
        let mut sink = SqliteSink::open(&dir.path().join("z001.sqlite3"), false).unwrap();
        sink.ensure_schema(&schema::star_table_ddl("z001")).unwrap();
        sink.ensure_schema(schema::ZONE_STATS_DDL).unwrap();
        sink
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut sink = open_with_schema(&dir);
        // Re-applying the same DDL must be a no-op, not an error
        sink.ensure_schema(&schema::star_table_ddl("z001")).unwrap();
        sink.close().unwrap();
    }

    #[test]
    fn test_duplicate_insert_is_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        let mut sink = open_with_schema(&dir);

        assert_eq!(
            sink.insert_star("z001", &sample_star(270_000)).unwrap(),
            InsertOutcome::Inserted
        );
        assert_eq!(
            sink.insert_star("z001", &sample_star(270_000)).unwrap(),
            InsertOutcome::Duplicate
        );
        assert_eq!(
            sink.insert_star("z001", &sample_star(270_001)).unwrap(),
            InsertOutcome::Inserted
        );
        sink.close().unwrap();
    }

    #[test]
    fn test_inserted_row_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("z001.sqlite3");
        let mut sink = SqliteSink::open(&path, false).unwrap();
        sink.ensure_schema(&schema::star_table_ddl("z001")).unwrap();
        sink.insert_star("z001", &sample_star(270_000)).unwrap();
        sink.close().unwrap();

        let conn = Connection::open(&path).unwrap();
        let (mpos1, ucac2, v_mag, h_mag): (i64, String, i32, Option<i32>) = conn
            .query_row(
                "SELECT mpos1, ucac2, v_mag, h_mag FROM z001",
                [],
                |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
                },
            )
            .unwrap();
        assert_eq!(mpos1, 270_000);
        assert_eq!(ucac2, "001-000010");
        assert_eq!(v_mag, 13_774);
        assert_eq!(h_mag, None);
    }

    #[test]
    fn test_zone_stat_insert_and_duplicate() {
        let dir = TempDir::new().unwrap();
        let mut sink = open_with_schema(&dir);
        let stat = ZoneStat {
            zone: 1,
            star_count: 206,
            cumulative: 206,
            max_dec: -89.80,
        };
        assert_eq!(
            sink.insert_zone_stat(&stat).unwrap(),
            InsertOutcome::Inserted
        );
        assert_eq!(
            sink.insert_zone_stat(&stat).unwrap(),
            InsertOutcome::Duplicate
        );
    }

    #[test]
    fn test_remove_existing_starts_fresh() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("z001.sqlite3");

        let mut sink = SqliteSink::open(&path, false).unwrap();
        sink.ensure_schema(&schema::star_table_ddl("z001")).unwrap();
        sink.insert_star("z001", &sample_star(270_000)).unwrap();
        sink.close().unwrap();

        // Reopen with removal: the old row must be gone
        let mut sink = SqliteSink::open(&path, true).unwrap();
        sink.ensure_schema(&schema::star_table_ddl("z001")).unwrap();
        assert_eq!(
            sink.insert_star("z001", &sample_star(270_000)).unwrap(),
            InsertOutcome::Inserted
        );
        sink.close().unwrap();
    }

    #[test]
    fn test_remove_missing_file_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let sink = SqliteSink::open(&dir.path().join("fresh.sqlite3"), true).unwrap();
        sink.close().unwrap();
    }
}
