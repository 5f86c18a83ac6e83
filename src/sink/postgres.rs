//! Client/server PostgreSQL backend.
//!
//! Unlike the embedded backend, the containing database has to exist before
//! the zone table can: [`PostgresSink::create`] first connects with the
//! administrative parameters, issues `CREATE DATABASE` (an already-present
//! database is a no-op), then reconnects scoped to the target database.

use crate::error::Result;
use crate::record::{StarRecord, ZoneStat};
use crate::sink::InsertOutcome;
use postgres::error::SqlState;
use postgres::{Client, Config, NoTls};

/// Connection parameters for the administrative endpoint.
#[derive(Debug, Clone)]
pub struct PgParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database to connect to for `CREATE DATABASE`, not the target itself.
    pub database: String,
}

impl Default for PgParams {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            database: "postgres".to_string(),
        }
    }
}

pub struct PostgresSink {
    client: Client,
}

impl PostgresSink {
    /// Create `database` if needed, then connect to it.
    pub fn create(params: &PgParams, database: &str) -> Result<Self> {
        let mut admin = connect(params, &params.database)?;
        match admin.batch_execute(&format!("CREATE DATABASE {database}")) {
            Ok(()) => {}
            Err(e) if has_code(&e, &SqlState::DUPLICATE_DATABASE) => {}
            Err(e) => return Err(e.into()),
        }
        drop(admin);

        let client = connect(params, database)?;
        Ok(Self { client })
    }

    pub fn ensure_schema(&mut self, ddl: &str) -> Result<()> {
        self.client.batch_execute(ddl)?;
        Ok(())
    }

    pub fn insert_star(&mut self, table: &str, star: &StarRecord) -> Result<InsertOutcome> {
        let sql = format!(
            "INSERT INTO {table} \
             (zone, mpos1, ucac2, ot, ra, dec, j_mag, h_mag, k_mag, b_mag, v_mag, g_mag, r_mag, i_mag) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)"
        );
        let ot = star.ot as i32;
        let result = self.client.execute(
            sql.as_str(),
            &[
                &star.zone,
                &star.mpos1,
                &star.ucac2,
                &ot,
                &star.ra,
                &star.dec,
                &star.j_mag,
                &star.h_mag,
                &star.k_mag,
                &star.b_mag,
                &star.v_mag,
                &star.g_mag,
                &star.r_mag,
                &star.i_mag,
            ],
        );
        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if has_code(&e, &SqlState::UNIQUE_VIOLATION) => Ok(InsertOutcome::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    pub fn insert_zone_stat(&mut self, stat: &ZoneStat) -> Result<InsertOutcome> {
        let result = self.client.execute(
            "INSERT INTO zones (zone, nr_of_stars, accumulated_sum, max_dec) \
             VALUES ($1, $2, $3, $4)",
            &[&stat.zone, &stat.star_count, &stat.cumulative, &stat.max_dec],
        );
        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if has_code(&e, &SqlState::UNIQUE_VIOLATION) => Ok(InsertOutcome::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    pub fn close(self) -> Result<()> {
        // Dropping the client closes the connection
        Ok(())
    }
}

fn connect(params: &PgParams, database: &str) -> std::result::Result<Client, postgres::Error> {
    Config::new()
        .host(&params.host)
        .port(params.port)
        .user(&params.user)
        .password(&params.password)
        .dbname(database)
        .connect(NoTls)
}

fn has_code(e: &postgres::Error, state: &SqlState) -> bool {
    e.code() == Some(state)
}
