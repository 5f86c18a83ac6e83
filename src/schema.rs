//! Table naming and schema templates.
//!
//! One star-table layout serves every zone; only the table name varies.
//! Zone files follow the catalog's `z001`..`z900` naming convention, and
//! the zone number embedded in the last three characters of a file name is
//! propagated into the target table name.

use crate::error::{ConvertError, Result};
use std::path::Path;

/// Derive the star table name from a target location: `"z"` plus the last
/// three characters of the file stem (`data/z042.sqlite3` → `z042`).
pub fn star_table_name(location: &str) -> Result<String> {
    let stem = Path::new(location)
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| bad_zone(location))?;
    let chars: Vec<char> = stem.chars().collect();
    if chars.len() < 3 {
        return Err(bad_zone(location));
    }
    let suffix: String = chars[chars.len() - 3..].iter().collect();
    Ok(format!("z{suffix}"))
}

/// Derive the 1-based zone number from a binary source file name
/// (`.../z001` → 1).
pub fn zone_number(path: &Path) -> Result<i32> {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| bad_zone(&path.display().to_string()))?;
    let chars: Vec<char> = name.chars().collect();
    if chars.len() < 3 {
        return Err(bad_zone(name));
    }
    let suffix: String = chars[chars.len() - 3..].iter().collect();
    suffix.parse().map_err(|_| bad_zone(name))
}

fn bad_zone(name: &str) -> ConvertError {
    ConvertError::BadZoneName {
        name: name.to_string(),
    }
}

/// Split a PostgreSQL target location into its `database.table` pair.
pub fn split_postgres_target(location: &str) -> Result<(String, String)> {
    match location.split_once('.') {
        Some((database, table)) if !database.is_empty() && !table.is_empty() => {
            Ok((database.to_string(), table.to_string()))
        }
        _ => Err(ConvertError::BadPostgresTarget {
            location: location.to_string(),
        }),
    }
}

/// DDL for one zone's star table. `mpos1` is the primary key; every
/// magnitude column is nullable. `IF NOT EXISTS` keeps ensure-schema
/// idempotent on both backends.
pub fn star_table_ddl(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (\n\
         \tzone integer NOT NULL,\n\
         \tmpos1 bigint PRIMARY KEY,\n\
         \tucac2 text,\n\
         \tot integer NOT NULL,\n\
         \tra float NOT NULL,\n\
         \tdec float NOT NULL,\n\
         \tj_mag integer,\n\
         \th_mag integer,\n\
         \tk_mag integer,\n\
         \tb_mag integer,\n\
         \tv_mag integer,\n\
         \tg_mag integer,\n\
         \tr_mag integer,\n\
         \ti_mag integer\n\
         )"
    )
}

/// DDL for the per-zone statistics table.
pub const ZONE_STATS_DDL: &str = "CREATE TABLE IF NOT EXISTS zones (\n\
     \tzone integer PRIMARY KEY,\n\
     \tnr_of_stars bigint,\n\
     \taccumulated_sum bigint,\n\
     \tmax_dec float NOT NULL\n\
     )";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_table_name_from_sqlite_path() {
        assert_eq!(star_table_name("data/z042.sqlite3").unwrap(), "z042");
        assert_eq!(star_table_name("../z001.sqlite3").unwrap(), "z001");
    }

    #[test]
    fn test_star_table_name_without_extension() {
        assert_eq!(star_table_name("z900").unwrap(), "z900");
    }

    #[test]
    fn test_star_table_name_too_short() {
        assert!(matches!(
            star_table_name("ab.sqlite3"),
            Err(ConvertError::BadZoneName { .. })
        ));
    }

    #[test]
    fn test_zone_number_from_file_name() {
        assert_eq!(zone_number(Path::new("data/z001")).unwrap(), 1);
        assert_eq!(zone_number(Path::new("z120")).unwrap(), 120);
    }

    #[test]
    fn test_zone_number_non_numeric() {
        assert!(matches!(
            zone_number(Path::new("catalog")),
            Err(ConvertError::BadZoneName { .. })
        ));
    }

    #[test]
    fn test_split_postgres_target() {
        let (db, table) = split_postgres_target("ucac4.z002").unwrap();
        assert_eq!(db, "ucac4");
        assert_eq!(table, "z002");
    }

    #[test]
    fn test_split_postgres_target_rejects_bare_database() {
        assert!(matches!(
            split_postgres_target("ucac4"),
            Err(ConvertError::BadPostgresTarget { .. })
        ));
    }

    #[test]
    fn test_star_table_ddl_substitution() {
        let ddl = star_table_ddl("z042");
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS z042"));
        assert!(ddl.contains("mpos1 bigint PRIMARY KEY"));
        assert!(ddl.contains("ot integer NOT NULL"));
        assert!(ddl.contains("i_mag integer"));
    }

    #[test]
    fn test_zone_stats_ddl_has_primary_key() {
        assert!(ZONE_STATS_DDL.contains("zone integer PRIMARY KEY"));
    }
}
