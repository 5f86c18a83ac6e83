//! Binary zone file decoder.
//!
//! A UCAC4 binary zone file is a sequence of fixed 78-byte little-endian
//! records. Only five field blocks are decoded; the bytes between them carry
//! fields this loader does not need (fit magnitudes, proper motion, epochs,
//! external-catalog flags) and are skipped.
//!
//! | block | offset | width | encoding |
//! |-------|--------|-------|----------|
//! | ra, south-pole distance | 0 | 8 | 2 × u32, milliarcseconds |
//! | object type | 13 | 1 | u8 |
//! | 2MASS J/H/K | 34 | 6 | 3 × i16, millimag |
//! | APASS B/V/g/r/i | 46 | 10 | 5 × i16, millimag |
//! | mpos1, UCAC2 zone, UCAC2 running number | 68 | 10 | u32, i16, u32 |

use crate::error::{ConvertError, Result};
use crate::record::StarRecord;
use byteorder::{ByteOrder, LittleEndian};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Fixed size of one binary star record.
pub const RECORD_SIZE: usize = 78;

const RA_MAS: usize = 0;
const SPD_MAS: usize = 4;
const OBJECT_TYPE: usize = 13;
const JHK_MAGS: usize = 34;
const APASS_MAGS: usize = 46;
const MPOS1: usize = 68;
const UCAC2_ZONE: usize = 72;
const UCAC2_RUNNING: usize = 74;

/// Magnitude value the catalog writes when a band was not measured.
const MAG_SENTINEL: i16 = 20000;

/// Cross-match string the catalog writes when there is no UCAC2 counterpart.
const UCAC2_SENTINEL: &str = "000-000000";

const MAS_PER_DEGREE: f64 = 3_600_000.0;

/// Decode one 78-byte record into a star belonging to `zone`.
///
/// Never fails: every field sits inside the fixed record, sentinel
/// magnitudes become `None`, and an unreadable object-type byte degrades
/// to 0 rather than aborting the record.
pub fn decode_record(zone: i32, record: &[u8; RECORD_SIZE]) -> StarRecord {
    let ra_mas = LittleEndian::read_u32(&record[RA_MAS..RA_MAS + 4]);
    let spd_mas = LittleEndian::read_u32(&record[SPD_MAS..SPD_MAS + 4]);

    let mpos1 = LittleEndian::read_u32(&record[MPOS1..MPOS1 + 4]) as i64;
    let ucac2_zone = LittleEndian::read_i16(&record[UCAC2_ZONE..UCAC2_ZONE + 2]);
    let ucac2_running = LittleEndian::read_u32(&record[UCAC2_RUNNING..UCAC2_RUNNING + 4]);
    let ucac2 = cross_match(ucac2_zone, ucac2_running);

    StarRecord {
        zone,
        mpos1,
        ucac4_id: None,
        ucac2,
        ot: record.get(OBJECT_TYPE).copied().unwrap_or(0),
        ra: ra_mas as f64 / MAS_PER_DEGREE,
        dec: -90.0 + spd_mas as f64 / MAS_PER_DEGREE,
        j_mag: magnitude(record, JHK_MAGS),
        h_mag: magnitude(record, JHK_MAGS + 2),
        k_mag: magnitude(record, JHK_MAGS + 4),
        b_mag: magnitude(record, APASS_MAGS),
        v_mag: magnitude(record, APASS_MAGS + 2),
        g_mag: magnitude(record, APASS_MAGS + 4),
        r_mag: magnitude(record, APASS_MAGS + 6),
        i_mag: magnitude(record, APASS_MAGS + 8),
    }
}

fn magnitude(record: &[u8], offset: usize) -> Option<i32> {
    let raw = LittleEndian::read_i16(&record[offset..offset + 2]);
    (raw != MAG_SENTINEL).then_some(raw as i32)
}

fn cross_match(zone: i16, running: u32) -> Option<String> {
    let formatted = format!("{zone:03}-{running:06}");
    (formatted != UCAC2_SENTINEL).then_some(formatted)
}

/// Streaming reader over a binary zone file.
///
/// Opening validates that the file size is an exact multiple of
/// [`RECORD_SIZE`]; a remainder means a corrupt or truncated source and is
/// surfaced as [`ConvertError::TruncatedFile`] rather than silently
/// dropping the partial record. Iteration yields exactly
/// [`record_count`](Self::record_count) stars.
pub struct BinaryZoneReader {
    reader: BufReader<File>,
    zone: i32,
    remaining: u64,
    record_count: u64,
}

impl BinaryZoneReader {
    pub fn open(path: &Path, zone: i32) -> Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        if size % RECORD_SIZE as u64 != 0 {
            return Err(ConvertError::TruncatedFile {
                path: path.to_path_buf(),
                size,
            });
        }
        let record_count = size / RECORD_SIZE as u64;
        Ok(Self {
            reader: BufReader::new(file),
            zone,
            remaining: record_count,
            record_count,
        })
    }

    /// Total records in the file (`size / 78`, exact).
    pub fn record_count(&self) -> u64 {
        self.record_count
    }
}

impl Iterator for BinaryZoneReader {
    type Item = Result<StarRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let mut buf = [0u8; RECORD_SIZE];
        if let Err(e) = self.reader.read_exact(&mut buf) {
            self.remaining = 0;
            return Some(Err(e.into()));
        }
        self.remaining -= 1;
        Some(Ok(decode_record(self.zone, &buf)))
    }
}
