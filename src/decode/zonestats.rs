//! Zone statistics index file decoder.
//!
//! The catalog ships a `zone_stats` text index with one fixed-column line
//! per declination zone. The first 11 lines are documentation and a column
//! header; a run of hyphens separates the header from the data. Callers
//! skip both (see [`HEADER_LINES`] and [`is_separator`]); this decoder only
//! handles data lines.

use super::{col, Span};
use crate::error::{ConvertError, Result};
use crate::record::ZoneStat;

/// Leading documentation lines to skip unconditionally.
pub const HEADER_LINES: usize = 11;

/// Hyphen run marking a section divider.
const SEPARATOR: &str = "-----";

const ZONE: Span = Span::new(0, 3);
const STAR_COUNT: Span = Span::new(5, 13);
const CUMULATIVE: Span = Span::new(15, 23);
const MAX_DEC: Span = Span::new(47, 53);

const MIN_LINE_LEN: usize = 53;

/// True for section-divider lines, which carry no zone data.
pub fn is_separator(line: &str) -> bool {
    line.contains(SEPARATOR)
}

/// Decode one data line of the zone statistics index.
pub fn decode_zone_line(line: &str) -> Result<ZoneStat> {
    if line.len() < MIN_LINE_LEN {
        return Err(ConvertError::LineTooShort {
            len: line.len(),
            needed: MIN_LINE_LEN,
        });
    }
    let bytes = line.as_bytes();
    Ok(ZoneStat {
        zone: required(bytes, ZONE, "zone")?,
        star_count: required(bytes, STAR_COUNT, "star count")?,
        cumulative: required(bytes, CUMULATIVE, "cumulative count")?,
        max_dec: required(bytes, MAX_DEC, "max declination")?,
    })
}

fn required<T: std::str::FromStr>(bytes: &[u8], span: Span, field: &'static str) -> Result<T> {
    let raw = col(bytes, span).map(str::trim).unwrap_or("");
    raw.parse().map_err(|_| ConvertError::BadField {
        field,
        value: raw.to_string(),
    })
}
