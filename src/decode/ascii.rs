//! Fixed-column ASCII catalog line decoder.
//!
//! One star per line, ≥ 270 columns, layout per the UCAC4 release notes
//! (readme_u4). Identity, position and object type are required fields;
//! every magnitude is optional and degrades to `None` when blank or
//! malformed. The first line of a catalog file is a header and is skipped
//! by the caller, not here.

use super::{col, parse_millimag, Span};
use crate::error::{ConvertError, Result};
use crate::record::StarRecord;

/// Shortest line the column table below can be applied to.
pub const MIN_LINE_LEN: usize = 270;

/// Zone number assigned to ASCII records; the dump format does not carry one.
pub const IMPLICIT_ZONE: i32 = 1;

const UCAC4_ID: Span = Span::new(0, 10);
const RA: Span = Span::new(11, 22);
const DEC: Span = Span::new(23, 33);
const MODEL_MAG: Span = Span::new(63, 69);
const APERTURE_MAG: Span = Span::new(70, 76);
const OBJECT_TYPE: Span = Span::new(84, 85);
const MPOS1: Span = Span::new(129, 138);
const UCAC2: Span = Span::new(139, 149);
const J_MAG: Span = Span::new(174, 180);
const H_MAG: Span = Span::new(189, 195);
const K_MAG: Span = Span::new(204, 210);
const B_MAG: Span = Span::new(219, 225);
const V_MAG: Span = Span::new(230, 236);
const G_MAG: Span = Span::new(241, 247);
const R_MAG: Span = Span::new(252, 258);
const I_MAG: Span = Span::new(263, 269);

/// One decoded ASCII line.
///
/// The UCAC fit-model and aperture magnitudes are decoded alongside the
/// eight persisted magnitudes but are not part of the shared table layout.
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiStar {
    pub star: StarRecord,
    /// UCAC fit-model magnitude, millimag.
    pub model_mag: Option<i32>,
    /// UCAC aperture magnitude, millimag.
    pub aperture_mag: Option<i32>,
}

/// Decode one catalog line into a star record.
///
/// Fails on a line shorter than [`MIN_LINE_LEN`] or on an unparsable
/// required field (identifier, object type, position). A bad magnitude
/// substring yields `None` for that field only.
pub fn decode_star_line(line: &str) -> Result<AsciiStar> {
    if line.len() < MIN_LINE_LEN {
        return Err(ConvertError::LineTooShort {
            len: line.len(),
            needed: MIN_LINE_LEN,
        });
    }
    let bytes = line.as_bytes();

    let ucac4_id = required_str(bytes, UCAC4_ID, "ucac4_id")?.to_string();
    let mpos1: i64 = required_parse(bytes, MPOS1, "mpos1")?;
    let ot: u8 = required_parse(bytes, OBJECT_TYPE, "object type")?;
    let ra: f64 = required_parse(bytes, RA, "ra")?;
    let dec: f64 = required_parse(bytes, DEC, "dec")?;
    // Same no-match sentinel as the binary encoding
    let ucac2 = col(bytes, UCAC2)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "000-000000");

    let star = StarRecord {
        zone: IMPLICIT_ZONE,
        mpos1,
        ucac4_id: Some(ucac4_id),
        ucac2,
        ot,
        ra,
        dec,
        j_mag: parse_millimag(bytes, J_MAG),
        h_mag: parse_millimag(bytes, H_MAG),
        k_mag: parse_millimag(bytes, K_MAG),
        b_mag: parse_millimag(bytes, B_MAG),
        v_mag: parse_millimag(bytes, V_MAG),
        g_mag: parse_millimag(bytes, G_MAG),
        r_mag: parse_millimag(bytes, R_MAG),
        i_mag: parse_millimag(bytes, I_MAG),
    };

    Ok(AsciiStar {
        star,
        model_mag: parse_millimag(bytes, MODEL_MAG),
        aperture_mag: parse_millimag(bytes, APERTURE_MAG),
    })
}

fn required_str<'a>(bytes: &'a [u8], span: Span, field: &'static str) -> Result<&'a str> {
    col(bytes, span)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ConvertError::BadField {
            field,
            value: String::new(),
        })
}

fn required_parse<T: std::str::FromStr>(
    bytes: &[u8],
    span: Span,
    field: &'static str,
) -> Result<T> {
    let raw = required_str(bytes, span, field)?;
    raw.parse().map_err(|_| ConvertError::BadField {
        field,
        value: raw.to_string(),
    })
}
