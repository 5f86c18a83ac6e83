//! Record decoders for the three UCAC4 source encodings.
//!
//! Each decoder turns one unit of input (a fixed-column text line or a
//! 78-byte binary record) into a typed record. Per-field numeric failures
//! degrade to `None` for that field; one bad magnitude never fails a record.

pub mod ascii;
pub mod binary;
pub mod zonestats;

/// A half-open character range inside a fixed-column line.
///
/// The catalog's column layout is declared as named `Span` constants in each
/// decoder and consumed by the generic slice helpers below, keeping the
/// layout spec as data rather than scattered literals.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub(crate) const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Extract the substring a span covers, or `None` if the line is too short
/// or the bytes are not valid UTF-8.
pub(crate) fn col(bytes: &[u8], span: Span) -> Option<&str> {
    if span.end > bytes.len() {
        return None;
    }
    std::str::from_utf8(&bytes[span.start..span.end]).ok()
}

/// Optional float field: `None` on a blank or malformed substring.
pub(crate) fn parse_f64(bytes: &[u8], span: Span) -> Option<f64> {
    col(bytes, span).and_then(|s| s.trim().parse().ok())
}

/// Optional magnitude field, scaled to integer millimagnitudes.
pub(crate) fn parse_millimag(bytes: &[u8], span: Span) -> Option<i32> {
    parse_f64(bytes, span).map(|mag| (mag * 1000.0).round() as i32)
}
