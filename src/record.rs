//! Catalog data model.

/// One UCAC4 star, decoded from either source encoding.
///
/// Magnitudes are stored as integer millimagnitudes on both paths: the binary
/// format carries them that way natively, and the ASCII decoder scales its
/// floating-point magnitudes ×1000 so the two encodings share one table
/// layout with one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct StarRecord {
    /// Declination zone the star belongs to (1-based). The ASCII dump does
    /// not carry the zone, so that path fixes it at 1.
    pub zone: i32,
    /// MPOS number: the catalog's unique star identification number.
    /// Primary key within a zone table, on both paths.
    pub mpos1: i64,
    /// 10-character UCAC4 identifier. Decoded on the ASCII path only;
    /// informational, not persisted.
    pub ucac4_id: Option<String>,
    /// UCAC2 cross-match, `zzz-rrrrrr` zero-padded. `None` when the source
    /// carries the no-match sentinel `000-000000`.
    pub ucac2: Option<String>,
    /// Object type, 0–9:
    ///
    /// - 0 — good, clean star, no known problem
    /// - 1 — largest flag of any image: near overexposed star
    /// - 2 — largest flag of any image: possible streak object
    /// - 3 — high proper motion star, matched with external PM file
    /// - 4 — external HPM data used instead of UCAC4 observations
    /// - 5 — poor proper motion solution, CCD epoch position only
    /// - 6 — poor astrometry substituted by FK6/Hip/Tycho-2 data
    /// - 7 — supplement star (no CCD data) from FK6/Hip/Tycho-2
    /// - 8 — HPM solution in UCAC4, not matched with PPMXL
    /// - 9 — HPM solution in UCAC4, discrepant PM to PPMXL
    pub ot: u8,
    /// Right ascension at epoch J2000.0 (ICRS), degrees.
    pub ra: f64,
    /// Declination at epoch J2000.0 (ICRS), degrees. Derived from the
    /// catalog's south-pole distance.
    pub dec: f64,
    /// 2MASS J magnitude, millimag.
    pub j_mag: Option<i32>,
    /// 2MASS H magnitude, millimag.
    pub h_mag: Option<i32>,
    /// 2MASS K_s magnitude, millimag.
    pub k_mag: Option<i32>,
    /// APASS B magnitude, millimag.
    pub b_mag: Option<i32>,
    /// APASS V magnitude, millimag.
    pub v_mag: Option<i32>,
    /// APASS g magnitude, millimag.
    pub g_mag: Option<i32>,
    /// APASS r magnitude, millimag.
    pub r_mag: Option<i32>,
    /// APASS i magnitude, millimag.
    pub i_mag: Option<i32>,
}

/// Per-zone aggregate from the catalog's `zone_stats` index file.
///
/// Independent of [`StarRecord`]; loaded into its own `zones` table with
/// `zone` as primary key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneStat {
    /// Zone number (1-based declination band).
    pub zone: i32,
    /// Number of stars in this zone.
    pub star_count: i64,
    /// Accumulated star count over this and all previous zones.
    pub cumulative: i64,
    /// Largest declination of the zone, degrees.
    pub max_dec: f64,
}
