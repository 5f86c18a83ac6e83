//! UCAC4 star catalog converter.
//!
//! Loads the UCAC4 catalog — distributed as fixed-column ASCII zone files and
//! as binary zone files of fixed 78-byte records — into a relational store,
//! one zone file per target table. Sources and targets are addressed as
//! `format:location` pairs and resolved once at startup; records are decoded
//! and inserted one at a time with no in-memory accumulation.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`decode`] | Record decoders for the ASCII, binary and zone-stats encodings |
//! | [`schema`] | Table naming, DDL templates, zone-number derivation |
//! | [`sink`] | [`Sink`](sink::Sink): the SQLite and PostgreSQL storage backends |
//! | [`convert`] | [`Converter`](convert::Converter): endpoint parsing and the record loop |
//! | [`record`] | [`StarRecord`] and [`ZoneStat`] data model |
//!
//! # Quick Start
//!
//! ```ignore
//! use ucac4_convert::convert::{Converter, Source, Target};
//!
//! let converter = Converter::new(
//!     Source::parse("binary:data/z001")?,
//!     Target::parse("sqlite:data/z001.sqlite3")?,
//! );
//! let report = converter.convert()?;
//! println!("imported {} records", report.processed);
//! ```

pub mod convert;
pub mod decode;
pub mod error;
pub mod record;
pub mod schema;
pub mod sink;

pub use error::{ConvertError, Result};
pub use record::{StarRecord, ZoneStat};
