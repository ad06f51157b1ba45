//! Readers for the comma-delimited text files behind the bathymetry map.
//!
//! All three inputs share one layout:
//! - lines starting with `*` are comments and are skipped untouched
//! - every other non-blank line is one record of comma-separated fields
//!
//! What a record holds is described by the [`Record`] trait; this crate
//! implements it for bathymetry samples, coastline vertices and landmarks.

pub mod reader;
pub mod records;

pub use reader::{is_comment, parse_records, read_records, COMMENT_MARKER, FIELD_DELIMITER};
pub use records::Record;
