//! CLI command implementations.
//!
//! - [`generate`] - cut a raster into a tile pyramid
//! - [`init`] - write a default configuration file
//! - [`scheme`] - preview tile counts for a bounding box

pub mod common;
pub mod generate;
pub mod init;
pub mod scheme;
