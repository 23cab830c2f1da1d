//! Raw bar discovery and normalization.
//!
//! The pipeline sees the outside world through two seams defined here:
//! - [`store::ObjectStore`]: list and open raw objects (a local filesystem layout ships
//!   with the crate as [`store::local::LocalFsStore`]).
//! - [`reader::read_raw_bars`]: turn the bytes of one `<SYMBOL>_raw.csv` object into a
//!   sorted, de-duplicated [`models::bar::RawBar`] series.

pub mod errors;
pub mod models;
pub mod reader;
pub mod store;
pub mod symbol;
pub mod tz;

pub use errors::SourceError;
pub use models::bar::RawBar;
