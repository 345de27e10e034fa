//! io — coefficient-table and culture-dictionary readers.
//!
//! Purpose
//! -------
//! Feed the impression engine from the tabular data ACT work is distributed
//! in: Interact-style Z-tables ([`read_ztable`]) and long-form sentiment
//! dictionaries ([`Culture`]). Both readers are generic over
//! `std::io::Read`; `*_path` helpers open files for convenience.
//!
//! Conventions
//! -----------
//! - Failures are reported as [`IoError`]; engine-side validation errors are
//!   wrapped, not re-described.
//! - Parsing emits `tracing` debug events; duplicate dictionary labels emit a
//!   warning.

pub mod culture;
pub mod errors;
pub mod ztable;

pub use self::culture::{Culture, SentimentRecord};
pub use self::errors::{IoError, IoResult};
pub use self::ztable::{Delimiter, read_ztable, read_ztable_path};
