//! models — evaluated ACT events and element optimization.
//!
//! Purpose
//! -------
//! Sit on top of `impression::core`: [`Event`] wires fundamentals, an
//! interaction pattern, and the weight apparatus into one deflection value,
//! and [`optimize`] solves for the deflection-minimizing EPA triple of one
//! element.
//!
//! Downstream usage
//! ----------------
//! - Build an [`EventOptions`](crate::impression::EventOptions), construct an
//!   [`Event`], read `deflection()`, then call [`optimize`] for the element of
//!   interest.

pub mod event;
pub mod optimize;

pub use self::event::Event;
pub use self::optimize::{OptimalElement, SINGULAR_EPS, optimize};

pub mod prelude {
    pub use super::event::Event;
    pub use super::optimize::{OptimalElement, optimize};
}
