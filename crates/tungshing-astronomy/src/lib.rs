//! Ephemeris provider for tungshing.
//!
//! Supplies the two astronomical facts the almanac depends on: the exact
//! instants of the 24 solar terms and the instants of new moons. Both are
//! exposed through the [`Ephemeris`] trait so an alternate source (a
//! published table, a different theory) can stand in for [`VsopEphemeris`].

pub mod ephemeris;
pub mod error;
pub mod lunar;
pub mod solar;
pub mod table;
pub mod time;

pub use ephemeris::{Ephemeris, VsopEphemeris, EPHEMERIS_MAX_YEAR, EPHEMERIS_MIN_YEAR};
pub use error::EphemerisError;
pub use table::TableEphemeris;
