//! Strict boundary rules for the sexagenary pillars.
//!
//! - the year pillar turns at the exact instant of Lichun;
//! - the month pillar turns at the exact instant of each Jie term and never
//!   at a Zhongqi;
//! - the day pillar turns at 23:00 rule-timezone clock time (late Zi hour).
//!
//! An instant equal to a boundary belongs to the new period.

pub mod error;
pub mod resolver;

pub use error::ResolveError;
pub use resolver::{resolve, term_on_day, Boundaries, LATE_ZI_HOUR};
