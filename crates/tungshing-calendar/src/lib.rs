//! Legacy calendar provider for tungshing.
//!
//! [`LunisolarCalendar`] is a conventional Chinese lunisolar calendar with
//! its own looser, date-granular pillar conventions. The almanac forwards
//! its fields through the [`LegacyCalendar`] trait, so another engine can
//! be substituted without touching the boundary rules.

pub mod error;
pub mod fmt;
pub mod legacy;
pub mod lunisolar;

pub use error::{CalendarError, LUNISOLAR_MAX_YEAR, LUNISOLAR_MIN_YEAR};
pub use legacy::{LegacyCalendar, LegacyDay, LunisolarOptions, YearPillarMode};
pub use lunisolar::{LunarDate, LunarMonth, LunisolarCalendar, Sui};
