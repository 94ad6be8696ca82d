//! # TungShing
//!
//! A strict-rule Chinese almanac (通勝). Sexagenary pillars change at their
//! astronomical boundaries instead of at civil or lunar dates:
//!
//! - year pillar at the exact instant of Lichun (立春);
//! - month pillar at the exact instant of each Jie (节) term;
//! - day pillar at 23:00 rule-timezone clock time (late Zi hour, 夜子时).
//!
//! Lunar fields come from a conventional lunisolar calendar read at the
//! resolved date, so during the late Zi hour the lunar day rolls forward
//! together with the day pillar.
//!
//! This crate is a facade that re-exports the `tungshing` ecosystem.
//!
//! ## Crates
//!
//! - `tungshing-types`: stems, branches, pillars, solar terms, errors
//! - `tungshing-astronomy`: VSOP87 solar terms and new moons
//! - `tungshing-calendar`: legacy lunisolar calendar
//! - `tungshing-rules`: boundary resolver
//! - `tungshing-core`: query context and snapshot
//!
//! ## Usage
//!
//! ```rust
//! use tungshing::prelude::*;
//!
//! let moment = tungshing::parse_moment("2025-02-03T23:05:00+08:00")?;
//! let t = Almanac::shared().query(Some(moment), &QueryContext::default())?;
//!
//! assert_eq!("乙巳", t.year8_char().to_string());
//! assert_eq!("甲辰", t.day8_char().to_string());
//! assert!(t.is_late_zi_hour());
//! # Ok::<(), TungShingError>(())
//! ```

pub use tungshing_core::*;
