//! Core types shared by the tungshing crates: stems, branches, sexagenary
//! pillars, the 24 solar terms and the caller-facing error type.

pub mod error;
pub mod sexagenary;
pub mod solar_term;

pub use error::TungShingError;
pub use sexagenary::{Branch, Sexagenary, Stem};
pub use solar_term::{Script, SolarTerm, TermInstant, TermKind};
