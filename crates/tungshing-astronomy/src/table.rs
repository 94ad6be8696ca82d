use chrono::{DateTime, Utc};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use tungshing_types::{SolarTerm, TermInstant};

use crate::ephemeris::Ephemeris;
use crate::error::EphemerisError;

/// Ephemeris backed by fixed, externally supplied instants.
///
/// Stands in for a published almanac table, or pins boundary instants
/// exactly in tests. Looking up a term not in the table gives
/// [`EphemerisError::MissingEntry`].
#[derive(Debug, Clone, Default)]
pub struct TableEphemeris {
    years: Option<RangeInclusive<i32>>,
    terms: HashMap<(i32, SolarTerm), TermInstant>,
    new_moons: Vec<DateTime<Utc>>,
}

impl TableEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_terms(terms: impl IntoIterator<Item = TermInstant>) -> Self {
        terms.into_iter().fold(Self::new(), Self::with_term)
    }

    /// Adds a term instant, truncated to whole seconds.
    pub fn with_term(mut self, instant: TermInstant) -> Self {
        let at = DateTime::from_timestamp(instant.at.timestamp(), 0).unwrap_or(instant.at);
        let instant = TermInstant::new(instant.year, instant.term, at);
        self.years = Some(match self.years.take() {
            Some(r) => (*r.start()).min(instant.year)..=(*r.end()).max(instant.year),
            None => instant.year..=instant.year,
        });
        self.terms.insert((instant.year, instant.term), instant);
        self
    }

    pub fn with_new_moon(mut self, at: DateTime<Utc>) -> Self {
        let idx = self.new_moons.partition_point(|m| *m < at);
        if self.new_moons.get(idx) != Some(&at) {
            self.new_moons.insert(idx, at);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Ephemeris for TableEphemeris {
    fn valid_years(&self) -> RangeInclusive<i32> {
        self.years.clone().unwrap_or(0..=-1)
    }

    fn term_instant(&self, year: i32, term: SolarTerm) -> Result<TermInstant, EphemerisError> {
        self.terms
            .get(&(year, term))
            .copied()
            .ok_or_else(|| EphemerisError::MissingEntry {
                year,
                term: term.to_string(),
            })
    }

    /// Only the terms present in the table; gaps are not errors here.
    fn terms_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SmallVec<[TermInstant; 4]>, EphemerisError> {
        let mut found: SmallVec<[TermInstant; 4]> = self
            .terms
            .values()
            .filter(|t| start <= t.at && t.at < end)
            .copied()
            .collect();
        found.sort_by_key(|t| t.at);
        Ok(found)
    }

    fn new_moons_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, EphemerisError> {
        let lo = self.new_moons.partition_point(|m| *m < start);
        let hi = self.new_moons.partition_point(|m| *m < end);
        Ok(self.new_moons[lo..hi.max(lo)].to_vec())
    }
}
