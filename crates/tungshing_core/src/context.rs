//! Query configuration.

use chrono_tz::Tz;
use tungshing_calendar::LunisolarOptions;
use tungshing_types::TungShingError;

/// Timezone both roles default to.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Shanghai;

/// Shorthand names accepted in place of an IANA identifier, matched after
/// lowercasing and mapping `-` and spaces to `_`.
const TIMEZONE_ALIASES: &[(&str, Tz)] = &[
    ("beijing", chrono_tz::Asia::Shanghai),
    ("hong_kong", chrono_tz::Asia::Hong_Kong),
    ("taipei", chrono_tz::Asia::Taipei),
    ("utc", chrono_tz::UTC),
    ("gmt", chrono_tz::GMT),
    ("est", chrono_tz::US::Eastern),
    ("pst", chrono_tz::US::Pacific),
    ("jst", chrono_tz::Asia::Tokyo),
    ("kst", chrono_tz::Asia::Seoul),
];

/// Common misspellings, matched as substrings of the lowercased input.
const TIMEZONE_CORRECTIONS: &[(&str, &str)] = &[
    ("gmt+8", "Asia/Shanghai"),
    ("utc+8", "Asia/Shanghai"),
    ("cst", "Asia/Shanghai"),
    ("china", "Asia/Shanghai"),
    ("beijing", "Asia/Shanghai"),
    ("shanghai", "Asia/Shanghai"),
    ("hongkong", "Asia/Hong_Kong"),
    ("hong_kong", "Asia/Hong_Kong"),
    ("taiwan", "Asia/Taipei"),
    ("taipei", "Asia/Taipei"),
    ("tokyo", "Asia/Tokyo"),
    ("seoul", "Asia/Seoul"),
];

/// Parses an IANA timezone identifier or one of the shorthand aliases
/// (`beijing`, `utc`, `jst`, ...).
///
/// Unknown names fail with [`TungShingError::InvalidTimezone`] carrying
/// correction hints from [`suggest_timezone_fix`].
pub fn parse_timezone(name: &str) -> Result<Tz, TungShingError> {
    let trimmed = name.trim();
    if let Ok(tz) = trimmed.parse::<Tz>() {
        return Ok(tz);
    }

    let key = trimmed.to_lowercase().replace(['-', ' '], "_");
    TIMEZONE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|&(_, tz)| tz)
        .ok_or_else(|| TungShingError::invalid_timezone_with_suggestions(name, suggest_timezone_fix(trimmed)))
}

/// Correction hints for a timezone name that failed to parse.
pub fn suggest_timezone_fix(name: &str) -> Vec<String> {
    let lower = name.to_lowercase();
    let mut suggestions: Vec<String> = Vec::new();
    for (mistake, correction) in TIMEZONE_CORRECTIONS {
        let hint = format!("Did you mean '{}'?", correction);
        if lower.contains(mistake) && !suggestions.contains(&hint) {
            suggestions.push(hint);
        }
    }

    if suggestions.is_empty() {
        suggestions.push("Use IANA timezone database names like 'Asia/Shanghai'".to_string());
        suggestions.push("Common timezones: UTC, Asia/Shanghai, Asia/Hong_Kong, America/New_York".to_string());
    }
    suggestions
}

/// Almanac query configuration.
///
/// `rule_tz` decides every boundary (the 23:00 day change in particular);
/// `display_tz` only interprets naive inputs and renders output. `options`
/// are handed to the legacy calendar untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryContext<O = LunisolarOptions> {
    pub display_tz: Tz,
    pub rule_tz: Tz,
    pub options: O,
}

impl<O: Default> Default for QueryContext<O> {
    fn default() -> Self {
        Self {
            display_tz: DEFAULT_TIMEZONE,
            rule_tz: DEFAULT_TIMEZONE,
            options: O::default(),
        }
    }
}

impl<O: Default> QueryContext<O> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<O> QueryContext<O> {
    pub fn display_tz(mut self, tz: Tz) -> Self {
        self.display_tz = tz;
        self
    }

    pub fn rule_tz(mut self, tz: Tz) -> Self {
        self.rule_tz = tz;
        self
    }

    pub fn options(mut self, options: O) -> Self {
        self.options = options;
        self
    }
}

/// Builder with validation for [`QueryContext`], taking timezone names.
#[derive(Debug, Clone)]
pub struct QueryContextBuilder<O = LunisolarOptions> {
    display_tz: Option<String>,
    rule_tz: Option<String>,
    options: Option<O>,
}

impl<O> Default for QueryContextBuilder<O> {
    fn default() -> Self {
        Self {
            display_tz: None,
            rule_tz: None,
            options: None,
        }
    }
}

impl<O: Default> QueryContextBuilder<O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_tz(mut self, name: impl Into<String>) -> Self { self.display_tz = Some(name.into()); self }
    pub fn rule_tz(mut self, name: impl Into<String>) -> Self { self.rule_tz = Some(name.into()); self }
    pub fn options(mut self, options: O) -> Self { self.options = Some(options); self }

    /// Builds and validates. Unset timezones default to Asia/Shanghai.
    pub fn build(self) -> Result<QueryContext<O>, TungShingError> {
        let display_tz = match self.display_tz.as_deref() {
            Some(name) => parse_timezone(name)?,
            None => DEFAULT_TIMEZONE,
        };
        let rule_tz = match self.rule_tz.as_deref() {
            Some(name) => parse_timezone(name)?,
            None => DEFAULT_TIMEZONE,
        };

        Ok(QueryContext {
            display_tz,
            rule_tz,
            options: self.options.unwrap_or_default(),
        })
    }
}
