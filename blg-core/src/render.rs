//! Locale-aware timestamp rendering.
//!
//! Default output: `15 สิงหาคม 2568 เวลา 14:05`

use chrono::{DateTime, Datelike, Locale, TimeZone};
use std::fmt::Display;

pub const DEFAULT_LOCALE: Locale = Locale::th_TH;
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%-d %B %Y %H:%M";
const THAI_TIMESTAMP_FORMAT: &str = "%-d %B %Y เวลา %H:%M";

/// Offset between the Gregorian year and the Thai solar (Buddhist era) year.
const BUDDHIST_ERA_OFFSET: i32 = 543;

#[derive(Debug, Clone)]
pub struct TimestampFormat {
    pub locale: Locale,
    /// A `chrono` strftime pattern.
    pub pattern: String,
}

impl TimestampFormat {
    /// The locale's usual long form; Thai puts `เวลา` before the time.
    pub fn for_locale(locale: Locale) -> Self {
        let pattern = match locale {
            Locale::th_TH => THAI_TIMESTAMP_FORMAT,
            _ => DEFAULT_TIMESTAMP_FORMAT,
        };
        Self {
            locale,
            pattern: pattern.to_string(),
        }
    }
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self::for_locale(DEFAULT_LOCALE)
    }
}

/// Parses a POSIX locale name such as `th_TH` or `en_US`.
pub fn parse_locale(name: &str) -> Option<Locale> {
    Locale::try_from(name.trim()).ok()
}

/// Formats `dt` with the configured pattern and locale month/day names.
/// Thai uses the Buddhist era for `%Y`.
pub fn format_timestamp<Tz>(dt: &DateTime<Tz>, format: &TimestampFormat) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let pattern = match format.locale {
        Locale::th_TH => format
            .pattern
            .replace("%Y", &(dt.year() + BUDDHIST_ERA_OFFSET).to_string()),
        _ => format.pattern.clone(),
    };
    dt.format_localized(&pattern, format.locale).to_string()
}
