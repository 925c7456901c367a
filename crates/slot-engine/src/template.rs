//! Weekly opening-hours templates.
//!
//! A template is a fixed seven-entry table keyed by weekday. Each entry is a sorted
//! list of disjoint minute ranges. Validation happens once, when the template is
//! built or deserialised, so readers can trust the ranges as-is.
//!
//! The serialised form is the provider-facing JSON shape:
//!
//! ```json
//! {"mon": [["09:00", "12:00"], ["14:00", "18:00"]], "tue": []}
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::interval::{format_hhmm, parse_hhmm, MinuteRange};

/// Canonical weekday tags, Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Weekday::Sun => "sun",
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Weekday::ALL[day.num_days_from_sunday() as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Serialised shape: weekday tag → list of `[start, end]` `HH:MM` pairs.
type RawTemplate = BTreeMap<Weekday, Vec<(String, String)>>;

/// A provider's validated weekly template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTemplate", into = "RawTemplate")]
pub struct WeeklyTemplate {
    days: [Vec<MinuteRange>; 7],
}

impl WeeklyTemplate {
    /// An empty template (closed every day).
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the ranges for one weekday.
    ///
    /// Ranges are sorted by start. Every range must satisfy `start < end` and no two
    /// ranges may overlap; touching ranges are allowed.
    pub fn set_day(&mut self, day: Weekday, ranges: Vec<MinuteRange>) -> Result<()> {
        let mut ranges = ranges;
        ranges.sort_by_key(|r| (r.start, r.end));

        for range in &ranges {
            if range.is_empty() {
                return Err(ScheduleError::validation(format!(
                    "template {day}: range {}-{} must start before it ends",
                    format_hhmm(range.start),
                    format_hhmm(range.end)
                )));
            }
        }
        for pair in ranges.windows(2) {
            if pair[0].overlaps(&pair[1]) {
                return Err(ScheduleError::validation(format!(
                    "template {day}: ranges {}-{} and {}-{} overlap",
                    format_hhmm(pair[0].start),
                    format_hhmm(pair[0].end),
                    format_hhmm(pair[1].start),
                    format_hhmm(pair[1].end)
                )));
            }
        }

        self.days[day.index()] = ranges;
        Ok(())
    }

    /// Builder-style [`set_day`](Self::set_day) taking `HH:MM` pairs.
    pub fn with_day(mut self, day: Weekday, ranges: &[(&str, &str)]) -> Result<Self> {
        let parsed = ranges
            .iter()
            .map(|(start, end)| Ok(MinuteRange::new(parse_hhmm(start)?, parse_hhmm(end)?)))
            .collect::<Result<Vec<_>>>()?;
        self.set_day(day, parsed)?;
        Ok(self)
    }

    /// The open ranges for `day`; empty when the provider does not work that day.
    pub fn day(&self, day: Weekday) -> &[MinuteRange] {
        &self.days[day.index()]
    }
}

impl TryFrom<RawTemplate> for WeeklyTemplate {
    type Error = ScheduleError;

    fn try_from(raw: RawTemplate) -> Result<Self> {
        let mut template = WeeklyTemplate::new();
        for (day, pairs) in raw {
            let refs: Vec<(&str, &str)> = pairs.iter().map(|(s, e)| (s.as_str(), e.as_str())).collect();
            template = template.with_day(day, &refs)?;
        }
        Ok(template)
    }
}

impl From<WeeklyTemplate> for RawTemplate {
    fn from(template: WeeklyTemplate) -> Self {
        Weekday::ALL
            .iter()
            .filter(|day| !template.day(**day).is_empty())
            .map(|day| {
                let pairs = template
                    .day(*day)
                    .iter()
                    .map(|r| (format_hhmm(r.start), format_hhmm(r.end)))
                    .collect();
                (*day, pairs)
            })
            .collect()
    }
}
