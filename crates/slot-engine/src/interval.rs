//! Minute-range algebra within a single day.
//!
//! All ranges are half-open `[start, end)` minute offsets from midnight, bounded
//! by [`DAY_MINUTES`]. The two set operations, [`subtract`] and [`merge`], are
//! pure and deterministic.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Minutes in a UTC day. `24:00` is the only valid rendering of this value.
pub const DAY_MINUTES: u32 = 24 * 60;

/// A half-open `[start, end)` range of minutes since 00:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MinuteRange {
    pub start: u32,
    pub end: u32,
}

impl MinuteRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Length in minutes; zero for empty or inverted ranges.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Half-open overlap test. Touching ranges do not overlap.
    pub fn overlaps(&self, other: &MinuteRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &MinuteRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Remove every cutout from `intervals`.
///
/// Cutouts are applied one at a time. An interval that a cutout overlaps is split
/// into at most two fragments (before the cutout's start, after its end); empty
/// fragments are dropped. The result does not depend on cutout order.
pub fn subtract(intervals: &[MinuteRange], cutouts: &[MinuteRange]) -> Vec<MinuteRange> {
    let mut result: Vec<MinuteRange> = intervals.iter().copied().filter(|r| !r.is_empty()).collect();

    for cut in cutouts.iter().filter(|c| !c.is_empty()) {
        let mut next = Vec::with_capacity(result.len() + 1);
        for it in result {
            if !cut.overlaps(&it) {
                next.push(it);
                continue;
            }
            if cut.start > it.start {
                next.push(MinuteRange::new(it.start, cut.start));
            }
            if cut.end < it.end {
                next.push(MinuteRange::new(cut.end, it.end));
            }
        }
        result = next;
    }

    result.retain(|r| !r.is_empty());
    result
}

/// Coalesce overlapping or touching ranges into a sorted, disjoint list.
pub fn merge(ranges: &[MinuteRange]) -> Vec<MinuteRange> {
    let mut ordered: Vec<MinuteRange> = ranges.iter().copied().filter(|r| !r.is_empty()).collect();
    ordered.sort_by_key(|r| (r.start, r.end));

    let mut merged: Vec<MinuteRange> = Vec::with_capacity(ordered.len());
    for range in ordered {
        if let Some(last) = merged.last_mut() {
            if range.start <= last.end {
                last.end = last.end.max(range.end);
                continue;
            }
        }
        merged.push(range);
    }

    merged
}

/// Parse `HH:MM` into minutes since midnight. `24:00` is accepted as end-of-day.
pub fn parse_hhmm(s: &str) -> Result<u32> {
    let invalid = || ScheduleError::validation(format!("invalid time '{s}', expected HH:MM"));

    let (h, m) = s.split_once(':').ok_or_else(invalid)?;
    let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(h) || !two_digits(m) {
        return Err(invalid());
    }
    let hours: u32 = h.parse().map_err(|_| invalid())?;
    let minutes: u32 = m.parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    let total = hours * 60 + minutes;
    if total > DAY_MINUTES {
        return Err(invalid());
    }
    Ok(total)
}

/// Render minutes since midnight as zero-padded `HH:MM`.
pub fn format_hhmm(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(start: u32, end: u32) -> MinuteRange {
        MinuteRange::new(start, end)
    }

    #[test]
    fn hhmm_roundtrips_boundaries() {
        assert_eq!(parse_hhmm("00:00").unwrap(), 0);
        assert_eq!(parse_hhmm("09:30").unwrap(), 570);
        assert_eq!(parse_hhmm("24:00").unwrap(), DAY_MINUTES);
        assert_eq!(format_hhmm(570), "09:30");
        assert_eq!(format_hhmm(DAY_MINUTES), "24:00");
    }

    #[test]
    fn hhmm_rejects_garbage() {
        for bad in ["9:00", "09:60", "24:01", "25:00", "0900", "ab:cd", "", "+9:00", "09:+5", "-1:00", " 9:00"] {
            assert!(parse_hhmm(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn subtract_splits_in_two() {
        assert_eq!(subtract(&[r(540, 720)], &[r(600, 630)]), vec![r(540, 600), r(630, 720)]);
    }

    #[test]
    fn subtract_ignores_touching_cutout() {
        assert_eq!(subtract(&[r(540, 600)], &[r(600, 660)]), vec![r(540, 600)]);
    }

    #[test]
    fn merge_coalesces_touching() {
        assert_eq!(merge(&[r(600, 630), r(540, 600), r(700, 710)]), vec![r(540, 630), r(700, 710)]);
    }
}
