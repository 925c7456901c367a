//! Property-based tests for the interval algebra, availability and slots.
//!
//! These check invariants that must hold for any template and any occupancy,
//! not just the hand-picked cases in the other test files.

use proptest::prelude::*;
use slot_engine::interval::DAY_MINUTES;
use slot_engine::{free_intervals, generate_slots, merge, subtract, MinuteRange};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Any non-empty range inside the day.
fn arb_range() -> impl Strategy<Value = MinuteRange> {
    (0u32..DAY_MINUTES, 1u32..=240).prop_map(|(start, len)| MinuteRange::new(start, (start + len).min(DAY_MINUTES)))
}

fn arb_ranges(max: usize) -> impl Strategy<Value = Vec<MinuteRange>> {
    prop::collection::vec(arb_range(), 0..max)
}

/// A valid template day: merged (so disjoint and sorted) ranges.
fn arb_template_day() -> impl Strategy<Value = Vec<MinuteRange>> {
    arb_ranges(6).prop_map(|ranges| merge(&ranges))
}

fn arb_duration() -> impl Strategy<Value = u32> {
    prop_oneof![Just(15u32), Just(30), Just(45), Just(60), 1u32..=180]
}

fn arb_step() -> impl Strategy<Value = u32> {
    prop_oneof![Just(15u32), 1u32..=60]
}

fn assert_disjoint_sorted(ranges: &[MinuteRange]) -> Result<(), TestCaseError> {
    for r in ranges {
        prop_assert!(r.start < r.end, "empty range {:?}", r);
    }
    for pair in ranges.windows(2) {
        prop_assert!(pair[0].end <= pair[1].start, "{:?} overlaps or precedes {:?}", pair[0], pair[1]);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    /// Free intervals are sorted ascending and pairwise non-overlapping.
    #[test]
    fn free_intervals_are_disjoint_and_sorted(template in arb_template_day(), occupied in arb_ranges(12)) {
        let free = free_intervals(&template, &occupied);
        assert_disjoint_sorted(&free)?;
    }

    /// Free time never overlaps occupancy and never leaves the template.
    #[test]
    fn free_intervals_avoid_occupancy(template in arb_template_day(), occupied in arb_ranges(12)) {
        let free = free_intervals(&template, &occupied);
        for f in &free {
            prop_assert!(occupied.iter().all(|o| !o.overlaps(f)), "{:?} overlaps occupancy", f);
            prop_assert!(template.iter().any(|t| t.contains(f)), "{:?} escapes the template", f);
        }
    }

    /// Re-applying the same cutouts changes nothing.
    #[test]
    fn subtract_is_idempotent(template in arb_template_day(), cutouts in arb_ranges(12)) {
        let once = subtract(&template, &cutouts);
        let twice = subtract(&once, &cutouts);
        prop_assert_eq!(once, twice);
    }

    /// Cutout order does not matter once the result is sorted.
    #[test]
    fn subtract_ignores_cutout_order(template in arb_template_day(), cutouts in arb_ranges(8)) {
        let mut forward = subtract(&template, &cutouts);
        let reversed: Vec<MinuteRange> = cutouts.iter().rev().copied().collect();
        let mut backward = subtract(&template, &reversed);
        forward.sort();
        backward.sort();
        prop_assert_eq!(forward, backward);
    }

    /// Merging is idempotent and yields disjoint, sorted ranges.
    #[test]
    fn merge_is_idempotent(ranges in arb_ranges(16)) {
        let merged = merge(&ranges);
        assert_disjoint_sorted(&merged)?;
        prop_assert_eq!(merge(&merged), merged);
    }

    /// Each slot lies inside one free interval and has exactly the service length.
    #[test]
    fn slots_fit_free_time_exactly(
        template in arb_template_day(),
        occupied in arb_ranges(8),
        duration in arb_duration(),
        step in arb_step(),
    ) {
        let free = free_intervals(&template, &occupied);
        for slot in generate_slots(&free, duration, step) {
            prop_assert_eq!(slot.len(), duration);
            prop_assert!(free.iter().any(|f| f.contains(&slot)), "{:?} is not inside free time", slot);
        }
    }

    /// An empty template yields no free time and no slots, whatever is occupied.
    #[test]
    fn empty_template_is_empty(occupied in arb_ranges(8), duration in arb_duration()) {
        let free = free_intervals(&[], &occupied);
        prop_assert!(free.is_empty());
        prop_assert!(generate_slots(&free, duration, 15).is_empty());
    }
}
