//! Federal poverty level (FPL) guideline lookup.
//!
//! # Invariants
//! - Lookups are pinned to `REFERENCE_YEAR` regardless of the current year.
//! - Index 0 of the table holds the per-additional-member increment; indices
//!   1..=8 hold the guideline for that household size.
//! - Sizes above 8 extrapolate as `size * table[0]`.
//! - The percentage is the raw ratio `income / threshold`, not scaled by 100.

/// Year whose guidelines back every lookup.
pub const REFERENCE_YEAR: i32 = 2017;

/// Largest household size with an explicit table entry.
pub const MAX_TABULATED_SIZE: usize = 8;

/// 2017 HHS poverty guidelines (48 contiguous states), indexed by size.
const FPL_2017: [f64; MAX_TABULATED_SIZE + 1] = [
    4180.0, 12060.0, 16240.0, 20420.0, 24600.0, 28780.0, 32960.0, 37140.0, 41320.0,
];

/// Poverty income threshold for a household of `household_size` members.
pub fn poverty_threshold(household_size: usize) -> f64 {
    if household_size <= MAX_TABULATED_SIZE {
        FPL_2017[household_size]
    } else {
        // Literal linear extrapolation, not base + increment.
        household_size as f64 * FPL_2017[0]
    }
}

/// Ratio of `income` to the poverty threshold for `household_size`.
pub fn fpl_percentage(income: f64, household_size: usize) -> f64 {
    income / poverty_threshold(household_size)
}

#[cfg(test)]
mod tests {
    use super::{fpl_percentage, poverty_threshold, FPL_2017};

    #[test]
    fn tabulated_sizes_use_table_entries() {
        assert_eq!(poverty_threshold(1), 12060.0);
        assert_eq!(poverty_threshold(4), 24600.0);
        assert_eq!(poverty_threshold(8), 41320.0);
    }

    #[test]
    fn large_households_extrapolate_from_increment() {
        assert_eq!(poverty_threshold(9), 9.0 * FPL_2017[0]);
        assert_eq!(poverty_threshold(12), 12.0 * 4180.0);
    }

    #[test]
    fn percentage_is_raw_ratio() {
        assert_eq!(fpl_percentage(900000.0, 1), 900000.0 / 12060.0);
        assert_eq!(fpl_percentage(0.0, 3), 0.0);
        assert_eq!(fpl_percentage(12060.0, 1), 1.0);
    }
}
