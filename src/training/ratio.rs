//! Path-max-of-products reduction for importance ratios.

/// Largest product over any contiguous run of `ratios`.
///
/// The empty run counts with product 1, so the result is at least 1. With
/// non-negative ratios this is the multiplicative analogue of Kadane's
/// maximum-subarray scan: a run is extended while that beats restarting at
/// the current ratio.
pub fn product_path_max(ratios: &[f64]) -> f64 {
    let mut best = 1.0_f64;
    let mut running = 1.0_f64;
    for &ratio in ratios {
        running = (running * ratio).max(ratio);
        best = best.max(running);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_is_one() {
        assert_eq!(product_path_max(&[]), 1.0);
    }

    #[test]
    fn test_all_ones() {
        assert_eq!(product_path_max(&[1.0, 1.0, 1.0]), 1.0);
    }

    #[test]
    fn test_compounding_run() {
        assert!((product_path_max(&[2.0, 3.0]) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_run_broken_by_small_ratio() {
        // 2 * 0.1 * 4 = 0.8 < 4, so the best run restarts at 4.
        assert!((product_path_max(&[2.0, 0.1, 4.0]) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_run_survives_mild_dip() {
        // 3 * 0.5 * 3 = 4.5 beats either side alone.
        assert!((product_path_max(&[3.0, 0.5, 3.0]) - 4.5).abs() < 1e-12);
    }

    #[test]
    fn test_all_below_one() {
        assert_eq!(product_path_max(&[0.5, 0.2]), 1.0);
    }

    proptest! {
        #[test]
        fn prop_at_least_one(ratios in prop::collection::vec(0.0f64..5.0, 0..20)) {
            prop_assert!(product_path_max(&ratios) >= 1.0);
        }

        #[test]
        fn prop_non_decreasing_when_appending(
            ratios in prop::collection::vec(0.0f64..5.0, 0..20),
            extra in prop::collection::vec(0.0f64..5.0, 0..5),
        ) {
            let before = product_path_max(&ratios);
            let mut extended = ratios.clone();
            extended.extend(extra);
            prop_assert!(product_path_max(&extended) >= before);
        }

        #[test]
        fn prop_unchanged_by_neutral_tail(
            ratios in prop::collection::vec(0.0f64..5.0, 0..20),
            tail in 0usize..5,
        ) {
            let before = product_path_max(&ratios);
            let mut extended = ratios.clone();
            extended.extend(std::iter::repeat(1.0).take(tail));
            prop_assert_eq!(product_path_max(&extended), before);
        }

        #[test]
        fn prop_bounds_every_single_ratio(ratios in prop::collection::vec(0.0f64..5.0, 1..20)) {
            let best = product_path_max(&ratios);
            for r in &ratios {
                prop_assert!(best >= *r);
            }
        }
    }
}
