//! Rolling Median/MAD Outlier Detection
//!
//! ## Algorithm
//!
//! Each point of a time-ordered series is judged against a window of
//! the previous `window` accepted non-null values - never against
//! itself:
//!
//! 1. While the window is still priming (`len < window`), the point is
//!    never flagged; its value joins the window.
//! 2. Once full: `med = median(window)`, `mad = median(|v - med|)`,
//!    and the point is an outlier iff it lies strictly outside
//!    `med ± 3 * mad`. Ties at the boundary are not outliers.
//! 3. With `replace` set, a flagged point's value is overwritten with
//!    the arithmetic mean of the window (which does not include the
//!    flagged value).
//! 4. The *original* value is then pushed into the window, evicting
//!    the oldest - so an outlier still shifts the window, and a run of
//!    genuinely shifted readings stops being flagged once the window
//!    catches up.
//!
//! Null points pass through untouched: not evaluated, not pushed.
//!
//! Median and MAD make the window robust - a single wild value barely
//! moves either statistic, where it would drag a mean/stddev window
//! toward itself and mask the very spike being hunted.
//!
//! ## Numeric semantics
//!
//! The median of an even-length window is the mean of the two middle
//! elements. The MAD multiplier is a fixed design constant, pinned by
//! tests, not a tuning knob.

use alloc::vec::Vec;

use crate::buffer::SampleWindow;
use crate::measurement::SeriesPoint;

/// Width of the acceptance band in MADs around the window median
pub const MAD_MULTIPLIER: f64 = 3.0;

/// Flag (and optionally replace) anomalous values in a series
///
/// The series must be time-ordered; every non-null point gets its
/// `outlier` flag set or cleared. With `replace`, flagged values are
/// overwritten by the window mean.
///
/// Panics if `window` is zero (caller contract).
pub fn detect_outliers(series: &mut [SeriesPoint], window: usize, replace: bool) {
    assert!(window > 0, "outlier window must be positive");

    let mut accepted = SampleWindow::new(window);
    // Scratch for median sorting, reused across points
    let mut scratch: Vec<f64> = Vec::with_capacity(window);

    for point in series.iter_mut() {
        let Some(original) = point.value else {
            continue;
        };

        if accepted.is_full() {
            let med = median_of(accepted.iter(), &mut scratch);
            let mad = median_of(accepted.iter().map(|v| libm::fabs(v - med)), &mut scratch);
            let max = med + MAD_MULTIPLIER * mad;
            let min = med - MAD_MULTIPLIER * mad;

            point.outlier = original > max || original < min;
            if point.outlier && replace {
                point.value = Some(accepted.mean());
            }
        } else {
            point.outlier = false;
        }

        accepted.push(original);
    }
}

/// Median of an iterator of samples, using `scratch` for sorting
///
/// Even-length input yields the mean of the two middle elements.
/// Returns 0.0 for empty input; callers always pass a full window.
fn median_of(values: impl Iterator<Item = f64>, scratch: &mut Vec<f64>) -> f64 {
    scratch.clear();
    scratch.extend(values);
    if scratch.is_empty() {
        return 0.0;
    }

    scratch.sort_unstable_by(f64::total_cmp);

    let mid = scratch.len() / 2;
    if scratch.len() % 2 == 1 {
        scratch[mid]
    } else {
        (scratch[mid - 1] + scratch[mid]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn series(values: &[f64]) -> Vec<SeriesPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| SeriesPoint::new(i as i64 * 1000, v))
            .collect()
    }

    #[test]
    fn spike_flagged_and_replaced_after_priming() {
        let mut points = series(&[10.0, 10.0, 10.0, 10.0, 10.0, 100.0, 10.0]);
        detect_outliers(&mut points, 3, true);

        // Window never full for the first three points
        assert!(points[..3].iter().all(|p| !p.outlier));
        assert!(!points[3].outlier);
        assert!(!points[4].outlier);

        // The spike is flagged and overwritten with mean([10, 10, 10])
        assert!(points[5].outlier);
        assert_eq!(points[5].value, Some(10.0));

        // The trailing normal value is judged against a window that
        // absorbed the original spike, median still 10
        assert!(!points[6].outlier);
    }

    #[test]
    fn spike_kept_when_replace_off() {
        let mut points = series(&[10.0, 10.0, 10.0, 100.0]);
        detect_outliers(&mut points, 3, false);

        assert!(points[3].outlier);
        assert_eq!(points[3].value, Some(100.0));
    }

    #[test]
    fn boundary_tie_is_not_an_outlier() {
        // Window [10, 12, 14]: med = 12, mad = 2, max = 18
        let mut points = series(&[10.0, 12.0, 14.0, 18.0]);
        detect_outliers(&mut points, 3, false);
        assert!(!points[3].outlier);

        // Just past the boundary is
        let mut points = series(&[10.0, 12.0, 14.0, 18.001]);
        detect_outliers(&mut points, 3, false);
        assert!(points[3].outlier);
    }

    #[test]
    fn lower_bound_is_symmetric() {
        // Window [10, 12, 14]: min = 12 - 6 = 6
        let mut points = series(&[10.0, 12.0, 14.0, 6.0]);
        detect_outliers(&mut points, 3, false);
        assert!(!points[3].outlier);

        let mut points = series(&[10.0, 12.0, 14.0, 5.999]);
        detect_outliers(&mut points, 3, false);
        assert!(points[3].outlier);
    }

    #[test]
    fn nulls_pass_through_and_skip_window() {
        let mut points = alloc::vec![
            SeriesPoint::new(0, 10.0),
            SeriesPoint::null(1000),
            SeriesPoint::new(2000, 10.0),
            SeriesPoint::null(3000),
            SeriesPoint::new(4000, 10.0),
            SeriesPoint::new(5000, 100.0),
        ];
        detect_outliers(&mut points, 3, false);

        // Nulls untouched
        assert_eq!(points[1].value, None);
        assert!(!points[1].outlier);

        // Window primed by the three non-null 10s, so the spike is
        // evaluated and flagged
        assert!(points[5].outlier);
    }

    #[test]
    fn even_window_median_averages_middles() {
        // Window [10, 10, 20, 20]: med = 15, mad = median(5,5,5,5) = 5,
        // bounds [0, 30]
        let mut points = series(&[10.0, 10.0, 20.0, 20.0, 30.0]);
        detect_outliers(&mut points, 4, false);
        assert!(!points[4].outlier);

        let mut points = series(&[10.0, 10.0, 20.0, 20.0, 30.001]);
        detect_outliers(&mut points, 4, false);
        assert!(points[4].outlier);
    }

    #[test]
    fn flag_cleared_on_rerun() {
        let mut points = series(&[10.0, 10.0, 10.0, 100.0]);
        detect_outliers(&mut points, 3, false);
        assert!(points[3].outlier);

        // Re-running over a wider window clears stale flags
        detect_outliers(&mut points, 5, false);
        assert!(!points[3].outlier);
    }

    #[test]
    fn mad_multiplier_pinned() {
        assert_eq!(MAD_MULTIPLIER, 3.0);
    }

    #[test]
    #[should_panic(expected = "window must be positive")]
    fn zero_window_panics() {
        detect_outliers(&mut [], 0, false);
    }

    #[test]
    fn empty_series_is_fine() {
        detect_outliers(&mut [], 3, true);
    }
}
