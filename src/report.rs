//! Percentile report rendering.
//!
//! Produces the fixed-width percentile table written to `{prefix}_{kind}`
//! files for the best run of each operation kind. The renderer only builds
//! the text; writing it anywhere is the caller's problem.

use crate::{HDR_BUCKETS, HDR_SUB_BUCKETS};
use hdrhistogram::Histogram;
use std::fmt::Write;

/// Percentile breakpoints at which the table renders a row, pre-sorted and
/// denser near the tail to resolve high-percentile latency behavior.
pub const PERCENTILE_BREAKPOINTS: [f64; 134] = [
    0.000000, 0.050000, 0.100000, 0.150000, 0.200000, 0.250000,
    0.300000, 0.350000, 0.400000, 0.450000, 0.500000, 0.525000,
    0.550000, 0.575000, 0.600000, 0.625000, 0.650000, 0.675000,
    0.700000, 0.725000, 0.750000, 0.762500, 0.775000, 0.787500,
    0.800000, 0.812500, 0.825000, 0.837500, 0.850000, 0.862500,
    0.875000, 0.881250, 0.887500, 0.893750, 0.900000, 0.906250,
    0.912500, 0.918750, 0.925000, 0.931250, 0.937500, 0.940625,
    0.943750, 0.946875, 0.950000, 0.953125, 0.956250, 0.959375,
    0.962500, 0.965625, 0.968750, 0.970313, 0.971875, 0.973437,
    0.975000, 0.976562, 0.978125, 0.979688, 0.981250, 0.982812,
    0.984375, 0.985156, 0.985938, 0.986719, 0.987500, 0.988281,
    0.989062, 0.989844, 0.990625, 0.991406, 0.992188, 0.992578,
    0.992969, 0.993359, 0.993750, 0.994141, 0.994531, 0.994922,
    0.995313, 0.995703, 0.996094, 0.996289, 0.996484, 0.996680,
    0.996875, 0.997070, 0.997266, 0.997461, 0.997656, 0.997852,
    0.998047, 0.998145, 0.998242, 0.998340, 0.998437, 0.998535,
    0.998633, 0.998730, 0.998828, 0.998926, 0.999023, 0.999072,
    0.999121, 0.999170, 0.999219, 0.999268, 0.999316, 0.999365,
    0.999414, 0.999463, 0.999512, 0.999536, 0.999561, 0.999585,
    0.999609, 0.999634, 0.999658, 0.999683, 0.999707, 0.999731,
    0.999756, 0.999768, 0.999780, 0.999792, 0.999805, 0.999817,
    0.999829, 0.999841, 0.999854, 0.999866, 0.999878, 0.999884,
    0.999890, 1.000000,
];

/// Render the percentile table plus summary footer for one histogram.
/// Latency columns are milliseconds; the histogram records microseconds.
pub fn render(hist: &Histogram<u64>) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:>12} {:>14} {:>10} {:>14}\n",
        "Value", "Percentile", "TotalCount", "1/(1-Percentile)"
    );

    for &q in PERCENTILE_BREAKPOINTS.iter() {
        let value_us = hist.value_at_quantile(q);
        let value_ms = value_us as f64 / 1000.0;
        let count = count_at_or_below(hist, value_us);
        if q < 1.0 {
            let _ = writeln!(
                out,
                "{:>12.3} {:>14.6} {:>10} {:>14.2}",
                value_ms,
                q,
                count,
                1.0 / (1.0 - q)
            );
        } else {
            // 1/(1-p) is undefined at p = 1.0; render a sentinel instead.
            let _ = writeln!(out, "{:>12.3} {:>14.6} {:>10} {:>14}", value_ms, q, count, "∞");
        }
    }

    let _ = writeln!(
        out,
        "#[Mean        = {:>12.3}, StdDeviation   = {:>12.3}]",
        hist.mean() / 1000.0,
        hist.stdev() / 1000.0
    );
    let _ = writeln!(
        out,
        "#[Max         = {:>12.3}, Total count    = {:>12}]",
        hist.max() as f64 / 1000.0,
        hist.len()
    );
    let _ = writeln!(
        out,
        "#[Buckets     = {:>12}, SubBuckets     = {:>12}]",
        HDR_BUCKETS, HDR_SUB_BUCKETS
    );

    out
}

/// Count of recorded samples at or below `value` (in histogram units).
fn count_at_or_below(hist: &Histogram<u64>, value: u64) -> u64 {
    let ceiling = hist.highest_equivalent(value);
    hist.iter_recorded()
        .take_while(|v| v.value_iterated_to() <= ceiling)
        .map(|v| v.count_since_last_iteration())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LATENCY_HDR_MAX_VALUE, LATENCY_HDR_MIN_VALUE, LATENCY_HDR_SIGDIGITS};

    fn histogram_with(values: &[u64]) -> Histogram<u64> {
        let mut hist = Histogram::<u64>::new_with_bounds(
            LATENCY_HDR_MIN_VALUE,
            LATENCY_HDR_MAX_VALUE,
            LATENCY_HDR_SIGDIGITS,
        )
        .unwrap();
        for &v in values {
            hist.saturating_record(v);
        }
        hist
    }

    #[test]
    fn breakpoints_are_sorted_and_span_the_unit_interval() {
        assert_eq!(PERCENTILE_BREAKPOINTS[0], 0.0);
        assert_eq!(PERCENTILE_BREAKPOINTS[PERCENTILE_BREAKPOINTS.len() - 1], 1.0);
        assert!(PERCENTILE_BREAKPOINTS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn report_has_one_row_per_breakpoint() {
        let hist = histogram_with(&[100, 200, 300, 5000]);
        let report = render(&hist);
        // Header + blank line + one row per breakpoint + 3 footer lines.
        assert_eq!(report.lines().count(), 2 + PERCENTILE_BREAKPOINTS.len() + 3);
    }

    #[test]
    fn final_row_renders_infinity_sentinel() {
        let hist = histogram_with(&[100]);
        let report = render(&hist);
        let last_row = report
            .lines()
            .rev()
            .find(|l| l.contains("1.000000"))
            .unwrap();
        assert!(last_row.contains('∞'));
    }

    #[test]
    fn footer_reports_bucket_configuration() {
        let hist = histogram_with(&[100, 200]);
        let report = render(&hist);
        assert!(report.contains("#[Mean"));
        assert!(report.contains("Total count"));
        assert!(report.contains(&format!("{:>12}", HDR_BUCKETS)));
        assert!(report.contains(&format!("{:>12}", HDR_SUB_BUCKETS)));
    }

    #[test]
    fn counts_accumulate_with_percentile() {
        let hist = histogram_with(&[100, 200, 300, 400, 500]);
        assert_eq!(count_at_or_below(&hist, hist.value_at_quantile(1.0)), 5);
        assert_eq!(count_at_or_below(&hist, hist.value_at_quantile(0.0)), 1);
        let mid = count_at_or_below(&hist, hist.value_at_quantile(0.5));
        assert!((1..=5).contains(&mid));
    }

    #[test]
    fn empty_histogram_renders_without_panicking() {
        let hist = histogram_with(&[]);
        let report = render(&hist);
        assert_eq!(report.lines().count(), 2 + PERCENTILE_BREAKPOINTS.len() + 3);
    }
}
