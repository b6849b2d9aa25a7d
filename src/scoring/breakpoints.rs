//! Piecewise-linear breakpoint tables mapping a raw metric value onto a
//! 1-10 sub-score.
//!
//! Each table is an ordered list of `(raw, score)` points. Values between
//! two points are linearly interpolated; values outside the table's domain
//! clamp to the nearest endpoint's score rather than extrapolating, so a
//! pathological raw value (a 400-line function, say) never produces a
//! score outside `[1, 10]`.

use crate::core::Direction;
use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct Breakpoint {
    pub raw: f64,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct BreakpointTable {
    pub direction: Direction,
    /// Ordered by `raw` ascending, strictly monotonic.
    points: Vec<Breakpoint>,
}

impl BreakpointTable {
    /// Build a table from ascending `(raw, score)` pairs.
    ///
    /// Panics on an empty or non-monotonic table — these are fixed,
    /// hand-authored constants below, not user input.
    fn new(direction: Direction, pairs: &[(f64, f64)]) -> Self {
        assert!(!pairs.is_empty(), "breakpoint table must not be empty");
        let points: Vec<Breakpoint> = pairs.iter().map(|&(raw, score)| Breakpoint { raw, score }).collect();
        for window in points.windows(2) {
            assert!(
                window[1].raw > window[0].raw,
                "breakpoint table raw values must be strictly increasing"
            );
        }
        Self { direction, points }
    }

    /// Interpolate `raw` to a score in `[1.0, 10.0]`.
    pub fn interpolate(&self, raw: f64) -> f64 {
        let first = self.points[0];
        let last = *self.points.last().unwrap();

        if raw <= first.raw {
            return first.score;
        }
        if raw >= last.raw {
            return last.score;
        }

        for window in self.points.windows(2) {
            let (lo, hi) = (window[0], window[1]);
            if raw >= lo.raw && raw <= hi.raw {
                let t = (raw - lo.raw) / (hi.raw - lo.raw);
                return lo.score + t * (hi.score - lo.score);
            }
        }
        unreachable!("raw is within [first.raw, last.raw] but matched no window")
    }

    /// The nearest breakpoint beyond `raw`, in the direction this metric
    /// actually improves, that yields a strictly higher score than `raw`
    /// interpolates to today. `None` once a metric already sits at the
    /// table's best attainable score.
    ///
    /// Used by the recommender to estimate impact against "the next tier"
    /// rather than against a flat, usually-unreachable jump to 10.0.
    pub fn next_improvement(&self, raw: f64) -> Option<Breakpoint> {
        let current = self.interpolate(raw);
        match self.direction {
            Direction::HigherIsBetter => self.points.iter().find(|p| p.score > current).copied(),
            Direction::LowerIsBetter => self.points.iter().rev().find(|p| p.score > current).copied(),
        }
    }
}

/// The fixed breakpoint table for each reference analyzer's metrics.
///
/// Keyed by the same metric name the analyzer inserts into
/// [`crate::core::AnalysisResult::metrics`]. C7 metrics map through
/// identity (the rubric already produces a 1-10 score) but still go
/// through this table so scoring treats every category uniformly.
static TABLES: Lazy<HashMap<&'static str, BreakpointTable>> = Lazy::new(|| {
    let mut m = HashMap::new();

    // C1 structure & complexity
    m.insert(
        "avg_cyclomatic_complexity",
        BreakpointTable::new(Direction::LowerIsBetter, &[(1.0, 10.0), (5.0, 8.0), (10.0, 5.0), (20.0, 2.0), (40.0, 1.0)]),
    );
    m.insert(
        "max_cyclomatic_complexity",
        BreakpointTable::new(Direction::LowerIsBetter, &[(1.0, 10.0), (10.0, 8.0), (20.0, 5.0), (40.0, 2.0), (80.0, 1.0)]),
    );
    m.insert(
        "avg_function_length",
        BreakpointTable::new(Direction::LowerIsBetter, &[(5.0, 10.0), (20.0, 8.0), (50.0, 5.0), (100.0, 2.0), (200.0, 1.0)]),
    );
    m.insert(
        "max_nesting_depth",
        BreakpointTable::new(Direction::LowerIsBetter, &[(1.0, 10.0), (3.0, 8.0), (5.0, 5.0), (8.0, 2.0), (12.0, 1.0)]),
    );

    // C2 duplication
    m.insert(
        "duplication_ratio",
        BreakpointTable::new(Direction::LowerIsBetter, &[(0.0, 10.0), (0.05, 8.0), (0.15, 5.0), (0.30, 2.0), (0.50, 1.0)]),
    );

    // C3 testing
    m.insert(
        "test_function_ratio",
        BreakpointTable::new(Direction::HigherIsBetter, &[(0.0, 1.0), (0.10, 3.0), (0.30, 6.0), (0.60, 8.0), (0.90, 10.0)]),
    );

    // C4 architecture & coupling
    m.insert(
        "import_cycle_ratio",
        BreakpointTable::new(Direction::LowerIsBetter, &[(0.0, 10.0), (0.02, 7.0), (0.10, 4.0), (0.25, 2.0), (0.50, 1.0)]),
    );
    m.insert(
        "churn_concentration",
        BreakpointTable::new(Direction::LowerIsBetter, &[(0.0, 10.0), (0.20, 8.0), (0.40, 5.0), (0.65, 2.0), (0.85, 1.0)]),
    );

    // C5 documentation
    m.insert(
        "public_doc_ratio",
        BreakpointTable::new(Direction::HigherIsBetter, &[(0.0, 1.0), (0.25, 4.0), (0.50, 6.0), (0.75, 8.0), (1.0, 10.0)]),
    );

    // C6 conventions & idioms
    m.insert(
        "naming_convention_ratio",
        BreakpointTable::new(Direction::HigherIsBetter, &[(0.0, 1.0), (0.50, 4.0), (0.80, 7.0), (0.95, 9.0), (1.0, 10.0)]),
    );
    m.insert(
        "todo_density_per_1000_lines",
        BreakpointTable::new(Direction::LowerIsBetter, &[(0.0, 10.0), (2.0, 8.0), (5.0, 6.0), (10.0, 3.0), (20.0, 1.0)]),
    );

    // C7 agent evaluation — already on a 1-10 scale, identity mapping.
    for metric in crate::agent::rubric::Metric::ALL {
        m.insert(metric.key(), BreakpointTable::new(Direction::HigherIsBetter, &[(1.0, 1.0), (10.0, 10.0)]));
    }

    m
});

pub fn table_for(metric: &str) -> Option<&'static BreakpointTable> {
    TABLES.get(metric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_linearly_between_two_points() {
        let table = BreakpointTable::new(Direction::HigherIsBetter, &[(0.0, 1.0), (10.0, 10.0)]);
        assert!((table.interpolate(5.0) - 5.5).abs() < 1e-9);
    }

    #[test]
    fn clamps_below_the_lowest_breakpoint() {
        let table = BreakpointTable::new(Direction::LowerIsBetter, &[(1.0, 10.0), (10.0, 1.0)]);
        assert_eq!(table.interpolate(-5.0), 10.0);
    }

    #[test]
    fn clamps_above_the_highest_breakpoint() {
        let table = BreakpointTable::new(Direction::LowerIsBetter, &[(1.0, 10.0), (10.0, 1.0)]);
        assert_eq!(table.interpolate(100.0), 1.0);
    }

    #[test]
    fn every_reference_metric_has_a_table() {
        let expected = [
            "avg_cyclomatic_complexity",
            "max_cyclomatic_complexity",
            "avg_function_length",
            "max_nesting_depth",
            "duplication_ratio",
            "test_function_ratio",
            "import_cycle_ratio",
            "churn_concentration",
            "public_doc_ratio",
            "naming_convention_ratio",
            "todo_density_per_1000_lines",
        ];
        for metric in expected {
            assert!(table_for(metric).is_some(), "missing breakpoint table for {metric}");
        }
        for metric in crate::agent::rubric::Metric::ALL {
            assert!(table_for(metric.key()).is_some());
        }
    }

    #[test]
    fn scores_stay_within_one_to_ten_across_the_domain() {
        for table in TABLES.values() {
            for raw in [-1000.0, -1.0, 0.0, 1.0, 50.0, 1000.0] {
                let score = table.interpolate(raw);
                assert!((1.0..=10.0).contains(&score), "score {score} out of range for raw {raw}");
            }
        }
    }

    #[test]
    fn next_improvement_moves_toward_a_better_score() {
        let higher = BreakpointTable::new(Direction::HigherIsBetter, &[(0.0, 1.0), (0.5, 5.0), (1.0, 10.0)]);
        let step = higher.next_improvement(0.2).unwrap();
        assert_eq!(step.raw, 0.5);

        let lower = BreakpointTable::new(Direction::LowerIsBetter, &[(1.0, 10.0), (10.0, 5.0), (20.0, 1.0)]);
        let step = lower.next_improvement(15.0).unwrap();
        assert_eq!(step.raw, 10.0);
    }

    #[test]
    fn next_improvement_is_none_at_the_best_attainable_score() {
        let table = table_for("public_doc_ratio").unwrap();
        assert!(table.next_improvement(1.0).is_none());
    }

    proptest::proptest! {
        #[test]
        fn interpolation_is_monotonic_in_raw(a in -500.0f64..500.0, b in -500.0f64..500.0) {
            for table in TABLES.values() {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                let score_lo = table.interpolate(lo);
                let score_hi = table.interpolate(hi);
                match table.direction {
                    Direction::HigherIsBetter => proptest::prop_assert!(score_lo <= score_hi + 1e-9),
                    Direction::LowerIsBetter => proptest::prop_assert!(score_hi <= score_lo + 1e-9),
                }
            }
        }
    }
}
