//! Mode dispatch: complexity score → deliberation tier.

use tracing::info;

use crate::config::DispatchThresholds;
use crate::types::{ComplexityScore, DeliberationMode};

/// Select the deliberation tier for a complexity score.
///
/// Both boundaries are inclusive on the cheaper side: a score exactly at
/// `low` stays single-pass, a score exactly at `high` stays iterative.
/// Every finite score maps to exactly one mode.
pub fn dispatch(complexity: ComplexityScore, thresholds: &DispatchThresholds) -> DeliberationMode {
    let score = complexity.value();
    let mode = if score <= thresholds.low {
        DeliberationMode::SinglePass
    } else if score <= thresholds.high {
        DeliberationMode::Iterative
    } else {
        DeliberationMode::Adversarial
    };
    info!(complexity = %complexity, mode = %mode, "dispatched");
    mode
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(value: f64) -> ComplexityScore {
        // Route through the public constructor; gain 1.0 keeps the value
        // as-is for anything in range.
        ComplexityScore::from_variance(value - 1.0, 1.0)
    }

    #[test]
    fn low_boundary_is_inclusive() {
        let thresholds = DispatchThresholds::default();
        assert_eq!(dispatch(c(2.0), &thresholds), DeliberationMode::SinglePass);
        assert_eq!(dispatch(c(2.0001), &thresholds), DeliberationMode::Iterative);
    }

    #[test]
    fn high_boundary_is_inclusive() {
        let thresholds = DispatchThresholds::default();
        assert_eq!(dispatch(c(5.0), &thresholds), DeliberationMode::Iterative);
        assert_eq!(
            dispatch(c(5.0001), &thresholds),
            DeliberationMode::Adversarial
        );
    }

    #[test]
    fn extremes_route_to_outer_modes() {
        let thresholds = DispatchThresholds::default();
        assert_eq!(dispatch(c(1.0), &thresholds), DeliberationMode::SinglePass);
        assert_eq!(dispatch(c(10.0), &thresholds), DeliberationMode::Adversarial);
    }

    #[test]
    fn custom_thresholds_shift_the_bands() {
        let thresholds = DispatchThresholds { low: 4.0, high: 8.0 };
        assert_eq!(dispatch(c(3.5), &thresholds), DeliberationMode::SinglePass);
        assert_eq!(dispatch(c(6.0), &thresholds), DeliberationMode::Iterative);
        assert_eq!(dispatch(c(9.0), &thresholds), DeliberationMode::Adversarial);
    }
}
