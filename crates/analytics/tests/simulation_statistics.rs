//! Integration tests for the simulation statistics engine.

use analytics::{AnalyticsError, SimulationStatsEngine};
use approx::assert_abs_diff_eq;
use configuration::StatisticsSettings;
use core_types::SimulationMatrix;
use proptest::prelude::*;
use rust_decimal_macros::dec;

/// A small deterministic "simulation": 20 days, 64 paths drifting apart.
fn sample_matrix() -> SimulationMatrix {
    let runs = 64;
    let steps = (0..20)
        .map(|day| {
            (0..runs)
                .map(|run| {
                    let drift = (run as f64 - 32.0) * 0.05 * day as f64;
                    let noise = ((run * 7 + day * 3) as f64).sin();
                    100.0 + drift + noise
                })
                .collect()
        })
        .collect();
    SimulationMatrix::new(steps).unwrap()
}

#[test]
fn analyze_a_simulation_response() {
    let payload = serde_json::to_string(&sample_matrix()).unwrap();
    let matrix = SimulationMatrix::from_json(&payload).unwrap();

    let engine = SimulationStatsEngine::default();
    let stats = engine.analyze(&matrix).unwrap();

    assert_eq!(stats.count, 64);
    assert!(stats.min <= stats.quantile5);
    assert!(stats.quantile5 <= stats.median);
    assert!(stats.median <= stats.quantile95);
    assert!(stats.quantile95 <= stats.max);
    assert!(stats.std_dev > 0.0);

    let expected_points = ((stats.max - stats.min) / engine.settings().grid_step + 1e-9).floor() as usize + 1;
    assert_eq!(stats.density.len(), expected_points);
    assert_eq!(stats.density.first().unwrap().x, stats.min);
    assert!(stats.density.iter().all(|p| p.density >= 0.0));
}

#[test]
fn density_with_a_fine_grid_integrates_to_about_one() {
    let engine = SimulationStatsEngine::new(StatisticsSettings {
        bandwidth: 2.0,
        grid_step: 0.01,
        ..StatisticsSettings::default()
    });
    // Padding values at both ends keep the kernel mass of the interior inside the grid.
    let mut values: Vec<f64> = (0..100).map(|i| 50.0 + (i % 10) as f64).collect();
    values.push(40.0);
    values.push(70.0);

    let curve = engine.density(&values).unwrap();
    let area: f64 = curve
        .windows(2)
        .map(|w| (w[1].x - w[0].x) * (w[0].density + w[1].density) / 2.0)
        .sum();
    // The two padding values each lose half their mass beyond the grid ends.
    assert_abs_diff_eq!(area, 1.0 - 1.0 / values.len() as f64, epsilon = 1e-3);
}

#[test]
fn summary_rounds_for_display_only() {
    let matrix = SimulationMatrix::new(vec![vec![100.0, 100.0, 101.0]]).unwrap();
    let stats = SimulationStatsEngine::default().analyze(&matrix).unwrap();

    let summary = stats.summary().unwrap();
    assert_eq!(summary.mean, dec!(100.33));
    assert_eq!(summary.std_dev, dec!(0.47));
    assert_abs_diff_eq!(stats.mean, 100.0 + 1.0 / 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(stats.std_dev, (2.0f64 / 9.0).sqrt(), epsilon = 1e-12);
}

#[test]
fn statistics_serialize_for_the_presentation_layer() {
    let matrix = SimulationMatrix::new(vec![vec![90.0, 100.0, 110.0]]).unwrap();
    let stats = SimulationStatsEngine::default().analyze(&matrix).unwrap();

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["mean"], 100.0);
    assert!(json.get("stdDev").is_some());
    assert!(json.get("quantile5").is_some());
    assert!(json.get("quantile95").is_some());
    assert!(json["density"].as_array().unwrap().len() == 21);
    assert!(json.get("sortedTerminalValues").is_none());
}

#[test]
fn empty_simulation_never_reaches_the_engine() {
    let err = SimulationMatrix::from_json("[]").unwrap_err();
    assert!(matches!(err, core_types::CoreError::EmptyMatrix));

    let engine = SimulationStatsEngine::default();
    assert!(matches!(engine.density(&[]), Err(AnalyticsError::EmptyInput)));
}

#[test]
fn million_dollar_portfolio_with_wide_outcomes() {
    // Terminal values spread over ~400k with the default unit grid step would need
    // ~396k grid points, well over the default cap.
    let terminal: Vec<f64> = (0..100).map(|i| 850_000.0 + i as f64 * 4_000.0).collect();
    let matrix = SimulationMatrix::new(vec![vec![1_000_000.0; 100], terminal]).unwrap();

    let engine = SimulationStatsEngine::default();
    let stats = engine.analyze(&matrix).unwrap();

    assert_eq!(stats.count, 100);
    assert_abs_diff_eq!(stats.mean, 1_048_000.0, epsilon = 1e-6);
    assert_abs_diff_eq!(stats.quantile5, 850_000.0 + 4.95 * 4_000.0, epsilon = 1e-6);
    assert!(stats.std_dev > 0.0);

    let max_points = engine.settings().max_grid_points;
    assert_eq!(stats.density.len(), max_points);
    assert_eq!(stats.density[0].x, 850_000.0);
    assert_abs_diff_eq!(stats.density[max_points - 1].x, 1_246_000.0, epsilon = 1e-6);
    assert!(stats.density.windows(2).all(|w| w[0].x < w[1].x));
    assert!(stats.density.iter().all(|p| p.density >= 0.0));
}

#[test]
fn analyze_json_parses_then_summarizes() {
    let engine = SimulationStatsEngine::default();

    let stats = engine.analyze_json("[[100, 100, 100], [90, 100, 110]]").unwrap();
    assert_eq!(stats.mean, 100.0);
    assert_eq!(stats.density.len(), 21);

    assert!(matches!(
        engine.analyze_json("[]"),
        Err(AnalyticsError::Core(core_types::CoreError::EmptyMatrix))
    ));
    assert!(matches!(
        engine.analyze_json("[[1.0, 2.0], [3.0]]"),
        Err(AnalyticsError::Core(core_types::CoreError::RaggedMatrix { step: 1, .. }))
    ));
    assert!(matches!(
        engine.analyze_json("{\"not\": \"a matrix\"}"),
        Err(AnalyticsError::Core(core_types::CoreError::Parse(_)))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn density_is_non_negative_on_every_grid_point(
        values in prop::collection::vec(0.0f64..500.0, 1..200),
        bandwidth in 0.5f64..50.0,
    ) {
        let engine = SimulationStatsEngine::new(StatisticsSettings {
            bandwidth,
            ..StatisticsSettings::default()
        });
        let curve = engine.density(&values).unwrap();

        prop_assert!(!curve.is_empty());
        prop_assert!(curve.iter().all(|p| p.density >= 0.0 && p.density.is_finite()));
        prop_assert!(curve.windows(2).all(|w| w[0].x < w[1].x));
    }

    #[test]
    fn quantiles_are_bracketed_by_the_extremes(
        values in prop::collection::vec(0.0f64..1e6, 1..300),
    ) {
        let engine = SimulationStatsEngine::new(StatisticsSettings {
            grid_step: 1_000.0,
            ..StatisticsSettings::default()
        });
        let stats = engine.analyze(&SimulationMatrix::new(vec![values]).unwrap()).unwrap();

        prop_assert!(stats.min <= stats.quantile5 && stats.quantile5 <= stats.quantile95);
        prop_assert!(stats.quantile95 <= stats.max);
        prop_assert!(stats.std_dev >= 0.0);
        prop_assert!(stats.mean >= stats.min - 1e-6 && stats.mean <= stats.max + 1e-6);
    }
}
