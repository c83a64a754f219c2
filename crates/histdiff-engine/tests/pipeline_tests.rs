//! End-to-end behaviour of the streaming pipeline

mod common;

use approx::assert_relative_eq;
use histdiff_core::{BlockDefinition, BlockSpec, InMemorySource, PlateDefinition};
use histdiff_engine::{calculate_scores, HistDiffConfig, HistDiffPipeline, ProblemReason};

#[test]
fn test_reference_example() {
    // control [1,1,9,9] and treated [1,1,1,1] over the range [1, 9]
    let source = common::single_feature(
        &[("V1", &[1.0, 1.0, 9.0, 9.0][..]), ("A1", &[1.0, 1.0, 1.0, 1.0][..])],
        3,
    );
    let plate = PlateDefinition::from_labels(["A1", "V1"]);
    let config = HistDiffConfig::new(["V1"]).with_nbins(4).with_plate(plate);

    let run = HistDiffPipeline::new(config).unwrap().run(&source).unwrap();
    let range = run.ranges.table.get("F").unwrap();
    assert_eq!((range.low, range.high), (1.0, 9.0));
    assert_eq!(run.store.histogram("V1", "F").unwrap().counts(), &[2, 0, 0, 2]);
    assert_eq!(run.store.histogram("A1", "F").unwrap().counts(), &[4, 0, 0, 0]);

    // normalised control [0.375, 0.125, 0.125, 0.375], proxy 2.5
    // normalised treated [0.75, 0.25, 0, 0], proxy 1.25
    let score = run.scores.get("A1", "F").unwrap();
    assert!(score < 0.0);
    assert_relative_eq!(score, -0.3125, epsilon = 1e-12);
}

#[test]
fn test_rows_follow_block_order() {
    let source = common::single_feature(
        &[
            ("B1", &[1.0, 2.0][..]),
            ("A2", &[3.0][..]),
            ("A1", &[1.0, 5.0][..]),
            ("C4", &[4.0][..]),
        ],
        2,
    );
    let blocks = BlockDefinition::new().with_block(BlockSpec::new(["A2", "A1"]));
    let config = HistDiffConfig::new(["A1"]).with_blocks(blocks);
    let scores = calculate_scores(&source, config).unwrap();
    // explicit block first, then the remainder in plate order
    assert_eq!(scores.entities(), &["A2", "A1", "B1", "C4"]);
}

#[test]
fn test_block_isolation_end_to_end() {
    let left = [("A1", &[1.0, 1.0, 9.0][..]), ("A2", &[2.0, 3.0][..])];
    let right = [("P1", &[9.0, 9.0, 9.0][..]), ("P2", &[1.0][..])];
    let blocks = || {
        BlockDefinition::new()
            .with_block(BlockSpec::named("left", ["A1", "A2"]))
            .with_block(BlockSpec::named("right", ["P1", "P2"]))
    };

    let mut both: Vec<(&str, &[f64])> = left.to_vec();
    both.extend(right);

    // fixing the plate keeps the range identical between runs
    let range_guard = [("H12", &[0.0, 10.0][..])];
    let mut left_only: Vec<(&str, &[f64])> = left.to_vec();
    left_only.extend(range_guard);
    both.extend(range_guard);

    let config = HistDiffConfig::new(["A1", "P1"]).with_nbins(5).with_blocks(blocks());
    let together = calculate_scores(&common::single_feature(&both, 4), config.clone()).unwrap();
    let alone = calculate_scores(&common::single_feature(&left_only, 4), config).unwrap();

    assert_eq!(together.row("A2"), alone.row("A2"));
    assert_ne!(together.row("P2"), None);
}

#[test]
fn test_problematic_features_reported_and_excluded() {
    let path = common::temp_path("problematicFeats.csv");
    let source = InMemorySource::new(
        &common::RANDOM_FEATURES,
        common::random_plate(7, 20),
        13,
    )
    .unwrap();
    let config = HistDiffConfig::new(["A1", "B1", "C1", "D1"])
        .with_nbins(10)
        .with_problematic_features_path(&path);

    let run = HistDiffPipeline::new(config).unwrap().run(&source).unwrap();
    let report = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(report, "missing,noValues\n");
    assert_eq!(run.ranges.problematic.len(), 1);
    assert_eq!(run.ranges.problematic[0].reason, ProblemReason::NoValues);
    assert_eq!(run.scores.features(), &["low", "high", "constant"]);

    // constant feature widened to [3, 4.5]; every well has the same histogram
    let constant = run.ranges.table.get("constant").unwrap();
    assert_eq!((constant.low, constant.high), (3.0, 4.5));
    assert!(run.scores.column("constant").unwrap().iter().all(|&s| s == 0.0));
}

#[test]
fn test_shift_direction_reaches_the_sign() {
    let source = InMemorySource::new(
        &common::RANDOM_FEATURES,
        common::random_plate(11, 200),
        64,
    )
    .unwrap();
    let config = HistDiffConfig::new(["A1", "B1", "C1", "D1"]).with_nbins(20);
    let scores = calculate_scores(&source, config).unwrap();

    for well in ["A2", "B2", "C2", "D2"] {
        assert!(scores.get(well, "low").unwrap() > 0.0, "{well} shifted up");
        assert!(scores.get(well, "high").unwrap() < 0.0, "{well} shifted down");
    }
}

#[test]
fn test_no_controls_anywhere_still_scores() {
    let source = common::single_feature(&[("A1", &[1.0, 2.0][..]), ("A2", &[3.0][..])], 10);
    let scores = calculate_scores(&source, HistDiffConfig::default()).unwrap();
    assert_eq!(scores.len(), 2);
    assert!(scores.rows().all(|(_, row)| row.iter().all(|&s| s == 0.0)));
}

#[test]
fn test_block_without_control_scores_zero() {
    let source = common::single_feature(
        &[
            ("A1", &[1.0, 4.0, 4.0][..]),
            ("A2", &[1.0, 1.0, 4.0][..]),
            ("B1", &[1.0, 1.0][..]),
        ],
        2,
    );
    let blocks = BlockDefinition::new()
        .with_block(BlockSpec::named("top", ["A1", "A2"]))
        .with_block(BlockSpec::named("nocontrol", ["B1"]));
    let config = HistDiffConfig::new(["A1"]).with_nbins(4).with_blocks(blocks);
    let scores = calculate_scores(&source, config).unwrap();

    assert_eq!(scores.get("B1", "F"), Some(0.0));
    assert!(scores.get("A2", "F").unwrap() != 0.0);
}

#[test]
fn test_empty_input() {
    let source = InMemorySource::new(&["F"], Vec::new(), 10).unwrap();
    let scores = calculate_scores(&source, HistDiffConfig::new(["A1"])).unwrap();
    assert!(scores.is_empty());
    assert!(scores.features().is_empty());
}
