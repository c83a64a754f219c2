//! The facade wires the crates together

use approx::assert_relative_eq;
use histdiff::prelude::*;

#[test]
fn test_blocks_through_the_facade() -> anyhow::Result<()> {
    // two plate halves, each with its own control
    let rows = vec![
        ("A1".to_string(), vec![1.0]),
        ("A1".to_string(), vec![9.0]),
        ("A2".to_string(), vec![1.0]),
        ("A2".to_string(), vec![1.0]),
        ("B1".to_string(), vec![1.0]),
        ("B1".to_string(), vec![1.0]),
        ("B2".to_string(), vec![1.0]),
        ("B2".to_string(), vec![1.0]),
    ];
    let source = InMemorySource::new(&["F"], rows, 3)?;
    let blocks = BlockDefinition::new()
        .with_block(BlockSpec::named("top", ["A1", "A2"]))
        .with_block(BlockSpec::named("bottom", ["B1", "B2"]));
    let config = HistDiffConfig::new(["A1", "B1"])
        .with_nbins(4)
        .with_blocks(blocks);

    let scores = calculate_scores(&source, config)?;
    assert_relative_eq!(scores.get("A2", "F").unwrap(), -0.3125, epsilon = 1e-12);
    // B2 matches its own control exactly
    assert_eq!(scores.get("B2", "F"), Some(0.0));
    assert_eq!(scores.entities(), &["A1", "A2", "B1", "B2"]);
    Ok(())
}
