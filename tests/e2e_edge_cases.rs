//! End-to-end tests for malformed input, shape mismatches and small or
//! degenerate graphs, driven through the public `Engine` API.

use meanprop::{Edge, Engine, EngineConfig, Error, Graph, LinearParams, NodeId};

fn engine(out_dim: usize) -> Engine {
    Engine::new(EngineConfig::with_out_dim(out_dim)).unwrap()
}

// ============================================================================
// 1. Header declares more nodes than the file supplies
// ============================================================================

#[test]
fn test_truncated_feature_lines_is_format_error() {
    let text = "\
5 4
0 1.0 1.0 1.0 1.0
1 1.0 1.0 1.0 1.0
2 1.0 1.0 1.0 1.0
3 1.0 1.0 1.0 1.0
";
    match engine(4).run_str(text) {
        Err(Error::Format { message, .. }) => assert!(message.contains("declares 5 nodes")),
        other => panic!("expected format error, got {other:?}"),
    }
}

// ============================================================================
// 2. Edge endpoint out of range names the line
// ============================================================================

#[test]
fn test_edge_out_of_range_names_line() {
    let text = "2 1\n0 1.0\n1 2.0\n\n# edges\n0 1\n1 7\n";
    match engine(1).run_str(text) {
        Err(Error::Format { line, .. }) => assert_eq!(line, 7),
        other => panic!("expected format error, got {other:?}"),
    }
}

// ============================================================================
// 3. Weight matrix with the wrong column count
// ============================================================================

#[test]
fn test_weight_columns_mismatch_is_dimension_error() {
    let params = LinearParams::ones(4, 3);
    let engine = Engine::with_params(&params).unwrap();
    let err = engine.run_str("1 4\n0 1 2 3 4\n").unwrap_err();
    assert!(matches!(err, Error::Dimension { .. }), "{err}");
}

#[test]
fn test_bias_length_mismatch_is_dimension_error() {
    let config = EngineConfig {
        weights: Some(vec![vec![1.0], vec![1.0]]),
        bias: Some(vec![0.0, 0.0, 0.0]),
        ..EngineConfig::default()
    };
    assert!(matches!(Engine::new(config), Err(Error::Dimension { .. })));
}

// ============================================================================
// 4. Single node, no edges: identity mean
// ============================================================================

#[test]
fn test_single_isolated_node() {
    let params = LinearParams::new(vec![vec![2.0, 0.0], vec![0.0, -1.0]], vec![1.0, 1.0]).unwrap();
    let output = Engine::with_params(&params).unwrap().run_str("1 2\n0 3.0 4.0\n").unwrap();
    assert_eq!(output.embeddings.row(NodeId(0)), &[7.0, -3.0]);
    assert_eq!(output.report.node_scores, vec![4.0]);
    assert!(output.report.edges.is_empty());
    assert_eq!(output.report.graph_score, 4.0);
}

// ============================================================================
// 5. Duplicate edges are scored once per occurrence
// ============================================================================

#[test]
fn test_duplicate_edges_scored_per_occurrence() {
    let graph = Graph::new(
        vec![vec![1.0], vec![3.0]],
        vec![Edge::new(0, 1), Edge::new(0, 1)],
    )
    .unwrap();
    let output = engine(1).run(&graph).unwrap();
    // node 0: mean{1, 3, 3}; node 1: mean{3, 1, 1}
    let s0 = 7.0 / 3.0;
    let s1 = 5.0 / 3.0;
    assert!((output.report.node_scores[0] - s0).abs() < 1e-12);
    assert!((output.report.node_scores[1] - s1).abs() < 1e-12);
    assert_eq!(output.report.edges.len(), 2);
    assert_eq!(output.report.edges[0].score, output.report.edges[1].score);
}

// ============================================================================
// 6. Missing output dimension
// ============================================================================

#[test]
fn test_unset_out_dim_is_config_error() {
    let engine = Engine::new(EngineConfig::default()).unwrap();
    assert!(matches!(engine.run_str("1 1\n0 1.0\n"), Err(Error::Config(_))));
}

// ============================================================================
// 7. Missing file
// ============================================================================

#[test]
fn test_missing_file_is_io_error() {
    let err = engine(1).run_file("/nonexistent/graph_data.txt").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
