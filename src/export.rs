//! Result rendering — the textual contract read by the comparison harness.
//!
//! ```text
//! === Node-Level ===
//! Node 0: 1.45 1.45 1.45 1.45
//!
//! === Graph-Level ===
//! Score = 5.84
//! Binary = 1
//!
//! === Edge-Level ===
//! Edge 0 (0, 1) | score = 48.72 | binary = 1
//! ```
//!
//! Section markers and numeric values are the contract; everything else on
//! a line is decoration.

use std::io::Write;

use serde::Serialize;

use crate::scoring::EdgeScore;
use crate::{Result, RunOutput};

pub const NODE_SECTION: &str = "=== Node-Level ===";
pub const GRAPH_SECTION: &str = "=== Graph-Level ===";
pub const EDGE_SECTION: &str = "=== Edge-Level ===";

/// Fractional digits used when none are configured.
pub const DEFAULT_PRECISION: usize = 2;

/// Write the three-section text report.
pub fn write_text(output: &RunOutput, precision: usize, writer: &mut dyn Write) -> Result<()> {
    writeln!(writer, "{NODE_SECTION}")?;
    for (n, row) in output.embeddings.rows().enumerate() {
        let values: Vec<String> = row.iter().map(|v| format!("{v:.precision$}")).collect();
        writeln!(writer, "Node {n}: {}", values.join(" "))?;
    }
    writeln!(writer)?;

    let report = &output.report;
    writeln!(writer, "{GRAPH_SECTION}")?;
    writeln!(writer, "Score = {:.precision$}", report.graph_score)?;
    writeln!(writer, "Binary = {}", u8::from(report.graph_binary))?;
    writeln!(writer)?;

    writeln!(writer, "{EDGE_SECTION}")?;
    for edge in &report.edges {
        writeln!(writer, "{}", format_edge(edge, precision))?;
    }
    Ok(())
}

/// Render the text report into a string.
pub fn render_text(output: &RunOutput, precision: usize) -> Result<String> {
    let mut buf = Vec::new();
    write_text(output, precision, &mut buf)?;
    // Only ASCII and formatted numbers are written above.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn format_edge(edge: &EdgeScore, precision: usize) -> String {
    format!(
        "Edge {} {} | score = {:.precision$} | binary = {}",
        edge.index,
        edge.edge,
        edge.score,
        u8::from(edge.binary),
    )
}

#[derive(Serialize)]
struct JsonGraph {
    score: f64,
    binary: bool,
    threshold: f64,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    nodes: Vec<&'a [f64]>,
    node_scores: &'a [f64],
    graph: JsonGraph,
    edges: &'a [EdgeScore],
}

/// Write the report as pretty-printed JSON at full precision.
pub fn write_json(output: &RunOutput, writer: &mut dyn Write) -> Result<()> {
    let report = &output.report;
    let json = JsonReport {
        nodes: output.embeddings.rows().collect(),
        node_scores: &report.node_scores,
        graph: JsonGraph {
            score: report.graph_score,
            binary: report.graph_binary,
            threshold: report.threshold,
        },
        edges: &report.edges,
    };
    serde_json::to_writer_pretty(&mut *writer, &json)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edge;
    use crate::propagate::NodeEmbeddings;
    use crate::scoring::ScoreReport;
    use pretty_assertions::assert_eq;

    fn sample() -> RunOutput {
        RunOutput {
            embeddings: NodeEmbeddings::from_rows(2, vec![vec![1.0, 1.0], vec![0.25, 2.0]]).unwrap(),
            report: ScoreReport {
                threshold: 0.5,
                node_scores: vec![2.0, 2.25],
                edges: vec![EdgeScore {
                    index: 0,
                    edge: Edge::new(0, 1),
                    score: 4.25,
                    binary: true,
                }],
                graph_score: 2.0625,
                graph_binary: true,
            },
        }
    }

    #[test]
    fn test_text_layout() {
        let text = render_text(&sample(), 2).unwrap();
        let expected = "\
=== Node-Level ===
Node 0: 1.00 1.00
Node 1: 0.25 2.00

=== Graph-Level ===
Score = 2.06
Binary = 1

=== Edge-Level ===
Edge 0 (0, 1) | score = 4.25 | binary = 1
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_precision_is_configurable() {
        let text = render_text(&sample(), 4).unwrap();
        assert!(text.contains("Node 1: 0.2500 2.0000"));
        assert!(text.contains("Score = 2.0625"));
    }

    #[test]
    fn test_json_report() {
        let mut buf = Vec::new();
        write_json(&sample(), &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["nodes"][1][0], serde_json::json!(0.25));
        assert_eq!(value["graph"]["binary"], serde_json::json!(true));
        assert_eq!(value["edges"][0]["edge"]["dst"], serde_json::json!(1));
        assert_eq!(value["edges"][0]["score"], serde_json::json!(4.25));
    }
}
