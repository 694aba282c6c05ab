//! Parity harness: parse two rendered reports and check they agree within
//! an absolute tolerance.
//!
//! Node vectors are matched by position and the graph score directly. Edge
//! ordering is not part of the contract, so edge scores are sorted before
//! being compared as a multiset.

use tracing::debug;

use crate::{Error, Result};

/// Absolute tolerance used by the reference harness.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Numbers extracted from a text report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedReport {
    pub nodes: Vec<Vec<f64>>,
    pub graph_score: f64,
    /// Sorted ascending.
    pub edge_scores: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Nodes,
    Graph,
    Edges,
}

fn section_marker(line: &str) -> Option<Section> {
    // Producers disagree on the hyphen character, so match the words.
    if !line.contains("===") {
        return None;
    }
    if line.contains("Node") {
        Some(Section::Nodes)
    } else if line.contains("Graph") {
        Some(Section::Graph)
    } else if line.contains("Edge") {
        Some(Section::Edges)
    } else {
        None
    }
}

fn parse_number(text: &str, line: usize) -> Result<f64> {
    text.trim()
        .parse()
        .map_err(|_| Error::Parse(format!("line {line}: invalid number '{}'", text.trim())))
}

/// Parse a report produced by `export::write_text` or a compatible program.
pub fn parse_report(text: &str) -> Result<ParsedReport> {
    let mut section = Section::Preamble;
    let mut nodes = Vec::new();
    let mut graph_score = None;
    let mut edge_scores = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if let Some(next) = section_marker(line) {
            section = next;
            continue;
        }
        if line.is_empty() {
            continue;
        }

        match section {
            Section::Preamble => {}
            Section::Nodes => {
                // Optional "Node <i>:" label.
                let values = line.rsplit_once(':').map_or(line, |(_, rest)| rest);
                let row = values
                    .split_whitespace()
                    .map(|tok| parse_number(tok, line_no))
                    .collect::<Result<Vec<f64>>>()?;
                if !row.is_empty() {
                    nodes.push(row);
                }
            }
            Section::Graph => {
                if let Some((_, value)) = line.split_once("Score =") {
                    graph_score = Some(parse_number(value, line_no)?);
                }
            }
            Section::Edges => {
                if let Some((_, rest)) = line.split_once("score =") {
                    let value = rest.split('|').next().unwrap_or(rest);
                    edge_scores.push(parse_number(value, line_no)?);
                }
            }
        }
    }

    let graph_score =
        graph_score.ok_or_else(|| Error::Parse("report has no graph score".into()))?;
    edge_scores.sort_by(f64::total_cmp);
    Ok(ParsedReport { nodes, graph_score, edge_scores })
}

fn close(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// Fail with `Error::Mismatch` at the first disagreement.
pub fn compare_reports(left: &ParsedReport, right: &ParsedReport, tolerance: f64) -> Result<()> {
    if !close(left.graph_score, right.graph_score, tolerance) {
        return Err(Error::Mismatch(format!(
            "graph score: {} vs {}",
            left.graph_score, right.graph_score
        )));
    }

    if left.nodes.len() != right.nodes.len() {
        return Err(Error::Mismatch(format!(
            "number of nodes: {} vs {}",
            left.nodes.len(),
            right.nodes.len()
        )));
    }
    for (i, (a, b)) in left.nodes.iter().zip(&right.nodes).enumerate() {
        if a.len() != b.len() {
            return Err(Error::Mismatch(format!(
                "feature count for node {i}: {} vs {}",
                a.len(),
                b.len()
            )));
        }
        if let Some((j, (x, y))) = a
            .iter()
            .zip(b)
            .enumerate()
            .find(|(_, (x, y))| !close(**x, **y, tolerance))
        {
            return Err(Error::Mismatch(format!("node {i}, feature {j}: {x} vs {y}")));
        }
    }

    if left.edge_scores.len() != right.edge_scores.len() {
        return Err(Error::Mismatch(format!(
            "number of edges: {} vs {}",
            left.edge_scores.len(),
            right.edge_scores.len()
        )));
    }
    if let Some((i, (x, y))) = left
        .edge_scores
        .iter()
        .zip(&right.edge_scores)
        .enumerate()
        .find(|(_, (x, y))| !close(**x, **y, tolerance))
    {
        return Err(Error::Mismatch(format!("sorted edge {i} score: {x} vs {y}")));
    }

    debug!(
        nodes = left.nodes.len(),
        edges = left.edge_scores.len(),
        tolerance,
        "reports agree"
    );
    Ok(())
}

/// Parse both texts and compare them.
pub fn compare_text(left: &str, right: &str, tolerance: f64) -> Result<()> {
    compare_reports(&parse_report(left)?, &parse_report(right)?, tolerance)
}
