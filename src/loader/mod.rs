//! Graph file loader — parses the line-oriented graph description.
//!
//! ```text
//! <num_nodes> <num_features>
//! <node_id> <f1> ... <f_num_features>   (num_nodes lines, in id order)
//! <u> <v>                               (one line per edge)
//! ```
//!
//! Blank lines and lines starting with `#` are skipped anywhere. Every
//! failure is an `Error::Format` carrying the 1-based physical line number.

use std::path::Path;
use std::str::SplitWhitespace;

use hashbrown::HashSet;
use tracing::{debug, warn};

use crate::model::{Edge, Graph};
use crate::{Error, Result};

/// Comment marker for whole-line comments.
pub const COMMENT_MARKER: char = '#';

/// Read and parse a graph file.
pub fn load(path: impl AsRef<Path>) -> Result<Graph> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = text.len(), "read graph file");
    parse(&text)
}

/// Parse a graph description.
pub fn parse(input: &str) -> Result<Graph> {
    let mut lines = significant_lines(input);
    let eof_line = input.lines().count() + 1;

    // Header
    let (line_no, header) = lines.next().ok_or_else(|| Error::Format {
        line: eof_line,
        message: "missing header '<num_nodes> <num_features>'".into(),
    })?;
    let mut tokens = header.split_whitespace();
    let num_nodes: usize = next_int(&mut tokens, line_no, "num_nodes")?;
    let num_features: usize = next_int(&mut tokens, line_no, "num_features")?;
    expect_end(&mut tokens, line_no, "header")?;
    if num_nodes == 0 || num_features == 0 {
        return Err(Error::Format {
            line: line_no,
            message: format!("header counts must be positive, got {num_nodes} {num_features}"),
        });
    }

    // Node features. The header counts are untrusted until the rows exist,
    // so the buffer grows with the input instead of being sized from them.
    let mut features = Vec::new();
    for expected_id in 0..num_nodes {
        let (line_no, line) = lines.next().ok_or_else(|| Error::Format {
            line: eof_line,
            message: format!(
                "unexpected end of input: header declares {num_nodes} nodes, found {expected_id} feature lines"
            ),
        })?;
        let mut tokens = line.split_whitespace();
        let node_id: i64 = next_int(&mut tokens, line_no, "node id")?;
        if node_id != expected_id as i64 {
            // Rows are taken in file order; the id column is informational.
            warn!(line = line_no, node_id, expected_id, "node id out of order");
        }

        let before = features.len();
        for tok in tokens {
            features.push(parse_float(tok, line_no)?);
        }
        let found = features.len() - before;
        if found != num_features {
            return Err(Error::Format {
                line: line_no,
                message: format!("expected {num_features} feature values, found {found}"),
            });
        }
    }

    // Edges
    let mut edges = Vec::new();
    let mut seen = HashSet::new();
    for (line_no, line) in lines {
        let mut tokens = line.split_whitespace();
        let u: usize = next_int(&mut tokens, line_no, "edge source")?;
        let v: usize = next_int(&mut tokens, line_no, "edge target")?;
        expect_end(&mut tokens, line_no, "edge")?;
        for id in [u, v] {
            if id >= num_nodes {
                return Err(Error::Format {
                    line: line_no,
                    message: format!("edge endpoint {id} out of range 0..{num_nodes}"),
                });
            }
        }
        let edge = Edge::new(u, v);
        if edge.is_self_loop() {
            warn!(line = line_no, node = u, "self-edge in input");
        }
        if !seen.insert((u.min(v), u.max(v))) {
            warn!(line = line_no, u, v, "duplicate edge");
        }
        edges.push(edge);
    }

    debug!(num_nodes, num_features, num_edges = edges.len(), "parsed graph");
    Graph::from_flat(num_nodes, num_features, features, edges)
}

/// Non-blank, non-comment lines paired with their 1-based line numbers.
fn significant_lines(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with(COMMENT_MARKER))
}

fn next_int<T: std::str::FromStr>(
    tokens: &mut SplitWhitespace<'_>,
    line: usize,
    what: &str,
) -> Result<T> {
    let tok = tokens.next().ok_or_else(|| Error::Format {
        line,
        message: format!("missing {what}"),
    })?;
    tok.parse().map_err(|_| Error::Format {
        line,
        message: format!("invalid {what} '{tok}'"),
    })
}

fn parse_float(tok: &str, line: usize) -> Result<f64> {
    match tok.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::Format {
            line,
            message: format!("invalid feature value '{tok}'"),
        }),
    }
}

fn expect_end(tokens: &mut SplitWhitespace<'_>, line: usize, what: &str) -> Result<()> {
    match tokens.next() {
        None => Ok(()),
        Some(extra) => Err(Error::Format {
            line,
            message: format!("unexpected trailing token '{extra}' in {what} line"),
        }),
    }
}
