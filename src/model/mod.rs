//! # Graph Model
//!
//! Plain values that flow through the pipeline: the input graph, its
//! edges, and the fixed linear-map parameters.
//!
//! Design rule: this module is pure data. No I/O, no state.

pub mod node;
pub mod edge;
pub mod graph;
pub mod linear;

pub use node::NodeId;
pub use edge::Edge;
pub use graph::Graph;
pub use linear::LinearParams;
