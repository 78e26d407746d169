//! Query engine for road networks preprocessed into a contraction hierarchy.
//!
//! The graph is expected to be fully contracted offline: nodes renumbered by
//! hierarchy rank, shortcut edges materialized, and every edge record stored
//! at its lower ranked endpoint with direction flags. On such a graph this
//! crate answers point-to-point queries with a bidirectional Dijkstra variant
//! using stall-on-demand pruning and recursively unpacks shortcut edges into
//! the original road segments.
//!
//! Preprocessing, file formats and map matching live in the surrounding
//! tooling, not here. The engine only consumes a read-only graph view (see
//! [`datastr::graph::ContractedGraph`]) and hands back distances and paths.

#[macro_use]
pub mod report;
pub mod algo;
pub mod datastr;
pub mod util;
