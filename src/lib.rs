//! depmap - dependency graph builder for package indexes
//!
//! This crate turns a newline-delimited dump of package metadata into a
//! directed dependency graph, slices out the component around a seed
//! package, and moves it through graph-exchange documents so an external
//! tool can lay it out and a plotting library can draw it.

pub mod enrich;
pub mod export;
pub mod graph;
pub mod parser;
pub mod pipeline;
pub mod render;
