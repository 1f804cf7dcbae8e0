//! GraphQL synthesis for cmsgraph content types.
//!
//! Turns the content model held by a [`cmsgraph_schema::SchemaRegistry`] into
//! GraphQL documents for the CMS Graph endpoint:
//! - `fragments`: Fixed base-type, metadata and DAM asset fragments
//! - `allowed`: Allow/restrict list resolution for polymorphic properties
//! - `graph`: Per-query record of visited fragments
//! - `composer`: Fragment composition for a content type
//! - `compiler`: Property-to-selection compilation
//! - `query`: Single-item and multi-item query documents
//! - `shape`: Normalized response shape inference
//!
//! # Example
//!
//! ```ignore
//! use cmsgraph_query::build_single_item_query;
//!
//! let document = build_single_item_query(&registry, "Article", false)?;
//! ```

pub mod allowed;
pub mod compiler;
pub mod composer;
pub mod fragments;
pub mod graph;
pub mod query;
pub mod shape;

pub use allowed::AllowListResolver;
pub use compiler::CompiledProperty;
pub use composer::FragmentComposer;
pub use fragments::{fragment_name, DAM_PROBE_TYPE};
pub use graph::FragmentGraph;
pub use query::{build_multi_item_query, build_single_item_query, QueryBuilder, QueryKind};
pub use shape::{infer_component_shape, infer_shape, ContentShape, ShapeNode};
