//! # modelgraph
//!
//! A bidirectional bridge between a robotic component catalog and a typed
//! hypergraph knowledge base. Component descriptions — keyed on
//! (domain, type, name, version) — are imported into a hypergraph as a
//! meta-model extension of classes, instances, part/whole structure,
//! interfaces and configuration blobs, and exported back into an equivalent
//! document by traversal.
//!
//! ## Architecture
//!
//! - **Identifiers** (`ident`): deterministic `::`-path identifiers derived
//!   from semantic role tuples; repeated imports are idempotent lookups
//! - **Graph adapter** (`graph`): the capability trait a hypergraph engine
//!   must provide, plus the in-memory reference engine
//! - **Meta-model** (`meta`): fixed upper concepts and the embedded
//!   SOFTWARE / COMPUTATION domain models, installed idempotently
//! - **Transformation** (`model`, with the import/export engines): the
//!   document ⇄ hypergraph mapping itself
//!
//! ## Library usage
//!
//! ```
//! use modelgraph::ident::component_uid;
//! use modelgraph::Model;
//!
//! let mut model = Model::new();
//! let ok = model
//!     .import("domain: SOFTWARE\ntype: Task\nname: Foo\nversions:\n  - name: v1\n")
//!     .unwrap();
//! assert!(ok);
//!
//! let document = model.export(&component_uid("SOFTWARE", "Foo", "")).unwrap();
//! assert!(document.contains("Foo"));
//! ```

pub mod document;
pub mod error;
pub mod graph;
pub mod ident;
pub mod meta;
pub mod model;

mod export;
mod import;

pub use error::{ModelError, ModelResult};
pub use graph::{Direction, Hypergraph, MemoryGraph};
pub use ident::{Uid, Uids};
pub use model::Model;
