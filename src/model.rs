//! The component-model view over a hypergraph.
//!
//! [`Model`] owns a graph (any [`Hypergraph`] implementation, the in-memory
//! engine by default) and runs the meta-model bootstrap on construction, so
//! both fresh and freshly-loaded graphs carry the upper concepts before any
//! import or export touches them. The import and export engines are
//! `impl` blocks on this type in their own modules.

use crate::graph::{Hypergraph, MemoryGraph, HAS_A};
use crate::ident::{relation_uid, Uid, Uids, COMPONENT, CONFIGURATION, HAS_CONFIG, RELATION};
use crate::meta;

/// A component catalog mapped onto a hypergraph.
#[derive(Debug)]
pub struct Model<G = MemoryGraph> {
    graph: G,
}

impl Model<MemoryGraph> {
    /// A model over a fresh in-memory hypergraph.
    pub fn new() -> Self {
        Model::from_graph(MemoryGraph::new())
    }
}

impl Default for Model<MemoryGraph> {
    fn default() -> Self {
        Model::new()
    }
}

impl<G: Hypergraph> Model<G> {
    /// Wrap an existing hypergraph, installing the meta-model if absent.
    pub fn from_graph(mut graph: G) -> Self {
        meta::install(&mut graph);
        Model { graph }
    }

    /// Shared access to the underlying hypergraph.
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// Mutable access to the underlying hypergraph.
    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph
    }

    /// Unwrap into the underlying hypergraph.
    pub fn into_graph(self) -> G {
        self.graph
    }

    /// Declare a domain-specific edge relation kind.
    ///
    /// Registers `Relation::<kind>` as a component-to-component sub-relation
    /// of `has-a` and a sub-class of the `Relation` upper concept. Imported
    /// documents may only use edge types that have been declared, either here
    /// or by an earlier import of the domain database.
    pub fn register_relation(&mut self, kind: &str) -> Uid {
        let uid = relation_uid(kind);
        self.graph.subrelation_from(
            &uid,
            &Uid::from(COMPONENT).singleton(),
            &Uid::from(COMPONENT).singleton(),
            &Uid::from(HAS_A),
        );
        self.graph
            .is_a(&uid.singleton(), &Uid::from(RELATION).singleton());
        uid
    }

    /// Attach a configuration blob to `owner`, keeping at most one.
    ///
    /// A first configuration is created as an instance of the configuration
    /// upper concept; applying another one to the same owner overwrites the
    /// existing blob's label instead of adding a second concept.
    pub(crate) fn instantiate_config_once(&mut self, owner: &Uid, data: &str) -> Uids {
        let existing = self.graph.configs_of(&owner.singleton(), None);
        if existing.is_empty() {
            let config = self
                .graph
                .instantiate_from(&Uid::from(CONFIGURATION).singleton(), data);
            self.graph
                .fact_from(&owner.singleton(), &config, &Uid::from(HAS_CONFIG));
            return config;
        }
        for config in &existing {
            self.graph.update_label(config, data);
        }
        Uids::new()
    }
}
