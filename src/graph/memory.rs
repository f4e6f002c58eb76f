//! In-memory hypergraph engine with relation/endpoint indexing.
//!
//! Storage is `BTreeMap`-based: the core is single-threaded and traversal
//! results must be reproducible, so ordered maps replace the concurrent maps
//! a multi-threaded store would use. Secondary indexes (by
//! relation kind, by fact source, by fact target) are rebuilt after
//! deserialization rather than serialized.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::ident::{Uid, Uids};

use super::{
    label_matches, Direction, Hypergraph, BASE_COMPONENT, BASE_INTERFACE, CONNECTED_TO, HAS_A,
    HAS_INTERFACE, INSTANCE_OF, IS_A, PART_OF, SUBRELATION_OF,
};

/// A labeled node of the hypergraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Concept {
    label: String,
}

/// A labeled relation entry between two identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Fact {
    relation: Uid,
    source: Uid,
    target: Uid,
    #[serde(default)]
    label: String,
}

/// Endpoint types of a declared sub-relation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationSig {
    pub from: Uids,
    pub to: Uids,
}

/// The reference hypergraph engine.
///
/// Concepts and facts share one identifier namespace; fresh instance and fact
/// identifiers are allocated as `<class-or-relation-uid>::<n>` from a
/// persisted monotonic counter, so a reloaded graph continues where it left
/// off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryGraph {
    concepts: BTreeMap<Uid, Concept>,
    facts: BTreeMap<Uid, Fact>,
    signatures: BTreeMap<Uid, RelationSig>,
    next_id: u64,
    #[serde(skip)]
    by_relation: BTreeMap<Uid, Uids>,
    #[serde(skip)]
    by_source: BTreeMap<Uid, Uids>,
    #[serde(skip)]
    by_target: BTreeMap<Uid, Uids>,
}

/// Base concepts and relations every graph starts with, with their labels.
const BASE: &[(&str, &str)] = &[
    (BASE_COMPONENT, "Component"),
    (BASE_INTERFACE, "Interface"),
    (IS_A, "is-a"),
    (INSTANCE_OF, "instance-of"),
    (PART_OF, "part-of"),
    (HAS_A, "has-a"),
    (HAS_INTERFACE, "has-interface"),
    (CONNECTED_TO, "connected-to-interface"),
    (SUBRELATION_OF, "subrelation-of"),
];

impl MemoryGraph {
    /// Create an empty graph with the base concepts and relations installed.
    pub fn new() -> Self {
        let mut graph = MemoryGraph {
            concepts: BTreeMap::new(),
            facts: BTreeMap::new(),
            signatures: BTreeMap::new(),
            next_id: 0,
            by_relation: BTreeMap::new(),
            by_source: BTreeMap::new(),
            by_target: BTreeMap::new(),
        };
        graph.ensure_base();
        graph
    }

    /// Deserialize a graph from its YAML form and rebuild the indexes.
    pub fn from_yaml(text: &str) -> Result<Self, GraphError> {
        let mut graph: MemoryGraph =
            serde_yaml::from_str(text).map_err(|source| GraphError::Load { source })?;
        graph.reindex();
        graph.ensure_base();
        Ok(graph)
    }

    /// Serialize the graph to YAML.
    pub fn to_yaml(&self) -> Result<String, GraphError> {
        serde_yaml::to_string(self).map_err(|source| GraphError::Save { source })
    }

    /// Number of concepts (facts excluded).
    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }

    /// Number of facts.
    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    /// Declared endpoint types of a sub-relation, if any.
    pub fn relation_signature(&self, uid: &Uid) -> Option<&RelationSig> {
        self.signatures.get(uid)
    }

    fn ensure_base(&mut self) {
        for (uid, label) in BASE {
            let uid = Uid::from(*uid);
            if !self.concepts.contains_key(&uid) {
                self.concepts.insert(uid, Concept { label: (*label).to_owned() });
            }
        }
    }

    fn reindex(&mut self) {
        self.by_relation.clear();
        self.by_source.clear();
        self.by_target.clear();
        for (uid, fact) in &self.facts {
            self.by_relation
                .entry(fact.relation.clone())
                .or_default()
                .insert(uid.clone());
            self.by_source
                .entry(fact.source.clone())
                .or_default()
                .insert(uid.clone());
            self.by_target
                .entry(fact.target.clone())
                .or_default()
                .insert(uid.clone());
        }
    }

    fn alloc(&mut self, base: &Uid) -> Uid {
        self.next_id += 1;
        Uid::new(format!("{base}::{}", self.next_id))
    }

    /// Find an existing fact with the exact (relation, source, target) triple.
    fn find_fact(&self, relation: &str, source: &Uid, target: &Uid) -> Option<Uid> {
        let fact_uids = self.by_source.get(source)?;
        fact_uids
            .iter()
            .find(|fu| {
                self.facts.get(*fu).is_some_and(|f| {
                    f.relation.as_str() == relation && &f.target == target
                })
            })
            .cloned()
    }

    fn add_fact(&mut self, relation: &str, source: &Uid, target: &Uid, label: &str) -> Uid {
        let relation = Uid::from(relation);
        let uid = self.alloc(&relation);
        self.by_relation
            .entry(relation.clone())
            .or_default()
            .insert(uid.clone());
        self.by_source
            .entry(source.clone())
            .or_default()
            .insert(uid.clone());
        self.by_target
            .entry(target.clone())
            .or_default()
            .insert(uid.clone());
        self.facts.insert(
            uid.clone(),
            Fact {
                relation,
                source: source.clone(),
                target: target.clone(),
                label: label.to_owned(),
            },
        );
        uid
    }

    /// Add a fact unless an identical (relation, source, target) one exists.
    fn add_fact_once(&mut self, relation: &str, source: &Uid, target: &Uid) -> Uid {
        match self.find_fact(relation, source, target) {
            Some(existing) => existing,
            None => self.add_fact(relation, source, target, ""),
        }
    }

    /// Neighbors of `uids` across facts of one relation kind.
    ///
    /// `Forward` follows source to target, `Inverse` target to source; the
    /// label filter applies to the returned side.
    fn related(&self, uids: &Uids, relation: &str, dir: Direction, label: Option<&str>) -> Uids {
        let index = match dir {
            Direction::Forward => &self.by_source,
            Direction::Inverse => &self.by_target,
        };
        let mut out = Uids::new();
        for uid in uids {
            let Some(fact_uids) = index.get(uid) else {
                continue;
            };
            for fact_uid in fact_uids {
                let Some(fact) = self.facts.get(fact_uid) else {
                    continue;
                };
                if fact.relation.as_str() != relation {
                    continue;
                }
                let other = match dir {
                    Direction::Forward => &fact.target,
                    Direction::Inverse => &fact.source,
                };
                if label_matches(self.label_of(other), label) {
                    out.insert(other.clone());
                }
            }
        }
        out
    }
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Hypergraph for MemoryGraph {
    fn create(&mut self, uid: &Uid, label: &str) -> Uids {
        if !self.exists(uid) {
            self.concepts
                .insert(uid.clone(), Concept { label: label.to_owned() });
        }
        uid.singleton()
    }

    fn create_component(&mut self, uid: &Uid, label: &str, supers: &Uids) -> Uids {
        if self.exists(uid) {
            return uid.singleton();
        }
        self.create(uid, label);
        let mut all = supers.clone();
        all.insert(Uid::from(BASE_COMPONENT));
        self.is_a(&uid.singleton(), &all);
        uid.singleton()
    }

    fn create_interface(&mut self, uid: &Uid, label: &str, supers: &Uids) -> Uids {
        if self.exists(uid) {
            return uid.singleton();
        }
        self.create(uid, label);
        let mut all = supers.clone();
        all.insert(Uid::from(BASE_INTERFACE));
        self.is_a(&uid.singleton(), &all);
        uid.singleton()
    }

    fn create_subclass_of(&mut self, uid: &Uid, supers: &Uids, label: &str) -> Uids {
        if self.exists(uid) {
            return uid.singleton();
        }
        self.create(uid, label);
        self.is_a(&uid.singleton(), supers);
        uid.singleton()
    }

    fn is_a(&mut self, subs: &Uids, supers: &Uids) -> Uids {
        let mut out = Uids::new();
        for sub in subs {
            for sup in supers {
                out.insert(self.add_fact_once(IS_A, sub, sup));
            }
        }
        out
    }

    fn subrelation_from(&mut self, uid: &Uid, from: &Uids, to: &Uids, base: &Uid) -> Uids {
        if self.exists(uid) {
            return uid.singleton();
        }
        // The trailing identifier segment doubles as the relation label.
        let label = uid.as_str().rsplit("::").next().unwrap_or(uid.as_str());
        let label = label.to_owned();
        self.create(uid, &label);
        self.add_fact_once(SUBRELATION_OF, uid, base);
        self.signatures.insert(
            uid.clone(),
            RelationSig { from: from.clone(), to: to.clone() },
        );
        uid.singleton()
    }

    fn instantiate_from(&mut self, classes: &Uids, label: &str) -> Uids {
        let base = classes
            .iter()
            .next()
            .cloned()
            .unwrap_or_else(|| Uid::from(BASE_COMPONENT));
        let uid = self.alloc(&base);
        self.create(&uid, label);
        for class in classes {
            self.add_fact_once(INSTANCE_OF, &uid, class);
        }
        uid.singleton()
    }

    fn instantiate_component(&mut self, classes: &Uids, label: &str) -> Uids {
        let instance = self.instantiate_from(classes, label);
        // A component instance carries its own copies of the class's
        // interfaces; connections and aliases attach to the copies.
        let class_interfaces = self.interfaces_of(classes, None, Direction::Forward);
        for class_interface in &class_interfaces {
            let interface_label = self
                .label_of(class_interface)
                .unwrap_or_default()
                .to_owned();
            let mut interface_classes =
                self.instances_of(&class_interface.singleton(), None, Direction::Forward);
            if interface_classes.is_empty() {
                interface_classes.insert(Uid::from(BASE_INTERFACE));
            }
            let copy = self.instantiate_from(&interface_classes, &interface_label);
            self.has_interface(&instance, &copy);
        }
        instance
    }

    fn instantiate_interface_for(&mut self, owners: &Uids, class: &Uid, label: &str) -> Uids {
        let instance = self.instantiate_from(&class.singleton(), label);
        self.has_interface(owners, &instance);
        instance
    }

    fn instantiate_alias_interface_for(
        &mut self,
        owners: &Uids,
        originals: &Uids,
        label: &str,
    ) -> Uids {
        let mut classes = self.instances_of(originals, None, Direction::Forward);
        if classes.is_empty() {
            classes.insert(Uid::from(BASE_INTERFACE));
        }
        let alias = self.instantiate_from(&classes, label);
        self.has_interface(owners, &alias);
        for alias_uid in &alias {
            for original in originals {
                self.add_fact_once(crate::ident::ALIAS_OF, alias_uid, original);
            }
        }
        alias
    }

    fn part_of(&mut self, parts: &Uids, wholes: &Uids) -> Uids {
        let mut out = Uids::new();
        for part in parts {
            for whole in wholes {
                out.insert(self.add_fact_once(PART_OF, part, whole));
            }
        }
        out
    }

    fn has_interface(&mut self, owners: &Uids, ifaces: &Uids) -> Uids {
        let mut out = Uids::new();
        for owner in owners {
            for iface in ifaces {
                out.insert(self.add_fact_once(HAS_INTERFACE, owner, iface));
            }
        }
        out
    }

    fn connect_interface(&mut self, from: &Uids, to: &Uids) -> Uids {
        let mut out = Uids::new();
        for f in from {
            for t in to {
                out.insert(self.add_fact(CONNECTED_TO, f, t, ""));
            }
        }
        out
    }

    fn fact_from(&mut self, from: &Uids, to: &Uids, relation: &Uid) -> Uids {
        let mut out = Uids::new();
        for f in from {
            for t in to {
                out.insert(self.add_fact(relation.as_str(), f, t, ""));
            }
        }
        out
    }

    fn label_of(&self, uid: &Uid) -> Option<&str> {
        self.concepts
            .get(uid)
            .map(|c| c.label.as_str())
            .or_else(|| self.facts.get(uid).map(|f| f.label.as_str()))
    }

    fn update_label(&mut self, uid: &Uid, label: &str) {
        if let Some(concept) = self.concepts.get_mut(uid) {
            concept.label = label.to_owned();
        } else if let Some(fact) = self.facts.get_mut(uid) {
            fact.label = label.to_owned();
        }
    }

    fn direct_subclasses_of(&self, uids: &Uids, label: Option<&str>, dir: Direction) -> Uids {
        self.related(uids, IS_A, dir, label)
    }

    fn instances_of(&self, uids: &Uids, label: Option<&str>, dir: Direction) -> Uids {
        self.related(uids, INSTANCE_OF, dir, label)
    }

    fn facts_of(&self, uids: &Uids, label: Option<&str>, dir: Direction) -> Uids {
        let mut out = Uids::new();
        match dir {
            // Relation kind -> its facts, filtered by fact label.
            Direction::Inverse => {
                for relation in uids {
                    let Some(fact_uids) = self.by_relation.get(relation) else {
                        continue;
                    };
                    for fact_uid in fact_uids {
                        if label_matches(self.label_of(fact_uid), label) {
                            out.insert(fact_uid.clone());
                        }
                    }
                }
            }
            // Fact -> its relation kind.
            Direction::Forward => {
                for fact_uid in uids {
                    let Some(fact) = self.facts.get(fact_uid) else {
                        continue;
                    };
                    if label_matches(self.label_of(&fact.relation), label) {
                        out.insert(fact.relation.clone());
                    }
                }
            }
        }
        out
    }

    fn relations_from(&self, uids: &Uids, label: Option<&str>) -> Uids {
        let mut out = Uids::new();
        for uid in uids {
            let Some(fact_uids) = self.by_source.get(uid) else {
                continue;
            };
            for fact_uid in fact_uids {
                if label_matches(self.label_of(fact_uid), label) {
                    out.insert(fact_uid.clone());
                }
            }
        }
        out
    }

    fn relations_to(&self, uids: &Uids, label: Option<&str>) -> Uids {
        let mut out = Uids::new();
        for uid in uids {
            let Some(fact_uids) = self.by_target.get(uid) else {
                continue;
            };
            for fact_uid in fact_uids {
                if label_matches(self.label_of(fact_uid), label) {
                    out.insert(fact_uid.clone());
                }
            }
        }
        out
    }

    fn fact_source(&self, fact: &Uid) -> Option<Uid> {
        self.facts.get(fact).map(|f| f.source.clone())
    }

    fn fact_target(&self, fact: &Uid) -> Option<Uid> {
        self.facts.get(fact).map(|f| f.target.clone())
    }

    fn fact_relation(&self, fact: &Uid) -> Option<Uid> {
        self.facts.get(fact).map(|f| f.relation.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(raw: &str) -> Uid {
        Uid::from(raw)
    }

    #[test]
    fn create_is_idempotent_and_keeps_the_first_label() {
        let mut g = MemoryGraph::new();
        g.create(&uid("X"), "first");
        g.create(&uid("X"), "second");
        assert_eq!(g.label_of(&uid("X")), Some("first"));
    }

    #[test]
    fn is_a_deduplicates_per_pair() {
        let mut g = MemoryGraph::new();
        g.create(&uid("A"), "a");
        g.create(&uid("B"), "b");
        let first = g.is_a(&uid("A").singleton(), &uid("B").singleton());
        let second = g.is_a(&uid("A").singleton(), &uid("B").singleton());
        assert_eq!(first, second);
        assert_eq!(g.fact_count(), 1);
    }

    #[test]
    fn subclass_closure_includes_the_seed() {
        let mut g = MemoryGraph::new();
        g.create(&uid("Top"), "top");
        g.create_subclass_of(&uid("Mid"), &uid("Top").singleton(), "mid");
        g.create_subclass_of(&uid("Leaf"), &uid("Mid").singleton(), "leaf");

        let up = g.subclasses_of(&uid("Leaf").singleton(), None, Direction::Forward);
        assert!(up.contains("Leaf"));
        assert!(up.contains("Mid"));
        assert!(up.contains("Top"));

        let down = g.subclasses_of(&uid("Top").singleton(), None, Direction::Inverse);
        assert!(down.contains("Mid"));
        assert!(down.contains("Leaf"));
    }

    #[test]
    fn connect_interface_never_deduplicates() {
        let mut g = MemoryGraph::new();
        g.create(&uid("p"), "p");
        g.create(&uid("q"), "q");
        let first = g.connect_interface(&uid("p").singleton(), &uid("q").singleton());
        let second = g.connect_interface(&uid("p").singleton(), &uid("q").singleton());
        assert_ne!(first, second);
        let facts = g.facts_of(&uid(CONNECTED_TO).singleton(), None, Direction::Inverse);
        assert_eq!(facts.len(), 2);
    }

    #[test]
    fn facts_carry_labels_and_relation_kinds() {
        let mut g = MemoryGraph::new();
        g.create(&uid("rel"), "rel");
        g.create(&uid("a"), "a");
        g.create(&uid("b"), "b");
        let facts = g.fact_from(&uid("a").singleton(), &uid("b").singleton(), &uid("rel"));
        let fact = facts.iter().next().unwrap();
        g.update_label(fact, "edge1");

        assert_eq!(g.label_of(fact), Some("edge1"));
        assert_eq!(
            g.facts_of(&uid("rel").singleton(), Some("edge1"), Direction::Inverse),
            facts
        );
        assert_eq!(
            g.facts_of(&fact.singleton(), None, Direction::Forward),
            uid("rel").singleton()
        );
        assert_eq!(g.fact_source(fact), Some(uid("a")));
        assert_eq!(g.fact_target(fact), Some(uid("b")));
    }

    #[test]
    fn instances_and_parts_answer_the_derived_queries() {
        let mut g = MemoryGraph::new();
        g.create(&uid("Class"), "class");
        g.create(&uid("Whole"), "whole");
        let inst = g.instantiate_component(&uid("Class").singleton(), "inner");
        g.part_of(&inst, &uid("Whole").singleton());

        assert_eq!(
            g.instances_of(&inst, None, Direction::Forward),
            uid("Class").singleton()
        );
        assert_eq!(g.components_of(&uid("Whole").singleton(), None), inst);
        assert_eq!(g.components_of(&uid("Whole").singleton(), Some("inner")), inst);
        assert!(g
            .components_of(&uid("Whole").singleton(), Some("other"))
            .is_empty());
    }

    #[test]
    fn component_instances_copy_the_class_interfaces() {
        let mut g = MemoryGraph::new();
        g.create(&uid("IfClass"), "ifclass");
        g.create(&uid("Template"), "template");
        g.instantiate_interface_for(&uid("Template").singleton(), &uid("IfClass"), "p");

        let part = g.instantiate_component(&uid("Template").singleton(), "part");
        let copies = g.interfaces_of(&part, Some("p"), Direction::Forward);
        assert_eq!(copies.len(), 1);
        // The copy is classed like the original, not owned by the template.
        let copy = copies.iter().next().unwrap();
        assert_eq!(
            g.instances_of(&copy.singleton(), None, Direction::Forward),
            uid("IfClass").singleton()
        );
        assert!(g
            .interfaces_of(&uid("Template").singleton(), Some("p"), Direction::Forward)
            .is_disjoint(&copies));
    }

    #[test]
    fn interface_ownership_is_queryable_both_ways() {
        let mut g = MemoryGraph::new();
        g.create(&uid("IfClass"), "ifclass");
        g.create(&uid("Owner"), "owner");
        let iface = g.instantiate_interface_for(&uid("Owner").singleton(), &uid("IfClass"), "p");

        assert_eq!(
            g.interfaces_of(&uid("Owner").singleton(), Some("p"), Direction::Forward),
            iface
        );
        assert_eq!(
            g.interfaces_of(&iface, None, Direction::Inverse),
            uid("Owner").singleton()
        );
    }

    #[test]
    fn yaml_round_trip_preserves_structure_and_allocator() {
        let mut g = MemoryGraph::new();
        g.create(&uid("Class"), "class");
        let inst = g.instantiate_from(&uid("Class").singleton(), "one");

        let text = g.to_yaml().unwrap();
        let mut reloaded = MemoryGraph::from_yaml(&text).unwrap();

        assert_eq!(
            reloaded.instances_of(&inst, None, Direction::Forward),
            uid("Class").singleton()
        );
        // The allocator continues instead of reusing identifiers.
        let fresh = reloaded.instantiate_from(&uid("Class").singleton(), "two");
        assert!(fresh.is_disjoint(&inst));
    }
}
