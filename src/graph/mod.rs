//! Typed hypergraph adapter: the capability surface the transformation
//! consumes from a hypergraph engine.
//!
//! Everything in the graph is addressed by a [`Uid`]. A *concept* is an
//! identified, labeled node. A *fact* is an identified, labeled entry of some
//! relation kind between a source and a target; facts live in the same
//! identifier namespace as concepts, so a fact can itself anchor further
//! facts (configuration attached to an edge relies on this).
//!
//! The [`Hypergraph`] trait is the full contract; [`MemoryGraph`] is the
//! in-memory reference engine behind it. Derived queries (`components_of`,
//! `interfaces_of`, `configs_of`, `original_interfaces_of`, the transitive
//! sub-class closure) are provided as default methods over the primitives.

pub mod memory;

pub use memory::MemoryGraph;

use std::collections::VecDeque;

use crate::ident::{Uid, Uids, ALIAS_OF, HAS_CONFIG};

// ---------------------------------------------------------------------------
// Base concepts and relations
// ---------------------------------------------------------------------------
//
// Engine-level identifiers carry the `Graph::` prefix so they can never
// collide with catalog-derived identifiers (`Component::...`, `Relation::<kind>`).

/// Base class of every component concept.
pub const BASE_COMPONENT: &str = "Graph::Component";
/// Base class of every interface concept.
pub const BASE_INTERFACE: &str = "Graph::Interface";
/// The sub-class relation. `create_subclass_of` and `is_a` both produce facts
/// of this kind; the class hierarchy queries traverse it.
pub const IS_A: &str = "Graph::IsA";
/// The class-membership relation produced by the `instantiate_*` family.
pub const INSTANCE_OF: &str = "Graph::InstanceOf";
/// Part/whole relation between an instance and its enclosing concept.
pub const PART_OF: &str = "Graph::PartOf";
/// Base ownership relation; domain-specific relation kinds derive from it.
pub const HAS_A: &str = "Graph::HasA";
/// Ownership of an interface by a component.
pub const HAS_INTERFACE: &str = "Graph::HasInterface";
/// Connection between two interfaces.
pub const CONNECTED_TO: &str = "Graph::ConnectedToInterface";
/// Declares one relation kind a refinement of another.
pub const SUBRELATION_OF: &str = "Graph::SubrelationOf";

/// Traversal direction selector.
///
/// `Forward` walks toward classes (instance to class, sub-class to
/// super-class, fact to relation kind, owner to interface); `Inverse` walks
/// the opposite way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

// ---------------------------------------------------------------------------
// Capability trait
// ---------------------------------------------------------------------------

/// The operations the import/export engines require from a hypergraph.
///
/// All operations are synchronous and deterministic: query results are
/// [`Uids`] sets that iterate in lexicographic identifier order. Creation with
/// an already-existing identifier is a no-op returning the existing concept,
/// which is what makes repeated imports idempotent.
pub trait Hypergraph {
    // -- concept creation ---------------------------------------------------

    /// Create a plain concept. No-op if `uid` already exists.
    fn create(&mut self, uid: &Uid, label: &str) -> Uids;

    /// Create a component class below the given super-classes (and the base
    /// component class). No-op if `uid` already exists.
    fn create_component(&mut self, uid: &Uid, label: &str, supers: &Uids) -> Uids;

    /// Create an interface class below the given super-classes (and the base
    /// interface class). No-op if `uid` already exists.
    fn create_interface(&mut self, uid: &Uid, label: &str, supers: &Uids) -> Uids;

    /// Create a concept as a direct sub-class of each of `supers`.
    fn create_subclass_of(&mut self, uid: &Uid, supers: &Uids, label: &str) -> Uids;

    /// Add sub-class facts from each of `subs` to each of `supers`.
    /// Idempotent per (source, target) pair.
    fn is_a(&mut self, subs: &Uids, supers: &Uids) -> Uids;

    /// Declare `uid` a sub-relation of `base` between the given endpoint
    /// types. No-op if `uid` already exists.
    fn subrelation_from(&mut self, uid: &Uid, from: &Uids, to: &Uids, base: &Uid) -> Uids;

    // -- instantiation ------------------------------------------------------

    /// Create a fresh instance concept of each of `classes`.
    fn instantiate_from(&mut self, classes: &Uids, label: &str) -> Uids;

    /// Create a fresh component instance of each of `classes`, together with
    /// the instance's own copies of the class interfaces.
    fn instantiate_component(&mut self, classes: &Uids, label: &str) -> Uids;

    /// Create an interface instance of `class` owned by each of `owners`.
    fn instantiate_interface_for(&mut self, owners: &Uids, class: &Uid, label: &str) -> Uids;

    /// Create an alias interface on `owners` standing for `originals`.
    ///
    /// The alias is an instance of the originals' classes and carries one
    /// alias fact per original.
    fn instantiate_alias_interface_for(
        &mut self,
        owners: &Uids,
        originals: &Uids,
        label: &str,
    ) -> Uids;

    // -- fact creation ------------------------------------------------------

    /// Add part/whole facts. Idempotent per (part, whole) pair.
    fn part_of(&mut self, parts: &Uids, wholes: &Uids) -> Uids;

    /// Add interface-ownership facts. Idempotent per (owner, iface) pair.
    fn has_interface(&mut self, owners: &Uids, ifaces: &Uids) -> Uids;

    /// Create a connection fact for each (from, to) interface pair.
    /// Never deduplicates; callers look up existing connections by label.
    fn connect_interface(&mut self, from: &Uids, to: &Uids) -> Uids;

    /// Create a fact of `relation` for each (from, to) pair.
    /// Never deduplicates; callers look up existing facts by label.
    fn fact_from(&mut self, from: &Uids, to: &Uids, relation: &Uid) -> Uids;

    // -- labels -------------------------------------------------------------

    /// Label of a concept or fact, if it exists.
    fn label_of(&self, uid: &Uid) -> Option<&str>;

    /// Overwrite the label of an existing concept or fact.
    fn update_label(&mut self, uid: &Uid, label: &str);

    /// Whether a concept or fact with this identifier exists.
    fn exists(&self, uid: &Uid) -> bool {
        self.label_of(uid).is_some()
    }

    // -- primitive queries --------------------------------------------------

    /// Direct sub-class neighbors. `Forward` yields super-classes, `Inverse`
    /// sub-classes; results are filtered by concept label when given.
    fn direct_subclasses_of(&self, uids: &Uids, label: Option<&str>, dir: Direction) -> Uids;

    /// Direct instance-of neighbors. `Forward` yields the classes of the
    /// given instances, `Inverse` the instances of the given classes.
    fn instances_of(&self, uids: &Uids, label: Option<&str>, dir: Direction) -> Uids;

    /// `Inverse`: the facts of the given relation kinds, filtered by fact
    /// label. `Forward`: the relation kinds of the given facts.
    fn facts_of(&self, uids: &Uids, label: Option<&str>, dir: Direction) -> Uids;

    /// Facts whose source is one of `uids`, filtered by fact label.
    fn relations_from(&self, uids: &Uids, label: Option<&str>) -> Uids;

    /// Facts whose target is one of `uids`, filtered by fact label.
    fn relations_to(&self, uids: &Uids, label: Option<&str>) -> Uids;

    /// Source endpoint of a fact.
    fn fact_source(&self, fact: &Uid) -> Option<Uid>;

    /// Target endpoint of a fact.
    fn fact_target(&self, fact: &Uid) -> Option<Uid>;

    /// Relation kind of a fact.
    fn fact_relation(&self, fact: &Uid) -> Option<Uid>;

    // -- derived queries ----------------------------------------------------

    /// Reflexive-transitive sub-class closure of `uids`, filtered by label.
    ///
    /// `Forward` collects all super-classes (the seed set included), which is
    /// the closure the export engine intersects against the upper concepts.
    fn subclasses_of(&self, uids: &Uids, label: Option<&str>, dir: Direction) -> Uids {
        let mut visited: Uids = uids.clone();
        let mut queue: VecDeque<Uid> = uids.iter().cloned().collect();
        while let Some(current) = queue.pop_front() {
            for next in self.direct_subclasses_of(&current.singleton(), None, dir) {
                if visited.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }
        match label {
            None => visited,
            Some(want) => visited
                .into_iter()
                .filter(|u| self.label_of(u) == Some(want))
                .collect(),
        }
    }

    /// Sub-component instances that are `part-of` one of `wholes`.
    fn components_of(&self, wholes: &Uids, label: Option<&str>) -> Uids {
        let mut out = Uids::new();
        for fact in self.facts_of(&Uid::from(PART_OF).singleton(), None, Direction::Inverse) {
            let (Some(source), Some(target)) = (self.fact_source(&fact), self.fact_target(&fact))
            else {
                continue;
            };
            if wholes.contains(&target) && label_matches(self.label_of(&source), label) {
                out.insert(source);
            }
        }
        out
    }

    /// Interfaces owned by `uids` (`Forward`) or owners of the interfaces in
    /// `uids` (`Inverse`), filtered by the label of the returned side.
    fn interfaces_of(&self, uids: &Uids, label: Option<&str>, dir: Direction) -> Uids {
        let mut out = Uids::new();
        for fact in self.facts_of(&Uid::from(HAS_INTERFACE).singleton(), None, Direction::Inverse) {
            let (Some(owner), Some(iface)) = (self.fact_source(&fact), self.fact_target(&fact))
            else {
                continue;
            };
            let (anchor, found) = match dir {
                Direction::Forward => (owner, iface),
                Direction::Inverse => (iface, owner),
            };
            if uids.contains(&anchor) && label_matches(self.label_of(&found), label) {
                out.insert(found);
            }
        }
        out
    }

    /// Configuration concepts attached to `uids`.
    fn configs_of(&self, uids: &Uids, label: Option<&str>) -> Uids {
        let mut out = Uids::new();
        for fact in self.facts_of(&Uid::from(HAS_CONFIG).singleton(), None, Direction::Inverse) {
            let (Some(owner), Some(config)) = (self.fact_source(&fact), self.fact_target(&fact))
            else {
                continue;
            };
            if uids.contains(&owner) && label_matches(self.label_of(&config), label) {
                out.insert(config);
            }
        }
        out
    }

    /// The original interfaces an alias in `uids` stands for.
    fn original_interfaces_of(&self, uids: &Uids, label: Option<&str>) -> Uids {
        let mut out = Uids::new();
        for fact in self.facts_of(&Uid::from(ALIAS_OF).singleton(), None, Direction::Inverse) {
            let (Some(alias), Some(original)) = (self.fact_source(&fact), self.fact_target(&fact))
            else {
                continue;
            };
            if uids.contains(&alias) && label_matches(self.label_of(&original), label) {
                out.insert(original);
            }
        }
        out
    }
}

fn label_matches(found: Option<&str>, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(want) => found == Some(want),
    }
}
