//! Meta-model bootstrap: fixed upper concepts and embedded domain models.
//!
//! [`install`] runs once per [`crate::model::Model`] construction, on fresh
//! and on loaded hypergraphs alike. Every operation resolves by deterministic
//! identifier and creation of an existing concept is a no-op, so running the
//! bootstrap again over an already-populated graph changes nothing.

use crate::graph::{Hypergraph, HAS_A};
use crate::ident::{
    self, domain_uid, Uid, Uids, ALIAS_OF, COMPONENT, COMPONENT_TYPE, CONFIGURATION, DOMAIN,
    HAS_CONFIG, INTERFACE, INTERFACE_DIRECTION, INTERFACE_TYPE, RELATION,
};

// ---------------------------------------------------------------------------
// Embedded domain meta-models
// ---------------------------------------------------------------------------
//
// The two built-in views a catalog component can belong to. A model in the
// SOFTWARE domain is also a software-graph algorithm; a model in the
// COMPUTATION domain is a device, processor or bus of a hardware
// computational network. The bootstrap copies both meta-models into every
// graph as peers and the import engine adds cross-domain `is-a` edges where
// the catalog calls for them.

/// Software-graph concept every SOFTWARE component model derives from.
pub const SW_ALGORITHM: &str = "Software::Algorithm";
/// Software-graph interface concept.
pub const SW_INTERFACE: &str = "Software::Interface";
/// Software-graph input interface concept.
pub const SW_INPUT: &str = "Software::Input";
/// Software-graph output interface concept.
pub const SW_OUTPUT: &str = "Software::Output";

/// Hardware computational network device concept.
pub const HW_DEVICE: &str = "Hardware::Device";
/// Processor concept of the hardware computational network.
pub const HW_PROCESSOR: &str = "Hardware::Processor";
/// Bus concept of the hardware computational network.
pub const HW_BUS: &str = "Hardware::Bus";
/// Hardware interface concept.
pub const HW_INTERFACE: &str = "Hardware::Interface";

/// The well-known domain name mapped onto the software graph.
pub const SOFTWARE_DOMAIN: &str = "SOFTWARE";
/// The well-known domain name mapped onto the computational network.
pub const COMPUTATION_DOMAIN: &str = "COMPUTATION";

fn install_software_graph<G: Hypergraph>(graph: &mut G) {
    graph.create_component(&Uid::from(SW_ALGORITHM), "Algorithm", &Uids::new());
    graph.create_interface(&Uid::from(SW_INTERFACE), "Interface", &Uids::new());
    graph.create_interface(
        &Uid::from(SW_INPUT),
        "Input",
        &Uid::from(SW_INTERFACE).singleton(),
    );
    graph.create_interface(
        &Uid::from(SW_OUTPUT),
        "Output",
        &Uid::from(SW_INTERFACE).singleton(),
    );
}

fn install_computational_network<G: Hypergraph>(graph: &mut G) {
    graph.create_component(&Uid::from(HW_DEVICE), "Device", &Uids::new());
    graph.create_component(
        &Uid::from(HW_PROCESSOR),
        "Processor",
        &Uid::from(HW_DEVICE).singleton(),
    );
    graph.create_component(
        &Uid::from(HW_BUS),
        "Bus",
        &Uid::from(HW_DEVICE).singleton(),
    );
    graph.create_interface(&Uid::from(HW_INTERFACE), "Interface", &Uids::new());
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

/// Install the fixed upper concepts and the embedded domain meta-models.
pub fn install<G: Hypergraph>(graph: &mut G) {
    install_software_graph(graph);
    install_computational_network(graph);

    // The domain marks the view a component belongs to. It is a class but
    // not a component class; configurations are not components either.
    graph.create(&Uid::from(DOMAIN), "Domain");
    graph.create(&Uid::from(CONFIGURATION), "Config");
    graph.create(&Uid::from(RELATION), "Relation");

    graph.create_component(&Uid::from(COMPONENT), "Component", &Uids::new());
    graph.create_component(
        &Uid::from(COMPONENT_TYPE),
        "Type",
        &Uid::from(COMPONENT).singleton(),
    );

    graph.create_interface(&Uid::from(INTERFACE), "Interface", &Uids::new());
    graph.create_interface(
        &Uid::from(INTERFACE_DIRECTION),
        "Direction",
        &Uid::from(INTERFACE).singleton(),
    );
    graph.create_interface(
        &Uid::from(INTERFACE_TYPE),
        "Type",
        &Uid::from(INTERFACE).singleton(),
    );

    graph.subrelation_from(
        &Uid::from(HAS_CONFIG),
        &Uid::from(COMPONENT).singleton(),
        &Uid::from(CONFIGURATION).singleton(),
        &Uid::from(HAS_A),
    );
    graph.subrelation_from(
        &Uid::from(ALIAS_OF),
        &Uid::from(INTERFACE).singleton(),
        &Uid::from(INTERFACE).singleton(),
        &Uid::from(HAS_A),
    );

    // Expected domains exist up front; further ones appear on first import.
    graph.create_subclass_of(
        &domain_uid(SOFTWARE_DOMAIN),
        &Uid::from(DOMAIN).singleton(),
        SOFTWARE_DOMAIN,
    );
    graph.create_subclass_of(
        &domain_uid(COMPUTATION_DOMAIN),
        &Uid::from(DOMAIN).singleton(),
        COMPUTATION_DOMAIN,
    );
}

/// Whether a direction class stands for an input-capable interface.
pub fn is_input(direction_uid: &Uid) -> bool {
    ident::interface_uid("", "INCOMING").as_ref() == Some(direction_uid)
        || ident::interface_uid("", "BIDIRECTIONAL").as_ref() == Some(direction_uid)
}

/// Whether a direction class stands for an output-capable interface.
pub fn is_output(direction_uid: &Uid) -> bool {
    ident::interface_uid("", "OUTGOING").as_ref() == Some(direction_uid)
        || ident::interface_uid("", "BIDIRECTIONAL").as_ref() == Some(direction_uid)
}

/// Whether a domain marker is the software domain.
pub fn in_software_domain(domain: &Uid) -> bool {
    domain == &domain_uid(SOFTWARE_DOMAIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Direction, Hypergraph, MemoryGraph};

    #[test]
    fn bootstrap_installs_every_upper_concept_once() {
        let mut graph = MemoryGraph::new();
        install(&mut graph);

        for uid in [
            DOMAIN,
            COMPONENT,
            COMPONENT_TYPE,
            INTERFACE,
            INTERFACE_DIRECTION,
            INTERFACE_TYPE,
            RELATION,
            CONFIGURATION,
            HAS_CONFIG,
            ALIAS_OF,
            SW_ALGORITHM,
            HW_DEVICE,
        ] {
            assert!(graph.exists(&Uid::from(uid)), "missing {uid}");
        }
    }

    #[test]
    fn bootstrap_is_idempotent() {
        let mut graph = MemoryGraph::new();
        install(&mut graph);
        let concepts = graph.concept_count();
        let facts = graph.fact_count();

        install(&mut graph);
        assert_eq!(graph.concept_count(), concepts);
        assert_eq!(graph.fact_count(), facts);
    }

    #[test]
    fn known_domains_are_direct_subclasses_of_domain() {
        let mut graph = MemoryGraph::new();
        install(&mut graph);

        let domains =
            graph.direct_subclasses_of(&Uid::from(DOMAIN).singleton(), None, Direction::Inverse);
        assert!(domains.contains(domain_uid(SOFTWARE_DOMAIN).as_str()));
        assert!(domains.contains(domain_uid(COMPUTATION_DOMAIN).as_str()));
    }

    #[test]
    fn direction_predicates_cover_bidirectional() {
        let incoming = ident::interface_uid("", "INCOMING").unwrap();
        let outgoing = ident::interface_uid("", "OUTGOING").unwrap();
        let both = ident::interface_uid("", "BIDIRECTIONAL").unwrap();

        assert!(is_input(&incoming) && !is_output(&incoming));
        assert!(!is_input(&outgoing) && is_output(&outgoing));
        assert!(is_input(&both) && is_output(&both));
    }
}
