//! Import engine: materialize a component document in the hypergraph.
//!
//! Import is strictly additive. Classes are installed before their instances,
//! sub-components before the edges that reference them, interfaces after
//! sub-components (aliases point into them) and configurations last within
//! each scope. Everything resolves by deterministic identifier first, so
//! re-importing a document finds what an earlier run created instead of
//! duplicating it; the one mutation applied to pre-existing concepts is the
//! configuration label overwrite.
//!
//! Recoverable problems — unknown template models, unknown relation kinds,
//! malformed edges or interfaces — are logged and skipped. Only missing
//! required top-level fields make the import report failure.

use tracing::warn;

use crate::document::{ComponentsSection, Document, EdgeEntry, InterfaceEntry, VersionEntry};
use crate::error::ModelError;
use crate::graph::{Direction, Hypergraph, CONNECTED_TO};
use crate::ident::{
    component_uid, domain_uid, interface_uid, relation_uid, type_uid, Uid, Uids,
    COMPONENT_TYPE, DOMAIN, INTERFACE_DIRECTION, INTERFACE_TYPE,
};
use crate::meta::{self, SW_ALGORITHM, SW_INPUT, SW_INTERFACE, SW_OUTPUT};
use crate::model::Model;

impl<G: Hypergraph> Model<G> {
    /// Import a serialized component document.
    ///
    /// Returns `Ok(false)` when a required top-level field (`domain`, `type`,
    /// `name`, `versions`) is missing; `Err` only when the text is not
    /// parseable YAML. The hypergraph is left a valid superset of its prior
    /// state on every return.
    pub fn import(&mut self, text: &str) -> Result<bool, ModelError> {
        let doc = Document::from_yaml(text)?;

        for (field, value) in [
            ("domain", &doc.domain),
            ("type", &doc.type_name),
            ("name", &doc.name),
        ] {
            if value.is_empty() {
                warn!(field, "document is missing a required field");
                return Ok(false);
            }
        }
        let Some(versions) = &doc.versions else {
            warn!(field = "versions", "document is missing a required field");
            return Ok(false);
        };

        // Domain, type and the un-versioned component class. The domain is
        // related to the component via is-a; domain and type are orthogonal.
        let dom_uid = domain_uid(&doc.domain);
        self.graph_mut()
            .create_subclass_of(&dom_uid, &Uid::from(DOMAIN).singleton(), &doc.domain);
        let ty_uid = type_uid(&doc.type_name);
        self.graph_mut().create_component(
            &ty_uid,
            &doc.type_name,
            &Uid::from(COMPONENT_TYPE).singleton(),
        );
        let super_uid = component_uid(&doc.domain, &doc.name, "");
        self.graph_mut()
            .create_component(&super_uid, &doc.name, &ty_uid.singleton());
        self.graph_mut()
            .is_a(&super_uid.singleton(), &dom_uid.singleton());
        if meta::in_software_domain(&dom_uid) {
            self.graph_mut()
                .is_a(&super_uid.singleton(), &Uid::from(SW_ALGORITHM).singleton());
        }

        for version in versions {
            self.import_version(&doc, &dom_uid, &super_uid, version);
        }

        Ok(true)
    }

    fn import_version(
        &mut self,
        doc: &Document,
        dom_uid: &Uid,
        super_uid: &Uid,
        version: &VersionEntry,
    ) {
        let model_uid = component_uid(&doc.domain, &doc.name, &version.name);
        self.graph_mut()
            .create_component(&model_uid, &version.name, &super_uid.singleton());

        let mut valid_nodes = Uids::new();
        if let Some(components) = &version.components {
            valid_nodes = self.import_nodes(&model_uid, components);
            let valid_edges = self.import_edges(&valid_nodes, components);
            if let Some(config) = &components.configuration {
                for entry in &config.nodes {
                    for owner in self.labeled(&valid_nodes, &entry.name) {
                        self.instantiate_config_once(&owner, &entry.data);
                    }
                }
                for entry in &config.edges {
                    for owner in self.labeled(&valid_edges, &entry.name) {
                        self.instantiate_config_once(&owner, &entry.data);
                    }
                }
            }
        }

        for iface in &version.interfaces {
            self.import_interface(dom_uid, &model_uid, &valid_nodes, iface);
        }

        if let Some(default_config) = &version.default_configuration {
            self.instantiate_config_once(&model_uid, &default_config.data);
        }
    }

    /// Instantiate the declared sub-components, re-using parts that already
    /// exist under the version concept. Returns the set of usable parts.
    fn import_nodes(&mut self, model_uid: &Uid, components: &ComponentsSection) -> Uids {
        let mut valid_nodes = Uids::new();
        for node in &components.nodes {
            let mut part_uids = self
                .graph()
                .components_of(&model_uid.singleton(), Some(&node.name));
            if part_uids.is_empty() {
                let template_uid = component_uid(
                    &node.model.domain,
                    &node.model.name,
                    &node.model.version,
                );
                if !self.graph().exists(&template_uid) {
                    warn!(
                        node = %node.name,
                        template = %template_uid,
                        "cannot find model for sub-component, skipping"
                    );
                    continue;
                }
                part_uids = self
                    .graph_mut()
                    .instantiate_component(&template_uid.singleton(), &node.name);
                self.graph_mut()
                    .part_of(&part_uids, &model_uid.singleton());
            }
            valid_nodes.extend(part_uids);
        }
        valid_nodes
    }

    /// Materialize the declared edges between parts. Returns the set of
    /// facts (found or created) usable as configuration owners.
    fn import_edges(&mut self, valid_nodes: &Uids, components: &ComponentsSection) -> Uids {
        let mut valid_edges = Uids::new();
        for edge in &components.edges {
            let (Some(from), Some(to)) = (&edge.from, &edge.to) else {
                warn!(edge = %edge.name, "edge has no from or to entry, skipping");
                continue;
            };
            if edge.is_inter_domain() {
                self.import_relation_edge(valid_nodes, edge, &mut valid_edges);
            } else {
                let (Some(from_iface), Some(to_iface)) =
                    (from.interface.as_deref(), to.interface.as_deref())
                else {
                    warn!(
                        edge = %edge.name,
                        "interface connection lacks an interface on one side, skipping"
                    );
                    continue;
                };
                self.import_connection_edge(valid_nodes, edge, from_iface, to_iface, &mut valid_edges);
            }
        }
        valid_edges
    }

    /// An edge with a type is a direct fact of the named relation kind.
    fn import_relation_edge(&mut self, valid_nodes: &Uids, edge: &EdgeEntry, valid_edges: &mut Uids) {
        // Guarded by the caller: an inter-domain edge always has endpoints
        // and a type.
        let (Some(from), Some(to)) = (&edge.from, &edge.to) else {
            return;
        };
        let Some(kind) = edge.type_name.as_deref() else {
            return;
        };
        let rel_uid = relation_uid(kind);
        if !self.graph().exists(&rel_uid) {
            warn!(edge = %edge.name, kind, "unknown relation kind, skipping edge");
            return;
        }
        let known_facts = self
            .graph()
            .facts_of(&rel_uid.singleton(), Some(&edge.name), Direction::Inverse);
        for from_uid in self.labeled(valid_nodes, &from.name) {
            let rels_from = self
                .graph()
                .relations_from(&from_uid.singleton(), Some(&edge.name));
            for to_uid in self.labeled(valid_nodes, &to.name) {
                let rels_to = self
                    .graph()
                    .relations_to(&to_uid.singleton(), Some(&edge.name));
                let mut candidates = &known_facts & &(&rels_from & &rels_to);
                if candidates.is_empty() {
                    let facts = self.graph_mut().fact_from(
                        &from_uid.singleton(),
                        &to_uid.singleton(),
                        &rel_uid,
                    );
                    for fact in &facts {
                        self.graph_mut().update_label(fact, &edge.name);
                    }
                    candidates = facts;
                }
                valid_edges.extend(candidates);
            }
        }
    }

    /// An edge without a type joins two interfaces of the endpoint parts.
    fn import_connection_edge(
        &mut self,
        valid_nodes: &Uids,
        edge: &EdgeEntry,
        from_iface: &str,
        to_iface: &str,
        valid_edges: &mut Uids,
    ) {
        let (Some(from), Some(to)) = (&edge.from, &edge.to) else {
            return;
        };
        let connected = Uid::from(CONNECTED_TO);
        let known_facts = self
            .graph()
            .facts_of(&connected.singleton(), Some(&edge.name), Direction::Inverse);
        for from_uid in self.labeled(valid_nodes, &from.name) {
            let from_ifaces = self.graph().interfaces_of(
                &from_uid.singleton(),
                Some(from_iface),
                Direction::Forward,
            );
            let rels_from = self.graph().relations_from(&from_ifaces, Some(&edge.name));
            for to_uid in self.labeled(valid_nodes, &to.name) {
                let to_ifaces = self.graph().interfaces_of(
                    &to_uid.singleton(),
                    Some(to_iface),
                    Direction::Forward,
                );
                let rels_to = self.graph().relations_to(&to_ifaces, Some(&edge.name));
                let mut candidates = &known_facts & &(&rels_from & &rels_to);
                if candidates.is_empty() {
                    let connections = self.graph_mut().connect_interface(&from_ifaces, &to_ifaces);
                    for connection in &connections {
                        self.graph_mut().update_label(connection, &edge.name);
                    }
                    candidates = connections;
                }
                valid_edges.extend(candidates);
            }
        }
    }

    fn import_interface(
        &mut self,
        dom_uid: &Uid,
        model_uid: &Uid,
        valid_nodes: &Uids,
        iface: &InterfaceEntry,
    ) {
        // An interface of that name already on the model wins; idempotence.
        let existing = self
            .graph()
            .interfaces_of(&model_uid.singleton(), Some(&iface.name), Direction::Forward);
        if !existing.is_empty() {
            return;
        }

        let (Some(dir_uid), Some(ty_uid)) = (
            interface_uid("", &iface.direction),
            interface_uid(&iface.type_name, ""),
        ) else {
            warn!(
                interface = %iface.name,
                "interface lacks a type or direction, skipping"
            );
            return;
        };
        // The specific class an interface instantiates depends on both the
        // direction and the type class.
        let Some(class_uid) = interface_uid(&iface.type_name, &iface.direction) else {
            return;
        };
        self.graph_mut().create_interface(
            &dir_uid,
            &iface.direction,
            &Uid::from(INTERFACE_DIRECTION).singleton(),
        );
        self.graph_mut().create_interface(
            &ty_uid,
            &iface.type_name,
            &Uid::from(INTERFACE_TYPE).singleton(),
        );
        let supers: Uids = [dir_uid.clone(), ty_uid.clone()].into();
        self.graph_mut()
            .create_interface(&class_uid, &iface.name, &supers);

        if meta::in_software_domain(dom_uid) {
            self.graph_mut()
                .is_a(&class_uid.singleton(), &Uid::from(SW_INTERFACE).singleton());
            self.graph_mut().is_a(&ty_uid.singleton(), &class_uid.singleton());
            if meta::is_input(&dir_uid) {
                self.graph_mut()
                    .is_a(&class_uid.singleton(), &Uid::from(SW_INPUT).singleton());
            }
            if meta::is_output(&dir_uid) {
                self.graph_mut()
                    .is_a(&class_uid.singleton(), &Uid::from(SW_OUTPUT).singleton());
            }
        }

        if let Some((node_name, iface_name)) = iface.alias_target() {
            for part in self.labeled(valid_nodes, node_name) {
                let originals = self.graph().interfaces_of(
                    &part.singleton(),
                    Some(iface_name),
                    Direction::Forward,
                );
                if originals.is_empty() {
                    warn!(
                        interface = %iface.name,
                        node = node_name,
                        original = iface_name,
                        "alias target interface not found, skipping"
                    );
                    continue;
                }
                self.graph_mut().instantiate_alias_interface_for(
                    &model_uid.singleton(),
                    &originals,
                    &iface.name,
                );
            }
        } else {
            self.graph_mut()
                .instantiate_interface_for(&model_uid.singleton(), &class_uid, &iface.name);
        }
    }

    /// Snapshot the members of `set` whose label equals `name`.
    fn labeled(&self, set: &Uids, name: &str) -> Vec<Uid> {
        set.iter()
            .filter(|uid| self.graph().label_of(uid) == Some(name))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::CONFIGURATION;

    #[test]
    fn import_rejects_missing_required_fields() {
        let mut model = Model::new();
        assert!(!model.import("type: Task\nname: Foo\nversions: []").unwrap());
        assert!(!model
            .import("domain: SOFTWARE\nname: Foo\nversions: []")
            .unwrap());
        assert!(!model
            .import("domain: SOFTWARE\ntype: Task\nversions: []")
            .unwrap());
        assert!(!model.import("domain: SOFTWARE\ntype: Task\nname: Foo").unwrap());
    }

    #[test]
    fn import_rejects_unparseable_yaml() {
        let mut model = Model::new();
        assert!(matches!(
            model.import("domain: [unclosed"),
            Err(ModelError::ParseDocument { .. })
        ));
    }

    #[test]
    fn import_installs_the_class_chain() {
        let mut model = Model::new();
        let ok = model
            .import("domain: SOFTWARE\ntype: Task\nname: Foo\nversions:\n  - name: v1\n")
            .unwrap();
        assert!(ok);

        let graph = model.graph();
        let version = component_uid("SOFTWARE", "Foo", "v1");
        let supers = graph.subclasses_of(&version.singleton(), None, Direction::Forward);
        assert!(supers.contains("Component::SOFTWARE::Foo"));
        assert!(supers.contains("Component::Type::Task"));
        assert!(supers.contains(COMPONENT_TYPE));
        assert!(supers.contains("Domain::SOFTWARE"));
        assert!(supers.contains(DOMAIN));
        // Software models double as software-graph algorithms.
        assert!(supers.contains(SW_ALGORITHM));
    }

    #[test]
    fn unknown_sub_component_template_is_skipped() {
        let mut model = Model::new();
        let doc = r#"
domain: SOFTWARE
type: Task
name: Foo
versions:
  - name: v1
    components:
      nodes:
        - name: inner
          model: { name: Missing, domain: SOFTWARE, version: v0 }
"#;
        assert!(model.import(doc).unwrap());
        let version = component_uid("SOFTWARE", "Foo", "v1");
        assert!(model
            .graph()
            .components_of(&version.singleton(), None)
            .is_empty());
    }

    #[test]
    fn unknown_relation_kind_is_skipped() {
        let mut model = Model::new();
        model
            .import("domain: SOFTWARE\ntype: Task\nname: Bar\nversions:\n  - name: v1\n")
            .unwrap();
        let doc = r#"
domain: SOFTWARE
type: Task
name: Foo
versions:
  - name: v1
    components:
      nodes:
        - name: a
          model: { name: Bar, domain: SOFTWARE, version: v1 }
        - name: b
          model: { name: Bar, domain: SOFTWARE, version: v1 }
      edges:
        - name: e1
          type: Unregistered
          from: { name: a }
          to: { name: b }
"#;
        assert!(model.import(doc).unwrap());
        assert!(model
            .graph()
            .facts_of(
                &relation_uid("Unregistered").singleton(),
                None,
                Direction::Inverse
            )
            .is_empty());
    }

    #[test]
    fn interface_without_type_and_direction_is_skipped() {
        let mut model = Model::new();
        let doc = r#"
domain: SOFTWARE
type: Task
name: Foo
versions:
  - name: v1
    interfaces:
      - name: broken
"#;
        assert!(model.import(doc).unwrap());
        let version = component_uid("SOFTWARE", "Foo", "v1");
        assert!(model
            .graph()
            .interfaces_of(&version.singleton(), None, Direction::Forward)
            .is_empty());
    }

    #[test]
    fn default_configuration_lands_on_the_version_concept() {
        let mut model = Model::new();
        let doc = "domain: SOFTWARE\ntype: Task\nname: Foo\nversions:\n  - name: v1\n    defaultConfiguration:\n      name: v1\n      data: k=1\n";
        assert!(model.import(doc).unwrap());

        let version = component_uid("SOFTWARE", "Foo", "v1");
        let configs = model.graph().configs_of(&version.singleton(), None);
        assert_eq!(configs.len(), 1);
        let config = configs.iter().next().unwrap();
        assert_eq!(model.graph().label_of(config), Some("k=1"));
        assert_eq!(
            model.graph().instances_of(&config.singleton(), None, Direction::Forward),
            Uid::from(CONFIGURATION).singleton()
        );
    }
}
