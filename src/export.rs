//! Export engine: reconstruct a component document from the hypergraph.
//!
//! The document is rebuilt purely by traversal: the super-class closure of
//! the requested concept is intersected with the direct sub-classes of the
//! upper concepts to recover domain, type and name; versions, parts, edges,
//! interfaces and configurations are then enumerated per version class.
//! Query results are ordered sets, so the emitted document is reproducible
//! for a given graph.

use tracing::warn;

use crate::document::{
    ComponentsSection, ConfigEntry, ConfigSection, Document, EdgeEntry, EndpointEntry,
    InterfaceEntry, ModelRef, NodeEntry, VersionEntry, TYPE_NOT_SET,
};
use crate::error::ModelError;
use crate::graph::{Direction, Hypergraph, BASE_COMPONENT, CONNECTED_TO};
use crate::ident::{Uid, Uids, COMPONENT, COMPONENT_TYPE, DOMAIN, INTERFACE_DIRECTION, INTERFACE_TYPE};
use crate::model::Model;

impl<G: Hypergraph> Model<G> {
    /// Export the component identified by `uid` as a document string.
    ///
    /// Accepts the un-versioned component concept or any of its version
    /// concepts. Returns an empty string when the concept is unknown or its
    /// domain/type/name ancestry is ambiguous; `Err` only if the document
    /// cannot be serialized.
    pub fn export(&self, uid: &Uid) -> Result<String, ModelError> {
        let graph = self.graph();
        if !graph.exists(uid) {
            warn!(concept = %uid, "cannot export unknown concept");
            return Ok(String::new());
        }

        // Everything upwards of uid: domain, type and component ancestry.
        let supers = graph.subclasses_of(&uid.singleton(), None, Direction::Forward);

        let all_domains =
            graph.direct_subclasses_of(&Uid::from(DOMAIN).singleton(), None, Direction::Inverse);
        let Some(dom_uid) = self.sole(uid, "domain", &(&supers & &all_domains)) else {
            return Ok(String::new());
        };
        let all_types = graph.direct_subclasses_of(
            &Uid::from(COMPONENT_TYPE).singleton(),
            None,
            Direction::Inverse,
        );
        let Some(ty_uid) = self.sole(uid, "type", &(&supers & &all_types)) else {
            return Ok(String::new());
        };
        let all_components =
            graph.direct_subclasses_of(&ty_uid.singleton(), None, Direction::Inverse);
        let Some(component_uid) = self.sole(uid, "component", &(&supers & &all_components)) else {
            return Ok(String::new());
        };

        let mut doc = Document {
            domain: self.label(&dom_uid),
            type_name: self.label(&ty_uid),
            name: self.label(&component_uid),
            versions: Some(Vec::new()),
        };

        // Interface type and direction universes, resolved once.
        let if_types = graph.direct_subclasses_of(
            &Uid::from(INTERFACE_TYPE).singleton(),
            None,
            Direction::Inverse,
        );
        let if_dirs = graph.direct_subclasses_of(
            &Uid::from(INTERFACE_DIRECTION).singleton(),
            None,
            Direction::Inverse,
        );

        let versions =
            graph.direct_subclasses_of(&component_uid.singleton(), None, Direction::Inverse);
        for version_uid in &versions {
            let entry = self.export_version(version_uid, &all_domains, &if_types, &if_dirs);
            if let Some(list) = doc.versions.as_mut() {
                list.push(entry);
            }
        }

        doc.to_yaml()
    }

    fn export_version(
        &self,
        version_uid: &Uid,
        all_domains: &Uids,
        if_types: &Uids,
        if_dirs: &Uids,
    ) -> VersionEntry {
        let graph = self.graph();
        let mut entry = VersionEntry {
            name: self.label(version_uid),
            ..Default::default()
        };

        let parts = graph.components_of(&version_uid.singleton(), None);
        let mut components = ComponentsSection::default();
        let mut config = ConfigSection::default();

        for part in &parts {
            self.export_node(part, all_domains, &mut components, &mut config);
        }
        for from in &parts {
            let rels_from = graph.relations_from(&from.singleton(), None);
            let from_ifaces = graph.interfaces_of(&from.singleton(), None, Direction::Forward);
            for to in &parts {
                self.export_relation_edges(from, to, &rels_from, &mut components, &mut config);
                self.export_connection_edges(from, to, &from_ifaces, &mut components, &mut config);
            }
        }

        if !config.nodes.is_empty() || !config.edges.is_empty() {
            components.configuration = Some(config);
        }
        if !components.nodes.is_empty()
            || !components.edges.is_empty()
            || components.configuration.is_some()
        {
            entry.components = Some(components);
        }

        for iface_uid in graph.interfaces_of(&version_uid.singleton(), None, Direction::Forward) {
            self.export_interface(&iface_uid, if_types, if_dirs, &mut entry.interfaces);
        }

        // Config uniqueness makes this at most one entry.
        if let Some(config_uid) = graph.configs_of(&version_uid.singleton(), None).iter().next() {
            entry.default_configuration = Some(ConfigEntry {
                name: self.label(version_uid),
                data: self.label(config_uid),
            });
        }

        entry
    }

    /// Emit one sub-component node: its local name plus the version, name and
    /// domain of the model it instantiates, recovered from the class chain.
    fn export_node(
        &self,
        part: &Uid,
        all_domains: &Uids,
        components: &mut ComponentsSection,
        config: &mut ConfigSection,
    ) {
        let graph = self.graph();
        let classes = graph.instances_of(&part.singleton(), None, Direction::Forward);
        let Some(version_class) = classes.iter().next() else {
            warn!(part = %part, "sub-component has no model version, skipping");
            return;
        };
        let mut model_classes =
            graph.direct_subclasses_of(&version_class.singleton(), None, Direction::Forward);
        model_classes.remove(COMPONENT);
        model_classes.remove(BASE_COMPONENT);
        let Some(model_class) = model_classes.iter().next() else {
            warn!(part = %part, "sub-component has no model class, skipping");
            return;
        };
        let model_domains = &graph.direct_subclasses_of(
            &model_class.singleton(),
            None,
            Direction::Forward,
        ) & all_domains;
        let Some(model_domain) = model_domains.iter().next() else {
            warn!(part = %part, "sub-component model has no domain, skipping");
            return;
        };

        components.nodes.push(NodeEntry {
            name: self.label(part),
            model: ModelRef {
                name: self.label(model_class),
                domain: self.label(model_domain),
                version: self.label(version_class),
            },
        });
        for config_uid in graph.configs_of(&part.singleton(), None) {
            config.nodes.push(ConfigEntry {
                name: self.label(part),
                data: self.label(&config_uid),
            });
        }
    }

    /// Facts of domain relation kinds between two parts become typed edges.
    fn export_relation_edges(
        &self,
        from: &Uid,
        to: &Uid,
        rels_from: &Uids,
        components: &mut ComponentsSection,
        config: &mut ConfigSection,
    ) {
        let graph = self.graph();
        let rels_to = graph.relations_to(&to.singleton(), None);
        for fact in rels_from & &rels_to {
            let Some(relation) = graph.fact_relation(&fact) else {
                continue;
            };
            if relation.as_str() == CONNECTED_TO {
                continue;
            }
            components.edges.push(EdgeEntry {
                name: self.label(&fact),
                type_name: Some(self.label(&relation)),
                from: Some(EndpointEntry {
                    name: self.label(from),
                    interface: None,
                }),
                to: Some(EndpointEntry {
                    name: self.label(to),
                    interface: None,
                }),
            });
            for config_uid in graph.configs_of(&fact.singleton(), None) {
                config.edges.push(ConfigEntry {
                    name: self.label(&fact),
                    data: self.label(&config_uid),
                });
            }
        }
    }

    /// Connection facts between the parts' interfaces become untyped edges.
    fn export_connection_edges(
        &self,
        from: &Uid,
        to: &Uid,
        from_ifaces: &Uids,
        components: &mut ComponentsSection,
        config: &mut ConfigSection,
    ) {
        let graph = self.graph();
        let to_ifaces = graph.interfaces_of(&to.singleton(), None, Direction::Forward);
        for from_iface in from_ifaces {
            let rels_from = graph.relations_from(&from_iface.singleton(), None);
            for to_iface in &to_ifaces {
                let rels_to = graph.relations_to(&to_iface.singleton(), None);
                for fact in &rels_from & &rels_to {
                    if graph.fact_relation(&fact).as_ref().map(Uid::as_str) != Some(CONNECTED_TO) {
                        continue;
                    }
                    components.edges.push(EdgeEntry {
                        name: self.label(&fact),
                        type_name: Some(TYPE_NOT_SET.to_owned()),
                        from: Some(EndpointEntry {
                            name: self.label(from),
                            interface: Some(self.label(from_iface)),
                        }),
                        to: Some(EndpointEntry {
                            name: self.label(to),
                            interface: Some(self.label(to_iface)),
                        }),
                    });
                    for config_uid in graph.configs_of(&fact.singleton(), None) {
                        config.edges.push(ConfigEntry {
                            name: self.label(&fact),
                            data: self.label(&config_uid),
                        });
                    }
                }
            }
        }
    }

    /// Emit an interface with type and direction recovered from its class;
    /// aliases additionally name the original interface and its owner.
    fn export_interface(
        &self,
        iface_uid: &Uid,
        if_types: &Uids,
        if_dirs: &Uids,
        interfaces: &mut Vec<InterfaceEntry>,
    ) {
        let graph = self.graph();
        let classes = graph.instances_of(&iface_uid.singleton(), None, Direction::Forward);
        let originals = graph.original_interfaces_of(&iface_uid.singleton(), None);
        for class in &classes {
            let class_supers =
                graph.direct_subclasses_of(&class.singleton(), None, Direction::Forward);
            let type_class = (&class_supers & if_types).into_iter().next();
            let dir_class = (&class_supers & if_dirs).into_iter().next();
            let (Some(type_class), Some(dir_class)) = (type_class, dir_class) else {
                warn!(
                    interface = %iface_uid,
                    "interface class lacks a type or direction super-class, skipping"
                );
                continue;
            };
            let base = InterfaceEntry {
                name: self.label(iface_uid),
                type_name: self.label(&type_class),
                direction: self.label(&dir_class),
                ..Default::default()
            };
            if originals.is_empty() {
                interfaces.push(base);
                continue;
            }
            for original in &originals {
                for owner in graph.interfaces_of(&original.singleton(), None, Direction::Inverse) {
                    let mut alias = base.clone();
                    alias.link_to_interface = Some(self.label(original));
                    alias.link_to_node = Some(self.label(&owner));
                    interfaces.push(alias);
                }
            }
        }
    }

    /// The single member of `set`, or a logged `None` on zero or many.
    fn sole(&self, uid: &Uid, what: &str, set: &Uids) -> Option<Uid> {
        match set.len() {
            1 => set.iter().next().cloned(),
            0 => {
                warn!(concept = %uid, "no {what} found, aborting export");
                None
            }
            n => {
                warn!(concept = %uid, candidates = n, "multiple {what}s found, aborting export");
                None
            }
        }
    }

    fn label(&self, uid: &Uid) -> String {
        self.graph().label_of(uid).unwrap_or_default().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::component_uid;

    #[test]
    fn export_of_unknown_concept_is_empty() {
        let model = Model::new();
        let out = model.export(&Uid::from("Component::SOFTWARE::Nope")).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn export_recovers_domain_type_and_name() {
        let mut model = Model::new();
        model
            .import("domain: SOFTWARE\ntype: Task\nname: Foo\nversions:\n  - name: v1\n")
            .unwrap();

        let text = model.export(&component_uid("SOFTWARE", "Foo", "")).unwrap();
        let doc = Document::from_yaml(&text).unwrap();
        assert_eq!(doc.domain, "SOFTWARE");
        assert_eq!(doc.type_name, "Task");
        assert_eq!(doc.name, "Foo");
        assert_eq!(doc.versions.unwrap()[0].name, "v1");
    }

    #[test]
    fn export_accepts_a_version_concept_as_entry_point() {
        let mut model = Model::new();
        model
            .import("domain: COMPUTATION\ntype: Device\nname: Cam\nversions:\n  - name: '0.1'\n")
            .unwrap();

        let text = model.export(&component_uid("COMPUTATION", "Cam", "0.1")).unwrap();
        let doc = Document::from_yaml(&text).unwrap();
        assert_eq!(doc.name, "Cam");
        assert_eq!(doc.versions.unwrap().len(), 1);
    }

    #[test]
    fn ambiguous_domain_ancestry_aborts_the_export() {
        let mut model = Model::new();
        model
            .import("domain: SOFTWARE\ntype: Task\nname: Foo\nversions:\n  - name: v1\n")
            .unwrap();
        // Force a second domain ancestor onto the un-versioned component.
        let component = component_uid("SOFTWARE", "Foo", "");
        let other = crate::ident::domain_uid("COMPUTATION");
        model
            .graph_mut()
            .is_a(&component.singleton(), &other.singleton());

        assert!(model.export(&component).unwrap().is_empty());
    }
}
