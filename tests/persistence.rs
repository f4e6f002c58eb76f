//! Persistence tests: the hypergraph survives its file round-trip.
//!
//! The CLI stores hypergraphs as YAML. These tests verify that a reloaded
//! graph answers the same queries as the original, that exports are stable
//! across the round-trip, and that further imports continue cleanly on a
//! loaded graph.

use modelgraph::graph::MemoryGraph;
use modelgraph::ident::component_uid;
use modelgraph::{Hypergraph, Model};

const BAR: &str = r#"
domain: SOFTWARE
type: Task
name: Bar
versions:
  - name: v1
    interfaces:
      - name: in
        type: Data
        direction: INCOMING
"#;

const FOO: &str = r#"
domain: SOFTWARE
type: Task
name: Foo
versions:
  - name: v1
    components:
      nodes:
        - name: inner
          model: { name: Bar, domain: SOFTWARE, version: v1 }
"#;

fn save_and_reload(model: Model) -> Model {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("graph.yml");
    std::fs::write(&path, model.into_graph().to_yaml().unwrap()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    Model::from_graph(MemoryGraph::from_yaml(&text).unwrap())
}

#[test]
fn export_is_stable_across_the_file_round_trip() {
    let mut model = Model::new();
    assert!(model.import(BAR).unwrap());
    assert!(model.import(FOO).unwrap());
    let before = model.export(&component_uid("SOFTWARE", "Foo", "")).unwrap();

    let reloaded = save_and_reload(model);
    let after = reloaded
        .export(&component_uid("SOFTWARE", "Foo", ""))
        .unwrap();
    assert!(!after.is_empty());
    assert_eq!(before, after);
}

#[test]
fn reimport_on_a_loaded_graph_stays_idempotent() {
    let mut model = Model::new();
    assert!(model.import(BAR).unwrap());
    assert!(model.import(FOO).unwrap());
    let concepts = model.graph().concept_count();
    let facts = model.graph().fact_count();

    let mut reloaded = save_and_reload(model);
    assert!(reloaded.import(FOO).unwrap());
    assert_eq!(reloaded.graph().concept_count(), concepts);
    assert_eq!(reloaded.graph().fact_count(), facts);
}

#[test]
fn a_loaded_graph_resolves_templates_for_new_imports() {
    let mut model = Model::new();
    assert!(model.import(BAR).unwrap());

    // Import a composition on the reloaded graph only; the template must be
    // found there.
    let mut reloaded = save_and_reload(model);
    assert!(reloaded.import(FOO).unwrap());

    let version = component_uid("SOFTWARE", "Foo", "v1");
    let parts = reloaded.graph().components_of(&version.singleton(), None);
    assert_eq!(parts.len(), 1);
    assert_eq!(
        reloaded.graph().label_of(parts.iter().next().unwrap()),
        Some("inner")
    );
}
