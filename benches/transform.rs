//! Benchmarks for the document ⇄ hypergraph transformation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use modelgraph::ident::component_uid;
use modelgraph::Model;

const LEAF: &str = r#"
domain: SOFTWARE
type: Task
name: Leaf
versions:
  - name: v1
    interfaces:
      - name: in
        type: Data
        direction: INCOMING
      - name: out
        type: Data
        direction: OUTGOING
"#;

/// A composition with `n` sub-components chained by interface connections.
fn chain_document(n: usize) -> String {
    let mut doc = String::from(
        "domain: SOFTWARE\ntype: Task\nname: Chain\nversions:\n  - name: v1\n    components:\n      nodes:\n",
    );
    for i in 0..n {
        doc.push_str(&format!(
            "        - name: n{i}\n          model: {{ name: Leaf, domain: SOFTWARE, version: v1 }}\n"
        ));
    }
    doc.push_str("      edges:\n");
    for i in 1..n {
        doc.push_str(&format!(
            "        - name: e{i}\n          from: {{ name: n{}, interface: out }}\n          to: {{ name: n{i}, interface: in }}\n",
            i - 1
        ));
    }
    doc
}

fn bench_import(c: &mut Criterion) {
    let doc = chain_document(20);
    c.bench_function("import_chain_20", |bench| {
        bench.iter(|| {
            let mut model = Model::new();
            model.import(LEAF).unwrap();
            black_box(model.import(&doc).unwrap())
        })
    });
}

fn bench_reimport(c: &mut Criterion) {
    let doc = chain_document(20);
    let mut model = Model::new();
    model.import(LEAF).unwrap();
    model.import(&doc).unwrap();
    c.bench_function("reimport_chain_20", |bench| {
        bench.iter(|| black_box(model.import(&doc).unwrap()))
    });
}

fn bench_export(c: &mut Criterion) {
    let doc = chain_document(20);
    let mut model = Model::new();
    model.import(LEAF).unwrap();
    model.import(&doc).unwrap();
    let uid = component_uid("SOFTWARE", "Chain", "");
    c.bench_function("export_chain_20", |bench| {
        bench.iter(|| black_box(model.export(&uid).unwrap()))
    });
}

criterion_group!(benches, bench_import, bench_reimport, bench_export);
criterion_main!(benches);
