use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use dotgen::{Builder, Graph, GraphParams, Node, describe};
use std::hint::black_box;

/// `clusters` clusters of `per_cluster` nodes chained together, plus one
/// record per cluster with an edge into its second field.
fn clustered_graph(clusters: usize, per_cluster: usize) -> Graph {
    let b = Builder::new();
    let mut graph = b.graph().set_params(GraphParams::new().oriented(true));
    for _ in 0..clusters {
        let mut cluster = b.subgraph().set_params(GraphParams::new().cluster(true));
        let nodes: Vec<Node> = (0..per_cluster).map(|i| b.node(format!("n{i}"))).collect();
        for pair in nodes.windows(2) {
            cluster.push(b.edge(&pair[0], &pair[1]));
        }
        let record = b.record([b.label_cell("in"), b.label_cell("out")]);
        let port = record.port(record.fields()[1].id()).expect("field exists");
        if let Some(first) = nodes.first() {
            cluster.push(b.edge(port, first));
        }
        for node in nodes {
            cluster.push(node);
        }
        graph.push(cluster.add(record));
    }
    graph
}

fn description_source(nodes: usize) -> String {
    let mut items: Vec<String> = (0..nodes)
        .map(|i| format!("{{\"node\": \"n{i}\", \"attributes\": {{\"shape\": \"box\"}}}}"))
        .collect();
    for i in 0..nodes.saturating_sub(1) {
        items.push(format!("{{\"edge\": [\"n{i}\", \"n{}\"]}}", i + 1));
    }
    format!(
        "{{\"params\": {{\"isOriented\": true}}, \"items\": [{}]}}",
        items.join(",")
    )
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");
    for (clusters, per_cluster) in [(1, 10), (10, 50), (50, 200)] {
        let graph = clustered_graph(clusters, per_cluster);
        let label = format!("{clusters}x{per_cluster}");
        group.bench_with_input(BenchmarkId::from_parameter(label), &graph, |b, graph| {
            b.iter(|| black_box(graph.serialize().len()));
        });
    }
    group.finish();
}

fn bench_describe(c: &mut Criterion) {
    let mut group = c.benchmark_group("describe");
    for nodes in [10, 100, 1000] {
        let source = description_source(nodes);
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &source, |b, data| {
            b.iter(|| {
                let desc: describe::GraphDesc =
                    serde_json::from_str(black_box(data)).expect("parse failed");
                let graph = describe::build(desc).expect("build failed");
                black_box(graph.serialize().len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_serialize, bench_describe
);
criterion_main!(benches);
