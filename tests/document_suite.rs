use std::collections::HashSet;

use dotgen::{
    Attributes, Builder, DotError, Edge, Endpoint, Field, GraphParams, RenderConfig, cell, edge,
    format_attr_list, graph, label_cell, node, record, subgraph,
};

fn statement_lines(dot: &str) -> Vec<&str> {
    dot.lines()
        .map(str::trim)
        .filter(|line| line.ends_with(';'))
        .collect()
}

#[test]
fn hello_world_scenario() {
    let h = node("hello");
    let w = node("world");
    let e = edge(&h, &w);
    let (h_id, w_id) = (h.id(), w.id());
    let g = graph()
        .set_params(GraphParams::new().oriented(true))
        .add(h)
        .add(w)
        .add(e);
    let dot = g.serialize();

    assert!(dot.starts_with(&format!("digraph \"{}\" {{", g.id())));
    assert_eq!(
        statement_lines(&dot),
        vec![
            format!("{h_id} [label = \"hello\"];"),
            format!("{w_id} [label = \"world\"];"),
            format!("\"{h_id}\" -> \"{w_id}\";"),
        ]
    );
    assert!(dot.ends_with('}'));
}

#[test]
fn identifiers_are_unique_across_entity_kinds() {
    let mut seen = HashSet::new();
    for _ in 0..50 {
        let s = subgraph();
        for id in [
            node("n").id(),
            label_cell("l").id(),
            cell(Vec::<Field>::new()).id(),
            record(Vec::<Field>::new()).id(),
            graph().id(),
            s.id(),
            s.anchor(),
        ] {
            assert!(seen.insert(id), "identifier {id} handed out twice");
        }
    }
}

#[test]
fn attribute_filtering() {
    let attrs = Attributes::new()
        .with("a", "")
        .with("b", None::<String>)
        .with("c", "x");
    assert_eq!(format_attr_list(&attrs), "[c = \"x\"]");
    assert_eq!(format_attr_list(&Attributes::new()), "");
}

#[test]
fn undirected_graph_overrides_edge_orientation() {
    let b = Builder::new();
    let g = b.graph().set_params(GraphParams::new().oriented(false));
    let x = b.node("x");
    let y = b.node("y");
    let e = b.edge(&x, &y);
    let dot = g.add(x).add(y).add(e).serialize();
    assert!(dot.contains("\"1\" -- \"2\";"));
    assert!(!dot.contains("->"));
}

#[test]
fn record_port_matches_label_marker() {
    let b = Builder::new();
    let first = b.label_cell("a");
    let first_id = first.id();
    let r = b.record([b.cell([first, b.label_cell("b")])]);
    let port = r.port(first_id).unwrap();
    let target = b.node("t");
    let e = Edge::new(port, &target);

    let g = b.graph().add(r.clone()).add(target).add(e);
    let dot = g.serialize();

    assert_eq!(port.to_string(), format!("{}:{}", r.id(), first_id));
    assert!(dot.contains(&format!("<{first_id}> a")));
    assert!(dot.contains(&format!("\"{}:{}\" -- ", r.id(), first_id)));
    assert!(dot.contains("shape = \"record\""));
}

#[test]
fn fields_read_back_from_a_record_are_addressable() {
    let r = record([label_cell("left"), label_cell("right")]);
    let right = Endpoint::try_from(&r.fields()[1]).unwrap();
    assert_eq!(
        right,
        Endpoint::Port(dotgen::Port {
            node: r.id(),
            field: r.fields()[1].id()
        })
    );
}

#[test]
fn detached_cell_address_is_reported() {
    let loose = cell([label_cell("x")]);
    assert_eq!(
        loose.address(),
        Err(DotError::UnattachedCell { cell: loose.id() })
    );
}

#[test]
fn cluster_prefix() {
    let plain = subgraph();
    let clustered = subgraph().set_params(GraphParams::new().cluster(true));
    assert!(
        plain
            .serialize()
            .starts_with(&format!("subgraph \"{}\" {{", plain.id()))
    );
    assert!(
        clustered
            .serialize()
            .starts_with(&format!("subgraph \"cluster{}\" {{", clustered.id()))
    );
}

#[test]
fn empty_subgraph_still_has_its_anchor() {
    let b = Builder::new();
    let s = b.subgraph();
    let dot = s.serialize();
    assert_eq!(statement_lines(&dot).len(), 1);
    assert!(dot.contains(&format!("{} [", s.anchor())));
    assert!(dot.contains("style = \"invis\""));
}

#[test]
fn edges_can_attach_to_a_cluster() {
    let b = Builder::new();
    let g = b.graph().set_params(GraphParams::new().oriented(true));
    let cluster = b
        .subgraph()
        .set_label("group")
        .set_params(GraphParams::new().cluster(true));
    let outside = b.node("outside");
    let e = b.edge(&outside, &cluster);
    let anchor = cluster.anchor();
    let dot = g.add(cluster).add(outside).add(e).serialize();
    assert!(dot.contains(&format!("-> \"{anchor}\";")));
    assert!(dot.contains("    label = \"group\";"));
}

#[test]
fn reserialization_is_idempotent() {
    let b = Builder::new();
    let inner = b.subgraph();
    let a = b.node("a");
    let c = b.node("c");
    let e = b.edge(&a, &c).set_attributes([("style", "dashed")]);
    let g = b
        .graph()
        .set_params(
            GraphParams::new()
                .oriented(true)
                .strict(true)
                .edge_defaults(Attributes::new().with("color", "gray")),
        )
        .add(inner.add(a).add(c).add(e));
    let first = g.serialize();
    let second = g.serialize();
    assert_eq!(first, second);
    assert!(first.starts_with("strict digraph"));
    assert!(first.contains("edge [color = \"gray\"];"));
}

#[test]
fn render_config_controls_indentation() {
    let b = Builder::new();
    let g = b.graph().add(b.subgraph().add(b.node("deep")));
    let config = RenderConfig {
        indent: "    ".to_string(),
    };
    let dot = g.render(&config, 0);
    assert!(dot.contains("\n        3 [label = \"deep\"];\n"));
    assert!(dot.contains("\n    };\n"));
}

#[test]
fn windows_path_labels_keep_the_document_well_formed() {
    let b = Builder::new();
    let g = b.graph();
    let dir = b.node(r"C:\temp\");
    let g = g.add(dir);
    assert_eq!(
        g.serialize(),
        "graph \"0\" {\n  1 [label = \"C:\\temp\\\\\"];\n}"
    );
}

#[test]
fn record_field_text_is_taken_literally() {
    let b = Builder::new();
    let r = b.record([b.label_cell("a|b"), b.label_cell("{x}")]);
    let dot = b.graph().add(r).serialize();
    assert!(dot.contains(r#"label = "{<0> a\|b|<1> \{x\}}""#));
}
