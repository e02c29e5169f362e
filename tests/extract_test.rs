use flowfit::graph_ast::{EdgeKind, ParsedGraph, ShapeCategory};
use flowfit::graph_parser::extract;
use flowfit::label::decode;
use flowfit::shape_grammar::classify;
use pretty_assertions::assert_eq;

fn nodes(graph: &ParsedGraph) -> Vec<(&str, &str, ShapeCategory)> {
    graph
        .nodes
        .values()
        .map(|n| (n.id.as_str(), n.label.as_str(), n.category))
        .collect()
}

fn edges(graph: &ParsedGraph) -> Vec<(&str, &str, &str)> {
    graph
        .edges
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str(), e.label.as_str()))
        .collect()
}

// =============================================================================
// Labels
// =============================================================================

#[test]
fn label_escape_tokens() {
    assert_eq!(decode("#quot;A#40;B#41;#39;&#39;"), "A(B)'&'");
}

#[test]
fn label_decode_idempotent() {
    for text in ["A(B)'&'", "plain", "", "multi word label"] {
        assert_eq!(decode(&decode(text)), decode(text));
    }
}

// =============================================================================
// Shapes
// =============================================================================

#[test]
fn shape_forms() {
    let cases = [
        ("T((Terminal))", "T", ShapeCategory::Terminal),
        ("S[[Subprocess]]", "S", ShapeCategory::Subprocess),
        ("D{Decision}", "D", ShapeCategory::Decision),
        ("P[Process]", "P", ShapeCategory::Process),
        ("R(Rounded)", "R", ShapeCategory::Process),
    ];
    for (statement, id, category) in cases {
        let parsed = classify(statement).unwrap();
        assert_eq!((parsed.id.as_str(), parsed.category), (id, category), "{statement}");
    }
}

#[test]
fn shape_unsupported_is_none() {
    assert!(classify("A>asymmetric]").is_none());
    assert!(classify("A[(database)").is_none());
}

// =============================================================================
// Extraction
// =============================================================================

#[test]
fn extract_plain_edge() {
    let graph = extract("A-->B");
    assert_eq!(
        nodes(&graph),
        vec![
            ("A", "A", ShapeCategory::Process),
            ("B", "B", ShapeCategory::Process),
        ]
    );
    assert_eq!(edges(&graph), vec![("A", "B", "")]);
}

#[test]
fn extract_labelled_edge() {
    let graph = extract("A[Start]-->|yes|B{Check}");
    assert_eq!(
        nodes(&graph),
        vec![
            ("A", "Start", ShapeCategory::Process),
            ("B", "Check", ShapeCategory::Decision),
        ]
    );
    assert_eq!(edges(&graph), vec![("A", "B", "yes")]);
}

#[test]
fn extract_undefined_endpoints() {
    let graph = extract("X-->Y");
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(edges(&graph), vec![("X", "Y", "")]);
}

#[test]
fn extract_open_link() {
    let graph = extract("A --- B");
    assert_eq!(graph.edges[0].kind, EdgeKind::Line);
}

#[test]
fn extract_full_flowchart() {
    let source = "\
flowchart TD
    %% order handling
    start((Begin)) --> validate[[Validate order]]
    validate --> ok{Valid?}
    ok -->|yes| ship[Ship it]
    ok -->|no| reject(Reject)
    ship --> done((End))
    reject --> done
";
    let graph = extract(source);
    assert_eq!(
        nodes(&graph),
        vec![
            ("start", "Begin", ShapeCategory::Terminal),
            ("validate", "Validate order", ShapeCategory::Subprocess),
            ("ok", "Valid?", ShapeCategory::Decision),
            ("ship", "Ship it", ShapeCategory::Process),
            ("reject", "Reject", ShapeCategory::Process),
            ("done", "End", ShapeCategory::Terminal),
        ]
    );
    assert_eq!(
        edges(&graph),
        vec![
            ("start", "validate", ""),
            ("validate", "ok", ""),
            ("ok", "ship", "yes"),
            ("ok", "reject", "no"),
            ("ship", "done", ""),
            ("reject", "done", ""),
        ]
    );
}

#[test]
fn extract_bare_reference_counts_as_first_definition() {
    let graph = extract("A --> B\nB{Later}\n");
    assert_eq!(graph.node("B").unwrap().label, "B");
    assert_eq!(graph.node("B").unwrap().category, ShapeCategory::Process);
}

#[test]
fn extract_malformed_lines_are_skipped() {
    let graph = extract("graph TD\n  A[ok]\n  ???\n  B{broken\n  A --> C\n");
    assert_eq!(
        nodes(&graph),
        vec![
            ("A", "ok", ShapeCategory::Process),
            ("C", "C", ShapeCategory::Process),
        ]
    );
}

#[test]
fn extract_semicolon_statements() {
    let graph = extract("graph LR; A --> B; B --> C;");
    assert_eq!(edges(&graph), vec![("A", "B", ""), ("B", "C", "")]);
}

#[test]
fn extract_escaped_labels() {
    let graph = extract("A[\"Call #quot;api#quot; #40;v2#41;\"] -->|\"ok\"| B");
    assert_eq!(graph.node("A").unwrap().label, "Call \"api\" (v2)");
    assert_eq!(edges(&graph), vec![("A", "B", "ok")]);
}

#[test]
fn extract_comment_only_is_empty() {
    let graph = extract("%% nothing\n\n%% still nothing\n");
    assert!(graph.is_empty());
    assert!(graph.edges.is_empty());
}

#[test]
fn extract_text_labelled_edges() {
    let graph = extract("A -- maybe --> B\nB -- then --- C\n");
    assert_eq!(edges(&graph), vec![("A", "B", "maybe"), ("B", "C", "then")]);
    assert_eq!(graph.edges[0].kind, EdgeKind::Arrow);
    assert_eq!(graph.edges[1].kind, EdgeKind::Line);
}

#[test]
fn extract_semicolon_inside_text_label() {
    let graph = extract("A -- a;b --> B");
    assert_eq!(
        nodes(&graph),
        vec![
            ("A", "A", ShapeCategory::Process),
            ("B", "B", ShapeCategory::Process),
        ]
    );
    assert_eq!(edges(&graph), vec![("A", "B", "a;b")]);
}

// =============================================================================
// Subgraphs
// =============================================================================

#[test]
fn extract_unclosed_subgraph_ends_with_input() {
    let graph = extract("A --> B\nsubgraph S\nC\n");
    assert_eq!(graph.subgraphs.len(), 1);
    assert_eq!(graph.subgraphs[0].id, "S");
    assert_eq!(graph.subgraphs[0].label, "S");
    assert_eq!(graph.subgraphs[0].node_ids, vec!["C"]);
    assert_eq!(graph.node("C").unwrap().label, "C");
}
