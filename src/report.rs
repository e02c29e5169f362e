use std::fmt::Write;

use crate::display_width::{display_width, flatten_breaks, pad_to_width, truncate_to_width};
use crate::graph_ast::{EdgeDefinition, EdgeKind, EdgeStroke, ShapeCategory};
use crate::layout::LayoutDecision;
use crate::RenderableGraph;

const MAX_LABEL_WIDTH: usize = 32;
const HEADERS: [&str; 5] = ["ID", "LABEL", "SHAPE", "POSITION", "FILL"];

/// Plain-text summary of an assembled graph: the layout verdict, a node table
/// aligned by display width, and the edge list.
pub fn render(graph: &RenderableGraph) -> String {
    let mut out = String::new();

    let positioned = graph.nodes.iter().filter(|n| n.position.is_some()).count();
    let verdict = match graph.layout {
        LayoutDecision::Preset => "preset",
        LayoutDecision::Automatic => "automatic",
    };
    let _ = writeln!(
        out,
        "layout: {verdict} ({positioned}/{} nodes matched, ratio {:.2})",
        graph.nodes.len(),
        graph.match_ratio
    );
    out.push('\n');

    let rows: Vec<[String; 5]> = graph
        .nodes
        .iter()
        .map(|n| {
            let position = n
                .position
                .map(|p| format!("{:.1},{:.1}", p.x, p.y))
                .unwrap_or_else(|| "-".to_string());
            let fill = match n.color {
                Some(_) => n.fill.to_string(),
                None => format!("{} *", n.fill),
            };
            [
                n.node.id.clone(),
                truncate_to_width(&flatten_breaks(&n.node.label), MAX_LABEL_WIDTH),
                category_name(n.node.category).to_string(),
                position,
                fill,
            ]
        })
        .collect();

    let mut widths = HEADERS.map(display_width);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_width(cell));
        }
    }

    write_row(&mut out, &HEADERS.map(str::to_string), &widths);
    for row in &rows {
        write_row(&mut out, row, &widths);
    }

    if !graph.edges.is_empty() {
        out.push('\n');
        for edge in &graph.edges {
            let _ = writeln!(out, "{}", edge_line(edge));
        }
    }

    out
}

fn write_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad_to_width(cell, *width))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

fn category_name(category: ShapeCategory) -> &'static str {
    match category {
        ShapeCategory::Terminal => "terminal",
        ShapeCategory::Subprocess => "subprocess",
        ShapeCategory::Decision => "decision",
        ShapeCategory::Process => "process",
    }
}

fn edge_line(edge: &EdgeDefinition) -> String {
    let connector = match (edge.stroke, edge.kind) {
        (EdgeStroke::Solid, EdgeKind::Arrow) => "-->",
        (EdgeStroke::Solid, EdgeKind::Line) => "---",
        (EdgeStroke::Dotted, EdgeKind::Arrow) => "-.->",
        (EdgeStroke::Dotted, EdgeKind::Line) => "-.-",
        (EdgeStroke::Thick, EdgeKind::Arrow) => "==>",
        (EdgeStroke::Thick, EdgeKind::Line) => "===",
    };
    if edge.label.is_empty() {
        format!("{} {connector} {}", edge.source, edge.target)
    } else {
        format!(
            "{} {connector}|{}| {}",
            edge.source,
            flatten_breaks(&edge.label),
            edge.target
        )
    }
}
