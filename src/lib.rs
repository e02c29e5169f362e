pub mod color;
pub mod display_width;
pub mod error;
pub mod graph_ast;
pub mod graph_parser;
pub mod label;
pub mod layout;
pub mod position;
pub mod render_slot;
pub mod report;
pub mod shape_grammar;

use log::debug;
use serde::Serialize;

pub use error::DiagramError;
pub use graph_ast::{Direction, EdgeDefinition, EdgeKind, EdgeStroke, ShapeCategory, Subgraph};
pub use layout::{LayoutConfig, LayoutDecision};
pub use position::{DetectedShape, Point, PositionedNode, Viewport};

/// Everything the rendering capability needs to draw one diagram.
///
/// Serialized with camelCase keys and variants, matching the detected-shape
/// input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderableGraph {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<EdgeDefinition>,
    pub layout: LayoutDecision,
    pub direction: Direction,
    pub subgraphs: Vec<Subgraph>,
    pub match_ratio: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AssembleOptions {
    pub layout: LayoutConfig,
}

pub fn assemble(
    source: &str,
    shapes: &[DetectedShape],
    viewport: Viewport,
) -> Result<RenderableGraph, DiagramError> {
    assemble_with(&AssembleOptions::default(), source, shapes, viewport)
}

pub fn assemble_with(
    options: &AssembleOptions,
    source: &str,
    shapes: &[DetectedShape],
    viewport: Viewport,
) -> Result<RenderableGraph, DiagramError> {
    if source.trim().is_empty() {
        return Err(DiagramError::EmptyDiagram);
    }

    let graph = graph_parser::extract(source);
    if graph.is_empty() {
        return Err(DiagramError::EmptyDiagram);
    }
    debug!(
        nodes_len = graph.nodes.len(),
        edges_len = graph.edges.len();
        "Extracted graph",
    );

    let matched = position::match_positions(&graph, shapes, viewport);
    let layout = options
        .layout
        .decide(matched.match_ratio, matched.nodes.len());

    Ok(RenderableGraph {
        nodes: matched.nodes,
        edges: graph.edges,
        layout,
        direction: graph.direction,
        subgraphs: graph.subgraphs,
        match_ratio: matched.match_ratio,
    })
}
