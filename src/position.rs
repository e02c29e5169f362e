use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::color::{resolve_fallback, resolve_named, Rgb};
use crate::graph_ast::{NodeDefinition, ParsedGraph};

/// A shape region reported by the upstream detector.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedShape {
    pub id: String,
    /// Normalized `[x1, y1, x2, y2]`; anything other than four finite numbers
    /// is treated as missing.
    #[serde(default, alias = "bbox")]
    pub bounding_box: Option<Vec<f64>>,
    #[serde(default, alias = "color")]
    pub color_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    #[serde(flatten)]
    pub node: NodeDefinition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    /// `color` when one was detected, otherwise derived from the id.
    pub fill: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionMatch {
    pub nodes: Vec<PositionedNode>,
    pub matched: usize,
    /// `matched / nodes.len()`, or 0 for an empty graph.
    pub match_ratio: f64,
}

/// Center of a normalized bounding box, scaled to the viewport.
pub fn box_center(bounding_box: &[f64], viewport: Viewport) -> Option<Point> {
    let [x1, y1, x2, y2] = <[f64; 4]>::try_from(bounding_box).ok()?;
    if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
        return None;
    }
    Some(Point {
        x: (x1 + x2) / 2.0 * viewport.width,
        y: (y1 + y2) / 2.0 * viewport.height,
    })
}

/// Pair graph nodes with detected shapes by id.
///
/// When several shapes share an id the first one is used.
pub fn match_positions(
    graph: &ParsedGraph,
    shapes: &[DetectedShape],
    viewport: Viewport,
) -> PositionMatch {
    let mut by_id: HashMap<&str, &DetectedShape> = HashMap::with_capacity(shapes.len());
    for shape in shapes {
        by_id.entry(shape.id.as_str()).or_insert(shape);
    }

    let mut matched = 0;
    let nodes: Vec<PositionedNode> = graph
        .nodes
        .values()
        .map(|node| {
            let mut positioned = PositionedNode {
                node: node.clone(),
                position: None,
                color: None,
                fill: resolve_fallback(&node.id),
            };
            let Some(shape) = by_id.get(node.id.as_str()) else {
                return positioned;
            };
            let position = shape
                .bounding_box
                .as_deref()
                .and_then(|bbox| box_center(bbox, viewport));
            match position {
                Some(point) => {
                    matched += 1;
                    positioned.position = Some(point);
                    positioned.color = shape.color_name.as_deref().map(resolve_named);
                    if let Some(color) = positioned.color {
                        positioned.fill = color;
                    }
                }
                None => {
                    warn!(id = node.id.as_str(); "Detected shape has no usable bounding box");
                }
            }
            positioned
        })
        .collect();

    let match_ratio = if nodes.is_empty() {
        0.0
    } else {
        matched as f64 / nodes.len() as f64
    };

    PositionMatch {
        nodes,
        matched,
        match_ratio,
    }
}
