use log::info;
use serde::Serialize;

/// Coverage at or above which detected positions are trusted for every node.
pub const DEFAULT_PRESET_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutDecision {
    /// Use the absolute positions taken from detected shapes.
    Preset,
    /// Let the renderer lay the graph out itself.
    Automatic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub preset_threshold: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            preset_threshold: DEFAULT_PRESET_THRESHOLD,
        }
    }
}

impl LayoutConfig {
    pub fn decide(&self, match_ratio: f64, total_nodes: usize) -> LayoutDecision {
        let decision = if total_nodes > 0 && match_ratio >= self.preset_threshold {
            LayoutDecision::Preset
        } else {
            LayoutDecision::Automatic
        };
        info!(match_ratio, total_nodes, decision:?; "Layout selected");
        decision
    }
}

/// [`LayoutConfig::decide`] with the default threshold.
pub fn decide(match_ratio: f64, total_nodes: usize) -> LayoutDecision {
    LayoutConfig::default().decide(match_ratio, total_nodes)
}
