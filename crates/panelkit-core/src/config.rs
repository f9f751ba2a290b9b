//! Editor settings.

use crate::selection::SelectionMode;
use crate::snap::DEFAULT_GRID_SIZE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable editor behavior. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Grid spacing for pointer snapping; 1 disables snapping.
    pub grid_size: u32,
    /// Side length of resize handles.
    pub handle_size: f64,
    /// Edge resize zones exist only on views wider and taller than this.
    pub min_edge_handle_extent: f64,
    /// Delay before guide lines appear during a move.
    pub guide_delay_ms: u64,
    /// Interval at which the host should call `poll`.
    pub poll_interval_ms: u64,
    /// Space between embedded views and their new container.
    pub embed_margin: f64,
    /// Offset applied to each successive paste.
    pub paste_offset: f64,
    /// Arrow-key nudge distance without Shift.
    pub nudge_step: f64,
    /// Undo entries kept; 0 keeps all.
    pub max_history: usize,
    pub selection_mode: SelectionMode,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            handle_size: 5.0,
            min_edge_handle_extent: 15.0,
            guide_delay_ms: 500,
            poll_interval_ms: 100,
            embed_margin: 10.0,
            paste_offset: 10.0,
            nudge_step: 1.0,
            max_history: 0,
            selection_mode: SelectionMode::Multi,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn guide_delay(&self) -> Duration {
        Duration::from_millis(self.guide_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
