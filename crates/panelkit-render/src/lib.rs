//! PanelKit Render Library
//!
//! Draws the edit overlay (selection frames, resize handles, guide lines and
//! drop targets) onto any [`Surface`] a host provides.

mod recording;
mod renderer;

pub use recording::{DrawOp, RecordingSurface};
pub use renderer::{OverlayRenderer, OverlayStyle, Surface};
