// ABOUTME: Quick search palette events for visibility and selection outcomes
// ABOUTME: Emitted by the navigator when the palette opens, closes or activates an item

use canopy_types::{NodeId, NodeKind};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Event {
    /// Palette became visible
    PaletteOpened { command_mode: bool },

    /// Palette was dismissed without activating anything
    Dismissed,

    /// A tree node result was activated
    ItemSelected { node_id: NodeId, kind: NodeKind },

    /// A command result was executed
    CommandExecuted { command_id: String, route: String },
}
