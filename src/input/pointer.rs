use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Phase of a raw pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// A raw pointer event as delivered by the host input system.
///
/// Positions are in layer-space pixels, the same space element positions
/// live in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Point,
}

impl PointerEvent {
    pub fn down(position: Point) -> Self {
        Self {
            phase: PointerPhase::Down,
            position,
        }
    }

    pub fn moved(position: Point) -> Self {
        Self {
            phase: PointerPhase::Move,
            position,
        }
    }

    pub fn up(position: Point) -> Self {
        Self {
            phase: PointerPhase::Up,
            position,
        }
    }
}
