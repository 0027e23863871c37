//! Hit testing and the pointer-drag state machine.
//!
//! The controller maps raw pointer events (already converted to container
//! percentage coordinates by the caller) to semantic crop updates: moving the
//! rectangle, resizing it from one of the eight handles, or nothing. Each
//! move event recomputes the next rectangle from the previous confirmed state
//! plus one incremental delta, so processing is synchronous and re-entrant -
//! dropping or coalescing events only affects the smoothness of intermediate
//! redraws, never the final rectangle.

use crate::constraint;
use crate::geometry::CropRect;

/// Half-extent of a handle hot-zone, in percent of the container.
pub const HANDLE_TOLERANCE_PCT: f64 = 2.5;

/// One of the eight resize handles on the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Handle {
    /// Corner handles, tested before edges during hit testing.
    pub const CORNERS: [Handle; 4] = [
        Handle::NorthWest,
        Handle::NorthEast,
        Handle::SouthEast,
        Handle::SouthWest,
    ];

    /// Edge handles, centered on the edge midpoints.
    pub const EDGES: [Handle; 4] = [Handle::North, Handle::South, Handle::East, Handle::West];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Handle::NorthWest | Handle::NorthEast | Handle::SouthEast | Handle::SouthWest
        )
    }

    /// Center of this handle's hot-zone on the given rectangle.
    pub fn anchor(self, rect: &CropRect) -> (f64, f64) {
        let mid_x = rect.x + rect.width / 2.0;
        let mid_y = rect.y + rect.height / 2.0;
        match self {
            Handle::North => (mid_x, rect.y),
            Handle::South => (mid_x, rect.bottom()),
            Handle::East => (rect.right(), mid_y),
            Handle::West => (rect.x, mid_y),
            Handle::NorthWest => (rect.x, rect.y),
            Handle::NorthEast => (rect.right(), rect.y),
            Handle::SouthEast => (rect.right(), rect.bottom()),
            Handle::SouthWest => (rect.x, rect.bottom()),
        }
    }

    /// Hit-test a pointer position against all eight handles of `rect`,
    /// corners first.
    pub fn at_point(rect: &CropRect, x: f64, y: f64) -> Option<Handle> {
        Self::CORNERS
            .into_iter()
            .chain(Self::EDGES)
            .find(|handle| {
                let (hx, hy) = handle.anchor(rect);
                (x - hx).abs() <= HANDLE_TOLERANCE_PCT && (y - hy).abs() <= HANDLE_TOLERANCE_PCT
            })
    }
}

/// Current gesture of the interaction state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Moving the whole rectangle; the offset is from the rectangle's
    /// top-left corner to the initial grab point.
    Dragging { grab_x: f64, grab_y: f64 },
    /// Resizing from a handle; the last pointer position feeds incremental
    /// deltas to the constraint solver.
    Resizing {
        handle: Handle,
        last_x: f64,
        last_y: f64,
    },
}

/// Maps pointer events to crop rectangle updates.
#[derive(Debug, Default)]
pub struct InteractionController {
    state: DragState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == DragState::Idle
    }

    /// Begin a gesture at the given container position.
    ///
    /// Handles take priority over the rectangle interior, and corners over
    /// edges; a press outside both leaves the controller idle.
    pub fn pointer_down(&mut self, rect: &CropRect, x: f64, y: f64) {
        self.state = if let Some(handle) = Handle::at_point(rect, x, y) {
            DragState::Resizing {
                handle,
                last_x: x,
                last_y: y,
            }
        } else if rect.contains(x, y) {
            DragState::Dragging {
                grab_x: x - rect.x,
                grab_y: y - rect.y,
            }
        } else {
            DragState::Idle
        };
    }

    /// Advance the active gesture to a new pointer position.
    ///
    /// Returns the next rectangle while a gesture is in progress, `None`
    /// when idle. The caller applies the result to its geometry model and
    /// re-renders on change.
    pub fn pointer_move(
        &mut self,
        rect: &CropRect,
        x: f64,
        y: f64,
        aspect_ratio: f64,
    ) -> Option<CropRect> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { grab_x, grab_y } => Some(rect.moved_to(x - grab_x, y - grab_y)),
            DragState::Resizing {
                handle,
                last_x,
                last_y,
            } => {
                let next = constraint::resize(rect, handle, x - last_x, y - last_y, aspect_ratio);
                self.state = DragState::Resizing {
                    handle,
                    last_x: x,
                    last_y: y,
                };
                Some(next)
            }
        }
    }

    /// End the gesture, whatever it was.
    pub fn pointer_up(&mut self) {
        self.state = DragState::Idle;
    }
}
