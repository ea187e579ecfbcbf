//! Drag-to-pan state machine.

use inkplot_core::ViewTransform;

/// Pointer state of a preview
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanState {
    #[default]
    Idle,
    Panning {
        /// Screen position where the drag started
        anchor: (f64, f64),
        /// View at the start of the drag
        origin: ViewTransform,
    },
}

/// Turns pointer down/move/up events into view updates
#[derive(Debug, Clone, Copy, Default)]
pub struct PanController {
    state: PanState,
}

impl PanController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PanState {
        self.state
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.state, PanState::Panning { .. })
    }

    /// Start a drag at `(x, y)` from the current `view`
    pub fn pointer_down(&mut self, x: f64, y: f64, view: ViewTransform) {
        self.state = PanState::Panning {
            anchor: (x, y),
            origin: view,
        };
    }

    /// View for the pointer at `(x, y)`, `None` when not dragging
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<ViewTransform> {
        match self.state {
            PanState::Idle => None,
            PanState::Panning { anchor, origin } => {
                Some(origin.panned_by(x - anchor.0, y - anchor.1))
            }
        }
    }

    /// End the drag, also when the pointer leaves the canvas
    pub fn pointer_up(&mut self) {
        self.state = PanState::Idle;
    }
}
