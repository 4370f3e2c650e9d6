pub mod hover;

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

pub use hover::{
    describe_selection, resolve_hover, HoverHit, HoverSelection, POINT_DIAMETER_PX,
    WEEK_MARKER_HIT_RADIUS_PX,
};

use crate::core::ViewState;

/// Half extent of the probe knob hit box for mouse input.
pub const PROBE_HIT_HALF_EXTENT_MOUSE_PX: f64 = 16.0;
/// Touch hit boxes are padded wider to compensate for finger imprecision.
pub const PROBE_HIT_HALF_EXTENT_TOUCH_PX: f64 = 30.0;

/// Seconds of inactivity before the probe starts its cosmetic wiggle.
pub const IDLE_WIGGLE_DELAY_SECONDS: f64 = 6.0;
const IDLE_WIGGLE_AMPLITUDE_PX: f64 = 4.0;
const IDLE_WIGGLE_FREQUENCY_HZ: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, y: f64, kind: PointerKind },
    Move { x: f64, y: f64 },
    Up,
    Cancel,
}

/// Drag-mode state machine. The two drag modes are mutually exclusive; the
/// probe wins when hit boxes overlap.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragMode {
    #[default]
    Idle,
    DraggingProbe,
    DraggingViewport {
        grab_x: f64,
        grab_pan_px: f64,
    },
}

/// Screen-space geometry a transition decision needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionContext {
    pub probe_x_px: f64,
    pub knob_y_px: f64,
    pub plot_left_px: f64,
    pub plot_right_px: f64,
    pub plot_top_px: f64,
    pub plot_bottom_px: f64,
    /// Probe travel limits: content extent intersected with the plot.
    pub probe_min_x_px: f64,
    pub probe_max_x_px: f64,
    pub pan_offset_px: f64,
    pub pannable: bool,
}

impl TransitionContext {
    #[must_use]
    fn knob_hit(self, x: f64, y: f64, kind: PointerKind) -> bool {
        let half = match kind {
            PointerKind::Mouse => PROBE_HIT_HALF_EXTENT_MOUSE_PX,
            PointerKind::Touch => PROBE_HIT_HALF_EXTENT_TOUCH_PX,
        };
        (x - self.probe_x_px).abs() <= half && (y - self.knob_y_px).abs() <= half
    }

    #[must_use]
    fn plot_hit(self, x: f64, y: f64) -> bool {
        x >= self.plot_left_px
            && x <= self.plot_right_px
            && y >= self.plot_top_px
            && y <= self.plot_bottom_px
    }

    #[must_use]
    fn clamp_probe(self, x: f64) -> f64 {
        if self.probe_max_x_px < self.probe_min_x_px {
            return self.probe_min_x_px;
        }
        x.clamp(self.probe_min_x_px, self.probe_max_x_px)
    }
}

/// Pure drag-mode transition: `(current, event) -> next`.
///
/// Continuous quantities (probe position, pan offset) are applied by
/// [`InteractionState::apply`]; this function only decides the mode.
#[must_use]
pub fn transition(current: DragMode, event: PointerEvent, ctx: TransitionContext) -> DragMode {
    match (current, event) {
        (DragMode::Idle, PointerEvent::Down { x, y, kind }) => {
            if ctx.knob_hit(x, y, kind) {
                DragMode::DraggingProbe
            } else if ctx.pannable && ctx.plot_hit(x, y) {
                DragMode::DraggingViewport {
                    grab_x: x,
                    grab_pan_px: ctx.pan_offset_px,
                }
            } else {
                DragMode::Idle
            }
        }
        (_, PointerEvent::Up | PointerEvent::Cancel) => DragMode::Idle,
        (mode, _) => mode,
    }
}

/// Pointer/touch state shared with the renderer each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionState {
    mode: DragMode,
    probe_x_px: f64,
    last_input_at: f64,
    hover: HoverSelection,
}

impl InteractionState {
    #[must_use]
    pub fn new(probe_x_px: f64) -> Self {
        Self {
            mode: DragMode::Idle,
            probe_x_px,
            last_input_at: 0.0,
            hover: HoverSelection::new(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> DragMode {
        self.mode
    }

    #[must_use]
    pub fn is_dragging_viewport(&self) -> bool {
        matches!(self.mode, DragMode::DraggingViewport { .. })
    }

    /// Logical probe position, screen space.
    #[must_use]
    pub fn probe_x_px(&self) -> f64 {
        self.probe_x_px
    }

    #[must_use]
    pub fn hover(&self) -> &HoverSelection {
        &self.hover
    }

    /// Applies a pointer event: advances the mode machine, then the
    /// continuous state it drives (probe position or pan offset).
    ///
    /// Pan mutations re-clamp immediately so the view never overshoots
    /// mid-drag.
    pub fn apply(
        &mut self,
        event: PointerEvent,
        ctx: TransitionContext,
        view: &mut ViewState,
        plot_width_px: f64,
        now_seconds: f64,
    ) {
        self.last_input_at = now_seconds;
        self.mode = transition(self.mode, event, ctx);

        match (self.mode, event) {
            (DragMode::DraggingProbe, PointerEvent::Move { x, .. }) => {
                self.probe_x_px = ctx.clamp_probe(x);
            }
            (DragMode::DraggingViewport { grab_x, grab_pan_px }, PointerEvent::Move { x, .. }) => {
                view.pan_offset_px = grab_pan_px - (x - grab_x);
                view.clamp_pan(plot_width_px);
            }
            _ => {}
        }
    }

    /// Re-clamps the probe after a geometry rebuild moved the travel limits.
    pub fn clamp_probe(&mut self, ctx: TransitionContext) {
        self.probe_x_px = ctx.clamp_probe(self.probe_x_px);
    }

    /// Commits a freshly resolved hover selection.
    ///
    /// Ignored while the viewport is being dragged, so the info panel does
    /// not flicker during a pan.
    pub fn update_hover(&mut self, selection: HoverSelection) {
        if self.is_dragging_viewport() {
            return;
        }
        self.hover = selection;
    }

    /// Probe x as drawn: the logical position plus a sinusoidal wiggle once
    /// the chart has sat idle long enough. Purely cosmetic; the logical
    /// position and hover resolution are unaffected.
    #[must_use]
    pub fn rendered_probe_x(&self, now_seconds: f64) -> f64 {
        if self.mode != DragMode::Idle {
            return self.probe_x_px;
        }
        let idle = now_seconds - self.last_input_at;
        if idle < IDLE_WIGGLE_DELAY_SECONDS {
            return self.probe_x_px;
        }
        let t = idle - IDLE_WIGGLE_DELAY_SECONDS;
        self.probe_x_px + IDLE_WIGGLE_AMPLITUDE_PX * (t * IDLE_WIGGLE_FREQUENCY_HZ * TAU).sin()
    }
}
