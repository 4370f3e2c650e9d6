use chrono::Weekday;
use tracing::error;

use crate::api::{ChartEngineConfig, InfoPanel, INFO_PROMPT_TEXT};
use crate::core::{PlotLayout, TimeRange, ViewMode, ViewState, Viewport};
use crate::data::{process, Activity, ChartGeometry, RaceMark};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    describe_selection, resolve_hover, InteractionState, PointerEvent, PointerKind,
    TransitionContext,
};
use crate::render::{build_frame, Palette, Renderer, SceneInputs};

/// Main orchestration facade consumed by host applications.
///
/// `ChartEngine` owns the geometry cache, the view state, and the pointer
/// state machine; the host drives it with pointer/resize callbacks and one
/// `draw` call per animation tick. Rendering and the info panel are injected
/// so the engine stays independent of the host platform.
pub struct ChartEngine<R: Renderer, P: InfoPanel> {
    renderer: R,
    panel: P,
    viewport: Viewport,
    layout: PlotLayout,
    palette: Palette,
    week_start: Weekday,
    start: RaceMark,
    goal: RaceMark,
    range: TimeRange,
    view: ViewState,
    activities: Vec<Activity>,
    geometry: ChartGeometry,
    interaction: InteractionState,
    halted: bool,
}

impl<R: Renderer, P: InfoPanel> ChartEngine<R, P> {
    /// Builds the engine, failing fast when the host surface is unusable.
    ///
    /// No partial chart exists after an error.
    pub fn new(renderer: R, panel: P, config: ChartEngineConfig) -> ChartResult<Self> {
        if !config.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: config.viewport.width,
                height: config.viewport.height,
            });
        }
        let layout = config.layout.validate()?;
        let week_start = config.week_start();
        let range = TimeRange::new(config.start.date, config.goal.date);

        let mut engine = Self {
            renderer,
            panel,
            viewport: config.viewport,
            layout,
            palette: config.palette,
            week_start,
            start: config.start,
            goal: config.goal,
            range,
            view: ViewState::new(config.view_mode),
            activities: Vec::new(),
            geometry: ChartGeometry::empty(),
            interaction: InteractionState::new(0.0),
            halted: false,
        };
        engine.reprocess();

        let center = (layout.left_padding_px + layout.plot_right(engine.viewport)) * 0.5;
        engine.interaction = InteractionState::new(center);
        let ctx = engine.transition_context();
        engine.interaction.clamp_probe(ctx);
        Ok(engine)
    }

    /// Replaces the activity set and rebuilds all derived geometry.
    pub fn set_activities(&mut self, activities: Vec<Activity>) {
        self.activities = activities;
        self.reprocess();
    }

    /// Decodes activities from the host's JSON payload, then rebuilds.
    pub fn load_activities_json(&mut self, json: &str) -> ChartResult<()> {
        self.activities = Activity::batch_from_json(json)?;
        self.reprocess();
        Ok(())
    }

    /// Switches between the full-span and recent-window views.
    ///
    /// A mode change resets the pan offset and rebuilds geometry so the new
    /// content width takes effect immediately.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.view.mode == mode {
            return;
        }
        self.view.mode = mode;
        self.view.pan_offset_px = 0.0;
        self.reprocess();
    }

    /// Host resize callback; reprocesses synchronously before the next paint.
    pub fn window_resized(&mut self, viewport: Viewport) -> ChartResult<()> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.viewport = viewport;
        self.reprocess();
        Ok(())
    }

    pub fn on_pointer_down(&mut self, x: f64, y: f64, kind: PointerKind, now_seconds: f64) {
        self.dispatch(PointerEvent::Down { x, y, kind }, now_seconds);
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64, now_seconds: f64) {
        self.dispatch(PointerEvent::Move { x, y }, now_seconds);
    }

    pub fn on_pointer_up(&mut self, now_seconds: f64) {
        self.dispatch(PointerEvent::Up, now_seconds);
    }

    pub fn on_pointer_cancel(&mut self, now_seconds: f64) {
        self.dispatch(PointerEvent::Cancel, now_seconds);
    }

    /// Paints one frame and pushes the hover description to the info panel.
    ///
    /// A failed render halts the loop: the error is logged once, the last
    /// good frame stays on screen, and further `draw` calls are no-ops until
    /// the host rebuilds the engine.
    pub fn draw(&mut self, now_seconds: f64) -> ChartResult<()> {
        if self.halted {
            return Ok(());
        }

        // Hover stays frozen while the viewport is being dragged.
        if !self.interaction.is_dragging_viewport() {
            let probe_content_x = self.interaction.probe_x_px() + self.view.pan_offset_px;
            let selection = resolve_hover(&self.geometry, probe_content_x);
            self.interaction.update_hover(selection);
        }

        let inputs = SceneInputs {
            geometry: &self.geometry,
            view: self.view,
            layout: self.layout,
            viewport: self.viewport,
            palette: &self.palette,
            week_start: self.week_start,
            hover: self.interaction.hover(),
            probe_screen_x: self.interaction.rendered_probe_x(now_seconds),
        };
        let frame = build_frame(&inputs);

        if let Err(err) = self.renderer.render(&frame) {
            self.halted = true;
            error!(error = %err, "frame render failed; halting the redraw loop");
            return Err(err);
        }

        match describe_selection(&self.geometry, self.interaction.hover()) {
            Some(text) => self.panel.show(&text),
            None => self.panel.show(INFO_PROMPT_TEXT),
        }
        Ok(())
    }

    #[must_use]
    pub fn geometry(&self) -> &ChartGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn view(&self) -> ViewState {
        self.view
    }

    #[must_use]
    pub fn range(&self) -> TimeRange {
        self.range
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Probe position translated into content space.
    #[must_use]
    pub fn probe_content_x(&self) -> f64 {
        self.interaction.probe_x_px() + self.view.pan_offset_px
    }

    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    #[must_use]
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    #[must_use]
    pub fn panel(&self) -> &P {
        &self.panel
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn dispatch(&mut self, event: PointerEvent, now_seconds: f64) {
        let ctx = self.transition_context();
        let plot_width = self.layout.plot_width(self.viewport);
        self.interaction
            .apply(event, ctx, &mut self.view, plot_width, now_seconds);
    }

    fn reprocess(&mut self) {
        self.geometry = process(
            &self.activities,
            &self.start,
            &self.goal,
            self.view.mode,
            self.viewport,
            self.layout,
            self.week_start,
        );
        self.view.content_width_px = self.geometry.content_width_px;
        self.view.clamp_pan(self.layout.plot_width(self.viewport));
        let ctx = self.transition_context();
        self.interaction.clamp_probe(ctx);
    }

    fn transition_context(&self) -> TransitionContext {
        let plot_left = self.layout.left_padding_px;
        let plot_right = self.layout.plot_right(self.viewport);
        let axis_y = self.layout.axis_y(self.viewport);
        let pan = self.view.pan_offset_px;
        TransitionContext {
            probe_x_px: self.interaction.probe_x_px(),
            knob_y_px: axis_y,
            plot_left_px: plot_left,
            plot_right_px: plot_right,
            plot_top_px: self.layout.plot_top(),
            plot_bottom_px: axis_y,
            probe_min_x_px: (self.geometry.content_bounds.min_x - pan).max(plot_left),
            probe_max_x_px: (self.geometry.content_bounds.max_x - pan).min(plot_right),
            pan_offset_px: pan,
            pannable: self.view.is_pannable(self.layout.plot_width(self.viewport)),
        }
    }
}
