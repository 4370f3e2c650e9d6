use chrono::{Duration, NaiveDate, Weekday};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::{PlotLayout, ViewState, Viewport};
use crate::data::processor::week_start_of;
use crate::data::{ChartGeometry, PointCategory};
use crate::interaction::{HoverHit, HoverSelection, POINT_DIAMETER_PX};
use crate::render::{
    ChartLayerKind, CirclePrimitive, Color, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign,
    TextPrimitive,
};

const AXIS_FONT_SIZE_PX: f64 = 11.0;
const LEGEND_FONT_SIZE_PX: f64 = 11.0;
/// Labels within this buffer beyond the plot edges still draw, so they slide
/// out instead of popping while panning.
const LABEL_CLIP_BUFFER_PX: f64 = 40.0;
const BAR_GAP_PX: f64 = 1.5;
const WEEK_TICK_HEIGHT_PX: f64 = 6.0;
const DAY_TICK_HEIGHT_PX: f64 = 4.0;
const CONNECTOR_WIDTH_PX: f64 = 2.0;
const HOVER_POINT_SCALE: f64 = 1.4;
const KNOB_RADIUS_PX: f64 = 9.0;
const LEGEND_SWATCH_PX: f64 = 10.0;
const LEGEND_STEP_PX: f64 = 74.0;

/// Chart colors, normalized RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub background: Color,
    pub axis: Color,
    pub label: Color,
    pub bar_fill: Color,
    pub bar_highlight: Color,
    pub start_point: Color,
    pub goal_point: Color,
    pub trial_point: Color,
    pub point_outline: Color,
    pub connector: Color,
    pub probe: Color,
    pub knob: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::rgb(0.98, 0.98, 0.97),
            axis: Color::rgb(0.35, 0.35, 0.38),
            label: Color::rgb(0.25, 0.25, 0.28),
            bar_fill: Color::rgba(0.55, 0.65, 0.85, 0.85),
            bar_highlight: Color::rgb(0.25, 0.4, 0.7),
            start_point: Color::rgb(0.85, 0.35, 0.3),
            goal_point: Color::rgb(0.2, 0.65, 0.35),
            trial_point: Color::rgb(0.95, 0.6, 0.2),
            point_outline: Color::rgb(1.0, 1.0, 1.0),
            connector: Color::rgb(0.3, 0.45, 0.75),
            probe: Color::rgb(0.5, 0.5, 0.55),
            knob: Color::rgb(0.25, 0.45, 0.8),
        }
    }
}

/// Everything one draw pass reads. Geometry stays in content space; the pan
/// offset is applied here, per frame.
#[derive(Debug)]
pub struct SceneInputs<'a> {
    pub geometry: &'a ChartGeometry,
    pub view: ViewState,
    pub layout: PlotLayout,
    pub viewport: Viewport,
    pub palette: &'a Palette,
    pub week_start: Weekday,
    pub hover: &'a HoverSelection,
    /// Probe x as rendered (idle wiggle already applied), screen space.
    pub probe_screen_x: f64,
}

/// Builds the scene for one animation tick.
#[must_use]
pub fn build_frame(inputs: &SceneInputs<'_>) -> RenderFrame {
    let mut frame = RenderFrame::new(inputs.viewport);
    push_background(&mut frame, inputs);
    push_axis(&mut frame, inputs);
    push_bars(&mut frame, inputs);
    push_connectors(&mut frame, inputs);
    push_points(&mut frame, inputs);
    push_probe(&mut frame, inputs);
    push_legend(&mut frame, inputs);
    frame
}

fn push_background(frame: &mut RenderFrame, inputs: &SceneInputs<'_>) {
    frame.push_rect(
        ChartLayerKind::Background,
        RectPrimitive::filled(
            0.0,
            0.0,
            f64::from(inputs.viewport.width),
            f64::from(inputs.viewport.height),
            inputs.palette.background,
        ),
    );
}

fn push_axis(frame: &mut RenderFrame, inputs: &SceneInputs<'_>) {
    let layout = inputs.layout;
    let palette = inputs.palette;
    let pan = inputs.view.pan_offset_px;
    let axis_y = layout.axis_y(inputs.viewport);
    let plot_left = layout.left_padding_px;
    let plot_right = layout.plot_right(inputs.viewport);

    frame.push_line(
        ChartLayerKind::Axis,
        LinePrimitive::new(plot_left, axis_y, plot_right, axis_y, 1.0, palette.axis),
    );

    for marker in &inputs.geometry.week_markers {
        let x = marker.x - pan;
        if !label_visible(x, plot_left, plot_right) {
            continue;
        }
        frame.push_line(
            ChartLayerKind::Axis,
            LinePrimitive::new(x, axis_y, x, axis_y + WEEK_TICK_HEIGHT_PX, 1.0, palette.axis),
        );
        frame.push_text(
            ChartLayerKind::Axis,
            TextPrimitive::new(
                format!("Week {}", marker.ordinal),
                x,
                axis_y + 10.0,
                AXIS_FONT_SIZE_PX,
                palette.label,
                TextHAlign::Center,
            ),
        );
    }

    for marker in &inputs.geometry.day_markers {
        let x = marker.x - pan;
        if !label_visible(x, plot_left, plot_right) {
            continue;
        }
        frame.push_line(
            ChartLayerKind::Axis,
            LinePrimitive::new(x, axis_y, x, axis_y + DAY_TICK_HEIGHT_PX, 1.0, palette.axis),
        );
        frame.push_text(
            ChartLayerKind::Axis,
            TextPrimitive::new(
                weekday_label(marker.weekday),
                x,
                axis_y + 24.0,
                AXIS_FONT_SIZE_PX,
                palette.label,
                TextHAlign::Center,
            ),
        );
    }

    // Start/Goal calendar dates under their markers.
    for point in &inputs.geometry.points {
        if !matches!(point.category, PointCategory::Start | PointCategory::Goal) {
            continue;
        }
        let x = point.x - pan;
        if !label_visible(x, plot_left, plot_right) {
            continue;
        }
        frame.push_text(
            ChartLayerKind::Axis,
            TextPrimitive::new(
                point.date.format("%b %-d").to_string(),
                x,
                axis_y + 38.0,
                AXIS_FONT_SIZE_PX,
                palette.label,
                TextHAlign::Center,
            ),
        );
    }
}

fn push_bars(frame: &mut RenderFrame, inputs: &SceneInputs<'_>) {
    let layout = inputs.layout;
    let pan = inputs.view.pan_offset_px;
    let axis_y = layout.axis_y(inputs.viewport);
    let plot_left = layout.left_padding_px;
    let plot_right = layout.plot_right(inputs.viewport);

    let bar_days: IndexSet<NaiveDate> = inputs.geometry.bars.iter().map(|bar| bar.day).collect();

    for (index, bar) in inputs.geometry.bars.iter().enumerate() {
        let x = bar.x - pan;
        if x + bar.width_px < plot_left - LABEL_CLIP_BUFFER_PX
            || x > plot_right + LABEL_CLIP_BUFFER_PX
        {
            continue;
        }

        // A workout the day after bridges into this bar, drawn as one shape.
        let bridged = bar_days.contains(&(bar.day + Duration::days(1)));
        let width = if bridged {
            bar.width_px
        } else {
            (bar.width_px - BAR_GAP_PX).max(1.0)
        };

        let y = axis_y - bar.stack_offset_px - bar.height_px;
        let mut rect = RectPrimitive::filled(x, y, width, bar.height_px, inputs.palette.bar_fill);
        if inputs.hover.contains(&HoverHit::Bar(index)) {
            rect = rect.with_border(inputs.palette.bar_highlight, 1.5);
        }
        frame.push_rect(ChartLayerKind::Bars, rect);
    }
}

fn push_connectors(frame: &mut RenderFrame, inputs: &SceneInputs<'_>) {
    let pan = inputs.view.pan_offset_px;
    let plot_left = inputs.layout.left_padding_px;
    let plot_right = inputs.layout.plot_right(inputs.viewport);

    for pair in inputs.geometry.points.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        let x1 = from.x - pan;
        let x2 = to.x - pan;
        if x1.max(x2) < plot_left - LABEL_CLIP_BUFFER_PX
            || x1.min(x2) > plot_right + LABEL_CLIP_BUFFER_PX
        {
            continue;
        }

        let mut line = LinePrimitive::new(
            x1,
            from.y,
            x2,
            to.y,
            CONNECTOR_WIDTH_PX,
            inputs.palette.connector,
        );
        if to.category == PointCategory::Goal {
            // The final segment only dashes toward the goal when the last
            // result falls in the goal's week or the one before it; a larger
            // gap draws nothing rather than implying progress.
            let from_week = week_start_of(from.date.date_naive(), inputs.week_start);
            let goal_week = week_start_of(to.date.date_naive(), inputs.week_start);
            if (goal_week - from_week).num_days() > 7 {
                continue;
            }
            line = line.dashed();
        }
        frame.push_line(ChartLayerKind::Connectors, line);
    }
}

fn push_points(frame: &mut RenderFrame, inputs: &SceneInputs<'_>) {
    let pan = inputs.view.pan_offset_px;
    let plot_left = inputs.layout.left_padding_px;
    let plot_right = inputs.layout.plot_right(inputs.viewport);

    for (index, point) in inputs.geometry.points.iter().enumerate() {
        let x = point.x - pan;
        if !label_visible(x, plot_left, plot_right) {
            continue;
        }
        let color = match point.category {
            PointCategory::Start => inputs.palette.start_point,
            PointCategory::Goal => inputs.palette.goal_point,
            PointCategory::TrialResult => inputs.palette.trial_point,
        };
        let hovered = inputs.hover.contains(&HoverHit::Point(index));
        let radius = if hovered {
            POINT_DIAMETER_PX / 2.0 * HOVER_POINT_SCALE
        } else {
            POINT_DIAMETER_PX / 2.0
        };
        let mut circle = CirclePrimitive::filled(x, point.y, radius, color);
        if hovered {
            circle = circle.with_border(inputs.palette.point_outline, 2.0);
        }
        frame.push_circle(ChartLayerKind::Points, circle);
    }
}

fn push_probe(frame: &mut RenderFrame, inputs: &SceneInputs<'_>) {
    let layout = inputs.layout;
    let pan = inputs.view.pan_offset_px;
    let axis_y = layout.axis_y(inputs.viewport);
    let plot_left = layout.left_padding_px;
    let plot_right = layout.plot_right(inputs.viewport);
    let probe_x = inputs.probe_screen_x;

    // The indicator spans from just above the highest visible point down to
    // the axis; with nothing visible it falls back to the plot top.
    let mut top = axis_y;
    for point in &inputs.geometry.points {
        let x = point.x - pan;
        if x >= plot_left && x <= plot_right {
            top = top.min(point.y);
        }
    }
    let top = if top >= axis_y {
        layout.plot_top()
    } else {
        (top - POINT_DIAMETER_PX).max(0.0)
    };

    frame.push_line(
        ChartLayerKind::Probe,
        LinePrimitive::new(probe_x, top, probe_x, axis_y, 1.5, inputs.palette.probe).dashed(),
    );
    frame.push_circle(
        ChartLayerKind::Probe,
        CirclePrimitive::filled(probe_x, axis_y, KNOB_RADIUS_PX, inputs.palette.knob)
            .with_border(inputs.palette.point_outline, 2.0),
    );
}

fn push_legend(frame: &mut RenderFrame, inputs: &SceneInputs<'_>) {
    let palette = inputs.palette;
    let entries = [
        (palette.start_point, "Start"),
        (palette.goal_point, "Goal"),
        (palette.trial_point, "Trial"),
        (palette.bar_fill, "Workout"),
    ];

    let mut x = inputs.layout.left_padding_px;
    let y = (inputs.layout.top_padding_px * 0.5 - LEGEND_SWATCH_PX * 0.5).max(2.0);
    for (color, label) in entries {
        frame.push_rect(
            ChartLayerKind::Legend,
            RectPrimitive::filled(x, y, LEGEND_SWATCH_PX, LEGEND_SWATCH_PX, color),
        );
        frame.push_text(
            ChartLayerKind::Legend,
            TextPrimitive::new(
                label,
                x + LEGEND_SWATCH_PX + 4.0,
                y - 1.0,
                LEGEND_FONT_SIZE_PX,
                palette.label,
                TextHAlign::Left,
            ),
        );
        x += LEGEND_STEP_PX;
    }
}

fn label_visible(screen_x: f64, plot_left: f64, plot_right: f64) -> bool {
    screen_x >= plot_left - LABEL_CLIP_BUFFER_PX && screen_x <= plot_right + LABEL_CLIP_BUFFER_PX
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
