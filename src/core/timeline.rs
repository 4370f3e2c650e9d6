use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::types::PlotLayout;

/// Real-world span of the recent-window view, in days.
pub const RECENT_WINDOW_DAYS: f64 = 21.0;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Calendar span of the chart, from the starting race time to the goal race.
///
/// Immutable per chart instance. A goal at or before the start degenerates to
/// a 1 ms span so downstream ratios never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    start: DateTime<Utc>,
    goal: DateTime<Utc>,
}

impl TimeRange {
    #[must_use]
    pub fn new(start: DateTime<Utc>, goal: DateTime<Utc>) -> Self {
        Self { start, goal }
    }

    #[must_use]
    pub fn start(self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub fn goal(self) -> DateTime<Utc> {
        self.goal
    }

    /// Span in milliseconds, clamped to a 1 ms minimum.
    #[must_use]
    pub fn span_ms(self) -> i64 {
        (self.goal - self.start).num_milliseconds().max(1)
    }

    #[must_use]
    pub fn span_days(self) -> f64 {
        self.span_ms() as f64 / MS_PER_DAY
    }

    /// Position of `at` within the span as a 0..=1 ratio.
    ///
    /// A zero-length (or inverted) range maps every date to 0 rather than
    /// producing NaN or infinities. Dates outside the range extrapolate.
    #[must_use]
    pub fn time_ratio(self, at: DateTime<Utc>) -> f64 {
        if self.goal <= self.start {
            return 0.0;
        }
        (at - self.start).num_milliseconds() as f64 / self.span_ms() as f64
    }

    #[must_use]
    pub fn contains(self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.goal
    }
}

/// Horizontal zoom mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ViewMode {
    /// The whole start-to-goal span fits the plot width.
    #[default]
    FullSpan,
    /// The last three real-world weeks are stretched to fill the plot width;
    /// earlier content extends past the left edge and is reached by panning.
    RecentWindow,
}

/// Pan/zoom state of the horizontal viewport.
///
/// `content_width_px` is derived from the mode on every recompute; the pan
/// offset is re-clamped at the same time so the view never overshoots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub mode: ViewMode,
    pub pan_offset_px: f64,
    pub content_width_px: f64,
}

impl ViewState {
    #[must_use]
    pub fn new(mode: ViewMode) -> Self {
        Self {
            mode,
            pan_offset_px: 0.0,
            content_width_px: 0.0,
        }
    }

    /// Content width required by `mode` for the given range and plot width.
    #[must_use]
    pub fn content_width_for(mode: ViewMode, range: TimeRange, plot_width_px: f64) -> f64 {
        match mode {
            ViewMode::FullSpan => plot_width_px,
            ViewMode::RecentWindow => range.span_days() / RECENT_WINDOW_DAYS * plot_width_px,
        }
    }

    /// Re-derives the content width and re-clamps the pan offset.
    pub fn recompute(&mut self, range: TimeRange, plot_width_px: f64) {
        self.content_width_px = Self::content_width_for(self.mode, range, plot_width_px);
        self.clamp_pan(plot_width_px);
    }

    #[must_use]
    pub fn max_pan_px(self, plot_width_px: f64) -> f64 {
        (self.content_width_px - plot_width_px).max(0.0)
    }

    /// Whether the content overflows the plot and dragging can pan it.
    #[must_use]
    pub fn is_pannable(self, plot_width_px: f64) -> bool {
        self.content_width_px > plot_width_px
    }

    /// Clamps the pan offset into `[0, max_pan]`, or centers narrow content.
    pub fn clamp_pan(&mut self, plot_width_px: f64) {
        if self.content_width_px <= plot_width_px {
            self.pan_offset_px = -((plot_width_px - self.content_width_px) * 0.5);
        } else {
            self.pan_offset_px = self.pan_offset_px.clamp(0.0, self.max_pan_px(plot_width_px));
        }
    }
}

/// Date-to-pixel mapper for the horizontal axis.
///
/// Pure function of the range, the derived content width, and the left
/// padding; pixel positions are in content space (pan not yet applied).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    range: TimeRange,
    content_width_px: f64,
    left_padding_px: f64,
}

impl TimeScale {
    #[must_use]
    pub fn new(range: TimeRange, content_width_px: f64, left_padding_px: f64) -> Self {
        Self {
            range,
            content_width_px,
            left_padding_px,
        }
    }

    #[must_use]
    pub fn for_view(range: TimeRange, view: ViewState, layout: PlotLayout) -> Self {
        Self::new(range, view.content_width_px, layout.left_padding_px)
    }

    #[must_use]
    pub fn range(self) -> TimeRange {
        self.range
    }

    #[must_use]
    pub fn date_to_x(self, at: DateTime<Utc>) -> f64 {
        self.left_padding_px + self.range.time_ratio(at) * self.content_width_px
    }

    /// Maps a date shifted by half a calendar day, centering point markers
    /// within their day's bar.
    #[must_use]
    pub fn date_to_centered_x(self, at: DateTime<Utc>) -> f64 {
        self.date_to_x(at + Duration::hours(12))
    }

    /// Width of one calendar day at the current zoom.
    #[must_use]
    pub fn day_width_px(self) -> f64 {
        self.content_width_px * MS_PER_DAY / self.range.span_ms() as f64
    }
}
