use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::core::DurationScale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointCategory {
    Start,
    Goal,
    TrialResult,
}

/// A labeled race-time marker: the start time, the goal time, or one trial
/// result derived from an activity.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPoint {
    pub date: DateTime<Utc>,
    pub duration_seconds: f64,
    pub label: String,
    pub category: PointCategory,
    pub activity_id: Option<u64>,
    /// Content-space x; pan is applied at draw time.
    pub x: f64,
    pub y: f64,
}

/// One ordinary workout rendered as a day-aligned bar.
///
/// Same-day bars stack: `stack_offset_px` lifts each later bar above the
/// accumulated height of the earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutBar {
    pub day: NaiveDate,
    pub duration_seconds: f64,
    pub x: f64,
    pub width_px: f64,
    pub height_px: f64,
    pub stack_offset_px: f64,
    pub activity_id: u64,
    pub name: String,
    pub distance_meters: f64,
    pub average_heartrate: Option<f64>,
    pub suffer_score: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekMarker {
    pub day: NaiveDate,
    pub x: f64,
    pub ordinal: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayMarker {
    pub day: NaiveDate,
    pub x: f64,
    pub weekday: Weekday,
}

/// Min/max content-space x among scored points, for centering and probe
/// travel limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentBounds {
    pub min_x: f64,
    pub max_x: f64,
}

/// Everything the renderer and interaction controller read each frame.
///
/// Rebuilt wholesale by [`crate::data::process`] on data load, resize, or
/// view-mode change; readers never mutate it structurally.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    pub points: Vec<ScoredPoint>,
    pub bars: Vec<WorkoutBar>,
    pub week_markers: Vec<WeekMarker>,
    pub day_markers: Vec<DayMarker>,
    pub y_scale: DurationScale,
    pub content_bounds: ContentBounds,
    pub content_width_px: f64,
}

impl ChartGeometry {
    /// Placeholder geometry for an engine that has not processed yet.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            bars: Vec::new(),
            week_markers: Vec::new(),
            day_markers: Vec::new(),
            y_scale: DurationScale::from_durations(&[]),
            content_bounds: ContentBounds {
                min_x: 0.0,
                max_x: 0.0,
            },
            content_width_px: 0.0,
        }
    }
}
