use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{
    format_race_time, parse_race_time, DurationScale, PlotLayout, TimeRange, TimeScale, ViewMode,
    ViewState, Viewport,
};
use crate::data::activity::Activity;
use crate::data::geometry::{
    ChartGeometry, ContentBounds, DayMarker, PointCategory, ScoredPoint, WeekMarker, WorkoutBar,
};

/// Week ordinals start counting from this value.
const WEEK_ORDINAL_BASE: u32 = 1;
/// A week marker closer than this to the start date is dropped so it cannot
/// overlap the Start point.
const WEEK_MARKER_SUPPRESS_DAYS: i64 = 3;

/// A race time anchored to a calendar date: the athlete's current time at the
/// start of the plan, or the target time on race day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceMark {
    pub time_text: String,
    pub date: DateTime<Utc>,
}

impl RaceMark {
    #[must_use]
    pub fn new(time_text: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            time_text: time_text.into(),
            date,
        }
    }
}

/// Rebuilds every derived collection from the raw inputs.
///
/// Deterministic and idempotent: identical inputs produce geometrically
/// identical output. Callers re-run it after a data load, a resize, or a
/// view-mode change, then swap the result in whole.
#[must_use]
pub fn process(
    activities: &[Activity],
    start: &RaceMark,
    goal: &RaceMark,
    mode: ViewMode,
    viewport: Viewport,
    layout: PlotLayout,
    week_start: Weekday,
) -> ChartGeometry {
    let range = TimeRange::new(start.date, goal.date);
    let plot_width = layout.plot_width(viewport);
    let content_width = ViewState::content_width_for(mode, range, plot_width);
    let scale = TimeScale::new(range, content_width, layout.left_padding_px);

    let mut points = vec![
        race_mark_point(start, PointCategory::Start),
        race_mark_point(goal, PointCategory::Goal),
    ];
    let mut day_groups: IndexMap<NaiveDate, Vec<&Activity>> = IndexMap::new();

    for activity in activities {
        let Some(when) = activity.local_start() else {
            warn!(
                id = activity.id,
                date = %activity.start_date_local,
                "skipping activity with unparseable start date"
            );
            continue;
        };
        // Day-granularity window: an activity on race day counts regardless
        // of its time of day.
        let day = when.date_naive();
        if day < range.start().date_naive() || day > range.goal().date_naive() {
            continue;
        }
        if !activity.moving_time.is_finite() || activity.moving_time <= 0.0 {
            warn!(id = activity.id, "skipping activity without a positive duration");
            continue;
        }

        if activity.is_trial() {
            points.push(ScoredPoint {
                date: when,
                duration_seconds: activity.moving_time,
                label: format_race_time(activity.moving_time as u32),
                category: PointCategory::TrialResult,
                activity_id: Some(activity.id),
                x: 0.0,
                y: 0.0,
            });
        } else {
            day_groups.entry(when.date_naive()).or_default().push(activity);
        }
    }

    points.sort_by_key(|point| point.date);

    let durations: Vec<f64> = points.iter().map(|point| point.duration_seconds).collect();
    let y_scale = DurationScale::from_durations(&durations);
    let plot_top = layout.plot_top();
    let plot_height = layout.plot_height(viewport);
    for point in &mut points {
        point.x = scale.date_to_centered_x(day_start(point.date.date_naive()));
        point.y = y_scale.duration_to_y(point.duration_seconds, plot_top, plot_height);
    }

    day_groups.sort_keys();
    let bars = build_bars(&day_groups, scale, layout);
    let week_markers = build_week_markers(range, scale, week_start);
    let day_markers = build_day_markers(range, scale, mode);

    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for point in &points {
        min_x = min_x.min(point.x);
        max_x = max_x.max(point.x);
    }

    ChartGeometry {
        points,
        bars,
        week_markers,
        day_markers,
        y_scale,
        content_bounds: ContentBounds { min_x, max_x },
        content_width_px: content_width,
    }
}

fn race_mark_point(mark: &RaceMark, category: PointCategory) -> ScoredPoint {
    let seconds = parse_race_time(&mark.time_text).unwrap_or_else(|err| {
        warn!(%err, "race time fell back to zero seconds");
        0
    });
    ScoredPoint {
        date: mark.date,
        duration_seconds: f64::from(seconds),
        label: format_race_time(seconds),
        category,
        activity_id: None,
        x: 0.0,
        y: 0.0,
    }
}

fn build_bars(
    day_groups: &IndexMap<NaiveDate, Vec<&Activity>>,
    scale: TimeScale,
    layout: PlotLayout,
) -> Vec<WorkoutBar> {
    let band_height = layout.bar_band_height();
    let day_width = scale.day_width_px();
    let max_duration = day_groups
        .values()
        .flatten()
        .map(|activity| OrderedFloat(activity.moving_time))
        .max()
        .map_or(0.0, |max| max.0);

    let mut bars = Vec::new();
    for (&day, group) in day_groups {
        let x = scale.date_to_x(day_start(day));
        let mut stacked = 0.0;
        for activity in group {
            let height = if max_duration > 0.0 {
                activity.moving_time / max_duration * band_height
            } else {
                0.0
            };
            bars.push(WorkoutBar {
                day,
                duration_seconds: activity.moving_time,
                x,
                width_px: day_width,
                height_px: height,
                stack_offset_px: stacked,
                activity_id: activity.id,
                name: activity.name.clone(),
                distance_meters: activity.distance,
                average_heartrate: activity.average_heartrate,
                suffer_score: activity.suffer_score,
            });
            stacked += height;
        }
    }
    bars
}

fn build_week_markers(range: TimeRange, scale: TimeScale, week_start: Weekday) -> Vec<WeekMarker> {
    let start_day = range.start().date_naive();
    let goal_day = range.goal().date_naive();

    let mut markers = Vec::new();
    let mut day = next_week_boundary(start_day, week_start);
    let mut ordinal = WEEK_ORDINAL_BASE;
    while day <= goal_day {
        markers.push(WeekMarker {
            day,
            x: scale.date_to_x(day_start(day)),
            ordinal,
        });
        ordinal += 1;
        day = day + Duration::days(7);
    }

    if let Some(first) = markers.first() {
        if (first.day - start_day).num_days() < WEEK_MARKER_SUPPRESS_DAYS {
            markers.remove(0);
        }
    }
    markers
}

fn build_day_markers(range: TimeRange, scale: TimeScale, mode: ViewMode) -> Vec<DayMarker> {
    if mode != ViewMode::RecentWindow {
        return Vec::new();
    }

    let goal_day = range.goal().date_naive();
    let mut markers = Vec::new();
    let mut day = range.start().date_naive();
    while day <= goal_day {
        markers.push(DayMarker {
            day,
            x: scale.date_to_x(day_start(day)),
            weekday: day.weekday(),
        });
        day = day + Duration::days(1);
    }
    markers
}

/// First day on or after `from` that falls on the configured week start.
fn next_week_boundary(from: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset = (7 + i64::from(week_start.num_days_from_monday())
        - i64::from(from.weekday().num_days_from_monday()))
        % 7;
    from + Duration::days(offset)
}

/// Most recent day on or before `day` that falls on the configured week start.
#[must_use]
pub fn week_start_of(day: NaiveDate, week_start: Weekday) -> NaiveDate {
    let back = (7 + i64::from(day.weekday().num_days_from_monday())
        - i64::from(week_start.num_days_from_monday()))
        % 7;
    day - Duration::days(back)
}

fn day_start(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}
