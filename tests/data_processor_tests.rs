use approx::assert_relative_eq;
use chrono::{Datelike, NaiveDate, TimeZone, Utc, Weekday};
use pace_chart::core::{PlotLayout, ViewMode, Viewport};
use pace_chart::data::{process, Activity, PointCategory, RaceMark};
use pace_chart::interaction::{resolve_hover, HoverHit};

fn start_mark() -> RaceMark {
    RaceMark::new(
        "01:25:00",
        Utc.with_ymd_and_hms(2025, 3, 30, 0, 0, 0).single().expect("start"),
    )
}

fn goal_mark() -> RaceMark {
    RaceMark::new(
        "01:10:00",
        Utc.with_ymd_and_hms(2025, 5, 17, 0, 0, 0).single().expect("goal"),
    )
}

fn activity(id: u64, date: &str, moving_time: f64, workout_type: Option<i64>) -> Activity {
    Activity {
        id,
        name: format!("Run {id}"),
        distance: 10_000.0,
        moving_time,
        start_date_local: date.to_owned(),
        workout_type,
        activity_type: Some("Run".to_owned()),
        sport_type: None,
        average_heartrate: None,
        suffer_score: None,
    }
}

fn run(activities: &[Activity], mode: ViewMode) -> pace_chart::data::ChartGeometry {
    process(
        activities,
        &start_mark(),
        &goal_mark(),
        mode,
        Viewport::new(800, 600),
        PlotLayout::default(),
        Weekday::Mon,
    )
}

#[test]
fn empty_season_yields_start_and_goal_only() {
    let geometry = run(&[], ViewMode::FullSpan);

    assert_eq!(geometry.points.len(), 2);
    assert_eq!(geometry.points[0].category, PointCategory::Start);
    assert_eq!(geometry.points[1].category, PointCategory::Goal);
    assert_eq!(geometry.points[0].label, "01:25:00");
    assert_eq!(geometry.points[1].label, "01:10:00");
    assert!(geometry.bars.is_empty());

    // 5100 s and 4200 s with a max(90, 30) buffer.
    assert_relative_eq!(geometry.y_scale.min_seconds(), 4110.0, epsilon = 1e-9);
    assert_relative_eq!(geometry.y_scale.max_seconds(), 5190.0, epsilon = 1e-9);
}

#[test]
fn malformed_race_times_degrade_to_zero_seconds() {
    let start = RaceMark::new("bogus", start_mark().date);
    let goal = RaceMark::new("also bogus", goal_mark().date);
    let geometry = process(
        &[],
        &start,
        &goal,
        ViewMode::FullSpan,
        Viewport::new(800, 600),
        PlotLayout::default(),
        Weekday::Mon,
    );

    // Malformed race times degrade to zero seconds, so the scale still fits
    // them; the labels make the fallback visible.
    assert_eq!(geometry.points[0].label, "00:00:00");
    assert_eq!(geometry.points[1].label, "00:00:00");
    assert!(geometry.y_scale.min_seconds() >= 0.0);
}

#[test]
fn trial_activity_becomes_labeled_point_without_bar() {
    let geometry = run(
        &[activity(7, "2025-04-26T08:15:00Z", 3726.0, Some(1))],
        ViewMode::FullSpan,
    );

    assert_eq!(geometry.points.len(), 3);
    let trial = &geometry.points[1];
    assert_eq!(trial.category, PointCategory::TrialResult);
    assert_eq!(trial.label, "01:02:06");
    assert_eq!(trial.activity_id, Some(7));
    assert!(geometry.bars.is_empty());
}

#[test]
fn same_day_workouts_stack_and_stay_hoverable() {
    let geometry = run(
        &[
            activity(1, "2025-04-10T07:00:00Z", 3600.0, None),
            activity(2, "2025-04-10T18:00:00Z", 1800.0, None),
        ],
        ViewMode::FullSpan,
    );

    assert_eq!(geometry.bars.len(), 2);
    let (first, second) = (&geometry.bars[0], &geometry.bars[1]);
    assert_relative_eq!(first.x, second.x, epsilon = 1e-9);
    assert_relative_eq!(first.width_px, second.width_px, epsilon = 1e-9);

    // Longest workout spans the whole bar band (45 px under default layout).
    assert_relative_eq!(first.height_px, 45.0, epsilon = 1e-9);
    assert_relative_eq!(second.height_px, 22.5, epsilon = 1e-9);
    assert_relative_eq!(first.stack_offset_px, 0.0, epsilon = 1e-9);
    assert_relative_eq!(second.stack_offset_px, first.height_px, epsilon = 1e-9);

    let hits = resolve_hover(&geometry, first.x + first.width_px / 2.0);
    assert!(hits.contains(&HoverHit::Bar(0)));
    assert!(hits.contains(&HoverHit::Bar(1)));
}

#[test]
fn points_sort_ascending_regardless_of_input_order() {
    let geometry = run(
        &[
            activity(3, "2025-05-03T09:00:00Z", 4500.0, Some(1)),
            activity(2, "2025-04-12T09:00:00Z", 4800.0, Some(1)),
            activity(1, "2025-04-05T09:00:00Z", 5000.0, Some(1)),
        ],
        ViewMode::FullSpan,
    );

    assert_eq!(geometry.points.len(), 5);
    for pair in geometry.points.windows(2) {
        assert!(pair[0].date <= pair[1].date);
    }
    assert_eq!(geometry.points[0].category, PointCategory::Start);
    assert_eq!(
        geometry.points.last().expect("goal point").category,
        PointCategory::Goal
    );
}

#[test]
fn processing_is_idempotent() {
    let activities = vec![
        activity(1, "2025-04-05T09:00:00Z", 5000.0, Some(1)),
        activity(2, "2025-04-06T09:00:00Z", 2400.0, None),
        activity(3, "2025-04-07T09:00:00Z", 3000.0, None),
    ];

    let first = run(&activities, ViewMode::RecentWindow);
    let second = run(&activities, ViewMode::RecentWindow);
    assert_eq!(first, second);
}

#[test]
fn out_of_range_and_invalid_activities_are_skipped() {
    let geometry = run(
        &[
            activity(1, "2025-03-01T09:00:00Z", 3600.0, None),
            activity(2, "2025-06-01T09:00:00Z", 3600.0, None),
            activity(3, "2025-04-10T09:00:00Z", 0.0, None),
            activity(4, "2025-04-11T09:00:00Z", -50.0, None),
            activity(5, "not a date", 3600.0, None),
            activity(6, "2025-04-12T09:00:00Z", 3600.0, None),
        ],
        ViewMode::FullSpan,
    );

    assert_eq!(geometry.bars.len(), 1);
    assert_eq!(geometry.bars[0].activity_id, 6);
}

#[test]
fn week_markers_stride_from_anchored_boundary() {
    let geometry = run(&[], ViewMode::FullSpan);

    // 2025-03-30 is a Sunday; the Monday boundary one day later sits within
    // three days of the start and is suppressed, consuming ordinal 1.
    assert_eq!(geometry.week_markers.len(), 6);
    let first = &geometry.week_markers[0];
    assert_eq!(first.day, NaiveDate::from_ymd_opt(2025, 4, 7).expect("day"));
    assert_eq!(first.ordinal, 2);
    let last = geometry.week_markers.last().expect("last marker");
    assert_eq!(last.day, NaiveDate::from_ymd_opt(2025, 5, 12).expect("day"));
    assert_eq!(last.ordinal, 7);
}

#[test]
fn distant_first_boundary_is_kept() {
    let geometry = process(
        &[],
        &start_mark(),
        &goal_mark(),
        ViewMode::FullSpan,
        Viewport::new(800, 600),
        PlotLayout::default(),
        Weekday::Thu,
    );

    let first = geometry.week_markers.first().expect("first marker");
    assert_eq!(first.day, NaiveDate::from_ymd_opt(2025, 4, 3).expect("day"));
    assert_eq!(first.ordinal, 1);
}

#[test]
fn day_markers_exist_only_in_recent_window() {
    assert!(run(&[], ViewMode::FullSpan).day_markers.is_empty());

    let geometry = run(&[], ViewMode::RecentWindow);
    assert_eq!(geometry.day_markers.len(), 49);
    assert_eq!(geometry.day_markers[0].weekday, Weekday::Sun);
    assert_eq!(
        geometry.day_markers[0].day.weekday(),
        geometry.day_markers[0].weekday
    );
}

#[test]
fn content_bounds_track_point_extremes() {
    let geometry = run(&[], ViewMode::FullSpan);
    assert_relative_eq!(
        geometry.content_bounds.min_x,
        geometry.points[0].x,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        geometry.content_bounds.max_x,
        geometry.points[1].x,
        epsilon = 1e-9
    );
    assert!(geometry.content_bounds.min_x < geometry.content_bounds.max_x);
}

#[test]
fn duration_maps_monotonically_to_y() {
    let geometry = run(
        &[activity(1, "2025-04-20T09:00:00Z", 4500.0, Some(1))],
        ViewMode::FullSpan,
    );

    // Slower times sit lower: 5100 s start below 4500 s trial below 4200 s goal.
    let start_y = geometry.points[0].y;
    let trial_y = geometry.points[1].y;
    let goal_y = geometry.points[2].y;
    assert!(start_y > trial_y);
    assert!(trial_y > goal_y);
}

#[test]
fn batch_decode_skips_malformed_records() {
    let json = r#"[
        {"id": 1, "name": "Long run", "moving_time": 5400.0,
         "start_date_local": "2025-04-10T07:00:00Z", "distance": 18000.0},
        {"id": 2, "name": "Missing duration",
         "start_date_local": "2025-04-11T07:00:00Z"}
    ]"#;

    let activities = Activity::batch_from_json(json).expect("array decodes");
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].id, 1);

    assert!(Activity::batch_from_json("{\"not\": \"an array\"}").is_err());
    assert!(Activity::batch_from_json("nonsense").is_err());
}

#[test]
fn activity_start_dates_parse_tolerantly() {
    let rfc = activity(1, "2025-04-10T08:00:00Z", 1.0, None);
    let naive = activity(2, "2025-04-10T08:00:00", 1.0, None);
    let bare = activity(3, "2025-04-10", 1.0, None);
    let bad = activity(4, "April 10th", 1.0, None);

    assert!(rfc.local_start().is_some());
    assert_eq!(rfc.local_start(), naive.local_start());
    assert!(bare.local_start().is_some());
    assert!(bad.local_start().is_none());
}
