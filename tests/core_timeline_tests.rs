use approx::assert_relative_eq;
use chrono::{TimeZone, Utc};
use pace_chart::core::{
    PlotLayout, TimeRange, TimeScale, ViewMode, ViewState, Viewport, RECENT_WINDOW_DAYS,
};

fn range_48_days() -> TimeRange {
    TimeRange::new(
        Utc.with_ymd_and_hms(2025, 3, 30, 0, 0, 0).single().expect("start"),
        Utc.with_ymd_and_hms(2025, 5, 17, 0, 0, 0).single().expect("goal"),
    )
}

#[test]
fn range_endpoints_map_to_padding_and_content_width() {
    let range = range_48_days();
    let scale = TimeScale::new(range, 1000.0, 60.0);

    assert_relative_eq!(scale.date_to_x(range.start()), 60.0, epsilon = 1e-9);
    assert_relative_eq!(scale.date_to_x(range.goal()), 1060.0, epsilon = 1e-9);
}

#[test]
fn centered_mapping_shifts_by_half_a_day() {
    let range = range_48_days();
    let scale = TimeScale::new(range, 960.0, 60.0);

    let day_width = scale.day_width_px();
    let start_x = scale.date_to_x(range.start());
    let centered = scale.date_to_centered_x(range.start());
    assert_relative_eq!(centered - start_x, day_width / 2.0, epsilon = 1e-9);
}

#[test]
fn zero_length_span_degrades_to_ratio_zero() {
    let date = Utc.with_ymd_and_hms(2025, 3, 30, 0, 0, 0).single().expect("date");
    let range = TimeRange::new(date, date);
    let scale = TimeScale::new(range, 800.0, 60.0);

    assert_eq!(range.time_ratio(date), 0.0);
    assert_relative_eq!(scale.date_to_x(date), 60.0, epsilon = 1e-9);
    assert!(range.span_ms() >= 1);
}

#[test]
fn inverted_range_clamps_span_to_one_millisecond() {
    let start = Utc.with_ymd_and_hms(2025, 5, 17, 0, 0, 0).single().expect("start");
    let goal = Utc.with_ymd_and_hms(2025, 3, 30, 0, 0, 0).single().expect("goal");
    let range = TimeRange::new(start, goal);

    assert_eq!(range.span_ms(), 1);
    assert_eq!(range.time_ratio(start), 0.0);
}

#[test]
fn full_span_content_width_equals_plot_width() {
    let range = range_48_days();
    let width = ViewState::content_width_for(ViewMode::FullSpan, range, 710.0);
    assert_relative_eq!(width, 710.0, epsilon = 1e-9);
}

#[test]
fn recent_window_stretches_content_by_span_over_window() {
    let range = range_48_days();
    let width = ViewState::content_width_for(ViewMode::RecentWindow, range, 710.0);
    assert_relative_eq!(width, 48.0 / RECENT_WINDOW_DAYS * 710.0, epsilon = 1e-6);

    // Three weeks of days at this zoom exactly fill the plot.
    let scale = TimeScale::new(range, width, 0.0);
    assert_relative_eq!(
        scale.day_width_px() * RECENT_WINDOW_DAYS,
        710.0,
        epsilon = 1e-6
    );
}

#[test]
fn pan_clamps_between_zero_and_overflow() {
    let mut view = ViewState::new(ViewMode::RecentWindow);
    view.content_width_px = 1600.0;

    view.pan_offset_px = -250.0;
    view.clamp_pan(710.0);
    assert_eq!(view.pan_offset_px, 0.0);

    view.pan_offset_px = 5000.0;
    view.clamp_pan(710.0);
    assert_relative_eq!(view.pan_offset_px, 890.0, epsilon = 1e-9);
}

#[test]
fn narrow_content_is_centered() {
    let mut view = ViewState::new(ViewMode::RecentWindow);
    view.content_width_px = 500.0;
    view.pan_offset_px = 120.0;
    view.clamp_pan(710.0);

    assert_relative_eq!(view.pan_offset_px, -105.0, epsilon = 1e-9);
    assert!(!view.is_pannable(710.0));
}

#[test]
fn recompute_derives_width_and_reclamps() {
    let range = range_48_days();
    let mut view = ViewState::new(ViewMode::RecentWindow);
    view.pan_offset_px = 10_000.0;
    view.recompute(range, 710.0);

    let expected = 48.0 / RECENT_WINDOW_DAYS * 710.0;
    assert_relative_eq!(view.content_width_px, expected, epsilon = 1e-6);
    assert!(view.pan_offset_px <= view.max_pan_px(710.0));
}

#[test]
fn layout_reserves_bar_band_and_axis() {
    let layout = PlotLayout::default();
    let viewport = Viewport::new(800, 600);

    assert_relative_eq!(layout.plot_width(viewport), 710.0, epsilon = 1e-9);
    assert_relative_eq!(layout.axis_y(viewport), 510.0, epsilon = 1e-9);
    assert_relative_eq!(layout.bar_band_height(), 45.0, epsilon = 1e-9);
    assert!(layout.validate().is_ok());
}

#[test]
fn negative_padding_is_rejected() {
    let layout = PlotLayout {
        left_padding_px: -1.0,
        ..PlotLayout::default()
    };
    assert!(layout.validate().is_err());
}
