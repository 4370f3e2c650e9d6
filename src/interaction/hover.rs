use smallvec::SmallVec;

use crate::data::{ChartGeometry, PointCategory};

/// Drawn diameter of a point marker; hover hits within half of it.
pub const POINT_DIAMETER_PX: f64 = 12.0;
/// Week markers respond within this fixed radius.
pub const WEEK_MARKER_HIT_RADIUS_PX: f64 = 6.0;

/// One probed entity, indexed into the current [`ChartGeometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverHit {
    Point(usize),
    Bar(usize),
    Week(usize),
}

/// Entities currently under the probe. Almost always holds 0–2 hits.
pub type HoverSelection = SmallVec<[HoverHit; 4]>;

/// Resolves the probe position (content space) into the set of hovered
/// entities.
///
/// Multiple simultaneous hits are expected — a trial point plus the week
/// marker under it, or two stacked same-day bars. A bar whose activity also
/// produced a hovered point is suppressed so the same activity is never
/// reported twice.
#[must_use]
pub fn resolve_hover(geometry: &ChartGeometry, probe_content_x: f64) -> HoverSelection {
    let mut hits = HoverSelection::new();
    let mut hit_activity_ids: SmallVec<[u64; 4]> = SmallVec::new();

    for (index, point) in geometry.points.iter().enumerate() {
        if (probe_content_x - point.x).abs() < POINT_DIAMETER_PX / 2.0 {
            hits.push(HoverHit::Point(index));
            if let Some(id) = point.activity_id {
                hit_activity_ids.push(id);
            }
        }
    }

    for (index, bar) in geometry.bars.iter().enumerate() {
        if probe_content_x >= bar.x && probe_content_x <= bar.x + bar.width_px {
            if hit_activity_ids.contains(&bar.activity_id) {
                continue;
            }
            hits.push(HoverHit::Bar(index));
        }
    }

    for (index, marker) in geometry.week_markers.iter().enumerate() {
        if (probe_content_x - marker.x).abs() <= WEEK_MARKER_HIT_RADIUS_PX {
            hits.push(HoverHit::Week(index));
        }
    }

    hits
}

/// Builds the human-readable info-panel text for a selection.
///
/// Returns `None` for an empty selection so the caller can fall back to its
/// prompt string.
#[must_use]
pub fn describe_selection(geometry: &ChartGeometry, selection: &HoverSelection) -> Option<String> {
    if selection.is_empty() {
        return None;
    }

    let mut lines = Vec::with_capacity(selection.len());
    for hit in selection {
        match *hit {
            HoverHit::Point(index) => {
                let point = &geometry.points[index];
                let kind = match point.category {
                    PointCategory::Start => "Start",
                    PointCategory::Goal => "Goal",
                    PointCategory::TrialResult => "Trial",
                };
                lines.push(format!(
                    "{kind} {} on {}",
                    point.label,
                    point.date.format("%b %-d")
                ));
            }
            HoverHit::Bar(index) => {
                let bar = &geometry.bars[index];
                let mut line = format!(
                    "{} on {}: {:.1} km in {} min",
                    bar.name,
                    bar.day.format("%b %-d"),
                    bar.distance_meters / 1000.0,
                    (bar.duration_seconds / 60.0).round() as i64
                );
                if let Some(heartrate) = bar.average_heartrate {
                    line.push_str(&format!(", {heartrate:.0} bpm"));
                }
                if let Some(suffer) = bar.suffer_score {
                    line.push_str(&format!(", suffer {suffer:.0}"));
                }
                lines.push(line);
            }
            HoverHit::Week(index) => {
                let marker = &geometry.week_markers[index];
                lines.push(format!("Week {}", marker.ordinal));
            }
        }
    }
    Some(lines.join("\n"))
}
