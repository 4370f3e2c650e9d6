pub mod activity;
pub mod geometry;
pub mod processor;

pub use activity::{Activity, RACE_WORKOUT_TYPE};
pub use geometry::{
    ChartGeometry, ContentBounds, DayMarker, PointCategory, ScoredPoint, WeekMarker, WorkoutBar,
};
pub use processor::{process, RaceMark};
