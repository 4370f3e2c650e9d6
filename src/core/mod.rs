pub mod duration_scale;
pub mod time_format;
pub mod timeline;
pub mod types;

pub use duration_scale::DurationScale;
pub use time_format::{format_race_time, parse_race_time};
pub use timeline::{TimeRange, TimeScale, ViewMode, ViewState, RECENT_WINDOW_DAYS};
pub use types::{PlotLayout, Viewport};
