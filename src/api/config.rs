use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::core::{PlotLayout, ViewMode, Viewport};
use crate::data::RaceMark;
use crate::render::Palette;

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart
/// setup without inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    pub viewport: Viewport,
    pub start: RaceMark,
    pub goal: RaceMark,
    /// Week-start weekday index: 0 = Monday … 6 = Sunday.
    #[serde(default)]
    pub week_start_index: u8,
    #[serde(default)]
    pub layout: PlotLayout,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub view_mode: ViewMode,
}

impl ChartEngineConfig {
    #[must_use]
    pub fn new(viewport: Viewport, start: RaceMark, goal: RaceMark) -> Self {
        Self {
            viewport,
            start,
            goal,
            week_start_index: 0,
            layout: PlotLayout::default(),
            palette: Palette::default(),
            view_mode: ViewMode::default(),
        }
    }

    #[must_use]
    pub fn with_week_start_index(mut self, index: u8) -> Self {
        self.week_start_index = index;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: PlotLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn with_view_mode(mut self, mode: ViewMode) -> Self {
        self.view_mode = mode;
        self
    }

    /// Week-start index resolved to a weekday; out-of-range indices wrap.
    #[must_use]
    pub fn week_start(&self) -> Weekday {
        match self.week_start_index % 7 {
            0 => Weekday::Mon,
            1 => Weekday::Tue,
            2 => Weekday::Wed,
            3 => Weekday::Thu,
            4 => Weekday::Fri,
            5 => Weekday::Sat,
            _ => Weekday::Sun,
        }
    }
}
