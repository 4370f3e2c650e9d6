use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Fixed pixel paddings framing the plot area.
///
/// The bottom padding reserves room for the date axis; workout bars grow
/// upward from the axis line into a band half that padding tall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotLayout {
    pub left_padding_px: f64,
    pub right_padding_px: f64,
    pub top_padding_px: f64,
    pub bottom_padding_px: f64,
}

impl Default for PlotLayout {
    fn default() -> Self {
        Self {
            left_padding_px: 60.0,
            right_padding_px: 30.0,
            top_padding_px: 40.0,
            bottom_padding_px: 90.0,
        }
    }
}

impl PlotLayout {
    pub fn validate(self) -> ChartResult<Self> {
        for (name, value) in [
            ("left", self.left_padding_px),
            ("right", self.right_padding_px),
            ("top", self.top_padding_px),
            ("bottom", self.bottom_padding_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{name} padding must be finite and >= 0"
                )));
            }
        }
        Ok(self)
    }

    #[must_use]
    pub fn plot_width(self, viewport: Viewport) -> f64 {
        (f64::from(viewport.width) - self.left_padding_px - self.right_padding_px).max(1.0)
    }

    #[must_use]
    pub fn plot_height(self, viewport: Viewport) -> f64 {
        (f64::from(viewport.height) - self.top_padding_px - self.bottom_padding_px).max(1.0)
    }

    #[must_use]
    pub fn plot_top(self) -> f64 {
        self.top_padding_px
    }

    /// Y pixel of the horizontal date axis.
    #[must_use]
    pub fn axis_y(self, viewport: Viewport) -> f64 {
        (f64::from(viewport.height) - self.bottom_padding_px).max(self.top_padding_px)
    }

    /// Maximum workout-bar height.
    #[must_use]
    pub fn bar_band_height(self) -> f64 {
        self.bottom_padding_px * 0.5
    }

    /// X pixel of the right edge of the plot area.
    #[must_use]
    pub fn plot_right(self, viewport: Viewport) -> f64 {
        self.left_padding_px + self.plot_width(viewport)
    }
}
