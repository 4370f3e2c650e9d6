use serde::{Deserialize, Serialize};

/// Fraction of the min-to-max duration span padded onto both ends.
pub const DURATION_BUFFER_RATIO: f64 = 0.10;
/// Padding is never smaller than this many seconds.
pub const DURATION_BUFFER_MIN_SECONDS: f64 = 30.0;
/// Fallback ceiling when no point carries a usable duration.
pub const DEFAULT_DURATION_CEILING_SECONDS: f64 = 7_200.0;
/// Points land inside the top fraction of the plot height.
const POINT_BAND_RATIO: f64 = 0.90;

/// Vertical scale mapping race durations to pixels.
///
/// Shorter (faster) durations sit higher on screen, so a season that trends
/// toward the goal reads as an upward-rightward line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationScale {
    min_seconds: f64,
    max_seconds: f64,
}

impl DurationScale {
    /// Fits the scale to the given durations with a buffered margin.
    ///
    /// `buffer = max(span * 0.1, 30 s)`; the lower bound is floored at zero.
    /// Non-finite or negative entries are ignored; with nothing usable the
    /// scale falls back to a fixed two-hour ceiling.
    #[must_use]
    pub fn from_durations(durations: &[f64]) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &seconds in durations {
            if !seconds.is_finite() || seconds < 0.0 {
                continue;
            }
            min = min.min(seconds);
            max = max.max(seconds);
        }

        if min > max {
            return Self {
                min_seconds: 0.0,
                max_seconds: DEFAULT_DURATION_CEILING_SECONDS,
            };
        }

        let buffer = ((max - min) * DURATION_BUFFER_RATIO).max(DURATION_BUFFER_MIN_SECONDS);
        Self {
            min_seconds: (min - buffer).max(0.0),
            max_seconds: max + buffer,
        }
    }

    #[must_use]
    pub fn min_seconds(self) -> f64 {
        self.min_seconds
    }

    #[must_use]
    pub fn max_seconds(self) -> f64 {
        self.max_seconds
    }

    #[must_use]
    pub fn span_seconds(self) -> f64 {
        self.max_seconds - self.min_seconds
    }

    /// Maps a duration to a y pixel inside the top 90 % of the plot height.
    ///
    /// Monotonic: a longer (slower) duration always maps to a larger y.
    #[must_use]
    pub fn duration_to_y(self, seconds: f64, plot_top_px: f64, plot_height_px: f64) -> f64 {
        let span = self.span_seconds().max(f64::EPSILON);
        let ratio = (seconds - self.min_seconds) / span;
        plot_top_px + ratio * plot_height_px * POINT_BAND_RATIO
    }
}
