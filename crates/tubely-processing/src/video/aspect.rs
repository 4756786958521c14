use std::fmt::{Display, Formatter, Result as FmtResult};

const WIDESCREEN_RATIO: f64 = 16.0 / 9.0;
const VERTICAL_RATIO: f64 = 9.0 / 16.0;

/// A ratio matches a target only when strictly closer than this.
pub const ASPECT_TOLERANCE: f64 = 0.01;

/// Coarse aspect-ratio category used to partition video storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectBucket {
    Widescreen,
    Vertical,
    Other,
}

impl AspectBucket {
    pub fn from_ratio(ratio: f64) -> Self {
        let within = |target: f64| (ratio - target).abs() < ASPECT_TOLERANCE;
        if within(WIDESCREEN_RATIO) {
            AspectBucket::Widescreen
        } else if within(VERTICAL_RATIO) {
            AspectBucket::Vertical
        } else {
            AspectBucket::Other
        }
    }

    /// Classify from pixel dimensions. Zero height is classified as `Other`.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if height == 0 {
            return AspectBucket::Other;
        }
        Self::from_ratio(width as f64 / height as f64)
    }

    /// Storage key prefix for this bucket.
    pub fn label(&self) -> &'static str {
        match self {
            AspectBucket::Widescreen => "widescreen",
            AspectBucket::Vertical => "vertical",
            AspectBucket::Other => "other",
        }
    }
}

impl Display for AspectBucket {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}
