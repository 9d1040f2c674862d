//! Extraction options and configuration.

/// Options for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Minimum classifier confidence for a heading prediction to stand;
    /// lower predictions are reclassified as body text
    pub confidence_floor: f32,

    /// Max vertical distance (pt) between duplicate heading runs for the
    /// assembler to collapse them
    pub dedup_y_tolerance: f32,

    /// Confidence lead a Title candidate needs to win outright over
    /// competing Title predictions
    pub title_margin: f32,

    /// Whether to classify spans in parallel for large documents
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the confidence floor.
    pub fn with_confidence_floor(mut self, floor: f32) -> Self {
        self.confidence_floor = floor.clamp(0.0, 1.0);
        self
    }

    /// Set the deduplication y tolerance.
    pub fn with_dedup_tolerance(mut self, tolerance: f32) -> Self {
        self.dedup_y_tolerance = tolerance.max(0.0);
        self
    }

    /// Set the Title-selection confidence margin.
    pub fn with_title_margin(mut self, margin: f32) -> Self {
        self.title_margin = margin.clamp(0.0, 1.0);
        self
    }

    /// Enable or disable parallel classification.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel classification.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            confidence_floor: 0.5,
            dedup_y_tolerance: 2.5,
            title_margin: 0.05,
            parallel: true,
        }
    }
}
