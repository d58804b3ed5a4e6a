//! The live image session and backend-computed summaries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-side identifier of an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Luminance summary of the whole image in cd/m².
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LuminanceStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl fmt::Display for LuminanceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Min={:.1} Max={:.1} Mean={:.1}",
            self.min, self.max, self.mean
        )
    }
}

/// The single live session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub filename: String,
    pub source_width: u32,
    pub source_height: u32,
    /// Factor applied by the backend to reported luminance; 1.0 until calibrated
    pub calibration_scale: f64,
    pub calibrated: bool,
    pub stats: LuminanceStats,
}

impl Session {
    pub fn new(
        id: SessionId,
        filename: impl Into<String>,
        source_width: u32,
        source_height: u32,
        stats: LuminanceStats,
    ) -> Self {
        Self {
            id,
            filename: filename.into(),
            source_width,
            source_height,
            calibration_scale: 1.0,
            calibrated: false,
            stats,
        }
    }

    /// Adopt a backend calibration result.
    pub fn apply_calibration(&mut self, scale: f64, stats: LuminanceStats) {
        self.calibration_scale = scale;
        self.calibrated = true;
        self.stats = stats;
    }

    /// Status line, e.g. `Calibrated ×2.00`.
    pub fn calibration_status(&self) -> String {
        if self.calibrated {
            format!("Calibrated ×{:.2}", self.calibration_scale)
        } else {
            "Not calibrated".to_string()
        }
    }

    /// Dimensions label, e.g. `1,920 × 1,080`.
    pub fn dimensions_label(&self) -> String {
        format!(
            "{} × {}",
            group_thousands(self.source_width),
            group_thousands(self.source_height)
        )
    }
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Which luminance a histogram is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistogramMode {
    /// Luminance after the calibration scale
    #[default]
    Calibrated,
    /// Luminance as decoded
    Original,
}

impl HistogramMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistogramMode::Calibrated => "calibrated",
            HistogramMode::Original => "original",
        }
    }

    pub fn all() -> &'static [HistogramMode] {
        &[HistogramMode::Calibrated, HistogramMode::Original]
    }
}

/// Smallest bin position plotted on the logarithmic axis.
pub const HISTOGRAM_MIN_BIN: f64 = 1e-6;

/// Luminance histogram as returned by the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// `(bin, count)` pairs ready for a log-x plot.
    ///
    /// Bins are clamped to [`HISTOGRAM_MIN_BIN`]; missing counts read as 0.
    pub fn plot_points(&self) -> Vec<[f64; 2]> {
        self.bins
            .iter()
            .enumerate()
            .map(|(i, &bin)| {
                let count = self.counts.get(i).copied().unwrap_or(0);
                [bin.max(HISTOGRAM_MIN_BIN), count as f64]
            })
            .collect()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}
