//! Tone-mapping control state and render parameter snapshots.

use serde::{Deserialize, Serialize};

/// Exposure slider value after an upload.
pub const DEFAULT_EXPOSURE: f64 = 6.0;
/// Gamma slider value after an upload.
pub const DEFAULT_GAMMA: f64 = 2.2;
/// Gamma emitted while the sRGB curve is selected.
pub const SRGB_GAMMA: f64 = 2.4;
/// Default false-color range lower bound (cd/m²).
pub const DEFAULT_FALSECOLOR_MIN: f64 = 0.0;
/// Default false-color range upper bound (cd/m²).
pub const DEFAULT_FALSECOLOR_MAX: f64 = 1000.0;
/// Minimum gap enforced between the false-color bounds.
pub const FALSECOLOR_MIN_SPAN: f64 = 0.1;

/// Exposure slider range.
pub const EXPOSURE_RANGE: std::ops::RangeInclusive<f64> = -10.0..=20.0;
/// Gamma slider range.
pub const GAMMA_RANGE: std::ops::RangeInclusive<f64> = 1.0..=3.0;

/// Colormaps available for false-color rendering.
///
/// Names are the backend's matplotlib colormap names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Jet,
    Viridis,
    Inferno,
    Magma,
    Plasma,
    Turbo,
    Hot,
    Cividis,
}

impl Colormap {
    /// Get the wire name of this colormap.
    pub fn name(&self) -> &'static str {
        match self {
            Colormap::Jet => "jet",
            Colormap::Viridis => "viridis",
            Colormap::Inferno => "inferno",
            Colormap::Magma => "magma",
            Colormap::Plasma => "plasma",
            Colormap::Turbo => "turbo",
            Colormap::Hot => "hot",
            Colormap::Cividis => "cividis",
        }
    }

    /// Get all colormaps in display order.
    pub fn all() -> &'static [Colormap] {
        &[
            Colormap::Jet,
            Colormap::Viridis,
            Colormap::Inferno,
            Colormap::Magma,
            Colormap::Plasma,
            Colormap::Turbo,
            Colormap::Hot,
            Colormap::Cividis,
        ]
    }
}

/// Parameters of one render request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderParameters {
    pub exposure: f64,
    pub gamma: f64,
    pub use_srgb: bool,
    pub false_color: bool,
    pub colormap: Colormap,
    pub falsecolor_min: f64,
    pub falsecolor_max: f64,
}

/// Current values of the tone-mapping controls.
///
/// Invariants kept by the setters:
/// - `falsecolor_max > falsecolor_min`
/// - while sRGB is on, `gamma` shows [`SRGB_GAMMA`] and `last_gamma` holds
///   the manual value to restore
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    exposure: f64,
    gamma: f64,
    last_gamma: f64,
    use_srgb: bool,
    false_color: bool,
    colormap: Colormap,
    falsecolor_min: f64,
    falsecolor_max: f64,
    show_color_scale: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            exposure: DEFAULT_EXPOSURE,
            gamma: DEFAULT_GAMMA,
            last_gamma: DEFAULT_GAMMA,
            use_srgb: false,
            false_color: false,
            colormap: Colormap::default(),
            falsecolor_min: DEFAULT_FALSECOLOR_MIN,
            falsecolor_max: DEFAULT_FALSECOLOR_MAX,
            show_color_scale: true,
        }
    }
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore every control to its post-upload value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn exposure(&self) -> f64 {
        self.exposure
    }

    /// Gamma as shown on the slider.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Manual gamma remembered across the sRGB override.
    pub fn last_gamma(&self) -> f64 {
        self.last_gamma
    }

    pub fn use_srgb(&self) -> bool {
        self.use_srgb
    }

    pub fn false_color(&self) -> bool {
        self.false_color
    }

    pub fn colormap(&self) -> Colormap {
        self.colormap
    }

    pub fn falsecolor_range(&self) -> (f64, f64) {
        (self.falsecolor_min, self.falsecolor_max)
    }

    pub fn show_color_scale(&self) -> bool {
        self.show_color_scale
    }

    /// Exposure is inert in false-color mode.
    pub fn exposure_enabled(&self) -> bool {
        !self.false_color
    }

    /// Gamma is inert in false-color mode and under the sRGB override.
    pub fn gamma_enabled(&self) -> bool {
        !self.false_color && !self.use_srgb
    }

    /// Whether the color-scale legend should be displayed.
    pub fn color_scale_visible(&self) -> bool {
        self.false_color && self.show_color_scale
    }

    /// Returns true if the value changed.
    pub fn set_exposure(&mut self, exposure: f64) -> bool {
        if !exposure.is_finite() || exposure == self.exposure {
            return false;
        }
        self.exposure = exposure;
        true
    }

    /// Set a manual gamma. Ignored while gamma is inert.
    pub fn set_gamma(&mut self, gamma: f64) -> bool {
        if !self.gamma_enabled() || !gamma.is_finite() || gamma == self.gamma {
            return false;
        }
        self.gamma = gamma;
        self.last_gamma = gamma;
        true
    }

    /// Toggle the sRGB curve.
    ///
    /// Enabling remembers the manual gamma and shows [`SRGB_GAMMA`];
    /// disabling restores the remembered value exactly.
    pub fn set_use_srgb(&mut self, use_srgb: bool) -> bool {
        if use_srgb == self.use_srgb {
            return false;
        }
        if use_srgb {
            self.last_gamma = self.gamma;
            self.gamma = SRGB_GAMMA;
        } else {
            self.gamma = self.last_gamma;
        }
        self.use_srgb = use_srgb;
        true
    }

    pub fn set_false_color(&mut self, false_color: bool) -> bool {
        if false_color == self.false_color {
            return false;
        }
        self.false_color = false_color;
        true
    }

    pub fn set_colormap(&mut self, colormap: Colormap) -> bool {
        if colormap == self.colormap {
            return false;
        }
        self.colormap = colormap;
        true
    }

    /// Edit the false-color range.
    ///
    /// Non-finite bounds are ignored. If `max <= min`, max is raised to
    /// `min + 0.1` rounded to one decimal.
    pub fn set_falsecolor_range(&mut self, min: f64, max: f64) -> bool {
        if !min.is_finite() || !max.is_finite() {
            return false;
        }
        let max = if max <= min {
            round_to_tenth(min + FALSECOLOR_MIN_SPAN)
        } else {
            max
        };
        // Rounding can fall back onto min for huge magnitudes
        if max <= min {
            log::debug!("False-color range rejected: min={} max={}", min, max);
            return false;
        }
        if min == self.falsecolor_min && max == self.falsecolor_max {
            return false;
        }
        self.falsecolor_min = min;
        self.falsecolor_max = max;
        true
    }

    /// Returns true if the value changed.
    pub fn set_show_color_scale(&mut self, show: bool) -> bool {
        if show == self.show_color_scale {
            return false;
        }
        self.show_color_scale = show;
        true
    }

    /// Snapshot the controls into render parameters.
    ///
    /// Exposure and gamma are sent even in false-color mode. Under sRGB the
    /// emitted gamma is always [`SRGB_GAMMA`].
    pub fn build(&self) -> RenderParameters {
        RenderParameters {
            exposure: self.exposure,
            gamma: if self.use_srgb { SRGB_GAMMA } else { self.gamma },
            use_srgb: self.use_srgb,
            false_color: self.false_color,
            colormap: self.colormap,
            falsecolor_min: self.falsecolor_min,
            falsecolor_max: self.falsecolor_max,
        }
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ControlState::new().build();
        assert_eq!(params.exposure, 6.0);
        assert_eq!(params.gamma, 2.2);
        assert!(!params.use_srgb);
        assert!(!params.false_color);
        assert_eq!(params.colormap, Colormap::Jet);
        assert_eq!((params.falsecolor_min, params.falsecolor_max), (0.0, 1000.0));
    }

    #[test]
    fn test_srgb_round_trip_restores_gamma() {
        let mut controls = ControlState::new();
        assert!(controls.set_gamma(1.8));

        assert!(controls.set_use_srgb(true));
        assert_eq!(controls.gamma(), SRGB_GAMMA);
        assert_eq!(controls.build().gamma, SRGB_GAMMA);
        assert!(!controls.gamma_enabled());

        assert!(controls.set_use_srgb(false));
        assert_eq!(controls.gamma(), 1.8);
        assert_eq!(controls.build().gamma, 1.8);
    }

    #[test]
    fn test_gamma_ignored_while_inert() {
        let mut controls = ControlState::new();
        controls.set_use_srgb(true);
        assert!(!controls.set_gamma(1.5));
        assert_eq!(controls.last_gamma(), DEFAULT_GAMMA);

        controls.set_use_srgb(false);
        controls.set_false_color(true);
        assert!(!controls.set_gamma(1.5));
        assert!(!controls.exposure_enabled());
    }

    #[test]
    fn test_false_color_still_sends_exposure_and_gamma() {
        let mut controls = ControlState::new();
        controls.set_exposure(3.0);
        controls.set_gamma(2.0);
        controls.set_false_color(true);

        let params = controls.build();
        assert!(params.false_color);
        assert_eq!(params.exposure, 3.0);
        assert_eq!(params.gamma, 2.0);
    }

    #[test]
    fn test_range_auto_adjusts_max() {
        let mut controls = ControlState::new();
        assert!(controls.set_falsecolor_range(500.0, 200.0));
        assert_eq!(controls.falsecolor_range(), (500.0, 500.1));

        assert!(controls.set_falsecolor_range(12.34, 12.34));
        assert_eq!(controls.falsecolor_range(), (12.34, 12.4));
    }

    #[test]
    fn test_range_ignores_non_finite() {
        let mut controls = ControlState::new();
        assert!(!controls.set_falsecolor_range(f64::NAN, 10.0));
        assert!(!controls.set_falsecolor_range(0.0, f64::INFINITY));
        assert_eq!(controls.falsecolor_range(), (0.0, 1000.0));
    }

    #[test]
    fn test_range_rejects_unrepresentable_span() {
        let mut controls = ControlState::new();
        assert!(!controls.set_falsecolor_range(1e20, 0.0));
        assert_eq!(controls.falsecolor_range(), (0.0, 1000.0));
    }

    #[test]
    fn test_color_scale_visibility() {
        let mut controls = ControlState::new();
        assert!(!controls.color_scale_visible());
        controls.set_false_color(true);
        assert!(controls.color_scale_visible());
        controls.set_show_color_scale(false);
        assert!(!controls.color_scale_visible());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut controls = ControlState::new();
        controls.set_gamma(1.2);
        controls.set_use_srgb(true);
        controls.set_false_color(true);
        controls.set_colormap(Colormap::Magma);
        controls.set_show_color_scale(false);

        controls.reset();
        assert_eq!(controls, ControlState::default());
    }

    #[test]
    fn test_parameters_wire_names() {
        let mut controls = ControlState::new();
        controls.set_colormap(Colormap::Viridis);
        let json = serde_json::to_value(controls.build()).unwrap();
        assert_eq!(json["useSrgb"], false);
        assert_eq!(json["falseColor"], false);
        assert_eq!(json["colormap"], "viridis");
        assert_eq!(json["falsecolorMax"], 1000.0);
    }

    #[test]
    fn test_colormap_names_round_trip() {
        for colormap in Colormap::all() {
            let json = serde_json::to_string(colormap).unwrap();
            assert_eq!(json, format!("\"{}\"", colormap.name()));
        }
    }
}
