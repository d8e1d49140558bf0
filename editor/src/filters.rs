//! Filter settings and ordered pipeline composition.
//!
//! Each assignment carries a `FilterSettings` record edited slider-by-slider
//! in the UI. [`compose`] flattens the record into a `FilterPlan`: the exact
//! ordered list of pixel operations the renderer runs, plus the normalized
//! numeric parameters they read. The order is fixed (brightness, contrast,
//! hue/saturation, white balance, then at most one preset) so the same
//! settings always produce the same image. [`has_active_filters`] is a cheap
//! gate for skipping filter work entirely; it changes performance, never
//! output.

#[cfg(test)]
#[path = "filters_test.rs"]
mod filters_test;

use serde::{Deserialize, Serialize};

/// An RGB color; the monochrome preset's tint target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for Rgb {
    fn default() -> Self {
        // White tint makes monochrome identical to plain grayscale.
        Self { r: 255, g: 255, b: 255 }
    }
}

/// Per-image filter state as edited in the UI and stored with the assignment.
///
/// Serde defaults keep partial JSON valid: sliders default to 0 with their
/// enable flags on, presets default off, and the master switch defaults on.
/// Slider values are UI-range numbers; `brightness`, `contrast`,
/// `saturation`, `temperature` and `tint` run -100..100, `hue` runs
/// -180..180 degrees.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Master switch. Off means no filter runs regardless of the rest.
    pub enabled: bool,
    pub brightness: f64,
    pub brightness_enabled: bool,
    pub contrast: f64,
    pub contrast_enabled: bool,
    pub saturation: f64,
    pub saturation_enabled: bool,
    pub hue: f64,
    pub hue_enabled: bool,
    pub temperature: f64,
    pub temperature_enabled: bool,
    pub tint: f64,
    pub tint_enabled: bool,
    pub black_white: bool,
    pub sepia: bool,
    pub monochrome: bool,
    pub monochrome_color: Rgb,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            brightness: 0.0,
            brightness_enabled: true,
            contrast: 0.0,
            contrast_enabled: true,
            saturation: 0.0,
            saturation_enabled: true,
            hue: 0.0,
            hue_enabled: true,
            temperature: 0.0,
            temperature_enabled: true,
            tint: 0.0,
            tint_enabled: true,
            black_white: false,
            sepia: false,
            monochrome: false,
            monochrome_color: Rgb::default(),
        }
    }
}

/// One pixel operation in the composed pipeline.
///
/// `Hsl` covers hue rotation and saturation together; `WhiteBalance` covers
/// temperature and tint together. The presets are mutually exclusive in any
/// composed plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Brightness,
    Contrast,
    Hsl,
    WhiteBalance,
    BlackWhite,
    Sepia,
    Monochrome,
}

/// Normalized parameters attached to the composed pipeline.
///
/// `brightness`, `saturation`, `temperature` and `tint` are normalized to
/// -1..1; `contrast` stays in -100..100 (its tone curve consumes that range
/// directly); `hue_degrees` stays in degrees. Ops that were not included
/// read their neutral value (0) here.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterParams {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub hue_degrees: f64,
    pub temperature: f64,
    pub tint: f64,
    pub monochrome_color: Rgb,
}

/// The composed pipeline: ops in execution order plus their parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPlan {
    pub ops: Vec<FilterKind>,
    pub params: FilterParams,
}

impl FilterPlan {
    /// True when no op would run; rendering may skip filter work entirely.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Whether one slider contributes an op: individually enabled and nonzero.
fn slider_active(value: f64, enabled: bool) -> bool {
    enabled && value != 0.0
}

/// Flatten settings into the ordered pipeline.
///
/// Inclusion per slider: master enabled AND the slider's own flag AND a
/// nonzero value (zero is an identity op and is dropped). The combined ops
/// (`Hsl`, `WhiteBalance`) appear when either of their sliders qualifies;
/// the other parameter rides along neutral. At most one preset is emitted,
/// precedence black & white over sepia over monochrome. Out-of-range slider
/// values are clamped to their UI ranges on the way in.
#[must_use]
pub fn compose(settings: &FilterSettings) -> FilterPlan {
    let mut ops = Vec::new();
    let mut params = FilterParams::default();

    if !settings.enabled {
        return FilterPlan { ops, params };
    }

    if slider_active(settings.brightness, settings.brightness_enabled) {
        ops.push(FilterKind::Brightness);
        params.brightness = (settings.brightness / 100.0).clamp(-1.0, 1.0);
    }

    if slider_active(settings.contrast, settings.contrast_enabled) {
        ops.push(FilterKind::Contrast);
        params.contrast = settings.contrast.clamp(-100.0, 100.0);
    }

    let saturation = slider_active(settings.saturation, settings.saturation_enabled);
    let hue = slider_active(settings.hue, settings.hue_enabled);
    if saturation || hue {
        ops.push(FilterKind::Hsl);
        if saturation {
            params.saturation = (settings.saturation / 100.0).clamp(-1.0, 1.0);
        }
        if hue {
            params.hue_degrees = settings.hue.clamp(-180.0, 180.0);
        }
    }

    let temperature = slider_active(settings.temperature, settings.temperature_enabled);
    let tint = slider_active(settings.tint, settings.tint_enabled);
    if temperature || tint {
        ops.push(FilterKind::WhiteBalance);
        if temperature {
            params.temperature = (settings.temperature / 100.0).clamp(-1.0, 1.0);
        }
        if tint {
            params.tint = (settings.tint / 100.0).clamp(-1.0, 1.0);
        }
    }

    if settings.black_white {
        ops.push(FilterKind::BlackWhite);
    } else if settings.sepia {
        ops.push(FilterKind::Sepia);
    } else if settings.monochrome {
        ops.push(FilterKind::Monochrome);
        params.monochrome_color = settings.monochrome_color;
    }

    FilterPlan { ops, params }
}

/// Cheap test for "would [`compose`] emit at least one op".
///
/// Used to skip pipeline setup per image per frame. Must agree with
/// [`compose`] exactly: it gates work, it must never change what is drawn.
#[must_use]
pub fn has_active_filters(settings: &FilterSettings) -> bool {
    if !settings.enabled {
        return false;
    }
    settings.black_white
        || settings.sepia
        || settings.monochrome
        || slider_active(settings.brightness, settings.brightness_enabled)
        || slider_active(settings.contrast, settings.contrast_enabled)
        || slider_active(settings.saturation, settings.saturation_enabled)
        || slider_active(settings.hue, settings.hue_enabled)
        || slider_active(settings.temperature, settings.temperature_enabled)
        || slider_active(settings.tint, settings.tint_enabled)
}
