//! Density themes and the quantized color lookup table.
//!
//! Rendering never interpolates colors per cell: a 101-entry LUT is built
//! once per `(theme, mode)` pair and the hot loop does index lookups only.

use eframe::egui::Color32;
use once_cell::sync::Lazy;

/// Number of quantization steps; the LUT holds `LUT_STEPS + 1` entries so a
/// level of exactly 1.0 has its own slot.
pub const LUT_STEPS: usize = 100;

/// Alpha floor for the faintest gradient entries (fraction of full opacity).
const GRADIENT_ALPHA_FLOOR: f64 = 0.2;

/// Fixed alpha for banded-mode tiers.
const BANDED_ALPHA: u8 = 217;

// ── Theme ──────────────────────────────────────────────────────────────────────

/// Four anchor colors defining the density gradient, faint to extreme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub low: Color32,
    pub medium: Color32,
    pub high: Color32,
    pub extreme: Color32,
}

/// Named theme presets, selectable from the heatmap window.
pub static THEMES: Lazy<Vec<(&'static str, Theme)>> = Lazy::new(|| {
    vec![
        (
            "Thermal",
            Theme {
                low: Color32::from_rgb(13, 35, 69),
                medium: Color32::from_rgb(114, 36, 108),
                high: Color32::from_rgb(230, 85, 13),
                extreme: Color32::from_rgb(252, 221, 63),
            },
        ),
        (
            "Ice",
            Theme {
                low: Color32::from_rgb(8, 48, 107),
                medium: Color32::from_rgb(49, 130, 189),
                high: Color32::from_rgb(158, 202, 225),
                extreme: Color32::from_rgb(247, 251, 255),
            },
        ),
    ]
});

impl Default for Theme {
    fn default() -> Self {
        THEMES[0].1
    }
}

/// How normalized density maps to color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualMode {
    /// Piecewise-linear blend across the four anchors, alpha scaling with level.
    Gradient,
    /// Four posterized tiers at fixed high alpha, contour-like.
    Banded,
}

// ── LUT ────────────────────────────────────────────────────────────────────────

/// Precomputed color table indexed by `floor(level * LUT_STEPS)`.
///
/// Rebuilt wholesale when the `(theme, mode)` key changes and otherwise
/// reused read-only across frames.
pub struct ColorLut {
    table: Vec<Color32>,
    key: (Theme, VisualMode),
}

impl ColorLut {
    pub fn new(theme: Theme, mode: VisualMode) -> Self {
        Self {
            table: build_table(theme, mode),
            key: (theme, mode),
        }
    }

    /// Rebuild the table only if the theme or mode changed since last time.
    pub fn rebuild_if_changed(&mut self, theme: Theme, mode: VisualMode) {
        if self.key != (theme, mode) {
            self.table = build_table(theme, mode);
            self.key = (theme, mode);
        }
    }

    /// Color for a normalized level in `[0, 1]`. Out-of-range input clamps
    /// to the table ends.
    pub fn sample(&self, level: f64) -> Color32 {
        let index = (level.max(0.0) * LUT_STEPS as f64) as usize;
        self.table[index.min(LUT_STEPS)]
    }
}

impl Default for ColorLut {
    fn default() -> Self {
        Self::new(Theme::default(), VisualMode::Gradient)
    }
}

fn build_table(theme: Theme, mode: VisualMode) -> Vec<Color32> {
    (0..=LUT_STEPS)
        .map(|i| {
            let t = i as f64 / LUT_STEPS as f64;
            match mode {
                VisualMode::Gradient => gradient_color(theme, t),
                VisualMode::Banded => banded_color(theme, t),
            }
        })
        .collect()
}

fn gradient_color(theme: Theme, t: f64) -> Color32 {
    // Three equal segments across the four anchors.
    let (from, to, s) = if t < 1.0 / 3.0 {
        (theme.low, theme.medium, t * 3.0)
    } else if t < 2.0 / 3.0 {
        (theme.medium, theme.high, (t - 1.0 / 3.0) * 3.0)
    } else {
        (theme.high, theme.extreme, (t - 2.0 / 3.0) * 3.0)
    };

    let alpha = GRADIENT_ALPHA_FLOOR + (1.0 - GRADIENT_ALPHA_FLOOR) * t;
    let rgb = lerp(from, to, s);
    Color32::from_rgba_unmultiplied(rgb.r(), rgb.g(), rgb.b(), (alpha * 255.0) as u8)
}

fn banded_color(theme: Theme, t: f64) -> Color32 {
    let anchor = if t < 0.25 {
        theme.low
    } else if t < 0.50 {
        theme.medium
    } else if t < 0.75 {
        theme.high
    } else {
        theme.extreme
    };
    Color32::from_rgba_unmultiplied(anchor.r(), anchor.g(), anchor.b(), BANDED_ALPHA)
}

fn lerp(from: Color32, to: Color32, s: f64) -> Color32 {
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * s) as u8;
    Color32::from_rgb(
        mix(from.r(), to.r()),
        mix(from.g(), to.g()),
        mix(from.b(), to.b()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_one_entry_per_quantized_step() {
        let lut = ColorLut::new(Theme::default(), VisualMode::Gradient);
        assert_eq!(lut.table.len(), LUT_STEPS + 1);
    }

    #[test]
    fn gradient_endpoints_hit_the_anchor_colors() {
        let theme = Theme::default();
        let lut = ColorLut::new(theme, VisualMode::Gradient);

        let lo = lut.sample(0.0);
        assert_eq!((lo.r(), lo.g(), lo.b()), (theme.low.r(), theme.low.g(), theme.low.b()));
        assert_eq!(lo.a(), (GRADIENT_ALPHA_FLOOR * 255.0) as u8);

        let hi = lut.sample(1.0);
        assert_eq!(
            (hi.r(), hi.g(), hi.b()),
            (theme.extreme.r(), theme.extreme.g(), theme.extreme.b())
        );
        assert_eq!(hi.a(), 255);
    }

    #[test]
    fn banded_mode_snaps_to_four_tiers() {
        let theme = Theme::default();
        let lut = ColorLut::new(theme, VisualMode::Banded);

        let rgb = |c: Color32| (c.r(), c.g(), c.b());
        assert_eq!(rgb(lut.sample(0.10)), rgb(theme.low));
        assert_eq!(rgb(lut.sample(0.25)), rgb(theme.medium)); // tier boundary
        assert_eq!(rgb(lut.sample(0.60)), rgb(theme.high));
        assert_eq!(rgb(lut.sample(0.90)), rgb(theme.extreme));
        assert_eq!(lut.sample(0.90).a(), BANDED_ALPHA);
    }

    #[test]
    fn out_of_range_levels_clamp() {
        let lut = ColorLut::default();
        assert_eq!(lut.sample(-0.5), lut.sample(0.0));
        assert_eq!(lut.sample(2.0), lut.sample(1.0));
    }

    #[test]
    fn rebuild_only_on_key_change() {
        let theme = Theme::default();
        let mut lut = ColorLut::new(theme, VisualMode::Gradient);
        let before = lut.table.clone();

        lut.rebuild_if_changed(theme, VisualMode::Gradient);
        assert_eq!(lut.table, before); // unchanged key, identical table

        lut.rebuild_if_changed(theme, VisualMode::Banded);
        assert_ne!(lut.table, before);
    }
}
