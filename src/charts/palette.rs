//! Deterministic color assignment for chart series
//!
//! Category colors are evenly spaced hues: index `i` of `n` categories gets
//! hue `(i * 360) / n` at fixed saturation and lightness, with alpha 0.5 for
//! fills and 1.0 for strokes. Same input order always yields the same
//! colors, which keeps legend coloring stable across re-renders.
//!
//! Pie charts use a bounded fixed-hue palette instead, applied cyclically
//! when there are more slices than palette entries.

/// An HSLA color; hue in degrees, saturation/lightness/alpha as fractions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    /// Hue in degrees (0-360)
    pub h: f64,
    /// Saturation fraction (0-1)
    pub s: f64,
    /// Lightness fraction (0-1)
    pub l: f64,
    /// Alpha fraction (0-1)
    pub a: f64,
}

impl Hsla {
    /// Formats the color as a CSS `hsla(...)` string
    pub fn to_css(&self) -> String {
        format!(
            "hsla({:.0}, {:.0}%, {:.0}%, {:.1})",
            self.h,
            self.s * 100.0,
            self.l * 100.0,
            self.a
        )
    }

    /// Converts to 8-bit RGB, dropping alpha
    ///
    /// Terminal output has no alpha channel; renderers that do should use
    /// [`Hsla::to_css`] instead.
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        let h = self.h.rem_euclid(360.0);
        let c = (1.0 - (2.0 * self.l - 1.0).abs()) * self.s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let (r1, g1, b1) = match (h / 60.0) as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = self.l - c / 2.0;
        (
            ((r1 + m) * 255.0).round() as u8,
            ((g1 + m) * 255.0).round() as u8,
            ((b1 + m) * 255.0).round() as u8,
        )
    }
}

/// Saturation applied to every generated category color
const SATURATION: f64 = 0.70;

/// Lightness applied to every generated category color
const LIGHTNESS: f64 = 0.60;

/// Alpha for filled areas
pub const FILL_ALPHA: f64 = 0.5;

/// Alpha for strokes and lines
pub const STROKE_ALPHA: f64 = 1.0;

/// Fixed hues for pie slices, repeated cyclically past the palette length
pub const PIE_HUES: [f64; 8] = [220.0, 140.0, 30.0, 270.0, 0.0, 175.0, 55.0, 320.0];

/// Evenly spaced hue for category `index` of `count`
///
/// Returns 0 for an empty category set so degenerate inputs stay defined.
pub fn category_hue(index: usize, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    (index as f64 * 360.0) / count as f64
}

/// Fill color for category `index` of `count`
pub fn fill(index: usize, count: usize) -> Hsla {
    Hsla {
        h: category_hue(index, count),
        s: SATURATION,
        l: LIGHTNESS,
        a: FILL_ALPHA,
    }
}

/// Stroke color for category `index` of `count`
pub fn stroke(index: usize, count: usize) -> Hsla {
    Hsla {
        h: category_hue(index, count),
        s: SATURATION,
        l: LIGHTNESS,
        a: STROKE_ALPHA,
    }
}

/// Pie slice fill for `index`, cycling through the fixed palette
pub fn pie_fill(index: usize) -> Hsla {
    Hsla {
        h: PIE_HUES[index % PIE_HUES.len()],
        s: SATURATION,
        l: LIGHTNESS,
        a: FILL_ALPHA,
    }
}
