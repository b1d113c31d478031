use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Comparison series palette
// ---------------------------------------------------------------------------

/// Number of distinct series colors before the palette repeats.
pub const PALETTE_SIZE: usize = 6;

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Series color for the i-th retained entry of a comparison. Cycles the
/// fixed palette, so colors depend only on position in the series.
pub fn comparison_color(index: usize) -> Color32 {
    generate_palette(PALETTE_SIZE)[index % PALETTE_SIZE]
}

/// Translucent variant used to fill radar polygons.
pub fn fill_of(color: Color32) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 76)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colors_are_distinct() {
        let palette = generate_palette(PALETTE_SIZE);
        for i in 0..palette.len() {
            for j in (i + 1)..palette.len() {
                assert_ne!(palette[i], palette[j]);
            }
        }
    }

    #[test]
    fn comparison_color_cycles() {
        assert_eq!(comparison_color(0), comparison_color(PALETTE_SIZE));
        assert_eq!(comparison_color(1), comparison_color(PALETTE_SIZE + 1));
        assert_ne!(comparison_color(0), comparison_color(1));
    }
}
