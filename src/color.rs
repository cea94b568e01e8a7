use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Acquisition-order gradient
// ---------------------------------------------------------------------------

/// Generates `n` colours running from blue (first spectrum) to red (last),
/// so a sweep reads as a gradient in the plot.
pub fn spectrum_gradient(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    let span = (n.max(2) - 1) as f32;
    (0..n)
        .map(|i| {
            let hue = 240.0 - (i as f32 / span) * 240.0;
            let hsl = Hsl::new(hue, 0.75, 0.5);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}
