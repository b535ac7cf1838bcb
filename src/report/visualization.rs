use image::{GrayImage, Rgb, RgbImage};

use crate::{
    analysis::ElaMap,
    error::{ForensicsError, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    HeatMap,
    Grayscale,
}

#[derive(Debug, Clone)]
pub struct VisualizationConfig {
    pub color_scheme: ColorScheme,
    pub overlay_opacity: f32,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::HeatMap,
            overlay_opacity: 0.5,
        }
    }
}

#[derive(Default)]
pub struct Visualizer {
    config: VisualizationConfig,
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: VisualizationConfig) -> Self {
        Self { config }
    }

    /// False-colour rendering of the map's luminance.
    pub fn ela_heatmap(&self, ela: &ElaMap) -> RgbImage {
        self.create_heatmap(&ela.luminance())
    }

    pub fn create_heatmap(&self, gray: &GrayImage) -> RgbImage {
        let (width, height) = gray.dimensions();
        let mut heatmap = RgbImage::new(width, height);

        for (x, y, pixel) in gray.enumerate_pixels() {
            let intensity = pixel[0] as f32 / 255.0;
            heatmap.put_pixel(x, y, self.intensity_to_color(intensity));
        }

        heatmap
    }

    fn intensity_to_color(&self, intensity: f32) -> Rgb<u8> {
        let intensity = intensity.clamp(0.0, 1.0);

        match self.config.color_scheme {
            ColorScheme::HeatMap => {
                let (r, g, b) = if intensity < 0.25 {
                    let t = intensity / 0.25;
                    (0.0, t, 1.0)
                } else if intensity < 0.5 {
                    let t = (intensity - 0.25) / 0.25;
                    (0.0, 1.0, 1.0 - t)
                } else if intensity < 0.75 {
                    let t = (intensity - 0.5) / 0.25;
                    (t, 1.0, 0.0)
                } else {
                    let t = (intensity - 0.75) / 0.25;
                    (1.0, 1.0 - t, 0.0)
                };
                Rgb([(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8])
            }
            ColorScheme::Grayscale => {
                let v = (intensity * 255.0) as u8;
                Rgb([v, v, v])
            }
        }
    }

    /// Blends an ELA heatmap over the image it was computed from.
    pub fn overlay_ela(&self, original: &RgbImage, ela: &ElaMap) -> Result<RgbImage> {
        if original.dimensions() != ela.dimensions() {
            let (w1, h1) = original.dimensions();
            let (w2, h2) = ela.dimensions();
            return Err(ForensicsError::DimensionMismatch(w1, h1, w2, h2));
        }

        let heatmap = self.ela_heatmap(ela);
        let alpha = self.config.overlay_opacity.clamp(0.0, 1.0);

        Ok(RgbImage::from_fn(original.width(), original.height(), |x, y| {
            let orig = original.get_pixel(x, y);
            let heat = heatmap.get_pixel(x, y);

            Rgb([
                ((1.0 - alpha) * orig[0] as f32 + alpha * heat[0] as f32) as u8,
                ((1.0 - alpha) * orig[1] as f32 + alpha * heat[1] as f32) as u8,
                ((1.0 - alpha) * orig[2] as f32 + alpha * heat[2] as f32) as u8,
            ])
        }))
    }
}
