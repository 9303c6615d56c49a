//! Built-in bitmap filters used to fake a style transfer.
//!
//! Filters are looked up by name through a [`FilterRegistry`]. Each filter
//! keeps the input's dimensions and alpha channel.

use image::{Rgba, RgbaImage};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    #[error("Cannot filter an empty image")]
    EmptyImage,
}

type FilterFn = fn(&RgbaImage) -> RgbaImage;

/// A constructed filter, ready to apply
#[derive(Clone, Copy)]
pub struct Filter {
    name: &'static str,
    op: FilterFn,
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter").field("name", &self.name).finish()
    }
}

impl Filter {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, input: &RgbaImage) -> Result<RgbaImage, FilterError> {
        if input.width() == 0 || input.height() == 0 {
            return Err(FilterError::EmptyImage);
        }
        Ok((self.op)(input))
    }
}

/// Name → filter table
#[derive(Debug, Clone)]
pub struct FilterRegistry {
    filters: BTreeMap<&'static str, FilterFn>,
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FilterRegistry {
    /// Registry with all six built-in filters
    pub fn builtin() -> Self {
        let mut filters: BTreeMap<&'static str, FilterFn> = BTreeMap::new();
        filters.insert("instant", instant);
        filters.insert("comic", comic);
        filters.insert("vignette", vignette);
        filters.insert("transfer", transfer);
        filters.insert("mono", mono);
        filters.insert("process", process);
        Self { filters }
    }

    /// Same registry with one filter missing
    pub fn without(mut self, name: &str) -> Self {
        self.filters.remove(name);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.filters.keys().copied()
    }

    pub fn build(&self, name: &str) -> Result<Filter, FilterError> {
        self.filters
            .get_key_value(name)
            .map(|(name, op)| Filter { name: *name, op: *op })
            .ok_or_else(|| FilterError::UnknownFilter(name.to_owned()))
    }
}

fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn luminance(pixel: &Rgba<u8>) -> f32 {
    let [r, g, b, _] = pixel.0;
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

/// Rows are output r, g, b; columns are input r, g, b and a constant offset
/// in units of full intensity.
fn color_matrix(input: &RgbaImage, m: [[f32; 4]; 3]) -> RgbaImage {
    let mut output = input.clone();
    for pixel in output.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let (r, g, b) = (r as f32, g as f32, b as f32);
        let channel = |row: [f32; 4]| to_u8(row[0] * r + row[1] * g + row[2] * b + row[3] * 255.0);
        *pixel = Rgba([channel(m[0]), channel(m[1]), channel(m[2]), a]);
    }
    output
}

/// Scale distance from mid-gray; `amount` > 1 adds contrast
fn contrast(mut image: RgbaImage, amount: f32) -> RgbaImage {
    for pixel in image.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let stretch = |c: u8| to_u8((c as f32 - 127.5) * amount + 127.5);
        *pixel = Rgba([stretch(r), stretch(g), stretch(b), a]);
    }
    image
}

fn instant(input: &RgbaImage) -> RgbaImage {
    color_matrix(
        input,
        [
            [1.0, 0.08, 0.0, 0.03],
            [0.02, 0.94, 0.04, 0.03],
            [0.0, 0.08, 0.82, 0.02],
        ],
    )
}

fn transfer(input: &RgbaImage) -> RgbaImage {
    let toned = color_matrix(
        input,
        [
            [0.88, 0.12, 0.04, 0.06],
            [0.06, 0.84, 0.1, 0.05],
            [0.06, 0.12, 0.7, 0.08],
        ],
    );
    contrast(toned, 0.85)
}

fn process(input: &RgbaImage) -> RgbaImage {
    let toned = color_matrix(
        input,
        [
            [0.9, 0.0, 0.02, -0.02],
            [0.0, 1.0, 0.06, 0.0],
            [0.04, 0.06, 1.08, 0.03],
        ],
    );
    contrast(toned, 1.2)
}

fn mono(input: &RgbaImage) -> RgbaImage {
    let mut output = input.clone();
    for pixel in output.pixels_mut() {
        let gray = to_u8(luminance(pixel));
        *pixel = Rgba([gray, gray, gray, pixel.0[3]]);
    }
    output
}

fn vignette(input: &RgbaImage) -> RgbaImage {
    const STRENGTH: f32 = 0.6;

    let (width, height) = input.dimensions();
    let center_x = (width as f32 - 1.0) / 2.0;
    let center_y = (height as f32 - 1.0) / 2.0;
    let max_dist_sq = (center_x * center_x + center_y * center_y).max(f32::EPSILON);

    let mut output = input.clone();
    for (x, y, pixel) in output.enumerate_pixels_mut() {
        let dx = x as f32 - center_x;
        let dy = y as f32 - center_y;
        let falloff = 1.0 - STRENGTH * ((dx * dx + dy * dy) / max_dist_sq);
        let [r, g, b, a] = pixel.0;
        let shade = |c: u8| to_u8(c as f32 * falloff);
        *pixel = Rgba([shade(r), shade(g), shade(b), a]);
    }
    output
}

fn comic(input: &RgbaImage) -> RgbaImage {
    const LEVELS: f32 = 4.0;
    const EDGE_THRESHOLD: f32 = 48.0;

    let (width, height) = input.dimensions();
    let luma = |x: i64, y: i64| {
        let x = x.clamp(0, width as i64 - 1) as u32;
        let y = y.clamp(0, height as i64 - 1) as u32;
        luminance(input.get_pixel(x, y))
    };

    let mut output = input.clone();
    for (x, y, pixel) in output.enumerate_pixels_mut() {
        let (xi, yi) = (x as i64, y as i64);
        let gradient = (luma(xi + 1, yi) - luma(xi - 1, yi)).abs()
            + (luma(xi, yi + 1) - luma(xi, yi - 1)).abs();
        let [r, g, b, a] = pixel.0;
        *pixel = if gradient > EDGE_THRESHOLD {
            Rgba([0, 0, 0, a])
        } else {
            let step = 255.0 / (LEVELS - 1.0);
            let posterize = |c: u8| to_u8((c as f32 / step).round() * step);
            Rgba([posterize(r), posterize(g), posterize(b), a])
        };
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap;
    use crate::style::AiStyle;

    fn gradient_image() -> RgbaImage {
        RgbaImage::from_fn(16, 12, |x, y| Rgba([(x * 16) as u8, (y * 20) as u8, 128, 200]))
    }

    #[test]
    fn test_every_style_resolves() {
        let registry = FilterRegistry::builtin();
        for style in AiStyle::ALL {
            let filter = registry.build(style.filter_name()).unwrap();
            assert_eq!(filter.name(), style.filter_name());
        }
    }

    #[test]
    fn test_filters_keep_size_and_alpha() {
        let registry = FilterRegistry::builtin();
        let input = gradient_image();
        for name in registry.names() {
            let output = registry.build(name).unwrap().apply(&input).unwrap();
            assert_eq!(output.dimensions(), input.dimensions(), "{name}");
            assert!(output.pixels().all(|p| p.0[3] == 200), "{name}");
        }
    }

    #[test]
    fn test_mono_is_gray() {
        let output = mono(&gradient_image());
        assert!(output.pixels().all(|p| p.0[0] == p.0[1] && p.0[1] == p.0[2]));
    }

    #[test]
    fn test_vignette_darkens_corners_not_center() {
        let input = bitmap::filled(21, 21, bitmap::WHITE);
        let output = vignette(&input);
        assert_eq!(output.get_pixel(10, 10).0[0], 255);
        assert!(output.get_pixel(0, 0).0[0] < 120);
    }

    #[test]
    fn test_comic_outlines_hard_edges() {
        let input = RgbaImage::from_fn(10, 4, |x, _| {
            if x < 5 { Rgba([0, 0, 0, 255]) } else { Rgba([255, 255, 255, 255]) }
        });
        let output = comic(&input);
        assert_eq!(output.get_pixel(5, 1).0, [0, 0, 0, 255]);
        assert_eq!(output.get_pixel(9, 1).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_unknown_and_missing_filters() {
        let registry = FilterRegistry::builtin().without("comic");
        assert_eq!(
            registry.build("comic").unwrap_err(),
            FilterError::UnknownFilter("comic".to_owned())
        );
        assert!(registry.build("mono").is_ok());
    }

    #[test]
    fn test_empty_image_rejected() {
        let filter = FilterRegistry::builtin().build("mono").unwrap();
        assert_eq!(filter.apply(&RgbaImage::new(0, 0)).unwrap_err(), FilterError::EmptyImage);
    }
}
