//! Grayscale map decoding
//!
//! River and fertility maps are grayscale images. Pixel intensities are
//! scaled into [0, 1]; the river map is binarised so that only 1.0 marks
//! an impassable cell.

use std::path::Path;

use image::GrayImage;

use crate::core::error::{Result, SimError};
use crate::core::types::Shape;
use crate::spatial::grid::Grid;

/// Intensity above which a river pixel counts as water
const RIVER_THRESHOLD: f64 = 0.5;

/// Decoded river and fertility grids
#[derive(Debug, Clone)]
pub struct LandscapeMaps {
    pub river: Grid<f64>,
    pub fertility: Grid<f64>,
}

/// Load both maps from image files
pub fn load_maps(river_path: &Path, fertility_path: &Path) -> Result<LandscapeMaps> {
    tracing::info!("Reading river map {:?}", river_path);
    let river = image::open(river_path)?.to_luma8();
    tracing::info!("Reading fertility map {:?}", fertility_path);
    let fertility = image::open(fertility_path)?.to_luma8();
    maps_from_luma(&river, &fertility)
}

/// Decode in-memory grayscale images
pub fn maps_from_luma(river: &GrayImage, fertility: &GrayImage) -> Result<LandscapeMaps> {
    let river = intensity_grid(river)?;
    let fertility = intensity_grid(fertility)?;

    if river.shape() != fertility.shape() {
        return Err(SimError::ShapeMismatch {
            river: river.shape(),
            fertility: fertility.shape(),
        });
    }

    let river = Grid::from_fn(river.shape(), |x, y| {
        match river.get(x, y) {
            Some(&v) if v > RIVER_THRESHOLD => 1.0,
            _ => 0.0,
        }
    });

    Ok(LandscapeMaps { river, fertility })
}

fn intensity_grid(img: &GrayImage) -> Result<Grid<f64>> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(SimError::EmptyMap);
    }
    let shape = Shape::new(height as usize, width as usize);
    Ok(Grid::from_fn(shape, |x, y| {
        f64::from(img.get_pixel(x as u32, y as u32).0[0]) / 255.0
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_luma_scaling_and_river_binarisation() {
        let river = GrayImage::from_fn(4, 3, |x, _| if x == 1 { Luma([255]) } else { Luma([40]) });
        let fertility = GrayImage::from_fn(4, 3, |x, _| Luma([(x * 85) as u8]));

        let maps = maps_from_luma(&river, &fertility).unwrap();

        assert_eq!(maps.river.shape(), Shape::new(3, 4));
        assert_eq!(maps.river.get(1, 2), Some(&1.0));
        assert_eq!(maps.river.get(0, 2), Some(&0.0));
        assert_eq!(maps.fertility.get(0, 0), Some(&0.0));
        assert_eq!(maps.fertility.get(3, 0), Some(&1.0));
    }

    #[test]
    fn test_mismatched_images_rejected() {
        let river = GrayImage::new(4, 3);
        let fertility = GrayImage::new(3, 4);
        assert!(matches!(
            maps_from_luma(&river, &fertility),
            Err(SimError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_image_rejected() {
        let empty = GrayImage::new(0, 0);
        assert!(matches!(maps_from_luma(&empty, &empty), Err(SimError::EmptyMap)));
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = load_maps(Path::new("does/not/exist.png"), Path::new("nope.png"));
        assert!(result.is_err());
    }
}
