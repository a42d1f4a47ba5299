//! Image to sample-matrix conversion and back.

use crate::error::{ModelError, Result};
use crate::Matrix;
use image::{DynamicImage, Rgb, RgbImage};

/// Converts between images and sample matrices.
///
/// Each pixel becomes one 3-channel row in raster scan order (row-major,
/// left to right, top to bottom). Channel values are mapped linearly from
/// `[0, 255]` into `[min, max]` on the way in and back on the way out,
/// with rounding and clamping, so centroid colors that drift slightly
/// outside the range still produce valid pixels.
#[derive(Clone, Debug)]
pub struct PixelConverter {
    min: f64,
    max: f64,
}

impl PixelConverter {
    pub fn new(min: f64, max: f64) -> Self {
        if min >= max {
            panic!("min must be < max, got min={} max={}", min, max);
        }
        Self { min, max }
    }

    pub fn image_to_matrix(&self, img: &DynamicImage) -> Matrix {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let n_pixels = width as usize * height as usize;

        let mut matrix = Matrix::zeros((n_pixels, 3));
        for (i, pixel) in rgb.pixels().enumerate() {
            for channel in 0..3 {
                matrix[[i, channel]] = self.normalize(pixel.0[channel]);
            }
        }

        matrix
    }

    pub fn matrix_to_image(&self, x: &Matrix, width: u32, height: u32) -> Result<RgbImage> {
        if x.ncols() != 3 {
            return Err(ModelError::DimensionMismatch {
                expected: 3,
                got: x.ncols(),
            });
        }

        let n_pixels = width as usize * height as usize;
        if x.nrows() != n_pixels {
            return Err(ModelError::InvalidParameter(format!(
                "matrix has {} rows but a {}x{} image needs {}",
                x.nrows(),
                width,
                height,
                n_pixels
            )));
        }

        let mut img = RgbImage::new(width, height);
        for (i, pixel) in img.pixels_mut().enumerate() {
            let row = x.row(i);
            *pixel = Rgb([
                self.denormalize(row[0]),
                self.denormalize(row[1]),
                self.denormalize(row[2]),
            ]);
        }

        Ok(img)
    }

    fn normalize(&self, value: u8) -> f64 {
        self.min + (value as f64 / 255.0) * (self.max - self.min)
    }

    fn denormalize(&self, value: f64) -> u8 {
        let scaled = (value - self.min) / (self.max - self.min) * 255.0;
        scaled.round().clamp(0.0, 255.0) as u8
    }
}

impl Default for PixelConverter {
    /// The `[-1, +1]` range used for pixel clustering.
    fn default() -> Self {
        Self::new(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn test_image() -> DynamicImage {
        // 2x2: black, white, red, mid-gray, raster order
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([255, 255, 255]));
        img.put_pixel(0, 1, Rgb([255, 0, 0]));
        img.put_pixel(1, 1, Rgb([128, 128, 128]));
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_image_to_matrix_range_and_order() {
        let converter = PixelConverter::new(-1.0, 1.0);
        let matrix = converter.image_to_matrix(&test_image());

        assert_eq!(matrix.shape(), &[4, 3]);

        // channel 0 maps to min, channel 255 to max
        assert_eq!(matrix.row(0).to_vec(), vec![-1.0, -1.0, -1.0]);
        assert_eq!(matrix.row(1).to_vec(), vec![1.0, 1.0, 1.0]);

        // raster order: (0,1) is the third pixel
        assert_eq!(matrix[[2, 0]], 1.0);
        assert_eq!(matrix[[2, 1]], -1.0);
        assert_abs_diff_eq!(matrix[[3, 0]], 128.0 / 255.0 * 2.0 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_round_trip() {
        let converter = PixelConverter::new(-1.0, 1.0);
        let original = test_image();

        let matrix = converter.image_to_matrix(&original);
        let rebuilt = converter.matrix_to_image(&matrix, 2, 2).unwrap();

        assert_eq!(original.to_rgb8().as_raw(), rebuilt.as_raw());
    }

    #[test]
    fn test_denormalize_clamps() {
        let converter = PixelConverter::new(-1.0, 1.0);
        assert_eq!(converter.denormalize(-1.5), 0);
        assert_eq!(converter.denormalize(1.5), 255);
        assert_eq!(converter.denormalize(0.0), 128);
    }

    #[test]
    fn test_alternate_range() {
        let converter = PixelConverter::new(0.0, 1.0);
        let matrix = converter.image_to_matrix(&test_image());
        assert_eq!(matrix.row(0).to_vec(), vec![0.0, 0.0, 0.0]);
        assert_eq!(matrix.row(1).to_vec(), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_matrix_to_image_wrong_row_count() {
        let converter = PixelConverter::default();
        let matrix = Matrix::zeros((3, 3));
        assert!(matches!(
            converter.matrix_to_image(&matrix, 2, 2),
            Err(ModelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_matrix_to_image_wrong_channel_count() {
        let converter = PixelConverter::default();
        let matrix = Matrix::zeros((4, 2));
        assert!(matches!(
            converter.matrix_to_image(&matrix, 2, 2),
            Err(ModelError::DimensionMismatch { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn test_quantization_pipeline() {
        // image -> samples -> k-means -> centroid substitution -> image
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([10, 10, 10]));
        img.put_pixel(1, 0, Rgb([12, 12, 12]));
        img.put_pixel(0, 1, Rgb([240, 240, 240]));
        img.put_pixel(1, 1, Rgb([238, 238, 238]));
        let img = DynamicImage::ImageRgb8(img);

        let converter = PixelConverter::default();
        let pixels = converter.image_to_matrix(&img);

        let mut kmeans = crate::cluster::KMeans::new(2)
            .tolerance(0.01)
            .random_state(0);
        let labels = kmeans.fit_predict(&pixels).unwrap();
        let centroids = kmeans.centroids.as_ref().unwrap();

        let quantized = crate::cluster::apply_centroids(&pixels, &labels, centroids).unwrap();
        let out = converter.matrix_to_image(&quantized, 2, 2).unwrap();

        // The two dark pixels collapse onto one color, the two light
        // pixels onto another
        assert_eq!(out.get_pixel(0, 0), out.get_pixel(1, 0));
        assert_eq!(out.get_pixel(0, 1), out.get_pixel(1, 1));
        assert_ne!(out.get_pixel(0, 0), out.get_pixel(0, 1));
    }

    #[test]
    fn test_invalid_range() {
        std::panic::catch_unwind(|| {
            let _ = PixelConverter::new(1.0, -1.0);
        })
        .expect_err("Should panic when min >= max");
    }
}
