use std::path::Path;

use image::imageops::FilterType;
use image::ImageReader;
use ndarray::Array4;

use super::config::ModelConfig;
use super::AnalysisError;

/// Fixed transform in front of the network: bilinear resize, grayscale,
/// scale to [0, 1], normalize with the configured mean/std. Output layout is
/// NCHW with a single channel.
pub struct Preprocessor {
    width: u32,
    height: u32,
    mean: f32,
    std: f32,
}

impl Preprocessor {
    pub fn new(config: &ModelConfig) -> Self {
        let [width, height] = config.image.size;
        Self {
            width,
            height,
            mean: config.normalization.mean,
            std: config.normalization.std,
        }
    }

    pub fn run(&self, path: &Path) -> Result<Array4<f32>, AnalysisError> {
        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        let gray = image
            .resize_exact(self.width, self.height, FilterType::Triangle)
            .to_luma8();

        let tensor = Array4::from_shape_fn(
            (1, 1, self.height as usize, self.width as usize),
            |(_, _, y, x)| {
                let value = gray.get_pixel(x as u32, y as u32).0[0] as f32 / 255.0;
                (value - self.mean) / self.std
            },
        );
        Ok(tensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb};
    use std::path::PathBuf;
    use uuid::Uuid;

    struct TempImage(PathBuf);

    impl Drop for TempImage {
        fn drop(&mut self) {
            std::fs::remove_file(&self.0).ok();
        }
    }

    fn write_rgb(width: u32, height: u32, pixel: [u8; 3]) -> TempImage {
        let path = std::env::temp_dir().join(format!("preprocess-{}.png", Uuid::new_v4()));
        ImageBuffer::from_pixel(width, height, Rgb(pixel))
            .save(&path)
            .unwrap();
        TempImage(path)
    }

    fn write_gray(width: u32, height: u32, value: u8) -> TempImage {
        let path = std::env::temp_dir().join(format!("preprocess-{}.png", Uuid::new_v4()));
        ImageBuffer::from_pixel(width, height, Luma([value]))
            .save(&path)
            .unwrap();
        TempImage(path)
    }

    fn preprocessor() -> Preprocessor {
        Preprocessor::new(&ModelConfig::default())
    }

    #[test]
    fn output_shape_is_nchw_224() {
        let img = write_rgb(64, 48, [200, 10, 90]);
        let tensor = preprocessor().run(&img.0).unwrap();
        assert_eq!(tensor.shape(), &[1, 1, 224, 224]);
    }

    #[test]
    fn uniform_gray_maps_to_expected_value() {
        let img = write_gray(32, 32, 128);
        let tensor = preprocessor().run(&img.0).unwrap();
        let expected = (128.0 / 255.0 - 0.485) / 0.229;
        for &v in tensor.iter() {
            assert!((v - expected).abs() < 1e-4, "got {v}, expected {expected}");
        }
    }

    #[test]
    fn values_stay_in_normalized_range() {
        let img = write_rgb(100, 80, [255, 0, 128]);
        let tensor = preprocessor().run(&img.0).unwrap();
        let lo = (0.0 - 0.485) / 0.229;
        let hi = (1.0 - 0.485) / 0.229;
        for &v in tensor.iter() {
            assert!(v >= lo - 1e-4 && v <= hi + 1e-4);
        }
    }

    #[test]
    fn non_image_file_fails_to_decode() {
        let path = std::env::temp_dir().join(format!("preprocess-{}.png", Uuid::new_v4()));
        std::fs::write(&path, b"not an image").unwrap();
        let guard = TempImage(path);
        let err = preprocessor().run(&guard.0).unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
