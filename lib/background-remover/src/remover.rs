use crate::{Error, Model, Result, model::Normalization};
use fast_image_resize::{PixelType, ResizeOptions, Resizer, images::Image as FrImage};
use image::{GrayImage, Luma, RgbImage, Rgba, RgbaImage};
use ndarray::{Array, ArrayD, Ix4};
use ort::{session::Session, value::TensorRef};
use std::path::Path;

const COMMON_INPUT_NAMES: [&str; 4] = ["input", "input.1", "image", "x"];
const COMMON_OUTPUT_NAMES: [&str; 4] = ["output", "mask", "foreground", "alpha"];

#[derive(Debug)]
#[non_exhaustive]
pub struct BackgroundRemover {
    model: Model,
    session: Session,
    input_name: String,
    output_names: Vec<String>,
}

impl BackgroundRemover {
    pub fn new<P: AsRef<Path>>(model: Model, model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            return Err(Error::ModelNotFound(model_path.to_path_buf()));
        }

        log::info!("Loading ONNX model {model} from: {}", model_path.display());

        let session = Session::builder()?
            .commit_from_file(model_path)
            .map_err(|e| Error::ModelLoadFailed(format!("{}: {e}", model_path.display())))?;

        let input_name = Self::pick_input_name(&session);
        let output_names = session
            .outputs()
            .iter()
            .map(|output| output.name().to_string())
            .collect();

        Ok(Self {
            model,
            session,
            input_name,
            output_names,
        })
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn input_size(&self) -> (u32, u32) {
        self.model.to_input_size()
    }

    // mask is grayscale (0=background, 255=foreground), same size as `image`
    pub fn get_mask(&mut self, image: &RgbImage) -> Result<GrayImage> {
        if image.width() == 0 || image.height() == 0 {
            return Err(Error::ImageProcessing(format!(
                "cannot segment a {}x{} image",
                image.width(),
                image.height()
            )));
        }

        let (target_width, target_height) = self.input_size();
        let resized = resize_rgb(image, target_width, target_height)?;
        let input = to_nchw(&resized, self.model.normalization());
        let output = self.run_inference(input)?;
        let mask = to_mask(&output, self.model.stretch_mask())?;

        resize_mask(&mask, image.width(), image.height())
    }

    pub fn remove(&mut self, image: &RgbImage) -> Result<RgbaImage> {
        let mask = self.get_mask(image)?;
        apply_mask(image, &mask)
    }

    fn run_inference(&mut self, input: Array<f32, Ix4>) -> Result<ArrayD<f32>> {
        let input_tensor = TensorRef::from_array_view(input.view())?;
        let outputs = self
            .session
            .run(ort::inputs! { &self.input_name => input_tensor })?;

        let candidates = COMMON_OUTPUT_NAMES
            .iter()
            .map(|name| name.to_string())
            .chain(self.output_names.iter().cloned());

        for name in candidates {
            if !outputs.contains_key(name.as_str()) {
                continue;
            }

            if let Ok(arr) = outputs[name.as_str()].try_extract_array::<f32>() {
                log::debug!("using model output `{name}` with shape {:?}", arr.shape());
                return Ok(arr.into_dyn().to_owned());
            }
        }

        Err(Error::InvalidOutput(
            "Failed to extract any output from model".to_string(),
        ))
    }

    fn pick_input_name(session: &Session) -> String {
        let model_inputs: Vec<String> = session
            .inputs()
            .iter()
            .map(|input| input.name().to_string())
            .collect();

        COMMON_INPUT_NAMES
            .iter()
            .find(|common| model_inputs.iter().any(|name| name == *common))
            .map(|name| name.to_string())
            .or_else(|| model_inputs.first().cloned())
            .unwrap_or_else(|| "input".to_string())
    }
}

/// Joins `image` and `mask` into an RGBA image, the mask becoming alpha.
pub fn apply_mask(image: &RgbImage, mask: &GrayImage) -> Result<RgbaImage> {
    if image.dimensions() != mask.dimensions() {
        return Err(Error::ImageProcessing(format!(
            "mask is {:?}, image is {:?}",
            mask.dimensions(),
            image.dimensions()
        )));
    }

    let (width, height) = image.dimensions();
    let mut result = RgbaImage::new(width, height);
    for ((out, rgb), alpha) in result.pixels_mut().zip(image.pixels()).zip(mask.pixels()) {
        *out = Rgba([rgb[0], rgb[1], rgb[2], alpha[0]]);
    }

    Ok(result)
}

/// Binary mask (0 = background, 255 = foreground) from a soft mask.
pub fn binary_mask(mask: &GrayImage, threshold: u8) -> GrayImage {
    let mut binary = mask.clone();
    for pixel in binary.pixels_mut() {
        *pixel = Luma([if pixel[0] > threshold { 255 } else { 0 }]);
    }
    binary
}

fn resize_rgb(image: &RgbImage, target_width: u32, target_height: u32) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    if (width, height) == (target_width, target_height) {
        return Ok(image.clone());
    }

    let src_image = FrImage::from_vec_u8(width, height, image.as_raw().clone(), PixelType::U8x3)?;
    let mut dst_image = FrImage::new(target_width, target_height, PixelType::U8x3);
    Resizer::new().resize(&src_image, &mut dst_image, &ResizeOptions::new())?;

    RgbImage::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| Error::ImageProcessing("Failed to create resized image".to_string()))
}

fn resize_mask(mask: &GrayImage, target_width: u32, target_height: u32) -> Result<GrayImage> {
    let (width, height) = mask.dimensions();
    if (width, height) == (target_width, target_height) {
        return Ok(mask.clone());
    }

    let src_image = FrImage::from_vec_u8(width, height, mask.as_raw().clone(), PixelType::U8)?;
    let mut dst_image = FrImage::new(target_width, target_height, PixelType::U8);
    Resizer::new().resize(&src_image, &mut dst_image, &ResizeOptions::new())?;

    GrayImage::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| Error::ImageProcessing("Failed to create resized mask".to_string()))
}

// NCHW: (1, 3, H, W)
fn to_nchw(image: &RgbImage, norm: Normalization) -> Array<f32, Ix4> {
    let (width, height) = image.dimensions();
    let mut array = Array::zeros((1, 3, height as usize, width as usize));

    for (x, y, pixel) in image.enumerate_pixels() {
        for c in 0..3 {
            array[[0, c, y as usize, x as usize]] = norm.apply(c, pixel[c]);
        }
    }

    array
}

fn to_mask(output: &ArrayD<f32>, stretch: bool) -> Result<GrayImage> {
    let shape = output.shape();
    let (width, height) = match shape.len() {
        4 => (shape[3], shape[2]), // (1, C, H, W)
        3 => (shape[2], shape[1]), // (1, H, W) or (C, H, W)
        2 => (shape[1], shape[0]), // (H, W)
        _ => {
            return Err(Error::InvalidOutput(format!(
                "Unsupported output shape: {shape:?}",
            )));
        }
    };

    // first plane only
    let values: Vec<f32> = output.iter().take(width * height).copied().collect();
    if values.len() != width * height {
        return Err(Error::InvalidOutput(format!(
            "output holds {} values, expected {}",
            values.len(),
            width * height
        )));
    }

    let (lo, hi) = if stretch {
        values
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    } else {
        (0.0, 1.0)
    };
    let range = if hi > lo { hi - lo } else { 1.0 };

    let mask = values
        .iter()
        .map(|&v| (((v - lo) / range).clamp(0.0, 1.0) * 255.0) as u8)
        .collect();

    GrayImage::from_raw(width as u32, height as u32, mask)
        .ok_or_else(|| Error::ImageProcessing("Failed to create mask image".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    #[test]
    fn test_apply_mask() {
        let image = RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]));
        let mut mask = GrayImage::new(3, 2);
        mask.put_pixel(1, 1, Luma([200]));

        let out = apply_mask(&image, &mask).unwrap();
        assert_eq!(out.dimensions(), (3, 2));
        assert_eq!(out.get_pixel(0, 0).0, [10, 20, 30, 0]);
        assert_eq!(out.get_pixel(1, 1).0, [10, 20, 30, 200]);
    }

    #[test]
    fn test_apply_mask_size_mismatch() {
        let image = RgbImage::new(3, 2);
        let mask = GrayImage::new(2, 3);
        assert!(matches!(
            apply_mask(&image, &mask),
            Err(Error::ImageProcessing(_))
        ));
    }

    #[test]
    fn test_binary_mask() {
        let mask = GrayImage::from_raw(3, 1, vec![10, 128, 129]).unwrap();
        assert_eq!(binary_mask(&mask, 128).as_raw(), &vec![0, 0, 255]);
    }

    #[test]
    fn test_to_mask_plain() {
        let output = ArrayD::from_shape_vec(IxDyn(&[1, 1, 1, 3]), vec![-0.5, 0.5, 2.0]).unwrap();
        let mask = to_mask(&output, false).unwrap();
        assert_eq!(mask.dimensions(), (3, 1));
        assert_eq!(mask.as_raw(), &vec![0, 127, 255]);
    }

    #[test]
    fn test_to_mask_stretched() {
        let output = ArrayD::from_shape_vec(IxDyn(&[1, 2, 2]), vec![0.2, 0.4, 0.6, 0.2]).unwrap();
        let mask = to_mask(&output, true).unwrap();
        assert_eq!(mask.dimensions(), (2, 2));
        assert_eq!(mask.as_raw()[0], 0);
        assert_eq!(mask.as_raw()[2], 255);
    }

    #[test]
    fn test_to_mask_bad_shape() {
        let output = ArrayD::from_shape_vec(IxDyn(&[4]), vec![0.0; 4]).unwrap();
        assert!(matches!(to_mask(&output, false), Err(Error::InvalidOutput(_))));
    }

    #[test]
    fn test_resize_round_trip_sizes() {
        let image = RgbImage::from_pixel(37, 21, image::Rgb([1, 2, 3]));
        let resized = resize_rgb(&image, 320, 320).unwrap();
        assert_eq!(resized.dimensions(), (320, 320));

        let mask = GrayImage::from_pixel(320, 320, Luma([255]));
        let back = resize_mask(&mask, 37, 21).unwrap();
        assert_eq!(back.dimensions(), (37, 21));
    }

    #[test]
    fn test_nchw_layout() {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(1, 0, image::Rgb([255, 0, 255]));
        let array = to_nchw(&image, Normalization::CENTERED);
        assert_eq!(array.shape(), &[1, 3, 1, 2]);
        assert_eq!(array[[0, 0, 0, 1]], 0.5);
        assert_eq!(array[[0, 1, 0, 1]], -0.5);
        assert_eq!(array[[0, 0, 0, 0]], -0.5);
    }

    #[test]
    fn test_missing_model_file() {
        let err = BackgroundRemover::new(Model::U2NETP, "/nonexistent/u2netp.onnx").unwrap_err();
        assert!(matches!(err, Error::ModelNotFound(_)));
    }
}
