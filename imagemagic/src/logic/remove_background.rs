use super::{Download, Page, Render, UploadedAsset};
use crate::{Result, config::Config};
use background_remover::Segmenter;
use image::RgbImage;
use image_effect::{RasterImage, codec};
use std::time::Instant;

pub const CAPTION: &str = "Background Removed";
pub const WIDTH: u32 = 300;

pub fn handle(
    upload: &UploadedAsset,
    config: &Config,
    segmenter: &mut dyn Segmenter,
) -> Result<Page> {
    let original = upload.decode(config.upload.max_file_size)?;
    let original_png = codec::encode_png(&original)?;
    let rgb = RgbImage::try_from(original.into_rgb())?;

    let started = Instant::now();
    let cutout = RasterImage::from(segmenter.remove(&rgb)?);
    log::info!(
        "background removal of {} took {:.2?}",
        upload.name(),
        started.elapsed()
    );

    let png = codec::encode_png(&cutout)?;
    let download = Download::new(&config.output.download_name, &png);

    Ok(vec![
        Render::Columns(vec![
            vec![Render::image(super::ORIGINAL_CAPTION, super::ORIGINAL_WIDTH, original_png)],
            vec![Render::image(CAPTION, WIDTH, png)],
        ]),
        Render::Download(download),
    ])
}
